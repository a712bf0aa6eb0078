// Composition root for the time tracking client.
//
// Responsibilities:
// - Read config from the environment.
// - Instantiate concrete adapters and wire them into one TimeTracker.
// - Spawn background workers (connectivity health check, reconnect listener).
// - Expose the tracker over HTTP and GraphQL to a local UI.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
