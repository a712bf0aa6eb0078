pub mod state_recording_service;
pub mod time_entry;
pub mod tracker;
