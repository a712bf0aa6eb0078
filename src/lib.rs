pub mod shared {
    pub mod infrastructure {
        pub mod connectivity;
        pub mod notifier;
    }
}

pub mod modules {
    pub mod time_tracking {
        pub mod core {
            pub mod ids;
            pub mod outcome;
            pub mod pending_operation;
            pub mod ports;
            pub mod state;
            pub mod stats;
            pub mod time_entry;
        }
        pub mod use_cases {
            pub mod optimistic;
            pub mod tracker;
            pub mod fetch_time_entries {
                pub mod handler;
                pub mod retry;
            }
            pub mod start_timer {
                pub mod handler;
            }
            pub mod stop_timer {
                pub mod handler;
            }
            pub mod create_time_entry {
                pub mod handler;
            }
            pub mod update_time_entry {
                pub mod handler;
            }
            pub mod delete_time_entry {
                pub mod handler;
            }
            pub mod sync_pending_operations {
                pub mod handler;
                pub mod listener;
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod graphql;
                pub mod http;
            }
            pub mod outbound {
                pub mod http_time_entry_service;
                pub mod in_memory_queue_store;
                pub mod in_memory_time_entry_service;
                pub mod json_file_queue_store;
            }
        }
    }
}

pub mod shell;
