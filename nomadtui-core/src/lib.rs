pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod filter;
pub mod input;
pub mod message;
pub mod page;
pub mod page_state;
pub mod registry;
pub mod row;
pub mod viewport;

// Remote API: endpoints, decoding and the async loader
pub mod loader;
pub mod nomad;
