pub mod config;
pub mod error;
pub mod logging;

pub mod emitter;
pub mod placeholder;
pub mod server;
