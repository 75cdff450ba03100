//! Lune node library: configuration, storage, and the HTTP API over the
//! credential engine. The `lune-node` binary is a thin wrapper around it.

pub mod api;
pub mod config;
pub mod node;
pub mod state;
pub mod storage;

pub use config::LuneConfig;
pub use node::LuneNode;
