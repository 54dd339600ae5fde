//! State management module.
//!
//! Contains the entity types, the [`EntitySource`] read interface, and the
//! in-memory [`Network`] that the services runtime keeps current.

mod casemap;
mod channel;
mod client;
mod dashmap_ext;
mod modes;
mod network;
mod server;
mod source;
mod uid;
mod user;

use parking_lot::RwLock;
use std::sync::Arc;

pub use casemap::{irc_to_lower, server_key};
pub use channel::Channel;
pub use client::Client;
pub use modes::ModeSet;
pub use network::Network;
pub use server::Server;
pub use source::EntitySource;
pub use uid::UidGenerator;
pub use user::{User, UserParams};

/// Unique user identifier (TS6 format: 9 characters).
pub type Uid = String;

/// Server identifier (TS6 format: 3 characters).
pub type Sid = String;

/// Handle to a live entity. Readers hold the lock only while copying fields.
pub type Shared<T> = Arc<RwLock<T>>;

/// Wrap an entity in a fresh handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}
