//! Directly connected clients.
//!
//! A Client is a connection this process owns itself (for a services
//! process, its pseudo-clients such as WebServ). Clients are tracked apart
//! from the network-wide user list: the same nickname may also appear there
//! with different fields, and neither collection refers to the other.

use crate::state::{ModeSet, Uid};

/// A client connected directly to this process.
#[derive(Debug, Clone)]
pub struct Client {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub host: String,
    pub modes: ModeSet,
}

impl Client {
    /// Create a service pseudo-client with mode `+S`.
    pub fn service(uid: Uid, nick: String, user: String, realname: String, host: String) -> Self {
        Self {
            uid,
            nick,
            user,
            realname,
            host,
            modes: ModeSet::parse("+S"),
        }
    }
}
