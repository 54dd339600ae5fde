//! Server-related types.

use crate::state::Sid;

/// A server on the network, including this services process itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub sid: Sid,
    pub name: String,
    pub description: String,
}

impl Server {
    pub fn new(sid: impl Into<Sid>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}
