//! User-related types and state.

use crate::state::{ModeSet, Sid, Uid};

/// A user known to the network, whether local or behind another server.
#[derive(Debug, Clone)]
pub struct User {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub realname: String,
    /// Visible hostname shown to other users (may be cloaked).
    pub host: String,
    /// Real hostname of the connection.
    pub realhost: String,
    /// Account name if logged in to services.
    pub account: Option<String>,
    pub modes: ModeSet,
    /// Away message if user is marked away.
    pub away: Option<String>,
    /// Server the user is connected to.
    pub sid: Sid,
    /// Unix timestamp of the nick introduction.
    pub ts: i64,
}

/// Parameters for creating a new User.
#[derive(Debug)]
pub struct UserParams {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub host: String,
    pub realhost: String,
    pub modes: ModeSet,
    pub sid: Sid,
    pub ts: i64,
}

impl User {
    /// Create a user that is not logged in and not away.
    pub fn new(params: UserParams) -> Self {
        let UserParams {
            uid,
            nick,
            user,
            realname,
            host,
            realhost,
            modes,
            sid,
            ts,
        } = params;

        Self {
            uid,
            nick,
            user,
            realname,
            host,
            realhost,
            account: None,
            modes,
            away: None,
            sid,
            ts,
        }
    }

    pub fn is_away(&self) -> bool {
        self.away.is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        self.account.is_some()
    }
}
