//! Channel-related types and state.

use crate::state::{ModeSet, Shared, Sid, User};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A channel and its membership.
///
/// Members are weak handles in join order. A handle whose user has left
/// the network no longer upgrades and is skipped by readers.
#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub modes: ModeSet,
    /// Server that created the channel.
    pub sid: Sid,
    /// Channel creation timestamp.
    pub ts: i64,
    members: Vec<Weak<RwLock<User>>>,
}

impl Channel {
    pub fn new(name: String, sid: Sid, ts: i64) -> Self {
        Self {
            name,
            modes: ModeSet::new(),
            sid,
            ts,
            members: Vec::new(),
        }
    }

    /// Add a member. Returns false if the user is already a member.
    pub fn add_member(&mut self, user: &Shared<User>) -> bool {
        if self.is_member(user) {
            return false;
        }
        self.members.retain(|m| m.strong_count() > 0);
        self.members.push(Arc::downgrade(user));
        true
    }

    /// Remove a member. Returns false if the user was not a member.
    pub fn remove_member(&mut self, user: &Shared<User>) -> bool {
        let before = self.members.len();
        let target = Arc::downgrade(user);
        self.members
            .retain(|m| m.strong_count() > 0 && !Weak::ptr_eq(m, &target));
        before != self.members.len()
    }

    pub fn is_member(&self, user: &Shared<User>) -> bool {
        let target = Arc::downgrade(user);
        self.members.iter().any(|m| Weak::ptr_eq(m, &target))
    }

    /// Drop handles whose users are gone.
    pub fn prune_departed(&mut self) {
        self.members.retain(|m| m.strong_count() > 0);
    }

    /// Clone the member handles in join order.
    ///
    /// The handles may dangle by the time they are upgraded.
    pub fn member_handles(&self) -> Vec<Weak<RwLock<User>>> {
        self.members.clone()
    }

    /// Number of members whose users are still live.
    pub fn member_count(&self) -> usize {
        self.members.iter().filter(|m| m.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }
}
