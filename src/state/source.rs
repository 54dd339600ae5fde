//! Read access to live network state.

use crate::state::{Channel, Client, Server, Shared, User};

/// A read-only view over the entities owned by the services runtime.
///
/// Lookups match the identifier against the source's own index; any case
/// normalization happens here, not in callers. Collections are returned in
/// whatever order the source enumerates them and are not guaranteed to be
/// an atomic snapshot under concurrent mutation.
pub trait EntitySource: Send + Sync {
    fn all_users(&self) -> Vec<Shared<User>>;
    /// Look up a user by nickname.
    fn find_user(&self, nick: &str) -> Option<Shared<User>>;

    fn all_channels(&self) -> Vec<Shared<Channel>>;
    fn find_channel(&self, name: &str) -> Option<Shared<Channel>>;

    fn all_servers(&self) -> Vec<Shared<Server>>;
    fn find_server(&self, name: &str) -> Option<Shared<Server>>;

    fn all_clients(&self) -> Vec<Shared<Client>>;
    /// Look up a directly connected client by nickname.
    fn find_client(&self, nick: &str) -> Option<Shared<Client>>;
}
