//! The Network - live users, channels, servers, and clients.
//!
//! The services runtime mutates the Network as it hears about the IRC
//! network; the query API only reads it through [`EntitySource`]. Indexes
//! are concurrent maps holding [`Shared`] handles, and every reader clones a
//! handle out of its map before locking it.

use crate::error::StateError;
use crate::state::dashmap_ext::DashMapExt;
use crate::state::{
    Channel, Client, EntitySource, Server, Shared, Sid, Uid, User, irc_to_lower, server_key,
    shared,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

pub struct Network {
    /// All known users, indexed by UID.
    users: DashMap<Uid, Shared<User>>,
    /// Lowercase nick to UID.
    nicks: DashMap<String, Uid>,
    /// All channels, indexed by lowercase name.
    channels: DashMap<String, Shared<Channel>>,
    /// All servers, indexed by SID.
    servers: DashMap<Sid, Shared<Server>>,
    /// Lowercase server name to SID.
    server_names: DashMap<String, Sid>,
    /// Directly connected clients, indexed by lowercase nick.
    clients: DashMap<String, Shared<Client>>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            nicks: DashMap::new(),
            channels: DashMap::new(),
            servers: DashMap::new(),
            server_names: DashMap::new(),
            clients: DashMap::new(),
        }
    }

    // ========================================================================
    // Servers
    // ========================================================================

    /// Register a server.
    pub fn add_server(&self, server: Server) -> Result<Shared<Server>, StateError> {
        if self.servers.contains_key(&server.sid) {
            return Err(StateError::SidInUse(server.sid));
        }
        match self.server_names.entry(server_key(&server.name)) {
            Entry::Occupied(_) => return Err(StateError::ServerNameInUse(server.name)),
            Entry::Vacant(slot) => {
                slot.insert(server.sid.clone());
            }
        }

        info!(sid = %server.sid, name = %server.name, "Server introduced");
        let sid = server.sid.clone();
        let handle = shared(server);
        self.servers.insert(sid, handle.clone());
        Ok(handle)
    }

    /// Remove a server and every user behind it.
    pub fn remove_server(&self, sid: &str) -> Option<Shared<Server>> {
        let (_, handle) = self.servers.remove(sid)?;
        let name = handle.read().name.clone();
        self.server_names
            .remove_if(&server_key(&name), |_, mapped| mapped == sid);

        let lost: Vec<Uid> = self
            .users
            .values_cloned()
            .into_iter()
            .filter_map(|u| {
                let user = u.read();
                (user.sid == sid).then(|| user.uid.clone())
            })
            .collect();
        for uid in &lost {
            self.remove_user(uid);
        }

        info!(sid = %sid, name = %name, users = lost.len(), "Server split");
        Some(handle)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Introduce a user. The user's server must already be known.
    pub fn add_user(&self, user: User) -> Result<Shared<User>, StateError> {
        if !self.servers.contains_key(&user.sid) {
            return Err(StateError::UnknownServer(user.sid));
        }
        if self.users.contains_key(&user.uid) {
            return Err(StateError::UidInUse(user.uid));
        }
        match self.nicks.entry(irc_to_lower(&user.nick)) {
            Entry::Occupied(_) => return Err(StateError::NicknameInUse(user.nick)),
            Entry::Vacant(slot) => {
                slot.insert(user.uid.clone());
            }
        }

        debug!(uid = %user.uid, nick = %user.nick, sid = %user.sid, "User introduced");
        let uid = user.uid.clone();
        let handle = shared(user);
        self.users.insert(uid, handle.clone());
        Ok(handle)
    }

    /// Remove a user from the network and from every channel.
    ///
    /// Channels left empty are destroyed.
    pub fn remove_user(&self, uid: &str) -> Option<Shared<User>> {
        let (_, handle) = self.users.remove(uid)?;
        let nick = handle.read().nick.clone();
        self.nicks.remove_if(&irc_to_lower(&nick), |_, mapped| mapped == uid);

        for channel in self.channels.values_cloned() {
            let (name, emptied) = {
                let mut chan = channel.write();
                (chan.name.clone(), chan.remove_member(&handle) && chan.is_empty())
            };
            if emptied {
                self.destroy_if_empty(&name);
            }
        }

        debug!(uid = %uid, nick = %nick, "User removed");
        Some(handle)
    }

    /// Change a user's nickname.
    pub fn change_nick(&self, uid: &str, new_nick: &str) -> Result<(), StateError> {
        let handle = self
            .users
            .get_cloned(uid)
            .ok_or_else(|| StateError::NoSuchUser(uid.to_string()))?;
        let old_nick = handle.read().nick.clone();
        let old_key = irc_to_lower(&old_nick);
        let new_key = irc_to_lower(new_nick);

        if old_key != new_key {
            match self.nicks.entry(new_key) {
                Entry::Occupied(_) => return Err(StateError::NicknameInUse(new_nick.to_string())),
                Entry::Vacant(slot) => {
                    slot.insert(uid.to_string());
                }
            }
            self.nicks.remove_if(&old_key, |_, mapped| mapped == uid);
        }

        handle.write().nick = new_nick.to_string();
        debug!(uid = %uid, old = %old_nick, new = %new_nick, "Nick changed");
        Ok(())
    }

    /// Set or clear a user's away message.
    pub fn set_away(&self, uid: &str, away: Option<String>) -> Result<(), StateError> {
        self.user_handle(uid)?.write().away = away;
        Ok(())
    }

    /// Set or clear a user's services account.
    pub fn set_account(&self, uid: &str, account: Option<String>) -> Result<(), StateError> {
        self.user_handle(uid)?.write().account = account;
        Ok(())
    }

    /// Apply a mode change string like `"+i-w"` to a user.
    pub fn set_user_modes(&self, uid: &str, changes: &str) -> Result<(), StateError> {
        self.user_handle(uid)?.write().modes.apply(changes);
        Ok(())
    }

    fn user_handle(&self, uid: &str) -> Result<Shared<User>, StateError> {
        self.users
            .get_cloned(uid)
            .ok_or_else(|| StateError::NoSuchUser(uid.to_string()))
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Add a user to a channel, creating the channel on first join.
    ///
    /// A new channel takes the joining user's server and the given timestamp.
    pub fn join(&self, channel: &str, uid: &str, ts: i64) -> Result<Shared<Channel>, StateError> {
        let user = self.user_handle(uid)?;
        let sid = user.read().sid.clone();

        let handle = self
            .channels
            .entry(irc_to_lower(channel))
            .or_insert_with(|| {
                debug!(channel = %channel, "Channel created");
                shared(Channel::new(channel.to_string(), sid, ts))
            })
            .value()
            .clone();

        handle.write().add_member(&user);
        Ok(handle)
    }

    /// Remove a user from a channel. Returns whether they were a member.
    ///
    /// The channel is destroyed when its last member leaves.
    pub fn part(&self, channel: &str, uid: &str) -> Result<bool, StateError> {
        let user = self.user_handle(uid)?;
        let handle = self
            .channels
            .get_cloned(&irc_to_lower(channel))
            .ok_or_else(|| StateError::NoSuchChannel(channel.to_string()))?;

        let (removed, emptied) = {
            let mut chan = handle.write();
            let removed = chan.remove_member(&user);
            (removed, chan.is_empty())
        };
        if emptied {
            self.destroy_if_empty(channel);
        }
        Ok(removed)
    }

    /// Apply a mode change string like `"+nt"` to a channel.
    pub fn set_channel_modes(&self, channel: &str, changes: &str) -> Result<(), StateError> {
        let handle = self
            .channels
            .get_cloned(&irc_to_lower(channel))
            .ok_or_else(|| StateError::NoSuchChannel(channel.to_string()))?;
        handle.write().modes.apply(changes);
        Ok(())
    }

    fn destroy_if_empty(&self, channel: &str) {
        if self
            .channels
            .remove_if(&irc_to_lower(channel), |_, chan| chan.read().is_empty())
            .is_some()
        {
            debug!(channel = %channel, "Channel destroyed");
        }
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Register a directly connected client.
    pub fn add_client(&self, client: Client) -> Result<Shared<Client>, StateError> {
        match self.clients.entry(irc_to_lower(&client.nick)) {
            Entry::Occupied(_) => Err(StateError::NicknameInUse(client.nick)),
            Entry::Vacant(slot) => {
                debug!(uid = %client.uid, nick = %client.nick, "Client connected");
                let handle = shared(client);
                slot.insert(handle.clone());
                Ok(handle)
            }
        }
    }

    pub fn remove_client(&self, nick: &str) -> Option<Shared<Client>> {
        self.clients.remove(&irc_to_lower(nick)).map(|(_, c)| c)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

impl EntitySource for Network {
    fn all_users(&self) -> Vec<Shared<User>> {
        self.users.values_cloned()
    }

    fn find_user(&self, nick: &str) -> Option<Shared<User>> {
        let uid = self.nicks.get_cloned(&irc_to_lower(nick))?;
        self.users.get_cloned(&uid)
    }

    fn all_channels(&self) -> Vec<Shared<Channel>> {
        self.channels.values_cloned()
    }

    fn find_channel(&self, name: &str) -> Option<Shared<Channel>> {
        self.channels.get_cloned(&irc_to_lower(name))
    }

    fn all_servers(&self) -> Vec<Shared<Server>> {
        self.servers.values_cloned()
    }

    fn find_server(&self, name: &str) -> Option<Shared<Server>> {
        let sid = self.server_names.get_cloned(&server_key(name))?;
        self.servers.get_cloned(&sid)
    }

    fn all_clients(&self) -> Vec<Shared<Client>> {
        self.clients.values_cloned()
    }

    fn find_client(&self, nick: &str) -> Option<Shared<Client>> {
        self.clients.get_cloned(&irc_to_lower(nick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ModeSet, UserParams};

    fn network() -> Network {
        let net = Network::new();
        net.add_server(Server::new("00A", "services.straylight.net", "Services"))
            .unwrap();
        net.add_server(Server::new("001", "hub.straylight.net", "Hub"))
            .unwrap();
        net
    }

    fn user(uid: &str, nick: &str, sid: &str) -> User {
        User::new(UserParams {
            uid: uid.to_string(),
            nick: nick.to_string(),
            user: nick.to_string(),
            realname: format!("{nick} realname"),
            host: "example.net".to_string(),
            realhost: "198.51.100.1".to_string(),
            modes: ModeSet::parse("+i"),
            sid: sid.to_string(),
            ts: 1_700_000_000,
        })
    }

    #[test]
    fn find_user_is_case_insensitive() {
        let net = network();
        net.add_user(user("001AAAAAA", "Alice", "001")).unwrap();
        let found = net.find_user("ALICE").unwrap();
        assert_eq!(found.read().nick, "Alice");
        assert!(net.find_user("[alice]").is_none());
    }

    #[test]
    fn add_user_rejects_collisions() {
        let net = network();
        net.add_user(user("001AAAAAA", "alice", "001")).unwrap();
        assert_eq!(
            net.add_user(user("001AAAAAB", "Alice", "001")).unwrap_err(),
            StateError::NicknameInUse("Alice".to_string())
        );
        assert_eq!(
            net.add_user(user("001AAAAAA", "bob", "001")).unwrap_err(),
            StateError::UidInUse("001AAAAAA".to_string())
        );
        assert_eq!(
            net.add_user(user("002AAAAAA", "carol", "002")).unwrap_err(),
            StateError::UnknownServer("002".to_string())
        );
    }

    #[test]
    fn change_nick_moves_index() {
        let net = network();
        net.add_user(user("001AAAAAA", "alice", "001")).unwrap();
        net.add_user(user("001AAAAAB", "bob", "001")).unwrap();

        net.change_nick("001AAAAAA", "alicia").unwrap();
        assert!(net.find_user("alice").is_none());
        assert_eq!(net.find_user("alicia").unwrap().read().uid, "001AAAAAA");

        assert_eq!(
            net.change_nick("001AAAAAA", "BOB").unwrap_err(),
            StateError::NicknameInUse("BOB".to_string())
        );

        // Case-only change keeps the same index slot.
        net.change_nick("001AAAAAA", "Alicia").unwrap();
        assert_eq!(net.find_user("alicia").unwrap().read().nick, "Alicia");
    }

    #[test]
    fn join_creates_and_last_part_destroys() {
        let net = network();
        net.add_user(user("001AAAAAA", "bob", "001")).unwrap();
        net.add_user(user("001AAAAAB", "carol", "001")).unwrap();

        let chan = net.join("#Test", "001AAAAAA", 1_600_000_000).unwrap();
        net.join("#test", "001AAAAAB", 1_700_000_000).unwrap();
        assert_eq!(net.channel_count(), 1);
        {
            let chan = chan.read();
            assert_eq!(chan.name, "#Test");
            assert_eq!(chan.ts, 1_600_000_000);
            assert_eq!(chan.sid, "001");
            assert_eq!(chan.member_count(), 2);
        }

        assert!(net.part("#test", "001AAAAAA").unwrap());
        assert!(!net.part("#test", "001AAAAAA").unwrap());
        assert_eq!(net.channel_count(), 1);
        assert!(net.part("#TEST", "001AAAAAB").unwrap());
        assert_eq!(net.channel_count(), 0);
        assert_eq!(
            net.part("#test", "001AAAAAB").unwrap_err(),
            StateError::NoSuchChannel("#test".to_string())
        );
    }

    #[test]
    fn remove_user_leaves_channels() {
        let net = network();
        net.add_user(user("001AAAAAA", "bob", "001")).unwrap();
        net.add_user(user("001AAAAAB", "carol", "001")).unwrap();
        net.join("#test", "001AAAAAA", 0).unwrap();
        net.join("#test", "001AAAAAB", 0).unwrap();
        net.join("#bob", "001AAAAAA", 0).unwrap();

        net.remove_user("001AAAAAA").unwrap();
        assert!(net.find_user("bob").is_none());
        assert!(net.find_channel("#bob").is_none());
        let chan = net.find_channel("#test").unwrap();
        assert_eq!(chan.read().member_handles().len(), 1);
    }

    #[test]
    fn remove_server_splits_its_users() {
        let net = network();
        net.add_user(user("001AAAAAA", "bob", "001")).unwrap();
        net.add_user(user("00AAAAAAA", "WebServ", "00A")).unwrap();

        net.remove_server("001").unwrap();
        assert!(net.find_server("hub.straylight.net").is_none());
        assert!(net.find_user("bob").is_none());
        assert!(net.find_user("webserv").is_some());
        assert_eq!(net.server_count(), 1);
    }

    #[test]
    fn add_server_rejects_duplicates() {
        let net = network();
        assert_eq!(
            net.add_server(Server::new("00A", "other.straylight.net", ""))
                .unwrap_err(),
            StateError::SidInUse("00A".to_string())
        );
        assert_eq!(
            net.add_server(Server::new("002", "HUB.straylight.net", ""))
                .unwrap_err(),
            StateError::ServerNameInUse("HUB.straylight.net".to_string())
        );
    }

    #[test]
    fn user_attribute_updates() {
        let net = network();
        net.add_user(user("001AAAAAA", "alice", "001")).unwrap();
        net.set_away("001AAAAAA", Some("lunch".to_string())).unwrap();
        net.set_account("001AAAAAA", Some("alice".to_string())).unwrap();
        net.set_user_modes("001AAAAAA", "-i+w").unwrap();

        let alice = net.find_user("alice").unwrap();
        let alice = alice.read();
        assert_eq!(alice.away.as_deref(), Some("lunch"));
        assert_eq!(alice.account.as_deref(), Some("alice"));
        assert_eq!(alice.modes.as_mode_string(), "+w");

        assert_eq!(
            net.set_away("nobody", None).unwrap_err(),
            StateError::NoSuchUser("nobody".to_string())
        );
    }

    #[test]
    fn clients_are_independent_of_users() {
        let net = network();
        net.add_user(user("001AAAAAA", "dave", "001")).unwrap();
        net.add_client(Client::service(
            "00AAAAAAA".to_string(),
            "dave".to_string(),
            "dave".to_string(),
            "Dave the service".to_string(),
            "services.straylight.net".to_string(),
        ))
        .unwrap();

        assert_eq!(net.find_client("DAVE").unwrap().read().realname, "Dave the service");
        assert_eq!(net.find_user("dave").unwrap().read().realname, "dave realname");

        net.remove_client("dave").unwrap();
        assert_eq!(net.client_count(), 0);
        assert_eq!(net.user_count(), 1);
    }
}
