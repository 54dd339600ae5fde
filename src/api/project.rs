//! Entity to document projection.
//!
//! Documents are plain serializable snapshots. Every field is always
//! present; unset optional values serialize as `null`.

use crate::api::{EntityKind, Projectable};
use crate::state::{Channel, Client, EntitySource, ModeSet, Server, Shared, User};
use serde::Serialize;
use std::sync::Weak;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDoc {
    pub nickname: String,
    pub hostname: String,
    pub username: String,
    pub realname: String,
    pub realhost: String,
    pub login: Option<String>,
    pub modes: ModeSet,
    pub away: Option<String>,
    pub uid: String,
    pub sid: String,
    pub ts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDoc {
    pub modes: ModeSet,
    pub users: Vec<UserDoc>,
    pub name: String,
    pub sid: String,
    pub ts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDoc {
    pub description: String,
    pub name: String,
    pub sid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientDoc {
    pub nickname: String,
    pub hostname: String,
    pub username: String,
    pub realname: String,
    pub modes: ModeSet,
    pub uid: String,
}

impl Projectable for User {
    const KIND: EntityKind = EntityKind::User;
    type Document = UserDoc;

    fn fetch_all(source: &dyn EntitySource) -> Vec<Shared<Self>> {
        source.all_users()
    }

    fn fetch_one(source: &dyn EntitySource, identifier: &str) -> Option<Shared<Self>> {
        source.find_user(identifier)
    }

    fn project(entity: &Shared<Self>) -> UserDoc {
        let user = entity.read();
        UserDoc {
            nickname: user.nick.clone(),
            hostname: user.host.clone(),
            username: user.user.clone(),
            realname: user.realname.clone(),
            realhost: user.realhost.clone(),
            login: user.account.clone(),
            modes: user.modes.clone(),
            away: user.away.clone(),
            uid: user.uid.clone(),
            sid: user.sid.clone(),
            ts: user.ts,
        }
    }
}

impl Projectable for Channel {
    const KIND: EntityKind = EntityKind::Channel;
    type Document = ChannelDoc;

    fn fetch_all(source: &dyn EntitySource) -> Vec<Shared<Self>> {
        source.all_channels()
    }

    fn fetch_one(source: &dyn EntitySource, identifier: &str) -> Option<Shared<Self>> {
        source.find_channel(identifier)
    }

    /// Members are projected after the channel guard is released. A member
    /// that has left the network in the meantime is left out.
    fn project(entity: &Shared<Self>) -> ChannelDoc {
        let (modes, members, name, sid, ts) = {
            let chan = entity.read();
            (
                chan.modes.clone(),
                chan.member_handles(),
                chan.name.clone(),
                chan.sid.clone(),
                chan.ts,
            )
        };

        let mut users = Vec::with_capacity(members.len());
        for member in &members {
            match Weak::upgrade(member) {
                Some(user) => users.push(User::project(&user)),
                None => {
                    debug!(channel = %name, "Skipping member that left during projection");
                    crate::metrics::record_vanished_member();
                }
            }
        }

        ChannelDoc {
            modes,
            users,
            name,
            sid,
            ts,
        }
    }
}

impl Projectable for Server {
    const KIND: EntityKind = EntityKind::Server;
    type Document = ServerDoc;

    fn fetch_all(source: &dyn EntitySource) -> Vec<Shared<Self>> {
        source.all_servers()
    }

    fn fetch_one(source: &dyn EntitySource, identifier: &str) -> Option<Shared<Self>> {
        source.find_server(identifier)
    }

    fn project(entity: &Shared<Self>) -> ServerDoc {
        let server = entity.read();
        ServerDoc {
            description: server.description.clone(),
            name: server.name.clone(),
            sid: server.sid.clone(),
        }
    }
}

impl Projectable for Client {
    const KIND: EntityKind = EntityKind::Client;
    type Document = ClientDoc;

    fn fetch_all(source: &dyn EntitySource) -> Vec<Shared<Self>> {
        source.all_clients()
    }

    fn fetch_one(source: &dyn EntitySource, identifier: &str) -> Option<Shared<Self>> {
        source.find_client(identifier)
    }

    fn project(entity: &Shared<Self>) -> ClientDoc {
        let client = entity.read();
        ClientDoc {
            nickname: client.nick.clone(),
            hostname: client.host.clone(),
            username: client.user.clone(),
            realname: client.realname.clone(),
            modes: client.modes.clone(),
            uid: client.uid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Network, UserParams, shared};
    use serde_json::json;

    fn alice() -> User {
        let mut user = User::new(UserParams {
            uid: "001AAAAAA".to_string(),
            nick: "alice".to_string(),
            user: "~alice".to_string(),
            realname: "Alice Example".to_string(),
            host: "user/alice".to_string(),
            realhost: "203.0.113.7".to_string(),
            modes: ModeSet::parse("+iw"),
            sid: "001".to_string(),
            ts: 1_700_000_000,
        });
        user.account = Some("alice".to_string());
        user
    }

    fn member(uid: &str, nick: &str) -> User {
        User::new(UserParams {
            uid: uid.to_string(),
            nick: nick.to_string(),
            user: nick.to_string(),
            realname: format!("{nick} realname"),
            host: "example.net".to_string(),
            realhost: "example.net".to_string(),
            modes: ModeSet::new(),
            sid: "001".to_string(),
            ts: 1_700_000_100,
        })
    }

    #[test]
    fn user_document_has_every_field() {
        let doc = User::project(&shared(alice()));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "nickname": "alice",
                "hostname": "user/alice",
                "username": "~alice",
                "realname": "Alice Example",
                "realhost": "203.0.113.7",
                "login": "alice",
                "modes": ["i", "w"],
                "away": null,
                "uid": "001AAAAAA",
                "sid": "001",
                "ts": 1_700_000_000,
            })
        );
    }

    #[test]
    fn absent_login_and_away_are_null_not_missing() {
        let doc = User::project(&shared(member("001AAAAAB", "bob")));
        let value = serde_json::to_value(&doc).unwrap();
        let fields = value.as_object().unwrap();
        assert_eq!(fields.len(), 11);
        assert!(fields["login"].is_null());
        assert!(fields["away"].is_null());
    }

    #[test]
    fn channel_nests_full_user_documents_in_member_order() {
        let net = Network::new();
        net.add_server(Server::new("001", "hub.straylight.net", "Hub"))
            .unwrap();
        net.add_user(member("001AAAAAB", "bob")).unwrap();
        net.add_user(member("001AAAAAC", "carol")).unwrap();
        net.join("#test", "001AAAAAB", 1_600_000_000).unwrap();
        let chan = net.join("#test", "001AAAAAC", 1_600_000_000).unwrap();
        net.set_channel_modes("#test", "+nt").unwrap();

        let doc = Channel::project(&chan);
        assert_eq!(doc.name, "#test");
        assert_eq!(doc.sid, "001");
        assert_eq!(doc.ts, 1_600_000_000);
        assert_eq!(doc.modes.as_mode_string(), "+nt");
        let nicks: Vec<_> = doc.users.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(nicks, vec!["bob", "carol"]);
        assert_eq!(doc.users[1].realname, "carol realname");

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["users"][0].is_object());
        assert_eq!(value["users"][0].as_object().unwrap().len(), 11);
    }

    #[test]
    fn vanished_member_is_skipped() {
        let mut chan = Channel::new("#race".to_string(), "001".to_string(), 0);
        let bob = shared(member("001AAAAAB", "bob"));
        let carol = shared(member("001AAAAAC", "carol"));
        chan.add_member(&bob);
        chan.add_member(&carol);
        let chan = shared(chan);

        // bob quits between the channel fetch and the projection.
        drop(bob);

        let doc = Channel::project(&chan);
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.users[0].nickname, "carol");
    }

    #[test]
    fn server_and_client_documents() {
        let server = Server::project(&shared(Server::new(
            "00A",
            "services.straylight.net",
            "Straylight IRC Services",
        )));
        assert_eq!(
            serde_json::to_value(&server).unwrap(),
            json!({
                "description": "Straylight IRC Services",
                "name": "services.straylight.net",
                "sid": "00A",
            })
        );

        let client = Client::project(&shared(Client::service(
            "00AAAAAAA".to_string(),
            "WebServ".to_string(),
            "webserv".to_string(),
            "Web API".to_string(),
            "services.straylight.net".to_string(),
        )));
        assert_eq!(
            serde_json::to_value(&client).unwrap(),
            json!({
                "nickname": "WebServ",
                "hostname": "services.straylight.net",
                "username": "webserv",
                "realname": "Web API",
                "modes": ["S"],
                "uid": "00AAAAAAA",
            })
        );
    }

    #[test]
    fn projection_does_not_mutate_source() {
        let handle = shared(alice());
        let first = User::project(&handle);
        let second = User::project(&handle);
        assert_eq!(first, second);
        assert_eq!(handle.read().nick, "alice");
    }
}
