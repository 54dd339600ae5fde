//! The WebServ pseudo-client.
//!
//! On startup the process registers its own server and introduces WebServ
//! as a directly connected client. WebServ is also a user on the network
//! like any other service, so it shows up in both collections.

use crate::config::Config;
use crate::error::StateError;
use crate::state::{Client, Network, Server, UidGenerator, User, UserParams};
use tracing::info;

/// Identity of the introduced pseudo-client.
#[derive(Debug, Clone)]
pub struct WebServ {
    pub uid: String,
    pub nick: String,
}

/// Register this server and the WebServ pseudo-client in `network`.
pub fn introduce(network: &Network, config: &Config, now: i64) -> Result<WebServ, StateError> {
    let server = &config.server;
    let webserv = &config.webserv;

    network.add_server(Server::new(
        server.sid.clone(),
        server.name.clone(),
        server.description.clone(),
    ))?;

    let uids = UidGenerator::new(server.sid.clone());
    let uid = uids.next();

    let client = Client::service(
        uid.clone(),
        webserv.nickname.clone(),
        webserv.username.clone(),
        webserv.realname.clone(),
        server.name.clone(),
    );
    let modes = client.modes.clone();
    network.add_client(client)?;

    network.add_user(User::new(UserParams {
        uid: uid.clone(),
        nick: webserv.nickname.clone(),
        user: webserv.username.clone(),
        realname: webserv.realname.clone(),
        host: server.name.clone(),
        realhost: server.name.clone(),
        modes,
        sid: server.sid.clone(),
        ts: now,
    }))?;

    info!(uid = %uid, nick = %webserv.nickname, "WebServ introduced");

    Ok(WebServ {
        uid,
        nick: webserv.nickname.clone(),
    })
}
