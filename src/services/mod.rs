//! Services this process introduces to the network.

mod webserv;

pub use webserv::{WebServ, introduce};
