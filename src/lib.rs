//! slirc-webserv - Straylight WebServ
//!
//! A read-only JSON view of the users, channels, servers, and clients an
//! IRC services process knows about.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod services;
pub mod state;
pub mod telemetry;
