//! The query core: access control, resolution, and projection.
//!
//! Every entity kind goes through the same pipeline. A request passes the
//! [`AccessPolicy`], then either [`project_all`] builds the collection or
//! [`resolve`] finds one entity for [`Projectable::project`].

mod collection;
mod gate;
mod project;
mod resolve;

use crate::state::{EntitySource, Shared};
use serde::Serialize;
use std::fmt;

pub use collection::project_all;
pub use gate::AccessPolicy;
pub use project::{ChannelDoc, ClientDoc, ServerDoc, UserDoc};
pub use resolve::{Target, resolve};

/// The closed set of entity kinds the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Channel,
    Server,
    Client,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::User, Self::Channel, Self::Server, Self::Client];

    /// Name used for single-entity paths and envelopes.
    pub fn singular(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
            Self::Server => "server",
            Self::Client => "client",
        }
    }

    /// Name used for collection paths and envelopes.
    pub fn plural(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Channel => "channels",
            Self::Server => "servers",
            Self::Client => "clients",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// An entity kind that can be fetched from an [`EntitySource`] and
/// projected into a JSON document.
pub trait Projectable: Sized + Send + Sync + 'static {
    const KIND: EntityKind;

    type Document: Serialize + Send + 'static;

    /// Every live entity of this kind, in source order.
    fn fetch_all(source: &dyn EntitySource) -> Vec<Shared<Self>>;

    /// The entity whose identity key matches `identifier`.
    fn fetch_one(source: &dyn EntitySource, identifier: &str) -> Option<Shared<Self>>;

    /// Build the document for one live entity.
    ///
    /// Never mutates the entity and never looks anything up by identifier.
    fn project(entity: &Shared<Self>) -> Self::Document;
}
