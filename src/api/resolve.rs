//! Identifier resolution.

use crate::api::Projectable;
use crate::error::ApiError;
use crate::state::{EntitySource, Shared};

/// What a caller wants projected: a name to look up, or an entity it
/// already holds.
pub enum Target<T> {
    Identifier(String),
    Resolved(Shared<T>),
}

impl<T> From<&str> for Target<T> {
    fn from(identifier: &str) -> Self {
        Self::Identifier(identifier.to_string())
    }
}

impl<T> From<Shared<T>> for Target<T> {
    fn from(entity: Shared<T>) -> Self {
        Self::Resolved(entity)
    }
}

/// Resolve a target to exactly one live entity of kind `T`.
///
/// Identifiers are matched by the source's own index without further
/// normalization. An already-resolved entity is returned unchanged.
pub fn resolve<T: Projectable>(
    source: &dyn EntitySource,
    target: Target<T>,
) -> Result<Shared<T>, ApiError> {
    match target {
        Target::Resolved(entity) => Ok(entity),
        Target::Identifier(identifier) => {
            T::fetch_one(source, &identifier).ok_or(ApiError::NotFound {
                kind: T::KIND,
                identifier,
            })
        }
    }
}
