//! Collection documents.

use crate::api::Projectable;
use crate::state::EntitySource;

/// Project every live entity of kind `T`, in source order.
///
/// An empty kind yields an empty vector.
pub fn project_all<T: Projectable>(source: &dyn EntitySource) -> Vec<T::Document> {
    T::fetch_all(source).iter().map(T::project).collect()
}
