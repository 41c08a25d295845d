pub mod catalog;
pub mod topic;

pub use catalog::{Catalog, CatalogError};
pub use topic::TopicLookup;

use crate::error::PracticeError;

/// Produces the ordered word list for a session.
///
/// `selector` is a topic in topic-lookup mode and a sublist name in catalog
/// mode.
pub trait WordSource {
    fn words(&self, selector: &str) -> Result<Vec<String>, PracticeError>;
}
