pub mod types;

pub use types::{sort_by_indexed_pages, DomainCheckResult, IndexStatus};
