pub mod extractor;
pub mod pagination;
pub mod query_builder;
pub mod search;
pub mod session;

pub use crate::domain::model::{SearchCriteria, SearchResult};
pub use crate::domain::ports::{CompletionProvider, ConfigProvider};
pub use crate::utils::error::Result;
