pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::gemini::GeminiClient;
pub use crate::adapters::render::OutputFormat;
pub use crate::config::TomlConfig;
pub use crate::core::{
    extractor::{ExtractionStrategy, ResponseExtractor},
    pagination::{Paginator, PAGE_SIZE},
    query_builder::QueryBuilder,
    search::SearchService,
    session::SearchSession,
};
pub use crate::domain::model::{SearchCriteria, SearchResult};
pub use crate::utils::error::{Result, SearchError};
