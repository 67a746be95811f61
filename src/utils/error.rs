use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Missing search criteria: {field}")]
    MissingCriteria { field: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Unexpected response shape: {message}")]
    UnexpectedResponse { message: String },

    #[error("No valid JSON array found in response")]
    NoArrayFound,

    #[error("Failed to parse embedded JSON array: {source}")]
    JsonParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid results format: {reason}")]
    InvalidFormat { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Upstream,
    Extraction,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::MissingCriteria { .. } => ErrorCategory::Input,
            SearchError::Http(_) => ErrorCategory::Network,
            SearchError::UpstreamStatus { .. } | SearchError::UnexpectedResponse { .. } => {
                ErrorCategory::Upstream
            }
            SearchError::NoArrayFound
            | SearchError::JsonParse { .. }
            | SearchError::InvalidFormat { .. } => ErrorCategory::Extraction,
            SearchError::ConfigError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SearchError::IoError(_)
            | SearchError::CsvError(_)
            | SearchError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            // 模型輸出不穩定，重新搜尋通常就能解決
            ErrorCategory::Network | ErrorCategory::Upstream | ErrorCategory::Extraction => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 顯示給使用者的單行訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            SearchError::MissingCriteria { .. } => {
                "Please select both industry and state".to_string()
            }
            SearchError::Http(_) => "Failed to fetch results".to_string(),
            SearchError::UpstreamStatus { message, .. } => message.clone(),
            SearchError::UnexpectedResponse { .. } => {
                "Invalid response format from API".to_string()
            }
            SearchError::NoArrayFound
            | SearchError::JsonParse { .. }
            | SearchError::InvalidFormat { .. } => {
                "Failed to parse search results. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Choose an industry and a state, then search again",
            ErrorCategory::Network => "Check your network connection and the API endpoint",
            ErrorCategory::Upstream => "Check the API key and model name, then retry",
            ErrorCategory::Extraction => "Clear the results and run the search again",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
