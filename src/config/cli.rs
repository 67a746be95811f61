use crate::adapters::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::adapters::render::OutputFormat;
use crate::core::extractor::{ExtractionStrategy, ResponseExtractor};
use crate::core::query_builder::QueryBuilder;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::Parser;
use std::collections::HashMap;

use super::toml_config::{TomlConfig, MAX_TIMEOUT_SECONDS};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "prospect-search")]
#[command(about = "Find prospect organisations by industry and state using the Gemini API")]
pub struct CliConfig {
    #[arg(long, help = "Industry to search, e.g. \"Utilities\"")]
    pub industry: Option<String>,

    #[arg(long, help = "State to search, e.g. \"Ohio\"")]
    pub state: Option<String>,

    #[arg(long, default_value_t = 1, help = "Result page to show (clamped to the available pages)")]
    pub page: usize,

    #[arg(long, help = "Render every result instead of a single page")]
    pub all: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(long, help = "Write the rendered results to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Base URL of the generative-language API")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, help = "Request timeout; no timeout when omitted")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum)]
    pub extraction: Option<ExtractionStrategy>,

    #[arg(short, long, help = "Start an interactive search session")]
    pub interactive: bool,

    #[arg(long, help = "List the known industries and states")]
    pub list: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(skip)]
    pub prompt_templates: HashMap<String, String>,

    #[arg(skip)]
    pub default_prompt: Option<String>,
}

impl CliConfig {
    /// 以設定檔補齊命令列沒有指定的值，命令列優先
    pub fn merge_file(&mut self, file: TomlConfig) {
        let TomlConfig {
            api,
            extraction,
            prompts,
        } = file;

        if self.endpoint.is_none() {
            self.endpoint = api.endpoint;
        }
        if self.model.is_none() {
            self.model = api.model;
        }
        if self.api_key.is_none() {
            self.api_key = api.api_key;
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = api.timeout_seconds;
        }
        if self.extraction.is_none() {
            self.extraction = extraction.strategy;
        }
        if self.default_prompt.is_none() {
            self.default_prompt = prompts.default;
        }
        for (industry, template) in prompts.templates {
            self.prompt_templates.entry(industry).or_insert(template);
        }
    }

    pub fn query_builder(&self) -> QueryBuilder {
        let mut builder = QueryBuilder::default();
        if let Some(template) = &self.default_prompt {
            builder = builder.with_default_template(template.clone());
        }
        for (industry, template) in &self.prompt_templates {
            builder = builder.with_template(industry.clone(), template.clone());
        }
        builder
    }

    pub fn extractor(&self) -> ResponseExtractor {
        ResponseExtractor::new(self.extraction.unwrap_or_default())
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", self.api_endpoint())?;
        validate_non_empty_string("model", self.model())?;

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        for (industry, template) in &self.prompt_templates {
            validate_non_empty_string(&format!("prompts.templates.{}", industry), template)?;
        }

        Ok(())
    }
}
