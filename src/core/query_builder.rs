use crate::domain::model::SearchCriteria;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// 一次請求要求模型回傳的筆數
pub const RESULT_COUNT: usize = 40;

/// 所有模板共用的輸出格式說明
pub const FORMAT_CLAUSE: &str = "Format the response as a JSON array with exactly {count} objects, each having these properties: id (number), entityName (string), websiteUrl (string).";

pub const DEFAULT_TEMPLATE: &str =
    "Find business entities in {state} that are in the {industry} industry. {format} Only include valid URLs.";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "Municipalities with Utilities",
        "Find municipalities in {state} that specifically offer utility services. {format} Only include valid URLs.",
    ),
    (
        "Utilities",
        "Find business entities in {state} that are in the utilities industry OR contain any of these keywords: 'water authority', 'waste', 'water and sewer', 'electric', 'gas', 'energy', 'oil'. {format} Only include valid URLs.",
    ),
    (
        "Non-Profit",
        "Find business entities in {state} that are non-profits OR contain any of these keywords: 'membership', 'association', 'club'. {format} Only include valid URLs.",
    ),
    (
        "Taxes",
        "Find only municipalities (cities, towns, counties) in {state} that specifically handle and collect tax payments. Focus on entities that have tax collection departments or provide tax payment services. {format} Only include valid URLs that lead to their tax payment or tax information pages.",
    ),
];

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{(count|state|industry)\}").expect("placeholder pattern is valid")
    })
}

/// Maps search criteria to the prompt sent upstream.
///
/// Templates are keyed by the exact industry name. `{state}`, `{industry}`,
/// `{count}` and `{format}` are substituted in a single pass, so criteria
/// values containing braces are inserted verbatim.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    templates: HashMap<String, String>,
    default_template: String,
    result_count: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES
                .iter()
                .map(|(industry, template)| (industry.to_string(), template.to_string()))
                .collect(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            result_count: RESULT_COUNT,
        }
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆寫某個產業的模板，空白模板會被忽略
    pub fn with_template(mut self, industry: impl Into<String>, template: impl Into<String>) -> Self {
        let industry = industry.into();
        let template = template.into();
        if template.trim().is_empty() {
            tracing::warn!("Ignoring blank prompt template for industry '{}'", industry);
            return self;
        }
        self.templates.insert(industry, template);
        self
    }

    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        if template.trim().is_empty() {
            tracing::warn!("Ignoring blank default prompt template");
            return self;
        }
        self.default_template = template;
        self
    }

    pub fn has_template(&self, industry: &str) -> bool {
        self.templates.contains_key(industry)
    }

    pub fn build(&self, criteria: &SearchCriteria) -> String {
        let template = self
            .templates
            .get(&criteria.industry)
            .unwrap_or(&self.default_template);

        let expanded = template.replace("{format}", FORMAT_CLAUSE);
        let count = self.result_count.to_string();

        placeholder_pattern()
            .replace_all(&expanded, |caps: &Captures| match &caps[1] {
                "count" => count.clone(),
                "state" => criteria.state.clone(),
                _ => criteria.industry.clone(),
            })
            .into_owned()
    }
}
