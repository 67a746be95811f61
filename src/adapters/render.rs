use crate::core::pagination::Paginator;
use crate::domain::model::SearchResult;
use crate::utils::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Tsv,
}

/// 目前頁數資訊，只有表格輸出會顯示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current: usize,
    pub total: usize,
    pub total_results: usize,
}

pub fn render(results: &[SearchResult], format: OutputFormat, page: Option<PageInfo>) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(results, page)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Csv => render_delimited(results, b','),
        OutputFormat::Tsv => render_delimited(results, b'\t'),
    }
}

/// Renders the (clamped) `page` of `results` together with its page footer.
pub fn render_page(
    results: &[SearchResult],
    paginator: &Paginator,
    page: usize,
    format: OutputFormat,
) -> Result<String> {
    let current = paginator.clamp_page(page, results.len());
    let info = PageInfo {
        current,
        total: paginator.total_pages(results.len()),
        total_results: results.len(),
    };
    render(paginator.page(results, current), format, Some(info))
}

fn render_table(results: &[SearchResult], page: Option<PageInfo>) -> String {
    if results.is_empty() {
        return "No results.".to_string();
    }

    let id_width = results
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(1)
        .max(1);
    let name_width = results
        .iter()
        .map(|r| r.entity_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Entity".len());

    let mut lines = Vec::with_capacity(results.len() + 3);
    lines.push(format!(
        "{:>id_width$}  {:<name_width$}  Website",
        "#", "Entity"
    ));
    lines.push(format!(
        "{}  {}  {}",
        "-".repeat(id_width),
        "-".repeat(name_width),
        "-".repeat("Website".len())
    ));
    for result in results {
        lines.push(format!(
            "{:>id_width$}  {:<name_width$}  {}",
            result.id, result.entity_name, result.website_url
        ));
    }

    if let Some(info) = page {
        lines.push(String::new());
        lines.push(format!(
            "Page {} of {} ({} results)",
            info.current, info.total, info.total_results
        ));
    }

    lines.join("\n")
}

fn render_delimited(results: &[SearchResult], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    if results.is_empty() {
        writer.write_record(["id", "entityName", "websiteUrl"])?;
    }
    for result in results {
        writer.serialize(result)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SearchError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| SearchError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
