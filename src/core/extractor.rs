use crate::domain::model::SearchResult;
use crate::utils::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 從模型輸出中定位 JSON 陣列的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExtractionStrategy {
    /// Fenced code block first, then string-aware balanced `[...]` spans.
    #[default]
    Balanced,
    /// First `[` through last `]`, inclusive.
    Outermost,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseExtractor {
    strategy: ExtractionStrategy,
}

impl ResponseExtractor {
    pub fn new(strategy: ExtractionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    /// Extracts and validates the record list embedded in `text`.
    ///
    /// Either every element is valid and the whole list is returned, or an
    /// error is returned; partial lists are never produced.
    pub fn extract(&self, text: &str) -> Result<Vec<SearchResult>> {
        let candidates = match self.strategy {
            ExtractionStrategy::Balanced => balanced_candidates(text),
            ExtractionStrategy::Outermost => outermost_span(text)
                .map(|span| serde_json::from_str::<Value>(span))
                .into_iter()
                .collect(),
        };

        tracing::debug!(
            "Found {} candidate array span(s) using {:?} strategy",
            candidates.len(),
            self.strategy
        );

        if candidates.is_empty() {
            return Err(SearchError::NoArrayFound);
        }

        let mut parse_error = None;
        let mut format_error = None;

        for candidate in candidates {
            let value = match candidate {
                Ok(value) => value,
                Err(e) => {
                    parse_error.get_or_insert(e);
                    continue;
                }
            };

            match validate_records(&value) {
                Ok(records) => return Ok(records),
                Err(e) => {
                    format_error.get_or_insert(e);
                }
            }
        }

        // 有可解析的陣列但格式不符時，優先回報格式錯誤
        if let Some(e) = format_error {
            return Err(e);
        }
        match parse_error {
            Some(source) => Err(SearchError::JsonParse { source }),
            None => Err(SearchError::NoArrayFound),
        }
    }
}

/// Checks that `value` is a list of `{id: integer, entityName: string, websiteUrl: string}`.
/// Keys beyond those three are ignored.
pub fn validate_records(value: &Value) -> Result<Vec<SearchResult>> {
    let items = value.as_array().ok_or_else(|| SearchError::InvalidFormat {
        reason: "expected a JSON array".to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_record(index, item))
        .collect()
}

fn validate_record(index: usize, item: &Value) -> Result<SearchResult> {
    let invalid = |reason: &str| SearchError::InvalidFormat {
        reason: format!("element {}: {}", index, reason),
    };

    let obj = item.as_object().ok_or_else(|| invalid("not an object"))?;

    let id = match obj.get("id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| invalid("id must be an integer"))?,
        _ => return Err(invalid("id must be a number")),
    };
    let entity_name = obj
        .get("entityName")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("entityName must be a string"))?;
    let website_url = obj
        .get("websiteUrl")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("websiteUrl must be a string"))?;

    Ok(SearchResult {
        id,
        entity_name: entity_name.to_string(),
        website_url: website_url.to_string(),
    })
}

fn outermost_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

type Candidate = std::result::Result<Value, serde_json::Error>;

fn balanced_candidates(text: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    if let Some(body) = fenced_body(text) {
        candidates.extend(balanced_spans(body));
    }
    candidates.extend(balanced_spans(text));
    candidates
}

/// Body of the first ``` fenced block, without its language tag line.
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    let body_start = if after.trim_start().starts_with('[') {
        0
    } else {
        after.find('\n')? + 1
    };
    let body = &after[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Parses top-level `[...]` spans whose brackets balance, ignoring brackets
/// inside JSON string literals. A span that parses is skipped as a whole; an
/// unterminated or unparsable `[` is skipped alone, so arrays nested in
/// bracketed prose are still found.
fn balanced_spans(text: &str) -> Vec<Candidate> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('[') {
        let start = pos + offset;
        pos = start + 1;

        if let Some(end) = balanced_end(text.as_bytes(), start) {
            let parsed = serde_json::from_str::<Value>(&text[start..=end]);
            if parsed.is_ok() {
                pos = end + 1;
            }
            spans.push(parsed);
        }
    }

    spans
}

fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME: &str = r#"[{"id":1,"entityName":"Acme","websiteUrl":"https://acme.test"}]"#;

    fn acme() -> SearchResult {
        SearchResult {
            id: 1,
            entity_name: "Acme".to_string(),
            website_url: "https://acme.test".to_string(),
        }
    }

    fn both() -> [ResponseExtractor; 2] {
        [
            ResponseExtractor::new(ExtractionStrategy::Balanced),
            ResponseExtractor::new(ExtractionStrategy::Outermost),
        ]
    }

    #[test]
    fn test_no_array_found() {
        for extractor in both() {
            let err = extractor.extract("Sorry, I cannot help with that.").unwrap_err();
            assert!(matches!(err, SearchError::NoArrayFound));

            let err = extractor.extract("closing ] before opening [").unwrap_err();
            assert!(matches!(err, SearchError::NoArrayFound));
        }
    }

    #[test]
    fn test_non_object_array_fails_validation() {
        for extractor in both() {
            let err = extractor.extract("noise [1,2] noise").unwrap_err();
            assert!(matches!(err, SearchError::InvalidFormat { .. }), "{:?}", err);
        }
    }

    #[test]
    fn test_well_formed_embedded_array() {
        let text = format!("Here are the results:\n{}\nLet me know if you need more.", ACME);
        for extractor in both() {
            assert_eq!(extractor.extract(&text).unwrap(), vec![acme()]);
        }
    }

    #[test]
    fn test_fenced_code_block() {
        let text = format!("See [1] below.\n```json\n{}\n```\nDone [end].", ACME);
        let extractor = ResponseExtractor::default();
        assert_eq!(extractor.extract(&text).unwrap(), vec![acme()]);
    }

    #[test]
    fn test_balanced_skips_bracketed_prose() {
        let text = format!("Results [as requested]: {} (see [notes])", ACME);

        let balanced = ResponseExtractor::new(ExtractionStrategy::Balanced);
        assert_eq!(balanced.extract(&text).unwrap(), vec![acme()]);

        // 舊的首尾括號切法會把前後文字一起切進來
        let outermost = ResponseExtractor::new(ExtractionStrategy::Outermost);
        assert!(matches!(
            outermost.extract(&text).unwrap_err(),
            SearchError::JsonParse { .. }
        ));
    }

    #[test]
    fn test_array_nested_in_bracketed_prose() {
        let text = format!("[Results: {}]", ACME);
        let records = ResponseExtractor::default().extract(&text).unwrap();

        assert_eq!(records, vec![acme()]);
    }

    #[test]
    fn test_brackets_inside_strings() {
        let text = r#"[{"id":7,"entityName":"Club [North]","websiteUrl":"https://x.test/a]b"}] trailing"#;
        let records = ResponseExtractor::default().extract(text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_name, "Club [North]");
        assert_eq!(records[0].website_url, "https://x.test/a]b");
    }

    #[test]
    fn test_unparsable_array() {
        let err = ResponseExtractor::default()
            .extract("[{id: 1, entityName: 'Acme'}]")
            .unwrap_err();
        assert!(matches!(err, SearchError::JsonParse { .. }));
    }

    #[test]
    fn test_rejects_whole_list_on_single_bad_element() {
        let text = r#"[
            {"id": 1, "entityName": "Acme", "websiteUrl": "https://acme.test"},
            {"id": "2", "entityName": "Beta", "websiteUrl": "https://beta.test"}
        ]"#;
        let err = ResponseExtractor::default().extract(text).unwrap_err();

        match err {
            SearchError::InvalidFormat { reason } => assert!(reason.starts_with("element 1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_rules() {
        let cases = [
            (r#"[{"id":1.5,"entityName":"A","websiteUrl":"u"}]"#, "id must be an integer"),
            (r#"[{"entityName":"A","websiteUrl":"u"}]"#, "id must be a number"),
            (r#"[{"id":1,"entityName":null,"websiteUrl":"u"}]"#, "entityName"),
            (r#"[{"id":1,"entityName":"A"}]"#, "websiteUrl"),
            (r#"["Acme"]"#, "not an object"),
        ];

        for (text, expected) in cases {
            match ResponseExtractor::default().extract(text) {
                Err(SearchError::InvalidFormat { reason }) => {
                    assert!(reason.contains(expected), "{} -> {}", text, reason)
                }
                other => panic!("{} -> {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_extra_keys_ignored_and_empty_list_allowed() {
        let text = r#"[{"id":3,"entityName":"C","websiteUrl":"https://c.test","city":"Austin"}]"#;
        let records = ResponseExtractor::default().extract(text).unwrap();
        assert_eq!(records[0].id, 3);

        assert!(ResponseExtractor::default().extract("[]").unwrap().is_empty());
    }

    #[test]
    fn test_reextraction_is_idempotent() {
        let text = r#"Sure! [
            {"id": 1, "entityName": "Alpha \"Water\" Authority", "websiteUrl": "https://alpha.test"},
            {"id": 2, "entityName": "Beta [Energy]", "websiteUrl": "https://beta.test/pay?x=[1]"},
            {"id": 2, "entityName": "Beta [Energy]", "websiteUrl": "https://beta.test/pay?x=[1]"}
        ]"#;

        for extractor in both() {
            let first = extractor.extract(text).unwrap();
            let serialized = serde_json::to_string(&first).unwrap();
            let second = extractor.extract(&serialized).unwrap();
            assert_eq!(first, second);
        }
    }
}
