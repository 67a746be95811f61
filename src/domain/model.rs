use serde::{Deserialize, Serialize};

/// 使用者選擇的搜尋條件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub industry: String,
    pub state: String,
}

impl SearchCriteria {
    pub fn new(industry: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            state: state.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.industry.trim().is_empty() && !self.state.trim().is_empty()
    }
}

/// 上游模型回傳的一筆機構資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: i64,
    pub entity_name: String,
    pub website_url: String,
}
