use crate::utils::error::Result;
use async_trait::async_trait;

/// 文字生成服務：送出 prompt，取回模型輸出的原始文字
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn model(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}
