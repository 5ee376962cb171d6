//! Consumer side of the proxy endpoint, used by the console chat widget

use finalyser_core::FinancialSnapshot;

use crate::error::ChatError;
use crate::server::ChatProxyRequest;
use crate::stream::ChatStream;
use crate::upstream::{ensure_success, ChatMessage};

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    /// `endpoint` is the full chat URL, e.g. `http://127.0.0.1:8787/financial-chat`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        snapshot: Option<&FinancialSnapshot>,
    ) -> Result<ChatStream, ChatError> {
        let body = ChatProxyRequest {
            messages: messages.to_vec(),
            financial_data: snapshot.cloned(),
        };
        let resp = self.http.post(&self.endpoint).json(&body).send().await?;
        Ok(ChatStream::from_response(ensure_success(resp).await?))
    }
}
