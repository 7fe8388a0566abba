use anyhow::{anyhow, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Serialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    filename: String,
}

/// One persisted exchange, oldest first in the history response.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub user_message: String,
    pub bot_response: String,
}

#[derive(Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the chatbot backend. Cheap to clone; clones share the
/// underlying connection pool, so background tasks can own one.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST /chat with the user's message; returns the bot response text.
    pub async fn send_chat(&self, message: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let chat: ChatResponse = response.json().await?;
        Ok(chat.response)
    }

    /// POST /upload with the raw file content as a multipart part; returns
    /// the server-confirmed filename.
    pub async fn upload_document(&self, filename: &str, content: Vec<u8>) -> Result<String> {
        let url = format!("{}/upload", self.base_url);
        let part = Part::bytes(content).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let upload: UploadResponse = response.json().await?;
        Ok(upload.filename)
    }

    /// GET /history; the persisted exchanges, oldest first.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let url = format!("{}/history", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let history: HistoryResponse = response.json().await?;
        Ok(history.history)
    }

    /// DELETE /history.
    pub async fn clear_history(&self) -> Result<()> {
        let url = format!("{}/history", self.base_url);

        let response = self.client.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        Ok(())
    }
}

/// Map a failed response to an error carrying the server's `detail` field
/// when the body parses, falling back to the status code otherwise.
async fn error_from(response: Response) -> anyhow::Error {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => anyhow!(body.detail),
        Err(_) => anyhow!("request failed with status {status}"),
    }
}
