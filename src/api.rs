//! HTTP client for the transcript RAG backend.

use crate::model::{
    AskOutcome, AskRequest, IngestRequest, PromptRunRequest, UploadOutcome, UploadRecord,
};
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client bound to one backend base URL. Cloning is cheap; the inner
/// `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Requests carry no timeout: ingestion and prompt runs block on
    /// model calls server-side and can legitimately take minutes.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("transcript-rag-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /prompts` - the names of the server-defined prompt templates.
    pub async fn list_prompts(&self) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(self.url("/prompts"))
            .send()
            .await
            .context("request /prompts")?;
        parse_payload(resp).await
    }

    /// `GET /list-uploads` - upload history, unwrapped from its envelope.
    pub async fn list_uploads(&self) -> Result<Vec<UploadRecord>> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            #[serde(default)]
            uploads: Vec<UploadRecord>,
        }
        let resp = self
            .http
            .get(self.url("/list-uploads"))
            .send()
            .await
            .context("request /list-uploads")?;
        let envelope: Envelope = parse_payload(resp).await?;
        Ok(envelope.uploads)
    }

    /// `POST /upload-transcript` with the file in a multipart field
    /// named `file`. The backend derives the namespace from a content
    /// hash and returns it with the extracted transcript text.
    pub async fn upload_transcript(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadOutcome> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .http
            .post(self.url("/upload-transcript"))
            .multipart(form)
            .send()
            .await
            .context("request /upload-transcript")?;
        parse_payload(resp).await
    }

    /// `POST /process-transcript` - ingest into the vector store.
    /// Status-only; the success body is ignored.
    pub async fn ingest_transcript(&self, request: &IngestRequest) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/process-transcript"))
            .json(request)
            .send()
            .await
            .context("request /process-transcript")?;
        let _: Value = parse_payload(resp).await?;
        Ok(())
    }

    /// `POST /process-with-prompt` - run a named prompt template.
    pub async fn run_prompt(&self, request: &PromptRunRequest) -> Result<String> {
        let resp = self
            .http
            .post(self.url("/process-with-prompt"))
            .json(request)
            .send()
            .await
            .context("request /process-with-prompt")?;
        let payload: Value = parse_payload(resp).await?;
        Ok(render_prompt_payload(&payload))
    }

    /// `POST /query` - free-form question against a namespace.
    pub async fn ask(&self, request: &AskRequest) -> Result<AskOutcome> {
        let resp = self
            .http
            .post(self.url("/query"))
            .json(request)
            .send()
            .await
            .context("request /query")?;
        parse_payload(resp).await
    }

    /// `DELETE /delete-namespace/{namespace}`. Status-only.
    pub async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/delete-namespace/{namespace}")))
            .send()
            .await
            .context("request /delete-namespace")?;
        let _: Value = parse_payload(resp).await?;
        Ok(())
    }
}

/// The backend reports most failures as HTTP 200 with an `{"error"}`
/// body. Check the status, then that shape, then deserialize.
async fn parse_payload<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let resp = resp.error_for_status()?;
    let value: Value = resp.json().await.context("decode response body")?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(anyhow!("{message}"));
    }
    serde_json::from_value(value).context("unexpected response shape")
}

/// Prompt runs normally return a `response` string; anything else is
/// shown as a formatted dump of the whole payload.
fn render_prompt_payload(payload: &Value) -> String {
    match payload.get("response").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_payload_prefers_response_field() {
        let payload = serde_json::json!({ "response": "summary text", "used_context": "..." });
        assert_eq!(render_prompt_payload(&payload), "summary text");
    }

    #[test]
    fn prompt_payload_without_response_field_is_dumped() {
        let payload = serde_json::json!({ "summary": "text", "score": 3 });
        let rendered = render_prompt_payload(&payload);
        assert!(rendered.contains("\"summary\": \"text\""));
        assert!(rendered.contains("\"score\": 3"));
    }

    #[test]
    fn prompt_payload_with_non_string_response_is_dumped() {
        let payload = serde_json::json!({ "response": 42 });
        assert!(render_prompt_payload(&payload).contains("\"response\": 42"));
    }
}
