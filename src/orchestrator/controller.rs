//! Request dispatch controller.
//!
//! Receives UI commands, runs each backend request on its own task, and
//! echoes the command's sequence number back in the completion event so
//! the reducer can discard stale responses.

use crate::api::ApiClient;
use crate::model::{ApiCommand, AppEvent, UploadOutcome};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Drain commands until `Quit` or until the UI side hangs up. Requests
/// already in flight at that point finish into a closed channel and are
/// dropped.
pub async fn run_controller(
    api: ApiClient,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<ApiCommand>,
) -> Result<()> {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ApiCommand::Quit => break,
            ApiCommand::FetchPrompts { seq } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, "fetching prompt list");
                    let result = api.list_prompts().await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "prompt list fetch failed");
                    }
                    let _ = tx.send(AppEvent::PromptsLoaded { seq, result });
                });
            }
            ApiCommand::FetchUploads { seq } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, "fetching upload history");
                    let result = api.list_uploads().await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "upload history fetch failed");
                    }
                    let _ = tx.send(AppEvent::UploadsLoaded { seq, result });
                });
            }
            ApiCommand::UploadFile { seq, path } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, path = %path.display(), "uploading transcript");
                    let result = upload_file(&api, &path).await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "upload failed");
                    }
                    let _ = tx.send(AppEvent::UploadFinished { seq, result });
                });
            }
            ApiCommand::Ingest { seq, request } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, namespace = %request.namespace, "ingesting transcript");
                    let result = api.ingest_transcript(&request).await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "ingestion failed");
                    }
                    let _ = tx.send(AppEvent::IngestFinished { seq, result });
                });
            }
            ApiCommand::RunPrompt { seq, request } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, prompt = %request.prompt_name, "running prompt");
                    let result = api.run_prompt(&request).await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "prompt run failed");
                    }
                    let _ = tx.send(AppEvent::PromptRunFinished { seq, result });
                });
            }
            ApiCommand::DeleteNamespace { seq, namespace } => {
                let api = api.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    debug!(seq, %namespace, "deleting namespace");
                    let result = api.delete_namespace(&namespace).await.map_err(display);
                    if let Err(error) = &result {
                        warn!(seq, %error, "deletion failed");
                    }
                    let _ = tx.send(AppEvent::DeleteFinished {
                        seq,
                        namespace,
                        result,
                    });
                });
            }
        }
    }
    Ok(())
}

/// Read the picked file and push it to the backend. Read failures
/// surface through the same upload error path as HTTP failures.
async fn upload_file(api: &ApiClient, path: &Path) -> Result<UploadOutcome> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("path has no usable file name: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    api.upload_transcript(&filename, bytes).await
}

fn display(err: anyhow::Error) -> String {
    format!("{err:#}")
}
