use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend base URL used when no flag overrides it.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// One row of the upload history from `GET /list-uploads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub uploaded_at: String,
}

/// Payload of a successful `POST /upload-transcript`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub transcript_text: String,
    pub namespace: String,
    pub filename: String,
}

/// The transcript the app is currently working with.
///
/// A selection restored from history has an empty `transcript_text`;
/// prompt runs against it send an empty transcript.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub namespace: String,
    pub filename: String,
    pub transcript_text: String,
}

impl Selection {
    pub fn from_upload(outcome: UploadOutcome) -> Self {
        Self {
            namespace: outcome.namespace,
            filename: outcome.filename,
            transcript_text: outcome.transcript_text,
        }
    }

    /// Restore from a history row. The backend does not return the
    /// transcript body here, so it stays empty.
    pub fn from_record(record: &UploadRecord) -> Self {
        Self {
            namespace: record.namespace.clone(),
            filename: record.filename.clone(),
            transcript_text: String::new(),
        }
    }
}

/// Body of `POST /process-transcript`.
#[derive(Debug, Clone, Serialize)]
pub struct IngestRequest {
    pub transcript: String,
    pub namespace: String,
    pub filename: String,
}

/// Body of `POST /process-with-prompt`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptRunRequest {
    pub transcript_text: String,
    pub prompt_name: String,
    pub namespace: String,
}

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub query: String,
    pub namespace: String,
}

/// Payload of a successful `POST /query`. `matches` is the retrieved
/// context the backend fed the model, already joined into one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskOutcome {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub matches: String,
}

/// Requests the UI sends to the controller. Every request variant
/// carries the sequence number its slot assigned at dispatch; the
/// matching completion event echoes it back.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    FetchPrompts { seq: u64 },
    FetchUploads { seq: u64 },
    UploadFile { seq: u64, path: PathBuf },
    Ingest { seq: u64, request: IngestRequest },
    RunPrompt { seq: u64, request: PromptRunRequest },
    DeleteNamespace { seq: u64, namespace: String },
    Quit,
}

/// Completion events the controller sends back to the UI. Errors are
/// display strings; there is no machine-readable error code.
#[derive(Debug, Clone)]
pub enum AppEvent {
    PromptsLoaded {
        seq: u64,
        result: Result<Vec<String>, String>,
    },
    UploadsLoaded {
        seq: u64,
        result: Result<Vec<UploadRecord>, String>,
    },
    UploadFinished {
        seq: u64,
        result: Result<UploadOutcome, String>,
    },
    IngestFinished {
        seq: u64,
        result: Result<(), String>,
    },
    PromptRunFinished {
        seq: u64,
        result: Result<String, String>,
    },
    DeleteFinished {
        seq: u64,
        namespace: String,
        result: Result<(), String>,
    },
}

/// Follow-up work the reducer asks the event loop to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RefreshUploads,
}

/// Abbreviate a namespace hash for display: first 8 chars plus an
/// ellipsis, as the upload history renders it.
pub fn short_namespace(namespace: &str) -> String {
    let head: String = namespace.chars().take(8).collect();
    format!("{}...", head)
}

/// Render an `uploaded_at` value human-readably in the local timezone,
/// falling back to UTC when the local offset is unavailable and to the
/// raw string when it does not parse (the backend sends "N/A" for rows
/// that predate timestamping).
pub fn format_upload_time(raw: &str) -> String {
    let parsed = match time::OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
    {
        Ok(dt) => dt,
        Err(_) => return raw.to_string(),
    };
    let (dt, suffix) = match time::UtcOffset::current_local_offset() {
        Ok(offset) => (parsed.to_offset(offset), ""),
        Err(_) => (parsed, " UTC"),
    };
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}{}",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_namespace_truncates_to_eight_chars() {
        assert_eq!(
            short_namespace("a3f8c2d91b4e67f0deadbeef"),
            "a3f8c2d9..."
        );
    }

    #[test]
    fn short_namespace_keeps_short_hashes_whole() {
        assert_eq!(short_namespace("abc123"), "abc123...");
    }

    #[test]
    fn upload_time_falls_back_to_raw_string() {
        assert_eq!(format_upload_time("N/A"), "N/A");
        assert_eq!(format_upload_time(""), "");
    }

    #[test]
    fn upload_time_formats_rfc3339() {
        let formatted = format_upload_time("2025-03-14T09:26:53Z");
        assert!(
            formatted.starts_with("2025-03-1"),
            "unexpected rendering: {formatted}"
        );
        assert!(!formatted.contains('T'));
    }

    #[test]
    fn selection_from_record_has_no_transcript() {
        let record = UploadRecord {
            namespace: "hash".into(),
            filename: "notes.txt".into(),
            uploaded_at: "N/A".into(),
        };
        let selection = Selection::from_record(&record);
        assert_eq!(selection.namespace, "hash");
        assert_eq!(selection.filename, "notes.txt");
        assert_eq!(selection.transcript_text, "");
    }

    #[test]
    fn upload_record_tolerates_missing_fields() {
        let record: UploadRecord = serde_json::from_str(r#"{"namespace":"n1"}"#)
            .expect("partial record should deserialize");
        assert_eq!(record.filename, "");
        assert_eq!(record.uploaded_at, "");
    }
}
