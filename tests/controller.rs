use std::io::Write;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::timeout;
use transcript_rag_cli::api::ApiClient;
use transcript_rag_cli::model::{ApiCommand, AppEvent};
use transcript_rag_cli::orchestrator::run_controller;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    cmd_tx: mpsc::UnboundedSender<ApiCommand>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    controller: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn spawn_controller(server: &MockServer) -> Harness {
    let api = ApiClient::new(&server.uri()).expect("client builds");
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let controller = tokio::spawn(run_controller(api, event_tx, cmd_rx));
    Harness {
        cmd_tx,
        event_rx,
        controller,
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within deadline")
        .expect("event channel open")
}

#[tokio::test]
async fn fetch_command_completes_with_matching_seq() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploads": [{ "namespace": "ns-1", "filename": "a.txt", "uploaded_at": "N/A" }]
        })))
        .mount(&server)
        .await;

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::FetchUploads { seq: 41 })
        .expect("send");

    match next_event(&mut harness.event_rx).await {
        AppEvent::UploadsLoaded { seq, result } => {
            assert_eq!(seq, 41);
            let uploads = result.expect("fetch succeeds");
            assert_eq!(uploads.len(), 1);
            assert_eq!(uploads[0].namespace, "ns-1");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    harness.cmd_tx.send(ApiCommand::Quit).expect("send quit");
    harness
        .controller
        .await
        .expect("controller task joins")
        .expect("controller exits cleanly");
}

#[tokio::test]
async fn upload_command_reads_the_file_and_reports_the_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcript_text": "meeting notes",
            "namespace": "deadbeef0123",
            "filename": "meeting.txt"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("meeting.txt");
    let mut file = std::fs::File::create(&file_path).expect("create file");
    write!(file, "meeting notes").expect("write file");

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::UploadFile {
            seq: 7,
            path: file_path,
        })
        .expect("send");

    match next_event(&mut harness.event_rx).await {
        AppEvent::UploadFinished { seq, result } => {
            assert_eq!(seq, 7);
            let outcome = result.expect("upload succeeds");
            assert_eq!(outcome.namespace, "deadbeef0123");
            assert_eq!(outcome.transcript_text, "meeting notes");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_file_fails_through_the_upload_event() {
    let server = MockServer::start().await;

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::UploadFile {
            seq: 3,
            path: std::path::PathBuf::from("/nonexistent/notes.txt"),
        })
        .expect("send");

    match next_event(&mut harness.event_rx).await {
        AppEvent::UploadFinished { seq, result } => {
            assert_eq!(seq, 3);
            let error = result.expect_err("missing file should fail");
            assert!(error.contains("/nonexistent/notes.txt"), "error was: {error}");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn backend_error_bodies_come_back_as_failed_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-transcript"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Pinecone unavailable" })),
        )
        .mount(&server)
        .await;

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::Ingest {
            seq: 9,
            request: transcript_rag_cli::model::IngestRequest {
                transcript: "text".into(),
                namespace: "ns".into(),
                filename: "a.txt".into(),
            },
        })
        .expect("send");

    match next_event(&mut harness.event_rx).await {
        AppEvent::IngestFinished { seq, result } => {
            assert_eq!(seq, 9);
            let error = result.expect_err("error body should fail");
            assert!(error.contains("Pinecone unavailable"), "error was: {error}");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn delete_event_echoes_the_namespace() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/delete-namespace/ns-gone"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Namespace deleted" })),
        )
        .mount(&server)
        .await;

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::DeleteNamespace {
            seq: 12,
            namespace: "ns-gone".into(),
        })
        .expect("send");

    match next_event(&mut harness.event_rx).await {
        AppEvent::DeleteFinished {
            seq,
            namespace,
            result,
        } => {
            assert_eq!(seq, 12);
            assert_eq!(namespace, "ns-gone");
            result.expect("delete succeeds");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn slow_requests_do_not_block_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!(["summarize"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list-uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uploads": [] })))
        .mount(&server)
        .await;

    let mut harness = spawn_controller(&server);
    harness
        .cmd_tx
        .send(ApiCommand::FetchPrompts { seq: 1 })
        .expect("send");
    harness
        .cmd_tx
        .send(ApiCommand::FetchUploads { seq: 1 })
        .expect("send");

    // The fast fetch overtakes the delayed one.
    match next_event(&mut harness.event_rx).await {
        AppEvent::UploadsLoaded { result, .. } => {
            assert!(result.expect("fetch succeeds").is_empty());
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match next_event(&mut harness.event_rx).await {
        AppEvent::PromptsLoaded { result, .. } => {
            assert_eq!(result.expect("fetch succeeds"), vec!["summarize".to_string()]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn closing_the_command_channel_stops_the_controller() {
    let server = MockServer::start().await;
    let harness = spawn_controller(&server);
    drop(harness.cmd_tx);
    timeout(Duration::from_secs(5), harness.controller)
        .await
        .expect("controller stops")
        .expect("controller task joins")
        .expect("controller exits cleanly");
}
