use crate::api::ApiClient;
use crate::model::{
    format_upload_time, AskRequest, IngestRequest, PromptRunRequest, DEFAULT_BASE_URL,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::Path;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "transcript-rag-cli",
    version,
    about = "Terminal client for the transcript RAG service"
)]
pub struct Cli {
    /// Base URL of the transcript service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print JSON instead of text (one-shot modes only)
    #[arg(long)]
    pub json: bool,

    /// List available prompt templates and exit (no TUI)
    #[arg(long)]
    pub prompts: bool,

    /// List past uploads and exit (no TUI)
    #[arg(long)]
    pub list: bool,

    /// Upload a transcript file and exit (no TUI)
    #[arg(long)]
    pub upload: Option<std::path::PathBuf>,

    /// With --upload, also process the transcript into the vector DB
    #[arg(long, requires = "upload")]
    pub ingest: bool,

    /// Run a prompt template against an upload and exit (no TUI)
    #[arg(long, requires = "namespace")]
    pub run_prompt: Option<String>,

    /// Ask a free-form question against an upload and exit (no TUI)
    #[arg(long, requires = "namespace")]
    pub ask: Option<String>,

    /// Namespace of the upload that --run-prompt or --ask targets
    #[arg(long)]
    pub namespace: Option<String>,

    /// Read transcript text for --run-prompt from a file; without it the
    /// backend answers from the vector store alone
    #[arg(long)]
    pub transcript_file: Option<std::path::PathBuf>,

    /// Delete an uploaded namespace and exit (no TUI)
    #[arg(long)]
    pub delete: Option<String>,

    /// Skip the confirmation prompt for --delete
    #[arg(long)]
    pub yes: bool,

    /// Log file path for the TUI (defaults to the user data dir)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

fn one_shot_count(args: &Cli) -> usize {
    [
        args.prompts,
        args.list,
        args.upload.is_some(),
        args.run_prompt.is_some(),
        args.ask.is_some(),
        args.delete.is_some(),
    ]
    .iter()
    .filter(|on| **on)
    .count()
}

pub async fn run(args: Cli) -> Result<()> {
    let one_shots = one_shot_count(&args);
    if one_shots > 1 {
        anyhow::bail!(
            "pick one of --prompts, --list, --upload, --run-prompt, --ask, --delete"
        );
    }
    if args.json && one_shots == 0 {
        anyhow::bail!("--json only applies to one-shot modes");
    }

    if one_shots == 0 {
        #[cfg(feature = "tui")]
        {
            let log_path = crate::logging::init_file(args.log_file.clone())?;
            tracing::info!(log = %log_path.display(), base_url = %args.base_url, "starting TUI");
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            anyhow::bail!("built without the tui feature; pass a one-shot flag");
        }
    }

    crate::logging::init_stderr();
    let api = ApiClient::new(&args.base_url)?;

    if args.prompts {
        return print_prompts(&api, args.json).await;
    }
    if args.list {
        return print_uploads(&api, args.json).await;
    }
    if let Some(path) = args.upload.clone() {
        return upload_file(&api, &args, &path).await;
    }
    if let Some(prompt) = args.run_prompt.clone() {
        return run_prompt(&api, &args, &prompt).await;
    }
    if let Some(query) = args.ask.clone() {
        return ask(&api, &args, &query).await;
    }
    if let Some(namespace) = args.delete.clone() {
        return delete_namespace(&api, &args, &namespace).await;
    }
    Ok(())
}

async fn print_prompts(api: &ApiClient, json: bool) -> Result<()> {
    let prompts = api.list_prompts().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&prompts)?);
    } else if prompts.is_empty() {
        println!("No prompts available");
    } else {
        for name in prompts {
            println!("{name}");
        }
    }
    Ok(())
}

async fn print_uploads(api: &ApiClient, json: bool) -> Result<()> {
    let uploads = api.list_uploads().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&uploads)?);
        return Ok(());
    }
    if uploads.is_empty() {
        println!("No uploads found");
        return Ok(());
    }
    for record in uploads {
        println!(
            "{}  {}  {}",
            record.namespace,
            format_upload_time(&record.uploaded_at),
            record.filename
        );
    }
    Ok(())
}

async fn upload_file(api: &ApiClient, args: &Cli, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("path has no usable file name: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let outcome = api.upload_transcript(file_name, bytes).await?;

    if args.ingest {
        let request = IngestRequest {
            transcript: outcome.transcript_text.clone(),
            namespace: outcome.namespace.clone(),
            filename: outcome.filename.clone(),
        };
        api.ingest_transcript(&request).await?;
    }

    if args.json {
        let summary = serde_json::json!({
            "namespace": outcome.namespace,
            "filename": outcome.filename,
            "ingested": args.ingest,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Uploaded {} as namespace {}",
            outcome.filename, outcome.namespace
        );
        if args.ingest {
            println!("Processed into the vector database");
        }
    }
    Ok(())
}

async fn run_prompt(api: &ApiClient, args: &Cli, prompt: &str) -> Result<()> {
    let Some(namespace) = args.namespace.clone() else {
        anyhow::bail!("--run-prompt needs --namespace");
    };
    let transcript_text = match args.transcript_file.as_deref() {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read {}", path.display()))?,
        None => String::new(),
    };
    let request = PromptRunRequest {
        transcript_text,
        prompt_name: prompt.to_string(),
        namespace,
    };
    let result = api.run_prompt(&request).await?;
    if args.json {
        let summary = serde_json::json!({ "response": result });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

async fn ask(api: &ApiClient, args: &Cli, query: &str) -> Result<()> {
    let Some(namespace) = args.namespace.clone() else {
        anyhow::bail!("--ask needs --namespace");
    };
    let request = AskRequest {
        query: query.to_string(),
        namespace,
    };
    let outcome = api.ask(&request).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.response);
        if !outcome.matches.is_empty() {
            println!();
            println!("Retrieved context:");
            println!("{}", outcome.matches);
        }
    }
    Ok(())
}

async fn delete_namespace(api: &ApiClient, args: &Cli, namespace: &str) -> Result<()> {
    if !args.yes {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("refusing to delete without --yes when stdin is not a terminal");
        }
        eprint!("Delete namespace {namespace} and all its vectors? [y/N] ");
        std::io::stderr().flush().ok();
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("read confirmation")?;
        let answer = answer.trim().to_ascii_lowercase();
        if answer != "y" && answer != "yes" {
            println!("Aborted");
            return Ok(());
        }
    }
    api.delete_namespace(namespace).await?;
    if args.json {
        let summary = serde_json::json!({ "deleted": namespace });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Deleted namespace {namespace}");
    }
    Ok(())
}
