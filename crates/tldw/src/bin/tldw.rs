use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tldw::{
    export::{render, ExportFormat},
    openai::OpenAIClient,
    tracing::init_tracing_subscriber,
    ProgressSink, ProgressUpdate, SummaryPipelineBuilder, DEFAULT_MAX_CHUNK_CHARS,
};
use yt_transcript::{validate_youtube_url, TranscriptSource, YtTranscriptClient};

#[derive(Parser)]
#[command(name = "tldw", about = "Summarize YouTube videos from their transcripts")]
struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for summarization
    #[arg(long, env = "OPENAI_MODEL", default_value = OpenAIClient::DEFAULT_MODEL)]
    model: String,

    /// Per-segment character budget for chunking
    #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_CHARS)]
    max_chunk_chars: usize,

    /// Concurrent segment summarization calls (1 = sequential)
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a video's transcript, summarize it, and export the result
    Summarize {
        /// YouTube video URL
        url: String,

        /// Export format
        #[arg(long, value_enum, default_value = "md")]
        format: CliFormat,

        /// Output path (defaults to summary_<video-id>.<ext>)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch a video's transcript and print it to stdout
    Transcript {
        /// YouTube video URL
        url: String,
    },
    /// Check whether the API configuration is usable
    Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Txt,
    Md,
    Pdf,
}

impl From<CliFormat> for ExportFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Txt => ExportFormat::PlainText,
            CliFormat::Md => ExportFormat::Markdown,
            CliFormat::Pdf => ExportFormat::Pdf,
        }
    }
}

/// Prints pipeline progress to stderr.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn notify(&self, update: ProgressUpdate) {
        eprintln!("{update}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match &cli.command {
        Command::Summarize { url, format, output } => {
            summarize(&cli, url, (*format).into(), output.clone()).await
        }
        Command::Transcript { url } => transcript(url).await,
        Command::Check => check(&cli),
    }
}

async fn summarize(
    cli: &Cli,
    url: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let video_id = validate_youtube_url(url)?;
    let transcript = fetch_transcript(&video_id).await?;

    let api_key = require_api_key(cli)?;
    let backend = OpenAIClient::new(api_key).with_model(&cli.model);
    let pipeline = SummaryPipelineBuilder::new()
        .backend(backend)
        .progress(StderrProgress)
        .max_chunk_chars(cli.max_chunk_chars)
        .concurrency(cli.concurrency)
        .build();

    let summary = pipeline.run(&transcript).await?;

    let export = render(&summary, format, Some(&video_id))?;
    let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
    std::fs::write(&path, &export.bytes)?;
    println!("Summary written to {} ({}).", path.display(), export.mime_type);
    Ok(())
}

async fn transcript(url: &str) -> anyhow::Result<()> {
    let video_id = validate_youtube_url(url)?;
    let transcript = fetch_transcript(&video_id).await?;
    println!("{transcript}");
    Ok(())
}

async fn fetch_transcript(video_id: &str) -> anyhow::Result<String> {
    eprintln!("Fetching transcript...");
    let fetcher = YtTranscriptClient::new();
    let transcript = fetcher.fetch(video_id).await?;
    eprintln!(
        "Transcript fetched successfully ({} characters).",
        transcript.chars().count()
    );
    Ok(transcript)
}

fn require_api_key(cli: &Cli) -> anyhow::Result<&str> {
    match cli.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => anyhow::bail!(
            "OpenAI API key not configured. Please set OPENAI_API_KEY in your environment or .env file."
        ),
    }
}

fn check(cli: &Cli) -> anyhow::Result<()> {
    let key = require_api_key(cli)?;
    if key.starts_with("sk-") {
        println!("OpenAI configured (model: {}).", cli.model);
    } else {
        println!("API key configured (model: {}).", cli.model);
    }
    Ok(())
}
