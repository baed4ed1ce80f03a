//! CLI for AntiGen - prompt-to-image generation with simulated progress.

use antigen::{
    AccountClient, AspectRatio, GenerationEvent, GenerationRequest, GenerationSession,
    PollinationsProvider, ProjectConfig, SessionConfig,
};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "antigen")]
#[command(about = "Generate images from text prompts via the Pollinations API")]
#[command(version)]
struct Cli {
    /// The text prompt describing the image
    prompt: String,

    /// Output file path
    #[arg(short, long, default_value = "antigen.jpg")]
    output: PathBuf,

    /// Aspect ratio of the generated image
    #[arg(long, value_enum, default_value = "1:1")]
    ratio: RatioArg,

    /// Model identifier understood by the endpoint
    #[arg(long, default_value = "flux")]
    model: String,

    /// Request higher-effort detail rendering
    #[arg(long)]
    enhance: bool,

    /// Seed influencing the generated output
    #[arg(long)]
    seed: Option<u64>,

    /// Hard deadline for the attempt, in seconds
    #[arg(long, default_value_t = 40)]
    timeout_secs: u64,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "4:3")]
    Standard,
}

impl From<RatioArg> for AspectRatio {
    fn from(arg: RatioArg) -> Self {
        match arg {
            RatioArg::Square => AspectRatio::Square,
            RatioArg::Landscape => AspectRatio::Landscape,
            RatioArg::Portrait => AspectRatio::Portrait,
            RatioArg::Standard => AspectRatio::Standard,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // The account service is an optional collaborator; generation works
    // without a configured project.
    if let Some(project) = ProjectConfig::from_env() {
        let _account = AccountClient::init(project)?;
    }

    let provider = Arc::new(PollinationsProvider::builder().build()?);
    let config =
        SessionConfig::default().with_timeout(Duration::from_secs(cli.timeout_secs));
    let (events, updates) = mpsc::unbounded_channel();
    let session = GenerationSession::new(provider, config, events);

    let renderer = tokio::spawn(render_events(updates));

    let mut request = GenerationRequest::new(&cli.prompt)
        .with_aspect_ratio(cli.ratio.into())
        .with_model(&cli.model)
        .with_enhance(cli.enhance);
    if let Some(seed) = cli.seed {
        request = request.with_seed(seed);
    }

    let result = session.generate(request).await;
    // Closing the event channel lets the renderer drain and finish.
    drop(session);
    renderer.await?;

    // The renderer already showed the user-facing failure message.
    let image = result?;
    image.save(&cli.output)?;

    if cli.json {
        let result = serde_json::json!({
            "success": true,
            "output": cli.output.display().to_string(),
            "size_bytes": image.size(),
            "format": image.format.extension(),
            "ratio": AspectRatio::from(cli.ratio).as_str(),
            "model": image.metadata.model,
            "seed": image.metadata.seed,
            "duration_ms": image.metadata.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated image: {} ({} bytes)",
            cli.output.display(),
            image.size()
        );
        if let Some(duration) = image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}

/// Renders lifecycle events as a carriage-return updated stderr line.
async fn render_events(mut updates: mpsc::UnboundedReceiver<GenerationEvent>) {
    let mut stderr = io::stderr();
    let mut done = false;
    while let Some(event) = updates.recv().await {
        match event {
            GenerationEvent::Started => {}
            GenerationEvent::Progress(update) => {
                // A late reporter tick can trail the completion snapshot;
                // never let it overwrite the final line.
                if !done {
                    let _ = write!(stderr, "\r{}... {}%", update.message, update.percent);
                    let _ = stderr.flush();
                }
            }
            GenerationEvent::Completed(update) => {
                done = true;
                let _ = write!(stderr, "\r{} {}%", update.message, update.percent);
                let _ = stderr.flush();
            }
            GenerationEvent::ImageReady => {
                let _ = writeln!(stderr);
            }
            GenerationEvent::Failed(message) | GenerationEvent::TimedOut(message) => {
                done = true;
                let _ = writeln!(stderr, "\r{message}");
            }
        }
    }
}
