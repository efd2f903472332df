//! CLI binary for doc2speech.
//!
//! A thin shim over the library crate: the file argument plays the role of
//! the file picker, a terminal progress bar plays the role of the page's
//! progress bar, and the returned audio is written to disk.

use anyhow::{Context, Result};
use clap::Parser;
use doc2speech::intake::media::audio_extension;
use doc2speech::{
    ClientConfig, Doc2SpeechError, IntakeController, IntakeObserver, Notification,
    NotificationKind, SelectedFile, DEFAULT_ENDPOINT,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal observer ────────────────────────────────────────────────────────

/// Renders notifications on stderr and, unless disabled, drives a percentage
/// bar from the controller's progress events.
struct CliObserver {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl CliObserver {
    fn new(show_progress: bool, quiet: bool) -> Arc<Self> {
        let bar = show_progress.then(|| {
            let bar = ProgressBar::hidden();
            bar.set_length(100);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  ⏱ {elapsed_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Uploading");
            bar
        });
        Arc::new(Self { bar, quiet })
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(line),
            _ => eprintln!("{line}"),
        }
    }
}

impl IntakeObserver for CliObserver {
    fn on_notification(&self, n: &Notification) {
        // Errors are shown even in quiet mode.
        let icon = match n.kind {
            NotificationKind::Validation => cyan("⚠"),
            NotificationKind::Service | NotificationKind::Transport => red("✘"),
        };
        self.println(format!("{icon} {}", n.message));
    }

    fn on_submit_start(&self, file_name: &str, size: u64) {
        if let Some(bar) = &self.bar {
            bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            bar.set_position(0);
            bar.enable_steady_tick(Duration::from_millis(80));
        }
        if !self.quiet {
            self.println(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("Uploading {file_name} ({size} bytes)…"))
            ));
        }
    }

    fn on_progress(&self, percent: u8) {
        if let Some(bar) = &self.bar {
            // The final reset to 0 is not worth drawing.
            if percent > 0 {
                bar.set_position(u64::from(percent));
            }
        }
    }

    fn on_submit_finished(&self, succeeded: bool) {
        if let Some(bar) = &self.bar {
            if succeeded {
                bar.set_position(100);
            }
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a PDF; audio written to ./report.<ext>
  doc2speech report.pdf

  # Choose the output file
  doc2speech slides.pptx -o slides.mp3

  # Use a remote conversion service with a 60 s timeout
  doc2speech --endpoint https://tts.example.com/convert --timeout 60 report.pdf

  # Validate and show file details without uploading
  doc2speech --details-only report.pdf

LIMITS:
  Accepted types: application/pdf (.pdf),
                  application/vnd.openxmlformats-officedocument.presentationml.presentation (.pptx)
  Maximum size:   10 MiB (10,485,760 bytes, inclusive)

ENVIRONMENT VARIABLES:
  DOC2SPEECH_ENDPOINT     Conversion endpoint URL
  DOC2SPEECH_OUTPUT       Output audio path
  DOC2SPEECH_TIMEOUT      Request timeout in seconds
  RUST_LOG                Override log filter (e.g. doc2speech=debug)
"#;

/// Convert a PDF or PowerPoint file to speech via a conversion service.
#[derive(Parser, Debug)]
#[command(
    name = "doc2speech",
    version,
    about = "Convert a PDF or PowerPoint file to speech via a conversion service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF (.pdf) or PowerPoint (.pptx) file.
    input: PathBuf,

    /// Write audio to this file instead of `<stem>.<ext>`.
    #[arg(short, long, env = "DOC2SPEECH_OUTPUT")]
    output: Option<PathBuf>,

    /// Conversion endpoint URL.
    #[arg(long, env = "DOC2SPEECH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds.
    #[arg(long, env = "DOC2SPEECH_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Pause before the upload starts, in milliseconds.
    #[arg(long, env = "DOC2SPEECH_SUBMIT_DELAY_MS", default_value_t = 2000)]
    submit_delay_ms: u64,

    /// Declared media type; inferred from the extension when omitted.
    #[arg(long, env = "DOC2SPEECH_MEDIA_TYPE")]
    media_type: Option<String>,

    /// Validate the file and print its details, no upload.
    #[arg(long)]
    details_only: bool,

    /// Print the final view as JSON on stdout.
    #[arg(long, env = "DOC2SPEECH_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOC2SPEECH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2SPEECH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2SPEECH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar carries the user-facing feedback, so library INFO
    // logs are suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.details_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let observer = CliObserver::new(show_progress, cli.quiet);
    let config = ClientConfig::builder()
        .endpoint(cli.endpoint.clone())
        .request_timeout_secs(cli.timeout)
        .submit_delay_ms(cli.submit_delay_ms)
        .observer(observer.clone())
        .build()
        .context("Invalid configuration")?;
    let controller = IntakeController::new(config).context("Failed to create HTTP client")?;

    // ── Intake ───────────────────────────────────────────────────────────
    let loaded = SelectedFile::load(
        &cli.input,
        cli.media_type.as_deref(),
        controller.config().max_file_size,
    )
    .await;
    if let Err(Doc2SpeechError::Validation(e)) = &loaded {
        // Oversized files are refused before they are read; report them
        // the same way the picker would.
        observer.on_notification(&e.into());
    }
    let file = loaded.with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let stem = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());

    // The observer has already printed the notification.
    controller.pick(file).context("File rejected")?;

    if cli.details_only {
        print_view(&controller, cli.json)?;
        return Ok(());
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let result = controller.submit().await.context("Conversion failed")?;
    let audio = controller
        .result_audio()
        .context("Result handle was released before it could be saved")?;

    let output_path = cli.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "{stem}.{}",
            audio_extension(result.content_type.as_deref())
        ))
    });
    write_audio(&output_path, &audio.data).await?;

    if cli.json {
        print_view(&controller, true)?;
    }
    if !cli.quiet {
        eprintln!(
            "{}  {} bytes of audio  →  {}",
            green("✔"),
            result.size,
            bold(&output_path.display().to_string()),
        );
        if let Some(ct) = &result.content_type {
            eprintln!("   {}", dim(ct));
        }
    }

    Ok(())
}

fn print_view(controller: &IntakeController, json: bool) -> Result<()> {
    let view = controller.view();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialise view")?
        );
    } else {
        print!("{view}");
    }
    Ok(())
}

async fn write_audio(path: &Path, data: &[u8]) -> Result<(), Doc2SpeechError> {
    let write_failed = |source| Doc2SpeechError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }
    tokio::fs::write(path, data).await.map_err(write_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_audio_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/talk.mp3");
        write_audio(&path, b"ID3").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"ID3");
    }

    #[tokio::test]
    async fn write_audio_failure_names_the_output() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten with a file.
        let err = write_audio(dir.path(), b"ID3").await.unwrap_err();
        match err {
            Doc2SpeechError::OutputWriteFailed { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected OutputWriteFailed, got {other:?}"),
        }
    }
}
