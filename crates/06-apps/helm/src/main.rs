//! Interactive console driving a rendering pipeline through its control plane.

mod console;

use anyhow::{Context, Result};
use app::{AppConfig, Application, Inputs, RecordConfig};
use clap::Parser;
use console::EditorConsole;
use dispatcher::{RecordTiming, ReplayConfig, SharedVocabulary};
use headless::HeadlessRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Drive a renderer from an interactive console or a recorded session.
#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive render control plane", long_about = None)]
struct Cli {
    /// Window width requested by `open_window`.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height requested by `open_window`.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Replay a recorded event log instead of reading the console.
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Records to skip at the start of the replay log.
    #[arg(long, default_value_t = 0, value_name = "N")]
    skip: usize,

    /// Records to read from the replay log after skipping (0 reads all).
    #[arg(long, default_value_t = 0, value_name = "N")]
    reads: usize,

    /// Replayed records injected per frame (0 injects all at once).
    #[arg(long, default_value_t = 0, value_name = "N")]
    per_tick: usize,

    /// Append console lines and aborts to this event log.
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,

    /// Record events after dispatching them rather than before.
    #[arg(long)]
    record_after: bool,

    /// Print a notice for input no state recognized.
    #[arg(long)]
    announce_unrecognized: bool,

    /// Milliseconds between frame ticks.
    #[arg(long, default_value_t = 16, value_name = "MS")]
    frame_ms: u64,

    /// Milliseconds between command execution passes.
    #[arg(long, default_value_t = 2, value_name = "MS")]
    exec_ms: u64,

    /// Print the control-plane counters as JSON on exit.
    #[arg(long)]
    stats: bool,
}

impl Cli {
    fn config(&self) -> AppConfig {
        let timing = if self.record_after {
            RecordTiming::AfterDispatch
        } else {
            RecordTiming::BeforeDispatch
        };
        AppConfig {
            width: self.width,
            height: self.height,
            frame_interval: Duration::from_millis(self.frame_ms),
            exec_interval: Duration::from_millis(self.exec_ms.max(1)),
            replay: self.replay.clone().map(|path| ReplayConfig {
                path,
                skip: self.skip,
                max_reads: self.reads,
                per_tick: self.per_tick,
            }),
            record: self
                .record
                .clone()
                .map(|path| RecordConfig { path, timing }),
            announce_unrecognized: self.announce_unrecognized,
            ..AppConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let vocabulary = SharedVocabulary::new();
    let app = Application::builder()
        .renderer(Arc::new(HeadlessRenderer::new()))
        .config(cli.config())
        .vocabulary(vocabulary.clone())
        .build()?;

    let inputs = if cli.replay.is_some() {
        Inputs::default()
    } else {
        let console = EditorConsole::new(vocabulary).context("opening the console")?;
        Inputs {
            console: Some(Box::new(console)),
            window: None,
        }
    };
    let stats = app.run(inputs)?;

    if cli.stats {
        let json = serde_json::to_string_pretty(&stats).context("encoding counters")?;
        println!("{json}");
    }
    Ok(())
}

/// Logs go to stderr so they stay out of the prompt line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_flags_build_config() {
        let cli = Cli::try_parse_from([
            "helm",
            "--replay",
            "session.log",
            "--skip",
            "2",
            "--per-tick",
            "1",
            "--record",
            "out.log",
            "--record-after",
            "--width",
            "640",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(
            config.replay,
            Some(ReplayConfig {
                path: "session.log".into(),
                skip: 2,
                max_reads: 0,
                per_tick: 1,
            })
        );
        assert_eq!(
            config.record.map(|r| r.timing),
            Some(RecordTiming::AfterDispatch)
        );
        assert_eq!((config.width, config.height), (640, 600));
        assert!(!config.announce_unrecognized);
    }

    #[test]
    fn defaults_run_interactively() {
        let cli = Cli::try_parse_from(["helm"]).unwrap();
        let config = cli.config();
        assert!(config.replay.is_none() && config.record.is_none());
        assert_eq!(config.frame_interval, Duration::from_millis(16));
    }
}
