use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tetrack_engine::{GameSession, GameSnapshot, SessionConfig};
use tetrack_ocr::{OcrConfig, OcrStateMachine, StateId};
use tetrack_stats::descriptive::DescriptiveStats;
use tracing::info;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Recorded frames, one JSON object per line
    recording: PathBuf,
    /// JSON file with `ocr` and `session` settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// End the game when this level is reached
    #[arg(long)]
    level_cap: Option<u32>,
    /// Level the recorded games start at
    #[arg(long)]
    start_level: Option<u32>,
    /// End games stuck in limbo for 10 seconds
    #[arg(long)]
    limbo_timeout: bool,
    /// Output file path for the snapshots (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Contents of the `--config` file. Missing sections use their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ReplayConfig {
    ocr: OcrConfig,
    session: SessionConfig,
}

impl ReplayConfig {
    fn load(arg: &ReplayArg) -> anyhow::Result<Self> {
        let mut config = match &arg.config {
            Some(path) => util::read_json_file("config", path)?,
            None => ReplayConfig::default(),
        };
        if arg.level_cap.is_some() {
            config.ocr.level_cap = arg.level_cap;
        }
        if let Some(start_level) = arg.start_level {
            config.session.start_level = start_level;
        }
        if arg.limbo_timeout {
            config.ocr.limbo_timeout = true;
        }
        Ok(config)
    }
}

/// One line of replay output.
#[derive(Debug, Serialize)]
struct SnapshotLine<'a> {
    time_ms: u64,
    state: StateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    transition: Option<StateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a GameSnapshot>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let config = ReplayConfig::load(arg)?;
    let frames = util::read_recording(&arg.recording)?;
    let noise = DescriptiveStats::new(frames.iter().map(|frame| frame.noise))
        .with_context(|| format!("No frames in {}", arg.recording.display()))?;
    info!(
        frames = frames.len(),
        recording = %arg.recording.display(),
        "replaying recording"
    );

    let mut machine = OcrStateMachine::new(config.ocr, GameSession::new(config.session));
    let mut output = Output::from_output_path(arg.output.as_deref())?;
    let mut transitions = Vec::new();

    for frame in &frames {
        let transition = machine
            .advance_frame(frame)
            .with_context(|| format!("Failed to evaluate frame at {} ms", frame.time_ms))?;
        if let Some(state) = transition {
            transitions.push((frame.time_ms, state));
        }
        output.write_json_line(&SnapshotLine {
            time_ms: frame.time_ms,
            state: machine.state_id(),
            transition,
            snapshot: machine.session().snapshot(),
        })?;
    }
    output.finish()?;

    let session = machine.session();
    let status = session.status();
    eprintln!("Replayed {} frames", frames.len());
    eprintln!("Final state: {}", machine.state_id());
    eprintln!("Games started: {}", session.games_started());
    eprintln!(
        "Level {} / Lines {} / Score {} (rollovers: {})",
        status.level(),
        status.lines(),
        status.score(),
        session.profile().rollovers()
    );
    eprintln!("Transitions:");
    for (time_ms, state) in &transitions {
        eprintln!("  {time_ms:>8} ms -> {state}");
    }
    eprintln!(
        "Board noise: min {:.3} / median {:.3} / mean {:.3} / max {:.3} / std dev {:.3}",
        noise.min, noise.median, noise.mean, noise.max, noise.std_dev
    );
    Ok(())
}
