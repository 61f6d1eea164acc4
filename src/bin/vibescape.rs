use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vibescape", version, about = "Evaluate vibescape scene graphs")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate frames and print them as JSON.
    Eval(EvalArgs),
    /// Parse and validate a scene.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Evaluate a single frame at this time in seconds.
    #[arg(long, conflicts_with = "frames")]
    time: Option<f64>,

    /// Evaluate this many frames from t = 0 at `--fps`.
    #[arg(long)]
    frames: Option<u64>,

    /// Frame rate for `--frames`.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Fixed seed for shake/flicker.
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config JSON (seed and audio settings).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Eval(args) => cmd_eval(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_scene(path: &Path) -> anyhow::Result<vibescape::SceneGraph> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let graph: vibescape::SceneGraph = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse scene JSON '{}'", path.display()))?;
    graph
        .validate()
        .with_context(|| format!("validate scene '{}'", path.display()))?;
    Ok(graph)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<vibescape::EngineConfig> {
    let Some(path) = path else {
        return Ok(vibescape::EngineConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Ok(vibescape::EngineConfig::from_json_str(&s)?)
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let graph = read_scene(&args.in_path)?;
    let mut config = read_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let mut evaluator = vibescape::FrameEvaluator::new(config, None);

    let frames = match args.frames {
        Some(n) => {
            let fps = vibescape::Fps::new(args.fps, 1)?;
            vibescape::Ticker::new(fps)
                .take(usize::try_from(n).context("frame count overflows usize")?)
                .map(|tick| evaluator.eval_tick(&graph, tick))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => vec![evaluator.eval_frame(&graph, args.time.unwrap_or(0.0))?],
    };
    tracing::info!(frames = frames.len(), objects = graph.objects.len(), "evaluated");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &frames).context("write frames JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let graph = read_scene(&args.in_path)?;
    eprintln!(
        "ok: {} layers, {} objects, {} components",
        graph.layers.len(),
        graph.objects.len(),
        graph.components.len()
    );
    Ok(())
}
