use clap::{Parser, Subcommand};
use humanctl::motion::DEFAULT_IDLE_DRIFT_MS;
use humanctl::{
    generate_overshoot_path, generate_path, BoundingBox, Config, Error, InputSink, MotionController,
    MouseButton, Point2D, RecordingSink, TracingObserver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "humanctl")]
#[command(about = "Human-looking pointer and keyboard input")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (default: ~/.config/humanctl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the steps as JSON instead of driving the device
    #[arg(long, global = true)]
    dry_run: bool,

    /// Current pointer position as x,y (default: device origin)
    #[arg(long, global = true, value_parser = parse_point)]
    from: Option<Point2D>,
}

#[derive(Subcommand)]
enum Commands {
    /// Move the pointer to a screen position
    Move {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Move into a box and left-click it
    Click {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        width: f64,
        height: f64,
        /// Name reported in the log once clicked
        #[arg(long, default_value = "target")]
        label: String,
    },
    /// Press a mouse button where the pointer is
    Press {
        #[arg(default_value = "left")]
        button: MouseButton,
    },
    /// Type text
    Type { text: String },
    /// Scroll vertically by a pixel amount (positive = down)
    Scroll {
        #[arg(allow_negative_numbers = true)]
        delta: f64,
    },
    /// Let the pointer wander in place
    Idle {
        #[arg(long, default_value_t = DEFAULT_IDLE_DRIFT_MS)]
        duration_ms: u64,
    },
    /// Print a planned path as JSON without moving anything
    Path {
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        y1: f64,
        #[arg(allow_negative_numbers = true)]
        x2: f64,
        #[arg(allow_negative_numbers = true)]
        y2: f64,
        /// Force the overshoot-and-correct variant
        #[arg(long)]
        overshoot: bool,
    },
}

fn parse_point(s: &str) -> Result<Point2D, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Point must be x,y".to_string());
    }
    let x = parts[0].trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point2D::new(x, y))
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("humanctl={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> humanctl::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load()),
    }
}

fn main() -> humanctl::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_ref())?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let start = cli.from.unwrap_or(Point2D::new(
        config.device.origin_x as f64,
        config.device.origin_y as f64,
    ));

    if let Commands::Path {
        x1,
        y1,
        x2,
        y2,
        overshoot,
    } = cli.command
    {
        let mut rng = rng;
        let (from, to) = (Point2D::new(x1, y1), Point2D::new(x2, y2));
        let path = if overshoot {
            generate_overshoot_path(&mut rng, from, to, &config.motion)?
        } else {
            generate_path(&mut rng, from, to, &config.motion)?
        };
        println!("{}", serde_json::to_string_pretty(&path)?);
        return Ok(());
    }

    let mut ctl = MotionController::with_rng(rng, Some(start)).with_observer(Arc::new(TracingObserver));

    if cli.dry_run {
        let mut sink = RecordingSink::new();
        perform(&mut ctl, &mut sink, &cli.command, &config)?;
        info!(elapsed_ms = sink.elapsed_ms(), "dry run complete");
        println!("{}", serde_json::to_string_pretty(sink.steps())?);
        return Ok(());
    }

    run_device(&mut ctl, &cli.command, &config, start)
}

#[cfg(feature = "uinput")]
fn run_device(
    ctl: &mut MotionController,
    command: &Commands,
    config: &Config,
    start: Point2D,
) -> humanctl::Result<()> {
    let mut sink = humanctl::UinputSink::new(&config.device)?;
    let (x, y) = start.rounded();
    sink.set_pointer(x, y);
    perform(ctl, &mut sink, command, config)
}

#[cfg(not(feature = "uinput"))]
fn run_device(
    _ctl: &mut MotionController,
    _command: &Commands,
    _config: &Config,
    _start: Point2D,
) -> humanctl::Result<()> {
    Err(Error::Config(
        "built without uinput support; use --dry-run".to_string(),
    ))
}

fn perform(
    ctl: &mut MotionController,
    sink: &mut dyn InputSink,
    command: &Commands,
    config: &Config,
) -> humanctl::Result<()> {
    match command {
        Commands::Move { x, y } => {
            ctl.move_to(sink, Point2D::new(*x, *y), &config.motion)?;
            debug!(x, y, "moved");
        }
        Commands::Click {
            x,
            y,
            width,
            height,
            label,
        } => {
            let element = BoundingBox::new(*x, *y, *width, *height);
            ctl.move_and_click(sink, &element, label, &config.motion)?;
        }
        Commands::Press { button } => ctl.click(sink, *button)?,
        Commands::Type { text } => ctl.type_text(sink, text, &config.typing)?,
        Commands::Scroll { delta } => ctl.human_scroll(sink, *delta)?,
        Commands::Idle { duration_ms } => ctl.idle_drift(sink, *duration_ms)?,
        Commands::Path { .. } => {
            return Err(Error::Config("path does not drive a sink".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_accepts_negative_origin() {
        let cli = Cli::try_parse_from(["humanctl", "click", "-120", "-40.5", "80", "24"]).unwrap();
        match cli.command {
            Commands::Click { x, y, width, height, .. } => {
                assert_eq!((x, y, width, height), (-120.0, -40.5, 80.0, 24.0));
            }
            _ => panic!("expected click"),
        }
    }

    #[test]
    fn idle_defaults_to_library_duration() {
        let cli = Cli::try_parse_from(["humanctl", "idle"]).unwrap();
        match cli.command {
            Commands::Idle { duration_ms } => assert_eq!(duration_ms, DEFAULT_IDLE_DRIFT_MS),
            _ => panic!("expected idle"),
        }
    }

    #[test]
    fn infinite_move_is_an_error() {
        let cli = Cli::try_parse_from(["humanctl", "--dry-run", "move", "inf", "0"]).unwrap();
        let mut ctl = MotionController::seeded(1, Some(Point2D::new(0.0, 0.0)));
        let mut sink = RecordingSink::new();
        let result = perform(&mut ctl, &mut sink, &cli.command, &Config::default());
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(sink.steps().is_empty());
    }

    #[test]
    fn from_point_parses() {
        assert_eq!(parse_point("10, -5").unwrap(), Point2D::new(10.0, -5.0));
        assert!(parse_point("10").is_err());
    }
}
