mod renderer;
mod scroll;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use scrolly_core::{Sequencer, SequencerConfig};
use scrolly_protocol::DeviceProfile;
use tracing_subscriber::EnvFilter;

/// Terminal width reported to the device classifier in desktop mode.
const DESKTOP_WIDTH_PX: f64 = 1280.0;
/// Phone-sized width used by `--mobile`.
const MOBILE_WIDTH_PX: f64 = 390.0;

struct Args {
    config: Option<PathBuf>,
    mobile: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        mobile: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--mobile" => args.mobile = true,
            "-h" | "--help" => {
                eprintln!("Usage: scrolly [--mobile] [config.json]");
                std::process::exit(0);
            }
            _ => args.config = Some(PathBuf::from(arg)),
        }
    }
    args
}

/// Log to the file named by `SCROLLY_LOG`. The terminal is in raw mode
/// while the story runs, so nothing is logged without it.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("SCROLLY_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging()?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SequencerConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SequencerConfig::default(),
    };

    let device = if args.mobile {
        DeviceProfile::touch(MOBILE_WIDTH_PX)
    } else {
        DeviceProfile::desktop(DESKTOP_WIDTH_PX)
    };
    let sequencer = Sequencer::mount(config, &device)?;

    renderer::run(sequencer)
}
