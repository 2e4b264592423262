use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub enum LogTarget {
    /// One-shot CLI modes.
    Stderr,
    /// TUI mode: keep the alternate screen clean.
    File,
}

pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("invtop").join("invtop.log"))
}

/// `RUST_LOG` wins; otherwise the configured level, or debug with `--verbose`.
pub fn filter_for(level: &str, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { level };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(level: &str, verbose: bool, target: LogTarget) -> Result<()> {
    let filter = filter_for(level, verbose);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match target {
        LogTarget::Stderr => {
            builder.with_writer(std::io::stderr).try_init().map_err(|e| anyhow::anyhow!(e))?;
        }
        LogTarget::File => {
            let path = log_path().ok_or_else(|| anyhow::anyhow!("no data dir"))?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}
