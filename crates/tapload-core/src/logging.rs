use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging to `~/.local/state/tapload/tapload.log`.
///
/// Uses the XDG base directory spec via the `xdg` crate to locate the state directory.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tapload")?;
    let log_dir = xdg_dirs.get_state_home();

    fs::create_dir_all(&log_dir)?;
    let log_file_path: PathBuf = log_dir.join("tapload.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    // `Mutex<File>` implements `MakeWriter`, so every event shares one handle.
    let writer = BoxMakeWriter::new(std::sync::Mutex::new(file));

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tapload_core=debug,tapload=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;

    tracing::info!("tapload logging initialized at {}", log_file_path.display());

    Ok(())
}
