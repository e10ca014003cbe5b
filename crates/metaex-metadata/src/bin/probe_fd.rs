use anyhow::{Context, Result, bail};
use metaex_metadata::{FfmpegProbe, ProbeConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let Some(path) = std::env::args_os().nth(1) else {
    bail!("usage: probe_fd <audio file>");
  };

  let config = ProbeConfig::load().context("loading [probe] config")?;
  let probe = FfmpegProbe::with_config(&config);

  let file = std::fs::File::open(&path).with_context(|| format!("opening {}", path.to_string_lossy()))?;
  let result = probe.extract_sync(raw_fd(&file));

  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}

#[cfg(unix)]
fn raw_fd(file: &std::fs::File) -> i32 {
  use std::os::fd::AsRawFd;
  file.as_raw_fd()
}

// Without per-descriptor links the lookup fails and the result carries that status.
#[cfg(not(unix))]
fn raw_fd(_file: &std::fs::File) -> i32 {
  -1
}
