use anyhow::{Context, Result};
use guitarmuse::repl;
use guitarmuse_core::PlaybackConfig;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            PlaybackConfig::from_json_str(&json)?
        }
        None => PlaybackConfig::default(),
    };
    log::debug!("playback config: {:?}", config);

    repl::start(config)
}
