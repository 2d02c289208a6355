use anyhow::Context;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use native_gles::headless::dry_run;
use native_gles::AppConfig;

/// Environment variable overriding the desktop log level, e.g. `NATIVE_GLES_LOG=debug`.
const LOG_ENV: &str = "NATIVE_GLES_LOG";

fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(config.max_level);
    SimpleLogger::new().with_utc_timestamps().with_colors(true).with_level(level).init()?;

    info!("No device here, replaying a scripted session against a headless GL");
    let log = dry_run(&config).context("Dry run")?;
    for call in log.calls() {
        println!("{:?}", call);
    }
    Ok(())
}
