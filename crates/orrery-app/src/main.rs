//! The binary entry point for the orrery viewer.

use std::path::PathBuf;

use orrery_config::{CliArgs, Config};

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("orrery"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    let args = CliArgs::from_env();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&config));

    if let Err(e) = orrery_app::run(config) {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}
