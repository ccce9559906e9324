use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(sportsmatrix_lib::DEFAULT_CONFIG_PATH));

    sportsmatrix_lib::run(&config_path)
}
