use clap::Parser;
use dotnet_sdkgen::cli::{run_cli, Cli};
use dotnet_sdkgen::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    init_logging(&log_config)?;

    run_cli(cli)
}
