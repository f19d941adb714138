use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ivplot::{run_ivplot, ChartVariant, IvPlotConfig};

/// Option IV / price chart viewer.
#[derive(Parser, Debug)]
#[command(name = "ivplot", version, about = "Option IV / price chart viewer")]
struct Cli {
    /// Chart to show: `atm`, `smile` or `iv`.
    #[arg(default_value = "iv")]
    variant: ChartVariant,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the data endpoints (overrides config and environment).
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the data endpoints.
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut cfg = match IvPlotConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.base_url {
        cfg.base_url = url;
    }
    if cli.token.is_some() {
        cfg.auth_token = cli.token;
    }
    if let Some(secs) = cli.timeout_secs {
        cfg.request_timeout = std::time::Duration::from_secs(secs);
    }

    if let Err(e) = run_ivplot(cfg, cli.variant) {
        log::error!("viewer exited with an error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
