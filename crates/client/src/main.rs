use clap::Parser;

use retailops_client::cli::{self, Cli, CliError};
use retailops_observability::LogFormat;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Text };
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    retailops_observability::init_with(format, default_filter);

    let outcome = match cli.client_config() {
        Ok(config) => {
            tracing::debug!(api_url = config.api_url(), "client configured");
            cli::run(cli.command, &config).await
        }
        Err(err) => Err(CliError::from(err)),
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}
