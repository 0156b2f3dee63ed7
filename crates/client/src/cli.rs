//! `retailops` command line: parser, command handlers and exit codes.

use clap::{Parser, Subcommand};
use thiserror::Error;

use retailops_core::StockId;
use retailops_inventory::{AdjustmentDirection, AdjustmentDraft, StockQuantity, adjust_detailed};

use crate::api::{ApiError, HttpInventoryGateway, InventoryGateway};
use crate::config::{ClientConfig, ConfigError};
use crate::session::{AdjustmentSession, Notification, SessionError};

/// Stock adjustments against the retailops inventory service.
#[derive(Debug, Parser)]
#[command(name = "retailops")]
#[command(about = "Compute and submit stock adjustments")]
#[command(version)]
pub struct Cli {
    /// Base URL of the inventory service
    #[arg(long = "api-url", env = "RETAILOPS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the inventory service
    #[arg(long = "token", env = "RETAILOPS_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Emit logs as JSON
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute a resulting quantity locally (nothing is sent)
    Compute {
        /// Quantity currently held
        #[arg(long)]
        current: String,
        /// entrada or salida
        #[arg(long)]
        direction: AdjustmentDirection,
        /// Amount to move (positive magnitude)
        #[arg(long)]
        delta: String,
    },
    /// Show one stock row
    Show {
        /// Stock row identifier
        stock_id: StockId,
    },
    /// Stage one adjustment and submit it
    Adjust {
        /// Stock row identifier
        #[arg(long = "stock")]
        stock_id: StockId,
        /// entrada or salida
        #[arg(long)]
        direction: AdjustmentDirection,
        /// Amount to move (positive magnitude)
        #[arg(long)]
        delta: String,
        /// Reason/category code (e.g. ajuste, merma_vencimiento)
        #[arg(long)]
        reason: String,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone())?;
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Operator input was incomplete or invalid.
    #[error("{0}")]
    Input(String),

    /// The inventory service refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The inventory service could not be reached or answered nonsense.
    #[error("{0}")]
    Service(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => 2,
            CliError::Rejected(_) => 1,
            CliError::Service(_) => 69, // EX_UNAVAILABLE
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        let message = err.user_message();
        match err {
            SessionError::Domain(e) if e.is_input_error() => CliError::Input(message),
            SessionError::Domain(_) => CliError::Rejected(message),
            SessionError::Api(ApiError::Rejected { .. }) | SessionError::Api(ApiError::NotFound) => {
                CliError::Rejected(message)
            }
            SessionError::Api(_) => CliError::Service(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Input(format!("invalid client configuration: {err}"))
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        CliError::from(SessionError::Api(err))
    }
}

/// Run a parsed command.
pub async fn run(command: Commands, config: &ClientConfig) -> Result<(), CliError> {
    match command {
        Commands::Compute {
            current,
            direction,
            delta,
        } => {
            for line in compute_lines(&current, direction, &delta) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Show { stock_id } => {
            let gateway = HttpInventoryGateway::new(config)?;
            let stock = gateway.fetch_stock(stock_id).await?;
            println!("{} @ {}", stock.product_name, stock.warehouse_id);
            println!("stock:    {}", stock.stock_id);
            println!("product:  {}", stock.product_id);
            println!("quantity: {}", stock.quantity);
            Ok(())
        }
        Commands::Adjust {
            stock_id,
            direction,
            delta,
            reason,
            note,
        } => {
            let gateway = HttpInventoryGateway::new(config)?;
            let mut session = AdjustmentSession::new(gateway);

            let draft = AdjustmentDraft {
                stock_id: Some(stock_id),
                direction,
                delta,
                reason: Some(reason),
                note: note.unwrap_or_default(),
            };

            let line = session.stage(draft).await?;
            println!(
                "{}: {} -> {} ({} {})",
                line.product_name, line.previous, line.resulting, line.direction, line.delta
            );
            if let Some(warning) = Notification::for_line(line) {
                eprintln!("warning: {}", warning.message);
            }

            let lines = session.batch().len();
            let ack = session.submit().await?;
            println!("{}", Notification::submitted(&ack, lines).message);
            Ok(())
        }
    }
}

/// Output of `compute`, one line per entry.
pub fn compute_lines(current: &str, direction: AdjustmentDirection, delta: &str) -> Vec<String> {
    let outcome = adjust_detailed(
        StockQuantity::from_input(current),
        direction,
        StockQuantity::from_input(delta),
    );

    let mut lines = vec![format!("resulting: {}", outcome.resulting)];
    if outcome.was_clamped() {
        lines.push(format!("shortfall: {} (floored at zero)", outcome.shortfall));
    }
    lines
}
