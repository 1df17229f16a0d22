//! Command dispatch for the stock ticker source connector.
//!
//! Commands:
//! - `spec`: print the configuration schema
//! - `check --config <path>`: verify the ticker and API key against upstream
//! - `discover --config <path>`: print the stream catalog
//! - `read --config <path> --catalog <path> [--state <path>]`: extract records
//!
//! Exit status is 0 for every recognized command that ran to completion, even
//! when it reports a failed connection. Usage errors and failed reads exit 1.

pub mod telemetry;

use anyhow::{Context as _, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::cell::OnceCell;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use stock_ticker_core::config::load_state;
use stock_ticker_core::{
    Clock, ConnectorSettings, Envelope, EnvelopeWriter, MarketDataProvider, PolygonClient,
    SelectedCatalog, SourceConfig,
};
use tracing::{debug, error};

/// LOG message for an unknown or absent command.
pub const INVALID_COMMAND: &str =
    "Invalid command. Allowable commands: [spec, check, discover, read]";

#[derive(Debug, Parser)]
#[command(
    name = "source-stock-ticker",
    version,
    about = "Source connector emitting daily stock closing prices",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Connector settings (TOML). Defaults to the public Polygon.io endpoint.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the connector's configuration schema.
    Spec,
    /// Check that the configured ticker and API key are accepted upstream.
    Check {
        /// Path to the config JSON.
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the catalog of supported streams.
    Discover {
        /// Path to the config JSON.
        #[arg(long)]
        config: PathBuf,
    },
    /// Extract the trailing week of daily closes.
    Read {
        /// Path to the config JSON.
        #[arg(long)]
        config: PathBuf,

        /// Path to the configured catalog JSON.
        #[arg(long)]
        catalog: PathBuf,

        /// Path to a state JSON. Accepted and ignored.
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

/// Result of interpreting the raw argument list.
#[derive(Debug)]
pub enum Invocation {
    /// A recognized command with all required arguments.
    Run {
        command: Command,
        settings: Option<PathBuf>,
    },
    /// `--help` / `--version` text to print verbatim.
    Info(String),
    /// Unknown command, missing flag, or similar. Reported as a LOG envelope.
    Usage(String),
}

/// Parse `args` (including the program name) into an [`Invocation`].
pub fn parse_invocation<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(Cli {
            settings,
            command: Some(command),
        }) => Invocation::Run { command, settings },
        Ok(Cli { command: None, .. }) => Invocation::Usage(INVALID_COMMAND.to_string()),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Invocation::Info(err.render().to_string())
            }
            ErrorKind::InvalidSubcommand
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Invocation::Usage(INVALID_COMMAND.to_string())
            }
            _ => Invocation::Usage(err.render().to_string().trim_end().to_string()),
        },
    }
}

/// How the process should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion (its payload may still report failure).
    Completed,
    /// Usage error or failed read.
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Failed => 1,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}

/// Hands out the upstream provider to the commands that need one.
pub trait Connector {
    fn connect(&self) -> Result<&dyn MarketDataProvider>;
}

/// Builds the Polygon client on first use.
pub struct PolygonConnector {
    settings: ConnectorSettings,
    client: OnceCell<PolygonClient>,
}

impl PolygonConnector {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }
}

impl Connector for PolygonConnector {
    fn connect(&self) -> Result<&dyn MarketDataProvider> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = PolygonClient::new(&self.settings).context("building HTTP client")?;
        Ok(self.client.get_or_init(|| client))
    }
}

/// Collaborators a command runs against.
pub struct Context<'a> {
    pub connector: &'a dyn Connector,
    pub clock: &'a dyn Clock,
}

/// Report a usage error on the protocol channel.
pub fn report_usage<W: Write>(message: &str, out: &mut EnvelopeWriter<W>) -> Result<Outcome> {
    out.emit(&Envelope::log(message))?;
    Ok(Outcome::Failed)
}

/// Run one command, writing its envelopes to `out`.
///
/// Unreadable or malformed input documents are returned as errors and are
/// fatal to the process.
pub fn execute<W: Write>(
    command: Command,
    ctx: &Context<'_>,
    out: &mut EnvelopeWriter<W>,
) -> Result<Outcome> {
    match command {
        Command::Spec => {
            let envelope = stock_ticker_source::spec().context("embedded spec is malformed")?;
            out.emit(&envelope)?;
            Ok(Outcome::Completed)
        }
        Command::Check { config } => {
            let config = SourceConfig::load(&config).context("loading config")?;
            let provider = ctx.connector.connect()?;
            let status = stock_ticker_source::check(&config, provider, ctx.clock);
            out.emit(&Envelope::connection_status(status))?;
            Ok(Outcome::Completed)
        }
        Command::Discover { config } => {
            SourceConfig::load(&config).context("loading config")?;
            out.emit(&stock_ticker_source::discover())?;
            Ok(Outcome::Completed)
        }
        Command::Read {
            config,
            catalog,
            state,
        } => {
            let config = SourceConfig::load(&config).context("loading config")?;
            let catalog = SelectedCatalog::load(&catalog).context("loading catalog")?;
            if let Some(path) = state {
                load_state(&path).context("loading state")?;
                debug!(path = %path.display(), "state ignored: full refresh only");
            }

            let provider = ctx.connector.connect()?;
            match stock_ticker_source::read(&config, &catalog, provider, ctx.clock, out) {
                Ok(_) => Ok(Outcome::Completed),
                Err(e) => {
                    let Some(message) = e.trace_message() else {
                        return Err(e.into());
                    };
                    error!(error = %e, "read failed");
                    out.emit(&Envelope::trace_error(message, ctx.clock.emitted_at()))?;
                    Ok(Outcome::Failed)
                }
            }
        }
    }
}
