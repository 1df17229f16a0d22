//! `source-stock-ticker`: stock ticker source connector.

use anyhow::{Context as _, Result};
use std::process::ExitCode;
use stock_ticker_cli::telemetry::init_logging;
use stock_ticker_cli::{
    execute, parse_invocation, report_usage, Context, Invocation, Outcome, PolygonConnector,
};
use stock_ticker_core::{ConnectorSettings, EnvelopeWriter, SystemClock};

fn main() -> Result<ExitCode> {
    init_logging();

    let invocation = parse_invocation(std::env::args_os());
    let stdout = std::io::stdout();
    let mut out = EnvelopeWriter::new(stdout.lock());

    let outcome = match invocation {
        Invocation::Info(text) => {
            print!("{text}");
            Outcome::Completed
        }
        Invocation::Usage(message) => report_usage(&message, &mut out)?,
        Invocation::Run { command, settings } => {
            let settings = ConnectorSettings::load_or_default(settings.as_deref())
                .context("loading connector settings")?;
            let connector = PolygonConnector::new(settings);
            let ctx = Context {
                connector: &connector,
                clock: &SystemClock,
            };
            execute(command, &ctx, &mut out)?
        }
    };

    Ok(outcome.into())
}
