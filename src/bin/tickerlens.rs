use tickerlens::config::{parse_timeout_ms, Config};
use tickerlens::models::stock::StockResponse;
use tickerlens::services::aggregator::Aggregator;
use tickerlens::util;

use anyhow::{bail, Context};
use clap::{App, Arg, SubCommand};
use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("tickerlens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Per-symbol equity snapshot: price history, identity and fundamentals in one record")
        .subcommand(
            SubCommand::with_name("quote")
                .about("Fetch and merge the snapshot for one symbol")
                .arg(
                    Arg::with_name("symbol")
                        .short('s')
                        .long("symbol")
                        .value_name("SYMBOL")
                        .help("Ticker symbol, e.g. AAPL")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("range")
                        .short('r')
                        .long("range")
                        .value_name("RANGE")
                        .help("Chart range passed to the price-history source (1mo, 3mo, 1y, ...)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("interval")
                        .short('i')
                        .long("interval")
                        .value_name("INTERVAL")
                        .help("Bar interval passed to the price-history source (1d, 1wk, ...)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("timeout-ms")
                        .long("timeout-ms")
                        .value_name("MILLIS")
                        .help("Upper bound for each upstream fetch")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("chart-base")
                        .long("chart-base")
                        .value_name("URL")
                        .help("Base URL of the price-history source")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("summary-base")
                        .long("summary-base")
                        .value_name("URL")
                        .help("Base URL of the identity source")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("finnhub-base")
                        .long("finnhub-base")
                        .value_name("URL")
                        .help("Base URL of the fundamentals source")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("user-agent")
                        .long("user-agent")
                        .value_name("AGENT")
                        .help("User-Agent header sent to every upstream")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format (json, table)")
                        .takes_value(true)
                        .possible_values(["json", "table"])
                        .default_value("json"),
                )
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .help("Number of sessions shown in table format")
                        .takes_value(true)
                        .default_value("10"),
                ),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("quote") {
        let symbol = matches.value_of("symbol").unwrap_or_default();
        let format = matches.value_of("format").unwrap_or("json");
        let limit = matches
            .value_of("limit")
            .unwrap_or("10")
            .parse::<usize>()
            .context("--limit must be a non-negative integer")?;

        let mut config = Config::from_env().context("reading configuration from environment")?;
        if let Some(range) = matches.value_of("range") {
            config = config.with_chart_range(range);
        }
        if let Some(interval) = matches.value_of("interval") {
            config = config.with_chart_interval(interval);
        }
        if let Some(raw) = matches.value_of("timeout-ms") {
            config = config.with_timeout(parse_timeout_ms(raw)?);
        }
        if let Some(base) = matches.value_of("chart-base") {
            config = config.with_yahoo_chart_base(base);
        }
        if let Some(base) = matches.value_of("summary-base") {
            config = config.with_yahoo_summary_base(base);
        }
        if let Some(base) = matches.value_of("finnhub-base") {
            config = config.with_finnhub_base(base);
        }
        if let Some(agent) = matches.value_of("user-agent") {
            config = config.with_user_agent(agent);
        }

        info!(
            "Using range {} / interval {}, fundamentals {}",
            config.chart_range,
            config.chart_interval,
            if config.finnhub_api_key.is_some() { "enabled" } else { "disabled" }
        );

        let aggregator = Aggregator::from_config(config)?;
        let response = aggregator.aggregate(symbol).await;

        match (&response, format) {
            (StockResponse::Record(record), "table") => {
                print!("{}", util::render_table(record, limit)?);
            }
            _ => {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }

        if let Some(marker) = response.error_marker() {
            error!("{}: {}", symbol, marker);
            bail!("{}", marker);
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}
