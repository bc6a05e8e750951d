//! Download daily OHLCV history into a CSV snapshot.
//!
//! ```text
//! fetch-history --ticker INFY.NS --period 5y --output infosys_stock_data.csv --summary --plot close.png
//! ```

use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use stockscope::charts::{Chart, ChartKind, PlottersRasterizer, Series, SeriesStyle};
use stockscope::config::DashboardConfig;
use stockscope::logging;
use stockscope::models::{Period, PriceHistory};
use stockscope::services::snapshot::write_snapshot;
use stockscope::services::summary::{describe, missing_values, SummaryTable};
use stockscope::services::{MarketDataProvider, YahooMarketDataProvider};
use tracing::{error, info};

const HEAD_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "fetch-history",
    about = "Download daily OHLCV history into a CSV snapshot"
)]
struct Args {
    /// Yahoo Finance symbol
    #[arg(long, default_value = "INFY.NS")]
    ticker: String,

    /// History window: 1y, 2y, 5y or 10y
    #[arg(long, default_value = "5y")]
    period: Period,

    /// Snapshot file, overwritten on every run
    #[arg(long, default_value = "infosys_stock_data.csv")]
    output: PathBuf,

    /// Print the first rows and summary statistics
    #[arg(long)]
    summary: bool,

    /// Render the closing price to this PNG
    #[arg(long)]
    plot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();
    let args = Args::parse();

    let provider = YahooMarketDataProvider::new();
    let rows = provider.fetch_history(&args.ticker, args.period).await?;
    let history = PriceHistory::from_rows(rows);
    if history.is_empty() {
        error!(ticker = %args.ticker, period = %args.period, "No rows returned");
        return Err(format!("no data found for {} over {}", args.ticker, args.period).into());
    }

    write_snapshot(&args.output, history.rows())?;
    info!(
        ticker = %args.ticker,
        rows = history.len(),
        output = %args.output.display(),
        "Snapshot written"
    );

    if args.summary {
        println!(
            "{:<12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for row in history.rows().iter().take(HEAD_ROWS) {
            println!(
                "{:<12} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12}",
                row.date().format("%Y-%m-%d"),
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume
            );
        }
        println!();
        println!("Missing Values:");
        for (column, missing) in missing_values(history.rows()) {
            println!("{:<8} {:>6}", column, missing);
        }
        println!();
        println!("{}", SummaryTable(&describe(history.rows())));
    }

    if let Some(path) = &args.plot {
        let chart = Chart {
            kind: ChartKind::Price,
            title: format!("{} Closing Price", args.ticker.trim().to_uppercase()),
            dates: history.rows().iter().map(|r| r.date()).collect(),
            series: vec![Series::new(
                "Close",
                SeriesStyle::Line,
                [31, 119, 180],
                history.closes().into_iter().map(Some).collect(),
            )],
        };
        let rasterizer = PlottersRasterizer::from_config(&DashboardConfig::from_env());
        let image = rasterizer.render(&chart)?;
        std::fs::write(path, &image.png)?;
        info!(path = %path.display(), "Closing price chart written");
    }

    Ok(())
}
