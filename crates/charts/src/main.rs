//! gridsim-charts - offline dashboard renderer.
//!
//! Consumes a recorded experiment's `summary.csv` and `requests.csv` and
//! writes a static HTML dashboard next to them.

use std::path::PathBuf;

use clap::Parser;
use gridsim_charts::dashboard::render;
use gridsim_charts::discover::latest_comparative_dir;
use gridsim_charts::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gridsim-charts")]
#[command(about = "Render recorded experiment tables into a static chart dashboard")]
struct Cli {
    /// Directory holding summary.csv and requests.csv
    #[arg(long, short = 'i')]
    input_dir: Option<PathBuf>,

    /// Base directory scanned for the newest comparative-* run
    #[arg(long, short = 'b', default_value = "results")]
    results_base: PathBuf,

    /// Output document (relative paths resolve against the input dir)
    #[arg(long, short = 'o', default_value = "charts.html")]
    out: PathBuf,
}

fn run(cli: Cli) -> Result<PathBuf> {
    let input_dir = match cli.input_dir {
        Some(dir) => dir,
        None => latest_comparative_dir(&cli.results_base)?,
    };
    render(&input_dir, &cli.out)
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridsim_charts=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(out_path) => info!("chart dashboard written: {}", out_path.display()),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
