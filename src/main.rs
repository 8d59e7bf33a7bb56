use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use mortgage_calculator::report::{self, ScheduleReport};
use mortgage_calculator::{calculate, InputDataRepository, PrintOptions};

/// Mortgage amortization schedule calculator
#[derive(Parser)]
#[command(
    name = "mortgage-calculator",
    version,
    about = "Compute a month-by-month mortgage schedule with overpayments",
    long_about = "Reads loan parameters from a `key;value` file, computes the amortization \
                  schedule for equal or decreasing installments, applies the overpayment \
                  schema and prints a summary of interest and provisions paid."
)]
struct Cli {
    /// Parameter file
    #[arg(short, long, default_value = "input_data.txt")]
    input: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Print the schedule regardless of the file's setting
    #[arg(long)]
    print_schedule: bool,

    /// Print every n-th rate of the schedule
    #[arg(long)]
    rate_number: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!(error = %e, "calculation failed");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = InputDataRepository::new(&cli.input).read()?;

    if cli.print_schedule || cli.rate_number.is_some() {
        params = params.with_print_options(PrintOptions {
            print_schedule: cli.print_schedule || params.print_options.print_schedule,
            rate_number_to_print: cli
                .rate_number
                .unwrap_or(params.print_options.rate_number_to_print),
        });
    }

    let result = calculate(&params)?;

    match cli.format {
        OutputFormat::Json => {
            let report = ScheduleReport::new(&params, &result.rates, result.summary);
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text => {
            println!("{}\n", report::format_input(&params));
            for rate in report::select_rates(&result.rates, &params.print_options) {
                println!("{}", report::format_rate(rate));
            }
            println!("\n{}", report::format_summary(&result.summary));
        }
    }

    Ok(())
}
