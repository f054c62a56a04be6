use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

mod blank_lines;
mod printer;
use printer::RowPrinter;

#[derive(Debug, Parser)]
struct Args {
    #[clap(
        index = 1,
        default_value = "quarterly_data.csv",
        help = "Path to the CSV file whose rows are printed"
    )]
    input_file: String,
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut printer = RowPrinter::new(args.input_file);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let res = printer.run(&mut out);
    // Rows printed before a failure are still emitted
    let flushed = out.flush();

    if let Err(err) = res {
        error!(%err, "row printing aborted");
        eprintln!("Error: {}", err);
        process::exit(1);
    }
    if let Err(err) = flushed {
        eprintln!("Error: failed to flush output: {}", err);
        process::exit(1);
    }
}
