use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use avro_csv::diagnostics::TracingDiagnostics;
use avro_csv::schema_to_json;
use avro_csv_core::{csv::is_valid_delimiter, export_file, ExportError, ExportOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "avrocsv")]
#[command(about = "Export an Avro object container file as CSV on stdout", long_about = None)]
struct Cli {
    /// Input Avro container file
    file: PathBuf,

    /// Field delimiter for the CSV output
    #[arg(short, long, default_value_t = ',', value_parser = parse_delimiter)]
    delimiter: char,

    /// Skip rows whose values cannot be rendered instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Print the parsed schema as JSON and exit
    #[arg(long)]
    print_schema: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_delimiter(arg: &str) -> Result<char, String> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_valid_delimiter(c) => Ok(c),
        (Some(c), None) => Err(format!("{:?} cannot separate fields", c)),
        _ => Err("expected a single character".to_owned()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log to stderr so stdout carries nothing but CSV
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ExportError> {
    if cli.print_schema {
        let file = File::open(&cli.file).map_err(|source| ExportError::Open {
            path: cli.file.clone(),
            source,
        })?;
        println!("{}", schema_to_json(file)?);
        return Ok(());
    }

    let options = ExportOptions {
        delimiter:    cli.delimiter,
        skip_invalid: cli.skip_invalid,
    };
    let stdout = io::stdout();
    export_file(&cli.file, stdout.lock(), TracingDiagnostics, &options)?;
    Ok(())
}
