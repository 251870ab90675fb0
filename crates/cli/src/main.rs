// fundcheck - validate a fund sheet against the document registry and the identity service

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use run::{execute, resolve_settings, summary_json, CliError, Overrides};

#[derive(Parser)]
#[command(name = "fundcheck")]
#[command(about = "Validate fund CNPJs against the document registry and identity service")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Environment:
  MZ_IQ_FUNDS_DATA_URL    identity service base URL
  MZ_IQ_API_KEY           identity service key (mz-internal-app header)
  FUNDCHECK_REGISTRY_URL  document registry search endpoint
  FUNDCHECK_INPUT         input spreadsheet
  FUNDCHECK_OUTPUT        report path
  FUNDCHECK_TIMEOUT_SECS  per-request timeout (default 10)
  RUST_LOG                log filter (default info)")]
struct Cli {
    /// Config file [default: <config dir>/fundcheck/config.toml, if present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input spreadsheet (xlsx, xls, xlsb, ods) or CSV/TSV
    #[arg(long, short = 'i', value_name = "PATH")]
    input: Option<PathBuf>,

    /// Report path; .csv/.tsv write delimited text, anything else xlsx
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Header of the column holding the CNPJ [default: CNPJ]
    #[arg(long, value_name = "NAME")]
    cnpj_column: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nrecon:   fundcheck-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging();

    let overrides = Overrides {
        config: cli.config,
        input: cli.input,
        output: cli.output,
        cnpj_column: cli.cnpj_column,
    };

    let result = resolve_settings(&overrides).and_then(|settings| execute(&settings));

    match result {
        Ok(outcome) => {
            if cli.json {
                match serde_json::to_string_pretty(&summary_json(&outcome)) {
                    Ok(text) => println!("{}", text),
                    Err(e) => eprintln!("warning: cannot serialize summary: {}", e),
                }
            }
            eprintln!("fund data verification completed successfully");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            eprintln!("fund data verification failed");
            ExitCode::from(code)
        }
    }
}
