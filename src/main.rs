//! netverify CLI entry point
//!
//! Verifies network device state, captured as output snapshots, against a
//! catalog of declarative checks.

use clap::Parser;
use netverify::catalog::Catalog;
use netverify::cli::args::{CheckArgs, Cli, Command};
use netverify::cli::output::get_formatter;
use netverify::commands::{list, render, validate};
use netverify::platform::snapshot::Snapshot;
use netverify::platform::OutputSource;
use netverify::version::get_build_info;
use netverify::{run_checks, NetVerifyConfig};

use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const RUNTIME_ERROR: u8 = 3;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() { RUNTIME_ERROR } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.verbose);

    match cli.command {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List(args) => print_or_fail(list::run(&args)),
        Command::Commands(args) => print_or_fail(render::run(&args)),
        Command::Validate(args) => match validate::run(&args) {
            Ok(validation) => {
                println!("{}", validation.output);
                if validation.invalid > 0 {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(e) => runtime_error(&e),
        },
        Command::Check(args) => run_check(&args, cli.verbose),
    }
}

/// Log to stderr. `RUST_LOG` applies unless `-v` asks for debug output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("netverify=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_or_fail(output: netverify::Result<String>) -> ExitCode {
    match output {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => runtime_error(&e),
    }
}

fn runtime_error(e: &netverify::NetVerifyError) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(RUNTIME_ERROR)
}

fn run_check(args: &CheckArgs, verbose: bool) -> ExitCode {
    let catalog = match Catalog::load(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => return runtime_error(&e),
    };

    let mut snapshots = Vec::with_capacity(args.snapshots.len());
    for path in &args.snapshots {
        match Snapshot::load(path) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => return runtime_error(&netverify::NetVerifyError::from(e)),
        }
    }
    let devices: Vec<&dyn OutputSource> = snapshots.iter().map(|s| s as &dyn OutputSource).collect();

    let config = NetVerifyConfig {
        fail_fast: args.fail_fast,
        ..NetVerifyConfig::from_args(&args.selection)
    };

    let report = match run_checks(&config, &catalog, &devices) {
        Ok(report) => report,
        Err(e) => return runtime_error(&e),
    };

    let no_color = args.output.no_color || env::var_os("NO_COLOR").is_some();
    let formatter = get_formatter(args.output.format, no_color, verbose, args.output.quiet);
    println!("{}", formatter.format(&report));

    ExitCode::from(report.summary().exit_code())
}
