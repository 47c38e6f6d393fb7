mod args;
mod domain;
mod output;

use anyhow::{Context, Result};
use spfcheck_lib::check_spf_string_with_options;
use tracing_subscriber::EnvFilter;

use std::io::{self, BufRead};

use args::{Cli, Commands};
use output::OutputRow;

fn init_tracing(verbose: u8) {
    let filter = match args::log_filter(verbose) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let options = cli.check_options();

    let rows = if cli.stdin {
        let mut domains = Vec::new();
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                domains.push(trimmed.to_string());
            }
        }
        domain::check_domains(&domains, &cli, &options)?
    } else if let Some(cmd) = &cli.cmd {
        match cmd {
            Commands::Domain { domain } => {
                domain::check_domains(std::slice::from_ref(domain), &cli, &options)?
            }
            Commands::Record { spf } => {
                let issues = check_spf_string_with_options(spf, &options);
                vec![OutputRow::from_record(spf, &issues)]
            }
        }
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 problèmes SPF ou échec DNS, 1 fatal
    if output::any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}
