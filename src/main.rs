mod cli;
mod domain;
mod services;
mod utils;

use std::{io, process::ExitCode};

use anyhow::{Context, Error};
use clap::Parser;

use crate::{cli::{summary, Cli}, services::renamer::Renamer, utils::config::EnvConfig};

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = EnvConfig::load().context("Cannot start without HOME, USER and PWD")?;
    log::debug!("Running as {} in {} (home: {})", config.user, config.pwd.display(), config.home.display());

    let renamer = Renamer::new(&config, cli.rename_options(), cli.ignore_set());
    let report = renamer.run(&cli.files[..]);

    if !cli.wants_summary() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if cli.json {
        summary::write_json_summary(&mut stdout, &report, cli.dry_run)?;
    } else {
        summary::write_summary(&mut stdout, &report, cli.dry_run)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logger();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too
            if let Err(print_err) = err.print() {
                log::error!("Failed to print the usage message: {}", print_err);
                return ExitCode::FAILURE;
            }
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
