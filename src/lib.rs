pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod doctor;
pub mod error;
pub mod runtime;
pub mod summarization;
#[cfg(test)]
mod test_support;
pub mod transcription;
pub mod ui;
pub mod workflow;

use clap::Parser;

use crate::bootstrap::AppPaths;
use crate::cli::{Cli, Command};
use crate::config::load_config;
use crate::doctor::run_doctor;
use crate::error::AppResult;
use crate::runtime::{run_app, status_report, RunArgs};

trait CommandExecutor {
    fn run(&self, config: crate::config::AppConfig, paths: AppPaths, args: RunArgs)
        -> AppResult<()>;
    fn doctor(
        &self,
        paths: &AppPaths,
        config: &crate::config::AppConfig,
        json: bool,
    ) -> AppResult<()>;
    fn status(&self, paths: &AppPaths, config: &crate::config::AppConfig) -> AppResult<()>;
}

struct DefaultCommandExecutor;

impl CommandExecutor for DefaultCommandExecutor {
    fn run(
        &self,
        config: crate::config::AppConfig,
        paths: AppPaths,
        args: RunArgs,
    ) -> AppResult<()> {
        run_app(config, paths, args)
    }

    fn doctor(
        &self,
        paths: &AppPaths,
        config: &crate::config::AppConfig,
        json: bool,
    ) -> AppResult<()> {
        let report = run_doctor(paths, config);
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.render_text());
        }
        Ok(())
    }

    fn status(&self, paths: &AppPaths, config: &crate::config::AppConfig) -> AppResult<()> {
        let report = status_report(config, paths)?;
        println!("{report}");
        Ok(())
    }
}

fn execute_command<E: CommandExecutor>(
    command: Command,
    paths: AppPaths,
    config: crate::config::AppConfig,
    executor: &E,
) -> AppResult<()> {
    match &command {
        Command::Run { .. } => {
            let args = command
                .to_run_args()
                .unwrap_or_default();
            executor.run(config, paths, args)
        }
        Command::Doctor { json } => executor.doctor(&paths, &config, *json),
        Command::Status => executor.status(&paths, &config),
    }
}

pub fn run() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    let cli = Cli::parse();

    let paths = AppPaths::resolve()?;
    paths.ensure_dirs()?;

    let config = load_config(&paths, &cli.to_overrides())?;

    execute_command(cli.command, paths, config, &DefaultCommandExecutor)
}
