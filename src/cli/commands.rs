//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{CheckOverrides, TreeSource};
use crate::application::ApplicationError;
use crate::cli::args::{CheckArgs, Cli, Commands, ConfigCommands, TreeInput};
use crate::cli::error::{balance_exit_code, CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Report, Side, Verdict};
use crate::exitcode;
use crate::infrastructure::ServiceContainer;

/// Run the parsed command line. Returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see 'treebal --help'".to_string(),
        ));
    };

    // completions must work even with a broken config
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let settings = Settings::load(cli.config_dir.as_deref())?;
    debug!(?settings, "settings loaded");
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Check { input, limits } => _check(&container, input, limits),
        Commands::Show { input, flat } => _show(&container, input, *flat),
        Commands::Chain {
            length,
            side,
            limits,
        } => _chain(&container, *length, *side, limits),
        Commands::Config { command } => _config(&container, cli, command),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

impl TreeInput {
    pub fn source(&self) -> CliResult<TreeSource> {
        match (&self.tree, &self.file, &self.table) {
            (Some(text), None, None) => Ok(TreeSource::LevelOrder(text.clone())),
            (None, Some(path), None) => Ok(TreeSource::LevelOrderFile(path.clone())),
            (None, None, Some(path)) => Ok(TreeSource::TableFile(path.clone())),
            _ => Err(CliError::InvalidArgs(
                "give exactly one of TREE, --file, --table".to_string(),
            )),
        }
    }
}

impl From<&CheckArgs> for CheckOverrides {
    fn from(args: &CheckArgs) -> Self {
        CheckOverrides {
            max_depth: args.max_depth,
            strategy: args.strategy,
        }
    }
}

#[instrument(skip(container))]
fn _check(container: &ServiceContainer, input: &TreeInput, limits: &CheckArgs) -> CliResult<i32> {
    let source = input.source()?;
    let result = container.balance.check(&source, &limits.into());
    report_outcome(result)
}

#[instrument(skip(container))]
fn _chain(
    container: &ServiceContainer,
    length: usize,
    side: Side,
    limits: &CheckArgs,
) -> CliResult<i32> {
    output::header(&format!("chain of {} nodes, each child on the {}", length, side));
    let result = container.balance.check_chain(length, side, &limits.into());
    report_outcome(result)
}

/// Print the verdict, or the failure kind when the check was aborted.
fn report_outcome(result: Result<Report, ApplicationError>) -> CliResult<i32> {
    match result {
        Ok(Report {
            verdict: Verdict::Balanced { height },
            nodes_visited,
        }) => {
            output::success(&format!(
                "balanced (height {}, {} nodes visited)",
                height, nodes_visited
            ));
            Ok(exitcode::OK)
        }
        Ok(Report {
            verdict: Verdict::Unbalanced,
            nodes_visited,
        }) => {
            output::failure(&format!(
                "not balanced (stopped after {} nodes)",
                nodes_visited
            ));
            Ok(exitcode::UNBALANCED)
        }
        Err(ApplicationError::Balance(e)) => {
            output::aborted(e.kind(), &e);
            Ok(balance_exit_code(&e))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, input: &TreeInput, flat: bool) -> CliResult<i32> {
    let source = input.source()?;
    if flat {
        match container.balance.level_order(&source)? {
            Some(text) => output::info(&text),
            None => {
                return Err(CliError::InvalidArgs(
                    "--flat is not available for node tables".to_string(),
                ))
            }
        }
    } else {
        output::info(&container.balance.render(&source)?);
    }
    Ok(exitcode::OK)
}

fn _config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "global: {}{}",
                    path.display(),
                    exists_marker(path.exists())
                )),
                None => output::detail("global: <no config directory on this platform>"),
            }
            let local_dir = match &cli.config_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().map_err(|e| ApplicationError::OperationFailed {
                    context: "resolve current directory".to_string(),
                    source: Box::new(e),
                })?,
            };
            let local = local_config_path(&local_dir);
            output::detail(&format!(
                "local:  {}{}",
                local.display(),
                exists_marker(local.exists())
            ));
            output::detail("env:    TREEBAL_MAX_DEPTH, TREEBAL_STRATEGY, TREEBAL_DISPLAY_DEPTH");
        }
    }
    Ok(exitcode::OK)
}

fn exists_marker(exists: bool) -> &'static str {
    if exists {
        ""
    } else {
        " (not found)"
    }
}
