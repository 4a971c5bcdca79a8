//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, GameEngine, SessionEnd};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{QuestionTree, TreeDisplay};
use crate::infrastructure::StdTerminal;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None | Some(Commands::Play) => cmd_play(&load_settings(cli)?),
        Some(Commands::Seed) => cmd_seed(&load_settings(cli)?),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");
    Ok(settings)
}

fn seed_tree(settings: &Settings) -> CliResult<QuestionTree> {
    QuestionTree::from_seed_tree(&settings.seed)
        .map_err(|e| CliError::from(ApplicationError::from(e)))
}

#[instrument(skip(settings))]
fn cmd_play(settings: &Settings) -> CliResult<()> {
    let tree = seed_tree(settings)?;
    let mut engine = GameEngine::with_tree(settings.game.clone(), tree, StdTerminal::stdio());
    match engine.run()? {
        SessionEnd::Quit => Ok(()),
    }
}

#[instrument(skip(settings))]
fn cmd_seed(settings: &Settings) -> CliResult<()> {
    let tree = seed_tree(settings)?;
    output::header("Seed tree");
    output::info(&tree.to_tree_string());
    output::header(&format!("{}s", settings.game.title_label()));
    for item in tree.items() {
        output::detail(&format!("- {}", item));
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            output::info(&path.display());
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
            Ok(())
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
