//! Command dispatch: loads settings and seed, runs the selected command.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::session::HELP;
use crate::application::{load_seed, Command, EditorSession, IoResultExt, Outcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{self, RenderConfig, Settings};
use crate::domain::{TreeNode, TreeStore};
use crate::tree_traits::{format_table, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().map_err(|e| CliError::io("current directory", e))?;
    let settings = Settings::load(Some(cwd.as_path()))?;
    let seed = cli.seed.clone().or_else(|| settings.seed_file.clone());
    debug!(?seed, ?settings, "resolved settings");

    match &cli.command {
        Some(Commands::Show { ids }) => {
            let options = RenderConfig {
                show_ids: *ids || settings.render.show_ids,
            };
            _show(&require_store(seed.as_deref())?, &options)
        }
        Some(Commands::Table) => _table(&require_store(seed.as_deref())?),
        Some(Commands::Get { id }) => _get(&require_store(seed.as_deref())?, id),
        Some(Commands::Children { id, all }) => {
            _children(&require_store(seed.as_deref())?, id, *all)
        }
        Some(Commands::Ancestors { id }) => _ancestors(&require_store(seed.as_deref())?, id),
        Some(Commands::Edit { script }) => _edit(seed.as_deref(), script.as_deref(), &settings),
        Some(Commands::Config { command }) => _config(command, &settings, &cwd),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn require_store(seed: Option<&Path>) -> CliResult<TreeStore> {
    let path = seed.ok_or_else(|| {
        CliError::Usage("no seed file: pass --seed or set seed_file in the config".to_string())
    })?;
    Ok(TreeStore::from_items(load_seed(path)?))
}

fn print_nodes(nodes: &[&TreeNode]) {
    if nodes.is_empty() {
        output::detail(&"(none)");
    }
    for node in nodes {
        output::detail(node);
    }
}

#[instrument(skip(store))]
fn _show(store: &TreeStore, options: &RenderConfig) -> CliResult<()> {
    output::info(&store.to_tree_string(options));
    Ok(())
}

#[instrument(skip(store))]
fn _table(store: &TreeStore) -> CliResult<()> {
    output::info(&format_table(&store.table_rows()));
    Ok(())
}

#[instrument(skip(store))]
fn _get(store: &TreeStore, id: &str) -> CliResult<()> {
    match store.get_item_by_id(id) {
        Some(node) => {
            output::header(node);
            match &node.parent {
                Some(parent) => output::detail(&format!("parent: {}", parent)),
                None => output::detail(&"parent: (root)"),
            }
            Ok(())
        }
        None => {
            output::warning(&format!("no node with id {}", id));
            Ok(())
        }
    }
}

#[instrument(skip(store))]
fn _children(store: &TreeStore, id: &str, all: bool) -> CliResult<()> {
    let nodes = if all {
        store.get_all_children(id)
    } else {
        store.get_children(id)
    };
    print_nodes(&nodes);
    Ok(())
}

#[instrument(skip(store))]
fn _ancestors(store: &TreeStore, id: &str) -> CliResult<()> {
    print_nodes(&store.get_all_parents(id));
    Ok(())
}

#[instrument(skip(settings))]
fn _edit(seed: Option<&Path>, script: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let items = match seed {
        Some(path) => load_seed(path)?,
        None => Vec::new(),
    };
    let mut session = EditorSession::new(items, settings.history_limit);

    match script {
        Some(path) => {
            let file = File::open(path).with_path_context("open script", path)?;
            run_session(&mut session, BufReader::new(file), false, &settings.render)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            if interactive {
                output::header(&"treestore editor, type 'help' for commands");
            }
            run_session(&mut session, stdin.lock(), interactive, &settings.render)
        }
    }
}

/// Reads commands line by line until EOF or `quit`.
///
/// Interactive sessions report failures and keep going; scripts stop at the
/// first failure.
pub fn run_session<R: BufRead>(
    session: &mut EditorSession,
    reader: R,
    interactive: bool,
    options: &RenderConfig,
) -> CliResult<()> {
    let mut lines = reader.lines();
    loop {
        if interactive {
            output::prompt(&"treestore>");
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| CliError::io("read command", e))?;

        let result = Command::parse(&line).and_then(|command| match command {
            Some(command) => session.apply(command).map(Some),
            None => Ok(None),
        });

        match result {
            Ok(Some(Outcome::Quit)) => break,
            Ok(Some(outcome)) => present(session, &outcome, options),
            Ok(None) => {}
            Err(e) if interactive => output::error(&e),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn present(session: &EditorSession, outcome: &Outcome, options: &RenderConfig) {
    match outcome {
        Outcome::Added(_) | Outcome::Removed(_) | Outcome::Updated(_) => output::success(outcome),
        Outcome::Undone | Outcome::Redone => output::action("history", outcome),
        Outcome::NothingToUndo | Outcome::NothingToRedo => output::warning(outcome),
        Outcome::ShowTree => output::info(&session.store().to_tree_string(options)),
        Outcome::ShowTable => output::info(&format_table(&session.store().table_rows())),
        Outcome::Nodes(nodes) => print_nodes(&nodes.iter().collect::<Vec<_>>()),
        Outcome::Help => output::info(&format!("{}\n", HELP)),
        Outcome::Quit => {}
    }
}

#[instrument(skip(settings))]
fn _config(command: &ConfigCommands, settings: &Settings, cwd: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            let global = config::global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("global", &global);
            output::action("local", &config::local_config_path(cwd).display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn session() -> EditorSession {
        EditorSession::new(vec![TreeNode::root(1, "Root")], 0)
    }

    #[test]
    fn given_script_when_running_then_applies_commands_until_quit() {
        let mut session = session();
        let script = "add 1 A\n# comment\nadd 2 B\nquit\nadd - Ignored\n";

        run_session(&mut session, Cursor::new(script), false, &RenderConfig::default()).unwrap();

        assert_eq!(session.store().len(), 3);
        assert_eq!(session.store().get_item_by_id("3").unwrap().label, "B");
    }

    #[test]
    fn given_failing_script_when_running_then_stops_with_error() {
        let mut session = session();
        let script = "mv 1 1\nadd 1 Never\n";

        let err = run_session(&mut session, Cursor::new(script), false, &RenderConfig::default())
            .unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn given_interactive_session_when_command_fails_then_continues() {
        let mut session = session();
        let script = "rm 42\nbogus\nadd 1 A\n";

        run_session(&mut session, Cursor::new(script), true, &RenderConfig::default()).unwrap();

        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn given_no_seed_when_requiring_store_then_usage_error() {
        let err = require_store(None).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_path_buf_seed_when_missing_then_noinput() {
        let missing = PathBuf::from("/nonexistent/treestore-seed.json");
        let err = require_store(Some(missing.as_path())).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
