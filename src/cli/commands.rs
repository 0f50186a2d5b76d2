//! Command handlers

use std::io::{self, BufRead, Read};
use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, Format, HistoryCommands, RemoteCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{json, normalize, parse_numbers, DomainError, SavedTree, Tree, TreeResponse};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Load settings, wire services and run the selected command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // these work without (valid) settings
    match &cli.command {
        None => return Err(no_command()),
        Some(Commands::Completion { shell }) => return completion(*shell),
        Some(Commands::Config {
            command: ConfigCommands::Init { force },
        }) => return config_init(cli.config.clone(), *force),
        Some(_) => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings)?;
    run_command(cli, &container)
}

/// Dispatch the parsed command line against an already wired container.
pub fn run_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(no_command());
    };
    match command {
        Commands::Build {
            numbers,
            balanced,
            no_save,
            format,
        } => build(container, numbers, *balanced, !*no_save, *format),
        Commands::Normalize { numbers } => normalize_input(numbers),
        Commands::Remote { command } => match command {
            RemoteCommands::Create { numbers, balanced } => {
                remote_create(container, numbers, *balanced)
            }
            RemoteCommands::List => remote_list(container),
        },
        Commands::History { command } => match command {
            HistoryCommands::List => history_list(container),
            HistoryCommands::Show { id, format } => history_show(container, id, *format),
            HistoryCommands::Rerun { id } => history_rerun(container, id),
            HistoryCommands::Delete { id } => history_delete(container, id),
            HistoryCommands::Clear { yes } => history_clear(container, *yes),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_show(container),
            ConfigCommands::Path => config_path(container),
            ConfigCommands::Init { force } => config_init(cli.config.clone(), *force),
        },
        Commands::Completion { shell } => completion(*shell),
    }
}

fn no_command() -> CliError {
    CliError::Usage("no command given, see `bstv --help`".to_string())
}

/// Join positional arguments, or read stdin when none (or `-`) are given.
fn read_input(numbers: &[String]) -> CliResult<String> {
    if numbers.is_empty() || numbers == ["-"] {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read numbers from stdin", e))?;
        return Ok(buf);
    }
    Ok(numbers.join(" "))
}

fn print_json<T: Serialize + ?Sized>(value: &T, format: Format) -> CliResult<()> {
    let encoded = match format {
        Format::Compact => json::to_string(value),
        _ => json::to_string_pretty(value),
    };
    let text = encoded.map_err(|e| ApplicationError::OperationFailed {
        context: "render JSON".to_string(),
        source: Box::new(e),
    })?;
    output::info(&text);
    Ok(())
}

fn print_response(response: &TreeResponse, record: &SavedTree, format: Format) -> CliResult<()> {
    match format {
        Format::Json | Format::Compact => print_json(response, format),
        Format::Tree => {
            output::header("bst");
            output::info(&record.tree());
            if record.balanced {
                output::header("balanced");
                output::info(&Tree::balanced(&record.numbers));
            }
            Ok(())
        }
    }
}

/// RFC 3339 timestamp in local time; unparsable values are shown as is.
fn local_time(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

fn find_record(container: &ServiceContainer, id: &str) -> CliResult<SavedTree> {
    container
        .history()
        .get(id)?
        .ok_or_else(|| DomainError::RecordNotFound(id.to_string()).into())
}

#[instrument(skip(container))]
fn build(
    container: &ServiceContainer,
    numbers: &[String],
    balanced: bool,
    save: bool,
    format: Format,
) -> CliResult<()> {
    let input = read_input(numbers)?;
    let submission = container.submission().submit(&input, balanced, save)?;
    print_response(&submission.response, &submission.record, format)?;
    if submission.saved {
        output::success(&format!("saved {}", submission.record.id));
    }
    Ok(())
}

#[instrument]
fn normalize_input(numbers: &[String]) -> CliResult<()> {
    let values = parse_numbers(&read_input(numbers)?);
    if values.is_empty() {
        return Err(DomainError::EmptyInput.into());
    }
    output::info(&normalize(&values));
    Ok(())
}

#[instrument(skip(container))]
fn remote_create(container: &ServiceContainer, numbers: &[String], balanced: bool) -> CliResult<()> {
    let values = parse_numbers(&read_input(numbers)?);
    if values.is_empty() {
        return Err(DomainError::EmptyInput.into());
    }
    let response = container.remote()?.create_tree(&values, balanced)?;
    print_json(&response, Format::Json)
}

#[instrument(skip(container))]
fn remote_list(container: &ServiceContainer) -> CliResult<()> {
    let list = container.remote()?.list_trees()?;
    for item in &list.items {
        output::header(&format!("{}  {}", local_time(&item.created_at), item.id));
        output::detail(&item.numbers);
    }
    output::hint(&format!("total: {}", list.total));
    Ok(())
}

#[instrument(skip(container))]
fn history_list(container: &ServiceContainer) -> CliResult<()> {
    let records = container.history().load()?;
    if records.is_empty() {
        output::hint("No saved trees yet. Submit one with `bstv build`.");
        return Ok(());
    }
    for record in &records {
        output::header(&format!("{}  {}", local_time(&record.created_at), record.id));
        let balanced = if record.balanced { " • balanced" } else { "" };
        output::detail(&format!(
            "{} • {}{}",
            record.count_label(),
            record.numbers_label(),
            balanced
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn history_show(container: &ServiceContainer, id: &str, format: Format) -> CliResult<()> {
    let record = find_record(container, id)?;
    match format {
        Format::Json | Format::Compact => print_json(&record.tree_json(), format),
        Format::Tree => {
            output::info(&record.tree());
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn history_rerun(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let record = find_record(container, id)?;
    let response = container
        .remote()?
        .create_tree(&record.numbers, record.balanced)?;
    print_json(&response, Format::Json)
}

#[instrument(skip(container))]
fn history_delete(container: &ServiceContainer, id: &str) -> CliResult<()> {
    if !container.history().remove_by_id(id)? {
        return Err(DomainError::RecordNotFound(id.to_string()).into());
    }
    output::success(&format!("deleted {id}"));
    Ok(())
}

#[instrument(skip(container))]
fn history_clear(container: &ServiceContainer, yes: bool) -> CliResult<()> {
    if !yes {
        output::prompt("Clear all saved trees? [y/N]");
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| InfraError::io("read confirmation", e))?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            output::warning("aborted");
            return Ok(());
        }
    }
    container.history().clear()?;
    output::success("history cleared");
    Ok(())
}

#[instrument(skip(container))]
fn config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

#[instrument(skip(container))]
fn config_path(container: &ServiceContainer) -> CliResult<()> {
    match global_config_path() {
        Some(p) => output::info(&format!("config: {}", p.display())),
        None => output::info("config: (no config directory)"),
    }
    output::info(&format!("store:  {}", container.settings.store_path().display()));
    Ok(())
}

#[instrument]
fn config_init(target: Option<PathBuf>, force: bool) -> CliResult<()> {
    let path = target.or_else(global_config_path).ok_or_else(|| {
        CliError::Usage("cannot determine config directory, pass -C <file>".to_string())
    })?;
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(&path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

fn completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
