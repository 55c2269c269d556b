//! Command handlers
//!
//! Each handler returns the process exit code. For `run` that is the
//! child's own code; everything else exits 0 on success.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::services::AliasEntry;
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::tree::{alias_tree, json_tree, scalar_text};
use crate::cli::{CliError, CliResult};
use crate::domain::is_blank_value;
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Script path used by `create` when none is given.
pub const DEFAULT_SCRIPT: &str = "index.js";

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<i32> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        return cmd_completion(*shell);
    }

    ensure_store(container)?;

    match &cli.command {
        Some(Commands::Create {
            name,
            path,
            overwrite,
            inherit,
        }) => cmd_create(container, name, path.as_deref(), *overwrite, *inherit),
        Some(Commands::List) | None => cmd_list(container),
        Some(Commands::Search { query }) => cmd_search(container, query),
        Some(Commands::UpdatePath { name, new_path }) => {
            cmd_update_path(container, name, new_path)
        }
        Some(Commands::UpdateName { name, new_name }) => {
            cmd_update_name(container, name, new_name)
        }
        Some(Commands::Remove { name }) => cmd_remove(container, name),
        Some(Commands::Run { argv }) | Some(Commands::External(argv)) => {
            match argv.split_first() {
                Some((name, params)) => cmd_run(container, name, params),
                None => cmd_list(container),
            }
        }
        Some(Commands::Set { key, value, json }) => {
            cmd_set(container, key, value.as_deref(), *json)
        }
        Some(Commands::Get { key }) => cmd_get(container, key),
        Some(Commands::Use {
            directory,
            overwrite,
        }) => cmd_use(container, directory.as_deref(), *overwrite),
        Some(Commands::Store { config }) => cmd_store(container, *config),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

/// Create the default store on first use.
///
/// Runs under the store lock so a concurrent first run cannot overwrite a
/// store another invocation has already written to.
fn ensure_store(container: &ServiceContainer) -> CliResult<()> {
    if container.store.exists() {
        return Ok(());
    }
    let _lock = container.lock_store()?;
    if container.store.init()? {
        info!("created store at {}", container.store.path().display());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_create(
    container: &ServiceContainer,
    name: &str,
    path: Option<&Path>,
    overwrite: bool,
    inherit: bool,
) -> CliResult<i32> {
    let _lock = container.lock_store()?;
    let aliases = container.alias_service();

    let entry = if inherit {
        if path.is_some() {
            return Err(CliError::InvalidArgs(
                "--inherit takes the script path as its only argument".into(),
            ));
        }
        // The single positional is the path; the name comes from its package
        aliases.create_inherited(Path::new(name), overwrite)?
    } else {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_SCRIPT));
        aliases.create(name, path, overwrite)?
    };

    output::success(&format!("Created {} -> {}", entry.name, entry.path));
    output::detail(&format!(
        "run it with {}",
        output::command_hint(&format!("tb {}", entry.name))
    ));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer) -> CliResult<i32> {
    let aliases = container.alias_service();
    let entries = aliases.describe_all(aliases.list()?);
    if entries.is_empty() {
        output::info(&format!(
            "No aliases registered. Create one with {}",
            output::command_hint("tb create <name> <path>")
        ));
        return Ok(exitcode::OK);
    }
    print_aliases("aliases", &entries);
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_search(container: &ServiceContainer, query: &str) -> CliResult<i32> {
    let aliases = container.alias_service();
    let entries = aliases.describe_all(aliases.search(query)?);
    if entries.is_empty() {
        output::info(&format!("No aliases match '{}'", query));
        return Ok(exitcode::OK);
    }
    print_aliases(&format!("aliases matching '{}'", query), &entries);
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_update_path(container: &ServiceContainer, name: &str, new_path: &Path) -> CliResult<i32> {
    let _lock = container.lock_store()?;
    let target = container.alias_service().update_path(name, new_path)?;
    output::success(&format!("Updated {} -> {}", name, target));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_update_name(container: &ServiceContainer, name: &str, new_name: &str) -> CliResult<i32> {
    let _lock = container.lock_store()?;
    let path = container.alias_service().update_name(name, new_name)?;
    output::success(&format!("Renamed {} to {} ({})", name, new_name, path));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_remove(container: &ServiceContainer, name: &str) -> CliResult<i32> {
    let _lock = container.lock_store()?;
    let path = container.alias_service().remove(name)?;
    output::success(&format!("Removed {} ({})", name, path));
    Ok(exitcode::OK)
}

/// Run an alias and exit with the child's code.
#[instrument(skip(container, params))]
fn cmd_run(container: &ServiceContainer, name: &str, params: &[String]) -> CliResult<i32> {
    debug!("params: {:?}", params);
    let exit = container.dispatcher().run(name, params)?;
    if !exit.success() {
        debug!("{} finished with {}", name, exit);
    }
    Ok(exit.exit_code())
}

#[instrument(skip(container))]
fn cmd_set(
    container: &ServiceContainer,
    key: &str,
    value: Option<&str>,
    json: bool,
) -> CliResult<i32> {
    let value = match value {
        Some(raw) if json => Some(
            serde_json::from_str::<Value>(raw)
                .map_err(|e| CliError::InvalidArgs(format!("value is not valid JSON: {}", e)))?,
        ),
        Some(raw) => Some(Value::String(raw.to_string())),
        None => None,
    };
    let unset = value.as_ref().map(is_blank_value).unwrap_or(true);

    let _lock = container.lock_store()?;
    if !container.store.set_setting(key, value.clone())? {
        return Err(CliError::Settings(format!(
            "store {} has no settings section",
            container.store.path().display()
        )));
    }

    match value {
        Some(value) if !unset => {
            output::success(&format!("Set {} to {}", key, scalar_text(&value)))
        }
        _ => output::success(&format!("Removed setting {}", key)),
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_get(container: &ServiceContainer, key: &str) -> CliResult<i32> {
    match container.store.get_setting(key)? {
        Some(value @ (Value::Object(_) | Value::Array(_))) => {
            output::info(&json_tree(key, &value));
        }
        Some(value) => output::info(&format!("{}: {}", key, scalar_text(&value))),
        None => return Err(CliError::NotFound(format!("no setting named '{}'", key))),
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_use(
    container: &ServiceContainer,
    directory: Option<&Path>,
    overwrite: bool,
) -> CliResult<i32> {
    let dir = directory.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    let _lock = container.lock_store()?;
    let report = container.alias_service().use_directory(&dir, overwrite)?;

    if report.registered.is_empty() {
        output::warning(&format!("no scripts registered from {}", dir.display()));
    } else {
        output::header(&format!("Registered {} aliases", report.registered.len()));
        for (name, path) in &report.registered {
            output::success_detail(&format!("{} -> {}", name, path));
        }
    }
    for (name, reason) in &report.skipped {
        output::failure(&format!("{}: {}", name, reason));
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_store(container: &ServiceContainer, config: bool) -> CliResult<i32> {
    if config {
        output::info(&container.settings.to_toml()?);
        return Ok(exitcode::OK);
    }

    let doc = container.store.load()?;
    output::action("Store", &container.store.path().display());
    let value = serde_json::to_value(&doc)
        .map_err(|e| CliError::Settings(format!("cannot render store: {}", e)))?;
    output::info(&json_tree("store", &value));
    Ok(exitcode::OK)
}

fn cmd_completion(shell: Shell) -> CliResult<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(exitcode::OK)
}

fn print_aliases(title: &str, entries: &[AliasEntry]) {
    output::info(&alias_tree(title, entries));
}
