//! Command dispatch: each command drives an editor session the way a
//! renderer would, then prints or saves the result.

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::{EditorSession, Intent, NodeForm};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TreeNodeConvert;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree { file, collapse }) => cmd_tree(&container, file, collapse),
        Some(Commands::Display {
            file,
            collapse,
            compact,
        }) => cmd_display(&container, file, collapse, *compact),
        Some(Commands::Export { file, output }) => {
            cmd_export(&container, file, output.as_deref())
        }
        Some(Commands::Add {
            file,
            name,
            title,
            department,
            image_url,
            parent,
            id,
            output,
        }) => {
            let form = NodeForm {
                id: id.clone().unwrap_or_default(),
                name: name.clone(),
                title: title.clone().unwrap_or_default(),
                department: department.clone().unwrap_or_default(),
                parent_id: parent.clone(),
                image_url: image_url.clone().unwrap_or_default(),
            };
            cmd_add(&container, file, form, output.as_deref())
        }
        Some(Commands::Update {
            file,
            id,
            name,
            title,
            department,
            image_url,
            parent,
            root,
            output,
        }) => {
            let changes = FieldChanges {
                name: name.clone(),
                title: title.clone(),
                department: department.clone(),
                image_url: image_url.clone(),
                parent: match (root, parent) {
                    (true, _) => Some(None),
                    (false, Some(p)) => Some(Some(p.clone())),
                    (false, None) => None,
                },
            };
            cmd_update(&container, file, id, changes, output.as_deref())
        }
        Some(Commands::Delete { file, id, output }) => {
            cmd_delete(&container, file, id, output.as_deref())
        }
        Some(Commands::Parents { file, id }) => cmd_parents(&container, file, id.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "orgtree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `orgtree --help`".to_string(),
        )),
    }
}

/// Field edits requested on the command line. `parent: Some(None)` moves to top level.
struct FieldChanges {
    name: Option<String>,
    title: Option<String>,
    department: Option<String>,
    image_url: Option<String>,
    parent: Option<Option<String>>,
}

/// Import a chart file into a fresh session, reporting import warnings.
fn open_session(container: &ServiceContainer, file: &Path) -> CliResult<EditorSession> {
    let outcome = container.chart.load(file)?;
    for warning in &outcome.warnings {
        output::warning(warning);
    }
    debug!("{} records read from {}", outcome.records, file.display());
    Ok(outcome.session)
}

fn apply_collapse(session: &mut EditorSession, collapse: &[String]) -> CliResult<()> {
    for node_id in collapse {
        session.handle_intent(Intent::ToggleCollapse {
            node_id: node_id.clone(),
        })?;
    }
    Ok(())
}

fn save(container: &ServiceContainer, session: &EditorSession, target: &Path) -> CliResult<()> {
    container.chart.save(session.forest(), target)?;
    debug!("saved {} members to {}", session.forest().len(), target.display());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path, collapse: &[String]) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    apply_collapse(&mut session, collapse)?;
    debug!("{} levels deep", session.forest().depth());
    for tree in session.forest().to_tree_string() {
        output::info(tree.to_string().trim_end());
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_display(
    container: &ServiceContainer,
    file: &Path,
    collapse: &[String],
    compact: bool,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    apply_collapse(&mut session, collapse)?;
    let root = session.display();
    if root.is_none() {
        output::warning("chart has no members to display");
    }
    let json = if compact {
        serde_json::to_string(&root)
    } else {
        serde_json::to_string_pretty(&root)
    }
    .map_err(|e| InfraError::Encode(e.to_string()))?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, file: &Path, target: Option<&Path>) -> CliResult<()> {
    let session = open_session(container, file)?;
    match target {
        Some(path) => {
            if container.fs.exists(path) {
                debug!("overwriting {}", path.display());
            }
            save(container, &session, path)?;
            output::success(&format!(
                "exported {} members to {}",
                session.forest().len(),
                path.display()
            ));
        }
        None => {
            let text = container.chart.render_records(&session.export_records())?;
            io::stdout()
                .write_all(text.as_bytes())
                .map_err(|e| InfraError::io("write to stdout", e))?;
        }
    }
    Ok(())
}

#[instrument(skip(container, form))]
fn cmd_add(
    container: &ServiceContainer,
    file: &Path,
    form: NodeForm,
    target: Option<&Path>,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let draft = session.begin_new_node();
    let id = if form.id.is_empty() { draft.id } else { form.id.clone() };
    session.submit(NodeForm {
        id: id.clone(),
        ..form
    })?;
    save(container, &session, target.unwrap_or(file))?;
    output::success(&format!("added {}", id));
    Ok(())
}

#[instrument(skip(container, changes))]
fn cmd_update(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    changes: FieldChanges,
    target: Option<&Path>,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let mut form = session
        .handle_intent(Intent::Edit {
            node_id: id.to_string(),
        })?
        .ok_or_else(|| CliError::InvalidArgs(format!("{} cannot be edited", id)))?;

    if let Some(name) = changes.name {
        form.name = name;
    }
    if let Some(title) = changes.title {
        form.title = title;
    }
    if let Some(department) = changes.department {
        form.department = department;
    }
    if let Some(image_url) = changes.image_url {
        form.image_url = image_url;
    }
    if let Some(parent) = changes.parent {
        form.parent_id = parent;
    }

    session.submit(form)?;
    save(container, &session, target.unwrap_or(file))?;
    output::success(&format!("updated {}", id));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_delete(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    target: Option<&Path>,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let removed = session.delete(id)?;
    save(container, &session, target.unwrap_or(file))?;
    output::success(&format!("deleted {} ({} members removed)", id, removed));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_parents(container: &ServiceContainer, file: &Path, id: Option<&str>) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    match id {
        Some(node_id) => {
            session.handle_intent(Intent::Edit {
                node_id: node_id.to_string(),
            })?;
        }
        None => {
            session.begin_new_node();
        }
    }
    for data in session.parent_choices()? {
        output::info(data);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective settings");
            for line in container.settings.to_toml()?.lines() {
                output::detail(line);
            }
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this system"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
