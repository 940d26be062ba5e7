//! Command dispatch: map parsed arguments onto panorama sessions

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{PanoramaService, RenderOutcome, SearchOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, SessionArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::tree_traits::TreeNodeConvert;
use crate::domain::{CanvasEdge, CanvasNode, DomainError, RenderTree, Viewport};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{CanvasSurface, MemoryCanvas};
use crate::infrastructure::InfraError;

/// Execute the parsed command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Groups { file }) => cmd_groups(&container(cli)?, file.as_deref()),
        Some(Commands::Layout {
            session,
            zoom,
            fit,
            format,
        }) => cmd_layout(&container(cli)?, session, *zoom, *fit, *format),
        Some(Commands::Tree { session }) => cmd_tree(&container(cli)?, session),
        Some(Commands::Search {
            session,
            node,
            path,
        }) => cmd_search(&container(cli)?, session, node, path),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => Ok(()),
    }
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    Ok(ServiceContainer::new(settings))
}

/// Last render plus the session it came from.
struct Session {
    panorama: PanoramaService<MemoryCanvas>,
    outcome: RenderOutcome,
}

/// Open the panorama, focus the requested group and apply toggles in order.
#[instrument(level = "debug", skip(container))]
fn open_session(container: &ServiceContainer, args: &SessionArgs) -> CliResult<Session> {
    let file = container.data_file(args.file.as_deref()).ok_or_else(|| {
        CliError::Usage("no group dump given and no data_file configured".to_string())
    })?;
    let mut panorama = container.panorama(&file)?;
    let mut outcome = panorama.open()?;

    if let Some(group) = args.group.as_deref() {
        if panorama.current_group() != Some(group) {
            outcome = panorama.on_select_group(group)?;
        }
    }
    if args.collapse_all {
        outcome = keep_last(outcome, panorama.on_toggle_all()?);
    }
    for id in &args.toggle {
        check_toggle_target(panorama.current_tree(), id)?;
        outcome = keep_last(outcome, panorama.on_toggle(id)?);
    }

    if let RenderOutcome::Invalid { reason } = &outcome {
        output::warning(reason);
    }
    debug!("open_session: {:?}", outcome);
    Ok(Session { panorama, outcome })
}

/// `--toggle` must name a node of the focused group's tree.
fn check_toggle_target(tree: Option<&RenderTree>, id: &str) -> CliResult<()> {
    match tree.and_then(|tree| tree.node(id)) {
        Some(_) => Ok(()),
        None => Err(CliError::InvalidArgs(format!(
            "--toggle: {}",
            DomainError::UnknownNode(id.to_string())
        ))),
    }
}

/// A skipped step leaves the previous render on the surface.
fn keep_last(previous: RenderOutcome, next: RenderOutcome) -> RenderOutcome {
    match next {
        RenderOutcome::Skipped => previous,
        other => other,
    }
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    group: Option<&'a str>,
    outcome: &'a RenderOutcome,
    viewport: &'a Viewport,
    nodes: &'a [CanvasNode],
    edges: &'a [CanvasEdge],
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Infra(InfraError::json("serialize report", e)))
}

#[instrument(level = "debug", skip(container))]
fn cmd_groups(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let args = SessionArgs {
        file: file.map(Path::to_path_buf),
        ..Default::default()
    };
    let session = open_session(container, &args)?;
    let panorama = &session.panorama;

    output::header(&format!("{} groups", panorama.groups().len()));
    for group in panorama.groups() {
        let line = format!(
            "{} {} (assets: {}, classified: {})",
            group.id, group.name, group.asset_count, group.classified_count
        );
        if panorama.current_group() == Some(group.id.as_str()) {
            output::focused(&line);
        } else {
            output::detail(&line);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_layout(
    container: &ServiceContainer,
    args: &SessionArgs,
    zoom: Option<f64>,
    fit: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let mut session = open_session(container, args)?;
    if let Some(multiple) = zoom {
        session.panorama.on_zoom(multiple);
    }
    if fit {
        session.panorama.on_fit();
    }

    let panorama = &session.panorama;
    let surface = panorama.surface();
    match format {
        OutputFormat::Json => {
            let report = LayoutReport {
                group: panorama.current_group(),
                outcome: &session.outcome,
                viewport: surface.viewport(),
                nodes: surface.nodes(),
                edges: surface.edges(),
            };
            output::info(&to_json(&report)?);
        }
        OutputFormat::Text => {
            let vp = surface.viewport();
            output::header(&format!(
                "scale {:.2} translate ({:.1}, {:.1})",
                vp.scale, vp.tx, vp.ty
            ));
            for node in surface.nodes() {
                output::detail(&format!(
                    "{:<24} {:<20} ({:>8.1}, {:>8.1}) {}x{}",
                    node.id, node.shape, node.position.x, node.position.y, node.width, node.height
                ));
            }
            let edges = surface.edges().iter().map(|e| e.id.as_str()).join(", ");
            output::action("edges", &edges);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, args: &SessionArgs) -> CliResult<()> {
    let session = open_session(container, args)?;
    match session.panorama.current_tree() {
        Some(tree) => output::info(&tree.to_tree_string()),
        None => output::warning("no group loaded"),
    }
    Ok(())
}

#[derive(Serialize)]
struct SearchReport<'a> {
    node: &'a str,
    outcome: &'a SearchOutcome,
    viewport: &'a Viewport,
}

#[instrument(level = "debug", skip(container))]
fn cmd_search(
    container: &ServiceContainer,
    args: &SessionArgs,
    node: &str,
    path: &str,
) -> CliResult<()> {
    let mut session = open_session(container, args)?;
    let outcome = session.panorama.on_search_select(node, path)?;
    if !outcome.centered {
        output::warning(&format!("node {node} is not on the canvas"));
    }
    let report = SearchReport {
        node,
        outcome: &outcome,
        viewport: session.panorama.surface().viewport(),
    };
    output::info(&to_json(&report)?);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no config directory)".to_string());
            output::action("global", &global);
            if let Some(path) = &cli.config {
                output::action("file", &path.display());
            }
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
