use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::settings::default_base_dir;
use crate::config::{resolve_config, Settings};
use crate::core::catalog::Catalog;
use crate::core::course::CourseId;
use crate::core::source::{load_with_fallback, CatalogSource, Fallback};
use crate::error::{CourseGraphError, Result};
use crate::graph::ops::{find_cycles, roots, study_order};
use crate::graph::reach::{direct_dependents, direct_prerequisites};
use crate::graph::search::{search, SearchResult};
use crate::graph::viz;
use crate::graph::{
    ancestors, build_graph, descendants, highlight_sets, BuildOptions, CourseGraph, DroppedEdge,
    ViewSelection,
};
use crate::render::{DotAdapter, TerminalAdapter};
use crate::session::Session;
use crate::util::output;

mod explore;

#[derive(Parser, Debug)]
#[command(name = "coursegraph")]
#[command(about = "Explore course prerequisite graphs", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Catalog file or glob pattern; repeatable. Replaces configured sources.
    #[arg(long = "catalog")]
    pub catalogs: Vec<String>,
    /// Fetch the catalog from a URL instead of local files.
    #[arg(long)]
    pub url: Option<String>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Show(ShowArgs),
    Prereqs(LineageArgs),
    Dependents(LineageArgs),
    Highlight(HighlightArgs),
    Order(ReportArgs),
    Check(ReportArgs),
    Tracks(TracksArgs),
    Search(SearchArgs),
    Explore(ExploreArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Show a single specialization track.
    #[arg(short = 't', long, conflicts_with = "all")]
    pub track: Option<String>,
    /// Show every track, ignoring the configured default.
    #[arg(long)]
    pub all: bool,
    #[arg(long, conflicts_with = "no_dedupe")]
    pub dedupe: bool,
    #[arg(long)]
    pub no_dedupe: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long, default_value = "tree")]
    pub format: String,
    #[arg(long)]
    pub focus: Option<String>,
}

#[derive(Args, Debug)]
pub struct LineageArgs {
    pub course: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub direct: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HighlightArgs {
    pub course: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TracksArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    pub query: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub view: ViewArgs,
}

struct Context {
    catalog: Catalog,
    settings: Settings,
    quiet: bool,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Up,
    Down,
}

pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "error",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let ctx = load_context(cli.config, cli.catalogs, cli.url, cli.quiet)?;
    match cli.command {
        Commands::Show(args) => handle_show(args, &ctx),
        Commands::Prereqs(args) => handle_lineage(args, &ctx, Direction::Up),
        Commands::Dependents(args) => handle_lineage(args, &ctx, Direction::Down),
        Commands::Highlight(args) => handle_highlight(args, &ctx),
        Commands::Order(args) => handle_order(args, &ctx),
        Commands::Check(args) => handle_check(args, &ctx),
        Commands::Tracks(args) => handle_tracks(args, &ctx),
        Commands::Search(args) => handle_search(args, &ctx),
        Commands::Explore(args) => handle_explore(args, ctx),
    }
}

fn load_context(
    config_path: Option<PathBuf>,
    catalogs: Vec<String>,
    url: Option<String>,
    quiet: bool,
) -> Result<Context> {
    let cwd = env::current_dir().unwrap_or_else(|_| default_base_dir());
    let resolved = resolve_config(&cwd, config_path)?;
    let mut settings = resolved.settings;

    let from_cli = url.is_none() && !catalogs.is_empty();
    if let Some(url) = url {
        settings.catalog.url = Some(url);
    }
    let source = if from_cli {
        CatalogSource::Files {
            base: cwd,
            patterns: catalogs,
        }
    } else {
        settings.catalog.source(&resolved.root)
    };

    if source == CatalogSource::Sample && !quiet {
        output::notice("catalog", "no catalog configured, using the built-in sample");
    }

    let loaded = load_with_fallback(&source, settings.catalog.fallback);
    if let Some(err) = loaded.degraded.as_ref() {
        if !quiet {
            let fallback = match settings.catalog.fallback {
                Fallback::Sample => "sample",
                Fallback::Empty => "empty",
            };
            output::warn(&format!("{err}; showing the {fallback} catalog instead"));
        }
    }

    Ok(Context {
        catalog: loaded.catalog,
        settings,
        quiet,
    })
}

/// An explicit `--track` must exist in the catalog. A configured track the
/// catalog lacks falls back to all tracks with a warning.
fn build_options(view: &ViewArgs, ctx: &Context) -> Result<BuildOptions> {
    let known = ctx.catalog.specializations();
    let is_known = |track: &str| known.iter().any(|name| name == track);

    let selection = if view.all {
        ViewSelection::All
    } else if let Some(track) = view.track.clone() {
        if !is_known(&track) {
            return Err(CourseGraphError::Other(anyhow::anyhow!(
                "unknown track '{}' (available: {})",
                track,
                known.join(", ")
            )));
        }
        ViewSelection::Track(track)
    } else {
        match ctx.settings.view.selection() {
            ViewSelection::Track(track) if !is_known(&track) => {
                if !ctx.quiet {
                    output::warn(&format!(
                        "configured track '{}' is not in the catalog; showing all tracks",
                        track
                    ));
                }
                ViewSelection::All
            }
            selection => selection,
        }
    };

    Ok(BuildOptions::for_view(&selection, dedupe_override(view, ctx)))
}

fn dedupe_override(view: &ViewArgs, ctx: &Context) -> Option<bool> {
    if view.dedupe {
        Some(true)
    } else if view.no_dedupe {
        Some(false)
    } else {
        ctx.settings.view.dedupe_by_title
    }
}

fn graph_for(view: &ViewArgs, ctx: &Context) -> Result<CourseGraph> {
    let options = build_options(view, ctx)?;
    Ok(build_graph(&ctx.catalog, &options))
}

fn resolve_course(graph: &CourseGraph, raw: &str) -> Result<CourseId> {
    graph
        .resolve(&CourseId::new(raw))
        .cloned()
        .ok_or_else(|| CourseGraphError::Other(anyhow::anyhow!("unknown course {}", raw)))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| CourseGraphError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn sorted(ids: impl IntoIterator<Item = CourseId>) -> Vec<CourseId> {
    let mut ids: Vec<CourseId> = ids.into_iter().collect();
    ids.sort();
    ids
}

fn display(graph: &CourseGraph, id: &CourseId) -> String {
    format!("{} ({})", graph.label(id), id)
}

fn handle_show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let options = build_options(&args.view, ctx)?;
    let graph = build_graph(&ctx.catalog, &options);
    let focus = args
        .focus
        .as_deref()
        .map(|raw| resolve_course(&graph, raw))
        .transpose()?;

    match args.format.to_ascii_lowercase().as_str() {
        "tree" | "flat" => {
            let starts = match focus.as_ref() {
                Some(focus) => vec![focus.clone()],
                None => roots(&graph),
            };
            if args.format.eq_ignore_ascii_case("tree") {
                print!("{}", viz::render_tree(&graph, &starts));
            } else {
                print!("{}", viz::render_flat(&graph, &starts));
            }
            Ok(())
        }
        "dot" => {
            let mut session = Session::new(ctx.catalog.clone(), options, DotAdapter::new());
            if let Some(focus) = focus {
                session.on_pointer_enter_node(focus);
            }
            print!("{}", session.adapter().render());
            Ok(())
        }
        "json" => {
            if focus.is_some() {
                return Err(CourseGraphError::Other(anyhow::anyhow!(
                    "--focus is not supported with json output, use `highlight --json`"
                )));
            }
            print_json(&viz::to_json(&graph))
        }
        other => Err(CourseGraphError::Other(anyhow::anyhow!(
            "unknown graph format '{}'",
            other
        ))),
    }
}

fn handle_lineage(args: LineageArgs, ctx: &Context, direction: Direction) -> Result<()> {
    let graph = graph_for(&args.view, ctx)?;
    let focus = resolve_course(&graph, &args.course)?;
    let ids = match (direction, args.direct) {
        (Direction::Up, true) => direct_prerequisites(&graph, &focus),
        (Direction::Up, false) => sorted(ancestors(&graph, &focus)),
        (Direction::Down, true) => direct_dependents(&graph, &focus),
        (Direction::Down, false) => sorted(descendants(&graph, &focus)),
    };

    if args.json {
        return print_json(&ids);
    }

    let heading = match direction {
        Direction::Up => "prerequisites of",
        Direction::Down => "dependents of",
    };
    println!("{} {}:", heading, display(&graph, &focus));
    for id in ids {
        println!("  {}", display(&graph, &id));
    }
    Ok(())
}

#[derive(Serialize)]
struct HighlightJson {
    focus: CourseId,
    ancestors: Vec<CourseId>,
    descendants: Vec<CourseId>,
}

fn handle_highlight(args: HighlightArgs, ctx: &Context) -> Result<()> {
    let options = build_options(&args.view, ctx)?;
    if args.json {
        let graph = build_graph(&ctx.catalog, &options);
        let focus = resolve_course(&graph, &args.course)?;
        let sets = highlight_sets(&graph, &focus);
        return print_json(&HighlightJson {
            focus,
            ancestors: sorted(sets.ancestors),
            descendants: sorted(sets.descendants),
        });
    }

    let mut session = Session::new(ctx.catalog.clone(), options, TerminalAdapter::stdout());
    let focus = resolve_course(session.graph(), &args.course)?;
    session.on_pointer_enter_node(focus);
    Ok(())
}

fn handle_order(args: ReportArgs, ctx: &Context) -> Result<()> {
    let graph = graph_for(&args.view, ctx)?;
    let order = study_order(&graph).map_err(CourseGraphError::Other)?;

    if args.json {
        return print_json(&order);
    }
    for id in order {
        match graph.node(&id) {
            Some(node) => println!(
                "Y{}S{}  {}",
                node.course.year,
                node.course.semester,
                display(&graph, &id)
            ),
            None => println!("{}", id),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckJson<'a> {
    cycles: Vec<Vec<CourseId>>,
    dropped: &'a [DroppedEdge],
}

fn handle_check(args: ReportArgs, ctx: &Context) -> Result<()> {
    let graph = graph_for(&args.view, ctx)?;
    let cycles = find_cycles(&graph);

    if args.json {
        return print_json(&CheckJson {
            cycles,
            dropped: graph.dropped(),
        });
    }

    if cycles.is_empty() && graph.dropped().is_empty() {
        output::info("no prerequisite issues found");
        return Ok(());
    }
    if !cycles.is_empty() {
        println!("cycles:");
        for cycle in &cycles {
            let line = cycle
                .iter()
                .map(CourseId::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            println!("  {}", line);
        }
    }
    if !graph.dropped().is_empty() {
        println!("dropped prerequisite links:");
        for dropped in graph.dropped() {
            let reason = serde_json::to_value(dropped.reason)
                .ok()
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default();
            println!("  {} -> {} ({})", dropped.from, dropped.to, reason);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct TrackJson {
    track: String,
    courses: usize,
}

fn handle_tracks(args: TracksArgs, ctx: &Context) -> Result<()> {
    let tracks: Vec<TrackJson> = ctx
        .catalog
        .specializations()
        .into_iter()
        .map(|track| {
            let courses = ctx
                .catalog
                .courses()
                .iter()
                .filter(|course| course.specialization == track)
                .count();
            TrackJson { track, courses }
        })
        .collect();

    if args.json {
        return print_json(&tracks);
    }
    for track in tracks {
        println!("{} ({} courses)", track.track, track.courses);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SearchJson {
    Empty,
    Selected { id: CourseId },
    Suggestions { ids: Vec<CourseId> },
}

fn handle_search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let graph = graph_for(&args.view, ctx)?;
    let result = search(&graph, &args.query);

    if args.json {
        let json = match result {
            SearchResult::Empty => SearchJson::Empty,
            SearchResult::Selected(id) => SearchJson::Selected { id },
            SearchResult::Suggestions(ids) => SearchJson::Suggestions { ids },
        };
        return print_json(&json);
    }

    match result {
        SearchResult::Empty => output::info("empty query"),
        SearchResult::Selected(id) => println!("selected {}", display(&graph, &id)),
        SearchResult::Suggestions(ids) if ids.is_empty() => output::info("no matches"),
        SearchResult::Suggestions(ids) => {
            for id in ids {
                println!("{}", display(&graph, &id));
            }
        }
    }
    Ok(())
}

fn handle_explore(args: ExploreArgs, ctx: Context) -> Result<()> {
    let options = build_options(&args.view, &ctx)?;
    let dedupe = dedupe_override(&args.view, &ctx);
    let session = Session::new(ctx.catalog, options, TerminalAdapter::stdout())
        .with_dedupe_override(dedupe);
    explore::run(session)
}
