use std::env;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::config::resolve::resolve_config;
use crate::config::CadenceConfig;
use crate::core::gav::ProjectId;
use crate::descriptor::{parse_descriptor_file, DescriptorError};
use crate::error::{CadenceError, Result};
use crate::graph::ops::{external_references, find_cycles};
use crate::graph::store::GraphStore;
use crate::graph::{viz, DependencyGraph};
use crate::util::{output, parallel};

#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Build-order engine for project descriptors", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Order(OrderArgs),
    Show(ShowArgs),
    Check(CheckArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    pub paths: Vec<PathBuf>,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub parallel: Option<usize>,
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub paths: Vec<PathBuf>,
    #[arg(long, default_value = "flat")]
    pub format: String,
    #[arg(long)]
    pub parallel: Option<usize>,
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub parallel: Option<usize>,
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Order(args) => handle_order(args, cli.config, quiet),
        Commands::Show(args) => handle_show(args, cli.config, quiet),
        Commands::Check(args) => handle_check(args, cli.config, quiet),
        Commands::Completions(args) => handle_completions(args),
    }
}

fn handle_order(args: OrderArgs, config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let store = ingest(&args.paths, &config, args.parallel, args.strict, quiet)?;
    let order = store.build_order()?;

    let ids: Vec<String> = order
        .into_iter()
        .map(|id| id.as_str().to_string())
        .collect();
    if args.json {
        println!("{}", to_json(&ids)?);
    } else {
        for id in ids {
            println!("{}", id);
        }
    }
    Ok(())
}

fn handle_show(args: ShowArgs, config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let store = ingest(&args.paths, &config, args.parallel, args.strict, quiet)?;
    let graph = store.snapshot();

    match args.format.to_ascii_lowercase().as_str() {
        "flat" => {
            print!("{}", viz::render_flat(&graph));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(&graph));
            Ok(())
        }
        "json" => {
            println!("{}", to_json(&graph_to_json(&graph))?);
            Ok(())
        }
        other => Err(CadenceError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            other
        )))),
    }
}

fn handle_check(args: CheckArgs, config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let store = ingest(&args.paths, &config, args.parallel, args.strict, quiet)?;
    let graph = store.snapshot();

    let cycles = find_cycles(&graph);
    let external = external_references(&graph);

    if args.json {
        let report = CheckJson {
            cycles: cycles
                .iter()
                .map(|cycle| cycle.iter().map(|id| id.as_str().to_string()).collect())
                .collect(),
            external: external
                .iter()
                .map(|reference| ExternalJson {
                    from: reference.from.as_str().to_string(),
                    dependency: reference.dependency.as_str().to_string(),
                })
                .collect(),
        };
        println!("{}", to_json(&report)?);
    } else {
        for cycle in &cycles {
            let members: Vec<&str> = cycle.iter().map(ProjectId::as_str).collect();
            println!("cycle: {}", members.join(" -> "));
        }
        for reference in &external {
            println!(
                "external: {} -> {}",
                reference.from.as_str(),
                reference.dependency.as_str()
            );
        }
        if cycles.is_empty() && !quiet {
            output::info("no circular dependencies");
        }
    }

    if cycles.is_empty() {
        Ok(())
    } else {
        Err(CadenceError::Other(anyhow::anyhow!(format!(
            "found {} circular dependency chain(s)",
            cycles.len()
        ))))
    }
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

// Parses run in parallel; upserts serialize on the store lock. Malformed or
// identity-less documents are skipped with a notice unless strict mode is on.
fn ingest(
    paths: &[PathBuf],
    config: &CadenceConfig,
    parallel_override: Option<usize>,
    strict_flag: bool,
    quiet: bool,
) -> Result<GraphStore> {
    let files = discover_descriptors(paths, &config.descriptors.patterns)?;
    let jobs = resolve_parallel(parallel_override, config);
    let strict = strict_flag || config.descriptors.strict;
    let store = GraphStore::new();

    let results = parallel::map_parallel(files, jobs, |path| -> std::result::Result<(), DescriptorError> {
        if !quiet {
            output::parse_op(&path.display().to_string());
        }
        let descriptor = parse_descriptor_file(&path)?;
        let id = descriptor.project.clone();
        if store.upsert(descriptor.project, descriptor.dependencies) && !quiet {
            output::info(&format!(
                "project id {} overwritten by latest descriptor",
                id.as_str()
            ));
        }
        Ok(())
    });

    let mut skipped = 0;
    for result in results {
        if let Err(err) = result {
            if strict {
                return Err(CadenceError::Descriptor(err));
            }
            output::warn(&format!("skipping descriptor: {}", err));
            skipped += 1;
        }
    }
    if skipped > 0 && !quiet {
        output::warn(&format!("{} descriptor(s) skipped", skipped));
    }

    Ok(store)
}

// A file argument is taken as-is; a directory is searched with the
// configured glob patterns. With no arguments the current directory is used.
fn discover_descriptors(paths: &[PathBuf], patterns: &[String]) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![env::current_dir()?]
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
            continue;
        }
        if !root.is_dir() {
            return Err(CadenceError::Other(anyhow::anyhow!(format!(
                "no such path: {}",
                root.display()
            ))));
        }
        for pattern in patterns {
            let full = root.join(pattern).to_string_lossy().into_owned();
            let matches =
                glob::glob(&full).map_err(|err| CadenceError::Other(anyhow::Error::new(err)))?;
            for entry in matches {
                let path = entry.map_err(|err| CadenceError::Other(anyhow::Error::new(err)))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn resolve_parallel(override_value: Option<usize>, config: &CadenceConfig) -> Option<usize> {
    if let Some(value) = override_value {
        return Some(value);
    }
    if let Ok(value) = env::var("CADENCE_PARALLEL") {
        if let Ok(parsed) = value.parse() {
            return Some(parsed);
        }
    }
    if let Some(value) = config.ingest.parallel {
        return Some(value);
    }
    std::thread::available_parallelism().ok().map(|n| n.get())
}

fn load_config(config_path: Option<PathBuf>) -> Result<CadenceConfig> {
    let cwd = env::current_dir()?;
    resolve_config(cwd, config_path).map_err(CadenceError::from)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| CadenceError::Other(anyhow::Error::new(err)))
}

#[derive(Serialize)]
struct GraphJson {
    nodes: Vec<String>,
    edges: Vec<GraphEdge>,
}

#[derive(Serialize)]
struct GraphEdge {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct CheckJson {
    cycles: Vec<Vec<String>>,
    external: Vec<ExternalJson>,
}

#[derive(Serialize)]
struct ExternalJson {
    from: String,
    dependency: String,
}

fn graph_to_json(graph: &DependencyGraph) -> GraphJson {
    let mut nodes: Vec<String> = graph
        .edges
        .keys()
        .map(|id| id.as_str().to_string())
        .collect();
    nodes.sort();

    let mut edges = Vec::new();
    for (from, deps) in &graph.edges {
        for dep in deps {
            edges.push(GraphEdge {
                from: from.as_str().to_string(),
                to: dep.as_str().to_string(),
            });
        }
    }
    edges.sort_by(|a, b| a.from.cmp(&b.from).then(a.to.cmp(&b.to)));

    GraphJson { nodes, edges }
}
