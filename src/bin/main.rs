//! Linked Open Data Projection CLI
//!
//! Command-line tool for projecting named graphs into search documents and
//! for managing graphs in the triple store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lod_projector::{
    bulk_update, load_graphs, ntriples, Bindings, Graph, GraphSupplier, GraphUnit, LodError,
    NamespaceRegistry, Settings, TripleStore,
};

#[derive(Parser)]
#[command(name = "lod-projector")]
#[command(about = "Project Linked Open Data graphs into search documents")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a graph into a nested or flat document
    Project(ProjectArgs),
    /// Fetch a named graph as N-Triples
    Fetch(GraphArgs),
    /// Materialize the context around a subject from a SELECT query
    Context(ContextArgs),
    /// Replace a named graph, or upload an N-Quads file to the store
    Put(PutArgs),
    /// Merge triples into a named graph
    Post(PostArgs),
    /// Delete a named graph
    Delete(GraphArgs),
    /// Check whether a named graph exists
    Exists(GraphArgs),
    /// Send SPARQL update statements in batches
    Update(UpdateArgs),
    /// Load N-Triples files as named graphs
    Load(LoadArgs),
    /// Most common languages, classes and properties of a graph
    Stats(SourceArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Settings file (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct SourceArgs {
    /// Named graph IRI in the store, or a local N-Triples file
    source: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct ProjectArgs {
    /// Named graph IRI in the store, or a local N-Triples file
    source: String,

    /// Focal subject (default: the named graph IRI)
    #[arg(long)]
    about: Option<String>,

    /// Emit the flat document instead of the nested one
    #[arg(long)]
    flat: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct GraphArgs {
    /// Named graph IRI
    graph: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct ContextArgs {
    /// Subject to build the context around
    #[arg(long)]
    target: Option<String>,

    /// Restrict the query to this named graph
    #[arg(long)]
    graph: Option<String>,

    /// Only the subject's own statements
    #[arg(long)]
    describe: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct PutArgs {
    /// N-Triples file, or N-Quads when no graph is given
    file: PathBuf,

    /// Named graph to replace
    #[arg(long)]
    graph: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct PostArgs {
    /// Named graph IRI
    graph: String,

    /// N-Triples file
    file: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct UpdateArgs {
    /// File with one SPARQL update statement per line
    file: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct LoadArgs {
    /// N-Triples files; each becomes `<graph-base><file stem>`
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// IRI prefix for the named graphs
    #[arg(long, value_name = "IRI")]
    graph_base: String,

    #[command(flatten)]
    common: CommonArgs,
}

/// Check if a source string is a graph IRI rather than a file
fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(common: &CommonArgs) -> Result<Settings, LodError> {
    match &common.config {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    }
}

fn connect(settings: &Settings) -> Result<TripleStore, LodError> {
    TripleStore::new(&settings.store, Arc::new(settings.registry()))
}

/// Load a graph from the store or from a local N-Triples file
fn load_graph(source: &str, settings: &Settings) -> Result<Graph, LodError> {
    if is_url(source) {
        connect(settings)?.fetch(source)
    } else {
        let payload = fs::read_to_string(source)?;
        ntriples::parse(&payload, None, Arc::new(settings.registry()))
    }
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), LodError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, common: &CommonArgs) -> Result<(), LodError> {
    let content = if common.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_output(&content, common.output.as_ref())
}

fn run_project(args: ProjectArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let graph = load_graph(&args.source, &settings)?;

    let about = match args.about.or_else(|| graph.identifier().map(str::to_string)) {
        Some(about) => about,
        None if is_url(&args.source) => args.source.clone(),
        None => {
            return Err(LodError::Usage(
                "--about is required when projecting a local file".to_string(),
            ))
        }
    };

    let bindings = Bindings::new(&about, &graph, settings.projection);
    info!(
        about = %about,
        triples = bindings.graph().len(),
        resources = bindings.resources().len(),
        "Projecting graph"
    );
    let document = if args.flat {
        bindings.flat_document()
    } else {
        bindings.nested_document()
    };
    write_json(&document, &args.common)
}

fn run_fetch(args: GraphArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let graph = connect(&settings)?.fetch(&args.graph)?;
    info!(graph = %args.graph, triples = graph.len(), "Fetched graph");
    write_output(&ntriples::serialize(&graph), args.common.output.as_ref())
}

fn run_context(args: ContextArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let store = connect(&settings)?;
    let (graph, target) = (args.graph.as_deref(), args.target.as_deref());
    let materialized = if args.describe {
        store.describe_graph(graph, target)?
    } else {
        store.context_graph(graph, target)?
    };
    info!(
        triples = materialized.graph.len(),
        hop_levels = materialized.hop_levels,
        skipped_rows = materialized.skipped_rows,
        "Materialized context"
    );
    write_output(
        &ntriples::serialize(&materialized.graph),
        args.common.output.as_ref(),
    )
}

/// Print a write result and fail the command when the store refused it
fn report_write(action: &str, succeeded: bool, common: &CommonArgs) -> Result<(), LodError> {
    write_json(&serde_json::json!({ "action": action, "succeeded": succeeded }), common)?;
    if succeeded {
        Ok(())
    } else {
        Err(LodError::Rejected(action.to_string()))
    }
}

/// Read and validate an N-Triples file before sending it
fn read_ntriples(path: &Path, settings: &Settings) -> Result<String, LodError> {
    let payload = fs::read_to_string(path)?;
    let graph = ntriples::parse(&payload, None, Arc::new(settings.registry()))?;
    Ok(ntriples::serialize(&graph))
}

fn run_put(args: PutArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let store = connect(&settings)?;
    let succeeded = match &args.graph {
        Some(graph) => store.put(graph, &read_ntriples(&args.file, &settings)?),
        None => store.put_file(&args.file),
    };
    report_write("put", succeeded, &args.common)
}

fn run_post(args: PostArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let store = connect(&settings)?;
    let succeeded = store.post(&args.graph, &read_ntriples(&args.file, &settings)?);
    report_write("post", succeeded, &args.common)
}

fn run_delete(args: GraphArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let succeeded = connect(&settings)?.delete(&args.graph);
    report_write("delete", succeeded, &args.common)
}

fn run_exists(args: GraphArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let exists = connect(&settings)?.head(&args.graph)?;
    write_json(&serde_json::json!({ "graph": args.graph, "exists": exists }), &args.common)
}

fn run_update(args: UpdateArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let store = connect(&settings)?;
    let statements: Vec<String> = fs::read_to_string(&args.file)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    let report = bulk_update(&store, &statements, &settings.bulk);
    write_json(&report, &args.common)
}

fn run_load(args: LoadArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let store = connect(&settings)?;
    let mut units = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LodError::Usage(format!("No file name in {}", path.display())))?;
        units.push(GraphUnit {
            named_graph: format!("{}{}", args.graph_base, stem),
            payload: fs::read_to_string(path)?,
        });
    }
    let registry: Arc<NamespaceRegistry> = store.registry().clone();
    let report = load_graphs(&store, &units, registry);
    info!(
        stored = report.stored,
        failed = report.failed,
        parse_errors = report.parse_errors,
        "Loaded graphs"
    );
    write_json(&report, &args.common)
}

fn run_stats(args: SourceArgs) -> Result<(), LodError> {
    let settings = load_settings(&args.common)?;
    let graph = load_graph(&args.source, &settings)?;
    let statistics = graph.statistics(&settings.projection.excluded_properties);
    write_json(&statistics, &args.common)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Project(args) => run_project(args),
        Commands::Fetch(args) => run_fetch(args),
        Commands::Context(args) => run_context(args),
        Commands::Put(args) => run_put(args),
        Commands::Post(args) => run_post(args),
        Commands::Delete(args) => run_delete(args),
        Commands::Exists(args) => run_exists(args),
        Commands::Update(args) => run_update(args),
        Commands::Load(args) => run_load(args),
        Commands::Stats(args) => run_stats(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
