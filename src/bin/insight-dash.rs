use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use insight_dash::aggregate::{aggregate, aggregate_all};
use insight_dash::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEED, ImageFormat, RenderOptions, ServerConfig};
use insight_dash::geo::{WORLD_GEOJSON_URL, provider_for};
use insight_dash::viz::text::fmt_value;
use insight_dash::{AggregateFn, Client, Dashboard, DataStore, Dimension, FilterEvent, FilterSet, Measure, ViewState};
use insight_dash::{server, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "insight-dash",
    version,
    about = "Serve, filter, aggregate & chart the insights dataset"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the seed documents at GET /api/data.
    Serve(ServeArgs),
    /// Render the bar, line, and map charts.
    Render(RenderArgs),
    /// Print (or save) the ranked aggregate table for one view.
    Aggregate(AggregateArgs),
    /// Print the filter panel's facet options as JSON.
    Facets(SourceArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// JSON array of record documents.
    #[arg(long, env = "DATA_SEED", default_value = DEFAULT_SEED)]
    seed: PathBuf,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Read records from a seed file instead of a running backend.
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Backend base URL.
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000")]
    url: String,
    /// Filter to apply first: a JSON object with year bounds and facet value lists.
    #[arg(long)]
    filters: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[arg(long, default_value = "source")]
    dimension: Dimension,
    #[arg(long, default_value = "sum")]
    aggregate: AggregateFn,
    #[arg(long, default_value = "intensity")]
    measure: Measure,
}

impl ViewArgs {
    fn view(&self) -> ViewState {
        ViewState::new(self.dimension, self.aggregate, self.measure)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    view: ViewArgs,
    /// Directory receiving bar/line/map files.
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = OutFormat::Svg)]
    format: OutFormat,
    /// Container width (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Container height (default 500).
    #[arg(long, default_value_t = 500)]
    height: u32,
    /// Boundary GeoJSON: a file path or an http(s) URL.
    #[arg(long, default_value = WORLD_GEOJSON_URL)]
    boundaries: String,
    /// Pointer position "x,y" for the bar and map tooltips.
    #[arg(long)]
    hover: Option<String>,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    view: ViewArgs,
    /// Keep every group instead of the top ten.
    #[arg(long, default_value_t = false)]
    all: bool,
    /// Save to .csv or .json instead of printing.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_point(s: &str) -> Option<(f64, f64)> {
    let (x, y) = s.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Aggregate(args) => cmd_aggregate(args),
        Command::Facets(args) => cmd_facets(args),
    }
}

fn cmd_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        seed: args.seed,
    };
    server::serve(&config)
}

/// Load the records and apply `--filters`, returning the dashboard's input.
fn load(source: &SourceArgs) -> Result<(DataStore, Option<FilterSet>)> {
    let store = match &source.seed {
        Some(path) => DataStore::from_seed_file(path)?,
        None => DataStore::fetch(&Client::new(source.url.as_str()))?,
    };
    let filters = match &source.filters {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read filters {}", path.display()))?;
            Some(
                serde_json::from_str::<FilterSet>(&text)
                    .with_context(|| format!("parse filters {}", path.display()))?,
            )
        }
        None => None,
    };
    Ok((store, filters))
}

fn filtered(store: &DataStore, filters: Option<&FilterSet>) -> Vec<insight_dash::Record> {
    match filters {
        Some(f) => f.apply(store.records()),
        None => store.records().to_vec(),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let options = RenderOptions {
        width: args.width,
        height: args.height,
        format: match args.format {
            OutFormat::Svg => ImageFormat::Svg,
            OutFormat::Png => ImageFormat::Png,
        },
        view: args.view.view(),
    };
    options.validate()?;
    let pointer = match args.hover.as_deref() {
        Some(s) => Some(parse_point(s).ok_or_else(|| anyhow::anyhow!("invalid --hover, expected x,y"))?),
        None => None,
    };

    let (store, filters) = load(&args.source)?;
    let mut dash = Dashboard::new(store, provider_for(&args.boundaries));
    if let Some(f) = filters {
        dash.handle(FilterEvent::Apply(f));
    }
    dash.bar.set_view(options.view);
    dash.resize_all(options.dimensions());
    dash.bar.hover(pointer);
    dash.map.hover(pointer);

    let written = dash.render_all(&args.out_dir, options.format)?;
    for path in &written {
        eprintln!("Wrote chart to {}", path.display());
    }
    Ok(())
}

fn cmd_aggregate(args: AggregateArgs) -> Result<()> {
    let (store, filters) = load(&args.source)?;
    let records = filtered(&store, filters.as_ref());
    let view = args.view.view();
    let rows = if args.all {
        aggregate_all(&records, view.dimension, view.aggregate, view.measure)
    } else {
        aggregate(&records, view.dimension, view.aggregate, view.measure)
    };

    match args.out.as_ref() {
        Some(path) => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv")
                .to_ascii_lowercase();
            match ext.as_str() {
                "csv" => storage::save_csv(&rows, view.dimension.as_str(), view.value_label(), path)?,
                "json" => storage::save_json(&rows, path)?,
                other => bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} rows to {}", rows.len(), path.display());
        }
        None => {
            println!("{}\t{}", view.dimension, view.value_label());
            for r in &rows {
                println!("{}\t{}", r.group, fmt_value(r.value));
            }
        }
    }
    Ok(())
}

fn cmd_facets(args: SourceArgs) -> Result<()> {
    let (store, _) = load(&args)?;
    println!("{}", serde_json::to_string_pretty(store.facets())?);
    Ok(())
}
