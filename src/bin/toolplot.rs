use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;
use toolplot::engine::{Figure, RecordingCanvas};
use toolplot::export::{SaveOptions, save_figure};
use toolplot::merge::merge_common;
use toolplot::{PlotData, Theme, plot_subplots};

#[derive(Parser, Debug)]
#[command(
    name = "toolplot",
    version,
    about = "Render declarative chart descriptions (JSON) to SVG/PNG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a plot description to one or more image files.
    Render(RenderArgs),
    /// Show what a plot description resolves to, without drawing.
    Inspect(InspectArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Style {
    Default,
    Presentation,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Plot description (JSON).
    spec: PathBuf,
    /// Output file; `.svg` renders SVG, other extensions a bitmap. Repeatable.
    #[arg(short, long)]
    out: Vec<PathBuf>,
    /// Figure name, written as <figure-dir>/<format>/<name>.<format>.
    #[arg(long, requires = "figure_dir")]
    name: Option<String>,
    #[arg(long, requires = "name")]
    figure_dir: Option<PathBuf>,
    /// Output format for --name (default png). Repeatable.
    #[arg(long = "format")]
    formats: Vec<String>,
    /// Also archive timestamped copies here.
    #[arg(long)]
    historical_dir: Option<PathBuf>,
    /// Built-in style preset.
    #[arg(long, value_enum, default_value_t = Style::Default)]
    style: Style,
    /// Theme file (JSON); overrides --style.
    #[arg(long)]
    theme: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Plot description (JSON).
    spec: PathBuf,
    /// Print the recorded drawing calls instead of the merged panels.
    #[arg(long, default_value_t = false)]
    calls: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load(path: &PathBuf) -> Result<PlotData> {
    PlotData::from_path(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    if args.out.is_empty() && args.name.is_none() {
        anyhow::bail!("nothing to write: pass --out, or --name with --figure-dir");
    }
    let data = load(&args.spec)?;
    let theme = match &args.theme {
        Some(path) => {
            Theme::from_path(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => match args.style {
            Style::Default => Theme::default(),
            Style::Presentation => Theme::presentation(),
        },
    };

    let mut figure = Figure::new(theme);
    plot_subplots(&mut figure, &data)?;

    let mut targets: Vec<SaveOptions> = args
        .out
        .iter()
        .map(|path| SaveOptions {
            path: Some(path.clone()),
            historical_dir: args.historical_dir.clone(),
            ..Default::default()
        })
        .collect();
    if let Some(name) = &args.name {
        targets.push(SaveOptions {
            name: Some(name.clone()),
            figure_dir: args.figure_dir.clone(),
            formats: args.formats.clone(),
            historical_dir: args.historical_dir.clone(),
            ..Default::default()
        });
    }

    for opts in &targets {
        for path in save_figure(&figure, opts)? {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Panels in document order; serde_json's own map would sort the ids.
struct Ordered(Vec<(String, Value)>);

impl Serialize for Ordered {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let data = load(&args.spec)?;

    if args.calls {
        let mut canvas = RecordingCanvas::new();
        plot_subplots(&mut canvas, &data)?;
        if let Some(spec) = &canvas.figure {
            println!(
                "figure {:.1}x{:.1} in, {}x{} grid",
                spec.size.0, spec.size.1, spec.layout.rows, spec.layout.columns
            );
        }
        for ((id, _), (pos, axes)) in data.plots.iter().zip(&canvas.panels) {
            println!("[{id}] row {} col {}", pos.row, pos.col);
            for call in &axes.calls {
                println!("  {call:?}");
            }
        }
        return Ok(());
    }

    let mut merged = Vec::with_capacity(data.plots.len());
    for (id, datum) in data.plots.iter() {
        let value = serde_json::to_value(merge_common(datum, &data.common))?;
        merged.push((id.to_string(), strip_nulls(value)));
    }
    println!("{}", serde_json::to_string_pretty(&Ordered(merged))?);
    Ok(())
}
