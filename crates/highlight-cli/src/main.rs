use clap::{Args, Parser, Subcommand, ValueEnum};
use doc_highlight::{
    GeometryIndex, HighlightConfig, HighlightEngine, HighlightError, IndexKey, IndexKind,
    PageViewport, Result, load_config,
};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "highlight-cli")]
#[command(about = "Resolve document highlights from extraction payloads", long_about = None)]
struct Cli {
    #[arg(short, long, global = true, help = "Print debug logs to stderr")]
    verbose: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Path to a JSON config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized records of one kind as JSON
    Records {
        #[arg(long, value_name = "FILE", help = "Extraction payload")]
        payload: PathBuf,

        #[arg(long, value_enum, default_value_t = KindArg::Word)]
        kind: KindArg,
    },
    /// Print the merged highlights for a selection as JSON
    Resolve {
        #[command(flatten)]
        layout: LayoutArgs,

        #[arg(long, help = "Fail if any key produces no highlight")]
        strict: bool,

        #[arg(required = true, value_name = "KEY", value_parser = parse_key)]
        keys: Vec<KeyArg>,
    },
    /// Print the scroll offset that brings the first key into view
    Scroll {
        #[command(flatten)]
        layout: LayoutArgs,

        #[arg(required = true, value_name = "KEY", value_parser = parse_key)]
        keys: Vec<KeyArg>,
    },
}

#[derive(Args)]
struct LayoutArgs {
    #[arg(long, value_name = "FILE", help = "Extraction payload")]
    payload: PathBuf,

    #[arg(long, value_name = "FILE", help = "JSON array of page viewports")]
    viewports: PathBuf,

    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    #[arg(long, value_enum, default_value_t = KindArg::Word, help = "Kind for bare numeric keys")]
    kind: KindArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Word,
    Line,
}

impl From<KindArg> for IndexKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Word => IndexKind::Word,
            KindArg::Line => IndexKind::Line,
        }
    }
}

/// `12` takes its kind from `--kind`; `word:12` and `line:12` are explicit.
#[derive(Clone, Copy)]
struct KeyArg {
    kind: Option<IndexKind>,
    value: u32,
}

impl KeyArg {
    fn resolve(self, default: IndexKind) -> IndexKey {
        IndexKey::new(self.kind.unwrap_or(default), self.value)
    }
}

fn parse_key(s: &str) -> std::result::Result<KeyArg, String> {
    let (kind, value) = match s.split_once(':') {
        Some(("word", value)) => (Some(IndexKind::Word), value),
        Some(("line", value)) => (Some(IndexKind::Line), value),
        Some((prefix, _)) => return Err(format!("unknown key kind '{}'", prefix)),
        None => (None, s),
    };
    let value = value
        .parse::<u32>()
        .map_err(|_| format!("'{}' is not a non-negative integer", value))?;
    Ok(KeyArg { kind, value })
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HighlightConfig::default(),
    };

    match cli.command {
        Command::Records { payload, kind } => {
            let index = doc_highlight::payload::load_payload(&payload)?;
            print_records(&index, kind.into())
        }
        Command::Resolve {
            layout,
            strict,
            keys,
        } => {
            let engine = build_engine(config, &layout)?;
            let keys = resolve_keys(&keys, layout.kind);
            let merged = if strict {
                engine.try_resolve(&keys)?
            } else {
                engine.resolve(&keys)
            };
            print_json(&merged)
        }
        Command::Scroll { layout, keys } => {
            let engine = build_engine(config, &layout)?;
            let keys = resolve_keys(&keys, layout.kind);
            match engine.scroll_offset_for(&keys) {
                Some(offset) => println!("{}", offset),
                None => println!("none"),
            }
            Ok(())
        }
    }
}

fn build_engine(config: HighlightConfig, layout: &LayoutArgs) -> Result<HighlightEngine> {
    let mut engine = HighlightEngine::new(config)?;
    engine.load_payload(&layout.payload)?;
    engine.set_layout(load_viewports(&layout.viewports)?, layout.zoom);
    Ok(engine)
}

fn load_viewports(path: &Path) -> Result<Vec<PageViewport>> {
    let json =
        fs::read_to_string(path).map_err(|e| HighlightError::FileReadError(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| HighlightError::SerializationError(e.to_string()))
}

fn resolve_keys(keys: &[KeyArg], kind: KindArg) -> Vec<IndexKey> {
    keys.iter().map(|key| key.resolve(kind.into())).collect()
}

fn print_records(index: &GeometryIndex, kind: IndexKind) -> Result<()> {
    let records: Vec<_> = index.records(kind).collect();
    print_json(&records)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HighlightError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
