use std::{fmt::Display, fs, path::PathBuf, str::FromStr};

use anyhow::Context;
use ccl_core::{
    logger::{LogLevel, Logger},
    reader::{FlatFileEdgeReader, IndexedEdgeReader},
};
use clap::Parser;

use crate::{config::MatrixConfig, matrix::run_matrix, reference::sequential_components};

pub mod config;
pub mod matrix;
pub mod random;
pub mod reference;
pub mod visualization;

#[derive(Parser, Debug)]
#[command(name = "ccl-harness")]
#[command(version = "0.1")]
#[command(about = "Random-graph generation, reference comparison, and visualization for the connected-components engine", long_about = None)]
pub struct Args {
    /// meaning depends on mode: a matrix TOML config (test), an output
    /// graph path (generate), or an input graph path (visualize).
    path: Option<String>,

    #[arg(short, long, default_value_t = Mode::Test)]
    mode: Mode,

    #[arg(long, default_value_t = 1000)]
    vertex_count: i32,

    #[arg(long, default_value_t = 3.0)]
    density: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Test,
    Generate,
    Visualize,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Mode::Test),
            "generate" | "gen" => Ok(Mode::Generate),
            "visualize" | "vis" => Ok(Mode::Visualize),
            _ => Err(anyhow::anyhow!("Invalid mode: {}", s)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Test => write!(f, "Test"),
            Mode::Generate => write!(f, "Generate"),
            Mode::Visualize => write!(f, "Visualize"),
        }
    }
}

fn main() {
    let logger = Logger::new(LogLevel::Info, "harness".to_string(), None);
    let res = run(&logger);
    match &res {
        Ok(_) => logger.info("harness completed successfully."),
        Err(e) => logger.error(&format!("harness failed: {e}")),
    }
}

fn run(logger: &Logger) -> anyhow::Result<()> {
    logger.info(&format!(
        "running from: {}",
        fs::canonicalize(".").context("failed to canonicalize cwd")?.display()
    ));

    let args = Args::parse();

    match &args.mode {
        Mode::Generate => generate(logger, &args),
        Mode::Test => test(logger, &args),
        Mode::Visualize => visualize(logger, &args),
    }
    .with_context(|| format!("failed in mode: {}", &args.mode))
}

fn test(logger: &Logger, args: &Args) -> anyhow::Result<()> {
    let config = match &args.path {
        Some(path) => MatrixConfig::load_from_path(path).context("loading matrix config")?,
        None => MatrixConfig::default(),
    };

    let results = run_matrix(&config, logger);
    let failed: Vec<_> = results.iter().filter(|c| !c.passed).collect();

    logger.info(&format!("{} / {} cases passed", results.len() - failed.len(), results.len()));
    for case in &failed {
        logger.error(&format!(
            "FAILED V={} density={} P={}: {:?}",
            case.vertex_count, case.density, case.process_count, case.error
        ));
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if !failed.is_empty() {
        anyhow::bail!("{} matrix case(s) failed", failed.len());
    }
    Ok(())
}

fn generate(logger: &Logger, args: &Args) -> anyhow::Result<()> {
    let out_path = args.path.clone().context("generate mode requires an output path")?;
    let edge_count = (args.density * args.vertex_count as f64).round().max(0.0) as usize;
    let rows = random::generate_graph(args.seed, args.vertex_count, edge_count);

    logger.info(&format!("generated {} vertices, ~{} edges -> {out_path}", args.vertex_count, edge_count));
    fs::write(&out_path, random::to_flat_file_text(&rows))?;
    Ok(())
}

fn visualize(logger: &Logger, args: &Args) -> anyhow::Result<()> {
    let in_path = args.path.clone().context("visualize mode requires an input path")?;
    let reader = FlatFileEdgeReader::open(&PathBuf::from(&in_path))?;

    let rows: Vec<_> = (0..reader.vertex_count())
        .map(|v| reader.read_range(v, v).map(|mut r| r.remove(0)))
        .collect::<anyhow::Result<_>>()?;
    let labels = sequential_components(&rows);

    let dot_path = format!("{in_path}.dot");
    visualization::write_dot(std::path::Path::new(&dot_path), &rows, &labels)?;
    logger.info(&format!("wrote {dot_path}"));
    Ok(())
}
