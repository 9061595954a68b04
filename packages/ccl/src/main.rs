use ccl_core::{
    logger::{LogLevel, Logger},
    reader::{FlatFileEdgeReader, IndexedEdgeReader},
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ccl")]
#[command(version = "0.1")]
#[command(about = "Distributed connected-components engine", long_about = None)]
struct Args {
    file: String,

    /// number of simulated ranks; must be a power of two.
    #[arg(short = 'p', long, default_value_t = 1)]
    processes: usize,

    /// re-run the whole computation this many times (useful for timing).
    #[arg(short, long, default_value_t = 1)]
    repeat: u32,

    #[arg(short, long, default_value_t = LogLevel::Info)]
    log: LogLevel,

    #[arg(long, default_value_t = false)]
    log_file: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file_path = if args.log_file {
        Some(format!(
            "logs/ccl_run_{}.txt",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        ))
    } else {
        None
    };
    let logger = Logger::new(args.log, "ccl".to_owned(), log_file_path);

    let reader = FlatFileEdgeReader::open(std::path::Path::new(&args.file))?;
    logger.info(&format!(
        "loaded {} vertices from {}",
        reader.vertex_count(),
        args.file
    ));

    let mut last_result = None;
    for attempt in 0..args.repeat.max(1) {
        logger.debug(&format!("attempt {}/{}", attempt + 1, args.repeat.max(1)));
        match ccl_core::run(&reader, args.processes, Some(&logger)) {
            Ok(result) => last_result = Some(result),
            Err(e) => {
                logger.error(&format!("run failed: {e}"));
                return Err(Box::new(e));
            }
        }
    }

    let result = last_result.expect("at least one attempt always runs");
    let json = serde_json::to_string_pretty(&SerializableResult::from(result))?;
    println!("{json}");

    Ok(())
}

#[derive(serde::Serialize)]
struct SerializableResult {
    per_rank_labels: Vec<Vec<i32>>,
    component_count: Option<usize>,
}

impl From<ccl_core::EngineResult> for SerializableResult {
    fn from(result: ccl_core::EngineResult) -> Self {
        SerializableResult {
            per_rank_labels: result.per_rank_labels,
            component_count: result.component_count,
        }
    }
}
