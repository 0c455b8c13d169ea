// src/main.rs
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use plus_party::extractors::{ExtractionResult, MemoizedExtractor};
use plus_party::party::run_throttled;
use plus_party::storage::ReportStore;
use plus_party::utils::{self, html_debug, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Sum the numbers found in free text, ignoring mm/dd/yyyy dates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Texts to extract from; each one is handled separately
    texts: Vec<String>,

    /// Read input from a file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Treat every input line as a separate text
    #[arg(short, long)]
    lines: bool,

    /// Append stdin lines to a running text and print throttled recomputes
    #[arg(short, long)]
    watch: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Directory to save JSON reports into (optional)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Debug mode - save annotated HTML next to each report
    #[arg(short, long)]
    debug: bool,

    /// Minimum milliseconds between two recomputes in watch mode
    #[arg(long, env = "PLUS_PARTY_INTERVAL_MS", default_value_t = 250)]
    interval_ms: u64,

    /// Number of distinct inputs to remember in line mode (0 disables)
    #[arg(long, env = "PLUS_PARTY_CACHE_SIZE", default_value_t = 256)]
    cache_size: usize,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    validate_args(&args)?;

    // 3. Initialize storage
    let storage = args.output_dir.as_ref().map(ReportStore::new).transpose()?;

    if args.watch {
        return run_watch(&args, storage.as_ref()).await;
    }

    // 4. Collect inputs
    let inputs = collect_inputs(&args)?;
    tracing::info!("Processing {} input(s)", inputs.len());

    // 5. Extract each input
    let mut memo = MemoizedExtractor::new(args.cache_size);
    let mut grand_total = 0.0;

    for (label, text) in &inputs {
        let result = memo.extract(text);
        grand_total += result.total;
        print_result(args.format, label, &result)?;
        save_outputs(storage.as_ref(), args.debug, label, text, &result)?;
    }

    tracing::info!(
        "Processing finished. Inputs: {}, grand total: {}, cache hits: {}, misses: {}",
        inputs.len(),
        grand_total,
        memo.hits(),
        memo.misses()
    );

    Ok(())
}

fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.debug && args.output_dir.is_none() {
        return Err(AppError::Config("--debug needs --output-dir".to_string()));
    }
    if args.watch && (!args.texts.is_empty() || args.file.is_some()) {
        return Err(AppError::Config("--watch only reads from stdin".to_string()));
    }
    if !args.texts.is_empty() && (args.file.is_some() || args.lines) {
        return Err(AppError::Config(
            "positional texts cannot be combined with --file or --lines".to_string(),
        ));
    }
    Ok(())
}

fn collect_inputs(args: &Args) -> Result<Vec<(String, String)>, AppError> {
    if !args.texts.is_empty() {
        return Ok(args
            .texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("arg{}", i + 1), text.clone()))
            .collect());
    }

    let (source, content) = match &args.file {
        Some(path) => {
            tracing::info!("Reading input from {}", path.display());
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            (stem, std::fs::read_to_string(path)?)
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            ("stdin".to_string(), buffer)
        }
    };

    if args.lines {
        Ok(content
            .lines()
            .enumerate()
            .map(|(i, line)| (format!("{}_line{}", source, i + 1), line.to_string()))
            .collect())
    } else {
        Ok(vec![(source, content)])
    }
}

async fn run_watch(args: &Args, storage: Option<&ReportStore>) -> Result<(), AppError> {
    let interval = Duration::from_millis(args.interval_ms);
    tracing::info!("Watching stdin, recomputing at most every {:?}", interval);

    let (text_tx, text_rx) = watch::channel(String::new());
    let (result_tx, mut result_rx) = mpsc::unbounded_channel();
    let driver = tokio::spawn(run_throttled(text_rx, interval, result_tx));

    let format = args.format;
    let printer = tokio::spawn(async move {
        let mut last = ExtractionResult::default();
        while let Some(result) = result_rx.recv().await {
            if let Err(e) = print_result(format, "watch", &result) {
                tracing::error!("Failed to print result: {}", e);
            }
            last = result;
        }
        last
    });

    let mut raw_text = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        raw_text.push_str(&line);
        raw_text.push('\n');
        text_tx
            .send(raw_text.clone())
            .map_err(|_| AppError::Processing("Recompute driver stopped early".to_string()))?;
    }
    drop(text_tx);

    driver
        .await
        .map_err(|e| AppError::Processing(format!("Recompute driver failed: {}", e)))?;
    let last = printer
        .await
        .map_err(|e| AppError::Processing(format!("Printer task failed: {}", e)))?;

    save_outputs(storage, args.debug, "watch", &raw_text, &last)?;
    tracing::info!("Watch finished, final total: {}", last.total);
    Ok(())
}

fn print_result(format: OutputFormat, label: &str, result: &ExtractionResult) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => {
            let numbers = result
                .numbers
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{}: [{}] total {}", label, numbers, result.total);
        }
        OutputFormat::Json => {
            let line = serde_json::to_string(&serde_json::json!({
                "label": label,
                "numbers": result.numbers,
                "wrapped": result.wrapped,
                "total": result.total,
            }))
            .map_err(|e| AppError::Processing(format!("Failed to serialize result: {}", e)))?;
            println!("{}", line);
        }
    }
    Ok(())
}

fn save_outputs(
    storage: Option<&ReportStore>,
    debug: bool,
    label: &str,
    text: &str,
    result: &ExtractionResult,
) -> Result<(), AppError> {
    let Some(store) = storage else {
        return Ok(());
    };

    store.save_report(label, text, result)?;

    if debug {
        let path = store.path_for(label, "annotated.html");
        if let Err(e) = html_debug::save_annotated(text, &path) {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }
    Ok(())
}
