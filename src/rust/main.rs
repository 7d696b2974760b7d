use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};

use sentiment_pipeline::server::{self, BackendClient, BackendProtocol, UiState};
use sentiment_pipeline::{
    init_logger, model_server, train, ui, validate_count, Corpus, ModelManager, ModelServerConfig,
    PipelineConfig, Predictor, Sentiment, SentimentDataGenerator, SentimentModel, TrainingConfig,
    UiConfig,
};

/// Minimum min/max class ratio for a corpus to count as balanced
const BALANCE_THRESHOLD: f64 = 0.9;
const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

#[derive(Parser)]
#[command(author, version, about = "Sentiment data generation, training and serving", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic labelled corpus as CSV and JSON
    Generate(GenerateArgs),
    /// Check that a generated corpus covers every class
    Validate(ValidateArgs),
    /// Train a model on a corpus and save it
    Train(TrainArgs),
    /// Classify text with a saved model
    Predict(PredictArgs),
    /// Serve the model over HTTP
    ServeModel(ServeModelArgs),
    /// Serve the browser UI in front of an inference backend
    ServeUi(ServeUiArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of examples (defaults to NUM_SAMPLES)
    #[arg(short, long, allow_negative_numbers = true)]
    num_samples: Option<i64>,
    /// Output directory (defaults to RAW_DATA_PATH)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ValidateArgs {
    /// CSV corpus (defaults to RAW_DATA_PATH/sentiment_data.csv)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct TrainArgs {
    /// CSV corpus (defaults to RAW_DATA_PATH/sentiment_data.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,
    #[arg(short, long)]
    model_path: Option<PathBuf>,
    #[arg(long)]
    max_features: Option<usize>,
    #[arg(long)]
    max_iter: Option<usize>,
    /// Fraction of the corpus held out for evaluation
    #[arg(long)]
    test_size: Option<f64>,
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct PredictArgs {
    /// Text to classify; starts an interactive session when omitted
    text: Option<String>,
    #[arg(short, long)]
    model_path: Option<PathBuf>,
}

#[derive(Args)]
struct ServeModelArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(short, long)]
    model_path: Option<PathBuf>,
}

#[derive(Args)]
struct ServeUiArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    /// Backend base URL, e.g. http://localhost:8001
    #[arg(long)]
    backend_url: Option<String>,
    /// `direct` or `seldon`
    #[arg(long)]
    protocol: Option<BackendProtocol>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = PipelineConfig::from_env()?;
    let count = match args.num_samples {
        Some(n) => validate_count(n)?,
        None => config.num_samples,
    };
    let seed = args.seed.unwrap_or(config.random_seed);
    if let Some(dir) = args.output_dir {
        config.raw_data_path = dir;
    }

    info!("Generating {} samples (seed {})...", count, seed);
    let corpus = SentimentDataGenerator::new(count, seed).generate();

    corpus.write_csv(config.corpus_csv_path())?;
    corpus.write_json(config.corpus_json_path())?;
    println!("Generated {} samples in {:?}", corpus.len(), config.raw_data_path);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let config = PipelineConfig::from_env()?;
    let path = args.input.unwrap_or_else(|| config.corpus_csv_path());
    let corpus = Corpus::read_csv(&path).with_context(|| format!("reading {:?}", path))?;

    let counts = corpus.class_counts();
    println!("Total samples: {}", corpus.len());
    for (sentiment, count) in &counts {
        println!("  {:<8} {}", sentiment, count);
    }

    let missing: Vec<&Sentiment> = counts
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(sentiment, _)| sentiment)
        .collect();
    if !missing.is_empty() {
        bail!("Corpus is missing classes: {:?}", missing);
    }

    let ratio = corpus.balance_ratio();
    if ratio >= BALANCE_THRESHOLD {
        println!("Class balance ratio {:.2}: balanced", ratio);
    } else {
        warn!("Class balance ratio {:.2} is below {:.2}", ratio, BALANCE_THRESHOLD);
        println!("Class balance ratio {:.2}: imbalanced", ratio);
    }
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    let config = PipelineConfig::from_env()?;
    let data_path = args.data.unwrap_or_else(|| config.corpus_csv_path());
    let model_path = args.model_path.unwrap_or(config.model_path);

    let corpus = Corpus::read_csv(&data_path).with_context(|| format!("reading {:?}", data_path))?;
    let training = TrainingConfig {
        max_features: args.max_features.unwrap_or(config.max_features),
        max_iter: args.max_iter.unwrap_or(config.max_iter),
        test_size: args.test_size.unwrap_or(config.test_split),
        random_state: args.seed.unwrap_or(config.random_seed),
        ..TrainingConfig::default()
    };

    let start_time = Instant::now();
    let outcome = train(&corpus, &training)?;
    info!("=== Training finished (took {:.2?}) ===", start_time.elapsed());

    println!("Accuracy: {:.4}\n", outcome.report.accuracy);
    println!("{}", outcome.report);

    ModelManager::new(&model_path).save_model(&outcome.model)?;
    println!("Model saved to {:?}", model_path);
    Ok(())
}

fn print_prediction(model: &SentimentModel, text: &str) -> Result<()> {
    let prediction = model.predict_one(text)?;
    let probabilities = model.class_probabilities(text)?;
    println!("Sentiment:  {}", prediction.sentiment);
    println!("Confidence: {:.4}", prediction.confidence);
    println!(
        "Probabilities: negative {:.4}, neutral {:.4}, positive {:.4}",
        probabilities.negative, probabilities.neutral, probabilities.positive
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let config = PipelineConfig::from_env()?;
    let model_path = args.model_path.unwrap_or(config.model_path);
    let model = ModelManager::new(&model_path).load_model()?;

    if let Some(text) = args.text {
        return print_prediction(&model, &text);
    }

    println!("Enter text to classify ('quit' to exit).");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if EXIT_WORDS.contains(&text.to_lowercase().as_str()) {
            break;
        }
        if text.is_empty() {
            println!("Please enter some text.");
            continue;
        }
        if let Err(e) = print_prediction(&model, text) {
            error!("Prediction failed: {}", e);
        }
    }
    Ok(())
}

async fn run_serve_model(args: ServeModelArgs) -> Result<()> {
    let mut config = ModelServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = args.model_path {
        config.model_path = path;
    }

    let predictor = Arc::new(Predictor::new());
    if let Err(e) = predictor.load(&config.model_path) {
        error!("Failed to load model, serving unloaded: {}", e);
    }

    server::serve(model_server::router(predictor), &config.bind_address()).await?;
    Ok(())
}

async fn run_serve_ui(args: ServeUiArgs) -> Result<()> {
    let mut config = UiConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(protocol) = args.protocol {
        config.backend_protocol = protocol;
    }
    if let Some(secs) = args.timeout_secs {
        config.backend_timeout = Duration::from_secs(secs);
    }
    let backend_url = args.backend_url.unwrap_or_else(|| config.backend_url());

    info!("Using {} backend at {}", config.backend_protocol, backend_url);
    let client = BackendClient::new(backend_url, config.backend_protocol, config.backend_timeout)?;
    let state = Arc::new(UiState::new(client)?);

    server::serve(ui::router(state), &config.bind_address()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Train(args) => run_train(args),
        Commands::Predict(args) => run_predict(args),
        Commands::ServeModel(args) => run_serve_model(args).await,
        Commands::ServeUi(args) => run_serve_ui(args).await,
    }
}
