use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use aqm::io::{
    format_pass_table, sentiment_to_delimited, verdicts_to_delimited, write_delimited,
};
use aqm::rubrics::sentence_length;
use aqm::{
    load_transcripts, match_count_distribution, score_pace_rubric, score_sentiment,
    score_word_rubric, CallVerdict, Classifier, ClassifierConfig, Delimiter, HttpClassifier,
    LexiconClassifier, PaceConfig, PassSummary, ReportEnvelope, TabularVerdict, WordRubric,
    WordRubricConfig,
};

#[derive(Parser)]
#[command(name = "aqm")]
#[command(author, version, about = "Call-center transcript quality scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Directory of transcript JSON files
    #[arg(short, long, default_value = "calls")]
    input_dir: PathBuf,

    /// Write the full report (JSON) to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write per-call rows as delimited text to this file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Use tabs instead of commas in the delimited export
    #[arg(long)]
    tsv: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl CommonArgs {
    fn delimiter(&self) -> Delimiter {
        if self.tsv {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score greeting vocabulary in the agent's first words
    Greeting {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of agent words inspected from the start of the call
        #[arg(long, default_value = "20", allow_negative_numbers = true)]
        window: i64,

        /// Distinct greeting words needed to pass
        #[arg(long, default_value = "5", allow_negative_numbers = true)]
        threshold: i64,

        /// Only score these greeting words (comma separated)
        #[arg(long, value_delimiter = ',')]
        words: Option<Vec<String>>,
    },

    /// Score closing vocabulary in the agent's last words
    Closing {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of agent words inspected from the end of the call
        #[arg(long, default_value = "20", allow_negative_numbers = true)]
        window: i64,

        /// Distinct closing words needed to pass
        #[arg(long, default_value = "5", allow_negative_numbers = true)]
        threshold: i64,

        /// Only score these closing words (comma separated)
        #[arg(long, value_delimiter = ',')]
        words: Option<Vec<String>>,
    },

    /// Flag calls where the agent spoke a sentence too fast
    Pace {
        #[command(flatten)]
        common: CommonArgs,

        /// Ignore sentences shorter than this many characters
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        min_words: i64,

        /// Highest characters-per-second pace that still passes
        #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
        pace_to_pass: f64,
    },

    /// Bucket calls by text sentiment
    Sentiment {
        #[command(flatten)]
        common: CommonArgs,

        /// Polarity classifier endpoint (overrides AQM_CLASSIFIER_URL)
        #[arg(long)]
        classifier_url: Option<String>,
    },

    /// Summarize a transcript directory without scoring it
    Analyze {
        /// Directory of transcript JSON files
        #[arg(short, long, default_value = "calls")]
        input_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Greeting {
            common,
            window,
            threshold,
            words,
        } => {
            setup_logging(common.verbose);
            run_word_rubric(WordRubric::Greeting, &common, window, threshold, words)
        }
        Commands::Closing {
            common,
            window,
            threshold,
            words,
        } => {
            setup_logging(common.verbose);
            run_word_rubric(WordRubric::Closing, &common, window, threshold, words)
        }
        Commands::Pace {
            common,
            min_words,
            pace_to_pass,
        } => {
            setup_logging(common.verbose);
            run_pace(&common, min_words, pace_to_pass)
        }
        Commands::Sentiment {
            common,
            classifier_url,
        } => {
            setup_logging(common.verbose);
            run_sentiment(&common, classifier_url).await
        }
        Commands::Analyze { input_dir, verbose } => {
            setup_logging(verbose);
            analyze_directory(input_dir)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Write the JSON report and delimited export requested on the command line
fn export<P, S, T>(
    common: &CommonArgs,
    rubric: &str,
    parameters: P,
    summary: S,
    verdicts: &[CallVerdict<T>],
) -> Result<()>
where
    P: Serialize,
    S: Serialize,
    T: Serialize + TabularVerdict,
{
    if let Some(path) = &common.csv {
        write_delimited(path, &verdicts_to_delimited(verdicts, common.delimiter()))
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("Per-call rows written to {:?}", path);
    }

    if let Some(path) = &common.output {
        ReportEnvelope::new(rubric, parameters, summary, verdicts)
            .write_json(path)
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

fn run_word_rubric(
    rubric: WordRubric,
    common: &CommonArgs,
    window: i64,
    threshold: i64,
    words: Option<Vec<String>>,
) -> Result<()> {
    let config = WordRubricConfig::new(rubric, rubric.default_words(), window, threshold)
        .context("Invalid rubric configuration")?;
    let config = match words {
        Some(keep) => config.narrowed(keep.as_slice()),
        None => config,
    };

    info!(
        "Scoring {} on {:?}: window={}, threshold={}, {} words",
        rubric,
        common.input_dir,
        config.window,
        config.threshold,
        config.words.len()
    );

    let calls = load_transcripts(&common.input_dir).context("Failed to load transcripts")?;
    let verdicts = score_word_rubric(&calls, &config);
    let summary = PassSummary::from_verdicts(&verdicts);
    let distribution = match_count_distribution(&verdicts);

    print!("{}", format_pass_table(&rubric.to_string(), &summary));
    println!();
    println!("Match count distribution");
    println!("------------------------");
    for (match_count, count) in &distribution {
        println!("{:>3} words: {} calls", match_count, count);
    }

    let report_summary = serde_json::json!({
        "pass": summary,
        "match_count_distribution": distribution,
    });
    export(common, &rubric.to_string(), &config, report_summary, &verdicts)
}

fn run_pace(common: &CommonArgs, min_words: i64, pace_to_pass: f64) -> Result<()> {
    let config = PaceConfig::new(min_words, pace_to_pass).context("Invalid rubric configuration")?;

    info!(
        "Scoring pace on {:?}: min_words={}, pace_to_pass={}",
        common.input_dir, config.min_words, config.pace_to_pass
    );

    let calls = load_transcripts(&common.input_dir).context("Failed to load transcripts")?;
    let verdicts = score_pace_rubric(&calls, &config);
    let summary = PassSummary::from_verdicts(&verdicts);

    print!("{}", format_pass_table("pace", &summary));

    export(common, "pace", &config, summary, &verdicts)
}

async fn run_sentiment(common: &CommonArgs, classifier_url: Option<String>) -> Result<()> {
    let classifier_config = match classifier_url {
        Some(url) => Some(ClassifierConfig::new(url)),
        None => ClassifierConfig::from_env().context("Invalid classifier configuration")?,
    };
    let classifier = match classifier_config {
        Some(config) => {
            info!("Using polarity classifier at {}", config.endpoint);
            Classifier::Http(HttpClassifier::new(config)?)
        }
        None => {
            info!("No classifier endpoint configured, using built-in lexicon");
            Classifier::Lexicon(LexiconClassifier::default())
        }
    };

    let calls = load_transcripts(&common.input_dir).context("Failed to load transcripts")?;
    let report = score_sentiment(&calls, &classifier).await;
    let counts = &report.counts;

    println!("Sentiment ({} classifier)", classifier.name());
    println!("=========");
    println!("Total calls:    {}", counts.num_total_calls);
    println!("Positive calls: {}", counts.num_positive_calls);
    println!("Negative calls: {}", counts.num_negative_calls);
    println!("Short calls:    {}", counts.num_short_calls);
    if counts.num_skipped_calls > 0 {
        println!("Skipped calls:  {}", counts.num_skipped_calls);
    }

    if let Some(path) = &common.csv {
        write_delimited(path, &sentiment_to_delimited(&report, common.delimiter()))
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("Per-call rows written to {:?}", path);
    }

    if let Some(path) = &common.output {
        let parameters = serde_json::json!({ "classifier": classifier.name() });
        ReportEnvelope::new("sentiment", parameters, &report.counts, &report)
            .write_json(path)
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

fn analyze_directory(input_dir: PathBuf) -> Result<()> {
    info!("Analyzing transcripts in {:?}", input_dir);
    let calls = load_transcripts(&input_dir).context("Failed to load transcripts")?;

    let transcripts: Vec<_> = calls
        .iter()
        .filter_map(|c| c.transcript.as_ref().ok())
        .collect();
    let skipped = calls.len() - transcripts.len();

    let agent_words: usize = transcripts.iter().map(|t| t.agent_tokens().len()).sum();
    let total_words: usize = transcripts.iter().map(|t| t.words.len()).sum();
    let agent_sentences: usize = transcripts
        .iter()
        .map(|t| t.agent_sentences().count())
        .sum();

    let (agent_chars, agent_ms) = transcripts
        .iter()
        .flat_map(|t| t.agent_sentences())
        .filter_map(|s| s.duration_ms().map(|ms| (sentence_length(&s.text), ms)))
        .fold((0usize, 0u64), |(chars, total_ms), (len, ms)| {
            (chars + len, total_ms + ms)
        });
    let mean_pace = if agent_ms > 0 {
        agent_chars as f64 * 1000.0 / agent_ms as f64
    } else {
        0.0
    };

    println!("Transcript Analysis");
    println!("==================");
    println!("Transcript files: {}", calls.len());
    println!("Loaded calls: {}", transcripts.len());
    println!("Skipped files: {}", skipped);
    println!("Total words: {}", total_words);
    println!("Agent words: {}", agent_words);
    println!("Agent sentences: {}", agent_sentences);
    println!("Mean agent pace: {:.2} chars/s", mean_pace);

    for call in calls.iter().filter(|c| c.transcript.is_err()) {
        if let Err(e) = &call.transcript {
            println!("  skipped {:?}: {}", call.source, e);
        }
    }

    Ok(())
}
