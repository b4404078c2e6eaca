//! Textquiz CLI - summary, keywords and quiz for a text file
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use textquiz::pipeline::{self, Progress, Request, Step};
use textquiz::{document, writer, Config, HuggingFaceSummarizer, OpenAiChat, QuestionRecord};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "textquiz")]
#[command(author, version, about = "Summary, keywords and a multiple-choice quiz from a text file", long_about = None)]
struct Cli {
    /// Input document (.txt, UTF-8)
    input: PathBuf,
    /// Number of keywords to generate
    #[arg(short, long, default_value_t = pipeline::DEFAULT_KEYWORDS)]
    keywords: usize,
    /// Number of quiz questions to generate
    #[arg(short, long, default_value_t = pipeline::DEFAULT_QUESTIONS)]
    questions: usize,
    /// Directory for the result files
    #[arg(short, long, default_value = "out_results")]
    out: PathBuf,
    /// Maximum summary length (tokens, roughly words)
    #[arg(long, default_value_t = pipeline::DEFAULT_MAX_SUMMARY_LENGTH)]
    max_summary_length: u32,
    /// Config file (defaults to ./textquiz.toml or ~/.config/textquiz/textquiz.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Prints a line before and after each generation step
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn starting(&mut self, step: Step, request: &Request) {
        let line = match step {
            Step::Summary => "Creating summary with Hugging Face...".to_string(),
            Step::Keywords => format!("Generating {} keywords...", request.keywords),
            Step::Quiz => format!("Generating {} quiz questions...", request.questions),
        };
        println!("{}", line.cyan());
    }

    fn summary_ready(&mut self, summary: &str) {
        println!("Summary ready. Length: {} characters", summary.chars().count());
    }

    fn keywords_ready(&mut self, keywords: &[String]) {
        println!("Keywords: {}", keywords.join(", "));
    }

    fn quiz_ready(&mut self, questions: &[QuestionRecord]) {
        println!("Quiz generated: {} questions", questions.len());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env file if present (before reading credentials)
    let _ = dotenvy::dotenv();

    let default_filter = if cli.verbose {
        "textquiz=debug"
    } else {
        "textquiz=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Credentials are checked before any file or network access
    let config = Config::load(cli.config.as_deref())?;
    let credentials = config.credentials()?;

    let text = document::read_text_file(&cli.input)?;
    println!("Finished reading text. Length: {} characters", text.chars().count());

    let summarizer = HuggingFaceSummarizer::new(&config.summarizer, &credentials)?;
    let chat = OpenAiChat::new(&config.chat, &credentials)?;

    let request = Request {
        keywords: cli.keywords,
        questions: cli.questions,
        max_summary_length: cli.max_summary_length,
    };
    let generated = pipeline::generate(
        &summarizer,
        &chat,
        &config.chat,
        &text,
        &request,
        &mut ConsoleProgress,
    )
    .await?;

    let paths = writer::write_results(
        &cli.out,
        &generated.summary,
        &generated.keywords,
        &generated.questions,
    )
    .with_context(|| format!("failed to write results to {}", cli.out.display()))?;

    println!("Results saved to: {}", cli.out.display());
    println!(
        "Files: {} {} {}",
        paths.summary.display(),
        paths.keywords.display(),
        paths.quiz.display()
    );
    println!("\n{}", "Done.".green().bold());

    Ok(())
}
