//! Sequential generation of summary, keywords and quiz from one text.

use crate::chat::ChatService;
use crate::config::ChatConfig;
use crate::keywords::{extract_keywords, KeywordError};
use crate::quiz::{generate_quiz, QuestionRecord, QuizError};
use crate::summary::{SummaryError, SummaryService};
use thiserror::Error;

pub const DEFAULT_KEYWORDS: usize = 8;
pub const DEFAULT_QUESTIONS: usize = 5;
pub const DEFAULT_MAX_SUMMARY_LENGTH: u32 = 200;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Keywords(#[from] KeywordError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// What to generate
#[derive(Debug, Clone, Copy)]
pub struct Request {
    pub keywords: usize,
    pub questions: usize,
    pub max_summary_length: u32,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS,
            questions: DEFAULT_QUESTIONS,
            max_summary_length: DEFAULT_MAX_SUMMARY_LENGTH,
        }
    }
}

/// Everything produced for one input text
#[derive(Debug, Clone)]
pub struct Generated {
    pub summary: String,
    pub keywords: Vec<String>,
    pub questions: Vec<QuestionRecord>,
}

/// Generation steps, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Summary,
    Keywords,
    Quiz,
}

/// Observer for progress between the generation steps
pub trait Progress {
    fn starting(&mut self, _step: Step, _request: &Request) {}
    fn summary_ready(&mut self, _summary: &str) {}
    fn keywords_ready(&mut self, _keywords: &[String]) {}
    fn quiz_ready(&mut self, _questions: &[QuestionRecord]) {}
}

/// Ignores all progress
pub struct Silent;

impl Progress for Silent {}

/// Run summary, keyword and quiz generation in order, stopping at the first error
pub async fn generate<S, C, P>(
    summarizer: &S,
    chat: &C,
    chat_config: &ChatConfig,
    text: &str,
    request: &Request,
    progress: &mut P,
) -> Result<Generated, PipelineError>
where
    S: SummaryService + ?Sized,
    C: ChatService + ?Sized,
    P: Progress + ?Sized,
{
    progress.starting(Step::Summary, request);
    let summary = summarizer.summarize(text, request.max_summary_length).await?;
    progress.summary_ready(&summary);

    progress.starting(Step::Keywords, request);
    let keywords = extract_keywords(chat, chat_config, text, request.keywords).await?;
    progress.keywords_ready(&keywords);

    progress.starting(Step::Quiz, request);
    let questions = generate_quiz(chat, chat_config, text, request.questions).await?;
    progress.quiz_ready(&questions);

    Ok(Generated {
        summary,
        keywords,
        questions,
    })
}
