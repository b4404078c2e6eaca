//! # Textquiz
//!
//! Turns a text document into study material using hosted models.
//!
//! ## Features
//!
//! - **Summary**: condensed text from a Hugging Face summarization model
//! - **Keywords**: a fixed number of keywords from a chat model
//! - **Quiz**: multiple-choice questions parsed from free-form chat output
//!
//! Results are written to `summary.txt`, `keywords.txt` and `quiz.txt`.

pub mod chat;
pub mod config;
pub mod document;
pub mod http;
pub mod keywords;
pub mod pipeline;
pub mod quiz;
pub mod summary;
pub mod writer;

pub use chat::{ChatService, OpenAiChat};
pub use config::Config;
pub use quiz::QuestionRecord;
pub use summary::{HuggingFaceSummarizer, SummaryService};
