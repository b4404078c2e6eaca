//! Writes the generated summary, keywords and quiz to plain text files.

use crate::quiz::{answer_letter, option_letter, QuestionRecord};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";
pub const KEYWORDS_FILE: &str = "keywords.txt";
pub const QUIZ_FILE: &str = "quiz.txt";

/// Where each result was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPaths {
    pub summary: PathBuf,
    pub keywords: PathBuf,
    pub quiz: PathBuf,
}

/// Write the three result files into `out_dir`, creating it if needed.
///
/// Files are written one after another; a failure part-way leaves the
/// earlier files in place.
pub fn write_results<P: AsRef<Path>>(
    out_dir: P,
    summary: &str,
    keywords: &[String],
    questions: &[QuestionRecord],
) -> io::Result<ResultPaths> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let paths = ResultPaths {
        summary: out_dir.join(SUMMARY_FILE),
        keywords: out_dir.join(KEYWORDS_FILE),
        quiz: out_dir.join(QUIZ_FILE),
    };

    fs::write(&paths.summary, summary)?;
    fs::write(&paths.keywords, keywords.join(", "))?;
    fs::write(&paths.quiz, render_quiz(questions))?;

    tracing::debug!(dir = %out_dir.display(), "results written");
    Ok(paths)
}

/// Render questions as numbered blocks with lettered options and an answer line
pub fn render_quiz(questions: &[QuestionRecord]) -> String {
    let mut out = String::new();

    for (number, question) in questions.iter().enumerate() {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}) {}", number + 1, question.question_text);
        for (index, option) in question.options.iter().enumerate() {
            let _ = writeln!(out, "   {}) {}", option_letter(index), option);
        }
        let _ = writeln!(out, "Answer: {}\n", answer_letter(question.answer_index));
    }

    out
}
