//! Multiple-choice quiz generation and parsing.
//!
//! The chat model is asked for numbered questions with `A)`..`D)` options and
//! an `Answer: X` line, but nothing guarantees it complies. [`parse_quiz`]
//! extracts whatever questions it can from the reply and only fails when it
//! finds none at all.

use crate::chat::{ChatError, ChatRequest, ChatService};
use crate::config::ChatConfig;
use crate::document::truncate_chars;
use thiserror::Error;

/// Characters of input text included in the quiz prompt
const QUIZ_INPUT_CHARS: usize = 6000;

/// Number of options a well-formed question carries
pub const OPTION_COUNT: usize = 4;

/// Stand-in for options the model did not provide
pub const PLACEHOLDER_OPTION: &str = "---";

const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

const SYSTEM_PROMPT: &str =
    "You are an expert assistant who writes multiple-choice questions and marks the correct answer.";

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("quiz generation failed: {0}")]
    Chat(#[from] ChatError),
    #[error("could not parse any quiz questions from the response")]
    NoQuestions,
}

/// One parsed quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// First line of the block, enumeration marker included
    pub question_text: String,
    /// Answer choices in A-D order
    pub options: Vec<String>,
    /// Index of the correct option, when the answer line was understood
    pub answer_index: Option<usize>,
}

/// How a block of the reply is interpreted, decided by its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Starts with a digit (any script) or `Q`: question line, then options
    Numbered,
    /// Anything else; option markers may appear on any line
    Loose,
}

impl BlockKind {
    pub fn classify(first_line: &str) -> Self {
        match first_line.chars().next() {
            Some(c) if c.is_numeric() || c == 'Q' => BlockKind::Numbered,
            _ => BlockKind::Loose,
        }
    }
}

/// A single recognized line inside a block
#[derive(Debug, PartialEq, Eq)]
enum Marker {
    Option(String),
    Answer(Option<usize>),
}

/// Ask the chat service for `count` questions about `text` and parse them
pub async fn generate_quiz<C>(
    chat: &C,
    config: &ChatConfig,
    text: &str,
    count: usize,
) -> Result<Vec<QuestionRecord>, QuizError>
where
    C: ChatService + ?Sized,
{
    let request = ChatRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: quiz_prompt(text, count),
        max_tokens: config.quiz_max_tokens,
        temperature: config.quiz_temperature,
    };

    let reply = chat.complete(&request).await?;
    parse_quiz(&reply, count)
}

fn quiz_prompt(text: &str, count: usize) -> String {
    format!(
        "Generate {count} quiz questions about the text below. \
         Each question must have 4 answer options (A, B, C, D). \
         Mark the correct answer with its letter (e.g. 'Answer: B').\n\n\
         Text:\n{}\n\n\
         Format:\n1) Question?\nA) ...\nB) ...\nC) ...\nD) ...\nAnswer: X\n\n\
         Begin:",
        truncate_chars(text, QUIZ_INPUT_CHARS)
    )
}

/// Parse a free-form quiz reply into at most `count` questions.
///
/// Blocks are separated by blank lines and parsed according to their
/// [`BlockKind`]. Numbered blocks always yield exactly four options, padded
/// with [`PLACEHOLDER_OPTION`]; loose blocks keep only the options found.
pub fn parse_quiz(reply: &str, count: usize) -> Result<Vec<QuestionRecord>, QuizError> {
    let mut questions = Vec::new();

    for block in reply.trim().split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            continue;
        };

        let kind = BlockKind::classify(first);
        let record = match kind {
            BlockKind::Numbered => parse_numbered_block(&lines),
            BlockKind::Loose => parse_loose_block(&lines),
        };

        match record {
            Some(record) => questions.push(record),
            None => tracing::debug!(?kind, first_line = %first, "skipping block without options"),
        }
    }

    if questions.is_empty() {
        return Err(QuizError::NoQuestions);
    }

    questions.truncate(count);
    Ok(questions)
}

/// Question on the first line, options and answer on the lines after it
pub fn parse_numbered_block(lines: &[&str]) -> Option<QuestionRecord> {
    let (question_text, rest) = lines.split_first()?;
    let (mut options, answer_index) = scan_markers(rest);
    if question_text.is_empty() || options.is_empty() {
        return None;
    }

    options.truncate(OPTION_COUNT);
    options.resize(OPTION_COUNT, PLACEHOLDER_OPTION.to_string());

    Some(QuestionRecord {
        question_text: question_text.to_string(),
        options,
        answer_index,
    })
}

/// Options and answer anywhere in the block, the first line doubling as the question.
///
/// Options are not padded, so the answer index may point past the options found.
pub fn parse_loose_block(lines: &[&str]) -> Option<QuestionRecord> {
    let question_text = lines.first()?;
    let (options, answer_index) = scan_markers(lines);
    if options.is_empty() {
        return None;
    }

    Some(QuestionRecord {
        question_text: question_text.to_string(),
        options,
        answer_index,
    })
}

/// Collect options in order of appearance; the last answer line wins
fn scan_markers(lines: &[&str]) -> (Vec<String>, Option<usize>) {
    let mut options = Vec::new();
    let mut answer_index = None;

    for line in lines {
        match classify_line(line) {
            Some(Marker::Option(text)) => options.push(text),
            Some(Marker::Answer(index)) => answer_index = index,
            None => {}
        }
    }

    (options, answer_index)
}

fn classify_line(line: &str) -> Option<Marker> {
    for letter in OPTION_LETTERS {
        let mut rest = line.chars();
        if rest.next() != Some(letter) {
            continue;
        }
        let after_letter = rest.as_str();
        if after_letter.starts_with(')') || after_letter.starts_with(' ') {
            return Some(Marker::Option(option_text(after_letter)));
        }
    }

    if starts_with_ignore_case(line, "answer") {
        // without a colon the line is ignored and any earlier answer stands
        let (_, value) = line.split_once(':')?;
        return Some(Marker::Answer(answer_index(value)));
    }

    None
}

/// Text after the first `)`, or the whole remainder when there is none
fn option_text(after_letter: &str) -> String {
    match after_letter.split_once(')') {
        Some((_, text)) => text.trim().to_string(),
        None => after_letter.trim().to_string(),
    }
}

/// Answer letter up to the next colon, mapped to an option index
fn answer_index(value: &str) -> Option<usize> {
    let letter = value.split(':').next().unwrap_or_default();
    match letter.trim().to_uppercase().as_str() {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Letter for an answer index, or `?` when unknown or out of range
pub fn answer_letter(answer_index: Option<usize>) -> char {
    answer_index
        .and_then(|i| OPTION_LETTERS.get(i).copied())
        .unwrap_or('?')
}

/// Letter labelling the option at `index` (A, B, C, ...)
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map(char::from)
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct CannedChat(Result<String, ()>);

    #[async_trait]
    impl ChatService for CannedChat {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, ChatError> {
            self.0.clone().map_err(|_| ChatError::EmptyResponse)
        }
    }

    #[test]
    fn test_well_formed_block() {
        let questions = parse_quiz("1) What is X?\nA) a\nB) b\nC) c\nD) d\nAnswer: C", 5).unwrap();

        assert_eq!(
            questions,
            vec![QuestionRecord {
                question_text: "1) What is X?".to_string(),
                options: options(&["a", "b", "c", "d"]),
                answer_index: Some(2),
            }]
        );
    }

    #[test]
    fn test_missing_option_is_padded_in_order() {
        let questions = parse_quiz("2) Pick one\nA) first\nB) second\nD) fourth\nAnswer: D", 5).unwrap();

        assert_eq!(
            questions[0].options,
            options(&["first", "second", "fourth", PLACEHOLDER_OPTION])
        );
        assert_eq!(questions[0].answer_index, Some(3));
    }

    #[test]
    fn test_multiple_blocks_and_count_limit() {
        let reply = "1) One?\nA) a\nB) b\nC) c\nD) d\nAnswer: A\n\n\
                     2) Two?\nA) a\nB) b\nC) c\nD) d\nAnswer: b\n\n\
                     3) Three?\nA) a\nB) b\nC) c\nD) d\nAnswer: D";

        let questions = parse_quiz(reply, 2).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "1) One?");
        assert_eq!(questions[1].question_text, "2) Two?");
        assert_eq!(questions[1].answer_index, Some(1));
    }

    #[test]
    fn test_q_prefix_and_indented_lines() {
        let reply = "Q: Which planet is red?\n   A) Venus\n   B) Mars\n   C) Jupiter\n   D) Saturn\n   answer : b";
        let questions = parse_quiz(reply, 5).unwrap();

        assert_eq!(questions[0].question_text, "Q: Which planet is red?");
        assert_eq!(questions[0].options[1], "Mars");
        assert_eq!(questions[0].answer_index, Some(1));
    }

    #[test]
    fn test_unmapped_answer_left_unset() {
        let reply = "1) Q?\nA) a\nB) b\nAnswer: E";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, None);

        let reply = "1) Q?\nA) a\nB) b\nAnswer: B) b";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, None);

        let reply = "1) Q?\nA) a\nB) b\nAnswer B";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, None);
    }

    #[test]
    fn test_answer_line_without_colon_keeps_earlier_answer() {
        let reply = "1) Q?\nA) a\nB) b\nAnswer: B\nAnswers may vary";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, Some(1));

        let reply = "1) Q?\nA) a\nB) b\nAnswer: B\nAnswer: none";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, None);
    }

    #[test]
    fn test_answer_stops_at_second_colon() {
        let reply = "1) Q?\nA) a\nB) b\nAnswer: A: because";
        assert_eq!(parse_quiz(reply, 5).unwrap()[0].answer_index, Some(0));
    }

    #[test]
    fn test_option_markers_are_case_sensitive() {
        let reply = "1) Q?\na) lower\nA) upper\nb) nope";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(
            questions[0].options,
            options(&["upper", PLACEHOLDER_OPTION, PLACEHOLDER_OPTION, PLACEHOLDER_OPTION])
        );
    }

    #[test]
    fn test_letter_space_marker() {
        let reply = "1) Q?\nA ) spaced\nB plain text\nAnswer: A";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions[0].options[0], "spaced");
        assert_eq!(questions[0].options[1], "plain text");
    }

    #[test]
    fn test_words_starting_with_option_letters_are_not_options() {
        let reply = "1) Q?\nAlso consider this\nBecause reasons\nA) real";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions[0].options[0], "real");
        assert_eq!(questions[0].options[1], PLACEHOLDER_OPTION);
    }

    #[test]
    fn test_numbered_block_caps_options_at_four() {
        let reply = "1) Q?\nA) a\nB) b\nC) c\nD) d\nA) again";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions[0].options, options(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_numbered_block_without_options_is_skipped() {
        let reply = "1) Here are your questions\n\n2) Real?\nA) yes\nB) no";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "2) Real?");
    }

    #[test]
    fn test_loose_block_keeps_found_options_only() {
        let reply = "What colour is the sky?\nA) blue\nB) green\nAnswer: A";
        let questions = parse_quiz(reply, 5).unwrap();

        assert_eq!(
            questions[0],
            QuestionRecord {
                question_text: "What colour is the sky?".to_string(),
                options: options(&["blue", "green"]),
                answer_index: Some(0),
            }
        );
    }

    #[test]
    fn test_loose_block_scans_first_line() {
        let lines = ["A) option on the first line", "B) second"];
        let record = parse_loose_block(&lines).unwrap();
        assert_eq!(record.question_text, "A) option on the first line");
        assert_eq!(record.options, options(&["option on the first line", "second"]));
    }

    #[test]
    fn test_loose_block_without_options_is_skipped() {
        assert!(parse_loose_block(&["Here is your quiz:", "Good luck"]).is_none());
    }

    #[test]
    fn test_preamble_and_mixed_blocks() {
        let reply = "Sure! Here is the quiz.\n\n\
                     1) First?\nA) a\nB) b\nC) c\nD) d\nAnswer: B\n\n\
                     Second question without number\nA) x\nB) y\nC) z\nAnswer: C";

        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question_text, "Second question without number");
        assert_eq!(questions[1].options.len(), 3);
        assert_eq!(questions[1].answer_index, Some(2));
    }

    #[test]
    fn test_no_questions_is_parse_error() {
        let err = parse_quiz("I cannot help with that.\n\nSorry.", 5).unwrap_err();
        assert!(matches!(err, QuizError::NoQuestions));

        assert!(matches!(parse_quiz("", 5), Err(QuizError::NoQuestions)));
    }

    #[test]
    fn test_classify() {
        assert_eq!(BlockKind::classify("1) x"), BlockKind::Numbered);
        assert_eq!(BlockKind::classify("12. x"), BlockKind::Numbered);
        assert_eq!(BlockKind::classify("Question 3"), BlockKind::Numbered);
        assert_eq!(BlockKind::classify("q1) x"), BlockKind::Loose);
        assert_eq!(BlockKind::classify("What?"), BlockKind::Loose);
        assert_eq!(BlockKind::classify("١) x"), BlockKind::Numbered);
        assert_eq!(BlockKind::classify("３. x"), BlockKind::Numbered);
    }

    #[test]
    fn test_non_ascii_numbered_block_is_padded() {
        let questions = parse_quiz("١) What?\nA) a\nB) b", 5).unwrap();
        assert_eq!(questions[0].question_text, "١) What?");
        assert_eq!(
            questions[0].options,
            options(&["a", "b", PLACEHOLDER_OPTION, PLACEHOLDER_OPTION])
        );
    }

    #[test]
    fn test_loose_block_answer_past_found_options() {
        let reply = "What colour is the sky?\nA) blue\nB) green\nAnswer: D";
        let questions = parse_quiz(reply, 5).unwrap();
        assert_eq!(questions[0].options, options(&["blue", "green"]));
        assert_eq!(questions[0].answer_index, Some(3));
    }

    #[test]
    fn test_answer_letter() {
        assert_eq!(answer_letter(Some(0)), 'A');
        assert_eq!(answer_letter(Some(3)), 'D');
        assert_eq!(answer_letter(Some(4)), '?');
        assert_eq!(answer_letter(None), '?');
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(4), 'E');
    }

    #[tokio::test]
    async fn test_generate_quiz_parses_reply() {
        let chat = CannedChat(Ok("1) What is X?\nA) a\nB) b\nC) c\nD) d\nAnswer: C".to_string()));
        let questions = generate_quiz(&chat, &ChatConfig::default(), "X is c.", 5)
            .await
            .unwrap();
        assert_eq!(questions[0].answer_index, Some(2));
    }

    #[tokio::test]
    async fn test_generate_quiz_transport_error_is_distinct() {
        let chat = CannedChat(Err(()));
        let err = generate_quiz(&chat, &ChatConfig::default(), "text", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Chat(_)));
    }

    #[tokio::test]
    async fn test_generate_quiz_unparseable_reply() {
        let chat = CannedChat(Ok("no quiz today".to_string()));
        let err = generate_quiz(&chat, &ChatConfig::default(), "text", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::NoQuestions));
    }
}
