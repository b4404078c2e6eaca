//! Keyword extraction through the chat service.

use crate::chat::{ChatError, ChatRequest, ChatService};
use crate::config::ChatConfig;
use crate::document::truncate_chars;
use thiserror::Error;

/// Characters of input text included in the keyword prompt
const KEYWORD_INPUT_CHARS: usize = 4000;

/// Delimiters tried in order; the first one present in the reply is used
const DELIMITERS: [char; 3] = [',', '\n', ';'];

const SYSTEM_PROMPT: &str = "You are an assistant that extracts the most important keywords from a text.";

#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("keyword generation failed: {0}")]
    Chat(#[from] ChatError),
}

/// Ask the chat service for `count` keywords describing `text`
pub async fn extract_keywords<C>(
    chat: &C,
    config: &ChatConfig,
    text: &str,
    count: usize,
) -> Result<Vec<String>, KeywordError>
where
    C: ChatService + ?Sized,
{
    let request = ChatRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: keyword_prompt(text, count),
        max_tokens: config.keyword_max_tokens,
        temperature: config.keyword_temperature,
    };

    let reply = chat.complete(&request).await?;
    Ok(split_keywords(&reply, count))
}

fn keyword_prompt(text: &str, count: usize) -> String {
    format!(
        "Extract {count} keywords (comma separated) from the text below. \
         Return only the requested number of keywords, short and to the point.\n\n\
         Text:\n{}\n\n\
         Result:",
        truncate_chars(text, KEYWORD_INPUT_CHARS)
    )
}

/// Split a keyword reply into at most `count` trimmed, non-empty keywords.
///
/// Splits on the first of comma, newline, semicolon found in the reply, or on
/// whitespace when none is present. Short results are not padded.
pub fn split_keywords(reply: &str, count: usize) -> Vec<String> {
    let reply = reply.trim();
    let fragments: Vec<&str> = match DELIMITERS.iter().find(|d| reply.contains(**d)) {
        Some(delimiter) => reply.split(*delimiter).collect(),
        None => reply.split_whitespace().collect(),
    };

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(count)
        .map(str::to_string)
        .collect()
}
