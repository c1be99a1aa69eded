use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, warn};

use super::{GapSet, Selection, SelectionError, SelectionParseError, validate_target};
use crate::passage::{Token, normalize, words};

/// Something that can propose words worth hiding, typically a language
/// model. Returns the raw response text; parsing happens in [`select`].
#[allow(async_fn_in_trait)]
pub trait WordSource {
    async fn suggest(&self, passage: &str, count: usize) -> Result<String>;
}

/// Asks `source` for `target_count` words and keeps the ones that occur in
/// the passage, in passage order. The source may return more or fewer
/// usable words than requested; the result is not clamped.
pub async fn select<S: WordSource>(
    passage: &str,
    target_count: usize,
    source: &S,
) -> Result<Selection, SelectionError> {
    validate_target(target_count)?;
    if passage.trim().is_empty() {
        return Ok(Selection::empty());
    }

    let raw = source
        .suggest(passage, target_count)
        .await
        .map_err(SelectionError::Service)?;
    let suggested = parse_word_list(&raw).inspect_err(|err| {
        warn!(preview = %err.preview, "unparseable word list");
    })?;

    let gaps = gaps_in_passage_order(passage, &suggested);
    debug!(
        requested = target_count,
        suggested = suggested.len(),
        kept = gaps.len(),
        "selected words from suggestions"
    );

    if gaps.is_empty() {
        return Ok(Selection::no_gaps_possible());
    }
    Ok(Selection { gaps, notice: None })
}

/// Keeps the first passage occurrence of every distinct suggested word.
pub fn gaps_in_passage_order(passage: &str, suggested: &[String]) -> GapSet {
    let tokens = words(passage);
    let mut seen = HashSet::new();
    let mut picked: Vec<Token> = Vec::new();

    for word in suggested {
        let key = normalize(word.trim());
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        match tokens.iter().find(|t| t.normalized() == key) {
            Some(token) => picked.push(token.clone()),
            None => debug!(word = %word, "suggested word is not in the passage"),
        }
    }

    GapSet::from_tokens(picked)
}

/// Removes a surrounding Markdown code fence (with an optional language
/// tag) from a model response.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        Some((lang, body)) if lang.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a literal list of strings: a JSON array, or a list written with
/// single or double quoted strings.
pub fn parse_word_list(raw: &str) -> Result<Vec<String>, SelectionParseError> {
    let text = strip_code_fence(raw);
    if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
        return Ok(list);
    }
    parse_quoted_list(text).ok_or_else(|| SelectionParseError::from_response(raw))
}

fn parse_quoted_list(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => {
                    let escaped = chars.next()?;
                    item.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}
