use rand::Rng;
use rand::seq::index;
use tracing::{debug, warn};

use super::{GapSet, Selection, SelectionError, SelectionNotice, validate_target};
use crate::passage::{Dep, Pos, Tag, Tagger, Token};

/// Words of an open class need more than this many characters to be worth hiding.
const MIN_OPEN_CLASS_CHARS: usize = 5;

/// Whether a tagged token is grammatically interesting enough to hide.
/// Untagged tokens are never eligible.
pub fn is_eligible(token: &Token) -> bool {
    let Some(attrs) = token.attrs else {
        return false;
    };
    if attrs.is_punct() || token.text.trim().is_empty() {
        return false;
    }

    attrs.tag.is_wh_pronoun()
        || (token.normalized() == "that"
            && matches!(attrs.dep, Dep::Nsubj | Dep::Dobj | Dep::Mark))
        || attrs.pos == Pos::Adp
        || attrs.tag == Tag::Vbg
        || (matches!(attrs.pos, Pos::Verb | Pos::Adj | Pos::Adv)
            && token.char_len() > MIN_OPEN_CLASS_CHARS)
}

pub fn candidates<T: Tagger + ?Sized>(passage: &str, tagger: &T) -> Vec<Token> {
    tagger
        .tag(passage)
        .into_iter()
        .filter(is_eligible)
        .collect()
}

/// Tags the passage and draws `target_count` eligible tokens uniformly at
/// random without replacement.
pub fn select<T, R>(
    passage: &str,
    target_count: usize,
    tagger: &T,
    rng: &mut R,
) -> Result<Selection, SelectionError>
where
    T: Tagger + ?Sized,
    R: Rng + ?Sized,
{
    validate_target(target_count)?;
    if passage.trim().is_empty() {
        return Ok(Selection::empty());
    }

    let candidates = candidates(passage, tagger);
    debug!(
        eligible = candidates.len(),
        requested = target_count,
        "tagged passage"
    );

    if candidates.is_empty() {
        warn!("no eligible words in passage");
        return Ok(Selection::no_gaps_possible());
    }

    let mut count = target_count;
    let mut notice = None;
    if candidates.len() < target_count {
        warn!(
            requested = target_count,
            available = candidates.len(),
            "clamping gap count to eligible words"
        );
        count = candidates.len();
        notice = Some(SelectionNotice::Clamped {
            requested: target_count,
            available: count,
        });
    }

    let picked: Vec<Token> = index::sample(rng, candidates.len(), count)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect();

    Ok(Selection {
        gaps: GapSet::from_tokens(picked),
        notice,
    })
}
