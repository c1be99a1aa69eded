use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lexicon::{self, contains};
use super::token::{Token, normalize};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*|[^\w\s]").unwrap());

const SENTENCE_OPENERS: &[&str] = &[".", "!", "?", "\"", "“", "‘", "("];

const INDEFINITE_HEADS: &[&str] = &[
    "one", "something", "anything", "everything", "nothing", "someone", "anyone", "everyone",
];

/// Coarse part of speech (Universal Dependencies tag set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

/// Fine-grained Penn Treebank tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    #[serde(rename = "WDT")]
    Wdt,
    #[serde(rename = "WP")]
    Wp,
    #[serde(rename = "WP$")]
    WpPoss,
    #[serde(rename = "WRB")]
    Wrb,
    #[serde(rename = "VB")]
    Vb,
    #[serde(rename = "VBD")]
    Vbd,
    #[serde(rename = "VBG")]
    Vbg,
    #[serde(rename = "VBN")]
    Vbn,
    #[serde(rename = "VBP")]
    Vbp,
    #[serde(rename = "VBZ")]
    Vbz,
    #[serde(rename = "NN")]
    Nn,
    #[serde(rename = "NNS")]
    Nns,
    #[serde(rename = "NNP")]
    Nnp,
    #[serde(rename = "JJ")]
    Jj,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "TO")]
    To,
    #[serde(rename = "DT")]
    Dt,
    #[serde(rename = "PRP")]
    Prp,
    #[serde(rename = "PRP$")]
    PrpPoss,
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "MD")]
    Md,
    #[serde(rename = "PUNCT")]
    Punct,
    #[serde(rename = "XX")]
    Other,
}

impl Tag {
    pub fn is_wh_pronoun(self) -> bool {
        matches!(self, Tag::Wdt | Tag::Wp | Tag::WpPoss)
    }
}

/// Syntactic role of a token relative to its head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dep {
    Nsubj,
    Dobj,
    Mark,
    Det,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TokenAttrs {
    pub pos: Pos,
    pub tag: Tag,
    pub dep: Dep,
}

impl TokenAttrs {
    pub const fn new(pos: Pos, tag: Tag) -> Self {
        Self {
            pos,
            tag,
            dep: Dep::Other,
        }
    }

    pub const fn with_dep(mut self, dep: Dep) -> Self {
        self.dep = dep;
        self
    }

    pub fn is_punct(&self) -> bool {
        matches!(self.pos, Pos::Punct)
    }
}

/// Splits a passage into tokens and annotates every token with
/// grammatical attributes. Whitespace is never returned as a token.
pub trait Tagger {
    fn tag(&self, passage: &str) -> Vec<Token>;
}

/// Lexicon and suffix driven English tagger. It needs no model files and
/// is deterministic, at the cost of the occasional wrong guess on open
/// class words.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTagger;

impl Tagger for HeuristicTagger {
    fn tag(&self, passage: &str) -> Vec<Token> {
        let raw: Vec<Token> = TOKEN_RE
            .find_iter(passage)
            .enumerate()
            .map(|(index, m)| Token::new(m.as_str(), index, m.start(), m.end()))
            .collect();

        let lexical: Vec<TokenAttrs> = raw
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let sentence_initial = i == 0 || contains(SENTENCE_OPENERS, &raw[i - 1].text);
                lexical_attrs(&token.text, sentence_initial)
            })
            .collect();

        let mut tagged: Vec<TokenAttrs> = Vec::with_capacity(raw.len());
        for (i, token) in raw.iter().enumerate() {
            let word = token.normalized();
            let prev = i.checked_sub(1).map(|p| (raw[p].normalized(), tagged[p]));
            let next = lexical.get(i + 1).copied();
            tagged.push(in_context(
                &token.text,
                &word,
                lexical[i],
                prev.as_ref().map(|(w, a)| (w.as_str(), *a)),
                next,
            ));
        }

        raw.into_iter()
            .zip(tagged)
            .map(|(token, attrs)| token.with_attrs(attrs))
            .collect()
    }
}

fn lexical_attrs(text: &str, sentence_initial: bool) -> TokenAttrs {
    let Some(first) = text.chars().next() else {
        return TokenAttrs::new(Pos::X, Tag::Other);
    };
    if !(first.is_alphanumeric() || first == '_') {
        return symbol_attrs(first);
    }

    let word = normalize(text);
    let w = word.as_str();

    if w.chars().any(char::is_numeric) && !w.chars().any(char::is_alphabetic) {
        return TokenAttrs::new(Pos::Num, Tag::Cd);
    }
    if let Some(attrs) = closed_class(w) {
        return attrs;
    }
    if let Some(past) = lexicon::irregular_verb(w) {
        let tag = if past { Tag::Vbd } else { Tag::Vbn };
        return TokenAttrs::new(Pos::Verb, tag);
    }
    if contains(lexicon::BASE_VERBS, w) {
        return TokenAttrs::new(Pos::Verb, Tag::Vb);
    }
    if lexicon::third_person_of_base_verb(w) {
        return TokenAttrs::new(Pos::Verb, Tag::Vbz);
    }
    if !sentence_initial && first.is_uppercase() {
        return TokenAttrs::new(Pos::Propn, Tag::Nnp);
    }
    open_class(w)
}

fn symbol_attrs(c: char) -> TokenAttrs {
    match c {
        '$' | '+' | '=' | '<' | '>' | '|' | '^' | '~' | '%' | '&' | '#' | '@' | '*' | '€' | '£'
        | '¥' => TokenAttrs::new(Pos::Sym, Tag::Other),
        _ => TokenAttrs::new(Pos::Punct, Tag::Punct),
    }
}

fn closed_class(w: &str) -> Option<TokenAttrs> {
    let attrs = if contains(lexicon::WH_DETERMINERS, w) {
        TokenAttrs::new(Pos::Pron, Tag::Wdt)
    } else if contains(lexicon::WH_PRONOUNS, w) {
        TokenAttrs::new(Pos::Pron, Tag::Wp)
    } else if contains(lexicon::WH_POSSESSIVES, w) {
        TokenAttrs::new(Pos::Det, Tag::WpPoss)
    } else if contains(lexicon::WH_ADVERBS, w) {
        TokenAttrs::new(Pos::Adv, Tag::Wrb)
    } else if w == "that" {
        TokenAttrs::new(Pos::Sconj, Tag::In).with_dep(Dep::Mark)
    } else if w == "to" {
        TokenAttrs::new(Pos::Part, Tag::To)
    } else if contains(lexicon::PREPOSITIONS, w) {
        TokenAttrs::new(Pos::Adp, Tag::In)
    } else if contains(lexicon::DETERMINERS, w) {
        TokenAttrs::new(Pos::Det, Tag::Dt).with_dep(Dep::Det)
    } else if contains(lexicon::POSSESSIVE_DETERMINERS, w) {
        TokenAttrs::new(Pos::Pron, Tag::PrpPoss)
    } else if contains(lexicon::SUBJECT_PRONOUNS, w) {
        TokenAttrs::new(Pos::Pron, Tag::Prp).with_dep(Dep::Nsubj)
    } else if contains(lexicon::OBJECT_PRONOUNS, w) {
        TokenAttrs::new(Pos::Pron, Tag::Prp).with_dep(Dep::Dobj)
    } else if contains(lexicon::OTHER_PRONOUNS, w) {
        TokenAttrs::new(Pos::Pron, Tag::Prp)
    } else if contains(lexicon::BE_FORMS, w)
        || contains(lexicon::HAVE_FORMS, w)
        || contains(lexicon::DO_FORMS, w)
    {
        TokenAttrs::new(Pos::Aux, auxiliary_tag(w))
    } else if contains(lexicon::MODALS, w) || w.ends_with("n't") || w.ends_with("n’t") {
        TokenAttrs::new(Pos::Aux, Tag::Md)
    } else if contains(lexicon::COORDINATORS, w) {
        TokenAttrs::new(Pos::Cconj, Tag::Cc)
    } else if contains(lexicon::SUBORDINATORS, w) {
        TokenAttrs::new(Pos::Sconj, Tag::In)
    } else if w == "not" {
        TokenAttrs::new(Pos::Part, Tag::Rb)
    } else if contains(lexicon::ADVERBS, w) {
        TokenAttrs::new(Pos::Adv, Tag::Rb)
    } else {
        return None;
    };
    Some(attrs)
}

fn auxiliary_tag(w: &str) -> Tag {
    match w {
        "is" | "has" | "does" => Tag::Vbz,
        "am" | "are" | "have" | "do" => Tag::Vbp,
        "was" | "were" | "had" | "did" => Tag::Vbd,
        "been" => Tag::Vbn,
        "being" | "having" => Tag::Vbg,
        _ => Tag::Vb,
    }
}

fn open_class(w: &str) -> TokenAttrs {
    let len = w.chars().count();

    if len >= 5 && w.ends_with("ing") && !contains(lexicon::ING_NOUNS, w) {
        return TokenAttrs::new(Pos::Verb, Tag::Vbg);
    }
    if len >= 5 && w.ends_with("ed") && !contains(lexicon::ED_NON_VERBS, w) {
        return TokenAttrs::new(Pos::Verb, Tag::Vbd);
    }
    if len >= 5 && w.ends_with("ly") {
        if contains(lexicon::LY_ADJECTIVES, w) {
            return TokenAttrs::new(Pos::Adj, Tag::Jj);
        }
        if !contains(lexicon::LY_NOUNS, w) {
            return TokenAttrs::new(Pos::Adv, Tag::Rb);
        }
    }
    if len >= 6 {
        if ["izes", "yzes", "ifies"].iter().any(|s| w.ends_with(s)) {
            return TokenAttrs::new(Pos::Verb, Tag::Vbz);
        }
        if lexicon::VERB_SUFFIXES.iter().any(|s| w.ends_with(s)) {
            return TokenAttrs::new(Pos::Verb, Tag::Vb);
        }
    }
    let adjective = lexicon::ADJECTIVE_SUFFIXES
        .iter()
        .any(|s| w.ends_with(s) && len >= s.len() + 2);
    if adjective && !contains(lexicon::SUFFIX_NOUNS, w) {
        return TokenAttrs::new(Pos::Adj, Tag::Jj);
    }

    if len > 3 && w.ends_with('s') && !["ss", "us", "is"].iter().any(|s| w.ends_with(s)) {
        TokenAttrs::new(Pos::Noun, Tag::Nns)
    } else {
        TokenAttrs::new(Pos::Noun, Tag::Nn)
    }
}

/// Refines a lexical guess with the already tagged previous token and the
/// lexical guess for the next one.
fn in_context(
    text: &str,
    word: &str,
    lexical: TokenAttrs,
    prev: Option<(&str, TokenAttrs)>,
    next: Option<TokenAttrs>,
) -> TokenAttrs {
    if word == "that" {
        return resolve_that(prev, next);
    }
    if word == "to" {
        let nominal = next.is_some_and(|n| {
            matches!(n.pos, Pos::Det | Pos::Noun | Pos::Propn | Pos::Num | Pos::Adj)
                || matches!(n.tag, Tag::PrpPoss)
                || n.dep == Dep::Dobj
        });
        return if nominal {
            TokenAttrs::new(Pos::Adp, Tag::In)
        } else {
            lexical
        };
    }

    let Some((prev_word, prev_attrs)) = prev else {
        return lexical;
    };
    let after_subject = contains(lexicon::SUBJECT_PRONOUNS, prev_word) || prev_word == "who";
    let after_be_or_have =
        contains(lexicon::BE_FORMS, prev_word) || contains(lexicon::HAVE_FORMS, prev_word);
    let after_determiner = matches!(prev_attrs.pos, Pos::Det | Pos::Adj)
        || matches!(prev_attrs.tag, Tag::PrpPoss);

    match (lexical.pos, lexical.tag) {
        (Pos::Noun, Tag::Nn | Tag::Nns) if after_subject => {
            let tag = if text.ends_with('s') { Tag::Vbz } else { Tag::Vbp };
            TokenAttrs::new(Pos::Verb, tag)
        }
        (Pos::Noun, Tag::Nn | Tag::Nns)
            if matches!(prev_attrs.tag, Tag::Md | Tag::To) || contains(lexicon::DO_FORMS, prev_word) =>
        {
            TokenAttrs::new(Pos::Verb, Tag::Vb)
        }
        (Pos::Noun, Tag::Nn)
            if contains(lexicon::BE_FORMS, prev_word)
                || (prev_attrs.pos == Pos::Adv && contains(lexicon::DEGREE_ADVERBS, prev_word)) =>
        {
            TokenAttrs::new(Pos::Adj, Tag::Jj)
        }
        (Pos::Verb, Tag::Vbd) if after_be_or_have => TokenAttrs::new(Pos::Verb, Tag::Vbn),
        (Pos::Verb, Tag::Vb) if after_subject => TokenAttrs::new(Pos::Verb, Tag::Vbp),
        (Pos::Verb, Tag::Vb) if after_determiner => TokenAttrs::new(Pos::Noun, Tag::Nn),
        (Pos::Verb, Tag::Vbz) if after_determiner => TokenAttrs::new(Pos::Noun, Tag::Nns),
        _ => lexical,
    }
}

/// "that" can be a relative pronoun (subject or object of the clause it
/// opens), a complementizer, a demonstrative pronoun or a determiner.
fn resolve_that(prev: Option<(&str, TokenAttrs)>, next: Option<TokenAttrs>) -> TokenAttrs {
    let mark = TokenAttrs::new(Pos::Sconj, Tag::In).with_dep(Dep::Mark);
    let next_pos = next.map(|n| n.pos);
    let clause_end = matches!(next_pos, None | Some(Pos::Punct));
    let next_is_predicate = matches!(next_pos, Some(Pos::Verb | Pos::Aux | Pos::Adv));

    if let Some((word, attrs)) = prev {
        if contains(lexicon::CLAUSE_VERBS, word) || attrs.pos == Pos::Adj {
            return mark;
        }
        let nominal_head =
            matches!(attrs.pos, Pos::Noun | Pos::Propn) || contains(INDEFINITE_HEADS, word);
        if nominal_head && !clause_end {
            let dep = if next_is_predicate {
                Dep::Nsubj
            } else {
                Dep::Dobj
            };
            return TokenAttrs::new(Pos::Pron, Tag::Wdt).with_dep(dep);
        }
        if clause_end {
            let dep = if attrs.pos == Pos::Verb {
                Dep::Dobj
            } else {
                Dep::Other
            };
            return TokenAttrs::new(Pos::Pron, Tag::Dt).with_dep(dep);
        }
    } else if clause_end {
        return TokenAttrs::new(Pos::Pron, Tag::Dt);
    }

    match next_pos {
        Some(Pos::Verb | Pos::Aux) => TokenAttrs::new(Pos::Pron, Tag::Dt).with_dep(Dep::Nsubj),
        Some(Pos::Noun | Pos::Adj | Pos::Propn) => {
            TokenAttrs::new(Pos::Det, Tag::Dt).with_dep(Dep::Det)
        }
        _ => mark,
    }
}
