pub mod lexicon;
pub mod tagger;
pub mod token;

pub use tagger::{Dep, HeuristicTagger, Pos, Tag, Tagger, TokenAttrs};
pub use token::{Token, is_word, normalize, words};
