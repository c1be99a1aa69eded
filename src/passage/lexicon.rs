//! Closed-class English word lists and a small table of common verbs used by
//! the heuristic tagger. All entries are lowercase.

pub const WH_DETERMINERS: &[&str] = &["which", "whichever", "whatever"];

pub const WH_PRONOUNS: &[&str] = &["who", "whom", "what", "whoever", "whomever"];

pub const WH_POSSESSIVES: &[&str] = &["whose"];

pub const WH_ADVERBS: &[&str] = &["when", "where", "why", "how", "whenever", "wherever"];

pub const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "amid", "among", "around", "as",
    "at", "before", "behind", "below", "beneath", "beside", "besides", "between", "beyond", "by",
    "despite", "down", "during", "except", "for", "from", "in", "inside", "into", "like", "near",
    "of", "off", "on", "onto", "out", "outside", "over", "past", "since", "than", "through",
    "throughout", "till", "toward", "towards", "under", "underneath", "until", "unto", "up",
    "upon", "via", "with", "within", "without",
];

pub const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "these", "those", "some", "any", "each", "every", "no", "all",
    "both", "either", "neither", "another", "such", "many", "few", "several",
];

pub const POSSESSIVE_DETERMINERS: &[&str] = &["my", "your", "his", "her", "its", "our", "their"];

pub const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

pub const OTHER_PRONOUNS: &[&str] = &[
    "me", "him", "us", "them", "myself", "yourself", "himself", "herself", "itself",
    "ourselves", "yourselves", "themselves", "mine", "yours", "hers", "ours", "theirs",
    "someone", "something", "anyone", "anything", "everyone", "everything", "nobody",
    "nothing", "somebody", "anybody", "everybody", "one",
];

pub const OBJECT_PRONOUNS: &[&str] = &["me", "him", "us", "them"];

pub const BE_FORMS: &[&str] = &["am", "is", "are", "was", "were", "be", "been", "being"];

pub const HAVE_FORMS: &[&str] = &["have", "has", "had", "having"];

pub const DO_FORMS: &[&str] = &["do", "does", "did"];

pub const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must",
];

pub const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet"];

pub const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "unless", "whereas", "whether", "if", "while", "once",
];

pub const ADVERBS: &[&str] = &[
    "not", "very", "also", "never", "always", "often", "too", "quite", "rather", "just", "now",
    "then", "here", "there", "soon", "already", "still", "again", "almost", "even", "ever",
    "only", "perhaps", "maybe", "yesterday", "today", "tomorrow", "tonight", "really", "well",
    "much", "more", "most", "less", "least", "so", "away", "back", "together", "however",
    "therefore", "instead", "sometimes", "usually", "especially", "enough", "else", "indeed",
    "later", "ago", "abroad", "outdoors", "anyway",
];

/// Adverbs that grade a following adjective.
pub const DEGREE_ADVERBS: &[&str] = &[
    "very", "so", "too", "quite", "rather", "really", "extremely", "incredibly", "fairly",
    "pretty", "more", "most", "less", "least",
];

/// Verbs after which "that" introduces a clause instead of pointing at a thing.
pub const CLAUSE_VERBS: &[&str] = &[
    "say", "says", "said", "think", "thinks", "thought", "know", "knows", "knew", "believe",
    "believes", "believed", "hope", "hopes", "hoped", "feel", "feels", "felt", "mean", "means",
    "meant", "show", "shows", "showed", "shown", "realize", "realizes", "realized", "suggest",
    "suggests", "suggested", "claim", "claims", "claimed", "explain", "explains", "explained",
    "tell", "tells", "told", "find", "finds", "found", "notice", "noticed", "learn", "learned",
    "agree", "agreed", "hear", "heard", "ensure", "ensured", "note", "noted", "argue", "argued",
];

pub const BASE_VERBS: &[&str] = &[
    "go", "get", "make", "take", "see", "come", "know", "think", "look", "want", "give", "use",
    "find", "tell", "ask", "work", "seem", "feel", "try", "leave", "call", "keep", "let",
    "begin", "help", "show", "hear", "play", "run", "move", "live", "believe", "bring",
    "happen", "write", "sit", "stand", "lose", "pay", "meet", "include", "continue", "learn",
    "change", "lead", "understand", "watch", "follow", "stop", "create", "speak", "read",
    "spend", "grow", "open", "walk", "win", "teach", "offer", "remember", "consider", "appear",
    "buy", "serve", "die", "send", "build", "stay", "fall", "cut", "reach", "kill", "raise",
    "pass", "sell", "decide", "return", "explain", "hope", "develop", "carry", "break",
    "receive", "agree", "support", "hit", "produce", "eat", "cover", "catch", "draw", "choose",
    "like", "love", "need", "say", "put", "mean", "become", "turn", "start", "travel", "study",
    "visit", "wait", "swim", "sing", "drink", "drive", "fly", "sleep", "jump", "listen",
    "answer", "arrive", "enjoy", "finish", "prefer", "describe", "improve", "discover",
];

/// Irregular past tense (`true`) and past participle (`false`) forms.
pub const IRREGULAR_VERBS: &[(&str, bool)] = &[
    ("went", true),
    ("gone", false),
    ("came", true),
    ("bought", true),
    ("saw", true),
    ("seen", false),
    ("took", true),
    ("taken", false),
    ("made", true),
    ("gave", true),
    ("given", false),
    ("found", true),
    ("thought", true),
    ("told", true),
    ("became", true),
    ("left", true),
    ("felt", true),
    ("brought", true),
    ("began", true),
    ("begun", false),
    ("kept", true),
    ("held", true),
    ("wrote", true),
    ("written", false),
    ("stood", true),
    ("heard", true),
    ("meant", true),
    ("met", true),
    ("ran", true),
    ("paid", true),
    ("sat", true),
    ("spoke", true),
    ("spoken", false),
    ("grew", true),
    ("grown", false),
    ("lost", true),
    ("fell", true),
    ("fallen", false),
    ("sent", true),
    ("built", true),
    ("understood", true),
    ("drew", true),
    ("drawn", false),
    ("broke", true),
    ("broken", false),
    ("spent", true),
    ("rose", true),
    ("risen", false),
    ("drove", true),
    ("driven", false),
    ("wore", true),
    ("worn", false),
    ("chose", true),
    ("chosen", false),
    ("caught", true),
    ("taught", true),
    ("sold", true),
    ("said", true),
    ("got", true),
    ("gotten", false),
    ("knew", true),
    ("known", false),
    ("ate", true),
    ("eaten", false),
    ("won", true),
    ("sang", true),
    ("sung", false),
    ("swam", true),
    ("flew", true),
    ("flown", false),
    ("forgot", true),
    ("forgotten", false),
    ("threw", true),
    ("thrown", false),
    ("hid", true),
    ("hidden", false),
    ("led", true),
    ("fed", true),
    ("fought", true),
    ("slept", true),
    ("stole", true),
    ("stolen", false),
    ("woke", true),
    ("drank", true),
    ("drunk", false),
];

/// "-ing" words that are nouns.
pub const ING_NOUNS: &[&str] = &[
    "thing", "something", "nothing", "anything", "everything", "king", "ring", "spring",
    "morning", "evening", "string", "ceiling", "wing", "sibling", "pudding", "during",
];

/// "-ed" words that are not verbs.
pub const ED_NON_VERBS: &[&str] = &["speed", "seed", "hundred", "kindred", "sacred", "naked"];

/// "-ly" words that are adjectives.
pub const LY_ADJECTIVES: &[&str] = &[
    "friendly", "lovely", "lonely", "likely", "ugly", "silly", "holy", "elderly", "costly",
    "deadly", "lively", "timely", "early", "daily", "weekly", "monthly", "yearly", "curly",
];

/// "-ly" words that are nouns.
pub const LY_NOUNS: &[&str] = &[
    "family", "july", "italy", "assembly", "supply", "reply", "ally", "jelly", "belly", "bully",
    "butterfly", "anomaly", "monopoly",
];

pub const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "ional", "ual", "less", "ish", "ic",
];

/// Nouns that happen to end in an adjective suffix.
pub const SUFFIX_NOUNS: &[&str] = &[
    "music", "topic", "traffic", "logic", "picnic", "clinic", "panic", "mechanic", "critic",
    "republic", "fabric", "table", "cable", "fable", "vegetable", "bible", "detective",
    "objective", "relative", "executive", "representative", "native", "archive", "motive",
    "individual", "ritual", "manual", "dish", "fish", "wish", "english", "spanish",
];

pub const VERB_SUFFIXES: &[&str] = &["ize", "yze", "ify"];

pub fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

pub fn irregular_verb(word: &str) -> Option<bool> {
    IRREGULAR_VERBS
        .iter()
        .find(|(form, _)| *form == word)
        .map(|(_, past)| *past)
}

/// Recognizes third person singular forms of the base verbs ("goes",
/// "studies", "likes").
pub fn third_person_of_base_verb(word: &str) -> bool {
    if let Some(stem) = word.strip_suffix("ies")
        && contains(BASE_VERBS, &format!("{stem}y"))
    {
        return true;
    }
    if let Some(stem) = word.strip_suffix("es")
        && contains(BASE_VERBS, stem)
    {
        return true;
    }
    word.strip_suffix('s')
        .is_some_and(|stem| contains(BASE_VERBS, stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_person_forms() {
        assert!(third_person_of_base_verb("goes"));
        assert!(third_person_of_base_verb("studies"));
        assert!(third_person_of_base_verb("likes"));
        assert!(third_person_of_base_verb("watches"));
        assert!(!third_person_of_base_verb("books"));
        assert!(!third_person_of_base_verb("go"));
    }

    #[test]
    fn irregular_lookup() {
        assert_eq!(irregular_verb("bought"), Some(true));
        assert_eq!(irregular_verb("written"), Some(false));
        assert_eq!(irregular_verb("book"), None);
    }
}
