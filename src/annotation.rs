// WHY: the syntactic parser is an external collaborator; this module pins down
// the only contract the classifier depends on (dependency roles, POS, VerbForm)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dependency role label for nominal subjects
pub const DEP_NOMINAL_SUBJECT: &str = "nsubj";
/// Dependency role label for auxiliary verbs
pub const DEP_AUXILIARY: &str = "aux";
/// Dependency role label for the clause root
pub const DEP_ROOT: &str = "ROOT";
/// Part-of-speech tag for lexical verbs
pub const POS_VERB: &str = "VERB";
/// Morphological feature key for verb form
pub const MORPH_VERB_FORM: &str = "VerbForm";
/// Morphological feature value marking a finite verb form
pub const VERB_FORM_FINITE: &str = "Fin";

/// One token as produced by the external annotator.
///
/// Field names double as the wire format of the annotator protocol: each
/// response line is a JSON array of these objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text of the token
    pub text: String,
    /// 0-based position within the sentence
    pub index: usize,
    /// Index of the syntactic head token
    #[serde(default)]
    pub head: usize,
    /// Dependency role label (e.g. "nsubj", "aux", "ROOT")
    #[serde(default)]
    pub dep: String,
    /// Part-of-speech tag (e.g. "VERB")
    #[serde(default)]
    pub pos: String,
    /// Morphological feature name to value(s) mapping
    #[serde(default)]
    pub morph: HashMap<String, Vec<String>>,
}

impl Token {
    /// Bare token with no syntactic labels, as used by fallback tokenization
    pub fn word(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
            head: 0,
            dep: String::new(),
            pos: String::new(),
            morph: HashMap::new(),
        }
    }

    /// Whether this token carries VerbForm=Fin
    pub fn is_finite(&self) -> bool {
        self.morph
            .get(MORPH_VERB_FORM)
            .is_some_and(|values| values.iter().any(|v| v == VERB_FORM_FINITE))
    }
}

/// Ordered token sequence for one candidate sentence.
///
/// Read-only input to the classifier; navigation helpers resolve the head
/// index against the owning sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenAnnotation {
    tokens: Vec<Token>,
}

impl TokenAnnotation {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Whitespace fallback tokenization with no syntactic labels.
    /// Token counts stay usable for statistics even without a parse.
    pub fn from_words(sentence: &str) -> Self {
        let tokens = sentence
            .split_whitespace()
            .enumerate()
            .map(|(index, word)| Token::word(word, index))
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First token with the nominal-subject dependency role
    pub fn nominal_subject(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.dep == DEP_NOMINAL_SUBJECT)
    }

    /// First finite auxiliary whose syntactic head is the clause root
    pub fn finite_auxiliary(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| {
            t.dep == DEP_AUXILIARY
                && t.is_finite()
                && self
                    .tokens
                    .get(t.head)
                    .is_some_and(|head| head.dep == DEP_ROOT)
        })
    }

    /// First clause root that is a finite lexical verb
    pub fn finite_root_verb(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.dep == DEP_ROOT && t.pos == POS_VERB && t.is_finite())
    }

    /// Main verb for word-order comparison: the finite auxiliary if present,
    /// otherwise the finite root verb
    pub fn main_verb(&self) -> Option<&Token> {
        self.finite_auxiliary().or_else(|| self.finite_root_verb())
    }
}
