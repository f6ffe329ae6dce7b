//! Rule-based word-order classifier for question-marked sentences.
//!
//! A sentence with declarative order (subject before the finite main verb)
//! but a question mark is a rising declarative; inverted order (finite
//! auxiliary or verb before the subject) makes a polar question. Everything
//! else is rejected with a reason.

use crate::annotation::TokenAnnotation;
use crate::profile::LanguageProfile;
use std::fmt;

/// Sentences at or above this token count are not treated as questions
pub const MAX_QUESTION_TOKENS: usize = 15;

/// Why a candidate sentence was excluded from classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Contains a confirmatory tag phrase ("does she", "toch")
    TagQuestion,
    /// Not question-marked, or at/over the token limit
    TooLongOrNotQuestion,
    /// Contains an interrogative wh-word
    ContainsWhWord,
    /// No nominal subject or no finite main verb found
    NoSubjectOrVerb,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectReason::TagQuestion => "tag question",
            RejectReason::TooLongOrNotQuestion => "length or non-question",
            RejectReason::ContainsWhWord => "wh-word",
            RejectReason::NoSubjectOrVerb => "no subject or main verb",
        };
        f.write_str(reason)
    }
}

/// Outcome of classifying one candidate sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    RisingDeclarative(String),
    PolarQuestion(String),
    Rejected(RejectReason),
}

impl Outcome {
    /// Uppercase category tag used in output artifacts
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Outcome::RisingDeclarative(_) => Some("RD"),
            Outcome::PolarQuestion(_) => Some("PQ"),
            Outcome::Rejected(_) => None,
        }
    }
}

/// Classify one candidate sentence from its token annotation.
///
/// Pure function: no I/O, identical outcome for identical inputs. Decision
/// order matters; the tag-question test short-circuits everything else and
/// wh-words are only checked on question-marked sentences under the token
/// limit.
pub fn classify(
    sentence: &str,
    annotation: &TokenAnnotation,
    profile: &LanguageProfile,
) -> Outcome {
    let trimmed = sentence.trim();

    if profile.has_tag_question(trimmed) {
        return Outcome::Rejected(RejectReason::TagQuestion);
    }

    if !trimmed.ends_with('?') || annotation.len() >= MAX_QUESTION_TOKENS {
        return Outcome::Rejected(RejectReason::TooLongOrNotQuestion);
    }

    if annotation.tokens().iter().any(|t| profile.is_wh_word(&t.text)) {
        return Outcome::Rejected(RejectReason::ContainsWhWord);
    }

    match (annotation.nominal_subject(), annotation.main_verb()) {
        (Some(subject), Some(main_verb)) if subject.index < main_verb.index => {
            Outcome::RisingDeclarative(trimmed.to_string())
        }
        (Some(subject), Some(main_verb)) if main_verb.index < subject.index => {
            Outcome::PolarQuestion(trimmed.to_string())
        }
        // Missing subject or finite verb, or (unreachably) equal indices
        _ => Outcome::Rejected(RejectReason::NoSubjectOrVerb),
    }
}
