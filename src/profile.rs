// WHY: per-language constants live in an explicit profile passed into
// pipeline construction, so both languages are usable in one process

use anyhow::bail;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported corpus languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Dutch,
}

impl Language {
    /// Short code used in default file names and CLI values
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Dutch => "nl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "nl" | "dutch" => Ok(Language::Dutch),
            other => bail!("unsupported language: {other} (expected 'en' or 'nl')"),
        }
    }
}

/// Per-language lexicons and corpus conventions.
///
/// Wh-words and tag-question triggers are stored lowercased; matching
/// lowercases the probe side as well for both lexicons.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: Language,
    /// Interrogative words that disqualify a sentence from classification
    pub wh_words: HashSet<String>,
    /// Confirmatory phrases marking tag questions, matched as substrings
    pub tag_questions: Vec<String>,
    /// Name of the JSON field holding the message body
    pub text_field: String,
}

impl LanguageProfile {
    pub fn english() -> Self {
        Self {
            language: Language::English,
            wh_words: to_set(&[
                "what", "who", "why", "how", "where", "when", "which", "whose", "whom", "wtf",
            ]),
            tag_questions: to_vec(&["does he", "does she", "does it"]),
            text_field: "full_text_cleaned".to_string(),
        }
    }

    pub fn dutch() -> Self {
        Self {
            language: Language::Dutch,
            wh_words: to_set(&[
                "wat", "hoe", "waarom", "wanneer", "wie", "welke", "welk", "waar", "waarheen",
                "hoeveel", "hoezo", "wtf",
            ]),
            tag_questions: to_vec(&["toch"]),
            text_field: "full_text_cleaned".to_string(),
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::english(),
            Language::Dutch => Self::dutch(),
        }
    }

    /// Whether a lowercased token surface is a configured wh-word
    pub fn is_wh_word(&self, token_text: &str) -> bool {
        self.wh_words.contains(&token_text.to_lowercase())
    }

    /// Whether the sentence contains a tag-question trigger as a substring
    pub fn has_tag_question(&self, sentence: &str) -> bool {
        let lowered = sentence.to_lowercase();
        self.tag_questions.iter().any(|tag| lowered.contains(tag))
    }

    pub fn default_rd_path(&self) -> PathBuf {
        PathBuf::from(format!("rd_{}.txt", self.language.code()))
    }

    pub fn default_pq_path(&self) -> PathBuf {
        PathBuf::from(format!("pq_{}.txt", self.language.code()))
    }

    pub fn default_rejected_path(&self) -> PathBuf {
        PathBuf::from(format!("rejected_{}.txt", self.language.code()))
    }
}

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn to_vec(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}
