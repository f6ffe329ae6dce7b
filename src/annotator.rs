// WHY: annotators are a capability interface so alternate parsers can be
// slotted in per language without touching classifier logic

use crate::annotation::{Token, TokenAnnotation};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::{debug, info};

/// Produces a token annotation for one candidate sentence.
///
/// Implementations may hold mutable state (a subprocess, a cache); the
/// annotation itself is read-only once returned.
pub trait Annotator {
    fn annotate(&mut self, sentence: &str) -> Result<TokenAnnotation>;
}

/// Annotator backed by an external tagger process.
///
/// The child is spawned once and driven over a line protocol: one sentence
/// per request line on stdin, one JSON token array per response line on
/// stdout. Any protocol violation surfaces as an error for that sentence.
pub struct ProcessAnnotator {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    command: String,
}

impl ProcessAnnotator {
    /// Spawn the annotator command with piped stdin/stdout.
    /// The command string is split on whitespace; no shell quoting.
    pub fn spawn(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .context("annotator command must not be empty")?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn annotator command: {command}"))?;

        let stdin = child
            .stdin
            .take()
            .context("annotator stdin was not captured")?;
        let stdout = child
            .stdout
            .take()
            .context("annotator stdout was not captured")?;

        info!("Spawned annotator process: {}", command);

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            command: command.to_string(),
        })
    }
}

impl Annotator for ProcessAnnotator {
    fn annotate(&mut self, sentence: &str) -> Result<TokenAnnotation> {
        // The protocol is line-oriented; embedded breaks would desync it
        let mut request = sentence.replace(['\r', '\n'], " ");
        request.push('\n');

        self.stdin
            .write_all(request.as_bytes())
            .with_context(|| format!("failed to write to annotator: {}", self.command))?;
        self.stdin.flush()?;

        let mut response = String::new();
        let bytes = self
            .stdout
            .read_line(&mut response)
            .with_context(|| format!("failed to read from annotator: {}", self.command))?;
        if bytes == 0 {
            bail!("annotator closed its output stream: {}", self.command);
        }

        let tokens: Vec<Token> = serde_json::from_str(response.trim_end())
            .with_context(|| format!("malformed annotator response for sentence: {sentence}"))?;

        debug!("Annotated sentence with {} tokens", tokens.len());
        Ok(TokenAnnotation::new(tokens))
    }
}

impl Drop for ProcessAnnotator {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Annotator that replays scripted annotations from memory.
///
/// Sentences without a script fall back to bare whitespace tokens, which
/// carry no dependency labels but keep token counts meaningful for
/// statistics. Used by tests and offline runs.
#[derive(Debug, Default)]
pub struct StaticAnnotator {
    scripted: HashMap<String, TokenAnnotation>,
}

impl StaticAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the annotation to return for a sentence
    pub fn insert(&mut self, sentence: impl Into<String>, annotation: TokenAnnotation) {
        self.scripted.insert(sentence.into(), annotation);
    }
}

impl Annotator for StaticAnnotator {
    fn annotate(&mut self, sentence: &str) -> Result<TokenAnnotation> {
        match self.scripted.get(sentence) {
            Some(annotation) => Ok(annotation.clone()),
            None => Ok(TokenAnnotation::from_words(sentence)),
        }
    }
}
