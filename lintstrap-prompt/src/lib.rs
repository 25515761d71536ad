//! Operator interaction layer.
//!
//! Every interactive step of the pipeline goes through the [`Prompt`]
//! trait: yes/no confirmation, typed value acquisition, and numeric
//! multi-select. Retries are bounded; when the input stream runs out the
//! caller gets [`PromptError::InputExhausted`] instead of looping
//! forever, so automated harnesses can drive the pipeline.

mod console;
mod scripted;
mod tokens;

use thiserror::Error;

use lintstrap_types::TypeSig;

pub use console::ConsolePrompt;
pub use scripted::ScriptedPrompt;
pub use tokens::parse_bool_token;

/// Retry cap applied when none is configured.
pub const DEFAULT_MAX_RETRIES: usize = 16;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The input stream ended, or the retry cap was hit, before a valid
    /// answer arrived.
    #[error("operator input exhausted after {attempts} attempt(s)")]
    InputExhausted { attempts: usize },

    #[error("io error during prompt: {0}")]
    Io(#[from] std::io::Error),
}

/// The multi-select outcome: explicit picks, or the "use defaults"
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelect {
    /// Zero-based indices into the presented options.
    Picked(Vec<usize>),
    Defaults,
}

/// The pipeline's collaborator for everything operator-facing.
pub trait Prompt {
    /// Ask a yes/no question, re-asking on unrecognized answers up to the
    /// retry cap.
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError>;

    /// Ask for a raw line of input.
    fn ask_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Ask for a value that must parse under `sig`, re-prompting with the
    /// expected type on failure. Booleans accept the truthy/falsy token
    /// vocabulary with optional leading negation markers; the canonical
    /// "true"/"false" is returned.
    fn ask_typed(&mut self, prompt: &str, sig: &TypeSig) -> Result<String, PromptError> {
        let mut attempts = 0;
        loop {
            let line = self.ask_line(prompt)?;
            if let TypeSig::Bool = sig {
                if let Some(b) = parse_bool_token(&line) {
                    return Ok(if b { "true".into() } else { "false".into() });
                }
            } else if sig.admits_text(&line) {
                return Ok(line.trim().to_string());
            }
            attempts += 1;
            self.report(&format!(
                "Could not convert your input to the required type ({}).",
                sig.describe()
            ));
            if attempts >= self.max_retries() {
                return Err(PromptError::InputExhausted { attempts });
            }
        }
    }

    /// Present numbered options and read a 1-based index list. An index
    /// equal to `options.len() + 1` means "use the defaults"; any
    /// out-of-range index restarts the whole selection step.
    fn choose_many(
        &mut self,
        intro: &str,
        options: &[String],
    ) -> Result<MultiSelect, PromptError> {
        let sentinel = options.len() + 1;
        let mut attempts = 0;
        loop {
            self.report(intro);
            for (i, option) in options.iter().enumerate() {
                self.report(&format!("  {}. {}", i + 1, option));
            }
            self.report(&format!("  {sentinel}. Use the defaults"));

            let line = self.ask_line("Enter space-separated numbers: ")?;
            match parse_index_list(&line, options.len()) {
                Some(IndexList::Defaults) => return Ok(MultiSelect::Defaults),
                Some(IndexList::Picked(picks)) if !picks.is_empty() => {
                    return Ok(MultiSelect::Picked(picks));
                }
                _ => {
                    attempts += 1;
                    self.report("Invalid selection, please choose from the list.");
                    if attempts >= self.max_retries() {
                        return Err(PromptError::InputExhausted { attempts });
                    }
                }
            }
        }
    }

    /// Emit status text to the operator.
    fn report(&mut self, text: &str);

    fn max_retries(&self) -> usize {
        DEFAULT_MAX_RETRIES
    }
}

enum IndexList {
    Picked(Vec<usize>),
    Defaults,
}

/// Parse a whitespace-separated 1-based index list. The sentinel
/// `count + 1` is only honored when it is the sole entry.
fn parse_index_list(line: &str, count: usize) -> Option<IndexList> {
    let mut picks = Vec::new();
    for token in line.split_whitespace() {
        let n: usize = token.parse().ok()?;
        if n == count + 1 {
            if line.split_whitespace().count() == 1 {
                return Some(IndexList::Defaults);
            }
            return None;
        }
        if n == 0 || n > count {
            return None;
        }
        picks.push(n - 1);
    }
    Some(IndexList::Picked(picks))
}
