use std::collections::VecDeque;

use crate::tokens::parse_bool_token;
use crate::{Prompt, PromptError, DEFAULT_MAX_RETRIES};

/// Prompt fed from a fixed answer script; used by tests and automated
/// harnesses. Runs out of answers instead of blocking.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Everything reported or asked, in order.
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        let mut attempts = 0;
        loop {
            self.transcript.push(question.to_string());
            let Some(answer) = self.answers.pop_front() else {
                return Err(PromptError::InputExhausted { attempts });
            };
            if let Some(b) = parse_bool_token(&answer) {
                return Ok(b);
            }
            attempts += 1;
            if attempts >= self.max_retries() {
                return Err(PromptError::InputExhausted { attempts });
            }
        }
    }

    fn ask_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or(PromptError::InputExhausted { attempts: 0 })
    }

    fn report(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn max_retries(&self) -> usize {
        DEFAULT_MAX_RETRIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_are_consumed_in_order() {
        let mut p = ScriptedPrompt::new(&["yes", "no"]);
        assert!(p.confirm("first?").unwrap());
        assert!(!p.confirm("second?").unwrap());
        assert!(matches!(
            p.confirm("third?"),
            Err(PromptError::InputExhausted { .. })
        ));
    }

    #[test]
    fn transcript_records_questions_and_reports() {
        let mut p = ScriptedPrompt::new(&["yes"]);
        p.report("hello");
        let _ = p.confirm("pick?");
        assert_eq!(p.transcript, vec!["hello".to_string(), "pick?".to_string()]);
    }
}
