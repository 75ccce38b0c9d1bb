//! Prompt contract between the pipeline and whatever asks the user questions

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Kind of answer a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text
    Input,
    /// Yes/no
    Confirm,
}

/// A resolved answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Bool(bool),
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

/// A single question to put to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub key: &'static str,
    pub message: &'static str,
    pub kind: QuestionKind,
    pub default: Option<Answer>,
}

impl Question {
    pub fn input(key: &'static str, message: &'static str) -> Self {
        Self {
            key,
            message,
            kind: QuestionKind::Input,
            default: None,
        }
    }

    pub fn confirm(key: &'static str, message: &'static str) -> Self {
        Self {
            key,
            message,
            kind: QuestionKind::Confirm,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Answer>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Answers keyed by question key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(HashMap<String, Answer>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, answer: impl Into<Answer>) {
        self.0.insert(key.into(), answer.into());
    }

    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.0.get(key)
    }

    /// Text answer for `key`; fails when missing or not text
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key).with_context(|| format!("No answer for '{}'", key))? {
            Answer::Text(value) => Ok(value),
            Answer::Bool(_) => anyhow::bail!("Answer for '{}' is not text", key),
        }
    }

    /// Yes/no answer for `key`; fails when missing or not a boolean
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key).with_context(|| format!("No answer for '{}'", key))? {
            Answer::Bool(value) => Ok(*value),
            Answer::Text(_) => anyhow::bail!("Answer for '{}' is not yes/no", key),
        }
    }
}

/// Asks questions and shows messages to the user
///
/// `ask` resolves once per call with an answer for every question passed in.
#[async_trait]
pub trait Prompter: Send {
    async fn ask(&mut self, questions: &[Question]) -> Result<Answers>;

    /// Non-fatal advisory
    fn warn(&mut self, message: &str) -> Result<()>;

    /// User-visible diagnostic that ends the run
    fn error(&mut self, message: &str) -> Result<()>;

    /// Informational banner
    fn note(&mut self, message: &str) -> Result<()>;
}

/// Prompter that answers from a fixed script and records what was shown
///
/// Unanswered questions fall back to their default; a question with neither
/// a scripted answer nor a default is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Answers,
    /// Keys of every question asked, one entry per `ask` call
    pub asked: Vec<Vec<&'static str>>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub notes: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, key: &str, answer: impl Into<Answer>) -> Self {
        self.answers.insert(key, answer);
        self
    }

    /// Number of `ask` calls that included `key`
    pub fn times_asked(&self, key: &str) -> usize {
        self.asked.iter().filter(|keys| keys.contains(&key)).count()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&mut self, questions: &[Question]) -> Result<Answers> {
        self.asked.push(questions.iter().map(|q| q.key).collect());

        let mut answers = Answers::new();
        for question in questions {
            let answer = self
                .answers
                .get(question.key)
                .or(question.default.as_ref())
                .cloned()
                .with_context(|| format!("No scripted answer for '{}'", question.key))?;
            answers.insert(question.key, answer);
        }
        Ok(answers)
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        self.warnings.push(message.to_string());
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        self.notes.push(message.to_string());
        Ok(())
    }
}
