//! Command tokenizer.
//!
//! A command is one line split on runs of whitespace. There is no quoting
//! or escaping. The raw line is kept alongside the tokens because `echo`
//! answers with the text exactly as typed.

/// A tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    line: String,
    tokens: Vec<String>,
}

impl Command {
    pub fn parse(line: impl Into<String>) -> Self {
        let line = line.into();
        let tokens = tokenize(&line).map(str::to_owned).collect();
        Self { line, tokens }
    }

    /// The line as received, without its terminator.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Everything after the verb and the single separator that follows it.
    ///
    /// Returns `None` when nothing follows that separator.
    pub fn rest_after_verb(&self) -> Option<&str> {
        let verb = self.token(0)?;
        let rest = self.line.trim_start().get(verb.len()..)?;
        let mut chars = rest.chars();
        chars.next()?;
        let rest = chars.as_str();
        (!rest.is_empty()).then_some(rest)
    }
}

/// Split `line` on whitespace runs. Empty input yields nothing.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}
