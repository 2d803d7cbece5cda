//! Expected-output checks for captured logs
//!
//! An expectation file lists one message per line. Every message has to show
//! up somewhere in the captured log, either as a literal substring or, in
//! regex mode, as a pattern match (`^`/`$` anchor to log lines).

use regex::{Regex, RegexBuilder};

use crate::error::LogCheckError;

#[derive(Debug)]
enum Matcher {
    Literal,
    Pattern(Regex),
}

#[derive(Debug)]
struct Expectation {
    text: String,
    matcher: Matcher,
}

impl Expectation {
    fn is_found_in(&self, log: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => log.contains(&self.text),
            Matcher::Pattern(re) => re.is_match(log),
        }
    }
}

/// A parsed expectation list
#[derive(Debug)]
pub struct LogCheck {
    expected: Vec<Expectation>,
}

/// Outcome of checking a log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReport {
    /// Number of expected messages checked
    pub checked: usize,
    /// Expected messages not found, in expectation-file order
    pub missing: Vec<String>,
}

impl LogReport {
    /// Whether every expected message was found
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

impl LogCheck {
    /// Expectations matched as literal substrings
    pub fn literal(expected: &str) -> Self {
        Self {
            expected: expected_lines(expected)
                .map(|text| Expectation {
                    text,
                    matcher: Matcher::Literal,
                })
                .collect(),
        }
    }

    /// Expectations matched as regular expressions
    pub fn regex(expected: &str) -> Result<Self, LogCheckError> {
        let expected = expected_lines(expected)
            .enumerate()
            .map(|(index, text)| {
                let re = RegexBuilder::new(&text)
                    .multi_line(true)
                    .build()
                    .map_err(|e| LogCheckError::InvalidPattern {
                        line: index + 1,
                        pattern: text.clone(),
                        error: e.to_string(),
                    })?;
                Ok(Expectation {
                    text,
                    matcher: Matcher::Pattern(re),
                })
            })
            .collect::<Result<Vec<_>, LogCheckError>>()?;

        Ok(Self { expected })
    }

    /// Number of expectations
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    /// Whether the expectation list is empty
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Check `log` against every expectation
    pub fn check(&self, log: &str) -> LogReport {
        let missing: Vec<String> = self
            .expected
            .iter()
            .filter(|e| !e.is_found_in(log))
            .map(|e| e.text.clone())
            .collect();

        tracing::debug!(
            checked = self.expected.len(),
            missing = missing.len(),
            "Checked log against expectations"
        );

        LogReport {
            checked: self.expected.len(),
            missing,
        }
    }
}

/// Expectation lines with trailing whitespace removed
fn expected_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content.lines().map(|line| line.trim_end().to_string())
}
