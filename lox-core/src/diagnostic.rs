//! Line-tagged diagnostics shared by the scanner, parser and evaluator.
//!
//! Stages never print. They record `Diagnostic`s and hand them back to
//! the caller, which decides how (and whether) to display them.

use std::fmt;

/// Where on a line a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// No token context (scanner errors).
    Nowhere,
    /// The offending token was End-of-Input.
    AtEnd,
    /// The offending token's lexeme.
    At(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Nowhere => Ok(()),
            Location::AtEnd => f.write_str(" at end"),
            Location::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

/// A single reported error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            location: Location::Nowhere,
            message: message.into(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Error{}: {}",
            self.line, self.location, self.message
        )
    }
}

/// Append-only collector of diagnostics for one invocation.
///
/// `had_error` latches on the first report and stays set until the owner
/// calls [`Diagnostics::reset`]; nothing inside the pipeline clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    had_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.had_error = true;
        self.records.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    /// Clear every record and the error latch.
    pub fn reset(&mut self) {
        self.records.clear();
        self.had_error = false;
    }
}

/// One rendered diagnostic per line.
impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, diagnostic) in self.records.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(iter);
        diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_location_form() {
        let plain = Diagnostic::error(3, "unterminated string");
        assert_eq!(plain.to_string(), "[line 3] Error: unterminated string");

        let at_end = Diagnostic::error(0, "expect expression").with_location(Location::AtEnd);
        assert_eq!(at_end.to_string(), "[line 0] Error at end: expect expression");

        let at_lexeme = Diagnostic::error(1, "expect expression")
            .with_location(Location::At(")".to_string()));
        assert_eq!(
            at_lexeme.to_string(),
            "[line 1] Error at ')': expect expression"
        );
    }

    #[test]
    fn error_flag_latches_until_reset() {
        let mut sink = Diagnostics::new();
        assert!(!sink.had_error());

        sink.report(Diagnostic::error(0, "first"));
        sink.report(Diagnostic::error(1, "second"));
        assert!(sink.had_error());
        assert_eq!(sink.len(), 2);

        assert_eq!(sink.to_string(), "[line 0] Error: first\n[line 1] Error: second");

        sink.reset();
        assert!(!sink.had_error());
        assert!(sink.is_empty());
    }
}
