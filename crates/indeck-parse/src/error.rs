//! Parse error types for input decks.

use thiserror::Error;

/// A fatal parse error.
///
/// Parsing never produces a partial document: the placement of every later
/// node depends on correct nesting up to the fault, so the first structural
/// error invalidates the whole result. The error carries enough context to
/// locate the fault without re-reading the deck: the kind, the 1-based line
/// number, and the offending line's text. `source_name` is set when the line
/// came in through `@INCLUDE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub text: String,
    pub source_name: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `@` directive that does not match any known form.
    #[error("malformed directive: {0}")]
    MalformedDirective(String),

    /// `@ENDIF` without a matching `@IF`, or an `@IF` left open at the end
    /// of input.
    #[error("unbalanced conditional: {0}")]
    UnbalancedDirective(String),

    /// A `${name}` or `$name` reference with no definition in the variable
    /// table.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// A `${` with no closing `}` on the line.
    #[error("unterminated variable reference")]
    UnterminatedVariable,

    /// A quoted string with no closing quote on the line.
    #[error("unterminated quoted string")]
    UnterminatedString,

    /// A named `&END` whose name does not match the open section.
    #[error("section close '{found}' does not match open section '{expected}'")]
    SectionMismatch { expected: String, found: String },

    /// An `&END` with no open section.
    #[error("section close without an open section")]
    UnexpectedClose,

    /// Sections still open at the end of input, innermost last.
    #[error("unclosed section(s) at end of input: {}", .0.join(", "))]
    UnclosedSection(Vec<String>),
}

impl ParseErrorKind {
    /// Attaches line context, producing the full error.
    pub fn at(self, line: usize, text: impl Into<String>, source_name: Option<String>) -> ParseError {
        ParseError {
            kind: self,
            line,
            text: text.into(),
            source_name,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.source_name {
            Some(name) => write!(f, "{}:{}: {}", name, self.line, self.kind)?,
            None => write!(f, "line {}: {}", self.line, self.kind)?,
        }
        if !self.text.is_empty() {
            write!(f, "\n  | {}", self.text)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_context() {
        let err = ParseErrorKind::UndefinedVariable("UNSET".into()).at(7, "A ${UNSET}", None);
        assert_eq!(
            err.to_string(),
            "line 7: undefined variable 'UNSET'\n  | A ${UNSET}"
        );
    }

    #[test]
    fn test_display_with_include_source() {
        let err = ParseErrorKind::UnexpectedClose.at(2, "&END", Some("cell.inc".into()));
        assert_eq!(
            err.to_string(),
            "cell.inc:2: section close without an open section\n  | &END"
        );
    }

    #[test]
    fn test_unclosed_section_lists_names() {
        let kind = ParseErrorKind::UnclosedSection(vec!["FORCE_EVAL".into(), "DFT".into()]);
        assert_eq!(
            kind.to_string(),
            "unclosed section(s) at end of input: FORCE_EVAL, DFT"
        );
    }
}
