//! The preprocessing pass: `@SET` / `@IF` / `@ENDIF` / `@INCLUDE`
//! directives and `${name}` expansion.
//!
//! Preprocessing is a pure text-to-text transform that runs to completion
//! before any tokenization, so variable scoping stays independent of tree
//! structure. The output is a stream of fully expanded, directive-free lines
//! in original order, with suppressed regions omitted and every line tagged
//! with its 1-based number and (for included files) its source name.

use tracing::{debug, trace};

use crate::IncludeSource;
use crate::error::{ParseError, ParseErrorKind};
use crate::normalize::normalize;
use crate::vars::VariableTable;

const MAX_INCLUDE_DEPTH: usize = 16;

/// One line surviving preprocessing, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedLine {
    pub text: String,
    /// 1-based line number within `source_name` (or the main input).
    pub line: usize,
    /// Set for lines pulled in via `@INCLUDE`.
    pub source_name: Option<String>,
}

/// One `@IF` frame. The opening line is kept for the error report when the
/// frame is still open at end of input.
struct IfFrame {
    active: bool,
    line: usize,
    text: String,
    source_name: Option<String>,
}

pub struct Preprocessor<'a> {
    variables: VariableTable,
    comment_chars: &'a [char],
    include: Option<&'a dyn IncludeSource>,
    frames: Vec<IfFrame>,
    out: Vec<PreprocessedLine>,
}

impl<'a> Preprocessor<'a> {
    pub fn new(variables: VariableTable, comment_chars: &'a [char]) -> Self {
        Self {
            variables,
            comment_chars,
            include: None,
            frames: Vec::new(),
            out: Vec::new(),
        }
    }

    pub fn with_include_source(mut self, source: &'a dyn IncludeSource) -> Self {
        self.include = Some(source);
        self
    }

    /// Runs the whole pass over `input`, returning the emitted lines.
    pub fn run(mut self, input: &str) -> Result<Vec<PreprocessedLine>, ParseError> {
        self.consume(input, None, 0)?;
        if let Some(frame) = self.frames.pop() {
            return Err(ParseErrorKind::UnbalancedDirective(
                "@IF not closed before end of input".into(),
            )
            .at(frame.line, frame.text, frame.source_name));
        }
        Ok(self.out)
    }

    fn consume(
        &mut self,
        input: &str,
        source_name: Option<&str>,
        depth: usize,
    ) -> Result<(), ParseError> {
        for (idx, raw) in input.lines().enumerate() {
            let lineno = idx + 1;
            let line = normalize(raw, self.comment_chars);
            if line.is_empty() {
                continue;
            }
            if line.starts_with('@') {
                self.directive(line, lineno, source_name, depth)?;
                continue;
            }
            if !self.including() {
                trace!(line = lineno, "line suppressed by @IF");
                continue;
            }
            let expanded = self
                .expand(line)
                .map_err(|kind| kind.at(lineno, line, source_name.map(str::to_owned)))?;
            self.out.push(PreprocessedLine {
                text: expanded,
                line: lineno,
                source_name: source_name.map(str::to_owned),
            });
        }
        Ok(())
    }

    /// Whether lines at the current position are emitted: every enclosing
    /// `@IF` frame must hold.
    fn including(&self) -> bool {
        self.frames.iter().all(|frame| frame.active)
    }

    fn directive(
        &mut self,
        line: &str,
        lineno: usize,
        source_name: Option<&str>,
        depth: usize,
    ) -> Result<(), ParseError> {
        let err = |kind: ParseErrorKind| kind.at(lineno, line, source_name.map(str::to_owned));

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_uppercase().as_str() {
            // @SET is structural: it applies even inside a suppressed region.
            "@SET" => {
                let Some((name, value)) = rest.split_once(char::is_whitespace) else {
                    return Err(err(ParseErrorKind::MalformedDirective(
                        "@SET requires a name and a value".into(),
                    )));
                };
                if !VariableTable::is_valid_name(name) {
                    return Err(err(ParseErrorKind::MalformedDirective(format!(
                        "invalid variable name '{name}'"
                    ))));
                }
                let value = self.expand(value.trim()).map_err(&err)?;
                debug!(name, %value, "@SET");
                self.variables.set(name, value);
            }
            "@IF" => {
                let condition = self.expand(rest).map_err(&err)?;
                // A bare @IF carries an empty condition and evaluates to
                // false, as does one whose expansion comes out empty.
                let active = evaluate_condition(condition.trim());
                debug!(condition = %condition.trim(), active, "@IF");
                self.frames.push(IfFrame {
                    active,
                    line: lineno,
                    text: line.to_owned(),
                    source_name: source_name.map(str::to_owned),
                });
            }
            "@ENDIF" => {
                if !rest.is_empty() {
                    return Err(err(ParseErrorKind::MalformedDirective(
                        "unexpected text after @ENDIF".into(),
                    )));
                }
                if self.frames.pop().is_none() {
                    return Err(err(ParseErrorKind::UnbalancedDirective(
                        "@ENDIF without a previous @IF".into(),
                    )));
                }
            }
            "@INCLUDE" => {
                if self.including() {
                    self.include_directive(rest, &err, depth)?;
                }
            }
            _ => {
                if self.including() {
                    return Err(err(ParseErrorKind::MalformedDirective(format!(
                        "unknown directive '{word}'"
                    ))));
                }
            }
        }
        Ok(())
    }

    fn include_directive(
        &mut self,
        rest: &str,
        err: &dyn Fn(ParseErrorKind) -> ParseError,
        depth: usize,
    ) -> Result<(), ParseError> {
        if rest.is_empty() {
            return Err(err(ParseErrorKind::MalformedDirective(
                "@INCLUDE requires a file name".into(),
            )));
        }
        let expanded = self.expand(rest).map_err(err)?;
        let name = if expanded.starts_with(['\'', '"']) {
            let mut words = crate::tokenize::split_words(&expanded).map_err(err)?;
            if words.len() != 1 {
                return Err(err(ParseErrorKind::MalformedDirective(
                    "@INCLUDE requires exactly one argument".into(),
                )));
            }
            words.remove(0)
        } else {
            expanded
        };
        let Some(source) = self.include else {
            return Err(err(ParseErrorKind::MalformedDirective(
                "@INCLUDE is not supported without an include source".into(),
            )));
        };
        if depth >= MAX_INCLUDE_DEPTH {
            return Err(err(ParseErrorKind::MalformedDirective(format!(
                "include depth limit ({MAX_INCLUDE_DEPTH}) exceeded"
            ))));
        }
        let text = source.load(&name).map_err(|e| {
            err(ParseErrorKind::MalformedDirective(format!(
                "@INCLUDE '{name}': {e}"
            )))
        })?;
        debug!(file = %name, "@INCLUDE");
        self.consume(&text, Some(&name), depth + 1)
    }

    /// Expands `${name}` (with optional `-default`) and bare `$name`
    /// references in a single left-to-right scan. Substitution is textual
    /// and not recursive: scanning resumes after the substituted text, so a
    /// value that itself contains a reference is emitted verbatim.
    fn expand(&self, line: &str) -> Result<String, ParseErrorKind> {
        if !line.contains('$') {
            return Ok(line.to_owned());
        }
        let mut out = String::with_capacity(line.len());
        let mut rest = line;
        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            if let Some(body) = after.strip_prefix('{') {
                let Some(end) = body.find('}') else {
                    return Err(ParseErrorKind::UnterminatedVariable);
                };
                let key = &body[..end];
                // `${name-default}` falls back to `default` when name is unset
                let (name, default) = match key.split_once('-') {
                    Some((name, default)) => (name, Some(default)),
                    None => (key, None),
                };
                match (self.lookup(name)?, default) {
                    (Some(value), _) => out.push_str(value),
                    (None, Some(default)) => out.push_str(default),
                    (None, None) => {
                        return Err(ParseErrorKind::UndefinedVariable(name.to_owned()));
                    }
                }
                rest = &body[end + 1..];
            } else {
                // a bare $name reference runs to the next whitespace
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                let name = &after[..end];
                let value = self
                    .lookup(name)?
                    .ok_or_else(|| ParseErrorKind::UndefinedVariable(name.to_owned()))?;
                out.push_str(value);
                rest = &after[end..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn lookup(&self, name: &str) -> Result<Option<&str>, ParseErrorKind> {
        if !VariableTable::is_valid_name(name) {
            return Err(ParseErrorKind::MalformedDirective(format!(
                "invalid variable name '{name}'"
            )));
        }
        Ok(self.variables.get(name))
    }
}

/// Truth of an (already expanded) `@IF` condition: the empty string and
/// numeric zero are false, `lhs == rhs` / `lhs /= rhs` compare the trimmed
/// operands as text, and anything else is true.
fn evaluate_condition(condition: &str) -> bool {
    if let Some((lhs, rhs)) = condition.split_once("==") {
        return lhs.trim() == rhs.trim();
    }
    if let Some((lhs, rhs)) = condition.split_once("/=") {
        return lhs.trim() != rhs.trim();
    }
    if condition.is_empty() {
        return false;
    }
    match condition.parse::<f64>() {
        Ok(number) => number != 0.0,
        Err(_) => true,
    }
}
