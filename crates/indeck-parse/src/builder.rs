//! Tree construction from the token stream.
//!
//! A stack machine over tokenized lines: section opens push, closes pop
//! (with a case-insensitive name check when the close is named), keywords
//! append to the innermost open section. Children end up in the exact order
//! the (preprocessed, filtered) input declared them; consumers rely on that
//! order to apply repeated settings additively.

use indeck_document::{Document, Keyword, Node, Section, Value};
use tracing::trace;

use crate::error::{ParseError, ParseErrorKind};
use crate::preprocess::PreprocessedLine;
use crate::tokenize::TokenLine;

/// An open section plus its opening line, kept for error reports.
struct OpenSection {
    section: Section,
    line: usize,
    text: String,
    source_name: Option<String>,
}

#[derive(Default)]
pub struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<OpenSection>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one tokenized line; `origin` is its provenance for errors.
    pub fn push(&mut self, token: TokenLine, origin: &PreprocessedLine) -> Result<(), ParseError> {
        match token {
            TokenLine::SectionOpen { name, parameter } => {
                trace!(name = %name, "section open");
                self.stack.push(OpenSection {
                    section: Section {
                        name,
                        parameter,
                        children: Vec::new(),
                    },
                    line: origin.line,
                    text: origin.text.clone(),
                    source_name: origin.source_name.clone(),
                });
            }
            TokenLine::SectionClose { name } => {
                let Some(open) = self.stack.pop() else {
                    return Err(ParseErrorKind::UnexpectedClose.at(
                        origin.line,
                        origin.text.clone(),
                        origin.source_name.clone(),
                    ));
                };
                if let Some(found) = name
                    && !found.eq_ignore_ascii_case(&open.section.name)
                {
                    return Err(ParseErrorKind::SectionMismatch {
                        expected: open.section.name,
                        found,
                    }
                    .at(origin.line, origin.text.clone(), origin.source_name.clone()));
                }
                trace!(name = %open.section.name, "section close");
                self.children_mut().push(Node::Section(open.section));
            }
            TokenLine::Keyword { name, values } => {
                let values = values.into_iter().map(Value::from).collect();
                self.children_mut()
                    .push(Node::Keyword(Keyword::new(name, values)));
            }
        }
        Ok(())
    }

    /// Ends the input, yielding the document or the still-open sections.
    pub fn finish(self) -> Result<Document, ParseError> {
        if let Some(innermost) = self.stack.last() {
            let (line, text, source_name) = (
                innermost.line,
                innermost.text.clone(),
                innermost.source_name.clone(),
            );
            let names = self
                .stack
                .iter()
                .map(|open| open.section.name.clone())
                .collect();
            return Err(ParseErrorKind::UnclosedSection(names).at(line, text, source_name));
        }
        Ok(Document::new(self.root))
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(open) => &mut open.section.children,
            None => &mut self.root,
        }
    }
}
