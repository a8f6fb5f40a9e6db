//! Parser and preprocessor for hierarchical simulation input decks.
//!
//! The pipeline runs strictly forward in four stages: line normalization
//! (comment stripping), preprocessing (`@SET` / `@IF` / `@ENDIF` /
//! `@INCLUDE` directives and `${name}` expansion), tokenization, and tree
//! construction. Each parse owns its state end to end, so concurrent parses
//! of different decks need no synchronization.
//!
//! ```
//! let deck = "\
//! @SET LATTICE 2.8595
//! &CELL
//!   A 0 ${LATTICE} ${LATTICE}  ! lattice vector
//! &END CELL
//! ";
//! let doc = indeck_parse::parse(deck)?;
//! let a = doc.get_keyword("CELL/A").unwrap();
//! assert_eq!(a.values[1], "2.8595");
//! # Ok::<(), indeck_parse::ParseError>(())
//! ```

pub mod builder;
pub mod error;
pub mod normalize;
pub mod preprocess;
pub mod tokenize;
pub mod vars;

pub use error::{ParseError, ParseErrorKind};
pub use indeck_document::{Document, Keyword, Node, Section, Value};
pub use preprocess::{PreprocessedLine, Preprocessor};
pub use vars::VariableTable;

use builder::TreeBuilder;
use tracing::debug;

/// Comment introducers of the deck language.
pub const DEFAULT_COMMENT_CHARS: [char; 2] = ['!', '#'];

/// Supplies the text of `@INCLUDE`d files.
///
/// The parser itself consumes only character streams and performs no file
/// I/O; hosts that want `@INCLUDE` to touch the filesystem (or anything
/// else) implement this seam. Without one configured, `@INCLUDE` fails the
/// parse.
pub trait IncludeSource {
    /// Loads the text behind the name given in the deck.
    fn load(&self, name: &str) -> std::io::Result<String>;
}

/// A configurable parser, reusable across inputs.
///
/// Seed variables behave exactly like `@SET` lines before line 1 (the seed
/// table is cloned per parse, so one `Parser` can serve many decks, or many
/// threads when the include source is `Sync`).
pub struct Parser {
    comment_chars: Vec<char>,
    seed: VariableTable,
    include: Option<Box<dyn IncludeSource + Send + Sync>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            comment_chars: DEFAULT_COMMENT_CHARS.to_vec(),
            seed: VariableTable::new(),
            include: None,
        }
    }

    /// Adds a seed variable (e.g. a `-D NAME=VALUE` command-line override).
    pub fn with_variable(mut self, name: &str, value: impl Into<String>) -> Self {
        self.seed.set(name, value);
        self
    }

    /// Adds many seed variables at once.
    pub fn with_variables<N, V>(mut self, vars: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in vars {
            self.seed.set(name.as_ref(), value);
        }
        self
    }

    /// Replaces the set of comment-introducer characters.
    pub fn with_comment_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.comment_chars = chars.into_iter().collect();
        self
    }

    /// Enables `@INCLUDE` resolution through the given source.
    pub fn with_include_source(
        mut self,
        source: impl IncludeSource + Send + Sync + 'static,
    ) -> Self {
        self.include = Some(Box::new(source));
        self
    }

    /// Parses one deck into a [`Document`].
    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        let mut preprocessor = Preprocessor::new(self.seed.clone(), &self.comment_chars);
        if let Some(source) = &self.include {
            preprocessor = preprocessor.with_include_source(source.as_ref());
        }
        let lines = preprocessor.run(input)?;
        debug!(lines = lines.len(), "preprocessing complete");

        let mut builder = TreeBuilder::new();
        for line in &lines {
            let token = tokenize::tokenize(&line.text).map_err(|kind| {
                kind.at(line.line, line.text.clone(), line.source_name.clone())
            })?;
            builder.push(token, line)?;
        }
        builder.finish()
    }
}

/// Parses a deck with default settings and no seed variables.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new().parse(input)
}
