//! Document tree for hierarchical simulation input decks.
//!
//! A deck is a sequence of nested named sections (`&NAME ... &END NAME`)
//! and keyword records (`NAME value value ...`). This crate holds the parsed
//! representation: [`Document`] owns an ordered tree of [`Section`] and
//! [`Keyword`] nodes, with case-insensitive, order-preserving queries and a
//! canonical text writer. Parsing lives in `indeck-parse`; this crate has no
//! opinion on where the tree came from.

mod document;
mod value;
pub mod write;

pub use document::{Document, Keyword, Node, Section};
pub use value::Value;
