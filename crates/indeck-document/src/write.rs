//! Canonical text serialization for parsed decks.
//!
//! The writer emits one canonical layout (two-space indentation, `&END NAME`
//! closes, values quoted only when they would otherwise be re-tokenized
//! differently). It makes no attempt to reproduce the formatting of the
//! original input; the guarantee is structural: re-parsing the output yields
//! a tree equal to the one written.

use crate::document::{Document, Keyword, Node, Section};

const INDENT: &str = "  ";

impl Document {
    /// Serializes the tree back to canonical deck text.
    pub fn to_deck_string(&self) -> String {
        let mut out = String::new();
        write_nodes(&mut out, self.nodes(), 0);
        out
    }
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        match node {
            Node::Section(section) => write_section(out, section, depth),
            Node::Keyword(keyword) => write_keyword(out, keyword, depth),
        }
    }
}

fn write_section(out: &mut String, section: &Section, depth: usize) {
    indent(out, depth);
    out.push('&');
    out.push_str(&section.name);
    if let Some(parameter) = &section.parameter
        && !parameter.is_empty()
    {
        out.push(' ');
        out.push_str(parameter);
    }
    out.push('\n');
    write_nodes(out, &section.children, depth + 1);
    indent(out, depth);
    out.push_str("&END ");
    out.push_str(&section.name);
    out.push('\n');
}

fn write_keyword(out: &mut String, keyword: &Keyword, depth: usize) {
    indent(out, depth);
    out.push_str(&keyword.name);
    for value in &keyword.values {
        out.push(' ');
        push_value(out, value.as_str());
    }
    out.push('\n');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Quotes a value when the bare form would not survive re-tokenization:
/// embedded whitespace, comment introducers, or quote characters.
fn push_value(out: &mut String, text: &str) {
    let needs_quoting = text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '!' | '#' | '\'' | '"'));
    if !needs_quoting {
        out.push_str(text);
        return;
    }
    // Pick whichever quote character the value does not contain. There are
    // no escape sequences in this language, so a value holding both kinds
    // cannot be represented; prefer the double-quoted form in that case.
    let quote = if text.contains('"') { '\'' } else { '"' };
    out.push(quote);
    out.push_str(text);
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_layout() {
        let mut global = Section::new("GLOBAL");
        global.children.push(Node::Keyword(Keyword::new(
            "PROJECT",
            vec![Value::from("water")],
        )));
        let doc = Document::new(vec![Node::Section(global)]);
        assert_eq!(
            doc.to_deck_string(),
            "&GLOBAL\n  PROJECT water\n&END GLOBAL\n"
        );
    }

    #[test]
    fn test_parameter_on_open_line() {
        let kind = Section::new("KIND").with_parameter("Na");
        let doc = Document::new(vec![Node::Section(kind)]);
        assert_eq!(doc.to_deck_string(), "&KIND Na\n&END KIND\n");
    }

    #[test]
    fn test_values_with_comment_chars_are_quoted() {
        let doc = Document::new(vec![Node::Keyword(Keyword::new(
            "NAME",
            vec![Value::from("a#b"), Value::from("two words"), Value::from("plain")],
        ))]);
        assert_eq!(doc.to_deck_string(), "NAME \"a#b\" \"two words\" plain\n");
    }

    #[test]
    fn test_value_containing_double_quote() {
        let doc = Document::new(vec![Node::Keyword(Keyword::new(
            "TITLE",
            vec![Value::from("say \"hi\"")],
        ))]);
        assert_eq!(doc.to_deck_string(), "TITLE 'say \"hi\"'\n");
    }
}
