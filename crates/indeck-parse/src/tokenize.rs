//! Tokenization of preprocessed lines.
//!
//! By this stage lines are comment-free, trimmed, and fully expanded; the
//! tokenizer only decides what kind of line it is looking at and splits the
//! remainder into tokens, honoring quoted strings as atomic.

use crate::error::ParseErrorKind;

/// The tokenized form of one preprocessed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLine {
    /// `&NAME`, optionally followed by free-text parameter words.
    SectionOpen {
        name: String,
        parameter: Option<String>,
    },
    /// `&END`, optionally followed by the name being closed.
    SectionClose { name: Option<String> },
    /// Anything else: a keyword name followed by ordered value tokens.
    Keyword { name: String, values: Vec<String> },
}

/// Tokenizes one preprocessed line.
///
/// Quoted segments (single or double quotes) become single tokens with the
/// quotes stripped; the other quote character inside is literal and there
/// are no escape sequences. Whitespace outside quotes delimits tokens and
/// collapses. Boolean-looking literals such as `.TRUE.` pass through as
/// plain text; nothing here interprets values.
pub fn tokenize(line: &str) -> Result<TokenLine, ParseErrorKind> {
    if let Some(rest) = line.strip_prefix('&') {
        let (name, remainder) = split_first_word(rest);
        if name.is_empty() {
            return Err(ParseErrorKind::MalformedDirective(
                "missing section name after '&'".into(),
            ));
        }
        if name.eq_ignore_ascii_case("END") {
            let name = (!remainder.is_empty()).then(|| remainder.to_owned());
            return Ok(TokenLine::SectionClose { name });
        }
        let parameter = (!remainder.is_empty()).then(|| remainder.to_owned());
        return Ok(TokenLine::SectionOpen {
            name: name.to_owned(),
            parameter,
        });
    }

    let (name, remainder) = split_first_word(line);
    let values = split_words(remainder)?;
    Ok(TokenLine::Keyword {
        name: name.to_owned(),
        values,
    })
}

/// Splits off the first whitespace-delimited word; the remainder is trimmed.
fn split_first_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// Splits text into whitespace-delimited tokens, treating quoted segments
/// as atomic (quotes stripped). Fails on a quote with no closing partner.
pub(crate) fn split_words(text: &str) -> Result<Vec<String>, ParseErrorKind> {
    let mut words = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '\'' || c == '"' {
            let mut word = String::new();
            let mut closed = false;
            for d in chars.by_ref() {
                if d == c {
                    closed = true;
                    break;
                }
                word.push(d);
            }
            if !closed {
                return Err(ParseErrorKind::UnterminatedString);
            }
            words.push(word);
        } else {
            let mut word = String::new();
            word.push(c);
            while let Some(&d) = chars.peek() {
                if d.is_whitespace() {
                    break;
                }
                word.push(d);
                chars.next();
            }
            words.push(word);
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keyword(name: &str, values: &[&str]) -> TokenLine {
        TokenLine::Keyword {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_keyword_with_values() {
        assert_eq!(tokenize("MAX_SCF 50").unwrap(), keyword("MAX_SCF", &["50"]));
        assert_eq!(tokenize("LSD").unwrap(), keyword("LSD", &[]));
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(
            tokenize("A   0.0\t2.8595   2.8595").unwrap(),
            keyword("A", &["0.0", "2.8595", "2.8595"])
        );
    }

    #[test]
    fn test_quoted_values_are_atomic() {
        assert_eq!(
            tokenize("NAME \"a b\" 'c d' bare").unwrap(),
            keyword("NAME", &["a b", "c d", "bare"])
        );
    }

    #[test]
    fn test_other_quote_kind_is_literal() {
        assert_eq!(
            tokenize("NAME \"it's a#b\"").unwrap(),
            keyword("NAME", &["it's a#b"])
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize("NAME \"abc").unwrap_err(),
            ParseErrorKind::UnterminatedString
        );
        assert_eq!(
            tokenize("NAME 'abc").unwrap_err(),
            ParseErrorKind::UnterminatedString
        );
    }

    #[test]
    fn test_boolean_literals_pass_through() {
        assert_eq!(
            tokenize("SCF_GUESS .TRUE.").unwrap(),
            keyword("SCF_GUESS", &[".TRUE."])
        );
    }

    #[test]
    fn test_section_open() {
        assert_eq!(
            tokenize("&CELL").unwrap(),
            TokenLine::SectionOpen {
                name: "CELL".into(),
                parameter: None
            }
        );
        assert_eq!(
            tokenize("&KIND Na").unwrap(),
            TokenLine::SectionOpen {
                name: "KIND".into(),
                parameter: Some("Na".into())
            }
        );
    }

    #[test]
    fn test_section_close() {
        assert_eq!(
            tokenize("&END").unwrap(),
            TokenLine::SectionClose { name: None }
        );
        assert_eq!(
            tokenize("&end dft").unwrap(),
            TokenLine::SectionClose {
                name: Some("dft".into())
            }
        );
    }

    #[test]
    fn test_bare_ampersand_rejected() {
        assert!(tokenize("&").is_err());
    }
}
