//! Line normalization: comment stripping and whitespace trimming.

/// Strips a trailing comment and trims surrounding whitespace.
///
/// A comment starts at the first occurrence of any configured introducer
/// character outside quoted text; quote state is tracked character by
/// character so introducers inside single- or double-quoted strings are
/// preserved. The function has no side effects and never allocates.
pub fn normalize<'a>(line: &'a str, comment_chars: &[char]) -> &'a str {
    strip_comment(line, comment_chars).trim()
}

fn strip_comment<'a>(line: &'a str, comment_chars: &[char]) -> &'a str {
    let mut quote: Option<char> = None;
    for (idx, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                } else if comment_chars.contains(&c) {
                    return &line[..idx];
                }
            }
        }
    }
    line
}
