//! The preprocessor's variable table.

use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

static VAR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Case-insensitive mapping from variable names to substitution text.
///
/// Created empty or seeded by the caller (seed entries behave exactly like
/// `@SET` lines before line 1); afterwards mutated only by `@SET`. The
/// language has no unset directive, so the table never shrinks. Names keep
/// no casing: entries are stored under the uppercased name, which is the
/// comparison key everywhere.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    entries: AHashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites an entry. Takes effect for all later lookups.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_uppercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` is a well-formed variable name (`[A-Za-z_][A-Za-z0-9_]*`).
    pub fn is_valid_name(name: &str) -> bool {
        VAR_NAME.is_match(name)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.set(&name.into(), value);
        }
        table
    }
}
