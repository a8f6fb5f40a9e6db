/// A single value token of a keyword record.
///
/// The parser keeps values opaque: a `Value` is either a bare word or the
/// contents of a quoted string with the quotes stripped. Interpretation is
/// up to the consumer; the `as_*` helpers cover the forms common in deck
/// files (Fortran-style logicals, numbers with `d` exponents) and return
/// `None` when the text does not look like the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Value(String);

impl Value {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Interprets the value as a logical. Accepts the Fortran-style spellings
    /// used in deck files (`.TRUE.`, `TRUE`, `T`, `ON`, `YES` and their
    /// negative counterparts), case-insensitively.
    pub fn as_bool(&self) -> Option<bool> {
        let upper = self.0.to_ascii_uppercase();
        match upper.as_str() {
            ".TRUE." | "TRUE" | "T" | "ON" | "YES" => Some(true),
            ".FALSE." | "FALSE" | "F" | "OFF" | "NO" => Some(false),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Interprets the value as a float. Fortran `d`/`D` exponent markers
    /// (`1.0d-3`) are accepted alongside the usual `e` form.
    pub fn as_f64(&self) -> Option<f64> {
        if let Ok(v) = self.0.parse() {
            return Some(v);
        }
        if self.0.contains(['d', 'D']) {
            let replaced = self.0.replacen(['d', 'D'], "e", 1);
            return replaced.parse().ok();
        }
        None
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
