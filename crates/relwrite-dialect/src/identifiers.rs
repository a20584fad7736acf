//! SQL identifier quoting and casing normalization.

/// Quote character convention for identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// ANSI double quotes, embedded quotes doubled (`"` becomes `""`).
    Ansi,
    /// MySQL backticks, embedded backticks doubled.
    Backtick,
    /// No quoting.
    None,
}

/// Letter-casing normalization applied to unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterCasing {
    /// Keep identifiers as written.
    AsIs,
    /// Normalize to lower case.
    Lower,
    /// Normalize to upper case.
    Upper,
}

/// How a dialect renders identifiers (table and column names) in
/// generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierProcessing {
    pub quoting: Quoting,
    pub casing: LetterCasing,
}

impl IdentifierProcessing {
    /// ANSI quoting with lower-case normalization (Postgres).
    pub const ANSI_LOWER: Self = IdentifierProcessing {
        quoting: Quoting::Ansi,
        casing: LetterCasing::Lower,
    };

    /// ANSI quoting keeping identifiers as written (SQLite).
    pub const ANSI_AS_IS: Self = IdentifierProcessing {
        quoting: Quoting::Ansi,
        casing: LetterCasing::AsIs,
    };

    /// Backtick quoting keeping identifiers as written (MySQL).
    pub const BACKTICK: Self = IdentifierProcessing {
        quoting: Quoting::Backtick,
        casing: LetterCasing::AsIs,
    };

    /// Quote an identifier. Safe for any input: the quote character is
    /// escaped by doubling.
    pub fn quote(&self, name: &str) -> String {
        match self.quoting {
            Quoting::Ansi => format!("\"{}\"", name.replace('"', "\"\"")),
            Quoting::Backtick => format!("`{}`", name.replace('`', "``")),
            Quoting::None => name.to_string(),
        }
    }

    /// Apply the dialect's casing normalization to an unquoted identifier.
    pub fn standardize(&self, name: &str) -> String {
        match self.casing {
            LetterCasing::AsIs => name.to_string(),
            LetterCasing::Lower => name.to_lowercase(),
            LetterCasing::Upper => name.to_uppercase(),
        }
    }
}
