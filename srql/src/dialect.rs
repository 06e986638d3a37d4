//! The `Dialect` selector and the translator's one configuration knob.

use std::fmt;

/// A translation target (§4.4).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, serde::Serialize, serde::Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dialect {
    ClickHouse,
    Proton,
    #[strum(serialize = "arango", serialize = "arangodb", serialize = "aql")]
    ArangoDb,
}

/// Translator-wide knobs that aren't carried on the AST because they answer
/// "how should this dialect render", not "what did the query say" (§2, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Whether Proton wraps a plain batch (`Show`/`Find`/`Count`) table name
    /// in `table(...)`. Resolves the Open Question in §9: the reference
    /// behavior wraps unconditionally, which is what `default()` reproduces,
    /// but it's surfaced here as a toggle rather than hardcoded.
    pub wrap_batch_tables_in_proton: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            wrap_batch_tables_in_proton: true,
        }
    }
}

impl fmt::Display for TranslateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TranslateOptions {{ wrap_batch_tables_in_proton: {} }}",
            self.wrap_batch_tables_in_proton
        )
    }
}
