//! SRQL: a small query language for infrastructure telemetry, compiled to
//! ClickHouse, Proton, and ArangoDB/AQL.
//!
//! ```
//! let ast = srql::parse("find flows where bytes > 1000 order by ts desc limit 10").unwrap();
//! let sql = srql::translate(&ast, srql::Dialect::ClickHouse, &srql::TranslateOptions::default()).unwrap();
//! assert_eq!(sql, "SELECT * FROM netflow_metrics WHERE bytes > 1000 ORDER BY ts DESC LIMIT 10");
//! ```
#![forbid(unsafe_code)]

mod dialect;
mod error;
pub mod error_message;
mod translate;

pub use dialect::{Dialect, TranslateOptions};
pub use error::TranslationError;
pub use error_message::{ErrorMessage, ErrorMessages, SourceLocation};
pub use srql_ast::{
    Condition, Duration, DurationUnit, Emit, Entity, Field, Group, Join, JoinType, LogicalOp,
    OperatorType, OrderItem, Query, QueryKind, SelectItem, SelectItemKind, Source, Value,
    WindowFn,
};
pub use translate::translate;

/// Lex, parse, and build `text` into a `Query` (§6's `parse`). On failure,
/// returns the first diagnostic's rendered, source-anchored message — the
/// public contract surfaces a single message even though the pipeline
/// accumulates `Errors` internally (§4.5/§7).
pub fn parse(text: &str) -> Result<Query, String> {
    srql_parser::parse(text).map_err(|errors| {
        let messages = ErrorMessages::from(&errors).composed(text);
        messages
            .inner
            .first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown parse error".to_string())
    })
}
