//! C4: the `Dialect` strategy. `sql` holds the shared ClickHouse/Proton
//! skeleton, `aql` the ArangoDB emitter, `value` the formatting helpers both
//! sides need (§4.4).

mod aql;
mod sql;
mod value;

use srql_ast::Query;

use crate::dialect::{Dialect, TranslateOptions};
use crate::error::TranslationError;
use sql::SqlFlavor;

/// Translate `query` into `dialect`'s query text (§4.4, §6). Total on any
/// well-formed `Query` — there is no schema to look up, so this never fails
/// once past dialect dispatch.
pub fn translate(query: &Query, dialect: Dialect, options: &TranslateOptions) -> Result<String, TranslationError> {
    log::debug!("translating a {:?} query to {dialect}", query.kind);
    match dialect {
        Dialect::ClickHouse => Ok(sql::emit(query, SqlFlavor::ClickHouse, options)),
        Dialect::Proton => Ok(sql::emit(query, SqlFlavor::Proton, options)),
        Dialect::ArangoDb => Ok(aql::emit(query)),
    }
}
