//! Lexing and parsing for SRQL: turns query text into a `srql_ast::Query`.
//!
//! The pipeline is three stages, mirroring the language's own C1/C2/C3 split:
//! [`lexer`] tokenizes, [`parser`] builds a transient [`cst`], and [`builder`]
//! folds the CST into the canonical AST. [`parse`] runs all three.
#![forbid(unsafe_code)]

pub mod builder;
pub mod cst;
pub mod lexer;
pub mod parser;

use srql_ast::{Errors, Query};

/// Lex, parse, and build `source` into a `Query`. The first error
/// encountered at any stage aborts the pipeline (§4.2): a malformed token
/// short-circuits before the token parser ever runs, and a syntax error
/// short-circuits before the builder ever runs.
pub fn parse(source: &str) -> Result<Query, Errors> {
    let stmt = parser::parse(source)?;
    Ok(builder::build(stmt))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_and_builds_a_complete_query() {
        let query = parse("find flows where bytes > 1000 and proto = 'tcp' limit 5").unwrap();
        assert_eq!(query.conditions.len(), 2);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn lex_errors_surface_through_the_top_level_entry_point() {
        let err = parse("show devices where x = @").unwrap_err();
        assert!(!err.0.is_empty());
    }

    #[test]
    fn snapshot_of_the_built_ast_for_a_bare_show() {
        let query = parse("show devices").unwrap();
        insta::assert_snapshot!(
            format!("{query:?}"),
            @"Query { kind: Show, entity: Devices, select: [], from_alias: None, source: Plain(Devices), joins: [], conditions: [], conditions_link: [], group_by: [], having: [], having_link: [], order_by: [], limit: None, emit: None, latest: false }"
        );
    }

    #[test]
    fn snapshot_of_the_built_ast_for_a_filtered_show() {
        let query = parse("show devices where status = 'up'").unwrap();
        insta::assert_snapshot!(
            format!("{query:?}"),
            @"Query { kind: Show, entity: Devices, select: [], from_alias: None, source: Plain(Devices), joins: [], conditions: [Simple { field: Field { parts: [\"status\"] }, op: Eq, operand: Str(\"up\") }], conditions_link: [], group_by: [], having: [], having_link: [], order_by: [], limit: None, emit: None, latest: false }"
        );
    }
}
