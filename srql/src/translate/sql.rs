//! The SQL family: ClickHouse and Proton share one skeleton (§4.4 "Common
//! SQL skeleton"); the only divergence the spec calls out is how a plain
//! table name gets wrapped, so that's the one thing this module
//! parameterizes on `SqlFlavor` rather than duplicating the whole emitter.

use srql_ast::{
    Condition, Direction, Duration, Emit, Field, Join, JoinType, LogicalOp, OperatorType,
    OrderItem, Query, QueryKind, SelectItem, SelectItemKind, Source,
};

use crate::dialect::TranslateOptions;
use crate::translate::value::{dotted_lower, emit_value, table_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SqlFlavor {
    ClickHouse,
    Proton,
}

pub(crate) fn emit(query: &Query, flavor: SqlFlavor, options: &TranslateOptions) -> String {
    let mut clauses = Vec::new();

    let prefix = match query.kind {
        QueryKind::Show | QueryKind::Find => "SELECT * FROM".to_string(),
        QueryKind::Count => "SELECT COUNT(*) FROM".to_string(),
        QueryKind::Stream => format!("SELECT {} FROM", select_list(&query.select)),
    };
    clauses.push(prefix);

    let mut source = source_str(&query.source, query.kind, flavor, options);
    if let Some(alias) = &query.from_alias {
        source.push_str(" AS ");
        source.push_str(alias);
    }
    clauses.push(source);

    for join in &query.joins {
        clauses.push(emit_join(join, flavor, options));
    }

    if !query.conditions.is_empty() {
        clauses.push(format!(
            "WHERE {}",
            emit_cond_list(&query.conditions, &query.conditions_link)
        ));
    }

    if !query.group_by.is_empty() {
        let fields = query.group_by.iter().map(dotted_lower).collect::<Vec<_>>().join(", ");
        clauses.push(format!("GROUP BY {fields}"));
    }

    if !query.having.is_empty() {
        clauses.push(format!(
            "HAVING {}",
            emit_cond_list(&query.having, &query.having_link)
        ));
    }

    if !query.order_by.is_empty() {
        clauses.push(format!("ORDER BY {}", order_by_list(&query.order_by)));
    }

    if let Some(limit) = query.limit {
        clauses.push(format!("LIMIT {limit}"));
    }

    if let Some(emit) = &query.emit {
        clauses.push(emit_clause(emit));
    }

    clauses.join(" ")
}

fn select_list(items: &[SelectItem]) -> String {
    if items.is_empty() {
        return "*".to_string();
    }
    items.iter().map(select_item).collect::<Vec<_>>().join(", ")
}

fn select_item(item: &SelectItem) -> String {
    let mut out = match &item.kind {
        SelectItemKind::FieldRef(field) => dotted_lower(field),
        SelectItemKind::FunctionCall { name, args } => {
            let args = match args {
                srql_ast::FuncArgs::Star => "*".to_string(),
                srql_ast::FuncArgs::Args(items) => select_list_args(items),
            };
            format!("{name}({args})")
        }
        SelectItemKind::Literal(value) => emit_value(value),
    };
    if let Some(alias) = &item.alias {
        out.push_str(" AS ");
        out.push_str(alias);
    }
    out
}

fn select_list_args(items: &[SelectItem]) -> String {
    items.iter().map(select_item).collect::<Vec<_>>().join(", ")
}

/// Renders a data source the way both SQL dialects need it: a plain table
/// name, a `TABLE(...)`/`table(...)` wrapper carried straight through from
/// the AST, or a `tumble`/`hop` windowed transform (§4.4 item 3).
fn source_str(source: &Source, kind: QueryKind, flavor: SqlFlavor, options: &TranslateOptions) -> String {
    match source {
        Source::Plain(entity) => {
            let name = table_name(entity);
            match flavor {
                SqlFlavor::ClickHouse => name,
                SqlFlavor::Proton => {
                    let is_batch = matches!(kind, QueryKind::Show | QueryKind::Find | QueryKind::Count);
                    if is_batch && !options.wrap_batch_tables_in_proton {
                        name
                    } else {
                        format!("table({name})")
                    }
                }
            }
        }
        // Written explicitly as `TABLE(...)` by the query author; passed
        // through verbatim regardless of dialect (§1's non-goal: SRQL
        // doesn't normalize cross-dialect semantics).
        Source::Table(entity) => format!("table({})", table_name(entity)),
        Source::Windowed {
            func,
            inner,
            time_field,
            size,
            advance,
        } => emit_windowed(*func, inner, time_field, *size, *advance),
    }
}

fn emit_windowed(
    func: srql_ast::WindowFn,
    inner: &srql_ast::Entity,
    time_field: &Field,
    size: Duration,
    advance: Option<Duration>,
) -> String {
    let table = format!("table({})", table_name(inner));
    let field = dotted_lower(time_field);
    match func {
        srql_ast::WindowFn::Tumble => format!("tumble({table}, {field}, {size})"),
        srql_ast::WindowFn::Hop => {
            let advance = advance.expect("hop windows always carry an advance duration");
            format!("hop({table}, {field}, {size}, {advance})")
        }
    }
}

fn emit_join(join: &Join, flavor: SqlFlavor, options: &TranslateOptions) -> String {
    let keyword = match join.join_type {
        JoinType::Default => "JOIN",
        JoinType::Inner => "INNER JOIN",
        JoinType::Left => "LEFT JOIN",
        JoinType::Right => "RIGHT JOIN",
    };

    let mut source = source_str(&join.source.source, QueryKind::Stream, flavor, options);
    if let Some(alias) = &join.source.alias {
        source.push_str(" AS ");
        source.push_str(alias);
    }

    format!("{keyword} {source} ON {}", emit_condition(&join.on))
}

fn order_by_list(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            let direction = match item.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            format!("{} {direction}", dotted_lower(&item.field))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_clause(emit: &Emit) -> String {
    match emit {
        Emit::AfterWindowClose(None) => "EMIT AFTER WINDOW CLOSE".to_string(),
        Emit::AfterWindowClose(Some(delay)) => format!("EMIT AFTER WINDOW CLOSE WITH DELAY {delay}"),
        Emit::Periodic(duration) => format!("EMIT PERIODIC {duration}"),
    }
}

pub(crate) fn emit_cond_list(children: &[Condition], links: &[LogicalOp]) -> String {
    let mut out = String::new();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(logical_op_str(links[i - 1]));
            out.push(' ');
        }
        out.push_str(&emit_condition(child));
    }
    out
}

fn logical_op_str(op: LogicalOp) -> &'static str {
    match op {
        LogicalOp::And => "AND",
        LogicalOp::Or => "OR",
    }
}

fn emit_condition(cond: &Condition) -> String {
    match cond {
        Condition::Simple { field, op, operand } => emit_simple(field, *op, operand),
        Condition::In { field, values } => {
            let values = values.iter().map(emit_value).collect::<Vec<_>>().join(", ");
            format!("{} IN ({values})", dotted_lower(field))
        }
        Condition::Between { field, lo, hi } => {
            format!(
                "{} BETWEEN {} AND {}",
                dotted_lower(field),
                emit_value(lo),
                emit_value(hi)
            )
        }
        Condition::IsNull { field, negated } => {
            let tail = if *negated { "IS NOT NULL" } else { "IS NULL" };
            format!("{} {tail}", dotted_lower(field))
        }
        Condition::Group(group) => {
            if group.is_empty() {
                return String::new();
            }
            format!("({})", emit_cond_list(&group.children, &group.logical_link))
        }
    }
}

fn emit_simple(field: &Field, op: OperatorType, operand: &srql_ast::Value) -> String {
    let field = dotted_lower(field);
    match op {
        OperatorType::Like => format!("{field} LIKE {}", emit_value(operand)),
        OperatorType::Contains => format!("position({field}, {}) > 0", emit_value(operand)),
        other => format!("{field} {other} {}", emit_value(operand)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use srql_parser::parse;

    fn translate(source: &str, flavor: SqlFlavor) -> String {
        let query = parse(source).unwrap();
        emit(&query, flavor, &TranslateOptions::default())
    }

    #[test]
    fn show_devices() {
        assert_eq!(translate("show devices", SqlFlavor::ClickHouse), "SELECT * FROM devices");
    }

    #[test]
    fn find_with_filter_order_and_limit() {
        assert_eq!(
            translate(
                "find flows where bytes > 1000 order by ts desc limit 10",
                SqlFlavor::ClickHouse
            ),
            "SELECT * FROM netflow_metrics WHERE bytes > 1000 ORDER BY ts DESC LIMIT 10"
        );
    }

    #[test]
    fn count_with_in_list_on_proton() {
        assert_eq!(
            translate("count traps where severity in (1, 2, 3)", SqlFlavor::Proton),
            "SELECT COUNT(*) FROM table(traps) WHERE severity IN (1, 2, 3)"
        );
    }

    #[test]
    fn is_not_null_and_equality() {
        assert_eq!(
            translate(
                "find logs where msg is not null and level = 'ERROR'",
                SqlFlavor::ClickHouse
            ),
            "SELECT * FROM logs WHERE msg IS NOT NULL AND level = 'ERROR'"
        );
    }

    #[test]
    fn tumble_stream_on_proton() {
        assert_eq!(
            translate(
                "stream * from tumble(flows, ts, 60s) group by src emit after window close",
                SqlFlavor::Proton
            ),
            "SELECT * FROM tumble(table(flows), ts, 60s) GROUP BY src EMIT AFTER WINDOW CLOSE"
        );
    }

    #[test]
    fn clickhouse_never_wraps_plain_tables() {
        assert_eq!(
            translate("count traps where severity in (1, 2, 3)", SqlFlavor::ClickHouse),
            "SELECT COUNT(*) FROM traps WHERE severity IN (1, 2, 3)"
        );
    }

    #[test]
    fn proton_batch_wrapping_is_optional() {
        let query = parse("show devices").unwrap();
        let options = TranslateOptions {
            wrap_batch_tables_in_proton: false,
        };
        assert_eq!(emit(&query, SqlFlavor::Proton, &options), "SELECT * FROM devices");
    }

    #[test]
    fn contains_and_like_use_their_own_forms() {
        assert_eq!(
            translate("show devices where hostname contains 'edge'", SqlFlavor::ClickHouse),
            "SELECT * FROM devices WHERE position(hostname, 'edge') > 0"
        );
        assert_eq!(
            translate("show devices where hostname like 'edge%'", SqlFlavor::ClickHouse),
            "SELECT * FROM devices WHERE hostname LIKE 'edge%'"
        );
    }

    #[test]
    fn between_emits_lo_and_hi() {
        assert_eq!(
            translate("show flows where bytes between 10 and 20", SqlFlavor::ClickHouse),
            "SELECT * FROM netflow_metrics WHERE bytes BETWEEN 10 AND 20"
        );
    }

    #[test]
    fn grouped_conditions_keep_their_parens() {
        assert_eq!(
            translate("show devices where (a = 1 or b = 2) and c = 3", SqlFlavor::ClickHouse),
            "SELECT * FROM devices WHERE (a = 1 OR b = 2) AND c = 3"
        );
    }

    #[test]
    fn join_renders_keyword_source_and_condition() {
        assert_eq!(
            translate(
                "stream * from flows left join devices on devices.status = 'up'",
                SqlFlavor::ClickHouse
            ),
            "SELECT * FROM flows LEFT JOIN devices ON devices.status = 'up'"
        );
    }

    #[test]
    fn count_star_function_call_passes_through() {
        assert_eq!(
            translate("stream count(*) from flows", SqlFlavor::ClickHouse),
            "SELECT count(*) FROM flows"
        );
    }

    #[test]
    fn periodic_emit_clause() {
        assert_eq!(
            translate("stream * from flows emit periodic 5s", SqlFlavor::Proton),
            "SELECT * FROM table(flows) EMIT PERIODIC 5s"
        );
    }
}
