//! The ArangoDB/AQL translator (§4.4 "ArangoDB emission"). Every field
//! reference is prefixed `doc.`; `Count` wraps the whole statement in
//! `RETURN LENGTH(...)`.

use srql_ast::{Condition, Direction, Entity, Field, LogicalOp, OperatorType, OrderItem, Query, QueryKind, Value};

use crate::translate::value::emit_value;

pub(crate) fn emit(query: &Query) -> String {
    let collection = collection_name(&query.entity);

    let mut lines = vec![format!("FOR doc IN {collection}")];

    if !query.conditions.is_empty() {
        lines.push(format!(
            "  FILTER {}",
            emit_cond_list(&query.conditions, &query.conditions_link)
        ));
    }

    if !query.order_by.is_empty() {
        lines.push(format!("  SORT {}", order_by_list(&query.order_by)));
    }

    if let Some(limit) = query.limit {
        lines.push(format!("  LIMIT {limit}"));
    }

    lines.push("  RETURN doc".to_string());

    if query.kind == QueryKind::Count {
        // Every line but the first (`FOR doc IN ...`) already carries its own
        // two-space indent; only the `FOR` line needs one added here, or the
        // wrap would double-indent `FILTER`/`SORT`/`LIMIT`/`RETURN`.
        let indented = lines
            .iter()
            .enumerate()
            .map(|(i, l)| if i == 0 { format!("  {l}") } else { l.clone() })
            .collect::<Vec<_>>()
            .join("\n");
        format!("RETURN LENGTH(\n{indented}\n)")
    } else {
        lines.join("\n")
    }
}

/// The AQL `FOR doc IN <collection>` target: `Query.entity`'s own canonical
/// tag, lower-cased — distinct from the SQL dialects' table-name mapping
/// (§4.4's AQL section says `lower(entity)`, not `netflow_metrics`-style
/// renaming).
fn collection_name(entity: &Entity) -> String {
    match entity {
        Entity::Other(name) => name.to_ascii_lowercase(),
        other => other.to_string(),
    }
}

fn doc_field(field: &Field) -> String {
    let dotted = field
        .parts()
        .iter()
        .map(|p| p.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".");
    format!("doc.{dotted}")
}

fn order_by_list(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            let direction = match item.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            format!("{} {direction}", doc_field(&item.field))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_cond_list(children: &[Condition], links: &[LogicalOp]) -> String {
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
            format!("{} IN [{values}]", doc_field(field))
        }
        Condition::Between { field, lo, hi } => {
            format!(
                "{} >= {} AND {} <= {}",
                doc_field(field),
                emit_value(lo),
                doc_field(field),
                emit_value(hi)
            )
        }
        Condition::IsNull { field, negated } => {
            let op = if *negated { "!=" } else { "==" };
            format!("{} {op} null", doc_field(field))
        }
        Condition::Group(group) => {
            if group.is_empty() {
                return String::new();
            }
            format!("({})", emit_cond_list(&group.children, &group.logical_link))
        }
    }
}

fn emit_simple(field: &Field, op: OperatorType, operand: &Value) -> String {
    let field = doc_field(field);
    match op {
        OperatorType::Like => format!("LIKE({field}, {}, true)", emit_value(operand)),
        OperatorType::Contains => format!("CONTAINS({field}, {})", emit_value(operand)),
        OperatorType::Eq => format!("{field} == {}", emit_value(operand)),
        other => format!("{field} {other} {}", emit_value(operand)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use srql_parser::parse;

    fn translate(source: &str) -> String {
        emit(&parse(source).unwrap())
    }

    #[test]
    fn contains_on_devices() {
        assert_eq!(
            translate("show devices where hostname contains 'edge'"),
            "FOR doc IN devices\n  FILTER CONTAINS(doc.hostname, 'edge')\n  RETURN doc"
        );
    }

    #[test]
    fn equality_uses_double_equals() {
        assert_eq!(
            translate("show devices where status = 'up'"),
            "FOR doc IN devices\n  FILTER doc.status == 'up'\n  RETURN doc"
        );
    }

    #[test]
    fn is_null_and_is_not_null() {
        assert_eq!(
            translate("find logs where msg is null"),
            "FOR doc IN logs\n  FILTER doc.msg == null\n  RETURN doc"
        );
        assert_eq!(
            translate("find logs where msg is not null"),
            "FOR doc IN logs\n  FILTER doc.msg != null\n  RETURN doc"
        );
    }

    #[test]
    fn between_expands_to_two_comparisons() {
        assert_eq!(
            translate("show flows where bytes between 10 and 20"),
            "FOR doc IN flows\n  FILTER doc.bytes >= 10 AND doc.bytes <= 20\n  RETURN doc"
        );
    }

    #[test]
    fn in_list_uses_square_brackets() {
        assert_eq!(
            translate("count traps where severity in (1, 2, 3)"),
            "RETURN LENGTH(\n  FOR doc IN traps\n  FILTER doc.severity IN [1, 2, 3]\n  RETURN doc\n)"
        );
    }

    #[test]
    fn order_by_and_limit_use_doc_prefix() {
        assert_eq!(
            translate("find flows order by bytes desc limit 5"),
            "FOR doc IN flows\n  SORT doc.bytes DESC\n  LIMIT 5\n  RETURN doc"
        );
    }

    #[test]
    fn other_entity_is_lowercased() {
        let query = srql_parser::parse("stream * from Widgets").unwrap();
        assert_eq!(collection_name(&query.entity), "widgets");
    }
}
