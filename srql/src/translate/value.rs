//! Value and field formatting shared across all three dialects (§4.4 "Value
//! formatting — consistent across dialects" and the `Field` tie-break).

use srql_ast::{Entity, Field, Value};

/// `Str` is single-quoted with internal quotes escaped; everything else is
/// its bare textual form, exactly as the lexer captured it. The translator
/// never re-validates an IP, MAC, or timestamp literal.
pub fn emit_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Timestamp(s) | Value::IpAddr(s) | Value::MacAddr(s) => s.clone(),
    }
}

/// A field's parts joined with `.`, lower-cased (the SQL dialects' rule for
/// both `WHERE`/`ORDER BY`/`GROUP BY` field references and `entity.col`
/// forms).
pub fn dotted_lower(field: &Field) -> String {
    field
        .parts()
        .iter()
        .map(|p| p.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

/// The canonical table name a SQL dialect reads from for a given entity
/// (§4.4 item 2) — distinct from `Entity`'s own canonical tag name.
pub fn table_name(entity: &Entity) -> String {
    match entity {
        Entity::Devices => "devices".to_string(),
        Entity::Flows => "netflow_metrics".to_string(),
        Entity::Interfaces => "discovered_interfaces".to_string(),
        Entity::Traps => "traps".to_string(),
        Entity::Connections => "connections".to_string(),
        Entity::Logs => "logs".to_string(),
        Entity::Other(name) => name.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn str_values_escape_internal_quotes() {
        assert_eq!(emit_value(&Value::Str("it's".into())), "'it\\'s'");
    }

    #[test]
    fn bare_values_have_no_quoting() {
        assert_eq!(emit_value(&Value::Int(42)), "42");
        assert_eq!(emit_value(&Value::Bool(true)), "true");
        assert_eq!(
            emit_value(&Value::IpAddr("192.168.1.1".into())),
            "192.168.1.1"
        );
    }

    #[test]
    fn table_name_maps_flows_to_netflow_metrics() {
        assert_eq!(table_name(&Entity::Flows), "netflow_metrics");
        assert_eq!(table_name(&Entity::Interfaces), "discovered_interfaces");
        assert_eq!(
            table_name(&Entity::Other("Widgets".to_string())),
            "widgets"
        );
    }

    #[test]
    fn dotted_lower_joins_and_lowercases_parts() {
        let field = Field::new(vec!["Flows".into(), "Bytes".into()]).unwrap();
        assert_eq!(dotted_lower(&field), "flows.bytes");
    }
}
