use enum_as_inner::EnumAsInner;

use crate::{Field, Value};

/// A comparison operator usable in a `Simple` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum OperatorType {
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "!=")]
    Neq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = "LIKE")]
    Like,
    #[strum(serialize = "CONTAINS")]
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// A parenthesized sub-condition combining children left-to-right with
/// `logical_link`. Invariant: `logical_link.len() == children.len() - 1`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Group {
    pub children: Vec<Condition>,
    pub logical_link: Vec<LogicalOp>,
}

impl Group {
    pub fn new(children: Vec<Condition>, logical_link: Vec<LogicalOp>) -> Group {
        debug_assert_eq!(
            logical_link.len(),
            children.len().saturating_sub(1),
            "logical_link must have one fewer element than children"
        );
        Group {
            children,
            logical_link,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, EnumAsInner, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Condition {
    Simple {
        field: Field,
        op: OperatorType,
        operand: Value,
    },
    In {
        field: Field,
        values: Vec<Value>,
    },
    Between {
        field: Field,
        lo: Value,
        hi: Value,
    },
    IsNull {
        field: Field,
        negated: bool,
    },
    /// A nested, explicitly parenthesized sub-condition. Never used to
    /// represent the query's top-level `WHERE`/`HAVING` clause — those are
    /// stored as a flat `(children, logical_link)` pair directly on `Query`,
    /// so the translator doesn't wrap the whole clause in a redundant pair
    /// of parens.
    Group(Group),
}

/// Fold a parsed `(cond (logicalOp cond)*)` sequence into a `Condition`,
/// collapsing a singleton with no links into its child directly rather than
/// a pointless `Group` wrapper.
pub fn fold_group(children: Vec<Condition>, logical_link: Vec<LogicalOp>) -> Condition {
    if children.len() == 1 && logical_link.is_empty() {
        children.into_iter().next().unwrap()
    } else {
        Condition::Group(Group::new(children, logical_link))
    }
}
