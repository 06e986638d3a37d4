use crate::{Field, Value};

/// An item in a `SHOW`/`STREAM` select list, with an optional output alias
/// bound by a trailing `AS id`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectItem {
    pub kind: SelectItemKind,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(kind: SelectItemKind) -> SelectItem {
        SelectItem { kind, alias: None }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> SelectItem {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SelectItemKind {
    FieldRef(Field),
    FunctionCall { name: String, args: FuncArgs },
    Literal(Value),
}

/// The argument list of a `funcCall`: either a bare `*` (as in `COUNT(*)`)
/// or an ordered list of nested select items.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FuncArgs {
    Star,
    Args(Vec<SelectItem>),
}
