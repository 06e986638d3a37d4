//! The concrete parse tree (C2's output). Every type here is transient:
//! discarded once `builder` has folded it into a `srql_ast::Query` (C3).
//! Field parts, entity names, and literal text are kept in their raw,
//! unvalidated form — normalization happens only in the builder.

use srql_ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Show(ShowStmt),
    Find(FindStmt),
    Count(CountStmt),
    Stream(StreamStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowStmt {
    pub entity: String,
    pub cond: Option<Cond>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub latest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindStmt {
    pub entity: String,
    pub cond: Option<Cond>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub latest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountStmt {
    pub entity: String,
    pub cond: Option<Cond>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamStmt {
    /// `None` means the surface form was omitted or a bare `*`; both mean
    /// "all columns" per §4.3.
    pub select: Option<Vec<SelectItem>>,
    pub data_source: DataSource,
    pub joins: Vec<JoinPart>,
    pub cond: Option<Cond>,
    pub group_by: Vec<FieldRef>,
    pub having: Option<Cond>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub emit: Option<EmitClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub kind: SelectItemKind,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItemKind {
    Field(FieldRef),
    FuncCall { name: String, args: FuncArgs },
    Value(ValueLit),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuncArgs {
    Star,
    Args(Vec<SelectItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub parts: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub source: StreamSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFnTok {
    Tumble,
    Hop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamSource {
    Bare(String),
    Table(String),
    Windowed {
        func: WindowFnTok,
        inner: String,
        time_field: FieldRef,
        size: DurationLit,
        advance: Option<DurationLit>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinTypeTok {
    Left,
    Right,
    Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinPart {
    pub join_type: Option<JoinTypeTok>,
    pub data_source: DataSource,
    pub on: Cond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOpTok {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOpTok {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

/// `expr (logicalOp expr)*`. Invariant: `logical_link.len() == children.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub children: Vec<Expr>,
    pub logical_link: Vec<LogicalOpTok>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Simple {
        field: FieldRef,
        op: CmpOpTok,
        value: ValueLit,
    },
    In {
        field: FieldRef,
        values: Vec<ValueLit>,
    },
    Contains {
        field: FieldRef,
        value: String,
    },
    Between {
        field: FieldRef,
        lo: ValueLit,
        hi: ValueLit,
    },
    IsNull {
        field: FieldRef,
        negated: bool,
    },
    Group(Cond),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueLit {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(String),
    IpAddr(String),
    MacAddr(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionTok {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub field: FieldRef,
    pub direction: Option<DirectionTok>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationLit {
    pub magnitude: u32,
    pub unit: char,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmitClause {
    AfterWindowClose(Option<DurationLit>),
    Periodic(DurationLit),
}
