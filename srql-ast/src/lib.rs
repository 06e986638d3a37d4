//! The Query AST for SRQL, the infrastructure-telemetry query language.
//!
//! This crate has no parsing or translation logic of its own — it's the
//! immutable, dialect-independent data the parser builds and the
//! translators consume by reference (see `srql-parser` and `srql`).
#![forbid(unsafe_code)]

mod condition;
mod entity;
mod field;
pub mod error;
mod query;
mod select;
mod source;
mod value;

pub use condition::{fold_group, Condition, Group, LogicalOp, OperatorType};
pub use entity::Entity;
pub use error::{Error, Errors, MessageKind, Reason, WithErrorInfo};
pub use field::Field;
pub use query::{Query, QueryKind};
pub use select::{FuncArgs, SelectItem, SelectItemKind};
pub use source::{
    DataSource, Direction, Duration, DurationUnit, Emit, Join, JoinType, OrderItem, Source,
    WindowFn,
};
pub use value::Value;

mod span;
pub use span::{LineIndex, Span};
