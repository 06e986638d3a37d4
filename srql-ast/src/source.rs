use crate::{Condition, Entity, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum DurationUnit {
    #[strum(serialize = "s")]
    Seconds,
    #[strum(serialize = "m")]
    Minutes,
    #[strum(serialize = "h")]
    Hours,
    #[strum(serialize = "d")]
    Days,
}

/// A window/delay duration, e.g. `60s` or `5m`. Only integer magnitudes are
/// in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Duration {
    pub magnitude: u32,
    pub unit: DurationUnit,
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum WindowFn {
    Tumble,
    Hop,
}

/// A stream's data source, as it appears after `FROM` or `JOIN`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Source {
    /// A bare entity or identifier, read straight off the underlying table.
    Plain(Entity),
    /// Proton's `table(entity|id)` wrapper, forcing a non-streaming read.
    Table(Entity),
    /// A `tumble`/`hop` windowed transform over an entity.
    Windowed {
        func: WindowFn,
        inner: Entity,
        time_field: Field,
        size: Duration,
        /// Hop's optional fourth argument; always `None` for `Tumble`.
        advance: Option<Duration>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    /// No join-type keyword was written; behaves as `Inner`.
    Default,
}

/// A `FROM`/`JOIN` target together with its optional binding alias.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataSource {
    pub source: Source,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub source: DataSource,
    pub on: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderItem {
    pub field: Field,
    pub direction: Direction,
}

/// Streaming-only `EMIT` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Emit {
    AfterWindowClose(Option<Duration>),
    Periodic(Duration),
}
