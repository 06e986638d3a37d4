use crate::{Condition, Emit, Entity, Field, Join, LogicalOp, OrderItem, SelectItem, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QueryKind {
    Show,
    Find,
    Count,
    Stream,
}

/// The canonical, dialect-independent query AST — the single contract
/// between the parser and the translators.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Query {
    pub kind: QueryKind,
    pub entity: Entity,

    pub select: Vec<SelectItem>,

    /// Alias bound to the stream source by `FROM ... AS alias` (Stream only).
    pub from_alias: Option<String>,
    /// The resolved data source. `Show`/`Find`/`Count` always carry
    /// `Source::Plain(entity.clone())`; `Stream` carries whatever shape
    /// `dataSource` parsed to.
    pub source: Source,

    pub joins: Vec<Join>,

    /// The flattened top-level `WHERE`, paired with `conditions_link`.
    /// Empty `conditions` means "no filter". This is the "flat Group" the
    /// data model describes for the root clause: it is never wrapped in a
    /// `Condition::Group` (and so never gets a redundant pair of parens),
    /// unlike a parenthesized sub-condition nested inside it.
    pub conditions: Vec<Condition>,
    pub conditions_link: Vec<LogicalOp>,

    pub group_by: Vec<Field>,

    pub having: Vec<Condition>,
    pub having_link: Vec<LogicalOp>,

    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,

    /// Stream-only `EMIT` directive.
    pub emit: Option<Emit>,

    /// Trailing `LATEST` modifier, valid on `Show`/`Find`. Semantics are
    /// left to the downstream engine; SRQL only preserves the tag.
    pub latest: bool,
}

impl Query {
    /// A query with no select items, no filter, no joins, and no modifiers,
    /// reading straight off `entity`. Callers fill in whichever fields their
    /// statement form populates.
    pub fn new(kind: QueryKind, entity: Entity) -> Query {
        let source = Source::Plain(entity.clone());
        Query {
            kind,
            entity,
            select: Vec::new(),
            from_alias: None,
            source,
            joins: Vec::new(),
            conditions: Vec::new(),
            conditions_link: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            having_link: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            emit: None,
            latest: false,
        }
    }
}
