//! AST builder (C3): folds a `cst::Stmt` into a `srql_ast::Query`. Total and
//! infallible — every shape the grammar can produce has exactly one AST
//! shape, so there's nothing here left to reject (§4.3).

use srql_ast::{
    fold_group, Condition, DataSource, Direction, Duration, DurationUnit, Emit, Entity, Field,
    FuncArgs as AstFuncArgs, Join, JoinType, LogicalOp, OperatorType, OrderItem as AstOrderItem,
    Query, QueryKind, SelectItem as AstSelectItem, SelectItemKind as AstSelectItemKind, Source,
    Value, WindowFn,
};

use crate::cst::{
    CmpOpTok, Cond, CountStmt, DirectionTok, DurationLit, EmitClause, Expr, FieldRef, FindStmt,
    FuncArgs, JoinPart, JoinTypeTok, LogicalOpTok, OrderItem, SelectItem, SelectItemKind,
    ShowStmt, Stmt, StreamSource, StreamStmt, ValueLit, WindowFnTok,
};

pub fn build(stmt: Stmt) -> Query {
    match stmt {
        Stmt::Show(s) => build_show(s),
        Stmt::Find(s) => build_find(s),
        Stmt::Count(s) => build_count(s),
        Stmt::Stream(s) => build_stream(s),
    }
}

fn build_show(s: ShowStmt) -> Query {
    let mut query = Query::new(QueryKind::Show, Entity::from_ident(&s.entity));
    let (conditions, conditions_link) = flatten_cond(s.cond);
    query.conditions = conditions;
    query.conditions_link = conditions_link;
    query.order_by = build_order_by(s.order_by);
    query.limit = s.limit;
    query.latest = s.latest;
    query
}

fn build_find(s: FindStmt) -> Query {
    let mut query = Query::new(QueryKind::Find, Entity::from_ident(&s.entity));
    let (conditions, conditions_link) = flatten_cond(s.cond);
    query.conditions = conditions;
    query.conditions_link = conditions_link;
    query.order_by = build_order_by(s.order_by);
    query.limit = s.limit;
    query.latest = s.latest;
    query
}

fn build_count(s: CountStmt) -> Query {
    let mut query = Query::new(QueryKind::Count, Entity::from_ident(&s.entity));
    let (conditions, conditions_link) = flatten_cond(s.cond);
    query.conditions = conditions;
    query.conditions_link = conditions_link;
    query
}

fn build_stream(s: StreamStmt) -> Query {
    let data_source = build_data_source(s.data_source);
    let entity = primary_entity(&data_source.source);

    let mut query = Query::new(QueryKind::Stream, entity);
    query.select = build_select_items(s.select.unwrap_or_default());
    query.from_alias = data_source.alias;
    query.source = data_source.source;
    query.joins = s.joins.into_iter().map(build_join).collect();

    let (conditions, conditions_link) = flatten_cond(s.cond);
    query.conditions = conditions;
    query.conditions_link = conditions_link;

    query.group_by = s.group_by.into_iter().map(build_field).collect();

    let (having, having_link) = flatten_cond(s.having);
    query.having = having;
    query.having_link = having_link;

    query.order_by = build_order_by(s.order_by);
    query.limit = s.limit;
    query.emit = s.emit.map(build_emit);
    query
}

/// The entity a `Query` is primarily read from, regardless of how deeply
/// nested the actual `FROM`/`JOIN` source is (e.g. `tumble`'s inner entity).
fn primary_entity(source: &Source) -> Entity {
    match source {
        Source::Plain(e) | Source::Table(e) => e.clone(),
        Source::Windowed { inner, .. } => inner.clone(),
    }
}

fn flatten_cond(cond: Option<Cond>) -> (Vec<Condition>, Vec<LogicalOp>) {
    match cond {
        None => (Vec::new(), Vec::new()),
        Some(c) => (
            c.children.into_iter().map(build_condition).collect(),
            c.logical_link.into_iter().map(build_logical_op).collect(),
        ),
    }
}

fn build_condition(e: Expr) -> Condition {
    match e {
        Expr::Simple { field, op, value } => Condition::Simple {
            field: build_field(field),
            op: build_cmp_op(op),
            operand: build_value(value),
        },
        Expr::In { field, values } => Condition::In {
            field: build_field(field),
            values: values.into_iter().map(build_value).collect(),
        },
        // `CONTAINS` has no dedicated `Condition` variant; it's a comparison
        // operator like any other, always against a string operand.
        Expr::Contains { field, value } => Condition::Simple {
            field: build_field(field),
            op: OperatorType::Contains,
            operand: Value::Str(value),
        },
        Expr::Between { field, lo, hi } => Condition::Between {
            field: build_field(field),
            lo: build_value(lo),
            hi: build_value(hi),
        },
        Expr::IsNull { field, negated } => Condition::IsNull {
            field: build_field(field),
            negated,
        },
        Expr::Group(cond) => fold_group(
            cond.children.into_iter().map(build_condition).collect(),
            cond.logical_link.into_iter().map(build_logical_op).collect(),
        ),
    }
}

fn build_field(f: FieldRef) -> Field {
    Field::new(f.parts).expect("field() only ever produces 1 to 3 parts")
}

fn build_cmp_op(op: CmpOpTok) -> OperatorType {
    match op {
        CmpOpTok::Eq => OperatorType::Eq,
        CmpOpTok::Neq => OperatorType::Neq,
        CmpOpTok::Gt => OperatorType::Gt,
        CmpOpTok::Gte => OperatorType::Gte,
        CmpOpTok::Lt => OperatorType::Lt,
        CmpOpTok::Lte => OperatorType::Lte,
        CmpOpTok::Like => OperatorType::Like,
    }
}

fn build_logical_op(op: LogicalOpTok) -> LogicalOp {
    match op {
        LogicalOpTok::And => LogicalOp::And,
        LogicalOpTok::Or => LogicalOp::Or,
    }
}

fn build_value(v: ValueLit) -> Value {
    match v {
        ValueLit::Str(s) => Value::Str(s),
        ValueLit::Int(n) => Value::Int(n),
        ValueLit::Float(n) => Value::Float(n),
        ValueLit::Bool(b) => Value::Bool(b),
        ValueLit::Timestamp(s) => Value::Timestamp(s),
        ValueLit::IpAddr(s) => Value::IpAddr(s),
        ValueLit::MacAddr(s) => Value::MacAddr(s),
    }
}

fn build_duration(d: DurationLit) -> Duration {
    let unit = match d.unit {
        's' => DurationUnit::Seconds,
        'm' => DurationUnit::Minutes,
        'h' => DurationUnit::Hours,
        'd' => DurationUnit::Days,
        other => unreachable!("lexer only ever emits s/m/h/d duration units, got {other:?}"),
    };
    Duration {
        magnitude: d.magnitude,
        unit,
    }
}

fn build_window_fn(f: WindowFnTok) -> WindowFn {
    match f {
        WindowFnTok::Tumble => WindowFn::Tumble,
        WindowFnTok::Hop => WindowFn::Hop,
    }
}

fn build_source(s: StreamSource) -> Source {
    match s {
        StreamSource::Bare(name) => Source::Plain(Entity::from_ident(&name)),
        StreamSource::Table(name) => Source::Table(Entity::from_ident(&name)),
        StreamSource::Windowed {
            func,
            inner,
            time_field,
            size,
            advance,
        } => Source::Windowed {
            func: build_window_fn(func),
            inner: Entity::from_ident(&inner),
            time_field: build_field(time_field),
            size: build_duration(size),
            advance: advance.map(build_duration),
        },
    }
}

fn build_data_source(ds: crate::cst::DataSource) -> DataSource {
    DataSource {
        source: build_source(ds.source),
        alias: ds.alias,
    }
}

fn build_join_type(t: Option<JoinTypeTok>) -> JoinType {
    match t {
        Some(JoinTypeTok::Left) => JoinType::Left,
        Some(JoinTypeTok::Right) => JoinType::Right,
        Some(JoinTypeTok::Inner) => JoinType::Inner,
        None => JoinType::Default,
    }
}

fn build_join(j: JoinPart) -> Join {
    let (children, logical_link) = flatten_cond(Some(j.on));
    Join {
        join_type: build_join_type(j.join_type),
        source: build_data_source(j.data_source),
        on: fold_group(children, logical_link),
    }
}

fn build_direction(d: Option<DirectionTok>) -> Direction {
    match d {
        Some(DirectionTok::Desc) => Direction::Desc,
        Some(DirectionTok::Asc) | None => Direction::Asc,
    }
}

fn build_order_by(items: Vec<OrderItem>) -> Vec<AstOrderItem> {
    items
        .into_iter()
        .map(|item| AstOrderItem {
            field: build_field(item.field),
            direction: build_direction(item.direction),
        })
        .collect()
}

fn build_select_items(items: Vec<SelectItem>) -> Vec<AstSelectItem> {
    items.into_iter().map(build_select_item).collect()
}

fn build_select_item(item: SelectItem) -> AstSelectItem {
    let kind = match item.kind {
        SelectItemKind::Field(f) => AstSelectItemKind::FieldRef(build_field(f)),
        SelectItemKind::FuncCall { name, args } => AstSelectItemKind::FunctionCall {
            name,
            args: match args {
                FuncArgs::Star => AstFuncArgs::Star,
                FuncArgs::Args(items) => AstFuncArgs::Args(build_select_items(items)),
            },
        },
        SelectItemKind::Value(v) => AstSelectItemKind::Literal(build_value(v)),
    };
    AstSelectItem {
        kind,
        alias: item.alias,
    }
}

fn build_emit(e: EmitClause) -> Emit {
    match e {
        EmitClause::AfterWindowClose(delay) => Emit::AfterWindowClose(delay.map(build_duration)),
        EmitClause::Periodic(d) => Emit::Periodic(build_duration(d)),
    }
}
