//! Token-level parser (C2): one small combinator per grammar production in
//! `spec.md` §6, composed with `chumsky` 0.9 the way the teacher composes
//! `operator_compare`/`operator_logical` — named functions `or`-ed and
//! `then`-ed together rather than one monolithic combinator.

use chumsky::prelude::*;
use chumsky::Stream;
use itertools::Itertools;
use srql_ast::error::{Error, Errors, Reason};
use srql_ast::Span;

use crate::cst::{
    CmpOpTok, Cond, CountStmt, DataSource, DirectionTok, DurationLit, EmitClause, Expr,
    FieldRef, FindStmt, FuncArgs, JoinPart, JoinTypeTok, LogicalOpTok, OrderItem, SelectItem,
    SelectItemKind, ShowStmt, Stmt, StreamSource, StreamStmt, ValueLit, WindowFnTok,
};
use crate::lexer::{self, Keyword, Token, TokenKind};

type PErr = Simple<TokenKind>;

/// Lexes and parses `source` into a transient parse tree. A malformed token
/// anywhere aborts parsing with a single `Lex`-sourced error, matching
/// `Errors` first; otherwise syntax errors from the token parser are
/// converted and returned. The first error aborts parsing (§4.2).
pub fn parse(source: &str) -> Result<Stmt, Errors> {
    let tokens = lexer::lex(source);
    if let Some(error) = lex_error(&tokens) {
        log::debug!("lex error aborted parsing: {error:?}");
        return Err(error.into());
    }

    let len = source.chars().count();
    let stream = Stream::from_iter(
        len..len + 1,
        tokens.into_iter().map(|t| (t.kind, t.span.into())),
    );

    query().parse(stream).map_err(|errors| {
        log::debug!("parse errors: {errors:?}");
        Errors(errors.into_iter().map(convert_error).collect_vec())
    })
}

fn lex_error(tokens: &[Token]) -> Option<Error> {
    tokens.iter().find_map(|t| match &t.kind {
        TokenKind::Error(glyph) => Some(Error::lex(format!("unexpected glyph {glyph:?}"), t.span)),
        _ => None,
    })
}

fn convert_error(e: PErr) -> Error {
    let span: Span = e.span().into();

    let expected = e
        .expected()
        .filter_map(|t| t.as_ref().map(|tok| tok.to_string()))
        .collect_vec();
    let found = e.found().map(|t| t.to_string()).unwrap_or_default();

    if expected.is_empty() {
        Error::new(Reason::Unexpected { found })
    } else {
        Error::new(Reason::Expected {
            who: None,
            expected: expected.join(", "),
            found,
        })
    }
    .with_span(Some(span))
}

use srql_ast::WithErrorInfo;

// --- token primitives --------------------------------------------------

fn tok(kind: TokenKind) -> impl Parser<TokenKind, (), Error = PErr> + Clone {
    filter(move |t: &TokenKind| *t == kind).ignored()
}

fn kw(k: Keyword) -> impl Parser<TokenKind, (), Error = PErr> + Clone {
    filter(move |t: &TokenKind| matches!(t, TokenKind::Keyword(found) if *found == k)).ignored()
}

fn ident() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Ident(s) => Ok(s),
        found => Err(PErr::custom(span, format!("expected identifier, found {found}"))),
    })
}

fn int_lit() -> impl Parser<TokenKind, i64, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Integer(n) => Ok(n),
        found => Err(PErr::custom(span, format!("expected integer, found {found}"))),
    })
}

fn float_lit() -> impl Parser<TokenKind, f64, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Float(n) => Ok(n),
        found => Err(PErr::custom(span, format!("expected float, found {found}"))),
    })
}

fn str_lit() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Str(s) => Ok(s),
        found => Err(PErr::custom(span, format!("expected string, found {found}"))),
    })
}

fn bool_lit() -> impl Parser<TokenKind, bool, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Bool(b) => Ok(b),
        found => Err(PErr::custom(span, format!("expected boolean, found {found}"))),
    })
}

fn timestamp_lit() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Timestamp(s) => Ok(s),
        found => Err(PErr::custom(span, format!("expected timestamp, found {found}"))),
    })
}

fn ip_lit() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::IpAddr(s) => Ok(s),
        found => Err(PErr::custom(span, format!("expected IP address, found {found}"))),
    })
}

fn mac_lit() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::MacAddr(s) => Ok(s),
        found => Err(PErr::custom(span, format!("expected MAC address, found {found}"))),
    })
}

fn duration() -> impl Parser<TokenKind, DurationLit, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Duration(magnitude, unit) => Ok(DurationLit { magnitude, unit }),
        found => Err(PErr::custom(span, format!("expected duration, found {found}"))),
    })
}

fn value() -> impl Parser<TokenKind, ValueLit, Error = PErr> + Clone {
    str_lit()
        .map(ValueLit::Str)
        .or(float_lit().map(ValueLit::Float))
        .or(int_lit().map(ValueLit::Int))
        .or(bool_lit().map(ValueLit::Bool))
        .or(timestamp_lit().map(ValueLit::Timestamp))
        .or(ip_lit().map(ValueLit::IpAddr))
        .or(mac_lit().map(ValueLit::MacAddr))
}

/// One of the six reserved entity keywords, as its canonical lowercase name.
fn entity_keyword_text() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    filter_map(|span, t: TokenKind| match t {
        TokenKind::Keyword(Keyword::Devices) => Ok("devices".to_string()),
        TokenKind::Keyword(Keyword::Flows) => Ok("flows".to_string()),
        TokenKind::Keyword(Keyword::Traps) => Ok("traps".to_string()),
        TokenKind::Keyword(Keyword::Connections) => Ok("connections".to_string()),
        TokenKind::Keyword(Keyword::Logs) => Ok("logs".to_string()),
        TokenKind::Keyword(Keyword::Interfaces) => Ok("interfaces".to_string()),
        found => Err(PErr::custom(span, format!("expected entity name, found {found}"))),
    })
}

/// `entity` — strictly one of the reserved keywords (`showStmt`/`findStmt`/
/// `countStmt`'s target).
fn entity_strict() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    entity_keyword_text()
}

/// `entity | ID` — a data-source target that may also be a raw identifier.
fn entity_or_id() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    entity_keyword_text().or(ident())
}

/// A `funcCall`'s name. Plain `ID` covers almost every case, but `COUNT` is
/// also a reserved statement keyword (§4.1: a keyword always wins over `ID`
/// at the lexer), so `count(*)` in a select list needs its own allowance —
/// one of the grammar's contextual ambiguities called out in §1(a).
fn func_name() -> impl Parser<TokenKind, String, Error = PErr> + Clone {
    ident().or(kw(Keyword::Count).to("count".to_string()))
}

// --- field ---------------------------------------------------------------

/// `field := ID | entity '.' ID | entity '.' ID '.' ID`, longest match
/// first.
fn field() -> impl Parser<TokenKind, FieldRef, Error = PErr> + Clone {
    let dotted = entity_keyword_text()
        .then_ignore(tok(TokenKind::Dot))
        .then(ident())
        .then(tok(TokenKind::Dot).ignore_then(ident()).or_not())
        .map_with_span(|((entity, part2), part3), span| {
            let mut parts = vec![entity, part2];
            if let Some(part3) = part3 {
                parts.push(part3);
            }
            FieldRef {
                parts,
                span: span.into(),
            }
        });

    let bare = ident().map_with_span(|name, span| FieldRef {
        parts: vec![name],
        span: span.into(),
    });

    dotted.or(bare)
}

// --- operators -------------------------------------------------------------

fn cmp_op() -> impl Parser<TokenKind, CmpOpTok, Error = PErr> + Clone {
    tok(TokenKind::Neq)
        .to(CmpOpTok::Neq)
        .or(tok(TokenKind::Gte).to(CmpOpTok::Gte))
        .or(tok(TokenKind::Lte).to(CmpOpTok::Lte))
        .or(tok(TokenKind::Eq).to(CmpOpTok::Eq))
        .or(tok(TokenKind::Gt).to(CmpOpTok::Gt))
        .or(tok(TokenKind::Lt).to(CmpOpTok::Lt))
        .or(kw(Keyword::Like).to(CmpOpTok::Like))
}

fn logical_op() -> impl Parser<TokenKind, LogicalOpTok, Error = PErr> + Clone {
    kw(Keyword::And)
        .to(LogicalOpTok::And)
        .or(kw(Keyword::Or).to(LogicalOpTok::Or))
}

fn join_type() -> impl Parser<TokenKind, JoinTypeTok, Error = PErr> + Clone {
    kw(Keyword::Left)
        .to(JoinTypeTok::Left)
        .or(kw(Keyword::Right).to(JoinTypeTok::Right))
        .or(kw(Keyword::Inner).to(JoinTypeTok::Inner))
}

fn direction() -> impl Parser<TokenKind, DirectionTok, Error = PErr> + Clone {
    kw(Keyword::Asc)
        .to(DirectionTok::Asc)
        .or(kw(Keyword::Desc).to(DirectionTok::Desc))
}

fn window_fn() -> impl Parser<TokenKind, WindowFnTok, Error = PErr> + Clone {
    kw(Keyword::Tumble)
        .to(WindowFnTok::Tumble)
        .or(kw(Keyword::Hop).to(WindowFnTok::Hop))
}

// --- expr / cond -----------------------------------------------------------

enum ExprSuffix {
    Simple(CmpOpTok, ValueLit),
    In(Vec<ValueLit>),
    Contains(String),
    Between(ValueLit, ValueLit),
    IsNull(bool),
}

fn expr_suffix() -> impl Parser<TokenKind, ExprSuffix, Error = PErr> + Clone {
    let simple = cmp_op().then(value()).map(|(op, v)| ExprSuffix::Simple(op, v));

    let in_list = kw(Keyword::In)
        .ignore_then(tok(TokenKind::LParen))
        .ignore_then(value().separated_by(tok(TokenKind::Comma)).at_least(1))
        .then_ignore(tok(TokenKind::RParen))
        .map(ExprSuffix::In);

    let contains = kw(Keyword::Contains)
        .ignore_then(str_lit())
        .map(ExprSuffix::Contains);

    let between = kw(Keyword::Between)
        .ignore_then(value())
        .then_ignore(kw(Keyword::And))
        .then(value())
        .map(|(lo, hi)| ExprSuffix::Between(lo, hi));

    let is_null = kw(Keyword::Is)
        .ignore_then(kw(Keyword::Not).or_not())
        .then_ignore(kw(Keyword::Null))
        .map(|negated| ExprSuffix::IsNull(negated.is_some()));

    simple.or(in_list).or(contains).or(between).or(is_null)
}

fn field_expr() -> impl Parser<TokenKind, Expr, Error = PErr> + Clone {
    field().then(expr_suffix()).map(|(field, suffix)| match suffix {
        ExprSuffix::Simple(op, operand) => Expr::Simple {
            field,
            op,
            value: operand,
        },
        ExprSuffix::In(values) => Expr::In { field, values },
        ExprSuffix::Contains(value) => Expr::Contains { field, value },
        ExprSuffix::Between(lo, hi) => Expr::Between { field, lo, hi },
        ExprSuffix::IsNull(negated) => Expr::IsNull { field, negated },
    })
}

/// `cond := expr (logicalOp expr)*`, where `expr`'s `'(' cond ')'`
/// alternative recurses back into this same production.
fn cond() -> impl Parser<TokenKind, Cond, Error = PErr> + Clone {
    recursive(|cond| {
        let group = tok(TokenKind::LParen)
            .ignore_then(cond)
            .then_ignore(tok(TokenKind::RParen))
            .map(Expr::Group);

        let expr = field_expr().or(group);

        expr.clone()
            .then(logical_op().then(expr).repeated())
            .map(|(first, rest)| {
                let mut children = vec![first];
                let mut logical_link = Vec::new();
                for (op, next) in rest {
                    logical_link.push(op);
                    children.push(next);
                }
                Cond {
                    children,
                    logical_link,
                }
            })
    })
}

// --- select list -----------------------------------------------------------

fn select_item() -> impl Parser<TokenKind, SelectItem, Error = PErr> + Clone {
    recursive(|select_item| {
        let arg_list = select_item
            .clone()
            .separated_by(tok(TokenKind::Comma))
            .at_least(1);

        let func_call = func_name()
            .then_ignore(tok(TokenKind::LParen))
            .then(
                tok(TokenKind::Star)
                    .to(FuncArgs::Star)
                    .or(arg_list.map(FuncArgs::Args))
                    .or_not()
                    .map(|args| args.unwrap_or(FuncArgs::Args(Vec::new()))),
            )
            .then_ignore(tok(TokenKind::RParen))
            .map(|(name, args)| SelectItemKind::FuncCall { name, args });

        let field_ref = field().map(SelectItemKind::Field);
        let value_lit = value().map(SelectItemKind::Value);

        func_call
            .or(field_ref)
            .or(value_lit)
            .then(kw(Keyword::As).ignore_then(ident()).or_not())
            .map(|(kind, alias)| SelectItem { kind, alias })
    })
}

fn select_list() -> impl Parser<TokenKind, Vec<SelectItem>, Error = PErr> + Clone {
    select_item().separated_by(tok(TokenKind::Comma)).at_least(1)
}

/// `selectList := selectItem (',' selectItem)* | '*'`. `None` means the
/// surface form was a bare `*`.
fn select_clause() -> impl Parser<TokenKind, Option<Vec<SelectItem>>, Error = PErr> + Clone {
    tok(TokenKind::Star)
        .to(None)
        .or(select_list().map(Some))
}

/// The optional `selectList` directly after `STREAM`. Both omitting it and
/// writing a bare `*` mean "all columns" (§4.3), so both collapse to `None`.
fn select_clause_opt() -> impl Parser<TokenKind, Option<Vec<SelectItem>>, Error = PErr> + Clone {
    select_clause().or_not().map(Option::flatten)
}

// --- data sources ------------------------------------------------------------

fn stream_source() -> impl Parser<TokenKind, StreamSource, Error = PErr> + Clone {
    let windowed = window_fn()
        .then_ignore(tok(TokenKind::LParen))
        .then(entity_or_id())
        .then_ignore(tok(TokenKind::Comma))
        .then(field())
        .then_ignore(tok(TokenKind::Comma))
        .then(duration())
        .then(tok(TokenKind::Comma).ignore_then(duration()).or_not())
        .then_ignore(tok(TokenKind::RParen))
        .map(|((((func, inner), time_field), size), advance)| StreamSource::Windowed {
            func,
            inner,
            time_field,
            size,
            advance,
        });

    let table = kw(Keyword::Table)
        .ignore_then(tok(TokenKind::LParen))
        .ignore_then(entity_or_id())
        .then_ignore(tok(TokenKind::RParen))
        .map(StreamSource::Table);

    let bare = entity_or_id().map(StreamSource::Bare);

    windowed.or(table).or(bare)
}

fn data_source() -> impl Parser<TokenKind, DataSource, Error = PErr> + Clone {
    stream_source()
        .then(kw(Keyword::As).ignore_then(ident()).or_not())
        .map(|(source, alias)| DataSource { source, alias })
}

fn join_part() -> impl Parser<TokenKind, JoinPart, Error = PErr> + Clone {
    join_type()
        .or_not()
        .then_ignore(kw(Keyword::Join))
        .then(data_source())
        .then_ignore(kw(Keyword::On))
        .then(cond())
        .map(|((join_type, data_source), on)| JoinPart {
            join_type,
            data_source,
            on,
        })
}

// --- order by / limit / emit -------------------------------------------------

fn order_item() -> impl Parser<TokenKind, OrderItem, Error = PErr> + Clone {
    field()
        .then(direction().or_not())
        .map(|(field, direction)| OrderItem { field, direction })
}

fn order_by_clause() -> impl Parser<TokenKind, Vec<OrderItem>, Error = PErr> + Clone {
    kw(Keyword::Order)
        .ignore_then(kw(Keyword::By))
        .ignore_then(order_item().separated_by(tok(TokenKind::Comma)).at_least(1))
}

fn limit_clause() -> impl Parser<TokenKind, u64, Error = PErr> + Clone {
    kw(Keyword::Limit).ignore_then(int_lit().try_map(|n, span| {
        u64::try_from(n).map_err(|_| PErr::custom(span, "LIMIT must not be negative"))
    }))
}

fn emit_clause() -> impl Parser<TokenKind, EmitClause, Error = PErr> + Clone {
    let after_window_close = kw(Keyword::After)
        .ignore_then(kw(Keyword::Window))
        .ignore_then(kw(Keyword::Close))
        .ignore_then(
            kw(Keyword::With)
                .ignore_then(kw(Keyword::Delay))
                .ignore_then(duration())
                .or_not(),
        )
        .map(EmitClause::AfterWindowClose);

    let periodic = kw(Keyword::Periodic)
        .ignore_then(duration())
        .map(EmitClause::Periodic);

    kw(Keyword::Emit).ignore_then(after_window_close.or(periodic))
}

// --- statements ---------------------------------------------------------------

fn show_stmt() -> impl Parser<TokenKind, ShowStmt, Error = PErr> + Clone {
    kw(Keyword::Show)
        .ignore_then(entity_strict())
        .then(kw(Keyword::Where).ignore_then(cond()).or_not())
        .then(order_by_clause().or_not())
        .then(limit_clause().or_not())
        .then(kw(Keyword::Latest).or_not())
        .map(|((((entity, cond), order_by), limit), latest)| ShowStmt {
            entity,
            cond,
            order_by: order_by.unwrap_or_default(),
            limit,
            latest: latest.is_some(),
        })
}

fn find_stmt() -> impl Parser<TokenKind, FindStmt, Error = PErr> + Clone {
    kw(Keyword::Find)
        .ignore_then(entity_strict())
        .then(kw(Keyword::Where).ignore_then(cond()).or_not())
        .then(order_by_clause().or_not())
        .then(limit_clause().or_not())
        .then(kw(Keyword::Latest).or_not())
        .map(|((((entity, cond), order_by), limit), latest)| FindStmt {
            entity,
            cond,
            order_by: order_by.unwrap_or_default(),
            limit,
            latest: latest.is_some(),
        })
}

fn count_stmt() -> impl Parser<TokenKind, CountStmt, Error = PErr> + Clone {
    kw(Keyword::Count)
        .ignore_then(entity_strict())
        .then(kw(Keyword::Where).ignore_then(cond()).or_not())
        .map(|(entity, cond)| CountStmt { entity, cond })
}

fn group_by_clause() -> impl Parser<TokenKind, Vec<FieldRef>, Error = PErr> + Clone {
    kw(Keyword::Group)
        .ignore_then(kw(Keyword::By))
        .ignore_then(field().separated_by(tok(TokenKind::Comma)).at_least(1))
}

fn stream_stmt() -> impl Parser<TokenKind, StreamStmt, Error = PErr> + Clone {
    kw(Keyword::Stream)
        .ignore_then(select_clause_opt())
        .then_ignore(kw(Keyword::From))
        .then(data_source())
        .then(join_part().repeated())
        .then(kw(Keyword::Where).ignore_then(cond()).or_not())
        .then(group_by_clause().or_not())
        .then(kw(Keyword::Having).ignore_then(cond()).or_not())
        .then(order_by_clause().or_not())
        .then(limit_clause().or_not())
        .then(emit_clause().or_not())
        .map(
            |((((((((select, data_source), joins), cond), group_by), having), order_by), limit), emit)| {
                StreamStmt {
                    select,
                    data_source,
                    joins,
                    cond,
                    group_by: group_by.unwrap_or_default(),
                    having,
                    order_by: order_by.unwrap_or_default(),
                    limit,
                    emit,
                }
            },
        )
}

/// `query := showStmt | findStmt | countStmt | streamStmt`, dispatching on
/// the leading keyword (§4.2).
fn query() -> impl Parser<TokenKind, Stmt, Error = PErr> {
    show_stmt()
        .map(Stmt::Show)
        .or(find_stmt().map(Stmt::Find))
        .or(count_stmt().map(Stmt::Count))
        .or(stream_stmt().map(Stmt::Stream))
        .then_ignore(end())
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_ok(source: &str) -> Stmt {
        parse(source).unwrap_or_else(|e| panic!("expected {source:?} to parse, got {e}"))
    }

    #[test]
    fn parses_bare_show() {
        let stmt = parse_ok("show devices");
        match stmt {
            Stmt::Show(s) => {
                assert_eq!(s.entity, "devices");
                assert!(s.cond.is_none());
            }
            other => panic!("expected Show, got {other:?}"),
        }
    }

    #[test]
    fn parses_find_with_filter_order_and_limit() {
        let stmt = parse_ok("find flows where bytes > 1000 order by ts desc limit 10");
        let Stmt::Find(s) = stmt else {
            panic!("expected Find")
        };
        assert_eq!(s.entity, "flows");
        assert_eq!(s.limit, Some(10));
        assert_eq!(s.order_by.len(), 1);
        assert_eq!(s.order_by[0].direction, Some(DirectionTok::Desc));
        let cond = s.cond.unwrap();
        assert_eq!(cond.children.len(), 1);
    }

    #[test]
    fn parses_count_with_in_list() {
        let stmt = parse_ok("count traps where severity in (1, 2, 3)");
        let Stmt::Count(s) = stmt else {
            panic!("expected Count")
        };
        let cond = s.cond.unwrap();
        assert!(matches!(cond.children[0], Expr::In { .. }));
    }

    #[test]
    fn parses_grouped_conditions() {
        let stmt = parse_ok("show devices where (a = 1 or b = 2) and c = 3");
        let Stmt::Show(s) = stmt else {
            panic!("expected Show")
        };
        let cond = s.cond.unwrap();
        assert_eq!(cond.children.len(), 2);
        assert!(matches!(cond.children[0], Expr::Group(_)));
        assert_eq!(cond.logical_link, vec![LogicalOpTok::And]);
    }

    #[test]
    fn parses_stream_with_tumble_and_emit() {
        let stmt = parse_ok(
            "stream * from tumble(flows, ts, 60s) group by src emit after window close",
        );
        let Stmt::Stream(s) = stmt else {
            panic!("expected Stream")
        };
        assert!(s.select.is_none());
        assert!(matches!(s.data_source.source, StreamSource::Windowed { .. }));
        assert_eq!(s.group_by.len(), 1);
        assert!(matches!(s.emit, Some(EmitClause::AfterWindowClose(None))));
    }

    #[test]
    fn parses_count_star_function_call() {
        let stmt = parse_ok("stream count(*) from flows");
        let Stmt::Stream(s) = stmt else {
            panic!("expected Stream")
        };
        let select = s.select.unwrap();
        assert_eq!(select.len(), 1);
        assert!(matches!(
            select[0].kind,
            SelectItemKind::FuncCall {
                args: FuncArgs::Star,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_leading_keyword() {
        assert!(parse("delete devices").is_err());
    }

    #[test]
    fn reports_lex_error_for_unterminated_string() {
        let err = parse("show devices where hostname = 'unterminated").unwrap_err();
        assert!(!err.0.is_empty());
    }

    #[test]
    fn reports_lex_error_instead_of_panicking_on_integer_overflow() {
        let err = parse("show devices where bytes = 99999999999999999999").unwrap_err();
        assert!(!err.0.is_empty());
    }

    #[test]
    fn keyword_casing_does_not_affect_parse_tree_shape() {
        let lower = parse_ok("show devices");
        let upper = parse_ok("SHOW DEVICES");
        assert_eq!(lower, upper);
    }
}
