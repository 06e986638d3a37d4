//! Tokenizer (C1): turns SRQL source text into a flat stream of `Token`s.
//!
//! Implemented with `chumsky` 0.9 character-level combinators rather than
//! the newer `Input`-based lexer, since SRQL's lexical grammar is small
//! enough that hand-tuned `filter`/`repeated` chains stay readable.
#![allow(clippy::upper_case_acronyms)]

use chumsky::prelude::*;
use srql_ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Show,
    Find,
    Count,
    Stream,
    From,
    Where,
    Order,
    By,
    Limit,
    Latest,
    Asc,
    Desc,
    And,
    Or,
    In,
    Between,
    Contains,
    Is,
    Not,
    Null,
    Devices,
    Flows,
    Traps,
    Connections,
    Logs,
    Interfaces,
    Table,
    Tumble,
    Hop,
    Group,
    Having,
    Emit,
    After,
    Window,
    Close,
    With,
    Delay,
    Periodic,
    Join,
    On,
    As,
    Left,
    Right,
    Inner,
    Like,
}

impl Keyword {
    /// Matches a lower-cased identifier against the reserved word table.
    /// A reserved keyword always wins over a plain `ID` (§4.1).
    fn from_lowercase(word: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match word {
            "show" => Show,
            "find" => Find,
            "count" => Count,
            "stream" => Stream,
            "from" => From,
            "where" => Where,
            "order" => Order,
            "by" => By,
            "limit" => Limit,
            "latest" => Latest,
            "asc" => Asc,
            "desc" => Desc,
            "and" => And,
            "or" => Or,
            "in" => In,
            "between" => Between,
            "contains" => Contains,
            "is" => Is,
            "not" => Not,
            "null" => Null,
            "devices" => Devices,
            "flows" => Flows,
            "traps" => Traps,
            "connections" => Connections,
            "logs" => Logs,
            "interfaces" => Interfaces,
            "table" => Table,
            "tumble" => Tumble,
            "hop" => Hop,
            "group" => Group,
            "having" => Having,
            "emit" => Emit,
            "after" => After,
            "window" => Window,
            "close" => Close,
            "with" => With,
            "delay" => Delay,
            "periodic" => Periodic,
            "join" => Join,
            "on" => On,
            "as" => As,
            "left" => Left,
            "right" => Right,
            "inner" => Inner,
            "like" => Like,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident(String),
    Integer(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Timestamp(String),
    IpAddr(String),
    MacAddr(String),
    /// An integer magnitude directly followed (no whitespace) by one of
    /// `s`/`m`/`h`/`d`, e.g. `60s`. Lexed as a single token because the unit
    /// letter is only ever meaningful glued to its digits (§4.1).
    Duration(u32, char),
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Dot,
    Comma,
    LParen,
    RParen,
    Star,
    /// A malformed token (unterminated string, invalid escape, unknown
    /// glyph). Lexing resumes after it rather than aborting.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "{k:?}"),
            TokenKind::Ident(s) => write!(f, "`{s}`"),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Float(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "'{s}'"),
            TokenKind::Bool(b) => write!(f, "{b}"),
            TokenKind::Timestamp(s) => write!(f, "{s}"),
            TokenKind::IpAddr(s) => write!(f, "{s}"),
            TokenKind::MacAddr(s) => write!(f, "{s}"),
            TokenKind::Duration(n, u) => write!(f, "{n}{u}"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Neq => write!(f, "!="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Gte => write!(f, ">="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Lte => write!(f, "<="),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Error(s) => write!(f, "{s}"),
        }
    }
}

impl std::hash::Hash for TokenKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
    }
}
impl Eq for TokenKind {}

/// Lexes `source`, always returning a token vector (malformed spans become
/// `TokenKind::Error` rather than aborting, per §4.1).
pub fn lex(source: &str) -> Vec<Token> {
    let len = source.chars().count();
    let tokens = match token()
        .padded_by(whitespace())
        .repeated()
        .then_ignore(end())
        .parse(source)
    {
        Ok(tokens) => tokens,
        // `token()` itself never fails on well-formed UTF-8 since `glyph_error`
        // is the catch-all fallback; this arm only guards against the
        // combinator's own internal `end()`-style bookkeeping.
        Err(_) => vec![Token {
            kind: TokenKind::Error(source.to_string()),
            span: Span::new(0, len),
        }],
    };
    log::trace!("lexed {} tokens from {} chars of source", tokens.len(), len);
    tokens
}

fn whitespace() -> impl Parser<char, (), Error = Simple<char>> {
    filter(|c: &char| c.is_whitespace()).repeated().ignored()
}

fn token() -> impl Parser<char, Token, Error = Simple<char>> {
    // `mac_addr` before `ip_addr`: a six-group `xx:xx:xx:xx:xx:xx` address is
    // also a syntactically valid (if unusual) IPv6 literal under `ip_addr`'s
    // more permissive group-count rule, so the more specific parser has to
    // run first.
    timestamp()
        .or(mac_addr())
        .or(ip_addr())
        .or(number())
        .or(string())
        .or(punctuation())
        .or(word())
        .or(glyph_error())
        .map_with_span(|kind, span: std::ops::Range<usize>| Token {
            kind,
            span: span.into(),
        })
}

fn hex_digit() -> impl Parser<char, char, Error = Simple<char>> {
    filter(|c: &char| c.is_ascii_hexdigit())
}

fn digits(n: usize) -> impl Parser<char, String, Error = Simple<char>> {
    filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .exactly(n)
        .collect()
}

/// `YYYY-MM-DDThh:mm:ss` with an optional trailing `Z`.
fn timestamp() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    digits(4)
        .then_ignore(just('-'))
        .then(digits(2))
        .then_ignore(just('-'))
        .then(digits(2))
        .then_ignore(just('T'))
        .then(digits(2))
        .then_ignore(just(':'))
        .then(digits(2))
        .then_ignore(just(':'))
        .then(digits(2))
        .then(just('Z').or_not())
        .map(|((((((y, mo), d), h), mi), s), z)| {
            let mut out = format!("{y}-{mo}-{d}T{h}:{mi}:{s}");
            if z.is_some() {
                out.push('Z');
            }
            TokenKind::Timestamp(out)
        })
}

/// IPv4 (`a.b.c.d`) or IPv6 (colon-separated hex groups). Does not accept
/// the `::` zero-group abbreviation; out of scope for the surface grammar's
/// single-token IP literal.
fn ip_addr() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    let octet = filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .at_most(3)
        .collect::<String>();

    let v4 = octet
        .clone()
        .then_ignore(just('.'))
        .then(octet.clone())
        .then_ignore(just('.'))
        .then(octet.clone())
        .then_ignore(just('.'))
        .then(octet)
        .map(|(((a, b), c), d)| format!("{a}.{b}.{c}.{d}"));

    let v6_group = hex_digit().repeated().at_least(1).at_most(4).collect::<String>();
    let v6 = v6_group
        .clone()
        .chain::<String, _, _>(just(':').ignore_then(v6_group).repeated().at_least(2))
        .map(|parts: Vec<String>| parts.join(":"));

    v4.or(v6).map(TokenKind::IpAddr)
}

/// Six colon-separated two-digit hex octets.
fn mac_addr() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    let octet = hex_digit().repeated().exactly(2).collect::<String>();
    octet
        .clone()
        .then_ignore(just(':'))
        .then(octet.clone())
        .then_ignore(just(':'))
        .then(octet.clone())
        .then_ignore(just(':'))
        .then(octet.clone())
        .then_ignore(just(':'))
        .then(octet.clone())
        .then_ignore(just(':'))
        .then(octet)
        .map(|(((((a, b), c), d), e), f)| TokenKind::MacAddr(format!("{a}:{b}:{c}:{d}:{e}:{f}")))
}

fn number() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    let int_part = filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>();

    let float = int_part
        .clone()
        .then_ignore(just('.'))
        .then(int_part.clone())
        .map(|(i, f)| TokenKind::Float(format!("{i}.{f}").parse().unwrap()));

    // `INTEGER = [0-9]+` has no length bound, so the digit run can overflow
    // `u32`/`i64` (e.g. `60000000000s`, `99999999999999999999`); fall back to
    // an `Error` token instead of panicking, same as `glyph_error`'s recovery.
    let duration = int_part.clone().then(one_of("smhd")).map(|(magnitude, unit)| {
        match magnitude.parse() {
            Ok(magnitude) => TokenKind::Duration(magnitude, unit),
            Err(_) => TokenKind::Error(format!("{magnitude}{unit}")),
        }
    });

    let int = int_part.map(|i| match i.parse() {
        Ok(i) => TokenKind::Integer(i),
        Err(_) => TokenKind::Error(i),
    });

    float.or(duration).or(int)
}

fn string() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    let escape = just('\\').ignore_then(just('\\').or(just('\'')).or(just('"')));

    let single = just('\'')
        .ignore_then(filter(|c| *c != '\\' && *c != '\'').or(escape.clone()).repeated())
        .then_ignore(just('\''))
        .collect::<String>();

    let double = just('"')
        .ignore_then(filter(|c| *c != '\\' && *c != '"').or(escape).repeated())
        .then_ignore(just('"'))
        .collect::<String>();

    single.or(double).map(TokenKind::Str)
}

fn punctuation() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    just("!=")
        .to(TokenKind::Neq)
        .or(just(">=").to(TokenKind::Gte))
        .or(just("<=").to(TokenKind::Lte))
        .or(just('=').to(TokenKind::Eq))
        .or(just('>').to(TokenKind::Gt))
        .or(just('<').to(TokenKind::Lt))
        .or(just('.').to(TokenKind::Dot))
        .or(just(',').to(TokenKind::Comma))
        .or(just('(').to(TokenKind::LParen))
        .or(just(')').to(TokenKind::RParen))
        .or(just('*').to(TokenKind::Star))
}

fn word() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .map(Some)
        .chain::<char, Vec<_>, _>(
            filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated(),
        )
        .collect::<String>()
        .map(|word| {
            if word == "true" {
                TokenKind::Bool(true)
            } else if word == "false" {
                TokenKind::Bool(false)
            } else if let Some(kw) = Keyword::from_lowercase(&word.to_ascii_lowercase()) {
                TokenKind::Keyword(kw)
            } else {
                TokenKind::Ident(word)
            }
        })
}

fn glyph_error() -> impl Parser<char, TokenKind, Error = Simple<char>> {
    any().map(|c: char| TokenKind::Error(c.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_case_insensitively() {
        assert_eq!(
            kinds("SHOW devices"),
            vec![
                TokenKind::Keyword(Keyword::Show),
                TokenKind::Keyword(Keyword::Devices)
            ]
        );
    }

    #[test]
    fn duration_unit_only_binds_directly_after_digits() {
        assert_eq!(kinds("60s"), vec![TokenKind::Duration(60, 's')]);
        assert_eq!(
            kinds("60 seconds"),
            vec![TokenKind::Integer(60), TokenKind::Ident("seconds".into())]
        );
    }

    #[test]
    fn lexes_string_with_escapes() {
        assert_eq!(
            kinds(r"'it\'s'"),
            vec![TokenKind::Str("it's".to_string())]
        );
    }

    #[test]
    fn lexes_comparison_operators_longest_match_first() {
        assert_eq!(
            kinds(">= > <= < != ="),
            vec![
                TokenKind::Gte,
                TokenKind::Gt,
                TokenKind::Lte,
                TokenKind::Lt,
                TokenKind::Neq,
                TokenKind::Eq,
            ]
        );
    }

    #[test]
    fn lexes_ipv4_and_mac() {
        assert_eq!(
            kinds("192.168.1.1"),
            vec![TokenKind::IpAddr("192.168.1.1".to_string())]
        );
        assert_eq!(
            kinds("aa:bb:cc:dd:ee:ff"),
            vec![TokenKind::MacAddr("aa:bb:cc:dd:ee:ff".to_string())]
        );
    }

    #[test]
    fn lexes_timestamp() {
        assert_eq!(
            kinds("2024-01-02T03:04:05Z"),
            vec![TokenKind::Timestamp("2024-01-02T03:04:05Z".to_string())]
        );
    }

    #[test]
    fn overlong_integer_becomes_error_token_instead_of_panicking() {
        assert_eq!(
            kinds("99999999999999999999"),
            vec![TokenKind::Error("99999999999999999999".to_string())]
        );
    }

    #[test]
    fn overlong_duration_magnitude_becomes_error_token_instead_of_panicking() {
        assert_eq!(
            kinds("60000000000000s"),
            vec![TokenKind::Error("60000000000000s".to_string())]
        );
    }

    #[test]
    fn unknown_glyph_becomes_error_token_and_lexing_continues() {
        let kinds = kinds("show @ devices");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Show),
                TokenKind::Error("@".to_string()),
                TokenKind::Keyword(Keyword::Devices),
            ]
        );
    }
}
