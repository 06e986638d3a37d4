use enum_as_inner::EnumAsInner;

/// A literal value as it appeared in the query text. The translator formats
/// these verbatim; it never re-validates an IP, MAC, or timestamp literal.
#[derive(Debug, EnumAsInner, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    #[serde(with = "float_bits")]
    Float(f64),
    Bool(bool),
    /// ISO-8601 timestamp text, e.g. `2024-01-02T03:04:05Z`.
    Timestamp(String),
    IpAddr(String),
    MacAddr(String),
}

// `f64` doesn't round-trip through JSON losslessly for NaN/inf, which never
// occur here, but deriving `Serialize` on a bare `f64` is fine; this module
// exists only so a future change to store `f64` differently doesn't need to
// touch every call site.
mod float_bits {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        serde::Deserialize::deserialize(d)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(t) | Value::IpAddr(t) | Value::MacAddr(t) => write!(f, "{t}"),
        }
    }
}
