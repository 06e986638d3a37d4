use std::fmt;

/// A canonical logical table/collection name, or a raw identifier that
/// didn't match one of the reserved entity keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Entity {
    Devices,
    Flows,
    Traps,
    Connections,
    Logs,
    Interfaces,
    /// A raw identifier used verbatim, lower-cased only at translation time.
    Other(String),
}

impl Entity {
    /// Map a lexed, case-normalized entity keyword (or bare identifier) to
    /// its canonical tag. Keywords are matched case-insensitively; anything
    /// else becomes `Other` and keeps its original case.
    pub fn from_ident(ident: &str) -> Entity {
        match ident.to_ascii_lowercase().as_str() {
            "devices" => Entity::Devices,
            "flows" => Entity::Flows,
            "traps" => Entity::Traps,
            "connections" => Entity::Connections,
            "logs" => Entity::Logs,
            "interfaces" => Entity::Interfaces,
            _ => Entity::Other(ident.to_string()),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Devices => write!(f, "devices"),
            Entity::Flows => write!(f, "flows"),
            Entity::Traps => write!(f, "traps"),
            Entity::Connections => write!(f, "connections"),
            Entity::Logs => write!(f, "logs"),
            Entity::Interfaces => write!(f, "interfaces"),
            Entity::Other(name) => write!(f, "{name}"),
        }
    }
}
