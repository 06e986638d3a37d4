use crate::error::Error;

/// A column reference: `col`, `entity.col`, or `entity.sub.col`.
///
/// `parts` is always non-empty and at most 3 elements long; `Field::new`
/// is the only way to build one, so the invariant can't be violated from
/// outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    parts: Vec<String>,
}

impl Field {
    pub fn new(parts: Vec<String>) -> Result<Field, Error> {
        if parts.is_empty() || parts.len() > 3 {
            return Err(Error::new_simple(format!(
                "a field must have between 1 and 3 parts, got {}",
                parts.len()
            )));
        }
        Ok(Field { parts })
    }

    pub fn bare(name: impl Into<String>) -> Field {
        Field {
            parts: vec![name.into()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        false // enforced non-empty by `new`
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_empty_and_overlong() {
        assert!(Field::new(vec![]).is_err());
        assert!(Field::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]).is_err());
    }

    #[test]
    fn accepts_one_two_three_parts() {
        assert_eq!(Field::new(vec!["bytes".into()]).unwrap().len(), 1);
        assert_eq!(
            Field::new(vec!["flows".into(), "bytes".into()]).unwrap().len(),
            2
        );
        assert_eq!(
            Field::new(vec!["flows".into(), "meta".into(), "bytes".into()])
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn displays_dotted() {
        let f = Field::new(vec!["flows".into(), "bytes".into()]).unwrap();
        assert_eq!(f.to_string(), "flows.bytes");
    }
}
