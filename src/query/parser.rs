use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Qualifier name (lower-cased) to its values, in order of appearance.
pub type QualifierMap = BTreeMap<String, Vec<String>>;

static QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+):(?:"([^"]+)"|(\S+))"#).unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub qualifiers: QualifierMap,
    /// The prompt with every qualifier token removed, whitespace collapsed.
    pub remaining: String,
}

impl ParsedQuery {
    pub fn has_qualifiers(&self) -> bool {
        !self.qualifiers.is_empty()
    }

    pub fn values(&self, qualifier: &str) -> &[String] {
        self.qualifiers
            .get(qualifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn parse(query: &str) -> ParsedQuery {
    if query.trim().is_empty() {
        return ParsedQuery::default();
    }

    let mut qualifiers = QualifierMap::new();
    let mut leftover = String::with_capacity(query.len());
    let mut cursor = 0;

    for caps in QUALIFIER_RE.captures_iter(query) {
        let Some(token) = caps.get(0) else { continue };
        let name = caps[1].to_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        tracing::trace!("Captured qualifier {}={}", name, value);
        qualifiers.entry(name).or_default().push(value);

        // Keep a separator so "a:b" glued to text never fuses the neighbours.
        leftover.push_str(&query[cursor..token.start()]);
        leftover.push(' ');
        cursor = token.end();
    }
    leftover.push_str(&query[cursor..]);

    let remaining = leftover.split_whitespace().collect::<Vec<_>>().join(" ");

    tracing::debug!(
        "Parsed query '{}' into {} qualifier(s), remaining '{}'",
        query,
        qualifiers.len(),
        remaining
    );

    ParsedQuery {
        qualifiers,
        remaining,
    }
}
