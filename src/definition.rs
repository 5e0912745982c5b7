//! Intermediate model of named TypeScript definitions

use indexmap::IndexMap;
use serde::Serialize;

use crate::parser::ast::Literal;

/// Every extracted definition, in first-declaration order
pub type DefinitionsMap = IndexMap<String, Definition>;

/// A named type as the synthesizer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    /// Named properties with their raw type text
    Structural {
        properties: IndexMap<String, Property>,
    },
    /// A fixed set of literal values
    Enumerated { values: Vec<EnumValue> },
}

/// One property of a structural definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Type annotation exactly as written
    pub type_text: String,
    pub optional: bool,
}

/// A single enumerated value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumValue {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

impl Definition {
    /// Empty structural definition
    pub fn empty() -> Self {
        Definition::Structural {
            properties: IndexMap::new(),
        }
    }

    /// Build a structural definition from `(name, type_text)` pairs, where a
    /// trailing `?` on the name marks the property optional
    pub fn structural<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let properties = entries
            .into_iter()
            .map(|(name, type_text)| {
                let (name, optional) = split_optional_marker(name);
                (
                    name.to_string(),
                    Property {
                        type_text: type_text.to_string(),
                        optional,
                    },
                )
            })
            .collect();
        Definition::Structural { properties }
    }

    /// Build an enumerated definition from string values
    pub fn enumerated<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Definition::Enumerated {
            values: values.into_iter().map(EnumValue::from).collect(),
        }
    }

    pub fn properties(&self) -> Option<&IndexMap<String, Property>> {
        match self {
            Definition::Structural { properties } => Some(properties),
            Definition::Enumerated { .. } => None,
        }
    }
}

/// Split a `name?` key into its name and optional flag
pub fn split_optional_marker(key: &str) -> (&str, bool) {
    match key.strip_suffix('?') {
        Some(name) => (name, true),
        None => (key, false),
    }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        EnumValue::String(value.to_string())
    }
}

impl From<&Literal> for EnumValue {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::String(s) => EnumValue::String(s.clone()),
            Literal::Boolean(b) => EnumValue::Boolean(*b),
            Literal::Number(raw) => parse_number(raw)
                .map(EnumValue::Number)
                .unwrap_or_else(|| EnumValue::String(raw.clone())),
        }
    }
}

/// Decimal integers and floats; hex, bigint and separated forms stay text
fn parse_number(raw: &str) -> Option<serde_json::Number> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
}
