//! OpenAPI schema object algebra

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::definition::EnumValue;

/// Output document: type name to schema, in definition order
pub type SchemaDocument = IndexMap<String, SchemaObject>;

/// JSON Schema primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
}

impl PrimitiveType {
    /// Match a TypeScript primitive keyword
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "boolean" => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
        }
    }
}

/// A single schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaObject {
    /// `{"type": "string"}`
    Primitive(PrimitiveType),
    /// `{"$ref": "#/components/schemas/Name"}`, holding the full ref string
    Reference(String),
    /// `{"type": "array", "items": ...}`
    Array(Box<SchemaObject>),
    Object(ObjectSchema),
    Enum(EnumSchema),
}

/// `{"type": "object", "properties": ..., "required": [...]}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaObject>,
    /// Serialized only when non-empty
    pub required: Vec<String>,
}

/// `{"type": ..., "enum": [...]}`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub value_type: PrimitiveType,
    pub values: Vec<EnumValue>,
}

impl SchemaObject {
    pub fn reference(prefix: &str, name: &str) -> Self {
        SchemaObject::Reference(format!("{prefix}{name}"))
    }

    pub fn array(items: SchemaObject) -> Self {
        SchemaObject::Array(Box::new(items))
    }

    /// Target of a `$ref` schema
    pub fn ref_path(&self) -> Option<&str> {
        match self {
            SchemaObject::Reference(path) => Some(path),
            _ => None,
        }
    }
}

impl Serialize for SchemaObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaObject::Primitive(primitive) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", primitive)?;
                map.end()
            }
            SchemaObject::Reference(path) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$ref", path)?;
                map.end()
            }
            SchemaObject::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            SchemaObject::Object(object) => object.serialize(serializer),
            SchemaObject::Enum(schema) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &schema.value_type)?;
                map.serialize_entry("enum", &schema.values)?;
                map.end()
            }
        }
    }
}

impl Serialize for ObjectSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.required.is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &self.properties)?;
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        map.end()
    }
}
