//! Schema synthesis: definitions to OpenAPI schema objects

use crate::config::GeneratorConfig;
use crate::definition::{Definition, EnumValue};
use crate::normalize::{normalize_type_text, TypeShape};
use crate::schema::{EnumSchema, ObjectSchema, PrimitiveType, SchemaObject};

/// Convert one definition
pub fn to_schema(definition: &Definition, config: &GeneratorConfig) -> SchemaObject {
    match definition {
        Definition::Structural { properties } => {
            let mut object = ObjectSchema::default();
            for (name, property) in properties {
                let shape = normalize_type_text(&property.type_text);
                object
                    .properties
                    .insert(name.clone(), shape_to_schema(&shape, config));
                if !property.optional {
                    object.required.push(name.clone());
                }
            }
            SchemaObject::Object(object)
        }
        Definition::Enumerated { values } => SchemaObject::Enum(EnumSchema {
            value_type: infer_enum_type(values),
            values: values.clone(),
        }),
    }
}

/// Schema for a normalized property type
pub fn shape_to_schema(shape: &TypeShape, config: &GeneratorConfig) -> SchemaObject {
    match shape {
        TypeShape::Primitive(primitive) => SchemaObject::Primitive(*primitive),
        TypeShape::Reference(name) => SchemaObject::reference(&config.schema.ref_prefix, name),
        TypeShape::Array(items) => SchemaObject::array(shape_to_schema(items, config)),
    }
}

/// Boolean if every value is a boolean, number if every value is a number,
/// string otherwise (including no values at all)
pub fn infer_enum_type(values: &[EnumValue]) -> PrimitiveType {
    if values.is_empty() {
        PrimitiveType::String
    } else if values.iter().all(|v| matches!(v, EnumValue::Boolean(_))) {
        PrimitiveType::Boolean
    } else if values.iter().all(|v| matches!(v, EnumValue::Number(_))) {
        PrimitiveType::Number
    } else {
        PrimitiveType::String
    }
}
