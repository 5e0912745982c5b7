//! Array-reference dereferencing
//!
//! Final pass over a document: any `$ref` whose target ends in `[]` becomes
//! an array schema whose items reference the bare target. Object properties
//! and array items are rewritten recursively; everything else passes through.

use crate::schema::{ObjectSchema, SchemaDocument, SchemaObject};

const ARRAY_MARKER: &str = "[]";

/// Rewrite array references throughout a document
pub fn dereference_arrays(document: SchemaDocument) -> SchemaDocument {
    document
        .into_iter()
        .map(|(name, schema)| (name, dereference_schema(schema)))
        .collect()
}

/// Rewrite array references in a single schema
pub fn dereference_schema(schema: SchemaObject) -> SchemaObject {
    match schema {
        SchemaObject::Reference(path) => match path.strip_suffix(ARRAY_MARKER) {
            // Strips repeatedly, so `Foo[][]` nests and a second pass finds nothing
            Some(element) => SchemaObject::array(dereference_schema(SchemaObject::Reference(
                element.to_string(),
            ))),
            None => SchemaObject::Reference(path),
        },
        SchemaObject::Object(ObjectSchema {
            properties,
            required,
        }) => SchemaObject::Object(ObjectSchema {
            properties: properties
                .into_iter()
                .map(|(name, property)| (name, dereference_schema(property)))
                .collect(),
            required,
        }),
        SchemaObject::Array(items) => SchemaObject::array(dereference_schema(*items)),
        other => other,
    }
}
