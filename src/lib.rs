//! TypeScript to OpenAPI Schemas
//!
//! Reads the interfaces, classes, type aliases, enums and constant objects
//! declared in a TypeScript file and produces OpenAPI component schemas for
//! them, either for the whole file or for one type and everything it
//! references.
//!
//! ## Pipeline
//!
//! ```text
//! source ─▶ parser ─▶ extract ─▶ DefinitionsMap
//!                                   │
//!                    graph::find_referenced_models (one root only)
//!                                   │
//!                     synth::to_schema ─▶ deref::dereference_arrays ─▶ SchemaDocument
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use ts_openapi_schemas::SchemaGenerator;
//!
//! let generator = SchemaGenerator::default();
//! let document = generator.generate_one(Path::new("src/models.ts"), "User")?;
//! println!("{}", generator.render(&document)?);
//! # Ok::<(), ts_openapi_schemas::SchemaError>(())
//! ```

pub mod config;
pub mod definition;
pub mod deref;
pub mod error;
pub mod extract;
pub mod generator;
pub mod graph;
pub mod normalize;
pub mod parser;
pub mod schema;
pub mod synth;

pub use config::{DocumentLayout, GeneratorConfig, OutputFormat};
pub use definition::{Definition, DefinitionsMap, EnumValue, Property};
pub use deref::dereference_arrays;
pub use error::{Result, SchemaError};
pub use extract::extract_definitions;
pub use generator::{generate_all, generate_one, suggest_names, SchemaGenerator};
pub use graph::{find_referenced_models, DanglingReference, ReferenceGraph};
pub use normalize::{normalize_type_text, TypeShape};
pub use schema::{EnumSchema, ObjectSchema, PrimitiveType, SchemaDocument, SchemaObject};
pub use synth::to_schema;
