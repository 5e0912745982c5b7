//! Generation pipeline
//!
//! parse → extract → (restrict to a root's closure) → synthesize → dereference

use std::collections::HashSet;
use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::{debug, info, warn};

use crate::config::{DocumentLayout, GeneratorConfig, OutputFormat};
use crate::definition::DefinitionsMap;
use crate::deref::dereference_arrays;
use crate::error::{Result, SchemaError};
use crate::extract::extract_definitions;
use crate::graph::{find_referenced_models, ReferenceGraph};
use crate::parser::parse_source;
use crate::schema::SchemaDocument;
use crate::synth::to_schema;

/// Converts TypeScript declarations into OpenAPI component schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    config: GeneratorConfig,
}

impl SchemaGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Read and extract every definition in a source file
    pub fn extract_definitions(&self, path: &Path) -> Result<DefinitionsMap> {
        let source = std::fs::read_to_string(path)?;
        self.definitions_from_source(&source, path)
    }

    /// Extract definitions from source text; `path` is used in errors
    pub fn definitions_from_source(&self, source: &str, path: &Path) -> Result<DefinitionsMap> {
        let file = parse_source(source, path)?;
        let definitions = extract_definitions(&file);
        debug!(path = %path.display(), definitions = definitions.len(), "extracted definitions");
        Ok(definitions)
    }

    /// Schemas for every definition in the file
    pub fn generate_all(&self, path: &Path) -> Result<SchemaDocument> {
        let source = std::fs::read_to_string(path)?;
        self.generate_all_from_source(&source, path)
    }

    /// Schemas for `root` and every definition it reaches
    pub fn generate_one(&self, path: &Path, root: &str) -> Result<SchemaDocument> {
        let source = std::fs::read_to_string(path)?;
        self.generate_one_from_source(&source, path, root)
    }

    pub fn generate_all_from_source(&self, source: &str, path: &Path) -> Result<SchemaDocument> {
        info!(path = %path.display(), "generating schemas for all definitions");
        let definitions = self.definitions_from_source(source, path)?;
        Ok(self.synthesize(&definitions))
    }

    pub fn generate_one_from_source(
        &self,
        source: &str,
        path: &Path,
        root: &str,
    ) -> Result<SchemaDocument> {
        info!(path = %path.display(), root = %root, "generating schemas for one definition");
        let definitions = self.definitions_from_source(source, path)?;
        let Some(root_definition) = definitions.get(root) else {
            return Err(SchemaError::DefinitionNotFound {
                name: root.to_string(),
                path: path.to_path_buf(),
            });
        };

        let reachable = find_referenced_models(
            root_definition,
            &definitions,
            HashSet::from([root.to_string()]),
        );
        debug!(root = %root, reachable = reachable.len(), "computed reachability closure");

        let scoped: DefinitionsMap = definitions
            .iter()
            .filter(|(name, _)| reachable.contains(name.as_str()))
            .map(|(name, definition)| (name.clone(), definition.clone()))
            .collect();
        Ok(self.synthesize(&scoped))
    }

    fn synthesize(&self, definitions: &DefinitionsMap) -> SchemaDocument {
        if self.config.analysis.warn_dangling {
            for dangling in ReferenceGraph::build(definitions).dangling() {
                warn!(
                    definition = %dangling.from,
                    property = %dangling.property,
                    target = %dangling.target,
                    "property references an unknown type"
                );
            }
        }

        let document: SchemaDocument = definitions
            .iter()
            .map(|(name, definition)| (name.clone(), to_schema(definition, &self.config)))
            .collect();
        let document = dereference_arrays(document);
        info!(schemas = document.len(), "generated schemas");
        document
    }

    /// Serialize a document according to the output settings
    pub fn render(&self, document: &SchemaDocument) -> Result<String> {
        let schemas = serde_json::to_value(document)?;
        let value = match self.config.output.layout {
            DocumentLayout::Schemas => schemas,
            DocumentLayout::Components => {
                serde_json::json!({ "components": { "schemas": schemas } })
            }
        };
        let text = match self.config.output.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(&value)?,
            OutputFormat::Compact => serde_json::to_string(&value)?,
        };
        Ok(text)
    }
}

/// Schemas for every definition in `path`, with default settings
pub fn generate_all(path: &Path) -> Result<SchemaDocument> {
    SchemaGenerator::default().generate_all(path)
}

/// Schemas for `root` and its closure in `path`, with default settings
pub fn generate_one(path: &Path, root: &str) -> Result<SchemaDocument> {
    SchemaGenerator::default().generate_one(path, root)
}

/// Definition names closest to `query`, best first
pub fn suggest_names(definitions: &DefinitionsMap, query: &str, limit: usize) -> Vec<String> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut results: Vec<(i64, &String)> = definitions
        .keys()
        .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name)))
        .collect();

    // Sort by score descending
    results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    results
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.clone())
        .collect()
}
