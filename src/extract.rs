//! Definition extraction
//!
//! Walks the whole syntax tree and records every named shape:
//!
//! - interfaces and classes become structural definitions (members with an
//!   explicit annotation only); repeated declarations merge
//! - `extends` / `implements` pull in the properties of structural bases,
//!   with the derived declaration winning on conflict; resolved after the
//!   walk so declaration order does not matter
//! - union aliases become enumerated definitions, type-literal aliases
//!   structural ones, any other alias an empty object unless the name is
//!   already taken
//! - `enum` / `const enum` and object-literal constants become enumerated
//!   definitions

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::definition::{Definition, DefinitionsMap, EnumValue, Property};
use crate::parser::ast::{
    EnumDecl, Initializer, Item, Member, ObjectDecl, SourceFile, TypeAliasDecl, TypeKind,
    VariableDecl,
};
use crate::parser::unquote;

type Properties = IndexMap<String, Property>;

/// Extract every definition in a parsed file
pub fn extract_definitions(file: &SourceFile) -> DefinitionsMap {
    let mut extractor = Extractor::default();
    extractor.visit_items(&file.items);
    extractor.finish()
}

#[derive(Default)]
struct Extractor {
    definitions: DefinitionsMap,
    /// Declared bases per derived name, in declaration order
    heritage: IndexMap<String, Vec<String>>,
}

impl Extractor {
    fn visit_items(&mut self, items: &[Item]) {
        for item in items {
            self.visit(item);
        }
    }

    fn visit(&mut self, item: &Item) {
        match item {
            Item::Interface(decl) | Item::Class(decl) => {
                self.record_object(decl);
                self.visit_items(&decl.nested);
            }
            Item::TypeAlias(alias) => self.record_alias(alias),
            Item::Enum(decl) => self.record_enum(decl),
            Item::Variable(var) => self.record_variable(var),
            Item::Namespace(ns) => self.visit_items(&ns.items),
            Item::Function(func) => self.visit_items(&func.body),
        }
    }

    fn record_object(&mut self, decl: &ObjectDecl) {
        let properties = typed_properties(&decl.name, &decl.members);
        debug!(name = %decl.name, properties = properties.len(), "recorded structural definition");

        match self.definitions.get_mut(&decl.name) {
            Some(Definition::Structural { properties: existing }) => {
                debug!(name = %decl.name, "merging repeated declaration");
                existing.extend(properties);
            }
            Some(Definition::Enumerated { .. }) => {
                debug!(name = %decl.name, "keeping enumerated definition over object declaration");
            }
            None => {
                self.definitions
                    .insert(decl.name.clone(), Definition::Structural { properties });
            }
        }

        if !decl.heritage.is_empty() {
            let bases = self.heritage.entry(decl.name.clone()).or_default();
            for base in &decl.heritage {
                if !bases.contains(base) {
                    bases.push(base.clone());
                }
            }
        }
    }

    fn record_alias(&mut self, alias: &TypeAliasDecl) {
        match &alias.ty.unparenthesized().kind {
            TypeKind::Union(branches) => {
                let values: Vec<EnumValue> = branches
                    .iter()
                    .map(|branch| match &branch.unparenthesized().kind {
                        TypeKind::Literal(literal) => EnumValue::from(literal),
                        _ => EnumValue::String(unquote(&branch.text)),
                    })
                    .collect();
                debug!(name = %alias.name, values = values.len(), "recorded union alias");
                self.definitions
                    .insert(alias.name.clone(), Definition::Enumerated { values });
            }
            TypeKind::Object(members) => {
                let properties = typed_properties(&alias.name, members);
                debug!(name = %alias.name, properties = properties.len(), "recorded type literal alias");
                self.definitions
                    .insert(alias.name.clone(), Definition::Structural { properties });
            }
            _ => {
                debug!(name = %alias.name, "recorded opaque alias");
                self.definitions
                    .entry(alias.name.clone())
                    .or_insert_with(Definition::empty);
            }
        }
    }

    fn record_enum(&mut self, decl: &EnumDecl) {
        let values = decl
            .members
            .iter()
            .map(|member| match &member.initializer {
                Some(literal) => EnumValue::from(literal),
                None => EnumValue::String(member.name.clone()),
            })
            .collect();
        debug!(name = %decl.name, is_const = decl.is_const, "recorded enum");
        self.definitions
            .insert(decl.name.clone(), Definition::Enumerated { values });
    }

    fn record_variable(&mut self, var: &VariableDecl) {
        let keys: Vec<String> = match (&var.annotation, &var.initializer) {
            (Some(annotation), _) => match &annotation.unparenthesized().kind {
                TypeKind::Object(members) => members.iter().map(|m| m.name.clone()).collect(),
                _ => {
                    debug!(name = %var.name, "skipping variable without object type");
                    return;
                }
            },
            (None, Some(Initializer::Object { keys })) => keys.clone(),
            (None, _) => {
                debug!(name = %var.name, "skipping variable without object literal");
                return;
            }
        };
        debug!(name = %var.name, values = keys.len(), "recorded constant object");
        self.definitions.insert(
            var.name.clone(),
            Definition::Enumerated {
                values: keys.into_iter().map(EnumValue::String).collect(),
            },
        );
    }

    /// Apply inheritance to every derived definition
    fn finish(mut self) -> DefinitionsMap {
        let mut resolved = HashMap::new();
        for name in self.heritage.keys() {
            self.resolve(name, &mut resolved, &mut HashSet::new());
        }
        for (name, merged) in resolved {
            if let Some(Definition::Structural { properties }) = self.definitions.get_mut(&name) {
                *properties = merged;
            }
        }
        self.definitions
    }

    /// Properties of `name` with all bases folded in
    fn resolve(
        &self,
        name: &str,
        resolved: &mut HashMap<String, Properties>,
        visiting: &mut HashSet<String>,
    ) -> Option<Properties> {
        if let Some(done) = resolved.get(name) {
            return Some(done.clone());
        }
        let own = self.definitions.get(name)?.properties()?.clone();
        let Some(bases) = self.heritage.get(name) else {
            return Some(own);
        };
        // Inheritance cycle
        if !visiting.insert(name.to_string()) {
            return Some(own);
        }

        let mut merged = Properties::new();
        for base in bases {
            match self.resolve(base, resolved, visiting) {
                Some(inherited) => {
                    debug!(derived = %name, base = %base, "merging base properties");
                    for (key, property) in inherited {
                        merged.entry(key).or_insert(property);
                    }
                }
                None => debug!(derived = %name, base = %base, "base is not a structural definition"),
            }
        }
        for (key, property) in own {
            merged.insert(key, property);
        }

        visiting.remove(name);
        resolved.insert(name.to_string(), merged.clone());
        Some(merged)
    }
}

fn typed_properties(owner: &str, members: &[Member]) -> Properties {
    let mut properties = Properties::new();
    for member in members {
        match &member.ty {
            Some(ty) => {
                properties.insert(
                    member.name.clone(),
                    Property {
                        type_text: ty.text.clone(),
                        optional: member.optional,
                    },
                );
            }
            None => debug!(owner = %owner, member = %member.name, "skipping member without annotation"),
        }
    }
    properties
}
