//! Definition Reference Graph
//!
//! Two views over the references between definitions:
//!
//! - [`find_referenced_models`]: the reachability closure used to scope a
//!   single-root generation. Works straight off the raw property text.
//! - [`ReferenceGraph`]: a petgraph view of the whole map for analysis
//!   (self / mutual recursion via SCCs, dangling references, DOT export).
//!
//! Both interpret a property the same way: union pruned to its first
//! defined branch, array markers stripped, reserved names ignored.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::definition::{Definition, DefinitionsMap};
use crate::normalize::normalize_type_text;

/// Names that never denote a user definition
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "string", "number", "boolean", "any", "unknown", "null", "undefined", "void", "never",
    "object", "array",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Name a property's type text points at, if any
pub fn referenced_name(type_text: &str) -> Option<String> {
    let shape = normalize_type_text(type_text);
    shape
        .referenced_name()
        .filter(|name| !is_reserved(name))
        .map(str::to_string)
}

fn outgoing_names(definition: &Definition) -> impl Iterator<Item = String> + '_ {
    definition
        .properties()
        .into_iter()
        .flat_map(|properties| properties.values())
        .filter_map(|property| referenced_name(&property.type_text))
}

/// Every name reachable from `definition`, added to `seed`
///
/// Callers seed with the root's own name. Names without a definition are
/// included but not expanded; each name is expanded at most once.
pub fn find_referenced_models(
    definition: &Definition,
    definitions: &DefinitionsMap,
    seed: HashSet<String>,
) -> HashSet<String> {
    let mut found = seed;
    let mut stack: Vec<&Definition> = vec![definition];

    while let Some(current) = stack.pop() {
        for name in outgoing_names(current) {
            if found.contains(&name) {
                continue;
            }
            if let Some(next) = definitions.get(&name) {
                stack.push(next);
            }
            found.insert(name);
        }
    }

    found
}

// ============================================================================
// Reference Graph
// ============================================================================

/// A property whose type names no definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub from: String,
    pub property: String,
    pub target: String,
}

/// Directed graph of definitions; edges are labelled with the property name
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
    dangling: Vec<DanglingReference>,
}

impl ReferenceGraph {
    /// Build the graph over every definition in the map
    pub fn build(definitions: &DefinitionsMap) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        for name in definitions.keys() {
            node_indices.insert(name.clone(), graph.add_node(name.clone()));
        }

        let mut dangling = Vec::new();
        for (name, definition) in definitions {
            let Some(properties) = definition.properties() else {
                continue;
            };
            for (property, value) in properties {
                let Some(target) = referenced_name(&value.type_text) else {
                    continue;
                };
                match node_indices.get(&target) {
                    Some(&to) => {
                        graph.add_edge(node_indices[name], to, property.clone());
                    }
                    None => dangling.push(DanglingReference {
                        from: name.clone(),
                        property: property.clone(),
                        target,
                    }),
                }
            }
        }

        Self {
            graph,
            node_indices,
            dangling,
        }
    }

    pub fn definition_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Definitions referenced directly by `name`
    pub fn refs_out(&self, name: &str) -> Vec<&String> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };
        let mut refs: Vec<&String> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|e| self.graph.node_weight(e.target()))
            .collect();
        refs.sort();
        refs.dedup();
        refs
    }

    /// Definitions that reference `name` directly
    pub fn refs_in(&self, name: &str) -> Vec<&String> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };
        let mut refs: Vec<&String> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|e| self.graph.node_weight(e.source()))
            .collect();
        refs.sort();
        refs.dedup();
        refs
    }

    /// Groups of mutually recursive definitions, including self references
    ///
    /// Each group is sorted; groups are ordered by their first name.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self
                        .graph
                        .edges_directed(scc[0], Direction::Outgoing)
                        .any(|e| e.target() == scc[0])
            })
            .map(|scc| {
                let mut names: Vec<String> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                names.sort();
                names
            })
            .collect();
        groups.sort();
        groups
    }

    /// References to names with no definition, in definition order
    pub fn dangling(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// Export to Graphviz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph Definitions {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        let in_cycle: HashSet<String> = self.cycles().into_iter().flatten().collect();
        for name in self.graph.node_indices().filter_map(|idx| self.graph.node_weight(idx)) {
            let color = if in_cycle.contains(name) { "#FF9800" } else { "#2196F3" };
            output.push_str(&format!("  \"{}\" [color=\"{}\"];\n", escape(name), color));
        }
        for target in self.dangling.iter().map(|d| &d.target).collect::<BTreeSet<_>>() {
            output.push_str(&format!("  \"{}\" [style=dashed, color=\"#9E9E9E\"];\n", escape(target)));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            if let (Some(source), Some(target)) = (
                self.graph.node_weight(edge.source()),
                self.graph.node_weight(edge.target()),
            ) {
                output.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                    escape(source),
                    escape(target),
                    escape(edge.weight())
                ));
            }
        }
        for dangling in &self.dangling {
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\", style=dashed];\n",
                escape(&dangling.from),
                escape(&dangling.target),
                escape(&dangling.property)
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(entries: Vec<(&str, Definition)>) -> DefinitionsMap {
        entries
            .into_iter()
            .map(|(name, def)| (name.to_string(), def))
            .collect()
    }

    fn names(set: &HashSet<String>) -> Vec<&str> {
        let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
        names.sort();
        names
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let map = defs(vec![
            ("A", Definition::structural([("prop", "B")])),
            ("B", Definition::structural([("prop", "A")])),
        ]);
        let found = find_referenced_models(&map["A"], &map, HashSet::from(["A".to_string()]));
        assert_eq!(names(&found), vec!["A", "B"]);
    }

    #[test]
    fn test_closure_is_transitive_and_skips_reserved_names() {
        let map = defs(vec![
            ("Root", Definition::structural([("a", "Mid"), ("b", "string"), ("c", "any"), ("d?", "unknown")])),
            ("Mid", Definition::structural([("leaf", "Leaf[]"), ("opt?", "Extra | undefined")])),
            ("Leaf", Definition::structural([("v", "number")])),
            ("Extra", Definition::empty()),
            ("Unrelated", Definition::structural([("x", "Leaf")])),
        ]);
        let found = find_referenced_models(&map["Root"], &map, HashSet::from(["Root".to_string()]));
        assert_eq!(names(&found), vec!["Extra", "Leaf", "Mid", "Root"]);
    }

    #[test]
    fn test_unknown_names_are_collected_but_not_expanded() {
        let map = defs(vec![("A", Definition::structural([("ext", "External")]))]);
        let found = find_referenced_models(&map["A"], &map, HashSet::from(["A".to_string()]));
        assert_eq!(names(&found), vec!["A", "External"]);
    }

    #[test]
    fn test_enumerated_definitions_have_no_references() {
        let map = defs(vec![("Pet", Definition::enumerated(["Cat", "Dog"]))]);
        let found = find_referenced_models(&map["Pet"], &map, HashSet::new());
        assert!(found.is_empty());
    }

    #[test]
    fn test_graph_cycles_and_dangling() {
        let map = defs(vec![
            ("Node", Definition::structural([("next?", "Node"), ("owner", "Tree")])),
            ("Tree", Definition::structural([("root", "Node"), ("meta", "Missing")])),
            ("Leaf", Definition::structural([("parent", "Tree")])),
        ]);
        let graph = ReferenceGraph::build(&map);
        assert_eq!(graph.definition_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.cycles(), vec![vec!["Node".to_string(), "Tree".to_string()]]);
        assert_eq!(
            graph.dangling(),
            &[DanglingReference {
                from: "Tree".into(),
                property: "meta".into(),
                target: "Missing".into(),
            }]
        );
        assert_eq!(graph.refs_in("Tree"), vec!["Leaf", "Node"]);
        assert_eq!(graph.refs_out("Node"), vec!["Node", "Tree"]);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let map = defs(vec![("Folder", Definition::structural([("children", "Folder[]")]))]);
        assert_eq!(ReferenceGraph::build(&map).cycles(), vec![vec!["Folder".to_string()]]);
    }

    #[test]
    fn test_to_dot() {
        let map = defs(vec![
            ("A", Definition::structural([("b", "B")])),
            ("B", Definition::structural([("gone", "Gone")])),
        ]);
        let dot = ReferenceGraph::build(&map).to_dot();
        assert!(dot.starts_with("digraph Definitions {"));
        assert!(dot.contains("\"A\" -> \"B\" [label=\"b\"];"));
        assert!(dot.contains("\"B\" -> \"Gone\" [label=\"gone\", style=dashed];"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
