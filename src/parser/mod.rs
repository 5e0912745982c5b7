//! TypeScript Declaration Parser
//!
//! Parses a source file with tree-sitter's TypeScript grammar and lowers the
//! concrete tree into the closed [`ast`] the extractor consumes. Lowering
//! visits every node: declarations become [`Item`]s wherever they appear,
//! including arrow-function bodies, control-flow blocks and object literals,
//! and everything else is descended into.
//!
//! Each [`TypeNode`] keeps the text of its span exactly as written.

pub mod ast;

use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::error::{Result, SchemaError};
use ast::{
    EnumDecl, EnumMember, FunctionDecl, Initializer, Item, Literal, Member, NamespaceDecl,
    ObjectDecl, SourceFile, TypeAliasDecl, TypeKind, TypeNode, VariableDecl,
};

/// A parse failure with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl SyntaxError {
    /// Attach the source path, producing the crate error
    pub fn at(self, path: &Path) -> SchemaError {
        SchemaError::MalformedSource {
            path: path.to_path_buf(),
            line: self.line,
            column: self.column,
            message: self.message,
        }
    }

    fn at_node(node: Node, message: String) -> Self {
        let position = node.start_position();
        Self {
            line: u32::try_from(position.row + 1).unwrap_or(u32::MAX),
            column: u32::try_from(position.column + 1).unwrap_or(u32::MAX),
            message,
        }
    }

    fn without_position(message: String) -> Self {
        Self {
            line: 0,
            column: 0,
            message,
        }
    }
}

/// Parse a source file, reporting failures against `path`
pub fn parse_source(source: &str, path: &Path) -> Result<SourceFile> {
    parse_str(source).map_err(|e| e.at(path))
}

/// Parse source text
pub fn parse_str(source: &str) -> std::result::Result<SourceFile, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .map_err(|e| SyntaxError::without_position(format!("TypeScript grammar unavailable: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SyntaxError::without_position("parser produced no tree".to_string()))?;

    let root = tree.root_node();
    if let Some(bad) = first_error(root) {
        let message = if bad.is_missing() {
            format!("expected `{}`", bad.kind())
        } else {
            format!(
                "unexpected `{}`",
                snippet(source.get(bad.byte_range()).unwrap_or_default())
            )
        };
        return Err(SyntaxError::at_node(bad, message));
    }

    let lowering = Lowering { src: source };
    let mut items = Vec::new();
    lowering.collect(root, &mut items);
    Ok(SourceFile { items })
}

/// Earliest error or missing node, in document order
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

fn snippet(text: &str) -> &str {
    let line = text.lines().next().unwrap_or_default().trim();
    match line.char_indices().nth(40) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

/// Strip one pair of surrounding quotes
pub(crate) fn unquote(text: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    text.to_string()
}

/// Contents of a quoted string literal with escapes resolved
pub(crate) fn string_value(text: &str) -> String {
    let inner = ['"', '\'']
        .into_iter()
        .find_map(|q| text.strip_prefix(q).and_then(|t| t.strip_suffix(q)))
        .unwrap_or(text);
    unescape(inner)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next_if(char::is_ascii_hexdigit)).collect();
                push_code_point(&mut out, &hex, "\\x");
            }
            'u' if chars.next_if_eq(&'{').is_some() => {
                let hex: String = std::iter::from_fn(|| chars.next_if(|c| *c != '}')).collect();
                chars.next_if_eq(&'}');
                push_code_point(&mut out, &hex, "\\u");
            }
            'u' => {
                let hex: String = (0..4).filter_map(|_| chars.next_if(char::is_ascii_hexdigit)).collect();
                push_code_point(&mut out, &hex, "\\u");
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, prefix: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

/// Lowers tree-sitter nodes into [`Item`]s
struct Lowering<'a> {
    src: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        self.src.get(node.byte_range()).unwrap_or_default()
    }

    // ========== Statements ==========

    /// Lower every declaration below `node` into `items`
    fn collect(&self, node: Node, items: &mut Vec<Item>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, items);
        }
    }

    fn visit(&self, node: Node, items: &mut Vec<Item>) {
        match node.kind() {
            "interface_declaration" => {
                if let Some(decl) = self.interface(node) {
                    items.push(Item::Interface(decl));
                }
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                match self.class(node) {
                    Some(decl) => items.push(Item::Class(decl)),
                    // Anonymous class: only what its members contain
                    None => self.collect(node, items),
                }
            }
            "type_alias_declaration" => {
                if let Some(alias) = self.type_alias(node) {
                    items.push(Item::TypeAlias(alias));
                }
            }
            "enum_declaration" => {
                if let Some(decl) = self.enumeration(node) {
                    items.push(Item::Enum(decl));
                }
            }
            "lexical_declaration" | "variable_declaration" => self.variables(node, items),
            "internal_module" | "module" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return self.collect(node, items);
                };
                let mut inner = Vec::new();
                if let Some(body) = node.child_by_field_name("body") {
                    self.collect(body, &mut inner);
                }
                items.push(Item::Namespace(NamespaceDecl {
                    name: unquote(self.text(name)),
                    items: inner,
                }));
            }
            "function_declaration" | "generator_function_declaration" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return self.collect(node, items);
                };
                let mut body = Vec::new();
                self.collect(node, &mut body);
                items.push(Item::Function(FunctionDecl {
                    name: self.text(name).to_string(),
                    body,
                }));
            }
            "comment" => {}
            _ => self.collect(node, items),
        }
    }

    fn interface(&self, node: Node) -> Option<ObjectDecl> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let mut heritage = Vec::new();
        let mut members = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "extends_type_clause" => self.heritage_names(child, &mut heritage),
                "interface_body" | "object_type" => members = self.type_members(child),
                _ => {}
            }
        }

        Some(ObjectDecl {
            name,
            heritage,
            members,
            nested: Vec::new(),
        })
    }

    fn class(&self, node: Node) -> Option<ObjectDecl> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let mut heritage = Vec::new();
        let mut members = Vec::new();
        let mut nested = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "class_heritage" => {
                    let mut clauses = child.walk();
                    for clause in child.named_children(&mut clauses) {
                        self.heritage_names(clause, &mut heritage);
                    }
                }
                "class_body" => self.class_members(child, &mut members, &mut nested),
                "decorator" => self.collect(child, &mut nested),
                _ => {}
            }
        }

        Some(ObjectDecl {
            name,
            heritage,
            members,
            nested,
        })
    }

    /// Names listed in an `extends` / `implements` clause, type arguments dropped
    fn heritage_names(&self, clause: Node, names: &mut Vec<String>) {
        let mut cursor = clause.walk();
        for child in clause.named_children(&mut cursor) {
            let name = match child.kind() {
                "type_arguments" | "comment" => continue,
                "generic_type" => child
                    .child_by_field_name("name")
                    .map_or_else(|| self.text(child), |n| self.text(n)),
                _ => self.text(child),
            };
            let name = name.split('<').next().unwrap_or(name).trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }

    fn class_members(&self, body: Node, members: &mut Vec<Member>, nested: &mut Vec<Item>) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "public_field_definition" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        members.push(Member {
                            name: self.property_name(name),
                            optional: has_token(member, "?"),
                            ty: self.annotation(member),
                        });
                    }
                    if let Some(value) = member.child_by_field_name("value") {
                        self.visit(value, nested);
                    }
                }
                _ => self.collect(member, nested),
            }
        }
    }

    fn type_alias(&self, node: Node) -> Option<TypeAliasDecl> {
        Some(TypeAliasDecl {
            name: self.text(node.child_by_field_name("name")?).to_string(),
            ty: self.lower_type(node.child_by_field_name("value")?),
        })
    }

    fn enumeration(&self, node: Node) -> Option<EnumDecl> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let body = node.child_by_field_name("body")?;

        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "enum_assignment" => {
                    let Some(member) = child.child_by_field_name("name") else {
                        continue;
                    };
                    members.push(EnumMember {
                        name: self.property_name(member),
                        initializer: child
                            .child_by_field_name("value")
                            .and_then(|v| self.literal(v)),
                    });
                }
                "comment" => {}
                _ => members.push(EnumMember {
                    name: self.property_name(child),
                    initializer: None,
                }),
            }
        }

        Some(EnumDecl {
            name,
            is_const: has_token(node, "const"),
            members,
        })
    }

    /// First declarator becomes an item; every initializer is descended into
    fn variables(&self, node: Node, items: &mut Vec<Item>) {
        let mut first = true;
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let value = declarator.child_by_field_name("value");
            if std::mem::take(&mut first) {
                if let Some(name) = declarator
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                {
                    items.push(Item::Variable(VariableDecl {
                        name: self.text(name).to_string(),
                        annotation: self.annotation(declarator),
                        initializer: value.map(|v| match self.object_keys(v) {
                            Some(keys) => Initializer::Object { keys },
                            None => Initializer::Expression,
                        }),
                    }));
                }
            }
            if let Some(value) = value {
                self.visit(value, items);
            }
        }
    }

    /// Own keys of an object literal, looking through `as const`,
    /// `satisfies T`, parentheses and `Object.freeze(...)`
    fn object_keys(&self, node: Node) -> Option<Vec<String>> {
        match node.kind() {
            "object" => {
                let mut keys = Vec::new();
                let mut cursor = node.walk();
                for entry in node.named_children(&mut cursor) {
                    let key = match entry.kind() {
                        "pair" | "method_definition" => entry
                            .child_by_field_name("key")
                            .or_else(|| entry.child_by_field_name("name"))
                            .map(|k| self.property_name(k)),
                        "shorthand_property_identifier" => Some(self.text(entry).to_string()),
                        _ => None,
                    };
                    keys.extend(key);
                }
                Some(keys)
            }
            "as_expression" | "satisfies_expression" | "parenthesized_expression"
            | "non_null_expression" => self.object_keys(first_named(node)?),
            "call_expression" => {
                let callee = node.child_by_field_name("function")?;
                if self.text(callee) != "Object.freeze" {
                    return None;
                }
                let arguments = node.child_by_field_name("arguments")?;
                self.object_keys(first_named(arguments)?)
            }
            _ => None,
        }
    }

    fn property_name(&self, node: Node) -> String {
        match node.kind() {
            "string" => string_value(self.text(node)),
            _ => self.text(node).to_string(),
        }
    }

    /// Literal enum initializer or literal type
    fn literal(&self, node: Node) -> Option<Literal> {
        match node.kind() {
            "string" => Some(Literal::String(string_value(self.text(node)))),
            "number" => Some(Literal::Number(self.text(node).to_string())),
            "true" => Some(Literal::Boolean(true)),
            "false" => Some(Literal::Boolean(false)),
            "unary_expression" => {
                let operator = node.child_by_field_name("operator")?;
                let argument = node.child_by_field_name("argument")?;
                (self.text(operator) == "-" && argument.kind() == "number")
                    .then(|| Literal::Number(format!("-{}", self.text(argument))))
            }
            _ => None,
        }
    }

    // ========== Types ==========

    /// Type of a `type` field holding a `: T` annotation
    fn annotation(&self, node: Node) -> Option<TypeNode> {
        let annotation = node.child_by_field_name("type")?;
        let ty = if annotation.kind() == "type_annotation" {
            first_named(annotation)?
        } else {
            annotation
        };
        Some(self.lower_type(ty))
    }

    /// Property signatures of an object type; methods, call, construct and
    /// index signatures are not properties
    fn type_members(&self, body: Node) -> Vec<Member> {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() != "property_signature" {
                continue;
            }
            let Some(name) = child.child_by_field_name("name") else {
                continue;
            };
            members.push(Member {
                name: self.property_name(name),
                optional: has_token(child, "?"),
                ty: self.annotation(child),
            });
        }
        members
    }

    fn lower_type(&self, node: Node) -> TypeNode {
        let kind = match node.kind() {
            "type_identifier" | "nested_type_identifier" | "predefined_type" | "this_type" => {
                TypeKind::Reference {
                    name: self.text(node).to_string(),
                    args: Vec::new(),
                }
            }
            "generic_type" => {
                let name = node
                    .child_by_field_name("name")
                    .map_or_else(|| self.text(node), |n| self.text(n));
                let args = node
                    .child_by_field_name("type_arguments")
                    .map(|a| self.type_list(a))
                    .unwrap_or_default();
                TypeKind::Reference {
                    name: name.to_string(),
                    args,
                }
            }
            "literal_type" => match first_named(node).and_then(|n| self.literal(n)) {
                Some(literal) => TypeKind::Literal(literal),
                None => TypeKind::Other,
            },
            "array_type" => match first_named(node) {
                Some(element) => TypeKind::Array(Box::new(self.lower_type(element))),
                None => TypeKind::Other,
            },
            "union_type" => TypeKind::Union(self.flatten(node, "union_type")),
            "intersection_type" => TypeKind::Intersection(self.flatten(node, "intersection_type")),
            "object_type" => TypeKind::Object(self.type_members(node)),
            "tuple_type" => TypeKind::Tuple(self.type_list(node)),
            "parenthesized_type" => match first_named(node) {
                Some(inner) => TypeKind::Parenthesized(Box::new(self.lower_type(inner))),
                None => TypeKind::Other,
            },
            _ => TypeKind::Other,
        };
        TypeNode {
            kind,
            text: self.text(node).trim().to_string(),
        }
    }

    fn type_list(&self, node: Node) -> Vec<TypeNode> {
        let mut cursor = node.walk();
        let types = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .map(|n| self.lower_type(n))
            .collect();
        types
    }

    /// Operands of a left-nested `A | B | C` chain, in source order
    fn flatten(&self, node: Node, kind: &str) -> Vec<TypeNode> {
        let mut operands = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "comment" => {}
                k if k == kind => operands.extend(self.flatten(child, kind)),
                _ => operands.push(self.lower_type(child)),
            }
        }
        operands
    }
}

fn first_named(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|n| n.kind() != "comment");
    found
}

/// Whether `node` has an anonymous `token` child
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        parse_str(src).unwrap()
    }

    fn only_interface(file: &SourceFile) -> &ObjectDecl {
        match &file.items[..] {
            [Item::Interface(decl)] => decl,
            other => panic!("Expected one interface, got {:?}", other),
        }
    }

    fn item_names(items: &[Item]) -> Vec<String> {
        let mut names = Vec::new();
        for item in items {
            match item {
                Item::Interface(d) | Item::Class(d) => {
                    names.push(d.name.clone());
                    names.extend(item_names(&d.nested));
                }
                Item::TypeAlias(a) => names.push(a.name.clone()),
                Item::Enum(e) => names.push(e.name.clone()),
                Item::Variable(v) => names.push(v.name.clone()),
                Item::Namespace(ns) => {
                    names.push(ns.name.clone());
                    names.extend(item_names(&ns.items));
                }
                Item::Function(f) => {
                    names.push(f.name.clone());
                    names.extend(item_names(&f.body));
                }
            }
        }
        names
    }

    #[test]
    fn test_interface_members_keep_type_text() {
        let file = parse(
            "export interface Model1 {\n  prop1: string;\n  propMod3: Model3\n  optionalProp?: Model6 | undefined;\n  list: Array<Map<string, number>>;\n}",
        );
        let decl = only_interface(&file);
        assert_eq!(decl.name, "Model1");
        let members: Vec<(&str, bool, &str)> = decl
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.optional, m.ty.as_ref().unwrap().text.as_str()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("prop1", false, "string"),
                ("propMod3", false, "Model3"),
                ("optionalProp", true, "Model6 | undefined"),
                ("list", false, "Array<Map<string, number>>"),
            ]
        );
    }

    #[test]
    fn test_methods_and_index_signatures_are_not_properties() {
        let file = parse(
            "interface A {\n  [key: string]: unknown;\n  run(x: number): void;\n  (call: string): A;\n  new (x: string): A;\n  readonly id: string;\n  handler: (e: Event) => void;\n}",
        );
        let decl = only_interface(&file);
        let names: Vec<&str> = decl.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["id", "handler"]);
        assert_eq!(decl.members[1].ty.as_ref().unwrap().text, "(e: Event) => void");
    }

    #[test]
    fn test_heritage_names_drop_type_arguments() {
        let file = parse("interface B extends Base<string>, ns.Other {}");
        assert_eq!(only_interface(&file).heritage, vec!["Base", "ns.Other"]);
    }

    #[test]
    fn test_class_properties_methods_and_nested_declarations() {
        let file = parse(
            "@Entity()\nexport abstract class User extends Base implements Named {\n  @Column() private readonly id!: number;\n  name?: string = 'x'\n  tags: string[] = []\n  untyped = 5;\n  static count = 0;\n  constructor(private a: string) { super(); }\n  greet(): string {\n    interface Local { x: string }\n    return this.name;\n  }\n}",
        );
        let Item::Class(decl) = &file.items[0] else {
            panic!("Expected class, got {:?}", file.items);
        };
        assert_eq!(decl.name, "User");
        assert_eq!(decl.heritage, vec!["Base", "Named"]);
        let typed: Vec<&str> = decl
            .members
            .iter()
            .filter(|m| m.ty.is_some())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(typed, vec!["id", "name", "tags"]);
        assert!(decl.members.iter().any(|m| m.name == "name" && m.optional));
        assert!(matches!(&decl.nested[..], [Item::Interface(local)] if local.name == "Local"));
    }

    #[test]
    fn test_union_of_literals_alias() {
        let file = parse("type Role = | 'admin' | \"member\" | 3 | -1 | true | Other;");
        let Item::TypeAlias(alias) = &file.items[0] else {
            panic!("Expected alias");
        };
        let TypeKind::Union(branches) = &alias.ty.kind else {
            panic!("Expected union, got {:?}", alias.ty.kind);
        };
        let kinds: Vec<&TypeKind> = branches.iter().map(|b| &b.kind).collect();
        assert_eq!(kinds[0], &TypeKind::Literal(Literal::String("admin".into())));
        assert_eq!(kinds[1], &TypeKind::Literal(Literal::String("member".into())));
        assert_eq!(kinds[2], &TypeKind::Literal(Literal::Number("3".into())));
        assert_eq!(kinds[3], &TypeKind::Literal(Literal::Number("-1".into())));
        assert_eq!(kinds[4], &TypeKind::Literal(Literal::Boolean(true)));
        assert_eq!(branches[5].text, "Other");
    }

    #[test]
    fn test_string_literals_resolve_escapes() {
        let file = parse("type Quote = 'it\\'s' | \"say \\\"hi\\\"\" | 'caf\\u00e9';");
        let Item::TypeAlias(alias) = &file.items[0] else {
            panic!("Expected alias");
        };
        let TypeKind::Union(branches) = &alias.ty.kind else {
            panic!("Expected union, got {:?}", alias.ty.kind);
        };
        let values: Vec<&TypeKind> = branches.iter().map(|b| &b.kind).collect();
        assert_eq!(
            values,
            vec![
                &TypeKind::Literal(Literal::String("it's".into())),
                &TypeKind::Literal(Literal::String("say \"hi\"".into())),
                &TypeKind::Literal(Literal::String("café".into())),
            ]
        );
    }

    #[test]
    fn test_array_types() {
        let file = parse("interface A {\n  a: string[][]\n  [key: string]: unknown\n  b: (A | B)[]\n}");
        let decl = only_interface(&file);
        assert_eq!(decl.members.len(), 2);
        let a = decl.members[0].ty.as_ref().unwrap();
        assert_eq!(a.text, "string[][]");
        assert!(matches!(&a.kind, TypeKind::Array(inner) if matches!(inner.kind, TypeKind::Array(_))));
        assert_eq!(decl.members[1].ty.as_ref().unwrap().text, "(A | B)[]");
    }

    #[test]
    fn test_conditional_mapped_and_indexed_types_parse() {
        let file = parse(
            "export type DecConst = (typeof DecConst)[keyof typeof DecConst];\ntype M<T> = { readonly [K in keyof T]?: T[K] };\ntype C<T> = T extends string ? 'a' : 'b';",
        );
        assert_eq!(file.items.len(), 3);
        let Item::TypeAlias(dec) = &file.items[0] else { panic!() };
        assert_eq!(dec.ty.kind, TypeKind::Other);
        let Item::TypeAlias(conditional) = &file.items[2] else { panic!() };
        assert_eq!(conditional.ty.kind, TypeKind::Other);
    }

    #[test]
    fn test_const_object_forms() {
        let file = parse(
            "export declare const DecConst: {\n  readonly A: 'A';\n  readonly B: 'B';\n};\nconst Frozen = Object.freeze({ X: 'x', 'y-z': 1, method() { return 1 } });\nconst AsConst = { One: 1, Two: { nested: true } } as const\nlet plain = compute(1, 2)\n",
        );
        let vars: Vec<&VariableDecl> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Variable(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(vars.len(), 4);
        assert!(matches!(&vars[0].annotation, Some(TypeNode { kind: TypeKind::Object(m), .. }) if m.len() == 2));
        assert_eq!(
            vars[1].initializer,
            Some(Initializer::Object {
                keys: vec!["X".into(), "y-z".into(), "method".into()]
            })
        );
        assert_eq!(
            vars[2].initializer,
            Some(Initializer::Object {
                keys: vec!["One".into(), "Two".into()]
            })
        );
        assert_eq!(vars[3].initializer, Some(Initializer::Expression));
    }

    #[test]
    fn test_enum_members_and_initializers() {
        let file = parse("export const enum Test { one = 'one', two = 2, three, four = 1 << 2 }");
        let Item::Enum(decl) = &file.items[0] else { panic!() };
        assert!(decl.is_const);
        let members: Vec<(&str, Option<&Literal>)> = decl
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.initializer.as_ref()))
            .collect();
        assert_eq!(
            members,
            vec![
                ("one", Some(&Literal::String("one".into()))),
                ("two", Some(&Literal::Number("2".into()))),
                ("three", None),
                ("four", None),
            ]
        );
    }

    #[test]
    fn test_descends_into_containers() {
        let file = parse(
            "import { x } from './x';\nimport type { Y } from './y'\nexport * from './z';\nconsole.log(`hi ${x}`);\nexport function build(a: string): Promise<void> {\n  type Inner = 'a' | 'b';\n  return fetch(a).then(() => {});\n}\nnamespace Api.V1 {\n  export interface Req { id: string }\n}\ndeclare module 'ext' {\n  interface Ext { v: number }\n}\nexport default class {}\n",
        );
        assert_eq!(file.items.len(), 3);
        assert!(matches!(&file.items[0], Item::Function(f) if f.name == "build" && f.body.len() == 1));
        assert!(matches!(&file.items[1], Item::Namespace(ns) if ns.name == "Api.V1" && ns.items.len() == 1));
        assert!(matches!(&file.items[2], Item::Namespace(ns) if ns.name == "ext"));
    }

    #[test]
    fn test_declarations_inside_expressions_and_blocks() {
        let file = parse(
            "export const make = () => {\n  interface Local { a: string }\n  return 1;\n};\nif (true) {\n  interface InIf { b: number }\n}\nfor (const k of keys) { try { type InTry = 'x' } catch { enum InCatch { A } } }\nregister(function () { class InCallback { c: boolean } });\nexport interface Top { t: string }",
        );
        assert_eq!(
            item_names(&file.items),
            vec!["make", "Local", "InIf", "InTry", "InCatch", "InCallback", "Top"]
        );
    }

    #[test]
    fn test_regex_literals_do_not_break_parsing() {
        let file = parse(
            "export class Cleaner {\n  raw: string;\n  clean(): string { return this.raw.replace(/['\"]/g, ''); }\n}\nconst re = /a\\/*/;\nexport interface After { x: string }",
        );
        assert_eq!(item_names(&file.items), vec!["Cleaner", "re", "After"]);
    }

    #[test]
    fn test_unclosed_interface_is_malformed() {
        let err = parse_str("interface A {\n  a: string;\n").unwrap_err();
        assert!(err.line >= 1, "{:?}", err);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_missing_type_after_colon_is_malformed() {
        let err = parse_str("interface A { a: ; }").unwrap_err();
        assert_eq!(err.line, 1);
        let schema_err = err.at(Path::new("models.ts"));
        assert!(matches!(schema_err, SchemaError::MalformedSource { line: 1, .. }));
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(string_value(r"'a\tb'"), "a\tb");
        assert_eq!(string_value(r#""\x41\u{1F600}""#), "A\u{1F600}");
        assert_eq!(string_value(r"'back\\slash'"), "back\\slash");
        assert_eq!(unquote("'plain'"), "plain");
    }
}
