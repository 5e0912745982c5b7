//! Type-text normalization
//!
//! Classifies the raw text of a property annotation into the reduced shape
//! algebra the synthesizer understands: a primitive, a named reference, or
//! an array of either. Unions collapse to their first branch that is not
//! `undefined`; this is a fixed rule, not union support.

use crate::schema::PrimitiveType;

/// Normalized form of a type annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Primitive(PrimitiveType),
    /// Named type, kept verbatim
    Reference(String),
    Array(Box<TypeShape>),
}

impl TypeShape {
    /// Innermost referenced name, looking through arrays
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            TypeShape::Primitive(_) => None,
            TypeShape::Reference(name) => Some(name),
            TypeShape::Array(items) => items.referenced_name(),
        }
    }
}

/// Normalize a raw annotation
pub fn normalize_type_text(text: &str) -> TypeShape {
    let text = prune_union(text);

    if let Some(element) = text.strip_suffix("[]") {
        return TypeShape::Array(Box::new(normalize_type_text(element)));
    }
    if let Some(element) = generic_array_element(text) {
        return TypeShape::Array(Box::new(normalize_type_text(element)));
    }
    if let Some(primitive) = PrimitiveType::from_name(text) {
        return TypeShape::Primitive(primitive);
    }
    if let Some(inner) = strip_parens(text) {
        return normalize_type_text(inner);
    }
    TypeShape::Reference(text.to_string())
}

/// Reduce a union to its first branch that is not `undefined`
///
/// Only `|` at bracket depth zero splits. Text without a union comes back
/// trimmed. A union of nothing but `undefined` yields `undefined`.
pub fn prune_union(text: &str) -> &str {
    let text = text.trim();
    let branches = split_top_level(text, '|');
    if branches.len() == 1 {
        return text;
    }
    branches
        .into_iter()
        .map(str::trim)
        .find(|branch| !branch.is_empty() && *branch != "undefined")
        .unwrap_or("undefined")
}

/// `Array<T>` / `ReadonlyArray<T>` element text
fn generic_array_element(text: &str) -> Option<&str> {
    let args = text
        .strip_prefix("Array<")
        .or_else(|| text.strip_prefix("ReadonlyArray<"))?
        .strip_suffix('>')?;
    (split_top_level(args, ',').len() == 1 && balanced(args)).then_some(args.trim())
}

/// Contents of a single enclosing pair of parentheses
fn strip_parens(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    balanced(inner).then_some(inner)
}

/// Split on `sep` outside of any brackets
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = None;
    for (i, c) in text.char_indices() {
        let delta = depth_delta(prev, c);
        if delta == 0 && c == sep && depth == 0 {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
        depth += delta;
        prev = Some(c);
    }
    parts.push(&text[start..]);
    parts
}

/// Bracket nesting change for `c`; the `>` of `=>` is not a bracket
fn depth_delta(prev: Option<char>, c: char) -> i32 {
    match c {
        '(' | '<' | '{' | '[' => 1,
        '>' if prev == Some('=') => 0,
        ')' | '>' | '}' | ']' => -1,
        _ => 0,
    }
}

/// Brackets never close below depth zero
fn balanced(text: &str) -> bool {
    let mut depth = 0i32;
    let mut prev = None;
    for c in text.chars() {
        depth += depth_delta(prev, c);
        if depth < 0 {
            return false;
        }
        prev = Some(c);
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> TypeShape {
        TypeShape::Reference(name.to_string())
    }

    fn array(items: TypeShape) -> TypeShape {
        TypeShape::Array(Box::new(items))
    }

    #[test]
    fn test_primitives() {
        assert_eq!(normalize_type_text("string"), TypeShape::Primitive(PrimitiveType::String));
        assert_eq!(normalize_type_text(" number "), TypeShape::Primitive(PrimitiveType::Number));
        assert_eq!(normalize_type_text("boolean"), TypeShape::Primitive(PrimitiveType::Boolean));
    }

    #[test]
    fn test_arrays() {
        assert_eq!(normalize_type_text("string[]"), array(TypeShape::Primitive(PrimitiveType::String)));
        assert_eq!(normalize_type_text("Foo[][]"), array(array(reference("Foo"))));
        assert_eq!(normalize_type_text("Array<Foo>"), array(reference("Foo")));
        assert_eq!(
            normalize_type_text("ReadonlyArray<number>"),
            array(TypeShape::Primitive(PrimitiveType::Number))
        );
    }

    #[test]
    fn test_unions_take_first_defined_branch() {
        assert_eq!(normalize_type_text("Model6 | undefined"), reference("Model6"));
        assert_eq!(normalize_type_text("undefined | string | Foo"), TypeShape::Primitive(PrimitiveType::String));
        assert_eq!(normalize_type_text("Foo[] | undefined"), array(reference("Foo")));
        assert_eq!(normalize_type_text("(A | B)[]"), array(reference("A")));
        assert_eq!(normalize_type_text("| 'a' | 'b'"), reference("'a'"));
    }

    #[test]
    fn test_union_inside_generic_is_not_split() {
        assert_eq!(
            normalize_type_text("Map<string, A | B>"),
            reference("Map<string, A | B>")
        );
    }

    #[test]
    fn test_function_type_arrow_does_not_close_brackets() {
        assert_eq!(
            normalize_type_text("((e: Event) => void) | undefined"),
            reference("(e: Event) => void")
        );
    }

    #[test]
    fn test_prune_union() {
        assert_eq!(prune_union("  Foo  "), "Foo");
        assert_eq!(prune_union("undefined | undefined"), "undefined");
        assert_eq!(prune_union("A|B|C"), "A");
    }

    #[test]
    fn test_referenced_name_looks_through_arrays() {
        assert_eq!(normalize_type_text("Foo[]").referenced_name(), Some("Foo"));
        assert_eq!(normalize_type_text("string[]").referenced_name(), None);
    }
}
