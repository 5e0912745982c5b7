//! Syntax tree for the declaration subset the extractor understands
//!
//! The set of item kinds is closed. Statements and expressions that are not
//! declarations never reach the tree, though declarations nested inside them
//! do.

/// A parsed source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

/// A declaration, or a container that may hold declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Interface(ObjectDecl),
    Class(ObjectDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    Variable(VariableDecl),
    Namespace(NamespaceDecl),
    Function(FunctionDecl),
}

/// Interface or class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecl {
    pub name: String,
    /// Names listed in `extends` / `implements`, type arguments dropped
    pub heritage: Vec<String>,
    pub members: Vec<Member>,
    /// Declarations found inside members (method bodies, initializers)
    pub nested: Vec<Item>,
}

/// Property signature or property declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub optional: bool,
    /// Explicit type annotation, if any
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub is_const: bool,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    /// Initializer, when it is a plain literal
    pub initializer: Option<Literal>,
}

/// First declarator of a `const` / `let` / `var` statement
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub annotation: Option<TypeNode>,
    pub initializer: Option<Initializer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// Object literal (optionally `as const`, `satisfies T` or wrapped in
    /// `Object.freeze(...)`) with its own property names in order
    Object { keys: Vec<String> },
    /// Any other expression
    Expression,
}

/// `namespace X { }`, `module X { }`, `declare module 'x' { }`, `declare global { }`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub body: Vec<Item>,
}

/// A type expression together with its exact source text
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Named type, possibly qualified (`ns.Foo`) and with type arguments
    Reference { name: String, args: Vec<TypeNode> },
    Literal(Literal),
    /// `T[]`
    Array(Box<TypeNode>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// `{ a: T; b?: U }`
    Object(Vec<Member>),
    Tuple(Vec<TypeNode>),
    Parenthesized(Box<TypeNode>),
    /// Function, constructor, conditional, indexed access, `typeof`, `keyof`,
    /// template literal and other types the converter does not interpret
    Other,
}

/// Literal value as written in a type or enum initializer
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String contents without the surrounding quotes
    String(String),
    /// Numeric literal text, sign included
    Number(String),
    Boolean(bool),
}

impl TypeNode {
    /// Look through any number of parentheses
    pub fn unparenthesized(&self) -> &TypeNode {
        match &self.kind {
            TypeKind::Parenthesized(inner) => inner.unparenthesized(),
            _ => self,
        }
    }
}
