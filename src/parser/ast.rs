//! AST node model for the Veld front end
//!
//! The whole tree is one closed [`Node`] enum; every variant carries the
//! [`Location`] of the token that introduced it, reachable uniformly through
//! [`Node::location`]. A translation unit is rooted at a single [`Compound`].

use crate::diagnostics::Location;
use crate::parser::token::TokenKind;

/// A sequence of statements: the top-level unit body, a `{}` block, or a
/// function-literal body with its leading `$(...)` parameter clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub statements: Vec<Node>,
    /// Parameter clause of a function-literal body, when this compound is one.
    pub first_class_function: Option<FirstClassFunction>,
    pub location: Location,
}

/// A first-class function type or literal head: `$ret(args)` or `$(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstClassFunction {
    pub return_type: Option<Box<Node>>,
    pub arguments: Vec<FunctionArgument>,
    /// True when this appeared in type position rather than as a literal head.
    pub is_type: bool,
    pub location: Location,
}

/// Declaration qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Extern,
    Volatile,
    Private,
}

/// One parameter in a function or initializer signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArgument {
    pub name: Option<String>,
    pub ty: Option<Box<Node>>,
    pub default_value: Option<Box<Node>>,
    pub is_vararg: bool,
    pub is_constant: bool,
    pub location: Location,
}

/// One argument at a call site, optionally labeled `name: value`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgument {
    pub name: Option<String>,
    pub value: Node,
}

/// One case of an enum declaration. `is_explicit` marks a `= value` override.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: String,
    pub value: Box<Node>,
    pub is_explicit: bool,
    pub location: Location,
}

/// One arm of a switch statement; `expression` is `None` for `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub expression: Option<Node>,
    pub body: Compound,
    pub location: Location,
}

/// A `@(...)` template clause on a struct, union, or function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDeclaration {
    pub parameters: Vec<TemplateParameter>,
    pub location: Location,
}

/// One `kind name` pair inside a template clause, e.g. `any T`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParameter {
    pub kind: TokenKind,
    pub name: String,
    pub location: Location,
}

/// Literal discriminator carried by [`Node::Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Hex,
    Octal,
    Binary,
    String,
    MultilineString,
    Char,
    Bool,
    Nil,
    Identifier,
    SelfValue,
}

/// Every syntactic form the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Structural
    Compound(Compound),

    // Declarations
    Import {
        path: String,
        /// `import <name>` library form vs. `import "path"` file form.
        is_library: bool,
        location: Location,
    },
    StructDeclaration {
        name: String,
        qualifiers: Vec<Qualifier>,
        template: Option<TemplateDeclaration>,
        body: Box<Compound>,
        is_union: bool,
        location: Location,
    },
    EnumDeclaration {
        name: String,
        cases: Vec<EnumCase>,
        qualifiers: Vec<Qualifier>,
        location: Location,
    },
    FunctionDeclaration {
        name: String,
        qualifiers: Vec<Qualifier>,
        arguments: Vec<FunctionArgument>,
        return_type: Option<Box<Node>>,
        template: Option<TemplateDeclaration>,
        /// `None` for prototype declarations without a body.
        body: Option<Box<Compound>>,
        location: Location,
    },
    VariableDeclaration {
        name: String,
        var_type: Option<Box<Node>>,
        value: Option<Box<Node>>,
        qualifiers: Vec<Qualifier>,
        is_constant: bool,
        location: Location,
    },
    Typealias {
        name: String,
        value: Box<Node>,
        location: Location,
    },
    OperatorOverload {
        operators: Vec<TokenKind>,
        arguments: Vec<FunctionArgument>,
        return_type: Box<Node>,
        body: Box<Compound>,
        location: Location,
    },
    /// `@(args) { }` initializer or `~() { }` destructor inside a struct body.
    StructInitializer {
        arguments: Vec<FunctionArgument>,
        body: Box<Compound>,
        is_destructor: bool,
        location: Location,
    },

    // Types
    Type {
        kind: TokenKind,
        name: String,
        is_pointer: bool,
        is_array: bool,
        is_optional: bool,
        is_throwing: bool,
        template_arguments: Vec<Node>,
        location: Location,
    },
    FirstClassFunctionType(FirstClassFunction),

    // Statements
    If {
        condition: Box<Node>,
        body: Box<Compound>,
        else_if_conditions: Vec<Node>,
        else_if_bodies: Vec<Compound>,
        else_body: Option<Box<Compound>>,
        location: Location,
    },
    WhileLoop {
        condition: Box<Node>,
        body: Box<Compound>,
        location: Location,
    },
    ForLoop {
        init: Box<Node>,
        condition: Box<Node>,
        increment: Box<Node>,
        body: Box<Compound>,
        location: Location,
    },
    RangeBasedForLoop {
        binding: Box<Node>,
        iterable: Box<Node>,
        index_binding: Option<Box<Node>>,
        body: Box<Compound>,
        location: Location,
    },
    Return {
        value: Option<Box<Node>>,
        /// `throw expr` shares the shape of `return expr`.
        is_throw: bool,
        location: Location,
    },
    SwitchStatement {
        expression: Box<Node>,
        cases: Vec<SwitchCase>,
        location: Location,
    },
    DoCatch {
        do_body: Box<Compound>,
        catch_expression: Option<Box<Node>>,
        catch_body: Box<Compound>,
        location: Location,
    },
    GotoOrLabel {
        label: String,
        /// `goto name` jump vs. `name:` label definition.
        is_goto: bool,
        location: Location,
    },
    InlineAssembly {
        instructions: Vec<String>,
        location: Location,
    },
    Break {
        location: Location,
    },
    Continue {
        location: Location,
    },

    // Expressions
    Binary {
        left: Box<Node>,
        operator: TokenKind,
        right: Box<Node>,
        location: Location,
    },
    Unary {
        operator: TokenKind,
        operand: Box<Node>,
        location: Location,
    },
    Grouping {
        expression: Box<Node>,
        location: Location,
    },
    Literal {
        kind: LiteralKind,
        value: String,
        location: Location,
    },
    Assign {
        target: Box<Node>,
        value: Box<Node>,
        location: Location,
    },
    Range {
        from: Box<Node>,
        to: Box<Node>,
        location: Location,
    },
    Call {
        callee: String,
        arguments: Vec<CallArgument>,
        template_arguments: Vec<Node>,
        location: Location,
    },
    MemberAccess {
        receiver: Box<Node>,
        member: Box<Node>,
        location: Location,
    },
    ArrayAccess {
        base: Box<Node>,
        index: Box<Node>,
        location: Location,
    },
    ArrayLiteral {
        elements: Vec<Node>,
        location: Location,
    },
    /// `receiver.init(args)` / `Type.init(args)` / `.deinit()` call.
    InitializerCall {
        receiver: Option<String>,
        arguments: Vec<CallArgument>,
        is_deinit: bool,
        location: Location,
    },
    /// Leading-dot enum case shorthand: `.caseName`.
    EnumCaseAccess {
        name: String,
        location: Location,
    },
    CastExpression {
        value: Box<Node>,
        target_type: Box<Node>,
        /// `cast!` asserts; `cast?` yields an optional.
        is_force: bool,
        location: Location,
    },
    TryExpression {
        value: Box<Node>,
        is_force: bool,
        is_optional: bool,
        location: Location,
    },
    Ternary {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
        location: Location,
    },
    /// `expr ?? fallback`.
    OptionalUnwrap {
        value: Box<Node>,
        fallback: Box<Node>,
        location: Location,
    },
    /// `expr!`.
    ForceUnwrap {
        value: Box<Node>,
        location: Location,
    },
}

impl Node {
    /// Source location of the token that introduced this node.
    pub fn location(&self) -> Location {
        match self {
            Node::Compound(compound) => compound.location,
            Node::Import { location, .. }
            | Node::StructDeclaration { location, .. }
            | Node::EnumDeclaration { location, .. }
            | Node::FunctionDeclaration { location, .. }
            | Node::VariableDeclaration { location, .. }
            | Node::Typealias { location, .. }
            | Node::OperatorOverload { location, .. }
            | Node::StructInitializer { location, .. }
            | Node::Type { location, .. }
            | Node::If { location, .. }
            | Node::WhileLoop { location, .. }
            | Node::ForLoop { location, .. }
            | Node::RangeBasedForLoop { location, .. }
            | Node::Return { location, .. }
            | Node::SwitchStatement { location, .. }
            | Node::DoCatch { location, .. }
            | Node::GotoOrLabel { location, .. }
            | Node::InlineAssembly { location, .. }
            | Node::Break { location }
            | Node::Continue { location }
            | Node::Binary { location, .. }
            | Node::Unary { location, .. }
            | Node::Grouping { location, .. }
            | Node::Literal { location, .. }
            | Node::Assign { location, .. }
            | Node::Range { location, .. }
            | Node::Call { location, .. }
            | Node::MemberAccess { location, .. }
            | Node::ArrayAccess { location, .. }
            | Node::ArrayLiteral { location, .. }
            | Node::InitializerCall { location, .. }
            | Node::EnumCaseAccess { location, .. }
            | Node::CastExpression { location, .. }
            | Node::TryExpression { location, .. }
            | Node::Ternary { location, .. }
            | Node::OptionalUnwrap { location, .. }
            | Node::ForceUnwrap { location, .. } => *location,
            Node::FirstClassFunctionType(function) => function.location,
        }
    }

    /// The declared name, for nodes that introduce one into their scope.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Node::StructDeclaration { name, .. }
            | Node::EnumDeclaration { name, .. }
            | Node::FunctionDeclaration { name, .. }
            | Node::VariableDeclaration { name, .. }
            | Node::Typealias { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_accessor() {
        let node = Node::Break {
            location: Location::new(3, 7),
        };
        assert_eq!(node.location(), Location::new(3, 7));

        let compound = Node::Compound(Compound {
            statements: vec![],
            first_class_function: None,
            location: Location::new(1, 1),
        });
        assert_eq!(compound.location(), Location::new(1, 1));
    }

    #[test]
    fn test_declared_name() {
        let node = Node::VariableDeclaration {
            name: "x".into(),
            var_type: None,
            value: None,
            qualifiers: vec![],
            is_constant: false,
            location: Location::new(1, 1),
        };
        assert_eq!(node.declared_name(), Some("x"));
        assert_eq!(
            Node::Break {
                location: Location::new(1, 1)
            }
            .declared_name(),
            None
        );
    }
}
