//! Declaration parsing
//!
//! Imports, structs and unions, enums, functions, variables and constants,
//! typealiases, operator overloads, struct initializers and destructors, plus
//! the shared signature grammar: function arguments, template clauses, and
//! type expressions.

use crate::parser::ast::{
    EnumCase, FirstClassFunction, FunctionArgument, LiteralKind, Node, Qualifier,
    TemplateDeclaration, TemplateParameter,
};
use crate::parser::parse::{Ctx, ParseError, Parser};
use crate::parser::token::TokenKind;

impl<'s, 'd> Parser<'s, 'd> {
    /// `import "path/to/file.veld"` or `import io`.
    pub(crate) fn import(&mut self) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let (path, is_library) = match self.current().kind {
            TokenKind::String => (self.value_and_advance(), false),
            TokenKind::Identifier => (self.value_and_advance(), true),
            _ => {
                return Err(ParseError::new(
                    "expected a string literal or a library name after import",
                    self.current_location(),
                ))
            }
        };

        Ok(Node::Import {
            path: path.to_string(),
            is_library,
            location,
        })
    }

    /// `struct Name @(any T) { ... }` or `union Name { ... }`. Struct fields
    /// may be declared without initializers.
    pub(crate) fn struct_declaration(
        &mut self,
        ctx: Ctx,
        qualifiers: Vec<Qualifier>,
    ) -> Result<Node, ParseError> {
        let location = self.current_location();
        let is_union = self.current().kind == TokenKind::Union;
        self.advance();

        let name = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected a struct or a union name after declaration",
        )?;

        let template = if !is_union && self.current().kind == TokenKind::At {
            Some(self.template_declaration()?)
        } else {
            None
        };

        self.advance_expect(TokenKind::LBrace, "the struct declaration must have a body")?;
        let body = self.compound(Ctx {
            allow_uninitialized: true,
            ..ctx
        })?;
        self.advance_expect(TokenKind::RBrace, "the struct body must be closed")?;

        Ok(Node::StructDeclaration {
            name: name.to_string(),
            qualifiers,
            template,
            body: Box::new(body),
            is_union,
            location,
        })
    }

    /// `@(args) { ... }` initializer declaration inside a struct body.
    pub(crate) fn struct_initializer_declaration(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(TokenKind::LParen, "expected the initializer to have arguments")?;
        let arguments = self.function_arguments(ctx)?;
        self.advance_expect(TokenKind::RParen, "expected a ')' after the initializer")?;

        self.advance_expect(TokenKind::LBrace, "expected a body after the struct initializer")?;
        let body = self.compound(Ctx {
            inside_function_body: true,
            ..ctx
        })?;
        self.advance_expect(TokenKind::RBrace, "the struct initializer body must be closed")?;

        Ok(Node::StructInitializer {
            arguments,
            body: Box::new(body),
            is_destructor: false,
            location,
        })
    }

    /// `~() { ... }` destructor declaration. A `~` not followed by `(` is
    /// pushed back and reparsed as a unary expression.
    pub(crate) fn struct_destructor_declaration(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        if !self.advance_if(TokenKind::LParen) {
            self.step_back();
            return self.expression(ctx);
        }
        self.advance_expect(TokenKind::RParen, "expected a ')' after the destructor")?;

        self.advance_expect(TokenKind::LBrace, "the destructor must have a body")?;
        let body = self.compound(Ctx {
            inside_function_body: true,
            ..ctx
        })?;
        self.advance_expect(TokenKind::RBrace, "the destructor body must be closed")?;

        Ok(Node::StructInitializer {
            arguments: Vec::new(),
            body: Box::new(body),
            is_destructor: true,
            location,
        })
    }

    /// `enum Name { caseA, caseB = 4, caseC }`.
    pub(crate) fn enum_declaration(
        &mut self,
        ctx: Ctx,
        qualifiers: Vec<Qualifier>,
    ) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let name = self.expect_value_and_advance(TokenKind::Identifier, "expected an enum name")?;

        self.advance_expect(TokenKind::LBrace, "the enum must have a body")?;
        self.advance_newlines();
        let cases = self.enum_cases(ctx)?;
        self.advance_expect(TokenKind::RBrace, "the enum body must be closed")?;

        Ok(Node::EnumDeclaration {
            name: name.to_string(),
            cases,
            qualifiers,
            location,
        })
    }

    /// Implicit case values track the case position, even next to explicit
    /// `= value` overrides.
    fn enum_cases(&mut self, ctx: Ctx) -> Result<Vec<EnumCase>, ParseError> {
        let mut cases = Vec::new();

        let mut ordinal = 0u32;
        while self.current().kind != TokenKind::RBrace && self.current().kind != TokenKind::Eof {
            let case_location = self.current_location();
            let name = self
                .expect_value_and_advance(TokenKind::Identifier, "the enum case must have a name")?;

            let (value, is_explicit) = if self.advance_if(TokenKind::Equal) {
                (self.expression(ctx)?, true)
            } else {
                let implicit = Node::Literal {
                    kind: LiteralKind::Int,
                    value: ordinal.to_string(),
                    location: case_location,
                };
                (implicit, false)
            };

            cases.push(EnumCase {
                name: name.to_string(),
                value: Box::new(value),
                is_explicit,
                location: case_location,
            });

            ordinal += 1;
            self.advance_if(TokenKind::Comma);
            self.advance_newlines();
        }

        Ok(cases)
    }

    /// `func name(args): type @(any T) { ... }`, or a prototype without a
    /// body. `func operator...` routes to the overload grammar.
    pub(crate) fn function_declaration(
        &mut self,
        ctx: Ctx,
        qualifiers: Vec<Qualifier>,
    ) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        if self.current().kind == TokenKind::Operator {
            return self.operator_overload(ctx);
        }

        let name =
            self.expect_value_and_advance(TokenKind::Identifier, "functions must have a name")?;

        self.advance_expect(TokenKind::LParen, "functions must have arguments")?;
        let arguments = self.function_arguments(ctx)?;
        self.advance_expect(TokenKind::RParen, "the function arguments must be closed")?;

        let return_type = if self.advance_if(TokenKind::Colon) {
            Some(Box::new(self.type_expression(ctx)?))
        } else {
            None
        };

        let template = if self.current().kind == TokenKind::At {
            Some(self.template_declaration()?)
        } else {
            None
        };

        if self.advance_if(TokenKind::LBrace) {
            let body = self.compound(Ctx {
                inside_function_body: true,
                ..ctx
            })?;
            self.advance_expect(TokenKind::RBrace, "the function body must be closed")?;

            return Ok(Node::FunctionDeclaration {
                name: name.to_string(),
                qualifiers,
                arguments,
                return_type,
                template,
                body: Some(Box::new(body)),
                location,
            });
        }

        if template.is_some() {
            return Err(ParseError::new(
                "a function without a body cannot have a template",
                location,
            ));
        }

        Ok(Node::FunctionDeclaration {
            name: name.to_string(),
            qualifiers,
            arguments,
            return_type,
            template: None,
            body: None,
            location,
        })
    }

    /// `var name: type = value` / `let name = value`. The initializer is
    /// required unless the context allows uninitialized declarations.
    pub(crate) fn variable_declaration(
        &mut self,
        ctx: Ctx,
        qualifiers: Vec<Qualifier>,
        is_constant: bool,
    ) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let name = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected a variable or constant name",
        )?;

        let mut var_type = None;
        let mut value = None;

        if self.advance_if(TokenKind::Equal) {
            value = Some(Box::new(self.expression(ctx)?));
        } else if self.advance_if(TokenKind::Colon) {
            var_type = Some(Box::new(self.type_expression(ctx)?));
            if self.advance_if(TokenKind::Equal) {
                value = Some(Box::new(self.expression(ctx)?));
            }
        } else {
            return Err(ParseError::new(
                "expected ':' or '=' after a variable or constant declaration",
                self.current_location(),
            ));
        }

        if !ctx.allow_uninitialized && value.is_none() {
            return Err(ParseError::new(
                "uninitialized variable or constant declaration",
                location,
            ));
        }

        Ok(Node::VariableDeclaration {
            name: name.to_string(),
            var_type,
            value,
            qualifiers,
            is_constant,
            location,
        })
    }

    /// `func operator+(other: i32): i32 { ... }`. Only operator tokens are
    /// allowed between `operator` and the argument list.
    fn operator_overload(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let mut operators = Vec::new();
        while self.current().kind != TokenKind::LParen {
            if !self.current().kind.is_overloadable_op() {
                return Err(ParseError::new(
                    format!("{} cannot be overloaded", self.current().kind),
                    self.current_location(),
                ));
            }
            operators.push(self.kind_and_advance());
        }

        self.advance_expect(TokenKind::LParen, "expected a '(' after the operator overload")?;
        let arguments = self.function_arguments(ctx)?;
        self.advance_expect(TokenKind::RParen, "expected a ')' after the operator overload")?;

        self.advance_expect(TokenKind::Colon, "expected a ':' after the operator overload")?;
        let return_type = self.type_expression(ctx)?;

        self.advance_expect(TokenKind::LBrace, "expected a body after the operator overload")?;
        let body = self.compound(Ctx {
            inside_function_body: true,
            ..ctx
        })?;
        self.advance_expect(TokenKind::RBrace, "the operator overload body must be closed")?;

        Ok(Node::OperatorOverload {
            operators,
            arguments,
            return_type: Box::new(return_type),
            body: Box::new(body),
            location,
        })
    }

    /// `typealias Name = type`.
    pub(crate) fn typealias(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let name = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected a type name after the typealias",
        )?;
        self.advance_expect(TokenKind::Equal, "expected a type after the typealias")?;
        let value = self.type_expression(ctx)?;

        Ok(Node::Typealias {
            name: name.to_string(),
            value: Box::new(value),
            location,
        })
    }

    /// A run of `extern` / `volatile` / `private` followed by the declaration
    /// they qualify.
    pub(crate) fn qualifier_statement(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let mut qualifiers = Vec::new();
        while self.current().kind.is_qualifier() {
            let qualifier = match self.current().kind {
                TokenKind::Extern => Qualifier::Extern,
                TokenKind::Volatile => Qualifier::Volatile,
                _ => Qualifier::Private,
            };
            qualifiers.push(qualifier);
            self.advance();
        }

        match self.current().kind {
            TokenKind::Enum => self.enum_declaration(ctx, qualifiers),
            TokenKind::Struct | TokenKind::Union => self.struct_declaration(ctx, qualifiers),
            TokenKind::Var => self.variable_declaration(ctx, qualifiers, false),
            TokenKind::Let => self.variable_declaration(ctx, qualifiers, true),
            TokenKind::Func => self.function_declaration(ctx, qualifiers),
            _ => Err(ParseError::new(
                "expected an enum, struct, function, or variable after qualifiers",
                self.current_location(),
            )),
        }
    }

    /// Signature argument list: `name: type`, bare types, `let` constants,
    /// `name = default`, and a trailing `...name` variadic. Once one argument
    /// has a default value, all later ones must too.
    pub(crate) fn function_arguments(
        &mut self,
        ctx: Ctx,
    ) -> Result<Vec<FunctionArgument>, ParseError> {
        let mut arguments = Vec::new();
        let mut seen_default = false;

        while self.current().kind != TokenKind::RParen && self.current().kind != TokenKind::Eof {
            let location = self.current_location();
            let is_constant = self.advance_if(TokenKind::Let);

            if self.advance_if(TokenKind::DotDot) {
                self.advance_expect(TokenKind::Dot, "expected '...' for a variadic argument")?;
                let name = self.expect_value_and_advance(
                    TokenKind::Identifier,
                    "expected a variadic argument name",
                )?;
                arguments.push(FunctionArgument {
                    name: Some(name.to_string()),
                    ty: None,
                    default_value: None,
                    is_vararg: true,
                    is_constant,
                    location,
                });
                break;
            }

            let mut name = None;
            let mut ty = None;
            let mut default_value = None;
            if self.current().kind == TokenKind::Identifier {
                name = Some(self.value_and_advance().to_string());
                if self.advance_if(TokenKind::Colon) {
                    ty = Some(Box::new(self.type_expression(ctx)?));
                }
                if self.advance_if(TokenKind::Equal) {
                    seen_default = true;
                    default_value = Some(Box::new(self.expression(ctx)?));
                }
            } else {
                ty = Some(Box::new(self.type_expression(ctx)?));
            }

            if seen_default && default_value.is_none() {
                return Err(ParseError::new(
                    "an argument without a default value cannot follow one with a default value",
                    location,
                ));
            }

            arguments.push(FunctionArgument {
                name,
                ty,
                default_value,
                is_vararg: false,
                is_constant,
                location,
            });

            if !self.advance_if(TokenKind::Comma) {
                break;
            }
        }

        Ok(arguments)
    }

    /// `@(any T, struct S)` template clause on a declaration.
    pub(crate) fn template_declaration(&mut self) -> Result<TemplateDeclaration, ParseError> {
        let location = self.current_location();
        self.advance();
        self.advance_expect(TokenKind::LParen, "expected a '(' after the template clause")?;

        let mut parameters = Vec::new();
        while self.current().kind != TokenKind::RParen && self.current().kind != TokenKind::Eof {
            if !self.current().kind.is_template_keyword() {
                return Err(ParseError::new(
                    format!("{} is not a valid template parameter type", self.current().kind),
                    self.current_location(),
                ));
            }
            let parameter_location = self.current_location();
            let kind = self.kind_and_advance();
            let name = self.expect_value_and_advance(
                TokenKind::Identifier,
                "expected a template parameter name",
            )?;
            parameters.push(TemplateParameter {
                kind,
                name: name.to_string(),
                location: parameter_location,
            });

            if !self.advance_if(TokenKind::Comma) {
                break;
            }
        }
        self.advance_expect(TokenKind::RParen, "expected a ')' after the template clause")?;

        Ok(TemplateDeclaration {
            parameters,
            location,
        })
    }

    /// `@(type, ...)` template arguments at a use site. The caller consumes
    /// the closing parenthesis.
    pub(crate) fn template_call_arguments(&mut self, ctx: Ctx) -> Result<Vec<Node>, ParseError> {
        self.advance_expect(TokenKind::At, "expected a '@' before template arguments")?;
        self.advance_expect(TokenKind::LParen, "expected a '(' before template arguments")?;

        let mut values = Vec::new();
        while self.current().kind != TokenKind::RParen && self.current().kind != TokenKind::Eof {
            values.push(self.type_expression(ctx)?);
            if !self.advance_if(TokenKind::Comma) {
                break;
            }
        }

        Ok(values)
    }

    /// A type expression: builtin or named base, `$` first-class function
    /// types, and the `? * [] ! @(...)` suffix modifiers.
    pub(crate) fn type_expression(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        if self.current().kind == TokenKind::Dollar {
            let function = self.first_class_function(ctx)?;
            return Ok(Node::FirstClassFunctionType(function));
        }

        if !self.current().kind.is_type_start() {
            return Err(ParseError::new(
                format!("expected a type, found {}", self.current().kind),
                self.current_location(),
            ));
        }

        let location = self.current_location();
        let kind = self.current().kind;
        let name = self.value_and_advance().to_string();

        let mut is_pointer = false;
        let mut is_array = false;
        let mut is_optional = false;
        let mut is_throwing = false;
        let mut template_arguments = Vec::new();

        loop {
            match self.current().kind {
                TokenKind::Question => {
                    is_optional = true;
                    self.advance();
                }
                TokenKind::Star => {
                    is_pointer = true;
                    self.advance();
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.advance_expect(TokenKind::RBracket, "expected a ']' in an array type")?;
                    is_array = true;
                }
                TokenKind::Not => {
                    is_throwing = true;
                    self.advance();
                }
                TokenKind::At => {
                    template_arguments = self.template_call_arguments(ctx)?;
                    self.advance_expect(
                        TokenKind::RParen,
                        "expected a ')' after template arguments",
                    )?;
                }
                _ => break,
            }
        }

        Ok(Node::Type {
            kind,
            name,
            is_pointer,
            is_array,
            is_optional,
            is_throwing,
            template_arguments,
            location,
        })
    }

    /// `$ret(args)` first-class function type, or the `$(args)` parameter
    /// clause heading a function-literal body.
    pub(crate) fn first_class_function(
        &mut self,
        ctx: Ctx,
    ) -> Result<FirstClassFunction, ParseError> {
        let location = self.current_location();
        self.advance();

        let (return_type, is_type) = if self.current().kind == TokenKind::LParen {
            (None, false)
        } else {
            (Some(Box::new(self.type_expression(ctx)?)), true)
        };

        self.advance_expect(
            TokenKind::LParen,
            "expected a '(' at the start of a first-class function",
        )?;
        let arguments = self.function_arguments(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "expected a ')' at the end of a first-class function",
        )?;

        Ok(FirstClassFunction {
            return_type,
            arguments,
            is_type,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use crate::parser::ast::Compound;

    fn parse(source: &str) -> Result<Compound, ParseError> {
        let mut sink = DiagnosticSink::new("test.veld");
        Parser::new(source, &mut sink).parse()
    }

    fn first_statement(source: &str) -> Node {
        parse(source).unwrap().statements.remove(0)
    }

    #[test]
    fn test_import_forms() {
        match first_statement("import \"lib/io.veld\"") {
            Node::Import {
                path, is_library, ..
            } => {
                assert_eq!(path, "lib/io.veld");
                assert!(!is_library);
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match first_statement("import io") {
            Node::Import {
                path, is_library, ..
            } => {
                assert_eq!(path, "io");
                assert!(is_library);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_struct_with_uninitialized_fields() {
        let node = first_statement("struct Point {\n    var x: i32\n    var y: i32\n}");
        match node {
            Node::StructDeclaration { name, body, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(body.statements.len(), 2);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_uninitialized_variable_outside_struct_is_fatal() {
        let error = parse("var x: i32").unwrap_err();
        assert_eq!(error.message, "uninitialized variable or constant declaration");
    }

    #[test]
    fn test_struct_template_clause() {
        let node = first_statement("struct Vec @(any T) {\n    var len: usize\n}");
        match node {
            Node::StructDeclaration { template, .. } => {
                let template = template.unwrap();
                assert_eq!(template.parameters.len(), 1);
                assert_eq!(template.parameters[0].name, "T");
                assert_eq!(template.parameters[0].kind, TokenKind::Any);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_enum_ordinals_track_position() {
        let node = first_statement("enum Color {\n    red\n    green = 40\n    blue\n}");
        match node {
            Node::EnumDeclaration { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(!cases[0].is_explicit);
                assert!(cases[1].is_explicit);
                assert!(!cases[2].is_explicit);
                match cases[2].value.as_ref() {
                    Node::Literal { value, .. } => assert_eq!(value, "2"),
                    other => panic!("unexpected case value: {:?}", other),
                }
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_function_with_defaults_and_vararg() {
        let node = first_statement("func fmt(base: i32, width: i32 = 8, ...rest) {\n    return base\n}");
        match node {
            Node::FunctionDeclaration { arguments, .. } => {
                assert_eq!(arguments.len(), 3);
                assert!(arguments[1].default_value.is_some());
                assert!(arguments[2].is_vararg);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_default_argument_ordering_is_enforced() {
        let error = parse("func bad(a: i32 = 1, b: i32) { return a }").unwrap_err();
        assert_eq!(
            error.message,
            "an argument without a default value cannot follow one with a default value"
        );
    }

    #[test]
    fn test_function_prototype_without_body() {
        let node = first_statement("extern func write(fd: i32, buf: string): i64");
        match node {
            Node::FunctionDeclaration {
                qualifiers, body, ..
            } => {
                assert_eq!(qualifiers, vec![Qualifier::Extern]);
                assert!(body.is_none());
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_operator_overload() {
        let node = first_statement("func operator[](offset: f32): i32 {\n    return offset\n}");
        match node {
            Node::OperatorOverload { operators, .. } => {
                assert_eq!(operators, vec![TokenKind::LBracket, TokenKind::RBracket]);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_overload_of_invalid_operator_is_fatal() {
        let error = parse("func operator?(x: i32): i32 { return x }").unwrap_err();
        assert_eq!(error.message, "'?' cannot be overloaded");
    }

    #[test]
    fn test_typealias_takes_a_type() {
        let node = first_statement("typealias Buffer = u8[]");
        match node {
            Node::Typealias { name, value, .. } => {
                assert_eq!(name, "Buffer");
                match *value {
                    Node::Type { is_array, .. } => assert!(is_array),
                    other => panic!("unexpected alias value: {:?}", other),
                }
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_type_modifiers() {
        let node = first_statement("var x: i32*? = nil");
        match node {
            Node::VariableDeclaration { var_type, .. } => match *var_type.unwrap() {
                Node::Type {
                    is_pointer,
                    is_optional,
                    ..
                } => {
                    assert!(is_pointer);
                    assert!(is_optional);
                }
                other => panic!("unexpected type node: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_first_class_function_type() {
        let node = first_statement("var callback: $bool(i32, string) = handler");
        match node {
            Node::VariableDeclaration { var_type, .. } => match *var_type.unwrap() {
                Node::FirstClassFunctionType(function) => {
                    assert!(function.is_type);
                    assert!(function.return_type.is_some());
                    assert_eq!(function.arguments.len(), 2);
                }
                other => panic!("unexpected type node: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_struct_initializer_and_destructor() {
        let source = "struct File {\n    var fd: i32\n    @(path: string) {\n        var x = 1\n    }\n    ~() {\n        var y = 2\n    }\n}";
        let node = first_statement(source);
        match node {
            Node::StructDeclaration { body, .. } => {
                assert_eq!(body.statements.len(), 3);
                match &body.statements[1] {
                    Node::StructInitializer { is_destructor, .. } => assert!(!is_destructor),
                    other => panic!("unexpected node: {:?}", other),
                }
                match &body.statements[2] {
                    Node::StructInitializer { is_destructor, .. } => assert!(*is_destructor),
                    other => panic!("unexpected node: {:?}", other),
                }
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }
}
