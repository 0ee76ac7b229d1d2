//! Expression parsing
//!
//! Precedence climbing for binary operators (assignment, equality and logic,
//! comparison, additive, multiplicative, unary) over a primary grammar that
//! resolves calls, member access, indexing, ranges, ternaries, unwraps,
//! casts, and `try` with one token of lookahead and single-token pushback.

use crate::parser::ast::{CallArgument, LiteralKind, Node};
use crate::parser::parse::{Ctx, ParseError, Parser};
use crate::parser::token::{Token, TokenKind};

impl<'s, 'd> Parser<'s, 'd> {
    /// Entry point: assignment is right-associative and sits above the
    /// binary operator ladder.
    pub(crate) fn expression(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let expr = self.equality(ctx)?;

        if self.current().kind == TokenKind::Equal {
            let location = self.current_location();
            self.advance();
            let value = self.expression(ctx)?;
            return Ok(Node::Assign {
                target: Box::new(expr),
                value: Box::new(value),
                location,
            });
        }

        Ok(expr)
    }

    fn equality(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let mut expr = self.comparison(ctx)?;

        while self.current().kind.is_equality_op() {
            let location = self.current_location();
            let operator = self.kind_and_advance();
            let right = self.comparison(ctx)?;
            expr = Node::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let mut expr = self.additive(ctx)?;

        while self.current().kind.is_comparison_op() {
            let location = self.current_location();
            let operator = self.kind_and_advance();
            let right = self.additive(ctx)?;
            expr = Node::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn additive(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let mut expr = self.multiplicative(ctx)?;

        while self.current().kind.is_additive_op() {
            let location = self.current_location();
            let operator = self.kind_and_advance();
            let right = self.multiplicative(ctx)?;
            expr = Node::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn multiplicative(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let mut expr = self.unary(ctx)?;

        while self.current().kind.is_multiplicative_op() {
            let location = self.current_location();
            let operator = self.kind_and_advance();
            let right = self.unary(ctx)?;
            expr = Node::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn unary(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        if self.current().kind.is_unary_op() {
            let location = self.current_location();
            let operator = self.kind_and_advance();
            let operand = self.unary(ctx)?;
            return Ok(Node::Unary {
                operator,
                operand: Box::new(operand),
                location,
            });
        }

        self.primary(ctx)
    }

    pub(crate) fn primary(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let current = self.current();

        if current.kind == TokenKind::Try {
            return self.try_expression(ctx);
        }
        if current.kind == TokenKind::Cast {
            return self.cast_expression(ctx);
        }

        let is_receiver =
            current.kind == TokenKind::Identifier || current.kind == TokenKind::SelfKw;
        if is_receiver && self.peek().kind == TokenKind::Dot {
            return self.member_access(ctx);
        }
        if current.kind == TokenKind::Identifier && self.peek().kind == TokenKind::LBracket {
            return self.array_access(ctx);
        }

        if current.kind == TokenKind::LBracket {
            return self.array_literal(ctx);
        }
        if current.kind == TokenKind::Dot {
            return self.init_or_enum_case(ctx);
        }

        if current.kind.is_value() {
            return self.value_expression(ctx);
        }

        if self.advance_if(TokenKind::LParen) {
            let location = current.location;
            let expression = self.expression(ctx)?;
            self.advance_expect(
                TokenKind::RParen,
                "expected a closing parenthesis after group expression",
            )?;
            let grouping = Node::Grouping {
                expression: Box::new(expression),
                location,
            };

            // `(a == b) ? x : y` and `(a) ?? b`
            if self.current().kind == TokenKind::Question {
                if self.peek().kind == TokenKind::Question {
                    return self.optional_unwrap(ctx, grouping);
                }
                return self.ternary_expression(ctx, grouping);
            }
            return Ok(grouping);
        }

        Err(ParseError::new(
            format!("invalid expression, found {}", current.kind),
            current.location,
        ))
    }

    /// A literal value and its postfix forms: call, template call, label
    /// definition, range, ternary, `??`, and `!`.
    fn value_expression(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let token = self.current();
        let literal = self.literal_node(token);
        self.advance();

        if self.advance_if(TokenKind::LParen) {
            let callee = token.value(self.source).to_string();
            return self.function_call(ctx, callee, Vec::new(), token);
        }

        if ctx.parses_goto_labels && self.advance_if(TokenKind::Colon) {
            return Ok(Node::GotoOrLabel {
                label: token.value(self.source).to_string(),
                is_goto: false,
                location: token.location,
            });
        }

        if self.current().kind == TokenKind::At {
            let template_arguments = self.template_call_arguments(ctx)?;
            self.advance_expect(
                TokenKind::RParen,
                "expected a ')' after the template arguments",
            )?;
            self.advance_expect(
                TokenKind::LParen,
                "expected a '(' after the template arguments",
            )?;
            let callee = token.value(self.source).to_string();
            return self.function_call(ctx, callee, template_arguments, token);
        }

        if self.current().kind == TokenKind::DotDot {
            let location = self.current_location();
            self.advance();
            let to = self.expression(ctx)?;
            return Ok(Node::Range {
                from: Box::new(literal),
                to: Box::new(to),
                location,
            });
        }

        if self.current().kind == TokenKind::Question {
            if self.peek().kind == TokenKind::Question {
                return self.optional_unwrap(ctx, literal);
            }
            return self.ternary_expression(ctx, literal);
        }

        if self.current().kind == TokenKind::Not {
            let location = self.current_location();
            self.advance();
            return Ok(Node::ForceUnwrap {
                value: Box::new(literal),
                location,
            });
        }

        Ok(literal)
    }

    fn literal_node(&self, token: Token) -> Node {
        let kind = match token.kind {
            TokenKind::Int => LiteralKind::Int,
            TokenKind::Float => LiteralKind::Float,
            TokenKind::Hex => LiteralKind::Hex,
            TokenKind::Octal => LiteralKind::Octal,
            TokenKind::Binary => LiteralKind::Binary,
            TokenKind::String => LiteralKind::String,
            TokenKind::MultilineString => LiteralKind::MultilineString,
            TokenKind::Char => LiteralKind::Char,
            TokenKind::True | TokenKind::False => LiteralKind::Bool,
            TokenKind::Nil => LiteralKind::Nil,
            TokenKind::SelfKw => LiteralKind::SelfValue,
            _ => LiteralKind::Identifier,
        };
        Node::Literal {
            kind,
            value: token.value(self.source).to_string(),
            location: token.location,
        }
    }

    /// `receiver.member`, with `receiver.init(...)` and `receiver.deinit()`
    /// resolved here. Anything else after the dot is pushed back and parsed
    /// as the member expression.
    fn member_access(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let receiver_token = self.current();
        let receiver = self.literal_node(receiver_token);
        self.advance();
        self.advance_expect(TokenKind::Dot, "expected a '.' in member access")?;

        if self.current().kind == TokenKind::Identifier {
            let member_text = self.current().value(self.source);

            if member_text == "init" {
                self.advance();
                self.advance_expect(
                    TokenKind::LParen,
                    "expected the initializer to have arguments",
                )?;
                let arguments = self.call_arguments(ctx)?;
                self.advance_expect(TokenKind::RParen, "expected a ')' after the initializer")?;
                return Ok(Node::InitializerCall {
                    receiver: Some(receiver_token.value(self.source).to_string()),
                    arguments,
                    is_deinit: false,
                    location: receiver_token.location,
                });
            }

            if member_text == "deinit" {
                self.advance();
                self.advance_expect(
                    TokenKind::LParen,
                    "expected a '(' after the deinitializer",
                )?;
                self.advance_expect(
                    TokenKind::RParen,
                    "expected a ')' after the deinitializer",
                )?;
                return Ok(Node::InitializerCall {
                    receiver: Some(receiver_token.value(self.source).to_string()),
                    arguments: Vec::new(),
                    is_deinit: true,
                    location: receiver_token.location,
                });
            }
        }

        let member = self.expression(ctx)?;

        Ok(Node::MemberAccess {
            receiver: Box::new(receiver),
            member: Box::new(member),
            location: receiver_token.location,
        })
    }

    /// `.caseName` enum shorthand or `.init(...)` on an inferred receiver.
    fn init_or_enum_case(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let name = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected an identifier after '.'",
        )?;

        if name == "init" {
            self.advance_expect(
                TokenKind::LParen,
                "expected the initializer to have arguments",
            )?;
            let arguments = self.call_arguments(ctx)?;
            self.advance_expect(TokenKind::RParen, "expected a ')' after the initializer")?;
            return Ok(Node::InitializerCall {
                receiver: None,
                arguments,
                is_deinit: false,
                location,
            });
        }

        Ok(Node::EnumCaseAccess {
            name: name.to_string(),
            location,
        })
    }

    /// The argument list is already open; on return the closing parenthesis
    /// has been consumed and any `.member` or `[index]` postfix applied.
    fn function_call(
        &mut self,
        ctx: Ctx,
        callee: String,
        template_arguments: Vec<Node>,
        token: Token,
    ) -> Result<Node, ParseError> {
        let arguments = self.call_arguments(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "expected a closing parenthesis after function call",
        )?;

        let call = Node::Call {
            callee,
            arguments,
            template_arguments,
            location: token.location,
        };

        if self.advance_if(TokenKind::Dot) {
            let member = self.expression(ctx)?;
            return Ok(Node::MemberAccess {
                receiver: Box::new(call),
                member: Box::new(member),
                location: token.location,
            });
        }
        if self.advance_if(TokenKind::LBracket) {
            let index = self.expression(ctx)?;
            self.advance_expect(TokenKind::RBracket, "expected a ']' after array access")?;
            return Ok(Node::ArrayAccess {
                base: Box::new(call),
                index: Box::new(index),
                location: token.location,
            });
        }

        Ok(call)
    }

    /// Call-site arguments: positional expressions, `name: value` labels
    /// (no positional arguments after the first label), and `!{ ... }`
    /// trailing-closure bodies.
    fn call_arguments(&mut self, ctx: Ctx) -> Result<Vec<CallArgument>, ParseError> {
        let argument_ctx = Ctx {
            parses_goto_labels: false,
            ..ctx
        };
        let mut arguments = Vec::new();
        let mut seen_named = false;

        while self.current().kind != TokenKind::RParen && self.current().kind != TokenKind::Eof {
            if self.advance_if(TokenKind::Not) {
                if self.current().kind != TokenKind::LBrace {
                    // not a closure argument; reparse the '!' as part of an
                    // ordinary expression
                    self.step_back();
                } else {
                    self.advance();
                    let body = self.compound(Ctx {
                        inside_function_body: true,
                        ..argument_ctx
                    })?;
                    self.advance_expect(TokenKind::RBrace, "the closure argument must be closed")?;
                    arguments.push(CallArgument {
                        name: None,
                        value: Node::Compound(body),
                    });
                    self.advance_if(TokenKind::Comma);
                    continue;
                }
            }

            if self.current().kind == TokenKind::Identifier
                && self.peek().kind == TokenKind::Colon
            {
                let name = self.value_and_advance().to_string();
                self.advance();
                let value = self.expression(argument_ctx)?;
                seen_named = true;
                arguments.push(CallArgument {
                    name: Some(name),
                    value,
                });
            } else {
                if seen_named {
                    return Err(ParseError::new(
                        "cannot use an unnamed argument after a named argument",
                        self.current_location(),
                    ));
                }
                let value = self.expression(argument_ctx)?;
                arguments.push(CallArgument { name: None, value });
            }

            self.advance_if(TokenKind::Comma);
        }

        Ok(arguments)
    }

    /// `name[index]` where `name` is a plain identifier.
    fn array_access(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let token = self.current();
        let base = self.literal_node(token);
        self.advance();
        self.advance_expect(TokenKind::LBracket, "expected a '[' in array access")?;
        let index = self.expression(ctx)?;
        self.advance_expect(TokenKind::RBracket, "expected a ']' after array access")?;

        Ok(Node::ArrayAccess {
            base: Box::new(base),
            index: Box::new(index),
            location: token.location,
        })
    }

    /// `[a, b, c]`.
    fn array_literal(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let mut elements = Vec::new();
        while self.current().kind != TokenKind::RBracket && self.current().kind != TokenKind::Eof {
            elements.push(self.expression(ctx)?);
            self.advance_if(TokenKind::Comma);
        }
        self.advance_expect(TokenKind::RBracket, "expected a ']' after array literal")?;

        Ok(Node::ArrayLiteral { elements, location })
    }

    /// `try expr`, `try? expr`, `try! expr`.
    fn try_expression(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let is_optional = self.advance_if(TokenKind::Question);
        let is_force = !is_optional && self.advance_if(TokenKind::Not);
        let value = self.expression(ctx)?;

        Ok(Node::TryExpression {
            value: Box::new(value),
            is_force,
            is_optional,
            location,
        })
    }

    /// `cast!(value, type)` / `cast?(value, type)`; the bare form is
    /// rejected.
    fn cast_expression(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let is_force = if self.advance_if(TokenKind::Question) {
            false
        } else if self.advance_if(TokenKind::Not) {
            true
        } else {
            return Err(ParseError::new(
                "the cast expression must be forced or optional",
                self.current_location(),
            ));
        };

        self.advance_expect(TokenKind::LParen, "the cast expression must have a '('")?;
        let value = self.expression(ctx)?;
        self.advance_expect(
            TokenKind::Comma,
            "the cast expression must have a comma after the value",
        )?;
        let target_type = self.type_expression(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "expected a ')' at the end of the cast expression",
        )?;

        Ok(Node::CastExpression {
            value: Box::new(value),
            target_type: Box::new(target_type),
            is_force,
            location,
        })
    }

    /// `condition ? a : b`. Both branches use the statement grammar, so
    /// `x ? return a : return b` parses.
    fn ternary_expression(&mut self, ctx: Ctx, condition: Node) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let branch_ctx = Ctx {
            parses_goto_labels: false,
            ..ctx
        };
        let then_branch = self.statement(branch_ctx)?;
        self.advance_expect(TokenKind::Colon, "expected a ':' in the ternary expression")?;
        let else_branch = self.statement(branch_ctx)?;

        Ok(Node::Ternary {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            location,
        })
    }

    /// `value ?? fallback`.
    fn optional_unwrap(&mut self, ctx: Ctx, value: Node) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();
        self.advance();

        let fallback = self.expression(ctx)?;

        Ok(Node::OptionalUnwrap {
            value: Box::new(value),
            fallback: Box::new(fallback),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Compound;
    use crate::diagnostics::DiagnosticSink;

    fn parse(source: &str) -> Result<Compound, ParseError> {
        let mut sink = DiagnosticSink::new("test.veld");
        Parser::new(source, &mut sink).parse()
    }

    fn first_expression(source: &str) -> Node {
        parse(source).unwrap().statements.remove(0)
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 => 1 + (2 * 3)
        match first_expression("1 + 2 * 3") {
            Node::Binary {
                operator, right, ..
            } => {
                assert_eq!(operator, TokenKind::Plus);
                match *right {
                    Node::Binary { operator, .. } => assert_eq!(operator, TokenKind::Star),
                    other => panic!("unexpected rhs: {:?}", other),
                }
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_same_precedence_associates_left() {
        // 1 - 2 - 3 => (1 - 2) - 3
        match first_expression("1 - 2 - 3") {
            Node::Binary { left, right, .. } => {
                assert!(matches!(*left, Node::Binary { .. }));
                assert!(matches!(*right, Node::Literal { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_comparison_binds_tighter_than_logic() {
        // a < b && c > d => (a < b) && (c > d)
        match first_expression("a < b && c > d") {
            Node::Binary {
                operator,
                left,
                right,
                ..
            } => {
                assert_eq!(operator, TokenKind::AmpAmp);
                assert!(matches!(*left, Node::Binary { .. }));
                assert!(matches!(*right, Node::Binary { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_unary_chain() {
        match first_expression("-~x") {
            Node::Unary {
                operator, operand, ..
            } => {
                assert_eq!(operator, TokenKind::Minus);
                assert!(matches!(*operand, Node::Unary { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match first_expression("a = b = 1") {
            Node::Assign { value, .. } => {
                assert!(matches!(*value, Node::Assign { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_member_call_and_index_chaining() {
        // items.get(0)[1]
        match first_expression("items.get(0)[1]") {
            Node::MemberAccess { member, .. } => match *member {
                Node::ArrayAccess { base, .. } => {
                    assert!(matches!(*base, Node::Call { .. }));
                }
                other => panic!("unexpected member: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_call_with_named_arguments() {
        match first_expression("resize(width: 10, height: 20)") {
            Node::Call { arguments, .. } => {
                assert_eq!(arguments.len(), 2);
                assert_eq!(arguments[0].name.as_deref(), Some("width"));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_positional_after_named_argument_is_fatal() {
        let error = parse("resize(width: 10, 20)").unwrap_err();
        assert_eq!(
            error.message,
            "cannot use an unnamed argument after a named argument"
        );
    }

    #[test]
    fn test_closure_argument() {
        match first_expression("each(items, !{\n    var x = 1\n})") {
            Node::Call { arguments, .. } => {
                assert_eq!(arguments.len(), 2);
                assert!(matches!(arguments[1].value, Node::Compound(_)));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_negated_call_argument_is_not_a_closure() {
        match first_expression("check(!flag)") {
            Node::Call { arguments, .. } => {
                assert!(matches!(arguments[0].value, Node::Unary { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_template_call_arguments() {
        match first_expression("make@(i32, string)(1, \"a\")") {
            Node::Call {
                template_arguments,
                arguments,
                ..
            } => {
                assert_eq!(template_arguments.len(), 2);
                assert_eq!(arguments.len(), 2);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_range_expression() {
        match first_expression("var r = 3..5") {
            Node::VariableDeclaration { value, .. } => {
                assert!(matches!(*value.unwrap(), Node::Range { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_init_and_deinit_calls() {
        match first_expression("file.init(\"a.txt\")") {
            Node::InitializerCall {
                receiver,
                is_deinit,
                ..
            } => {
                assert_eq!(receiver.as_deref(), Some("file"));
                assert!(!is_deinit);
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match first_expression("file.deinit()") {
            Node::InitializerCall { is_deinit, .. } => assert!(is_deinit),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_enum_case_shorthand() {
        match first_expression("var c = .red") {
            Node::VariableDeclaration { value, .. } => match *value.unwrap() {
                Node::EnumCaseAccess { name, .. } => assert_eq!(name, "red"),
                other => panic!("unexpected value: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_cast_forms() {
        match first_expression("var x = cast!(value, i32)") {
            Node::VariableDeclaration { value, .. } => match *value.unwrap() {
                Node::CastExpression { is_force, .. } => assert!(is_force),
                other => panic!("unexpected value: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
        let error = parse("var x = cast(value, i32)").unwrap_err();
        assert_eq!(error.message, "the cast expression must be forced or optional");
    }

    #[test]
    fn test_try_forms() {
        match first_expression("var x = try? open()") {
            Node::VariableDeclaration { value, .. } => match *value.unwrap() {
                Node::TryExpression {
                    is_optional,
                    is_force,
                    ..
                } => {
                    assert!(is_optional);
                    assert!(!is_force);
                }
                other => panic!("unexpected value: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_ternary_with_statement_branches() {
        // the ternary attaches to the right operand of '=='
        match first_expression("x == 1 ? return a : return b") {
            Node::Binary { right, .. } => match *right {
                Node::Ternary {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    assert!(matches!(*then_branch, Node::Return { .. }));
                    assert!(matches!(*else_branch, Node::Return { .. }));
                }
                other => panic!("unexpected rhs: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_grouped_condition_ternary() {
        match first_expression("(a && b) ? x : y") {
            Node::Ternary { condition, .. } => {
                assert!(matches!(*condition, Node::Grouping { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_optional_and_force_unwrap() {
        match first_expression("var x = maybe ?? 40") {
            Node::VariableDeclaration { value, .. } => {
                assert!(matches!(*value.unwrap(), Node::OptionalUnwrap { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match first_expression("var x = maybe!") {
            Node::VariableDeclaration { value, .. } => {
                assert!(matches!(*value.unwrap(), Node::ForceUnwrap { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_array_literal() {
        match first_expression("var xs = [1, 2, 3]") {
            Node::VariableDeclaration { value, .. } => match *value.unwrap() {
                Node::ArrayLiteral { elements, .. } => assert_eq!(elements.len(), 3),
                other => panic!("unexpected value: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_expression_is_fatal() {
        let error = parse("var x = ,").unwrap_err();
        assert!(error.message.starts_with("invalid expression"));
    }
}
