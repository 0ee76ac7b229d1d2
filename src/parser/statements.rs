//! Statement parsing
//!
//! The statement dispatcher plus control flow: `if`/`else`, loops, `return`
//! and `throw`, `switch`, `do`/`catch`, `goto`, and inline assembly blocks.

use crate::diagnostics::Location;
use crate::parser::ast::{Compound, LiteralKind, Node, SwitchCase};
use crate::parser::parse::{Ctx, ParseError, Parser};
use crate::parser::token::TokenKind;

impl<'s, 'd> Parser<'s, 'd> {
    /// Dispatch one statement on the current token.
    pub(crate) fn statement(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        match self.current().kind {
            TokenKind::Import => self.import(),
            TokenKind::Enum => self.enum_declaration(ctx, Vec::new()),
            TokenKind::Struct | TokenKind::Union => self.struct_declaration(ctx, Vec::new()),
            TokenKind::Extern | TokenKind::Volatile | TokenKind::Private => {
                self.qualifier_statement(ctx)
            }
            TokenKind::Func => self.function_declaration(ctx, Vec::new()),
            TokenKind::Var => self.variable_declaration(ctx, Vec::new(), false),
            TokenKind::Let => self.variable_declaration(ctx, Vec::new(), true),
            TokenKind::Typealias => self.typealias(ctx),
            TokenKind::For => self.for_loop(ctx),
            TokenKind::While => self.while_loop(ctx),
            TokenKind::Return => self.return_statement(ctx, false),
            TokenKind::Throw => self.return_statement(ctx, true),
            TokenKind::If => self.if_statement(ctx),
            TokenKind::Switch => self.switch_statement(ctx),
            TokenKind::Do => self.do_catch_statement(ctx),
            TokenKind::Goto => self.goto_statement(),
            TokenKind::Asm => self.inline_assembly(),
            TokenKind::Break => {
                let location = self.current_location();
                self.advance();
                Ok(Node::Break { location })
            }
            TokenKind::Continue => {
                let location = self.current_location();
                self.advance();
                Ok(Node::Continue { location })
            }
            TokenKind::At => self.struct_initializer_declaration(ctx),
            TokenKind::Tilde => self.struct_destructor_declaration(ctx),
            TokenKind::Dot
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Cast
            | TokenKind::Try => self.expression(ctx),
            kind if kind.is_value() || kind.is_unary_op() => self.expression(ctx),
            kind => Err(ParseError::new(
                format!("cannot parse {} as a statement", kind),
                self.current_location(),
            )),
        }
    }

    /// `for (init, condition, increment) { }` or a range-based loop when the
    /// header is `name in ...`. Duplicate checking is off for the init and
    /// increment clauses, which reuse the statement grammar.
    pub(crate) fn for_loop(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(TokenKind::LParen, "expected a '(' after the for loop")?;

        if self.peek().kind == TokenKind::In {
            return self.range_based_for_loop(ctx, location);
        }

        let clause_ctx = Ctx {
            check_duplicates: false,
            ..ctx
        };
        let init = self.statement(clause_ctx)?;
        self.advance_expect(TokenKind::Comma, "expected a comma after the for loop's first clause")?;

        let condition = self.expression(clause_ctx)?;
        self.advance_expect(
            TokenKind::Comma,
            "expected a comma after the for loop's second clause",
        )?;

        let increment = self.statement(clause_ctx)?;

        self.advance_expect(TokenKind::RParen, "the for loop's parenthesis must be closed")?;

        self.advance_expect(TokenKind::LBrace, "the for loop must have a body")?;
        let body = self.compound(ctx)?;
        self.advance_expect(TokenKind::RBrace, "the for loop's body must be closed")?;

        Ok(Node::ForLoop {
            init: Box::new(init),
            condition: Box::new(condition),
            increment: Box::new(increment),
            body: Box::new(body),
            location,
        })
    }

    /// `for (item in items) |index| { }`; the cursor sits on the binding
    /// name, the index clause is optional.
    fn range_based_for_loop(&mut self, ctx: Ctx, location: Location) -> Result<Node, ParseError> {
        let binding_location = self.current_location();
        let binding = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected a binding name in a range-based for loop",
        )?;
        let binding = Node::Literal {
            kind: LiteralKind::Identifier,
            value: binding.to_string(),
            location: binding_location,
        };
        self.advance_expect(TokenKind::In, "a range-based for loop must have 'in'")?;

        let iterable = self.expression(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "expected a ')' after the range-based for loop header",
        )?;

        let index_binding = if self.advance_if(TokenKind::Pipe) {
            let index = self.statement(Ctx {
                allow_uninitialized: true,
                ..ctx
            })?;
            self.advance_expect(
                TokenKind::Pipe,
                "expected a closing '|' after the index binding",
            )?;
            Some(Box::new(index))
        } else {
            None
        };

        self.advance_expect(TokenKind::LBrace, "a range-based for loop must have a body")?;
        let body = self.compound(ctx)?;
        self.advance_expect(
            TokenKind::RBrace,
            "the range-based for loop's body must be closed",
        )?;

        Ok(Node::RangeBasedForLoop {
            binding: Box::new(binding),
            iterable: Box::new(iterable),
            index_binding,
            body: Box::new(body),
            location,
        })
    }

    pub(crate) fn while_loop(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(TokenKind::LParen, "the while loop must have a parenthesis")?;
        let condition = self.expression(ctx)?;
        self.advance_expect(TokenKind::RParen, "the while loop's parenthesis must be closed")?;

        self.advance_expect(TokenKind::LBrace, "the while loop must have a body")?;
        let body = self.compound(ctx)?;
        self.advance_expect(TokenKind::RBrace, "the while loop's body must be closed")?;

        Ok(Node::WhileLoop {
            condition: Box::new(condition),
            body: Box::new(body),
            location,
        })
    }

    /// `return` / `throw`, with the value omitted when the line ends.
    pub(crate) fn return_statement(&mut self, ctx: Ctx, is_throw: bool) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let value = match self.current().kind {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof | TokenKind::RBrace => None,
            // inside a ternary branch, ':' closes the branch
            TokenKind::Colon => None,
            _ => Some(Box::new(self.expression(ctx)?)),
        };

        Ok(Node::Return {
            value,
            is_throw,
            location,
        })
    }

    pub(crate) fn if_statement(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let (condition, body) = self.if_else_pair(ctx)?;

        let mut else_if_conditions = Vec::new();
        let mut else_if_bodies = Vec::new();
        let mut else_body = None;

        while self.advance_if(TokenKind::Else) {
            if self.advance_if(TokenKind::If) {
                let (else_if_condition, else_if_body) = self.if_else_pair(ctx)?;
                else_if_conditions.push(else_if_condition);
                else_if_bodies.push(else_if_body);
            } else {
                self.advance_expect(TokenKind::LBrace, "the else statement must have a body")?;
                else_body = Some(Box::new(self.compound(ctx)?));
                self.advance_expect(
                    TokenKind::RBrace,
                    "the else statement's body must be closed",
                )?;
                break;
            }
        }

        Ok(Node::If {
            condition: Box::new(condition),
            body: Box::new(body),
            else_if_conditions,
            else_if_bodies,
            else_body,
            location,
        })
    }

    fn if_else_pair(&mut self, ctx: Ctx) -> Result<(Node, Compound), ParseError> {
        self.advance_expect(
            TokenKind::LParen,
            "expected a condition after the if or else statement",
        )?;
        let condition = self.expression(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "the if statement's parenthesis must be closed",
        )?;

        self.advance_expect(TokenKind::LBrace, "the if or else statement must have a body")?;
        let body = self.compound(ctx)?;
        self.advance_expect(
            TokenKind::RBrace,
            "the if or else statement's body must be closed",
        )?;

        Ok((condition, body))
    }

    pub(crate) fn switch_statement(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(
            TokenKind::LParen,
            "the switch statement must have an opening parenthesis",
        )?;
        let expression = self.expression(ctx)?;
        self.advance_expect(
            TokenKind::RParen,
            "the switch statement must have a closing parenthesis",
        )?;

        self.advance_expect(TokenKind::LBrace, "the switch statement must have a body")?;
        self.advance_newlines();

        let mut cases = Vec::new();
        while self.current().kind != TokenKind::RBrace && self.current().kind != TokenKind::Eof {
            cases.push(self.switch_case(ctx)?);
            self.advance_newlines();
        }

        self.advance_expect(TokenKind::RBrace, "the switch statement's body must be closed")?;

        Ok(Node::SwitchStatement {
            expression: Box::new(expression),
            cases,
            location,
        })
    }

    /// `case expr:` or `default:`, with the arm body running until the next
    /// case, `default`, or the closing brace.
    fn switch_case(&mut self, ctx: Ctx) -> Result<SwitchCase, ParseError> {
        let location = self.current_location();
        let is_case = self.advance_if(TokenKind::Case);
        if !is_case {
            self.advance_expect(TokenKind::Default, "expected 'case' or 'default'")?;
        }

        let expression = if is_case {
            // the ':' here belongs to the case, not a label
            let case_expression = self.primary(Ctx {
                parses_goto_labels: false,
                ..ctx
            })?;
            Some(case_expression)
        } else {
            None
        };

        self.advance_expect(TokenKind::Colon, "expected a ':' after the switch case")?;

        let body_location = self.current_location();
        let mut statements = Vec::new();
        self.advance_newlines();
        while self.current().kind != TokenKind::Case
            && self.current().kind != TokenKind::Default
            && self.current().kind != TokenKind::RBrace
            && self.current().kind != TokenKind::Eof
        {
            statements.push(self.statement(ctx)?);
            self.advance_newlines();
        }

        Ok(SwitchCase {
            expression,
            body: Compound {
                statements,
                first_class_function: None,
                location: body_location,
            },
            location,
        })
    }

    /// `do { } catch (binding) { }`; the catch binding may be an
    /// uninitialized declaration.
    pub(crate) fn do_catch_statement(&mut self, ctx: Ctx) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(TokenKind::LBrace, "the do statement must have a body")?;
        let do_body = self.compound(ctx)?;
        self.advance_expect(TokenKind::RBrace, "the do statement's body must be closed")?;

        self.advance_expect(TokenKind::Catch, "the do statement must have a catch clause")?;

        let catch_expression = if self.advance_if(TokenKind::LParen) {
            let expression = self.statement(Ctx {
                allow_uninitialized: true,
                ..ctx
            })?;
            self.advance_expect(
                TokenKind::RParen,
                "expected a ')' after the catch expression",
            )?;
            Some(Box::new(expression))
        } else {
            None
        };

        self.advance_expect(TokenKind::LBrace, "the catch statement must have a body")?;
        let catch_body = self.compound(ctx)?;
        self.advance_expect(TokenKind::RBrace, "the catch statement's body must be closed")?;

        Ok(Node::DoCatch {
            do_body: Box::new(do_body),
            catch_expression,
            catch_body: Box::new(catch_body),
            location,
        })
    }

    pub(crate) fn goto_statement(&mut self) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        let label = self.expect_value_and_advance(
            TokenKind::Identifier,
            "expected a label after the goto statement",
        )?;

        Ok(Node::GotoOrLabel {
            label: label.to_string(),
            is_goto: true,
            location,
        })
    }

    /// `asm ( "instruction" ... )`, one string or multiline string per
    /// instruction.
    pub(crate) fn inline_assembly(&mut self) -> Result<Node, ParseError> {
        let location = self.current_location();
        self.advance();

        self.advance_expect(TokenKind::LParen, "expected a '(' after asm")?;
        self.advance_newlines();

        let mut instructions = Vec::new();
        while self.current().kind != TokenKind::RParen && self.current().kind != TokenKind::Eof {
            match self.current().kind {
                TokenKind::String | TokenKind::MultilineString => {
                    instructions.push(self.value_and_advance().to_string());
                }
                _ => {
                    return Err(ParseError::new(
                        "an assembly instruction must be a string literal",
                        self.current_location(),
                    ))
                }
            }
            self.advance_newlines();
        }

        self.advance_expect(TokenKind::RParen, "the asm block must be closed")?;

        Ok(Node::InlineAssembly {
            instructions,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;

    fn parse(source: &str) -> Result<Compound, ParseError> {
        let mut sink = DiagnosticSink::new("test.veld");
        Parser::new(source, &mut sink).parse()
    }

    fn first_statement(source: &str) -> Node {
        parse(source).unwrap().statements.remove(0)
    }

    #[test]
    fn test_if_else_chain() {
        let source = "if (a) {\n    var x = 1\n} else if (b) {\n    var y = 2\n} else {\n    var z = 3\n}";
        match first_statement(source) {
            Node::If {
                else_if_conditions,
                else_body,
                ..
            } => {
                assert_eq!(else_if_conditions.len(), 1);
                assert!(else_body.is_some());
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_three_clause_for_loop_allows_shadowing() {
        // the init clause redeclares a name from the enclosing scope without
        // a duplicate diagnostic
        let source = "var i = 0\nfor (var i = 0, i < 10, i += 1) {\n    var b = i\n}";
        let mut sink = DiagnosticSink::new("test.veld");
        let result = Parser::new(source, &mut sink).parse();
        assert!(result.is_ok());
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_range_based_for_loop_with_index() {
        let source = "for (item in items) |var idx: usize| {\n    var x = item\n}";
        match first_statement(source) {
            Node::RangeBasedForLoop { index_binding, .. } => {
                assert!(index_binding.is_some());
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_while_loop() {
        match first_statement("while (x < 3) {\n    x += 1\n}") {
            Node::WhileLoop { .. } => {}
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_return_and_throw() {
        match first_statement("return 1 + 2") {
            Node::Return {
                value, is_throw, ..
            } => {
                assert!(value.is_some());
                assert!(!is_throw);
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match first_statement("throw error") {
            Node::Return { is_throw, .. } => assert!(is_throw),
            other => panic!("unexpected node: {:?}", other),
        }
        match first_statement("return") {
            Node::Return { value, .. } => assert!(value.is_none()),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_switch_with_default() {
        let source = "switch (color) {\n    case red:\n        var a = 1\n    case 2:\n        var b = 2\n    default:\n        var c = 3\n}";
        match first_statement(source) {
            Node::SwitchStatement { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(cases[0].expression.is_some());
                assert!(cases[2].expression.is_none());
                assert_eq!(cases[1].body.statements.len(), 1);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_do_catch_with_binding() {
        let source = "do {\n    try launch()\n} catch (var err: string) {\n    var x = err\n}";
        match first_statement(source) {
            Node::DoCatch {
                catch_expression, ..
            } => assert!(catch_expression.is_some()),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_goto_and_label() {
        let nodes = parse("start:\ngoto start").unwrap().statements;
        match &nodes[0] {
            Node::GotoOrLabel { is_goto, label, .. } => {
                assert!(!is_goto);
                assert_eq!(label, "start");
            }
            other => panic!("unexpected node: {:?}", other),
        }
        match &nodes[1] {
            Node::GotoOrLabel { is_goto, .. } => assert!(*is_goto),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_inline_assembly() {
        let source = "asm (\n    \"mov rax, 60\"\n    \"syscall\"\n)";
        match first_statement(source) {
            Node::InlineAssembly { instructions, .. } => {
                assert_eq!(instructions, vec!["mov rax, 60", "syscall"]);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_break_and_continue() {
        let source = "while (x) {\n    break\n    continue\n}";
        match first_statement(source) {
            Node::WhileLoop { body, .. } => {
                assert!(matches!(body.statements[0], Node::Break { .. }));
                assert!(matches!(body.statements[1], Node::Continue { .. }));
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }
}
