use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{
    BlockStatement, BooleanLiteral, CallExpression, Expression, ExpressionStatement,
    FunctionLiteral, Identifier, IfExpression, InfixExpression, IntegerLiteral, LetStatement,
    PrefixExpression, Program, ReturnStatement, Statement,
};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The token following the current one is not the one the grammar requires
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedPeek {
        expected: TokenKind,
        got: TokenKind,
        span: Span,
    },
    /// The token cannot start an expression
    #[error("no prefix parse function for {kind} found")]
    NoPrefixParseFn { kind: TokenKind, span: Span },
    /// The digits of an integer literal do not fit in an i64
    #[error("could not parse {literal:?} as integer")]
    InvalidInteger { literal: String, span: Span },
    /// Expressions are nested deeper than the parser will descend
    #[error("expression nested too deeply, the limit is {limit} levels")]
    NestedTooDeeply { limit: usize, span: Span },
}

impl ParseError {
    /// Where in the source the error was found
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedPeek { span, .. } => *span,
            ParseError::NoPrefixParseFn { span, .. } => *span,
            ParseError::InvalidInteger { span, .. } => *span,
            ParseError::NestedTooDeeply { span, .. } => *span,
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// How many expressions may be open at once, through operands, groups, blocks and arguments.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Binding power of operators, from loosest to tightest.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    Lowest,
    Equals,
    LessOrGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Precedence of the token when found in infix position, `None` if it cannot continue an expression.
    fn of_infix(kind: TokenKind) -> Option<Precedence> {
        use TokenKind::*;

        match kind {
            EqualEqual | BangEqual => Some(Precedence::Equals),
            LessThan | LessEqual | GreaterThan | GreaterEqual => Some(Precedence::LessOrGreater),
            Plus | Minus => Some(Precedence::Sum),
            Star | Slash => Some(Precedence::Product),
            LeftParen => Some(Precedence::Call),
            _ => None,
        }
    }
}

/// Two token lookahead over the lexer.
struct TokenCursor<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
}

impl<'a> TokenCursor<'a> {
    fn new(mut lexer: Lexer<'a>) -> TokenCursor<'a> {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        TokenCursor {
            lexer,
            current,
            peek,
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }
}

pub struct Parser<'a> {
    cursor: TokenCursor<'a>,
    errors: Vec<ParseError>,
    /// Number of `parse_expression` calls currently on the stack
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
        Parser {
            cursor: TokenCursor::new(lexer),
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Parse every statement until EOF.
    ///
    /// A statement that fails to parse is left out of the program and its error is recorded;
    /// parsing then carries on from the following token. Check `errors()` afterwards.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.current_token_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(statement) => program.statements.push(statement),
                Err(error) => self.record_error(error),
            }
            self.next_token();
        }

        program
    }

    /// Errors found so far, in the order they were found.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record_error(&mut self, error: ParseError) {
        debug!(%error, span = %error.span(), "parse error");
        self.errors.push(error);
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        trace!(token = %self.cursor.current.kind, "parsing statement");

        match self.cursor.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<Statement> {
        let token = self.cursor.current.clone();

        self.expect_peek(TokenKind::Identifier)?;
        let name = Identifier::new(self.cursor.current.clone());

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Let(LetStatement { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let token = self.cursor.current.clone();

        // Consume the `return` token
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Return(ReturnStatement { token, value }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let token = self.cursor.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Expression(ExpressionStatement { token, expression }))
    }

    /// Parse statements between `{` (the current token) and the matching `}`.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cursor.current.clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.current_token_is(TokenKind::RightBrace)
            && !self.current_token_is(TokenKind::Eof)
        {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => self.record_error(error),
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestedTooDeeply {
                limit: MAX_NESTING_DEPTH,
                span: self.cursor.current.span,
            });
        }

        self.depth += 1;
        let result = self.parse_operators(precedence);
        self.depth -= 1;

        result
    }

    fn parse_operators(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon) {
            match Precedence::of_infix(self.cursor.peek.kind) {
                Some(peek_precedence) if precedence < peek_precedence => {
                    self.next_token();
                    left = self.parse_infix(left)?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        match self.cursor.current.kind {
            TokenKind::Identifier => Ok(Expression::Identifier(Identifier::new(
                self.cursor.current.clone(),
            ))),
            TokenKind::Integer => self.parse_integer_literal(),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::True | TokenKind::False => Ok(self.parse_boolean()),
            TokenKind::LeftParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            kind => Err(ParseError::NoPrefixParseFn {
                kind,
                span: self.cursor.current.span,
            }),
        }
    }

    /// Fold `left` through the operator that is now the current token.
    fn parse_infix(&mut self, left: Expression) -> ParseResult<Expression> {
        match self.cursor.current.kind {
            TokenKind::LeftParen => self.parse_call_expression(left),
            _ => self.parse_infix_expression(left),
        }
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();

        match token.literal.parse::<i64>() {
            Ok(value) => Ok(Expression::Integer(IntegerLiteral { token, value })),
            Err(_) => Err(ParseError::InvalidInteger {
                literal: token.literal,
                span: token.span,
            }),
        }
    }

    fn parse_boolean(&mut self) -> Expression {
        Expression::Boolean(BooleanLiteral {
            token: self.cursor.current.clone(),
            value: self.current_token_is(TokenKind::True),
        })
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();
        let operator = token.kind;

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(Box::new(PrefixExpression {
            token,
            operator,
            right,
        })))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();
        let operator = token.kind;
        // Re-entering with the same precedence makes equal-precedence chains nest left
        let precedence = Precedence::of_infix(operator).unwrap_or(Precedence::Lowest);

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(Box::new(InfixExpression {
            token,
            left,
            operator,
            right,
        })))
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;

        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();

        self.expect_peek(TokenKind::LeftParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen)?;

        self.expect_peek(TokenKind::LeftBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LeftBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Ok(Expression::If(Box::new(IfExpression {
            token,
            condition,
            consequence,
            alternative,
        })))
    }

    fn parse_function_literal(&mut self) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();

        self.expect_peek(TokenKind::LeftParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LeftBrace)?;
        let body = self.parse_block_statement();

        Ok(Expression::Function(Box::new(FunctionLiteral {
            token,
            parameters,
            body,
        })))
    }

    /// Parse `a, b, c)` with the `(` as the current token.
    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_token_is(TokenKind::RightParen) {
            self.next_token();
            return Ok(parameters);
        }

        self.expect_peek(TokenKind::Identifier)?;
        parameters.push(Identifier::new(self.cursor.current.clone()));

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Identifier)?;
            parameters.push(Identifier::new(self.cursor.current.clone()));
        }

        self.expect_peek(TokenKind::RightParen)?;

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> ParseResult<Expression> {
        let token = self.cursor.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RightParen)?;

        Ok(Expression::Call(Box::new(CallExpression {
            token,
            function,
            arguments,
        })))
    }

    /// Parse comma-separated expressions up to the `end` delimiter.
    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Ok(list)
    }

    fn next_token(&mut self) {
        self.cursor.advance();
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn current_token_is(&self, kind: TokenKind) -> bool {
        self.cursor.current.is(kind)
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.cursor.peek.is(kind)
    }

    /// Advance if the next token has the given kind, fail otherwise without moving.
    fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::UnexpectedPeek {
                expected: kind,
                got: self.cursor.peek.kind,
                span: self.cursor.peek.span,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::ast::{Expression, Program, Statement};
    use crate::lexer::Lexer;
    use crate::parser::{ParseError, Parser, MAX_NESTING_DEPTH};
    use crate::span::{BytePos, Span};
    use crate::token::TokenKind;

    #[test]
    fn test_let_statement() {
        let tests = vec![
            ("let x = 5;", "x", "5"),
            ("let y = true;", "y", "true"),
            ("let foobar = y;", "foobar", "y"),
            ("let sum = 5 + 5", "sum", "(5 + 5)"),
        ];

        for (input, expected_name, expected_value) in tests {
            let prog = setup(input, 1);

            match &prog.statements[0] {
                Statement::Let(stmt) => {
                    assert_eq!(stmt.token.literal, "let");
                    assert_eq!(stmt.name.value, expected_name);
                    assert_eq!(stmt.name.token.literal, expected_name);
                    assert_eq!(stmt.value.to_string(), expected_value);
                }
                stmt => panic!("expected let statement but got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_let_statement_keeps_value() {
        // The right-hand side is parsed into the tree rather than skipped up to the `;`
        let prog = setup("let x = 5 * (2 + 1);", 1);
        assert_eq!(prog.to_string(), "let x = (5 * (2 + 1));");
    }

    #[test]
    fn test_return_statement() {
        let input = "\
        return 5;
        return y;
        return add(1, 2);";

        let prog = setup(input, 3);
        let expected = vec!["5", "y", "add(1, 2)"];

        for (statement, expected_value) in prog.statements.iter().zip(expected) {
            match statement {
                Statement::Return(stmt) => {
                    assert_eq!(stmt.token.literal, "return");
                    assert_eq!(stmt.value.to_string(), expected_value);
                }
                stmt => panic!("expected return statement but got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_identifier_expression() {
        let prog = setup("foobar;", 1);
        let expr = single_expression(&prog);

        match expr {
            Expression::Identifier(ident) => {
                assert_eq!(ident.value, "foobar");
                assert_eq!(expr.token_literal(), "foobar");
            }
            _ => panic!("expected identifier but got {:?}", expr),
        }
    }

    #[test]
    fn test_integer_literal_expression() {
        let prog = setup("5;", 1);
        let expr = single_expression(&prog);

        match expr {
            Expression::Integer(int) => {
                assert_eq!(int.value, 5);
                assert_eq!(expr.token_literal(), "5");
            }
            _ => panic!("expected integer literal but got {:?}", expr),
        }
    }

    #[test]
    fn test_boolean_expression() {
        for (input, expected) in vec![("true;", true), ("false;", false)] {
            let prog = setup(input, 1);

            match single_expression(&prog) {
                Expression::Boolean(boolean) => assert_eq!(boolean.value, expected),
                expr => panic!("expected boolean but got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_prefix_expressions() {
        let tests = vec![
            ("!true;", TokenKind::Bang, "true"),
            ("!false;", TokenKind::Bang, "false"),
            ("!5;", TokenKind::Bang, "5"),
            ("-5;", TokenKind::Minus, "5"),
        ];

        for (input, expected_operator, expected_right) in tests {
            let prog = setup(input, 1);

            match single_expression(&prog) {
                Expression::Prefix(prefix) => {
                    assert_eq!(prefix.operator, expected_operator);
                    assert_eq!(prefix.right.to_string(), expected_right);
                }
                expr => panic!("expected prefix expression but got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        let tests = vec![
            ("true == true;", "true", TokenKind::EqualEqual, "true"),
            ("true != false;", "true", TokenKind::BangEqual, "false"),
            ("5 + 5;", "5", TokenKind::Plus, "5"),
            ("5 - 5;", "5", TokenKind::Minus, "5"),
            ("5 * 5;", "5", TokenKind::Star, "5"),
            ("5 / 5;", "5", TokenKind::Slash, "5"),
            ("5 > 5;", "5", TokenKind::GreaterThan, "5"),
            ("5 >= 5;", "5", TokenKind::GreaterEqual, "5"),
            ("5 < 5;", "5", TokenKind::LessThan, "5"),
            ("5 <= 5;", "5", TokenKind::LessEqual, "5"),
            ("5 == 5;", "5", TokenKind::EqualEqual, "5"),
            ("5 != 5;", "5", TokenKind::BangEqual, "5"),
        ];

        for (input, expected_left, expected_operator, expected_right) in tests {
            let prog = setup(input, 1);
            let expr = single_expression(&prog);

            match expr {
                Expression::Infix(infix) => {
                    assert_eq!(infix.left.to_string(), expected_left);
                    assert_eq!(infix.operator, expected_operator);
                    assert_eq!(infix.right.to_string(), expected_right);
                    assert_eq!(expr.token_literal(), expected_operator.to_string());
                }
                _ => panic!("expected infix expression but got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a - b - c", "((a - b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c", "(a + (b * c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("5 >= 3 == 3 <= 5", "((5 >= 3) == (3 <= 5))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
        ];

        for (input, expected) in tests {
            let prog = setup(input, 0);
            assert_eq!(prog.to_string(), expected, "input: '{}'", input);
        }
    }

    #[test]
    fn test_if_expression() {
        let prog = setup("if (x < y) { x }", 1);

        match single_expression(&prog) {
            Expression::If(if_exp) => {
                assert_eq!(if_exp.condition.to_string(), "(x < y)");
                assert_eq!(if_exp.consequence.statements.len(), 1);
                assert_eq!(if_exp.consequence.statements[0].token_literal(), "x");
                assert!(if_exp.alternative.is_none());
            }
            expr => panic!("expected if expression but got {:?}", expr),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let prog = setup("if (x < y) { x } else { y; z }", 1);

        match single_expression(&prog) {
            Expression::If(if_exp) => {
                let alternative = match &if_exp.alternative {
                    Some(alternative) => alternative,
                    None => panic!("expected an alternative block"),
                };
                assert_eq!(alternative.statements.len(), 2);
                assert_eq!(alternative.to_string(), "y; z");
            }
            expr => panic!("expected if expression but got {:?}", expr),
        }

        assert_eq!(prog.to_string(), "if ((x < y)) { x } else { y; z }");
    }

    #[test]
    fn test_function_literal() {
        let prog = setup("fn(x, y) { x + y; }", 1);

        match single_expression(&prog) {
            Expression::Function(func) => {
                let params: Vec<&str> = func.parameters.iter().map(|p| p.value.as_str()).collect();
                assert_eq!(params, vec!["x", "y"]);
                assert_eq!(func.body.statements.len(), 1);
                assert_eq!(func.body.to_string(), "(x + y)");
            }
            expr => panic!("expected function literal but got {:?}", expr),
        }

        assert_eq!(prog.to_string(), "fn(x, y) { (x + y) }");
    }

    #[test]
    fn test_function_parameters() {
        let tests = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (input, expected) in tests {
            let prog = setup(input, 1);

            match single_expression(&prog) {
                Expression::Function(func) => {
                    let params: Vec<&str> =
                        func.parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(params, expected);
                }
                expr => panic!("expected function literal but got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        let prog = setup("add(1, 2 * 3, 4 + 5);", 1);
        let expr = single_expression(&prog);

        match expr {
            Expression::Call(call) => {
                assert_eq!(call.function.token_literal(), "add");
                let args: Vec<String> = call.arguments.iter().map(|a| a.to_string()).collect();
                assert_eq!(args, vec!["1", "(2 * 3)", "(4 + 5)"]);
                assert_eq!(expr.token_literal(), "(");
            }
            _ => panic!("expected call expression but got {:?}", expr),
        }
    }

    #[test]
    fn test_let_missing_identifier() {
        let (prog, errors) = parse("let = 5;");

        assert!(!errors.is_empty());
        assert_eq!(
            errors[0],
            ParseError::UnexpectedPeek {
                expected: TokenKind::Identifier,
                got: TokenKind::Assign,
                span: errors[0].span(),
            }
        );
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be Identifier, got = instead"
        );
        // Parsing resumes after the broken statement
        assert_eq!(prog.to_string(), "5");
    }

    #[test]
    fn test_errors_accumulate() {
        let (_, errors) = parse("let x 5; let = 10; let 838383;");

        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "expected next token to be =, got Integer instead",
                "expected next token to be Identifier, got = instead",
                "no prefix parse function for = found",
                "expected next token to be Identifier, got Integer instead",
            ]
        );
    }

    #[test]
    fn test_missing_prefix_and_illegal() {
        let (_, errors) = parse("@");
        assert_eq!(
            errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            vec!["no prefix parse function for Illegal found"]
        );
    }

    #[test]
    fn test_grouped_expression_unclosed() {
        let (prog, errors) = parse("(1 + 2");
        assert_eq!(prog.statements.len(), 0);
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be ), got EOF instead"
        );
    }

    #[test]
    fn test_integer_overflow() {
        let (_, errors) = parse("9223372036854775808");
        assert_eq!(
            errors[0].to_string(),
            "could not parse \"9223372036854775808\" as integer"
        );

        let prog = setup("9223372036854775807", 1);
        assert_eq!(prog.to_string(), "9223372036854775807");
    }

    #[test]
    fn test_compound_assignment_has_no_production() {
        let (_, errors) = parse("x += 1");
        assert_eq!(
            errors[0].to_string(),
            "no prefix parse function for += found"
        );
    }

    #[test]
    fn test_block_rendering_reparses() {
        let tests = vec![
            ("if (x) { a; -b }", "if (x) { a; (-b) }"),
            ("fn(x) { let y = x; return y; }", "fn(x) { let y = x; return y; }"),
            ("if (x) { a } else { b; c(); }", "if (x) { a } else { b; c() }"),
        ];

        for (input, expected) in tests {
            let rendered = setup(input, 1).to_string();
            assert_eq!(rendered, expected, "input: '{}'", input);
            assert_eq!(setup(&rendered, 1).to_string(), expected);
        }
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}1", "-".repeat(MAX_NESTING_DEPTH - 1));
        setup(&at_limit, 1);

        let (_, errors) = parse(&format!("{}1", "-".repeat(MAX_NESTING_DEPTH)));
        assert_eq!(
            errors[0],
            ParseError::NestedTooDeeply {
                limit: MAX_NESTING_DEPTH,
                span: Span::new(
                    BytePos::new(MAX_NESTING_DEPTH),
                    BytePos::new(MAX_NESTING_DEPTH + 1)
                ),
            }
        );
        assert_eq!(
            errors[0].to_string(),
            "expression nested too deeply, the limit is 128 levels"
        );
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let inputs = vec![
            format!("{}1", "-".repeat(10_000)),
            format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000)),
            format!("{}1{}", "f(".repeat(10_000), ")".repeat(10_000)),
            format!("{}1{}", "if (x) { ".repeat(10_000), " }".repeat(10_000)),
        ];

        for input in inputs {
            let (_, errors) = parse(&input);
            match errors.first() {
                Some(ParseError::NestedTooDeeply { .. }) => {}
                error => panic!("expected a nesting error but got {:?}", error),
            }
        }
    }

    fn parse(input: &str) -> (Program, Vec<ParseError>) {
        let l = Lexer::new(input);
        let mut p = Parser::new(l);
        let prog = p.parse_program();
        (prog, p.errors().to_vec())
    }

    fn setup(input: &str, stmt_count: usize) -> Program {
        let (prog, errors) = parse(input);

        if !errors.is_empty() {
            println!("parser had {} errors", errors.len());
            for error in errors {
                println!("parser error: {}", error);
            }
            panic!("parser errors for '{}'", input)
        }

        if stmt_count != 0 && prog.statements.len() != stmt_count {
            panic!(
                "expected {} statement(s) for '{}' but got {:?}",
                stmt_count, input, prog.statements
            )
        }

        prog
    }

    fn single_expression(prog: &Program) -> &Expression {
        match &prog.statements[0] {
            Statement::Expression(stmt) => &stmt.expression,
            stmt => panic!("expected expression statement but got {:?}", stmt),
        }
    }

    fn arb_identifier() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,4}".prop_filter("keywords are not identifiers", |s| {
            TokenKind::lookup_identifier(s) == TokenKind::Identifier
        })
    }

    /// Expressions built from the operators, literals, grouping, calls, conditionals and function
    /// literals of the language.
    fn arb_expression() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            (0..1000i64).prop_map(|n| n.to_string()),
            arb_identifier(),
            Just("true".to_string()),
            Just("false".to_string()),
        ];

        leaf.prop_recursive(4, 32, 4, |inner| {
            let op = prop_oneof![
                Just("+"),
                Just("-"),
                Just("*"),
                Just("/"),
                Just("<"),
                Just("<="),
                Just(">"),
                Just(">="),
                Just("=="),
                Just("!="),
            ];
            // Bodies of `if` and `fn`, each statement terminated so they can follow each other
            let statement = prop_oneof![
                inner.clone().prop_map(|e| format!("{};", e)),
                (arb_identifier(), inner.clone())
                    .prop_map(|(name, e)| format!("let {} = {};", name, e)),
                inner.clone().prop_map(|e| format!("return {};", e)),
            ];
            let block = prop::collection::vec(statement, 0..4)
                .prop_map(|statements| statements.join(" "))
                .boxed();

            prop_oneof![
                (inner.clone(), op, inner.clone()).prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
                (prop_oneof![Just("!"), Just("-")], inner.clone())
                    .prop_map(|(op, e)| format!("{}{}", op, e)),
                inner.clone().prop_map(|e| format!("({})", e)),
                (arb_identifier(), prop::collection::vec(inner.clone(), 0..3))
                    .prop_map(|(name, args)| format!("{}({})", name, args.join(", "))),
                (inner, block.clone(), prop::option::of(block.clone())).prop_map(
                    |(condition, consequence, alternative)| match alternative {
                        Some(alternative) => format!(
                            "if ({}) {{ {} }} else {{ {} }}",
                            condition, consequence, alternative
                        ),
                        None => format!("if ({}) {{ {} }}", condition, consequence),
                    }
                ),
                (prop::collection::vec(arb_identifier(), 0..3), block)
                    .prop_map(|(params, body)| format!("fn({}) {{ {} }}", params.join(", "), body)),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonical_rendering_is_stable(input in arb_expression()) {
            let (first, errors) = parse(&input);
            prop_assume!(errors.is_empty());

            let rendered = first.to_string();
            let (second, errors) = parse(&rendered);
            prop_assert!(errors.is_empty(), "re-parse of '{}' failed: {:?}", rendered, errors);
            prop_assert_eq!(second.to_string(), rendered);
        }
    }
}
