use tracing::trace;

use crate::object::{Object, NULL};

use monkey_parser::{
    ast::{Expression, Node, Statement},
    token::TokenKind,
};

/// Tree-walking evaluator.
///
/// Evaluation never fails: node kinds without an evaluation rule (identifiers, `let`, `return`,
/// `if`, function literals and calls) yield `None`, and operators applied to operands they are not
/// defined for yield `NULL`.
#[derive(Debug, Default)]
pub struct Evaluator {}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {}
    }

    /// Evaluate any node of the tree. `None` is the absent value.
    pub fn eval<'a, N>(&self, node: N) -> Option<Object>
    where
        N: Into<Node<'a>>,
    {
        match node.into() {
            Node::Program(prog) => self.eval_statements(&prog.statements),
            Node::Block(block) => self.eval_statements(&block.statements),
            Node::Statement(stmt) => self.eval_statement(stmt),
            Node::Expression(expr) => self.eval_expression(expr),
        }
    }

    /// The value of a list of statements is the value of the last one.
    fn eval_statements(&self, statements: &[Statement]) -> Option<Object> {
        let mut result = None;

        for stmt in statements {
            result = self.eval_statement(stmt);
        }

        result
    }

    fn eval_statement(&self, stmt: &Statement) -> Option<Object> {
        match stmt {
            Statement::Expression(stmt) => self.eval_expression(&stmt.expression),
            Statement::Let(_) | Statement::Return(_) => self.unsupported(Node::Statement(stmt)),
        }
    }

    fn eval_expression(&self, expr: &Expression) -> Option<Object> {
        match expr {
            Expression::Integer(int) => Some(Object::Integer(int.value)),
            Expression::Boolean(boolean) => Some(Object::from_native_bool(boolean.value)),

            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right)?;
                Some(self.eval_prefix_expression(prefix.operator, right))
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left)?;
                let right = self.eval_expression(&infix.right)?;
                Some(self.eval_infix_expression(infix.operator, left, right))
            }

            Expression::Identifier(_)
            | Expression::If(_)
            | Expression::Function(_)
            | Expression::Call(_) => self.unsupported(Node::Expression(expr)),
        }
    }

    fn unsupported(&self, node: Node<'_>) -> Option<Object> {
        trace!(node = %node, token = node.token_literal(), "no evaluation rule for node");
        None
    }

    fn eval_prefix_expression(&self, operator: TokenKind, right: Object) -> Object {
        match operator {
            TokenKind::Bang => self.eval_bang_operator_expression(right),
            TokenKind::Minus => self.eval_minus_prefix_operator_expression(right),
            _ => NULL,
        }
    }

    /// Only `false` and `null` are falsy; every integer, zero included, is truthy.
    fn eval_bang_operator_expression(&self, right: Object) -> Object {
        match right {
            Object::Boolean(value) => Object::from_native_bool(!value),
            Object::Null => Object::from_native_bool(true),
            Object::Integer(_) => Object::from_native_bool(false),
        }
    }

    fn eval_minus_prefix_operator_expression(&self, right: Object) -> Object {
        match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            _ => NULL,
        }
    }

    fn eval_infix_expression(&self, operator: TokenKind, left: Object, right: Object) -> Object {
        match (left, right) {
            (Object::Integer(left_value), Object::Integer(right_value)) => {
                self.eval_integer_infix_expression(operator, left_value, right_value)
            }

            // Booleans and null only exist as the shared constants, so value equality is identity
            _ => match operator {
                TokenKind::EqualEqual => Object::from_native_bool(left == right),
                TokenKind::BangEqual => Object::from_native_bool(left != right),
                _ => NULL,
            },
        }
    }

    fn eval_integer_infix_expression(
        &self,
        operator: TokenKind,
        left_value: i64,
        right_value: i64,
    ) -> Object {
        match operator {
            TokenKind::Plus => Object::Integer(left_value.wrapping_add(right_value)),
            TokenKind::Minus => Object::Integer(left_value.wrapping_sub(right_value)),
            TokenKind::Star => Object::Integer(left_value.wrapping_mul(right_value)),
            TokenKind::Slash => match right_value {
                0 => NULL,
                _ => Object::Integer(left_value.wrapping_div(right_value)),
            },

            TokenKind::LessThan => Object::from_native_bool(left_value < right_value),
            TokenKind::LessEqual => Object::from_native_bool(left_value <= right_value),
            TokenKind::GreaterThan => Object::from_native_bool(left_value > right_value),
            TokenKind::GreaterEqual => Object::from_native_bool(left_value >= right_value),
            TokenKind::EqualEqual => Object::from_native_bool(left_value == right_value),
            TokenKind::BangEqual => Object::from_native_bool(left_value != right_value),

            _ => NULL,
        }
    }
}
