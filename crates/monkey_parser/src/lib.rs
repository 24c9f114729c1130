pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

use ast::Program;
use lexer::Lexer;
use parser::{ParseError, Parser};

/// Parse the given source, failing with every error found if it is not a valid program.
pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.errors().to_vec())
    }
}
