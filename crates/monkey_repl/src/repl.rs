use std::io::{self, Write};

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::Editor;
use tracing::debug;

use monkey_interpreter::Evaluator;
use monkey_parser::{lexer::Lexer, parser::Parser};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    /// Print the canonical rendering of the program rather than its value
    pub print_ast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: ">> ".to_string(),
            print_ast: false,
        }
    }
}

/// Parse and evaluate one chunk of source, writing the outcome to `out`.
///
/// Parse errors are listed and nothing is evaluated. An absent result prints nothing.
pub fn run_source<W: Write>(source: &str, config: &Config, out: &mut W) -> io::Result<()> {
    let mut p = Parser::new(Lexer::new(source));
    let prog = p.parse_program();

    if !p.errors().is_empty() {
        writeln!(out, "Parser errors:")?;
        for error in p.errors() {
            writeln!(out, "\t{} {}", error, error.span().at_str())?;
        }
        return Ok(());
    }

    if config.print_ast {
        return writeln!(out, "{}", prog);
    }

    match Evaluator::new().eval(&prog) {
        Some(value) => writeln!(out, "{}", value.inspect()),
        None => {
            debug!(program = %prog, "program produced no value");
            Ok(())
        }
    }
}

pub fn repl(config: &Config) -> anyhow::Result<()> {
    println!("monkey language v{}", VERSION);

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();
    let stdout = io::stdout();

    loop {
        let readline = rl.readline(&config.prompt);
        match readline {
            Ok(line) => {
                if line == "exit" || line == "quit" {
                    break;
                }
                // Skip empty lines
                else if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str());

                run_source(&line, config, &mut stdout.lock())
                    .context("failed to write output")?;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read line"),
        }
    }

    Ok(())
}
