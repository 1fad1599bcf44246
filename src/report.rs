use std::fmt;

use log::debug;

use crate::config::Config;
use crate::interpreter::{Environment, ExecOutcome, Interpreter};
use crate::parser::tokenizer::Token;
use crate::parser::{parse, tokenize_string, LexicalError, SyntaxError};

/// Everything one run of the pipeline produced. Later stages are `None` when
/// an earlier stage reported errors.
#[derive(Debug, Clone)]
pub struct Report {
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<LexicalError>,
    pub syntax_errors: Option<Vec<SyntaxError>>,
    pub outcome: Option<ExecOutcome>,
    show_tokens: bool,
}

pub fn run(source: &str, config: &Config) -> Report {
    let (tokens, lexical_errors) = tokenize_string(source);
    let mut report = Report {
        tokens,
        lexical_errors,
        syntax_errors: None,
        outcome: None,
        show_tokens: config.show_tokens,
    };
    if !report.lexical_errors.is_empty() {
        debug!("skipping parsing: lexical errors found");
        return report;
    }

    let (statements, syntax_errors) = parse(&report.tokens);
    let clean = syntax_errors.is_empty();
    report.syntax_errors = Some(syntax_errors);
    if !clean {
        debug!("skipping execution: syntax errors found");
        return report;
    }

    let interpreter = Interpreter::new(config.scope);
    report.outcome = Some(interpreter.execute(&statements, Environment::new()));
    report
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_tokens {
            writeln!(f, "=== Tokens ===")?;
            for token in &self.tokens {
                writeln!(
                    f,
                    "Line {}: {:<10} -> '{}'",
                    token.line(),
                    format!("{:?}", token.typ()),
                    token.lexeme()
                )?;
            }
            writeln!(f)?;
        }

        if self.lexical_errors.is_empty() {
            writeln!(f, "No lexical errors found.")?;
        } else {
            writeln!(f, "Lexical errors found:")?;
            for error in &self.lexical_errors {
                writeln!(f, "{error}")?;
            }
        }

        if let Some(syntax_errors) = &self.syntax_errors {
            writeln!(f)?;
            writeln!(f, "=== Syntax analysis ===")?;
            if syntax_errors.is_empty() {
                writeln!(f, "No syntax errors found.")?;
            } else {
                for error in syntax_errors {
                    writeln!(f, "{error}")?;
                }
            }
        }

        if let Some(outcome) = &self.outcome {
            writeln!(f)?;
            writeln!(f, "=== Execution ===")?;
            if let Some(value) = outcome.returned() {
                writeln!(f, "Returned value: {value}")?;
            }
            for (name, value) in outcome.environment().iter() {
                writeln!(f, "{name} = {value}")?;
            }
        }
        Ok(())
    }
}
