use thiserror::Error;

/// A span of source text that no token pattern recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexical error at line {line}: unknown symbol '{text}'")]
pub struct LexicalError {
    pub line: usize,
    pub text: String,
}

impl LexicalError {
    pub fn new(line: usize, text: &str) -> Self {
        Self {
            line,
            text: text.to_string(),
        }
    }
}

/// A statement that does not match the grammar. `token` is the lexeme of the
/// first token the parser could not accept, empty at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at line {line}: {message}. Problem token: '{token}'")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
    pub token: String,
}

impl SyntaxError {
    pub fn new(line: usize, msg: &str, token: &str) -> Self {
        Self {
            line,
            message: msg.to_string(),
            token: token.to_string(),
        }
    }
}
