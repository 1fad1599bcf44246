mod ast;
mod combinators;
mod error;
mod grammar;
pub mod tokenizer;

pub use ast::*;
pub use error::{LexicalError, SyntaxError};
pub use grammar::parse;
pub use tokenizer::tokenize_string;

#[cfg(test)]
mod test;
