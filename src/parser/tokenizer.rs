use super::error::LexicalError;
use const_format::concatcp;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) line: usize,
}

impl Token {
    pub(crate) fn new(typ: TokenType, lexeme: &str, line: usize) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            line,
        }
    }
    pub fn typ(&self) -> TokenType {
        self.typ
    }
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
    pub fn line(&self) -> usize {
        self.line
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    KEYWORD,
    RETURN,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    ASSIGN,
    LOGIC,
    COMPARE,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    DOT,
    DECIMAL,
    INTEGER,
    NAME,
}

impl TokenType {
    pub(crate) fn is_operator(&self) -> bool {
        matches!(self, Self::PLUS | Self::MINUS | Self::STAR | Self::SLASH)
    }
}

const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const DOT: (&str, TokenType) = (".", TokenType::DOT);

const SIMPLE_TOKENS: [(&str, TokenType); 5] = [LPAR, RPAR, LBRACE, RBRACE, DOT];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

// Anchored at the start of the remaining input and closed by a word boundary.
// The boundary in front of the word depends on the preceding character, which
// the anchored slice cannot see, so `TokenRule::find` checks it instead.
// Both boundaries together keep `es` glued to a name (`xes10`, `es_a`) part
// of that name.
macro_rules! word {
    ($($ts:expr),+) => {{
        concatcp!(r"^", group!($($ts),+), r"\b")
    }}
}

const S_KEYWORDS: &str = word!("ent", "dec", "txt", "vf", "SiNo", "Si", "Para", "Realiza", "Mientras");
const S_RETURN: &str = word!("retorna");
const S_PLUS: &str = word!("suma");
const S_MINUS: &str = word!("resta");
const S_STAR: &str = word!("multi");
const S_SLASH: &str = word!("division");
const S_ASSIGN: &str = word!("igual", "es");
const S_LOGIC: &str = word!("y", "o");
const S_COMPARE: &str = word!("MayK", "MenK", "MayIg", "MenIg", "DifA");
const S_COMMENT: &str = r"^\$[^\n]*";
const S_DECIMAL: &str = r"^-?[0-9]+\.[0-9]+";
const S_INTEGER: &str = r"^-?[0-9]+";
const S_NAME: &str = r"^[a-zA-Z_][a-zA-Z0-9_]*";
const S_WHITESPACE: &str = r"^\s+";

const WORD_PATTERNS: [(&str, TokenType); 9] = [
    (S_KEYWORDS, TokenType::KEYWORD),
    (S_RETURN, TokenType::RETURN),
    (S_PLUS, TokenType::PLUS),
    (S_MINUS, TokenType::MINUS),
    (S_STAR, TokenType::STAR),
    (S_SLASH, TokenType::SLASH),
    (S_ASSIGN, TokenType::ASSIGN),
    (S_LOGIC, TokenType::LOGIC),
    (S_COMPARE, TokenType::COMPARE),
];

// `None` marks text that is recognized but never becomes a token.
const TRAILING_PATTERNS: [(&str, Option<TokenType>); 5] = [
    (S_COMMENT, None),
    (S_DECIMAL, Some(TokenType::DECIMAL)),
    (S_INTEGER, Some(TokenType::INTEGER)),
    (S_NAME, Some(TokenType::NAME)),
    (S_WHITESPACE, None),
];

enum TokenRule {
    Pattern {
        regex: Regex,
        typ: Option<TokenType>,
        whole_word: bool,
    },
    Simple(&'static str, TokenType),
}

impl TokenRule {
    fn pattern(pattern: &str, typ: Option<TokenType>, whole_word: bool) -> Self {
        Self::Pattern {
            regex: Regex::new(pattern).expect("Error compiling regex."),
            typ,
            whole_word,
        }
    }

    /// Length of the match at the start of `rest`, together with the token
    /// type it produces.
    fn find(&self, rest: &str, after_word: bool) -> Option<(Option<TokenType>, usize)> {
        match self {
            Self::Simple(lexeme, typ) => rest
                .starts_with(*lexeme)
                .then(|| (Some(*typ), lexeme.len())),
            Self::Pattern {
                regex,
                typ,
                whole_word,
            } => {
                if *whole_word && after_word {
                    return None;
                }
                regex.find(rest).map(|m| (*typ, m.end()))
            }
        }
    }
}

// Priority order: words, punctuation, then comments, literals, names, whitespace.
static RULES: Lazy<Vec<TokenRule>> = Lazy::new(|| {
    let mut rules: Vec<TokenRule> = WORD_PATTERNS
        .iter()
        .map(|&(pattern, typ)| TokenRule::pattern(pattern, Some(typ), true))
        .collect();
    rules.extend(
        SIMPLE_TOKENS
            .iter()
            .map(|&(lexeme, typ)| TokenRule::Simple(lexeme, typ)),
    );
    rules.extend(
        TRAILING_PATTERNS
            .iter()
            .map(|&(pattern, typ)| TokenRule::pattern(pattern, typ, false)),
    );
    rules
});

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn match_at(source: &str, pos: usize) -> Option<(Option<TokenType>, usize)> {
    let after_word = source[..pos].chars().next_back().map_or(false, is_word_char);
    let rest = &source[pos..];
    RULES.iter().find_map(|rule| rule.find(rest, after_word))
}

pub struct Tokenizer {
    tokens: Vec<Token>,
    errors: Vec<LexicalError>,
    start: usize,
    line: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            tokens: vec![],
            errors: vec![],
            start: 0,
            line: 1,
        }
    }

    pub fn tokenize(&mut self, source: &str) {
        self.start = 0;
        while self.start < source.len() {
            match match_at(source, self.start) {
                Some((typ, len)) => {
                    let lexeme = &source[self.start..self.start + len];
                    if let Some(typ) = typ {
                        self.push(typ, lexeme);
                    }
                    self.advance(lexeme);
                }
                None => self.skip_unknown(source),
            }
        }
    }

    pub fn finalize(self) -> (Vec<Token>, Vec<LexicalError>) {
        debug!(
            "tokenizer produced {} tokens and {} lexical errors",
            self.tokens.len(),
            self.errors.len()
        );
        (self.tokens, self.errors)
    }

    fn advance(&mut self, consumed: &str) {
        self.line += consumed.matches('\n').count();
        self.start += consumed.len();
    }

    fn push(&mut self, typ: TokenType, lexeme: &str) {
        let token = Token::new(typ, lexeme, self.line);
        trace!("line {}: {}", self.line, token);
        self.tokens.push(token);
    }

    // Consumes characters until some rule matches again and reports them as one span.
    fn skip_unknown(&mut self, source: &str) {
        let begin = self.start;
        let end = source[begin..]
            .char_indices()
            .skip(1)
            .map(|(offset, _)| begin + offset)
            .find(|&pos| match_at(source, pos).is_some())
            .unwrap_or(source.len());
        let text = &source[begin..end];
        self.errors.push(LexicalError::new(self.line, text));
        self.advance(text);
    }
}

pub fn tokenize_string(input: &str) -> (Vec<Token>, Vec<LexicalError>) {
    let mut tokenizer = Tokenizer::new();
    tokenizer.tokenize(input);
    tokenizer.finalize()
}
