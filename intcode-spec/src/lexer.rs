//! # Lexer for Intcode Program Text

use logos::Logos;

use crate::Word;

/// Tokens of the comma-separated program format
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Whitespace, newlines included
pub enum Token {
    /// Signed decimal integer
    #[regex(r"[+-]?[0-9]+", |lex| lex.slice().parse::<Word>().ok())]
    Number(Word),

    /// Comma
    #[token(",")]
    Comma,
}

/// 1-based line and column of a byte offset
pub fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}
