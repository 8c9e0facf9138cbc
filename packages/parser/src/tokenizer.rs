use logos::Logos;
use std::ops::Range;

/// Inline tokens of a note
///
/// Every byte of the input lands in exactly one token; there is no
/// skipped whitespace since offsets must round-trip to the source text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("[[")]
    LinkOpen,

    #[token("]]")]
    LinkClose,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    /// A lone `[` or `]`
    #[regex(r"[\[\]]")]
    Bracket,

    #[regex(r"[^\[\]\r\n]+")]
    Text,
}

/// Tokenize a note into `(token, byte span)` pairs
///
/// Bytes the lexer cannot classify are reported as [`Token::Text`].
pub fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Token::Text), span))
        .collect()
}
