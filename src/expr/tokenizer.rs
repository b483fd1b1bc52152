//! logos-based expression tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `1.5` as Float beats `1` + `.` + `5`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `==` matches [`Token::EqEq`], not `=` twice
//! - `<=` matches [`Token::Le`], not `Lt` + `Eq`
//! - `1.5` matches [`Token::Float`], not `Int` + `Dot` + `Int`

use logos::Logos;

/// Expression token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// `==`
    #[token("==")]
    EqEq,

    /// `!=`
    #[token("!=")]
    NotEq,

    /// `<=`
    #[token("<=")]
    Le,

    /// `>=`
    #[token(">=")]
    Ge,

    /// `&&`
    #[token("&&")]
    AndAnd,

    /// `||`
    #[token("||")]
    OrOr,

    /// Float literal: `1.5`, `0.25`.
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    /// Integer literal: `0`, `42`.
    #[regex(r"[0-9]+")]
    Int,

    /// Identifier: names, keywords (`true`, `false`, `null`), path heads.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    // ── Single-character punctuation ─────────────────────────────────

    /// `<`
    #[token("<")]
    Lt,

    /// `>`
    #[token(">")]
    Gt,

    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `/`
    #[token("/")]
    Slash,

    /// `!`
    #[token("!")]
    Bang,

    /// `=`
    #[token("=")]
    Assign,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,
}

/// Tokenize an expression into `(Token, text)` pairs.
///
/// Unlike a forgiving lexer, garbage is an error here: a byte sequence no
/// token matches returns `Err(offset)` with the byte offset of the bad input,
/// so the caller can report the offending expression.
pub fn tokenize(input: &str) -> Result<Vec<(Token, String)>, usize> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    for (result, span) in lexer.spanned() {
        match result {
            Ok(token) => tokens.push((token, input[span].to_string())),
            Err(()) => return Err(span.start),
        }
    }
    Ok(tokens)
}
