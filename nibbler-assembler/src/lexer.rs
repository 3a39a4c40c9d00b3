//! # Lexer for Nibbler assembly

use logos::Logos;

/// Tokens for Nibbler assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"[;#][^\n]*")] // Skip comments
pub enum Token {
    /// Mnemonic
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_ascii_lowercase())]
    Identifier(String),

    /// Decimal number
    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Number(u64),

    /// Hexadecimal number
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| u64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(u64),

    /// Binary number
    #[regex(r"0[bB][01]+", |lex| u64::from_str_radix(&lex.slice()[2..], 2).ok())]
    Binary(u64),

    /// Directive (.code, .data, .org, .nibble)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_ascii_lowercase())]
    Directive(String),

    #[token(",")]
    Comma,

    #[regex(r"\n")]
    Newline,
}

impl Token {
    /// Numeric value of a number token in any base
    pub fn value(&self) -> Option<u64> {
        match self {
            Token::Number(n) | Token::Hex(n) | Token::Binary(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_numbers() {
        let mut lex = Token::lexer("7 0xA 0b101");
        assert_eq!(lex.next(), Some(Ok(Token::Number(7))));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0xA))));
        assert_eq!(lex.next(), Some(Ok(Token::Binary(0b101))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_directive() {
        let mut lex = Token::lexer(".code .DATA .org");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("code".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Directive("data".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Directive("org".to_string()))));
    }

    #[test]
    fn test_lexer_comments() {
        let mut lex = Token::lexer("nop ; first\nSTOP # second");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("nop".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Newline)));
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("stop".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_nibble_list() {
        let mut lex = Token::lexer(".nibble 1, 0xf");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("nibble".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(1))));
        assert_eq!(lex.next(), Some(Ok(Token::Comma)));
        assert_eq!(lex.next(), Some(Ok(Token::Hex(0xF))));
    }

    #[test]
    fn test_lexer_rejects_stray_characters() {
        let mut lex = Token::lexer("nop $");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("nop".to_string()))));
        assert_eq!(lex.next(), Some(Err(())));
    }
}
