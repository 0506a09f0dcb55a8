use logos::Logos;
use std::fmt;

/// Token types for the structured parts of map-text lines.
///
/// Element names are free text and never round-trip through the tokenizer;
/// the line grammars slice them out of the raw line instead. Tokens cover
/// the keyword heads, coordinate blocks, decorators, and arrows.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'src> {
    // Keywords
    #[token("component")]
    Component,

    #[token("anchor")]
    Anchor,

    #[token("note")]
    Note,

    #[token("evolve")]
    Evolve,

    #[token("pipeline")]
    Pipeline,

    #[token("pioneers")]
    Pioneers,

    #[token("settlers")]
    Settlers,

    #[token("townplanners")]
    Townplanners,

    #[token("title")]
    Title,

    #[token("label")]
    Label,

    #[token("inertia")]
    Inertia,

    // Link arrows ("->>" must outrank "->")
    #[token("->>")]
    FlowArrow,

    #[token("->")]
    Arrow,

    #[token("+>")]
    ValueArrow,

    // Identifiers (decorator words such as buy/build/outsource)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals with backslash escapes
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    String(&'src str),

    // Numbers (arbitrary precision parsed, 2-decimal emitted by mutations)
    #[regex(r"-?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Component => write!(f, "component"),
            Token::Anchor => write!(f, "anchor"),
            Token::Note => write!(f, "note"),
            Token::Evolve => write!(f, "evolve"),
            Token::Pipeline => write!(f, "pipeline"),
            Token::Pioneers => write!(f, "pioneers"),
            Token::Settlers => write!(f, "settlers"),
            Token::Townplanners => write!(f, "townplanners"),
            Token::Title => write!(f, "title"),
            Token::Label => write!(f, "label"),
            Token::Inertia => write!(f, "inertia"),
            Token::FlowArrow => write!(f, "->>"),
            Token::Arrow => write!(f, "->"),
            Token::ValueArrow => write!(f, "+>"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

/// Tokenize a line fragment. Unlexable spans are dropped; the grammars that
/// care about damaged input go through the recovering string parser with
/// the raw text instead.
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_coordinate_block() {
        let tokens = tokenize("[0.95, 0.05]");
        let kinds: Vec<_> = tokens.iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::LBracket,
                Token::Number("0.95"),
                Token::Comma,
                Token::Number("0.05"),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn flow_arrow_outranks_plain_arrow() {
        let tokens = tokenize("->>");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].0, Token::FlowArrow);
    }

    #[test]
    fn quoted_string_swallows_arrows_and_brackets() {
        let tokens = tokenize(r#""a->b [x]""#);
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].0, Token::String(_)));
    }

    #[test]
    fn negative_and_bare_decimal_numbers() {
        let tokens = tokenize("label [-12, .5]");
        let numbers: Vec<_> = tokens
            .iter()
            .filter_map(|(t, _)| match t {
                Token::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec!["-12", ".5"]);
    }

    #[test]
    fn unlexable_input_is_dropped_not_fatal() {
        let tokens = tokenize("label \u{1}[1, 2]");
        assert!(tokens.iter().any(|(t, _)| *t == Token::LBracket));
    }
}
