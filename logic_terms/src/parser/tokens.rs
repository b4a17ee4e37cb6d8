use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'a> {
    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[token("->")]
    Arrow,

    // Predicates, constants and `?variables` alike.
    #[regex(r"[^ \t\r\n\f()]+", |lex| lex.slice())]
    Symbol(&'a str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open => write!(f, "'('"),
            Token::Close => write!(f, "')'"),
            Token::Arrow => write!(f, "'->'"),
            Token::Symbol(s) => write!(f, "'{}'", s),
        }
    }
}

/// Split a line into tokens; unrecognised input is reported by its slice.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, String> {
    let mut lex = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(token) = lex.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(lex.slice().to_string()),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_rule() {
        let tokens = tokenize("((on ?x ?y)) -> (above ?x ?y)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Open,
                Token::Open,
                Token::Symbol("on"),
                Token::Symbol("?x"),
                Token::Symbol("?y"),
                Token::Close,
                Token::Close,
                Token::Arrow,
                Token::Open,
                Token::Symbol("above"),
                Token::Symbol("?x"),
                Token::Symbol("?y"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_whitespace() {
        let tokens = tokenize("  (isa\tcube   block)\n").unwrap();
        assert_eq!(tokens.len(), 5);
    }
}
