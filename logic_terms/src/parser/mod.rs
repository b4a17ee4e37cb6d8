//! Text format for knowledge-base descriptions.
//!
//! One sentence per line:
//!
//! ```text
//! # blocks world
//! fact: (isa cube block)
//! rule: ((isa ?x ?y) (isa ?y ?z)) -> (isa ?x ?z)
//! ```
//!
//! Blank lines and lines starting with `#` or `;` are ignored.

mod tokens;

pub use tokens::{tokenize, Token};

use thiserror::Error;

use crate::terms::{Sentence, Statement, Term};

pub const FACT_PREFIX: &str = "fact:";
pub const RULE_PREFIX: &str = "rule:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected token {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },

    #[error("unrecognised input {0:?}")]
    Unrecognised(String),

    #[error("trailing input after sentence: {0}")]
    TrailingInput(String),

    #[error("expected `fact:` or `rule:` prefix in {0:?}")]
    MissingPrefix(String),

    #[error("rule has no antecedents")]
    EmptyRule,

    #[error("ill-formed statement {0}")]
    IllFormed(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parse a single bare statement such as `(isa cube block)`.
pub fn parse_statement(input: &str) -> Result<Statement> {
    let mut parser = Parser::new(input)?;
    let statement = parser.statement()?;
    parser.finish()?;
    Ok(statement)
}

/// Parse one `fact:` or `rule:` line.
pub fn parse_sentence(input: &str) -> Result<Sentence> {
    let line = input.trim();

    if let Some(rest) = line.strip_prefix(FACT_PREFIX) {
        let mut parser = Parser::new(rest)?;
        let statement = parser.statement()?;
        parser.finish()?;
        Ok(Sentence::Fact(statement))
    } else if let Some(rest) = line.strip_prefix(RULE_PREFIX) {
        let mut parser = Parser::new(rest)?;
        let sentence = parser.rule()?;
        parser.finish()?;
        Ok(sentence)
    } else {
        Err(ParseError::MissingPrefix(line.to_string()))
    }
}

/// Parse a whole knowledge-base description, skipping blanks and comments.
///
/// Errors are wrapped in [`ParseError::AtLine`] with a 1-based line number.
pub fn parse_program(input: &str) -> Result<Vec<Sentence>> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !is_blank_or_comment(line))
        .map(|(line_no, line)| {
            parse_sentence(line).map_err(|e| ParseError::AtLine {
                line: line_no,
                source: Box::new(e),
            })
        })
        .collect()
}

fn is_blank_or_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with(';')
}

/// Recursive-descent parser over the token stream of one line.
struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let tokens = tokenize(input).map_err(ParseError::Unrecognised)?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self, expected: &'static str) -> Result<Token<'a>> {
        let token = self
            .peek()
            .ok_or(ParseError::UnexpectedEnd(expected))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, want: Token<'a>, expected: &'static str) -> Result<()> {
        let token = self.next(expected)?;
        if token == want {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                expected,
            })
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(_) => {
                let rest: Vec<String> = self.tokens[self.pos..]
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
                Err(ParseError::TrailingInput(rest.join(" ")))
            }
        }
    }

    /// `( predicate term* )`
    fn statement(&mut self) -> Result<Statement> {
        self.expect(Token::Open, "'('")?;

        let predicate = match self.next("a predicate")? {
            Token::Symbol(s) => s,
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    expected: "a predicate",
                })
            }
        };

        let mut terms = Vec::new();
        loop {
            match self.next("a term or ')'")? {
                Token::Close => break,
                Token::Symbol(s) => terms.push(Term::from_symbol(s)),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "a term or ')'",
                    })
                }
            }
        }

        let statement = Statement::new(predicate, terms);
        if !statement.is_well_formed() {
            return Err(ParseError::IllFormed(statement.to_string()));
        }
        Ok(statement)
    }

    /// `( statement+ ) -> statement`
    fn rule(&mut self) -> Result<Sentence> {
        self.expect(Token::Open, "'(' opening the antecedents")?;

        let mut lhs = Vec::new();
        while self.peek() == Some(Token::Open) {
            lhs.push(self.statement()?);
        }
        self.expect(Token::Close, "')' closing the antecedents")?;

        if lhs.is_empty() {
            return Err(ParseError::EmptyRule);
        }

        self.expect(Token::Arrow, "'->'")?;
        let rhs = self.statement()?;

        Ok(Sentence::Rule { lhs, rhs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statement() {
        let statement = parse_statement("(isa ?x block)").unwrap();
        assert_eq!(statement.predicate, "isa");
        assert_eq!(
            statement.terms,
            vec![Term::variable("x"), Term::constant("block")]
        );
    }

    #[test]
    fn test_parse_fact_sentence() {
        let sentence = parse_sentence("fact: (color bigbox red)").unwrap();
        assert_eq!(
            sentence,
            Sentence::Fact(Statement::from_symbols("color", ["bigbox", "red"]))
        );
    }

    #[test]
    fn test_parse_rule_sentence() {
        let sentence = parse_sentence("rule: ((isa ?x ?y) (isa ?y ?z)) -> (isa ?x ?z)").unwrap();
        match sentence {
            Sentence::Rule { lhs, rhs } => {
                assert_eq!(lhs.len(), 2);
                assert_eq!(lhs[1], Statement::from_symbols("isa", ["?y", "?z"]));
                assert_eq!(rhs, Statement::from_symbols("isa", ["?x", "?z"]));
            }
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    #[test]
    fn test_display_parses_back() {
        let text = "rule: ((on ?x ?y) (covered ?y)) -> (buried ?x)";
        assert_eq!(parse_sentence(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_sentence("(isa cube block)"),
            Err(ParseError::MissingPrefix("(isa cube block)".to_string()))
        );
        assert_eq!(
            parse_sentence("rule: () -> (p a)"),
            Err(ParseError::EmptyRule)
        );
        assert_eq!(
            parse_sentence("fact: (isa cube"),
            Err(ParseError::UnexpectedEnd("a term or ')'"))
        );
        assert!(matches!(
            parse_sentence("rule: ((p ?x)) (q ?x)"),
            Err(ParseError::UnexpectedToken { expected: "'->'", .. })
        ));
        assert!(matches!(
            parse_sentence("fact: (p a) (q b)"),
            Err(ParseError::TrailingInput(_))
        ));
        assert!(matches!(
            parse_statement("(?p a)"),
            Err(ParseError::IllFormed(_))
        ));
    }

    #[test]
    fn test_parse_program() {
        let program = "\
# blocks world
fact: (isa cube block)

; another comment
fact: (isa block shape)
rule: ((isa ?x ?y) (isa ?y ?z)) -> (isa ?x ?z)
";
        let sentences = parse_program(program).unwrap();
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].is_fact());
        assert!(sentences[2].is_rule());
    }

    #[test]
    fn test_parse_program_reports_line() {
        let program = "fact: (isa cube block)\n\nfact: (isa cube\n";
        match parse_program(program) {
            Err(ParseError::AtLine { line, source }) => {
                assert_eq!(line, 3);
                assert!(matches!(*source, ParseError::UnexpectedEnd(_)));
            }
            other => panic!("expected a line error, got {:?}", other),
        }
    }
}
