//! Parser for the textual rule form
//!
//! ```text
//! productVersion >= 8.0 && productVersion < "8.1"
//! !(productVersion == 5.7.30) or false
//! ```

use crate::rules::RuleError;
use crate::rules::expr::{CmpOp, Expr, Operand, PRODUCT_VERSION};
use crate::version::semver::parse_version;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Bare word: identifier, keyword or unquoted version
    Word(String),
    Quoted(String),
    Op(CmpOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')
}

fn tokenize(input: &str) -> Result<Vec<Token>, RuleError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);
        let token = match (c, next) {
            (c, _) if c.is_whitespace() => continue,
            ('(', _) => Token::LParen,
            (')', _) => Token::RParen,
            ('&', Some('&')) => {
                chars.next();
                Token::And
            }
            ('|', Some('|')) => {
                chars.next();
                Token::Or
            }
            ('=', Some('=')) => {
                chars.next();
                Token::Op(CmpOp::Eq)
            }
            ('!', Some('=')) => {
                chars.next();
                Token::Op(CmpOp::Ne)
            }
            ('<', Some('=')) => {
                chars.next();
                Token::Op(CmpOp::Le)
            }
            ('>', Some('=')) => {
                chars.next();
                Token::Op(CmpOp::Ge)
            }
            ('!', _) => Token::Not,
            ('<', _) => Token::Op(CmpOp::Lt),
            ('>', _) => Token::Op(CmpOp::Gt),
            ('"' | '\'', _) => {
                let quote = c;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => text.push(c),
                        None => return Err(RuleError::UnterminatedString(start)),
                    }
                }
                Token::Quoted(text)
            }
            (c, _) if is_word_char(c) => {
                let mut word = c.to_string();
                while let Some((_, c)) = chars.peek().copied()
                    && is_word_char(c)
                {
                    word.push(c);
                    chars.next();
                }
                match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Word(word),
                }
            }
            (c, _) => return Err(RuleError::UnexpectedChar(c, start)),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, RuleError> {
        let mut items = vec![self.and()?];
        while self.eat(&Token::Or) {
            items.push(self.and()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Or(items)
        })
    }

    fn and(&mut self) -> Result<Expr, RuleError> {
        let mut items = vec![self.unary()?];
        while self.eat(&Token::And) {
            items.push(self.unary()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::And(items)
        })
    }

    fn unary(&mut self) -> Result<Expr, RuleError> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, RuleError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.or()?;
                if !self.eat(&Token::RParen) {
                    return Err(RuleError::Expected("')'"));
                }
                Ok(inner)
            }
            Some(Token::Word(word)) if word == "true" || word == "false" => {
                let value = word == "true";
                self.pos += 1;
                Ok(Expr::Const(value))
            }
            _ => self.comparison(),
        }
    }

    fn comparison(&mut self) -> Result<Expr, RuleError> {
        let lhs = self.operand()?;
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            _ => return Err(RuleError::Expected("comparison operator")),
        };
        let rhs = self.operand()?;
        Ok(Expr::Compare { lhs, op, rhs })
    }

    fn operand(&mut self) -> Result<Operand, RuleError> {
        match self.next() {
            Some(Token::Word(word)) if word == PRODUCT_VERSION => Ok(Operand::ProductVersion),
            Some(Token::Word(text) | Token::Quoted(text)) => literal(&text),
            _ => Err(RuleError::Expected("operand")),
        }
    }
}

/// Build a version literal, rejecting anything that is not a version
pub fn literal(text: &str) -> Result<Operand, RuleError> {
    let version = parse_version(text).ok_or_else(|| RuleError::InvalidLiteral(text.to_string()))?;
    Ok(Operand::Literal {
        text: text.to_string(),
        version,
    })
}

/// Parse a textual rule into an expression tree
pub fn parse_expr(input: &str) -> Result<Expr, RuleError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(RuleError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or()?;
    if parser.pos < parser.tokens.len() {
        return Err(RuleError::TrailingInput);
    }
    Ok(expr)
}
