use std::{
    fmt::Display,
    ops::{Deref, Range},
    str::CharIndices,
};

use itertools::Itertools;

use crate::error::{Error, ErrorKind};

/// The only unknown an equation may contain.
pub const VARIABLE: char = 'x';

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Open,
    Close,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            '^' => Some(Operator::Pow),
            '(' => Some(Operator::Open),
            ')' => Some(Operator::Close),
            _ => None,
        }
    }

    pub const fn as_char(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Pow => '^',
            Operator::Open => '(',
            Operator::Close => ')',
        }
    }

    /// Base precedence. Brackets have none, they only shift the offset of
    /// the operators between them.
    pub const fn priority(&self) -> Option<u32> {
        match self {
            Operator::Add | Operator::Sub => Some(1),
            Operator::Mul | Operator::Div | Operator::Rem => Some(2),
            Operator::Pow => Some(3),
            Operator::Open | Operator::Close => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TokenKind {
    Number(f64),
    Operator(Operator),
    Variable,
    Equals,
}

impl TokenKind {
    pub fn is_operand(&self) -> bool {
        matches!(self, TokenKind::Number(_) | TokenKind::Variable)
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            TokenKind::Operator(op) => Some(*op),
            _ => None,
        }
    }

    pub fn is(&self, op: Operator) -> bool {
        self.operator() == Some(op)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(num) => write!(f, "{num}"),
            TokenKind::Operator(op) => write!(f, "{op}"),
            TokenKind::Variable => write!(f, "{VARIABLE}"),
            TokenKind::Equals => write!(f, "="),
        }
    }
}

impl From<f64> for TokenKind {
    fn from(num: f64) -> Self {
        TokenKind::Number(num)
    }
}

impl From<Operator> for TokenKind {
    fn from(op: Operator) -> Self {
        TokenKind::Operator(op)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    kind: TokenKind,
    span: Range<usize>,
}

impl Token {
    pub fn new(kind: impl Into<TokenKind>, span: Range<usize>) -> Self {
        Token {
            kind: kind.into(),
            span,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Deref for Token {
    type Target = TokenKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

pub struct TextParser<'a> {
    source: &'a str,
    start_pos: usize,
    current: Option<(usize, char)>,
    iter: CharIndices<'a>,
    tokens: Vec<Token>,
}

impl<'a> TextParser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut iter = source.char_indices();
        let current = iter.next();
        TextParser {
            source,
            start_pos: 0,
            current,
            iter,
            tokens: Vec::new(),
        }
    }

    fn next(&mut self) -> Option<char> {
        self.current = self.iter.next();
        self.current.map(|(_, c)| c)
    }

    fn pos(&self) -> usize {
        self.current
            .map(|(pos, _)| pos)
            .unwrap_or(self.source.len())
    }

    fn start(&mut self) {
        self.start_pos = self.pos();
    }

    fn span(&self) -> Range<usize> {
        self.start_pos..self.pos()
    }

    fn token(&mut self, token: impl Into<TokenKind>) {
        self.tokens.push(Token::new(token, self.span()));
    }

    fn parse_number(&mut self) -> Result<f64, Error> {
        let mut points = 0;
        while let Some((_, c)) = self.current {
            match c {
                '0'..='9' => {}
                '.' => points += 1,
                _ => break,
            }
            self.next();
        }
        let numeral = &self.source[self.span()];
        let malformed = || Error::new(ErrorKind::MalformedNumber(numeral.to_string()), self.span());
        if points > 1 {
            return Err(malformed());
        }
        numeral.parse::<f64>().map_err(|_| malformed())
    }

    pub fn parse(mut self) -> Result<Vec<Token>, Error> {
        while let Some((_, current)) = self.current {
            if current.is_whitespace() {
                self.next();
                continue;
            }
            self.start();
            if current.is_ascii_digit() || current == '.' {
                let num = self.parse_number()?;
                self.token(num);
                continue;
            }
            self.next();
            if let Some(op) = Operator::from_char(current) {
                self.token(op);
            } else if current == VARIABLE {
                self.token(TokenKind::Variable);
            } else if current == '=' {
                self.token(TokenKind::Equals);
            } else {
                return Err(Error::new(ErrorKind::UndefinedSymbol(current), self.span()));
            }
        }
        Ok(self.tokens)
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    TextParser::new(input).parse()
}

/// Writes tokens back out, one space between each.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens.iter().join(" ")
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Expression(Vec<Token>),
    /// `L = R`, already rewritten as `L - (R)`.
    Equation(Vec<Token>),
}

impl Statement {
    /// Only the first `=` splits the equation, any later one stays in the
    /// right-hand side.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, Error> {
        match tokens
            .iter()
            .position(|t| matches!(t.kind, TokenKind::Equals))
        {
            Some(equals) => Ok(Statement::Equation(move_to_left(tokens, equals))),
            None => match tokens.iter().find(|t| matches!(t.kind, TokenKind::Variable)) {
                Some(var) => Err(Error::new(ErrorKind::VariableOutsideEquation, var.span())),
                None => Ok(Statement::Expression(tokens)),
            },
        }
    }

    pub fn tokens(&self) -> &[Token] {
        match self {
            Statement::Expression(tokens) | Statement::Equation(tokens) => tokens,
        }
    }
}

fn move_to_left(mut tokens: Vec<Token>, equals: usize) -> Vec<Token> {
    let end = tokens.last().map(|t| t.span.end).unwrap_or_default();
    let right = tokens.split_off(equals + 1);
    let equals = tokens.pop().map(|t| t.span).unwrap_or(end..end);
    tokens.reserve(right.len() + 3);
    tokens.push(Token::new(Operator::Sub, equals.clone()));
    tokens.push(Token::new(Operator::Open, equals));
    tokens.extend(right);
    tokens.push(Token::new(Operator::Close, end..end));
    tokens
}
