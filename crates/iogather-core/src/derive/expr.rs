// Dweve IOGather - Parallel I/O benchmark log aggregation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Arithmetic expressions over record fields.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | atom
//! atom   := number | identifier | '(' expr ')'
//! ```
//!
//! Identifiers are field names (`[A-Za-z_][A-Za-z0-9_.]*`).

use crate::error::ExprError;
use crate::record::Record;
use crate::value::{coerce, Value};
use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

/// A parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Expr {
    /// Reference to a record field.
    Field(String),
    /// Numeric literal.
    Literal(Value),
    /// Unary minus.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Parse an expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use iogather_core::derive::Expr;
    ///
    /// let expr = Expr::parse("total_io_size / total_time_mean").unwrap();
    /// assert_eq!(expr.fields(), vec!["total_io_size", "total_time_mean"]);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expr()?;
        if let Some(tok) = parser.tokens.get(parser.pos) {
            return Err(ExprError::TrailingInput { offset: tok.offset });
        }
        Ok(expr)
    }

    /// Field reference.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Binary operation over two subexpressions.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Field names referenced by the expression, in order of appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Field(name) => out.push(name),
            Self::Literal(_) => {}
            Self::Neg(inner) => inner.collect_fields(out),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_fields(out);
                rhs.collect_fields(out);
            }
        }
    }

    /// Evaluate against a record.
    ///
    /// Returns `None` when a referenced field is absent or not numeric, on
    /// division by zero, on integer overflow and on non-finite results.
    pub fn eval(&self, record: &Record) -> Option<Value> {
        let value = match self {
            Self::Field(name) => record.get(name).filter(|v| v.is_numeric()).cloned()?,
            Self::Literal(v) => v.clone(),
            Self::Neg(inner) => match inner.eval(record)? {
                Value::Int(n) => Value::Int(n.checked_neg()?),
                Value::Float(f) => Value::Float(-f),
                Value::Text(_) => return None,
            },
            Self::Binary { op, lhs, rhs } => apply(*op, lhs.eval(record)?, rhs.eval(record)?)?,
        };
        match value {
            Value::Float(f) if !f.is_finite() => None,
            v => Some(v),
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::Literal(v) => write!(f, "{}", v),
            Self::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_nested(f, true)
            }
            Self::Binary { op, lhs, rhs } => {
                if nested {
                    write!(f, "(")?;
                }
                lhs.fmt_nested(f, true)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_nested(f, true)?;
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Option<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
        let int = match op {
            BinOp::Add => Some(a.checked_add(*b)?),
            BinOp::Sub => Some(a.checked_sub(*b)?),
            BinOp::Mul => Some(a.checked_mul(*b)?),
            BinOp::Div => None,
        };
        if let Some(n) = int {
            return Some(Value::Int(n));
        }
    }

    let a = lhs.as_float()?;
    let b = rhs.as_float()?;
    let out = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return None;
            }
            a / b
        }
    };
    Some(Value::Float(out))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, false)
    }
}

impl TryFrom<String> for Expr {
    type Error = ExprError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Expr::parse(&text)
    }
}

impl From<Expr> for String {
    fn from(expr: Expr) -> Self {
        expr.to_string()
    }
}

// ==================== Lexer ====================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(Value),
    Op(BinOp),
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => TokenKind::Op(BinOp::Add),
            b'-' => TokenKind::Op(BinOp::Sub),
            b'*' => TokenKind::Op(BinOp::Mul),
            b'/' => TokenKind::Op(BinOp::Div),
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let literal = coerce(&text[start..i]);
                if !literal.is_numeric() {
                    return Err(ExprError::UnexpectedToken {
                        token: text[start..i].to_string(),
                        offset: start,
                    });
                }
                tokens.push(Token {
                    kind: TokenKind::Number(literal),
                    offset: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(text[start..i].to_string()),
                    offset: start,
                });
                continue;
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or_default();
                return Err(ExprError::UnexpectedToken {
                    token: ch.to_string(),
                    offset: start,
                });
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
        i += 1;
    }

    Ok(tokens)
}

fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // exponent: e, E, optionally signed
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

// ==================== Parser ====================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        while let Some(TokenKind::Op(op @ (BinOp::Add | BinOp::Sub))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while let Some(TokenKind::Op(op @ (BinOp::Mul | BinOp::Div))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if let Some(TokenKind::Op(BinOp::Sub)) = self.peek() {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        let tok = self.next().ok_or(ExprError::UnexpectedEnd)?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Expr::Field(name)),
            TokenKind::Number(v) => Ok(Expr::Literal(v)),
            TokenKind::LParen => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(unexpected(&other)),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            _ => Err(unexpected(&tok)),
        }
    }
}

fn unexpected(tok: &Token) -> ExprError {
    let token = match &tok.kind {
        TokenKind::Ident(s) => s.clone(),
        TokenKind::Number(v) => v.to_string(),
        TokenKind::Op(op) => op.symbol().to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
    };
    ExprError::UnexpectedToken {
        token,
        offset: tok.offset,
    }
}
