//! Boolean guards on state-machine transitions.
//!
//! ```text
//! expr    := and ('||' and)*
//! and     := cmp ('&&' cmp)*
//! cmp     := operand (('==' | '!=' | '<' | '<=' | '>' | '>=') operand)?
//! operand := ident('.' ident)* | number | 'string' | "string" | true | false
//! ```
//!
//! A bare operand tests truthiness. Identifiers look up keys in the event
//! context; a missing key makes every comparison false except `!=`.
//! Parentheses, negation and arithmetic are rejected when parsed.

use std::cmp::Ordering;

use serde_json::Value;

use crate::foundation::error::{VibeError, VibeResult};

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    True,
    False,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::EqEq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::AndAnd | Self::OrOr
        )
    }
}

fn lex(input: &str) -> VibeResult<Vec<Token>> {
    let mut out: Vec<Token> = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;

        // A leading minus belongs to a number only in operand position.
        let operand_position = out.last().is_none_or(|t| t.kind.is_operator());
        let negative = c == '-'
            && operand_position
            && i + 1 < bytes.len()
            && (bytes[i + 1] as char).is_ascii_digit();

        if c.is_ascii_digit() || negative {
            i += 1;
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            if i + 1 < bytes.len()
                && bytes[i] as char == '.'
                && (bytes[i + 1] as char).is_ascii_digit()
            {
                i += 1;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
            }
            let v: f64 = input[start..i]
                .parse()
                .map_err(|_| VibeError::condition(start, "invalid number"))?;
            out.push(Token {
                kind: TokenKind::Number(v),
                offset: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            loop {
                while i < bytes.len() && {
                    let ch = bytes[i] as char;
                    ch.is_ascii_alphanumeric() || ch == '_'
                } {
                    i += 1;
                }
                // Dotted path: `pointer.x`.
                if i + 1 < bytes.len()
                    && bytes[i] as char == '.'
                    && ((bytes[i + 1] as char).is_ascii_alphabetic() || bytes[i + 1] == b'_')
                {
                    i += 1;
                    continue;
                }
                break;
            }
            let kind = match &input[start..i] {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                s => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                offset: start,
            });
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = bytes[i];
            i += 1;
            let body = i;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(VibeError::condition(start, "unterminated string"));
            }
            out.push(Token {
                kind: TokenKind::Str(input[body..i].to_owned()),
                offset: start,
            });
            i += 1;
            continue;
        }

        if i + 1 < bytes.len() {
            let kind = match &bytes[i..i + 2] {
                b"&&" => Some(TokenKind::AndAnd),
                b"||" => Some(TokenKind::OrOr),
                b"==" => Some(TokenKind::EqEq),
                b"!=" => Some(TokenKind::Ne),
                b"<=" => Some(TokenKind::Le),
                b">=" => Some(TokenKind::Ge),
                _ => None,
            };
            if let Some(kind) = kind {
                out.push(Token {
                    kind,
                    offset: start,
                });
                i += 2;
                continue;
            }
        }

        let kind = match c {
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '(' | ')' => return Err(VibeError::condition(start, "parentheses are not supported")),
            '+' | '-' | '*' | '/' | '%' => {
                return Err(VibeError::condition(start, "arithmetic is not supported"));
            }
            '!' => return Err(VibeError::condition(start, "negation is not supported")),
            '=' => return Err(VibeError::condition(start, "use '==' for equality")),
            _ => {
                return Err(VibeError::condition(
                    start,
                    format!("unexpected character '{c}'"),
                ));
            }
        };
        out.push(Token {
            kind,
            offset: start,
        });
        i += 1;
    }

    out.push(Token {
        kind: TokenKind::Eof,
        offset: input.len(),
    });
    Ok(out)
}

#[derive(Clone, Debug, PartialEq)]
enum Operand {
    Path(Vec<String>),
    Literal(Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Or(Vec<Expr>),
    And(Vec<Expr>),
    Compare {
        left: Operand,
        op: CmpOp,
        right: Operand,
    },
    Truthy(Operand),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> VibeResult<Expr> {
        let mut terms = vec![self.parse_and()?];
        while self.consume(&TokenKind::OrOr) {
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Or(terms)
        })
    }

    fn parse_and(&mut self) -> VibeResult<Expr> {
        let mut terms = vec![self.parse_cmp()?];
        while self.consume(&TokenKind::AndAnd) {
            terms.push(self.parse_cmp()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::And(terms)
        })
    }

    fn cmp_op(&self) -> Option<CmpOp> {
        Some(match self.peek().kind {
            TokenKind::EqEq => CmpOp::Eq,
            TokenKind::Ne => CmpOp::Ne,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Ge => CmpOp::Ge,
            _ => return None,
        })
    }

    fn parse_cmp(&mut self) -> VibeResult<Expr> {
        let left = self.parse_operand()?;
        let Some(op) = self.cmp_op() else {
            return Ok(Expr::Truthy(left));
        };
        self.bump();
        let right = self.parse_operand()?;
        if self.cmp_op().is_some() {
            return Err(VibeError::condition(
                self.peek().offset,
                "comparisons cannot be chained",
            ));
        }
        Ok(Expr::Compare { left, op, right })
    }

    fn parse_operand(&mut self) -> VibeResult<Operand> {
        let t = self.bump();
        Ok(match t.kind {
            TokenKind::Ident(name) => Operand::Path(name.split('.').map(str::to_owned).collect()),
            TokenKind::Number(v) => Operand::Literal(Value::from(v)),
            TokenKind::Str(s) => Operand::Literal(Value::String(s)),
            TokenKind::True => Operand::Literal(Value::Bool(true)),
            TokenKind::False => Operand::Literal(Value::Bool(false)),
            TokenKind::Eof => {
                return Err(VibeError::condition(t.offset, "expected an operand"));
            }
            other => {
                return Err(VibeError::condition(
                    t.offset,
                    format!("expected an operand, found {other:?}"),
                ));
            }
        })
    }
}

/// A parsed transition guard.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    /// Parse `src`, rejecting anything outside the supported grammar.
    pub fn parse(src: &str) -> VibeResult<Self> {
        let tokens = lex(src)?;
        if tokens.len() == 1 {
            return Err(VibeError::condition(0, "empty condition"));
        }
        let mut p = Parser { tokens, pos: 0 };
        let expr = p.parse_or()?;
        let end = p.peek();
        if end.kind != TokenKind::Eof {
            return Err(VibeError::condition(
                end.offset,
                format!("unexpected {:?}", end.kind),
            ));
        }
        Ok(Self {
            source: src.to_owned(),
            expr,
        })
    }

    /// Source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against an event context, normally a JSON object.
    pub fn evaluate(&self, context: &Value) -> bool {
        eval(&self.expr, context)
    }
}

fn eval(expr: &Expr, ctx: &Value) -> bool {
    match expr {
        Expr::Or(terms) => terms.iter().any(|e| eval(e, ctx)),
        Expr::And(terms) => terms.iter().all(|e| eval(e, ctx)),
        Expr::Truthy(op) => resolve(op, ctx).is_some_and(truthy),
        Expr::Compare { left, op, right } => {
            match (resolve(left, ctx), resolve(right, ctx)) {
                (Some(l), Some(r)) => compare(l, *op, r),
                _ => *op == CmpOp::Ne,
            }
        }
    }
}

fn resolve<'a>(op: &'a Operand, ctx: &'a Value) -> Option<&'a Value> {
    match op {
        Operand::Literal(v) => Some(v),
        Operand::Path(segments) => {
            let mut cur = ctx;
            for seg in segments {
                cur = match cur {
                    Value::Object(map) => map.get(seg)?,
                    Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                    _ => return None,
                };
            }
            if cur.is_null() { None } else { Some(cur) }
        }
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn compare(l: &Value, op: CmpOp, r: &Value) -> bool {
    let ord = match (l, r) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };
    match (op, ord) {
        (CmpOp::Eq, Some(o)) => o == Ordering::Equal,
        (CmpOp::Ne, Some(o)) => o != Ordering::Equal,
        (CmpOp::Eq, None) => false,
        (CmpOp::Ne, None) => true,
        (CmpOp::Lt, Some(o)) => o == Ordering::Less,
        (CmpOp::Le, Some(o)) => o != Ordering::Greater,
        (CmpOp::Gt, Some(o)) => o == Ordering::Greater,
        (CmpOp::Ge, Some(o)) => o != Ordering::Less,
        (_, None) => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/condition.rs"]
mod tests;
