//! gettext `Plural-Forms` expressions.
//!
//! Catalogs compiled from `.po` files sometimes ship their own plural
//! formula instead of relying on a built-in table. This module parses the
//! C-like expression language gettext uses for that header and evaluates
//! it against a count.
//!
//! Supported: `n`, unsigned integer literals, `!`, `* / %`, `+ -`,
//! `< <= > >=`, `== !=`, `&&`, `||`, `?:` and parentheses, with C
//! precedence. Arithmetic wraps and division or modulo by zero yields 0,
//! so evaluation is total.
//!
//! Input is bounded: at most [`MAX_TOKENS`] tokens and [`MAX_DEPTH`]
//! levels of parentheses, `!` and `?:` nesting. Both keep parsing,
//! evaluation and drop within a small, fixed stack budget.

use thiserror::Error;

/// Longest expression accepted, in tokens.
pub const MAX_TOKENS: usize = 1024;

/// Deepest nesting of parentheses, `!` and `?:` accepted.
pub const MAX_DEPTH: usize = 64;

/// Errors from parsing a plural expression or header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected end of plural expression")]
    UnexpectedEnd,

    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },

    #[error("integer literal too large at offset {offset}")]
    NumberOverflow { offset: usize },

    #[error("plural forms header is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid nplurals value: {0:?}")]
    InvalidFormCount(String),

    #[error("plural expression nested deeper than {} levels at offset {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },

    #[error("plural expression longer than {} tokens", MAX_TOKENS)]
    TooLong,
}

/// Binary operators, in C precedence groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn binding_power(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    fn apply(self, l: u64, r: u64) -> u64 {
        match self {
            Self::Or => u64::from(l != 0 || r != 0),
            Self::And => u64::from(l != 0 && r != 0),
            Self::Eq => u64::from(l == r),
            Self::Ne => u64::from(l != r),
            Self::Lt => u64::from(l < r),
            Self::Le => u64::from(l <= r),
            Self::Gt => u64::from(l > r),
            Self::Ge => u64::from(l >= r),
            Self::Add => l.wrapping_add(r),
            Self::Sub => l.wrapping_sub(r),
            Self::Mul => l.wrapping_mul(r),
            Self::Div => l.checked_div(r).unwrap_or(0),
            Self::Rem => l.checked_rem(r).unwrap_or(0),
        }
    }
}

/// A parsed plural expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralExpr {
    /// The count, `n`.
    Count,
    Number(u64),
    Not(Box<PluralExpr>),
    Binary {
        op: BinaryOp,
        lhs: Box<PluralExpr>,
        rhs: Box<PluralExpr>,
    },
    Conditional {
        test: Box<PluralExpr>,
        then: Box<PluralExpr>,
        otherwise: Box<PluralExpr>,
    },
}

impl PluralExpr {
    /// Parse an expression such as `(n != 1)`.
    ///
    /// Parsing stops at the first `;`, so the `plural=` value of a header
    /// can be passed in directly.
    pub fn parse(input: &str) -> Result<Self, PluralError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
            depth: 0,
        };
        let expr = parser.conditional()?;
        match parser.peek() {
            None => Ok(expr),
            Some((offset, _)) => Err(PluralError::Expected {
                expected: "end of expression",
                offset,
            }),
        }
    }

    /// Evaluate with `n` bound to `count`.
    #[must_use]
    pub fn evaluate(&self, count: u64) -> u64 {
        match self {
            Self::Count => count,
            Self::Number(v) => *v,
            Self::Not(inner) => u64::from(inner.evaluate(count) == 0),
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate(count);
                // Short-circuit like C so a guarded division never runs.
                match op {
                    BinaryOp::And if l == 0 => 0,
                    BinaryOp::Or if l != 0 => 1,
                    _ => op.apply(l, rhs.evaluate(count)),
                }
            }
            Self::Conditional {
                test,
                then,
                otherwise,
            } => {
                if test.evaluate(count) != 0 {
                    then.evaluate(count)
                } else {
                    otherwise.evaluate(count)
                }
            }
        }
    }
}

/// Split a `Plural-Forms` header (`nplurals=N; plural=EXPR;`) into the
/// number of forms and the parsed expression.
pub fn parse_plural_forms(header: &str) -> Result<(usize, PluralExpr), PluralError> {
    let mut forms = None;
    let mut expr = None;

    for field in header.split(';') {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key.trim() {
            "nplurals" => {
                let value = value.trim();
                let parsed = value
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| PluralError::InvalidFormCount(value.to_string()))?;
                forms = Some(parsed);
            }
            "plural" => expr = Some(PluralExpr::parse(value.trim())?),
            _ => {}
        }
    }

    let forms = forms.ok_or(PluralError::MissingField("nplurals"))?;
    let expr = expr.ok_or(PluralError::MissingField("plural"))?;
    Ok((forms, expr))
}

// ── Lexer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Count,
    Number(u64),
    Op(BinaryOp),
    Not,
    Question,
    Colon,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, PluralError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let mut followed_by = |next: char| chars.next_if(|&(_, c)| c == next).is_some();
        let token = match ch {
            c if c.is_whitespace() => continue,
            ';' => break,
            'n' => Token::Count,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '?' => Token::Question,
            ':' => Token::Colon,
            '+' => Token::Op(BinaryOp::Add),
            '-' => Token::Op(BinaryOp::Sub),
            '*' => Token::Op(BinaryOp::Mul),
            '/' => Token::Op(BinaryOp::Div),
            '%' => Token::Op(BinaryOp::Rem),
            '=' if followed_by('=') => Token::Op(BinaryOp::Eq),
            '!' if followed_by('=') => Token::Op(BinaryOp::Ne),
            '!' => Token::Not,
            '<' if followed_by('=') => Token::Op(BinaryOp::Le),
            '<' => Token::Op(BinaryOp::Lt),
            '>' if followed_by('=') => Token::Op(BinaryOp::Ge),
            '>' => Token::Op(BinaryOp::Gt),
            '&' if followed_by('&') => Token::Op(BinaryOp::And),
            '|' if followed_by('|') => Token::Op(BinaryOp::Or),
            c if c.is_ascii_digit() => {
                let mut value = u64::from(c as u8 - b'0');
                while let Some((_, d)) = chars.next_if(|(_, d)| d.is_ascii_digit()) {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(d as u8 - b'0')))
                        .ok_or(PluralError::NumberOverflow { offset })?;
                }
                Token::Number(value)
            }
            ch => return Err(PluralError::UnexpectedChar { ch, offset }),
        };
        if tokens.len() == MAX_TOKENS {
            return Err(PluralError::TooLong);
        }
        tokens.push((offset, token));
    }

    Ok(tokens)
}

// ── Parser ──────────────────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(usize, Token)> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Result<(usize, Token), PluralError> {
        let token = self.peek().ok_or(PluralError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, want: Token, expected: &'static str) -> Result<(), PluralError> {
        match self.peek() {
            Some((_, tok)) if tok == want => {
                self.pos += 1;
                Ok(())
            }
            Some((offset, _)) => Err(PluralError::Expected { expected, offset }),
            None => Err(PluralError::Expected {
                expected,
                offset: self.end,
            }),
        }
    }

    fn nested<T>(
        &mut self,
        offset: usize,
        parse: impl FnOnce(&mut Self) -> Result<T, PluralError>,
    ) -> Result<T, PluralError> {
        if self.depth >= MAX_DEPTH {
            return Err(PluralError::TooDeep { offset });
        }
        self.depth += 1;
        let out = parse(self);
        self.depth -= 1;
        out
    }

    // cond := binary ('?' cond ':' cond)?
    fn conditional(&mut self) -> Result<PluralExpr, PluralError> {
        let test = self.binary(0)?;
        let Some((offset, Token::Question)) = self.peek() else {
            return Ok(test);
        };
        self.pos += 1;
        let then = self.nested(offset, Self::conditional)?;
        self.expect(Token::Colon, "':'")?;
        let otherwise = self.nested(offset, Self::conditional)?;
        Ok(PluralExpr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn binary(&mut self, min_power: u8) -> Result<PluralExpr, PluralError> {
        let mut lhs = self.unary()?;
        while let Some((_, Token::Op(op))) = self.peek() {
            let power = op.binding_power();
            if power <= min_power {
                break;
            }
            self.pos += 1;
            let rhs = self.binary(power)?;
            lhs = PluralExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<PluralExpr, PluralError> {
        match self.advance()? {
            (offset, Token::Not) => {
                let inner = self.nested(offset, Self::unary)?;
                Ok(PluralExpr::Not(Box::new(inner)))
            }
            (_, Token::Count) => Ok(PluralExpr::Count),
            (_, Token::Number(v)) => Ok(PluralExpr::Number(v)),
            (offset, Token::LParen) => {
                let inner = self.nested(offset, Self::conditional)?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            (offset, _) => Err(PluralError::Expected {
                expected: "n, a number, '!' or '('",
                offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str, n: u64) -> u64 {
        PluralExpr::parse(src).unwrap().evaluate(n)
    }

    #[test]
    fn germanic_expression() {
        assert_eq!(eval("(n != 1)", 0), 1);
        assert_eq!(eval("(n != 1)", 1), 0);
        assert_eq!(eval("(n != 1)", 7), 1);
    }

    #[test]
    fn russian_expression() {
        let src = "(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)";
        let got: Vec<u64> = [1, 2, 5, 11, 21, 22, 111].iter().map(|&n| eval(src, n)).collect();
        assert_eq!(got, vec![0, 1, 2, 2, 0, 1, 2]);
    }

    #[test]
    fn arabic_expression() {
        let src = "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5";
        let got: Vec<u64> = [0, 1, 2, 3, 11, 100].iter().map(|&n| eval(src, n)).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn precedence_matches_c() {
        assert_eq!(eval("1 + 2 * 3", 0), 7);
        assert_eq!(eval("(1 + 2) * 3", 0), 9);
        assert_eq!(eval("10 - 4 - 3", 0), 3);
        assert_eq!(eval("0 || 1 && 0", 0), 0);
        assert_eq!(eval("!n", 0), 1);
        assert_eq!(eval("!n", 3), 0);
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(eval("n % 0", 5), 0);
        assert_eq!(eval("n / 0", 5), 0);
        assert_eq!(eval("0 && n / 0", 5), 0);
    }

    #[test]
    fn stops_at_semicolon() {
        assert_eq!(eval("n > 1; garbage", 2), 1);
    }

    #[test]
    fn header_parsing() {
        let (forms, expr) = parse_plural_forms("nplurals=2; plural=(n > 1);").unwrap();
        assert_eq!(forms, 2);
        assert_eq!(expr.evaluate(1), 0);
        assert_eq!(expr.evaluate(2), 1);

        let (forms, _) = parse_plural_forms(" nplurals = 1 ; plural = 0 ; ").unwrap();
        assert_eq!(forms, 1);
    }

    #[test]
    fn header_errors() {
        assert_eq!(
            parse_plural_forms("plural=(n != 1);"),
            Err(PluralError::MissingField("nplurals"))
        );
        assert_eq!(
            parse_plural_forms("nplurals=2;"),
            Err(PluralError::MissingField("plural"))
        );
        assert_eq!(
            parse_plural_forms("nplurals=zero; plural=0;"),
            Err(PluralError::InvalidFormCount("zero".into()))
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(PluralExpr::parse(""), Err(PluralError::UnexpectedEnd));
        assert!(matches!(
            PluralExpr::parse("x"),
            Err(PluralError::UnexpectedChar { ch: 'x', offset: 0 })
        ));
        assert_eq!(PluralExpr::parse("n +"), Err(PluralError::UnexpectedEnd));
        assert!(PluralExpr::parse("n = 1").is_err());
        assert!(PluralExpr::parse("(n").is_err());
        assert!(PluralExpr::parse("n ? 1").is_err());
        assert!(PluralExpr::parse("n 1").is_err());
        assert!(matches!(
            PluralExpr::parse("99999999999999999999999"),
            Err(PluralError::NumberOverflow { offset: 0 })
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}n{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(eval(&ok, 4), 4);

        let deep = format!("{}n{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            PluralExpr::parse(&deep),
            Err(PluralError::TooLong)
        ));

        let parens = format!("{}n{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(
            PluralExpr::parse(&parens),
            Err(PluralError::TooDeep { offset: MAX_DEPTH })
        );

        let nots = format!("{}n", "!".repeat(MAX_DEPTH + 1));
        assert!(matches!(PluralExpr::parse(&nots), Err(PluralError::TooDeep { .. })));

        let ternary = format!("{}0", "n ? 1 : ".repeat(MAX_DEPTH + 1));
        assert!(matches!(PluralExpr::parse(&ternary), Err(PluralError::TooDeep { .. })));
    }

    #[test]
    fn length_is_bounded() {
        let chain = vec!["n"; MAX_TOKENS].join("+");
        assert_eq!(PluralExpr::parse(&chain), Err(PluralError::TooLong));

        let fits = vec!["1"; MAX_TOKENS / 2].join("+");
        assert_eq!(eval(&fits, 0), (MAX_TOKENS / 2) as u64);
        assert!(matches!(
            parse_plural_forms(&format!("nplurals=2; plural={chain};")),
            Err(PluralError::TooLong)
        ));
    }
}
