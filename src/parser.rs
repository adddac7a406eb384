//! Reader for the prefix-notation formula language.
//!
//! Every operator comes first and its operands follow in parentheses:
//!
//! | Text                       | Expression                          |
//! |----------------------------|-------------------------------------|
//! | `42`, `2.5`                | natural / real literal              |
//! | `n(42)`, `n42.`, `n42)`    | explicit natural literal            |
//! | `r(-2.5)`, `r2.5)`         | signed explicit real literal        |
//! | `x`, `p`                   | the variable, π                     |
//! | `+(a,b)` `-(a,b)` `*(a,b)` | sum, difference, product            |
//! | `/(a,b)` `^(a,b)`          | quotient, power                     |
//! | `s(a)` `c(a)` `e(a)`       | sine, cosine, exponential           |
//! | `l(a)` `!(a)`              | natural logarithm, factorial        |
//!
//! Whitespace is insignificant and removed before reading. The reader never
//! backtracks: each production looks at one character and then scans forward to the
//! delimiter it needs, skipping whatever lies in between. Text that remains after the
//! root expression has been read is ignored. Nesting is limited to [`MAX_DEPTH`]
//! operator levels.

use std::str::FromStr;

use tracing::{debug, trace};

use crate::errors::ParseError;
use crate::expr::Expr;

/// Deepest operator nesting the reader accepts.
pub const MAX_DEPTH: usize = 1024;

/// Parses a formula into an expression tree.
///
/// # Errors
/// Returns [`ParseError::Empty`] for empty or all-whitespace input, and the first
/// structural error otherwise. There is no recovery.
///
/// # Example
/// ```
/// use symcalc::prelude::*;
///
/// let expr = parse("/( s(*(p, x)), +(x, 5) )").unwrap();
/// assert_eq!(expr.to_string(), "(sin((π * x)) / (x + 5))");
/// assert!(parse("   ").is_err());
/// ```
pub fn parse(formula: &str) -> Result<Expr, ParseError> {
    let stripped: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Err(ParseError::Empty);
    }

    let reader = Reader { source: &stripped };
    let (expr, rest) = reader.read(&stripped, 0)?;
    if !rest.is_empty() {
        trace!(ignored = rest, "trailing text after formula");
    }
    debug!(formula = %stripped, nodes = expr.node_count(), "parsed formula");
    Ok(expr)
}

/// Reads one expression from the front of `text`, returning it with the unread remainder.
///
/// Unlike [`parse`], whitespace is not removed and an empty `text` reports
/// [`ParseError::UnexpectedEnd`].
pub fn read(text: &str) -> Result<(Expr, &str), ParseError> {
    Reader { source: text }.read(text, 0)
}

/// Splits `text` at the first occurrence of any of `delimiters`.
///
/// Returns the prefix before the delimiter and the remainder starting at it, or
/// `None` when no delimiter occurs.
pub fn read_until<'t>(text: &'t str, delimiters: &[char]) -> Option<(&'t str, &'t str)> {
    let index = text.find(|c: char| delimiters.contains(&c))?;
    Some(text.split_at(index))
}

/// Splits at the first delimiter, taking everything when there is none.
fn read_until_or_end<'t>(text: &'t str, delimiters: &[char]) -> (&'t str, &'t str) {
    read_until(text, delimiters).unwrap_or((text, ""))
}

struct Reader<'a> {
    source: &'a str,
}

impl<'a> Reader<'a> {
    /// Byte offset of `rest` within the source text.
    fn position(&self, rest: &str) -> usize {
        self.source.len() - rest.len()
    }

    fn read(&self, text: &'a str, depth: usize) -> Result<(Expr, &'a str), ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        let mut chars = text.chars();
        let first = chars.next().ok_or(ParseError::UnexpectedEnd)?;
        let rest = chars.as_str();

        match first {
            '0'..='9' => {
                let (tail, rest) = read_until_or_end(rest, &[',', ')']);
                let literal = &text[..1 + tail.len()];
                Ok((number_literal(literal)?, rest))
            }
            'n' => {
                let (digits, rest) = self.tagged_literal(rest, &[')', '.'])?;
                let value = digits.parse::<u64>().map_err(|_| invalid_number(digits))?;
                Ok((Expr::NaturalNumber(value), rest))
            }
            'r' => {
                let (digits, rest) = self.tagged_literal(rest, &[')'])?;
                let value = digits.parse::<f64>().map_err(|_| invalid_number(digits))?;
                Ok((Expr::RealNumber(value), rest))
            }
            'x' => Ok((Expr::Variable, read_until_or_end(rest, &[',', ')']).1)),
            'p' => Ok((Expr::Pi, read_until_or_end(rest, &[',', ')']).1)),
            '+' | '-' | '*' | '/' | '^' => {
                let rest = self.expect(rest, '(')?;
                let (left, rest) = self.read(rest, depth + 1)?;
                let rest = self.expect(rest, ',')?;
                let (right, rest) = self.read(rest, depth + 1)?;
                let expr = match first {
                    '+' => Expr::sum(left, right),
                    '-' => Expr::difference(left, right),
                    '*' => Expr::product(left, right),
                    '/' => Expr::quotient(left, right),
                    _ => Expr::power_unchecked(left, right),
                };
                Ok((expr, rest))
            }
            's' | 'c' | 'e' | 'l' | '!' => {
                let rest = self.expect(rest, '(')?;
                let (arg, rest) = self.read(rest, depth + 1)?;
                let expr = match first {
                    's' => Expr::sin(arg),
                    'c' => Expr::cos(arg),
                    'e' => Expr::exp(arg),
                    'l' => Expr::ln(arg),
                    _ => Expr::factorial(arg),
                };
                Ok((expr, rest))
            }
            found => Err(ParseError::UnexpectedChar {
                found,
                position: self.position(text),
            }),
        }
    }

    /// Digits of an `n`/`r` literal, either bare up to `delimiters` or wrapped as `(digits)`.
    fn tagged_literal(
        &self,
        text: &'a str,
        delimiters: &[char],
    ) -> Result<(&'a str, &'a str), ParseError> {
        match text.strip_prefix('(') {
            Some(inner) => {
                let (digits, rest) = read_until_or_end(inner, delimiters);
                Ok((digits, self.expect(rest, ')')?))
            }
            None => Ok(read_until_or_end(text, delimiters)),
        }
    }

    /// Skips forward past the next `delimiter`.
    fn expect(&self, text: &'a str, delimiter: char) -> Result<&'a str, ParseError> {
        let (_, rest) =
            read_until(text, &[delimiter]).ok_or_else(|| ParseError::MissingDelimiter {
                expected: delimiter,
                position: self.position(text),
            })?;
        Ok(&rest[delimiter.len_utf8()..])
    }
}

fn number_literal(literal: &str) -> Result<Expr, ParseError> {
    if literal.contains('.') {
        literal
            .parse::<f64>()
            .map(Expr::RealNumber)
            .map_err(|_| invalid_number(literal))
    } else {
        literal
            .parse::<u64>()
            .map(Expr::NaturalNumber)
            .map_err(|_| invalid_number(literal))
    }
}

fn invalid_number(text: &str) -> ParseError {
    ParseError::InvalidNumber {
        text: text.to_string(),
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Variable
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42"), Ok(Expr::natural(42)));
        assert_eq!(parse("3.25"), Ok(Expr::real(3.25)));
        assert_eq!(parse("n12."), Ok(Expr::natural(12)));
        assert_eq!(parse("n7)"), Ok(Expr::natural(7)));
        assert_eq!(parse("r2.5)"), Ok(Expr::real(2.5)));
        assert_eq!(parse("r-1.5)"), Ok(Expr::real(-1.5)));
        assert_eq!(parse("x"), Ok(x()));
        assert_eq!(parse("p"), Ok(Expr::Pi));
    }

    #[test]
    fn test_wrapped_literals() {
        assert_eq!(parse("n(5)"), Ok(Expr::natural(5)));
        assert_eq!(parse("r(2.5)"), Ok(Expr::real(2.5)));
        assert_eq!(parse("r(-1.5)"), Ok(Expr::real(-1.5)));
        assert_eq!(
            parse("+(r(-1.5),x)"),
            Ok(Expr::sum(Expr::real(-1.5), x()))
        );
        assert_eq!(
            parse("*(n(3),s(r(0.5)))"),
            Ok(Expr::product(Expr::natural(3), Expr::sin(Expr::real(0.5))))
        );

        let (expr, rest) = read("r(2.0),x)").unwrap();
        assert_eq!(expr, Expr::real(2.0));
        assert_eq!(rest, ",x)");

        assert_eq!(
            parse("r(2.5"),
            Err(ParseError::MissingDelimiter {
                expected: ')',
                position: 5
            })
        );
        assert!(matches!(parse("n(-1)"), Err(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| format!("{}x{}", "s(".repeat(levels), ")".repeat(levels));

        let expr = parse(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(expr.depth(), MAX_DEPTH + 1);

        let limit = Err(ParseError::TooDeep { limit: MAX_DEPTH });
        assert_eq!(parse(&nested(MAX_DEPTH + 1)), limit);
        assert_eq!(parse(&nested(20_000)), limit);
    }

    #[test]
    fn test_operators() {
        assert_eq!(parse("+(1,2)"), Ok(Expr::sum(Expr::natural(1), Expr::natural(2))));
        assert_eq!(parse("-(x,1)"), Ok(Expr::difference(x(), Expr::natural(1))));
        assert_eq!(parse("*(2,x)"), Ok(Expr::product(Expr::natural(2), x())));
        assert_eq!(parse("/(x,2)"), Ok(Expr::quotient(x(), Expr::natural(2))));
        assert_eq!(parse("^(x,3)"), Ok(Expr::power_natural(x(), 3)));
        assert_eq!(
            parse("^(x,0.5)"),
            Ok(Expr::power_unchecked(x(), Expr::real(0.5)))
        );
        assert_eq!(parse("s(x)"), Ok(Expr::sin(x())));
        assert_eq!(parse("c(x)"), Ok(Expr::cos(x())));
        assert_eq!(parse("e(x)"), Ok(Expr::exp(x())));
        assert_eq!(parse("l(x)"), Ok(Expr::ln(x())));
        assert_eq!(parse("!(x)"), Ok(Expr::factorial(x())));
    }

    #[test]
    fn test_nested_with_whitespace() {
        let expected = Expr::quotient(
            Expr::sin(Expr::product(Expr::Pi, x())),
            Expr::sum(x(), Expr::natural(5)),
        );
        assert_eq!(parse("/( s(*(p, x)), +(x, 5) )"), Ok(expected.clone()));
        assert_eq!(parse("/(s(*(p,x)),+(x,5))"), Ok(expected));
        assert_eq!(
            parse("+(*(x,2),3)"),
            Ok(Expr::sum(Expr::product(x(), Expr::natural(2)), Expr::natural(3)))
        );
    }

    #[test]
    fn test_read_remainder() {
        let (expr, rest) = read("s(x))tail").unwrap();
        assert_eq!(expr, Expr::sin(x()));
        assert_eq!(rest, "))tail");

        let (expr, rest) = read("12,x)").unwrap();
        assert_eq!(expr, Expr::natural(12));
        assert_eq!(rest, ",x)");
    }

    #[test]
    fn test_read_until() {
        assert_eq!(read_until("ab,cd)", &[',', ')']), Some(("ab", ",cd)")));
        assert_eq!(read_until("abc", &[',']), None);
        assert_eq!(read_until(")", &[')']), Some(("", ")")));
    }

    #[test]
    fn test_trailing_text_ignored() {
        assert_eq!(parse("+(1,2)junk"), Ok(Expr::sum(Expr::natural(1), Expr::natural(2))));
        assert_eq!(parse("xyz"), Ok(x()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("  \t\n "), Err(ParseError::Empty));
        assert_eq!(read(""), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse("?"),
            Err(ParseError::UnexpectedChar {
                found: '?',
                position: 0
            })
        );
        assert_eq!(
            parse("+(1,q)"),
            Err(ParseError::UnexpectedChar {
                found: 'q',
                position: 4
            })
        );
        assert_eq!(
            parse("+(1"),
            Err(ParseError::MissingDelimiter {
                expected: ',',
                position: 3
            })
        );
        assert_eq!(
            parse("s x"),
            Err(ParseError::MissingDelimiter {
                expected: '(',
                position: 1
            })
        );
        assert_eq!(parse("+("), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            parse("1.2.3"),
            Err(ParseError::InvalidNumber {
                text: "1.2.3".to_string()
            })
        );
        assert!(matches!(parse("n)"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("99999999999999999999999"), Err(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn test_from_str() {
        let expr: Expr = "c(^(x,2))".parse().unwrap();
        assert_eq!(expr, Expr::cos(Expr::power_natural(x(), 2)));
        assert!("".parse::<Expr>().is_err());
    }
}
