//! Calculator tool: evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, `%`, `^` (right-associative power),
//! parentheses, decimals, and unary minus via a recursive-descent parser.
//! Whole results come back as JSON integers, everything else as floats.

use async_trait::async_trait;
use serde_json::Value;
use toolloop_core::error::ToolError;
use toolloop_core::tool::Tool;

use crate::text_argument;

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate mathematical expressions. Supports + - * / % ^ and parentheses, e.g. (2 + 3) * 4"
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        let expr = text_argument(self.name(), &input, "expression")?;
        let value = evaluate(&expr).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason,
        })?;
        Ok(to_json_number(value))
    }
}

fn to_json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate an arithmetic expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let result = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(format!("Unexpected token {:?} at position {}", tok, parser.pos));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_ascii_digit() || d == '.') {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let literal = &input[start..end];
                let num = literal
                    .parse()
                    .map_err(|_| format!("Invalid number: {literal}"))?;
                tokens.push(Token::Num(num));
            }
            other => return Err(format!("Unexpected character: '{other}'")),
        }
    }

    if tokens.is_empty() {
        return Err("Empty expression".into());
    }
    Ok(tokens)
}

/// Deepest nesting of parentheses and unary minus accepted.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, String> {
        let mut acc = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.next();
            let rhs = self.term()?;
            acc = if op == '+' { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    // term = unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, String> {
        let mut acc = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            self.next();
            let rhs = self.unary()?;
            acc = match op {
                '*' => acc * rhs,
                _ if rhs == 0.0 => return Err("Division by zero".into()),
                '/' => acc / rhs,
                _ => acc % rhs,
            };
        }
        Ok(acc)
    }

    // unary = '-' unary | power
    //
    // Every recursive path passes through here, so this is where nesting
    // depth is bounded.
    fn unary(&mut self) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("Expression nested too deeply".into());
        }
        self.depth += 1;
        let result = match self.peek() {
            Some(Token::Op('-')) => {
                self.next();
                self.unary().map(|v| -v)
            }
            _ => self.power(),
        };
        self.depth -= 1;
        result
    }

    // power = primary ('^' unary)?
    fn power(&mut self) -> Result<f64, String> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.next();
            let exp = self.unary()?;
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    // primary = NUMBER | '(' expr ')'
    fn primary(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Open) => {
                let val = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {tok:?}")),
            None => Err("Unexpected end of expression".into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 2 * 5").unwrap(), 12.0);
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
    }

    #[test]
    fn division_and_modulo() {
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
        assert_eq!(evaluate("10 % 4").unwrap(), 2.0);
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("1 % 0").is_err());
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ^ 2").unwrap(), -4.0);
    }

    #[test]
    fn unary_negation() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
    }

    #[test]
    fn malformed_expressions() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("2 + x").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 2").is_err());
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression nested too deeply");

        let negations = format!("{}1", "-".repeat(10_000));
        assert_eq!(evaluate(&negations).unwrap_err(), "Expression nested too deeply");
    }

    #[test]
    fn moderate_nesting_still_evaluates() {
        let parens = format!("{}7{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&parens).unwrap(), 7.0);
        assert_eq!(evaluate("----3").unwrap(), 3.0);
        // Sequential groups do not accumulate depth.
        let wide = vec!["(((1)))"; 500].join(" + ");
        assert_eq!(evaluate(&wide).unwrap(), 500.0);
    }

    #[tokio::test]
    async fn call_with_raw_string() {
        let out = CalculatorTool.call(json!("6*7")).await.unwrap();
        assert_eq!(out, json!(42));
    }

    #[tokio::test]
    async fn call_with_expression_object() {
        let out = CalculatorTool
            .call(json!({"expression": "10 / 4"}))
            .await
            .unwrap();
        assert_eq!(out, json!(2.5));
    }

    #[tokio::test]
    async fn call_failure_is_an_error() {
        let err = CalculatorTool.call(json!("1/0")).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { ref tool_name, .. } if tool_name == "calculator"));
    }

    #[tokio::test]
    async fn deeply_nested_call_fails_cleanly() {
        let input = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = CalculatorTool.call(json!(input)).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::ExecutionFailed { ref reason, .. } if reason == "Expression nested too deeply"
        ));
    }

    #[tokio::test]
    async fn call_rejects_non_text_input() {
        let err = CalculatorTool.call(json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { .. }));
    }
}
