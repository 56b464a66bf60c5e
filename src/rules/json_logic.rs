//! Lowering of JSON-logic rules into the rule expression tree
//!
//! Dependency files written for earlier releases express rules as JSON-logic
//! objects such as
//!
//! ```json
//! {"and": [{">=": [{"var": "productVersion"}, "8.0"]},
//!          {"<":  [{"var": "productVersion"}, "8.1"]}]}
//! ```
//!
//! Only the operators that can be expressed over a single version variable
//! are accepted; anything else is rejected when the catalog is loaded.

use serde_json::{Map, Value};

use crate::rules::RuleError;
use crate::rules::expr::{CmpOp, Expr, Operand, PRODUCT_VERSION};
use crate::rules::parser::{literal, parse_expr};

/// Lower a JSON value into an expression.
///
/// Strings are parsed with the textual grammar, so a dependency file may mix
/// both notations.
pub fn lower(value: &Value) -> Result<Expr, RuleError> {
    match value {
        Value::Bool(b) => Ok(Expr::Const(*b)),
        Value::String(text) => parse_expr(text),
        Value::Object(object) => lower_object(object),
        other => Err(RuleError::InvalidJsonLogic(other.to_string())),
    }
}

fn lower_object(object: &Map<String, Value>) -> Result<Expr, RuleError> {
    let mut entries = object.iter();
    let (Some((op, args)), None) = (entries.next(), entries.next()) else {
        return Err(RuleError::InvalidJsonLogic(
            "expected an object with exactly one operator".to_string(),
        ));
    };

    match op.as_str() {
        "and" => Ok(Expr::And(lower_all(args)?)),
        "or" => Ok(Expr::Or(lower_all(args)?)),
        "!" => {
            let inner = match args {
                Value::Array(items) if items.len() == 1 => &items[0],
                Value::Array(_) => {
                    return Err(RuleError::InvalidJsonLogic(
                        "'!' takes one argument".to_string(),
                    ));
                }
                single => single,
            };
            Ok(Expr::Not(Box::new(lower(inner)?)))
        }
        "==" | "===" => compare(CmpOp::Eq, args),
        "!=" | "!==" => compare(CmpOp::Ne, args),
        "<" => compare(CmpOp::Lt, args),
        "<=" => compare(CmpOp::Le, args),
        ">" => compare(CmpOp::Gt, args),
        ">=" => compare(CmpOp::Ge, args),
        other => Err(RuleError::UnsupportedOperator(other.to_string())),
    }
}

fn lower_all(args: &Value) -> Result<Vec<Expr>, RuleError> {
    match args {
        Value::Array(items) if !items.is_empty() => items.iter().map(lower).collect(),
        _ => Err(RuleError::InvalidJsonLogic(format!(
            "expected a non-empty argument list, got {args}"
        ))),
    }
}

/// `[a, b]` compares two operands; `[a, b, c]` is the JSON-logic "between"
/// form accepted by `<` and `<=`, meaning `a op b && b op c`.
fn compare(op: CmpOp, args: &Value) -> Result<Expr, RuleError> {
    let Value::Array(items) = args else {
        return Err(RuleError::InvalidJsonLogic(format!(
            "expected an argument list, got {args}"
        )));
    };

    match items.as_slice() {
        [lhs, rhs] => Ok(Expr::Compare {
            lhs: operand(lhs)?,
            op,
            rhs: operand(rhs)?,
        }),
        [low, mid, high] if matches!(op, CmpOp::Lt | CmpOp::Le) => {
            let mid = operand(mid)?;
            Ok(Expr::And(vec![
                Expr::Compare {
                    lhs: operand(low)?,
                    op,
                    rhs: mid.clone(),
                },
                Expr::Compare {
                    lhs: mid,
                    op,
                    rhs: operand(high)?,
                },
            ]))
        }
        _ => Err(RuleError::InvalidJsonLogic(format!(
            "wrong number of arguments: {args}"
        ))),
    }
}

fn operand(value: &Value) -> Result<Operand, RuleError> {
    match value {
        Value::Object(object) => match object.get("var") {
            Some(Value::String(name)) if name == PRODUCT_VERSION && object.len() == 1 => {
                Ok(Operand::ProductVersion)
            }
            Some(var) => Err(RuleError::UnknownVariable(var.to_string())),
            None => Err(RuleError::InvalidJsonLogic(format!(
                "expected a variable or a literal, got {value}"
            ))),
        },
        Value::String(text) => literal(text),
        Value::Number(number) => literal(&number.to_string()),
        other => Err(RuleError::InvalidJsonLogic(format!(
            "expected a variable or a literal, got {other}"
        ))),
    }
}
