//! Host functions callable from echo tags as `@name`.
//!
//! Each function pops its operands off the evaluation stack (the last
//! argument is on top) and pushes its results back.

use tracing::trace;

use crate::context::RenderContext;
use crate::error::RuntimeError;
use crate::value::Value;

pub(crate) fn call(
    name: &str,
    stack: &mut Vec<Value>,
    context: &mut RenderContext,
) -> Result<(), RuntimeError> {
    trace!(function = name, depth = stack.len(), "calling function");
    match name {
        "sin" => {
            let [x] = pop_operands("sin", stack)?;
            stack.push(Value::Double(x.to_f64()?.to_radians().sin()));
        }
        "decfmt" => {
            let [x, pattern] = pop_operands("decfmt", stack)?;
            let pattern = match pattern {
                Value::Text(pattern) => pattern,
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        function: "decfmt",
                        expected: "text",
                        found: other.type_name(),
                    })
                }
            };
            stack.push(Value::Text(decimal_format(x.to_f64()?, &pattern)?));
        }
        "dup" => {
            let [x] = pop_operands("dup", stack)?;
            stack.push(x.clone());
            stack.push(x);
        }
        "swap" => {
            let [a, b] = pop_operands("swap", stack)?;
            stack.push(b);
            stack.push(a);
        }
        "setMimeType" => {
            let [mime] = pop_operands("setMimeType", stack)?;
            context.set_mime_type(mime.to_string());
        }
        "paramGet" => {
            let [name, default] = pop_operands("paramGet", stack)?;
            let found = context.parameter(&name.to_string()).map(Value::from);
            stack.push(found.unwrap_or(default));
        }
        "pparamGet" => {
            let [name, default] = pop_operands("pparamGet", stack)?;
            let found = context.persistent_parameter(&name.to_string()).map(Value::from);
            stack.push(found.unwrap_or(default));
        }
        "tparamGet" => {
            let [name, default] = pop_operands("tparamGet", stack)?;
            let found = context.temporary_parameter(&name.to_string()).map(Value::from);
            stack.push(found.unwrap_or(default));
        }
        "pparamSet" => {
            let [value, name] = pop_operands("pparamSet", stack)?;
            context.set_persistent_parameter(name.to_string(), value.to_string());
        }
        "tparamSet" => {
            let [value, name] = pop_operands("tparamSet", stack)?;
            context.set_temporary_parameter(name.to_string(), value.to_string());
        }
        "pparamDel" => {
            let [name] = pop_operands("pparamDel", stack)?;
            context.remove_persistent_parameter(&name.to_string());
        }
        "tparamDel" => {
            let [name] = pop_operands("tparamDel", stack)?;
            context.remove_temporary_parameter(&name.to_string());
        }
        _ => return Err(RuntimeError::UnknownFunction(name.to_string())),
    }
    Ok(())
}

/// Pops the top `N` values, returned bottom-first.
fn pop_operands<const N: usize>(
    function: &'static str,
    stack: &mut Vec<Value>,
) -> Result<[Value; N], RuntimeError> {
    let underflow = |available| RuntimeError::FunctionUnderflow {
        function,
        needed: N,
        available,
    };
    let split = stack.len().checked_sub(N).ok_or(underflow(stack.len()))?;
    stack
        .split_off(split)
        .try_into()
        .map_err(|rest: Vec<Value>| underflow(rest.len()))
}

/// Formats `x` with a decimal pattern such as `0.000` or `#.00`.
///
/// Zeros are mandatory digits and `#` optional ones; the number of positions
/// after the point bounds the fraction.
pub fn decimal_format(x: f64, pattern: &str) -> Result<String, RuntimeError> {
    let invalid = || RuntimeError::InvalidFormat(pattern.to_string());
    if pattern.is_empty() || pattern.chars().any(|c| !matches!(c, '0' | '#' | '.')) {
        return Err(invalid());
    }
    let (int_pattern, frac_pattern) = pattern.split_once('.').unwrap_or((pattern, ""));
    if frac_pattern.contains('.') {
        return Err(invalid());
    }

    let min_int = int_pattern.chars().filter(|&c| c == '0').count();
    let min_frac = frac_pattern.chars().filter(|&c| c == '0').count();
    let max_frac = frac_pattern.len();

    let rounded = format!("{:.*}", max_frac, x.abs());
    let (int_digits, frac_digits) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut frac = frac_digits.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let mut int = int_digits.trim_start_matches('0').to_string();
    while int.len() < min_int {
        int.insert(0, '0');
    }

    let mut out = String::new();
    let nonzero = int.chars().chain(frac.chars()).any(|c| c != '0');
    if x.is_sign_negative() && nonzero {
        out.push('-');
    }
    out.push_str(&int);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    if int.is_empty() && frac.is_empty() {
        out.push('0');
    }
    Ok(out)
}
