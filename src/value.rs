use std::cmp::Ordering;
use std::fmt;

use crate::element::format_double;
use crate::error::RuntimeError;

/// A dynamic value as seen by the interpreter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Absent,
    Integer(i32),
    Double(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
        }
    }

    /// Resolves to `Integer` or `Double` using the arithmetic coercion rules.
    pub fn to_numeric(&self) -> Result<Value, RuntimeError> {
        Number::resolve(self).map(Number::into_value)
    }

    pub fn to_f64(&self) -> Result<f64, RuntimeError> {
        Number::resolve(self).map(Number::as_f64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Double(value) => f.write_str(&format_double(*value)),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i32),
    Double(f64),
}

impl Number {
    fn resolve(value: &Value) -> Result<Number, RuntimeError> {
        match value {
            Value::Absent => Ok(Number::Integer(0)),
            Value::Integer(v) => Ok(Number::Integer(*v)),
            Value::Double(v) => Ok(Number::Double(*v)),
            Value::Text(text) => {
                if let Ok(v) = text.parse::<i32>() {
                    return Ok(Number::Integer(v));
                }
                match text.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Number::Double(v)),
                    _ => Err(RuntimeError::NotANumber(text.clone())),
                }
            }
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Integer(v) => Value::Integer(v),
            Number::Double(v) => Value::Double(v),
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Integer(v) => v == 0,
            Number::Double(v) => v == 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }

    fn integers(self, a: i32, b: i32) -> Option<i32> {
        match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Subtract => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Divide => a.checked_div(b),
        }
    }

    fn doubles(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
        }
    }
}

/// Mutable holder of a [`Value`] with coercing arithmetic.
///
/// Every operation resolves both sides first: `Absent` is `Integer(0)`, text
/// is parsed as an integer and then as a double. The result is a `Double` when
/// either side is one, an `Integer` otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueWrapper {
    value: Value,
}

impl ValueWrapper {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn add(&mut self, operand: impl Into<Value>) -> Result<(), RuntimeError> {
        self.apply(BinaryOp::Add, operand.into())
    }

    pub fn subtract(&mut self, operand: impl Into<Value>) -> Result<(), RuntimeError> {
        self.apply(BinaryOp::Subtract, operand.into())
    }

    pub fn multiply(&mut self, operand: impl Into<Value>) -> Result<(), RuntimeError> {
        self.apply(BinaryOp::Multiply, operand.into())
    }

    pub fn divide(&mut self, operand: impl Into<Value>) -> Result<(), RuntimeError> {
        self.apply(BinaryOp::Divide, operand.into())
    }

    /// Raises the held value to `exponent`, which must resolve to a
    /// non-negative integer.
    pub fn power(&mut self, exponent: impl Into<Value>) -> Result<(), RuntimeError> {
        let exponent = exponent.into();
        let exp = match Number::resolve(&exponent)? {
            Number::Integer(e) if e >= 0 => e,
            _ => return Err(RuntimeError::InvalidExponent(exponent.to_string())),
        };

        self.value = match Number::resolve(&self.value)? {
            Number::Integer(base) => base
                .checked_pow(exp.unsigned_abs())
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow('^'))?,
            Number::Double(base) => Value::Double(base.powi(exp)),
        };
        Ok(())
    }

    /// Numeric ordering of the held value against `operand`.
    pub fn compare(&self, operand: impl Into<Value>) -> Result<Ordering, RuntimeError> {
        let lhs = Number::resolve(&self.value)?;
        let rhs = Number::resolve(&operand.into())?;
        match (lhs, rhs) {
            (Number::Integer(a), Number::Integer(b)) => Ok(a.cmp(&b)),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .ok_or_else(|| RuntimeError::NotANumber(f64::NAN.to_string())),
        }
    }

    fn apply(&mut self, op: BinaryOp, operand: Value) -> Result<(), RuntimeError> {
        let lhs = Number::resolve(&self.value)?;
        let rhs = Number::resolve(&operand)?;
        if matches!(op, BinaryOp::Divide) && rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }

        self.value = match (lhs, rhs) {
            (Number::Integer(a), Number::Integer(b)) => op
                .integers(a, b)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow(op.symbol()))?,
            (a, b) => Value::Double(op.doubles(a.as_f64(), b.as_f64())),
        };
        Ok(())
    }
}

impl fmt::Display for ValueWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_plus_double_is_double() {
        let mut v = ValueWrapper::new(10);
        v.add(13.0).unwrap();
        assert_eq!(v.value(), &Value::Double(23.0));
    }

    #[test]
    fn decimal_text_is_coerced_to_double() {
        let mut v = ValueWrapper::new("3.14");
        v.add(12).unwrap();
        match v.value() {
            Value::Double(d) => assert!((d - 15.14).abs() < 1e-9),
            other => panic!("expected double, got {other:?}"),
        }
    }

    #[test]
    fn integer_text_stays_integer() {
        let mut v = ValueWrapper::new("7");
        v.multiply("6").unwrap();
        assert_eq!(v.value(), &Value::Integer(42));
    }

    #[test]
    fn absent_acts_as_zero() {
        let mut v = ValueWrapper::default();
        v.subtract(5).unwrap();
        assert_eq!(v.value(), &Value::Integer(-5));
        assert_eq!(
            ValueWrapper::default().compare(Value::Absent).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            ValueWrapper::new(Option::<i32>::None).value(),
            &Value::Absent
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            ValueWrapper::new(10).divide(0),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            ValueWrapper::new(1.5).divide(0.0),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            ValueWrapper::new(1).divide(Value::Absent),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn integer_division_truncates() {
        let mut v = ValueWrapper::new(7);
        v.divide(2).unwrap();
        assert_eq!(v.value(), &Value::Integer(3));
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        assert_eq!(
            ValueWrapper::new("abc").add(1),
            Err(RuntimeError::NotANumber("abc".into()))
        );
        assert_eq!(
            ValueWrapper::new(1).compare("NaN"),
            Err(RuntimeError::NotANumber("NaN".into()))
        );
    }

    #[test]
    fn compare_promotes_mixed_operands() {
        assert_eq!(ValueWrapper::new(2).compare(2.5).unwrap(), Ordering::Less);
        assert_eq!(ValueWrapper::new(3.0).compare(3).unwrap(), Ordering::Equal);
        assert_eq!(ValueWrapper::new("10").compare(9).unwrap(), Ordering::Greater);
    }

    #[test]
    fn power_requires_non_negative_integer_exponent() {
        let mut v = ValueWrapper::new(2);
        v.power(10).unwrap();
        assert_eq!(v.value(), &Value::Integer(1024));

        let mut d = ValueWrapper::new(1.5);
        d.power(2).unwrap();
        assert_eq!(d.value(), &Value::Double(2.25));

        assert!(matches!(
            ValueWrapper::new(2).power(-1),
            Err(RuntimeError::InvalidExponent(_))
        ));
        assert!(matches!(
            ValueWrapper::new(2).power(0.5),
            Err(RuntimeError::InvalidExponent(_))
        ));
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert_eq!(
            ValueWrapper::new(i32::MAX).add(1),
            Err(RuntimeError::Overflow('+'))
        );
    }
}
