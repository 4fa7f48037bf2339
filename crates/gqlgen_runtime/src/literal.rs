//! Constructors for SDL default values.

use async_graphql::{Name, Number, Value};

#[must_use]
pub const fn null() -> Value {
    Value::Null
}

#[must_use]
pub const fn boolean(value: bool) -> Value {
    Value::Boolean(value)
}

#[must_use]
pub fn int(value: i64) -> Value {
    Value::Number(Number::from(value))
}

/// Non-finite numbers have no GraphQL representation and become `null`.
#[must_use]
pub fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[must_use]
pub fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

#[must_use]
pub fn enum_value(value: &str) -> Value {
    Value::Enum(Name::new(value))
}

#[must_use]
pub fn list(items: Vec<Value>) -> Value {
    Value::List(items)
}

/// Builds an input object, keeping field order.
#[must_use]
pub fn object(fields: Vec<(&str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (Name::new(name), value))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_keeps_field_order() {
        let value = object(vec![("b", int(1)), ("a", list(vec![float(1.5), null()]))]);
        let Value::Object(fields) = value else {
            panic!("object expected");
        };
        let keys: Vec<&str> = fields.keys().map(Name::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(fields["a"], Value::List(vec![float(1.5), Value::Null]));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(float(f64::INFINITY), Value::Null);
        assert_eq!(enum_value("RED"), Value::Enum(Name::new("RED")));
        assert_eq!(string("x\"y"), Value::String("x\"y".into()));
        assert_eq!(boolean(true), Value::Boolean(true));
    }
}
