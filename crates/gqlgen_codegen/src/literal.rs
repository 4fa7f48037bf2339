//! Rust source for literal values.

use gqlgen_schema::ConstValue;
use std::fmt::Write;

/// Renders `value` as a Rust string literal.
#[must_use]
pub fn rust_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a default value as a `runtime::literal` expression that builds
/// the equivalent engine value.
#[must_use]
pub fn const_value(value: &ConstValue) -> String {
    match value {
        ConstValue::Null => "runtime::literal::null()".to_string(),
        ConstValue::Boolean(b) => format!("runtime::literal::boolean({b})"),
        ConstValue::Int(i) => format!("runtime::literal::int({i})"),
        ConstValue::Float(x) => format!("runtime::literal::float({})", float(*x)),
        ConstValue::String(s) => format!("runtime::literal::string({})", rust_string(s)),
        ConstValue::Enum(e) => format!("runtime::literal::enum_value({})", rust_string(e)),
        ConstValue::List(items) => {
            let items: Vec<String> = items.iter().map(const_value).collect();
            format!("runtime::literal::list(vec![{}])", items.join(", "))
        }
        ConstValue::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("({}, {})", rust_string(name), const_value(value)))
                .collect();
            format!("runtime::literal::object(vec![{}])", fields.join(", "))
        }
    }
}

/// Renders a float so that it reads back as an `f64` literal.
fn float(x: f64) -> String {
    if x.is_finite() {
        format!("{x:?}")
    } else if x.is_nan() {
        "f64::NAN".to_string()
    } else if x > 0.0 {
        "f64::INFINITY".to_string()
    } else {
        "f64::NEG_INFINITY".to_string()
    }
}
