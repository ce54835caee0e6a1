use serde_json::{Number, Value};

/// Deep structural equality over plain data.
///
/// Arrays compare element-wise, objects by key regardless of key order, and
/// numbers by numeric value, so `1` and `1.0` are equal.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) if x.is_f64() && y.is_f64() => a == b,
        (Some(a), _) if x.is_f64() => float_equals_integer(a, y),
        (_, Some(b)) if y.is_f64() => float_equals_integer(b, x),
        _ => match (x.as_i64(), y.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => x.as_u64().is_some() && x.as_u64() == y.as_u64(),
        },
    }
}

/// Exact comparison: the float must be integral and in range of the
/// integer's type, so no precision is lost in either direction.
fn float_equals_integer(float: f64, integer: &Number) -> bool {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

    if !float.is_finite() || float.fract() != 0.0 {
        return false;
    }
    if let Some(n) = integer.as_i64() {
        return (-TWO_POW_63..TWO_POW_63).contains(&float) && float as i64 == n;
    }
    if let Some(n) = integer.as_u64() {
        return (0.0..TWO_POW_64).contains(&float) && float as u64 == n;
    }
    false
}
