use serde_json::Value;
use std::borrow::Cow;

/// Text of a pivot cell. Missing cells and `null` read as empty.
pub fn cell_text(cell: Option<&Value>) -> Cow<'_, str> {
    match cell {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Stock count of a cell: only a plain run of ASCII digits counts,
/// everything else (signs, decimals, blanks, overflow) is zero.
pub fn coerce_stock(cell: Option<&Value>) -> i64 {
    let text = cell_text(cell);
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().unwrap_or(0)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(coerce_stock(Some(&json!("7"))), 7);
        assert_eq!(coerce_stock(Some(&json!("0042"))), 42);
        assert_eq!(coerce_stock(Some(&json!(15))), 15);
    }

    #[test]
    fn everything_else_is_zero() {
        for cell in [
            json!("abc"),
            json!(""),
            json!(" 7"),
            json!("-3"),
            json!("1.5"),
            json!(1.5),
            json!(-2),
            json!(null),
            json!(true),
            json!("99999999999999999999999"),
        ] {
            assert_eq!(coerce_stock(Some(&cell)), 0, "cell {cell}");
        }
        assert_eq!(coerce_stock(None), 0);
    }

    #[test]
    fn cell_text_of_scalars() {
        assert_eq!(cell_text(Some(&json!("S1"))), "S1");
        assert_eq!(cell_text(Some(&json!(1024))), "1024");
        assert_eq!(cell_text(Some(&json!(null))), "");
        assert_eq!(cell_text(None), "");
    }
}
