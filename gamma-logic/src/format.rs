//! Rendering of values for display.

use gamma_compute::Value;
use gamma_parser::parser::fmt::Latex;

/// Renders a value as LaTeX.
pub fn latex(value: &Value) -> String {
    value.as_display().to_string()
}

/// Renders a value the way its type is best read: prime factorizations as a product of prime
/// powers, everything else as LaTeX.
pub fn format_by_type(value: &Value) -> String {
    match value {
        Value::Dict(entries) if is_factorization(entries) => prime_power_product(entries),
        _ => latex(value),
    }
}

/// Returns true if every key and value of the dictionary is an integer.
fn is_factorization(entries: &[(Value, Value)]) -> bool {
    entries.iter().all(|(prime, exponent)| prime.is_integer() && exponent.is_integer())
}

fn prime_power_product(entries: &[(Value, Value)]) -> String {
    if entries.is_empty() {
        return "1".to_string();
    }
    entries
        .iter()
        .map(|(prime, exponent)| {
            let exponent = exponent.to_string();
            if exponent == "1" {
                prime.to_string()
            } else {
                format!("{}^{{{}}}", prime, exponent)
            }
        })
        .collect::<Vec<_>>()
        .join(" \\cdot ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamma_compute::symbolic::Expr;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Value {
        Expr::integer(n).into()
    }

    #[test]
    fn factorization() {
        let dict = Value::Dict(vec![(int(2), int(2)), (int(3), int(1))]);
        assert_eq!(format_by_type(&dict), "2^{2} \\cdot 3");
        assert_eq!(format_by_type(&Value::Dict(vec![])), "1");
    }

    #[test]
    fn lists_and_expressions() {
        let list = Value::List(vec![int(-1), int(1)]);
        assert_eq!(format_by_type(&list), "\\left[ -1, 1\\right]");
        let sqrt = Value::Expr(Expr::integer(2).sqrt());
        assert_eq!(format_by_type(&sqrt), "\\sqrt{2}");
    }
}
