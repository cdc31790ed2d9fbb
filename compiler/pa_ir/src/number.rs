//! Number-to-text conversion matching the host language's `String(n)`.

/// Format `n` the way the host language prints numbers.
///
/// Integral values print without a fraction, magnitudes at or above `1e21`
/// or below `1e-6` use exponent form with an explicit sign (`1e+21`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{n:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    format!("{n}")
}

#[cfg(test)]
mod tests;
