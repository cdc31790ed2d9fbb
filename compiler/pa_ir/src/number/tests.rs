use super::*;

#[test]
fn test_integral_values() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-42.0), "-42");
    assert_eq!(format_number(-0.0), "0");
}

#[test]
fn test_fractions() {
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
}

#[test]
fn test_exponent_forms() {
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1e-7), "1e-7");
    assert_eq!(format_number(1.5e-7), "1.5e-7");
}

#[test]
fn test_non_finite() {
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
}
