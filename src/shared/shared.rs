//! Shared code for frontend and bytecode

pub mod numeric;
pub mod error;

/// Returns true if the given string is a decimal literal (optional sign, digits, optional fraction).
pub fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    let digits = text.strip_prefix(|c| c == '-' || c == '+').unwrap_or(text);
    let mut parts = digits.splitn(2, '.');
    let integral = parts.next().unwrap_or("");
    let fraction = parts.next();
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    match fraction {
        Some(fraction) => (integral.len() > 0 || fraction.len() > 0) && all_digits(integral) && all_digits(fraction),
        None => integral.len() > 0 && all_digits(integral),
    }
}
