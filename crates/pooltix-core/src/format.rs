use pooltix_domain::to_latin_digits;

use crate::CoreError;

/// Groups digits in threes: `630000` becomes `630,000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parses an operator-entered amount. Thousands separators and whitespace are
/// ignored and Persian digits are accepted.
pub fn parse_amount(input: &str) -> Result<u64, CoreError> {
    let cleaned: String = to_latin_digits(input)
        .chars()
        .filter(|ch| !matches!(ch, ',' | '٬' | '_') && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(CoreError::Validation("enter an amount".into()));
    }
    if !cleaned.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "amount `{}` must contain digits only",
            input.trim()
        )));
    }
    cleaned
        .parse()
        .map_err(|_| CoreError::Validation(format!("amount `{}` is too large", input.trim())))
}
