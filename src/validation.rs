//! CPF (Cadastro de Pessoas Físicas) validation
//!
//! A CPF is 11 digits where the last two are check digits computed from
//! the preceding ones. Punctuation such as `123.456.789-09` is accepted and
//! ignored; anything that does not reduce to 11 digits is rejected.

/// Number of digits in a normalized CPF.
pub const CPF_LENGTH: usize = 11;

/// Keep only ASCII decimal digits, preserving order.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF by its two check digits.
///
/// Never panics: empty, non-numeric or short input simply yields `false`.
/// Sequences of a single repeated digit (`111.111.111-11`) satisfy the
/// checksum but are not issued, so they are rejected as well.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_LENGTH {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..9]);
    let second = check_digit(&digits[..10]);

    digits[9] == first && digits[10] == second
}

/// Weighted modulo-11 check digit over `digits`.
///
/// Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    (sum * 10) % 11 % 10
}
