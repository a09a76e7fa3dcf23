// Utility functions for the Dataview widgets

use crate::kit::theme::PALETTE;

/// Numbers from `start` (inclusive) towards `end` (exclusive) by `step`.
///
/// The sign of `step` is flipped when it points away from `end`. A zero
/// step yields an empty range.
///
/// ```
/// use dataview::kit::utils::range;
///
/// assert_eq!(range(0, 4, 1), vec![0, 1, 2, 3]);
/// assert_eq!(range(3, 0, 1), vec![3, 2, 1]);
/// ```
pub fn range(start: i64, end: i64, step: i64) -> Vec<i64> {
    if step == 0 {
        return Vec::new();
    }
    let step = if start > end && step > 0 { -step } else { step };

    let mut values = Vec::new();
    let mut current = start;
    while (step > 0 && current < end) || (step < 0 && current > end) {
        values.push(current);
        current += step;
    }
    values
}

/// Palette colour for `key`: the sum of its character codes, modulo the
/// palette size
pub fn color_by_key(key: &str) -> &'static str {
    let sum = key
        .encode_utf16()
        .fold(0usize, |acc, unit| acc + usize::from(unit));
    PALETTE[sum % PALETTE.len()]
}

/// Leading integer of `input`, like a lenient integer parse.
///
/// Returns NaN when `input` does not start with digits, so callers can hand
/// the result to the store and let it reject the value.
pub fn parse_int(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<f64>() {
        Ok(value) => sign * value,
        Err(_) => f64::NAN,
    }
}
