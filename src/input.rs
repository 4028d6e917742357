//! Clamping of user-supplied step counts. Out-of-range input is pulled to the
//! nearest valid bound instead of being rejected.

pub const DEFAULT_GOAL: u32 = 10_000;

/// Parses the leading integer of `raw`, `0` when there is none.
pub fn parse_step_count(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative { -value } else { value }
}

pub fn clamp_goal(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

pub fn clamp_achieved(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
