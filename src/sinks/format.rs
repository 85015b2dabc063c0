use std::time::Duration;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Renders a value scaled by 100 with two decimals, e.g. `7500` as `75.00`.
#[must_use]
pub fn format_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value.checked_div(100).unwrap_or(0),
        value.checked_rem(100).unwrap_or(0)
    )
}

/// Human readable byte count with binary multiples, e.g. `1.50MB`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let mut scale: u64 = 1;
    let mut unit = 0usize;
    while unit.saturating_add(1) < BYTE_UNITS.len() && bytes >= scale.saturating_mul(1024) {
        scale = scale.saturating_mul(1024);
        unit = unit.saturating_add(1);
    }
    let suffix = BYTE_UNITS.get(unit).copied().unwrap_or("B");
    if unit == 0 {
        return format!("{}{}", bytes, suffix);
    }
    let x100 = u128::from(bytes)
        .saturating_mul(100)
        .checked_div(u128::from(scale))
        .unwrap_or(0);
    format!(
        "{}{}",
        format_x100(u64::try_from(x100).unwrap_or(u64::MAX)),
        suffix
    )
}

/// `10s` for whole seconds, `1500ms` otherwise.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
