use std::time::Duration;

/// Unit ladder for human-readable durations, largest first, in nanoseconds.
/// A month is the conventional 30 days.
const UNITS: [(&str, u128); 9] = [
    ("y", 365 * 24 * 60 * 60 * 1_000_000_000),
    ("mo", 30 * 24 * 60 * 60 * 1_000_000_000),
    ("d", 24 * 60 * 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

/// Render a duration using its two largest non-zero units, no separator
/// (e.g. "1m30s", "1h1m"). Anything below a representable unit is "0s".
pub fn format_duration(duration: Duration) -> String {
    let mut ns = duration.as_nanos();
    let mut parts: Vec<String> = Vec::with_capacity(2);

    for (name, factor) in UNITS {
        let value = ns / factor;
        ns %= factor;
        if value > 0 {
            parts.push(format!("{value}{name}"));
        }
        if parts.len() == 2 {
            break;
        }
    }

    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_renders_as_zero_seconds() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn ninety_seconds_is_one_minute_thirty() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
    }

    #[test]
    fn third_unit_is_truncated() {
        // 1h 1m 1s keeps only the two largest parts
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h1m");
    }

    #[test]
    fn zero_valued_units_are_skipped_between_parts() {
        // 1h 0m 30s -> the zero minutes do not count as a part
        assert_eq!(format_duration(Duration::from_secs(3630)), "1h30s");
    }

    #[test]
    fn sub_second_durations_use_small_units() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1s500ms");
        assert_eq!(format_duration(Duration::from_nanos(1)), "1ns");
        assert_eq!(format_duration(Duration::from_micros(2)), "2us");
    }

    #[test]
    fn day_scale_durations() {
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d1h");
    }
}
