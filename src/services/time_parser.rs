use regex::Regex;

/// When only a single clock time appears in the text, the activity is
/// assumed to run for one hour.
const DEFAULT_DURATION_MINUTES: u32 = 60;

/// A `[start, end)` pair in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: u32,
    pub end: u32,
}

/// Pulls a normalized interval out of a free-text time description.
///
/// Scans for `HH:MM`-shaped tokens anywhere in the string; surrounding
/// text ("approx.", "pm-ish", CJK particles) is ignored. Zero tokens
/// means the text is unparseable. One token starts the default-length
/// interval. Two or more tokens take the first two as start and end.
///
/// An end that precedes its start (an overnight range) is kept as-is;
/// the comparison downstream runs on the raw minute values.
pub fn parse(text: &str) -> Option<TimeInterval> {
    let normalized = text.replace('：', ":");

    let token_re = Regex::new(r"(\d{1,2}):([0-5][0-9])").unwrap();
    let mut tokens = token_re.captures_iter(&normalized).filter_map(|caps| {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps[2].parse().ok()?;
        Some(hours * 60 + minutes)
    });

    let start = tokens.next()?;
    let end = tokens
        .next()
        .unwrap_or(start + DEFAULT_DURATION_MINUTES);

    Some(TimeInterval { start, end })
}
