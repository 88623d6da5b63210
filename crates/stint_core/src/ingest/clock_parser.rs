//! Game-clock strings.
//!
//! The provider reports the time *remaining* in the period. Three spellings
//! show up across feed revisions:
//! - ISO 8601 duration: `PT11M32.50S`, `PT05.3S`
//! - minutes and seconds: `11:32`, `0:05.3`
//! - bare seconds: `45.2`
//!
//! Seconds are parsed digit by digit into milliseconds so no float rounding
//! leaks into boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClockError;
use crate::models::GameTime;

static ISO_CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)M)?(\d+(?:\.\d*)?)S$").expect("ISO clock pattern is valid")
});

static COLON_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2}(?:\.\d*)?)$").expect("colon clock pattern is valid"));

static SECONDS_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d*)?)$").expect("seconds clock pattern is valid"));

/// Parse a clock string into the time remaining in the period.
pub fn parse_clock(raw: &str) -> Result<GameTime, ClockError> {
    let text = raw.trim();
    let unparsable = || ClockError::Unparsable(raw.to_string());

    let (minutes, seconds) = if let Some(caps) = ISO_CLOCK.captures(text) {
        (caps.get(1).map(|m| m.as_str()), caps.get(2).map(|m| m.as_str()))
    } else if let Some(caps) = COLON_CLOCK.captures(text) {
        (caps.get(1).map(|m| m.as_str()), caps.get(2).map(|m| m.as_str()))
    } else if let Some(caps) = SECONDS_CLOCK.captures(text) {
        (None, caps.get(1).map(|m| m.as_str()))
    } else {
        return Err(unparsable());
    };

    let minutes: u64 = match minutes {
        Some(m) => m.parse().map_err(|_| unparsable())?,
        None => 0,
    };
    let seconds_millis = seconds.and_then(seconds_to_millis).ok_or_else(unparsable)?;

    let millis = minutes
        .checked_mul(60_000)
        .and_then(|m| m.checked_add(seconds_millis))
        .ok_or_else(unparsable)?;
    Ok(GameTime::from_millis(millis))
}

/// `"32.50"` → `32_500`. Digits past the millisecond are dropped.
fn seconds_to_millis(text: &str) -> Option<u64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    let whole: u64 = whole.parse().ok()?;
    let mut millis = 0u64;
    let mut scale = 100u64;
    for digit in fraction.chars().take(3) {
        millis += u64::from(digit.to_digit(10)?) * scale;
        scale /= 10;
    }
    whole.checked_mul(1000)?.checked_add(millis)
}
