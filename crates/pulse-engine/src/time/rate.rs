use std::time::Duration;

/// Upper bound on accepted rates. Anything faster would round to a sub-microsecond step.
pub const MAX_RATE_HZ: f64 = 100_000.0;

/// Converts a rate in events per second into the duration of one event.
///
/// Returns `None` for non-finite, non-positive, or absurdly large rates.
pub fn tick_duration(rate_hz: f64) -> Option<Duration> {
    if !rate_hz.is_finite() || rate_hz <= 0.0 || rate_hz > MAX_RATE_HZ {
        return None;
    }
    Some(Duration::from_secs_f64(1.0 / rate_hz))
}
