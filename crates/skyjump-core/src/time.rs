/// Seconds since the Unix epoch as a float, used as the clock origin for
/// time-driven platform movement.
pub fn unix_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
