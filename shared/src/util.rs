/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Round a monetary/derived value to 2 decimal places.
///
/// All derived report fields (`total_amount`, `total_recv`, `difference`)
/// and the back-filled rate go through this so the reconciliation
/// invariants hold exactly on the wire.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_to_two_decimals() {
        assert_eq!(round2(5.678), 5.68);
        assert_eq!(round2(5.674), 5.67);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }

    #[test]
    fn round2_is_stable_on_already_rounded() {
        assert_eq!(round2(550.0), 550.0);
        assert_eq!(round2(5.5), 5.5);
    }
}
