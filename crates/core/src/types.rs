/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Integer epoch milliseconds, the persisted form of every timestamp.
pub type EpochMillis = i64;

/// Convert a timestamp to its persisted epoch-millisecond form.
pub fn to_epoch_millis(ts: &Timestamp) -> EpochMillis {
    ts.timestamp_millis()
}

/// Convert persisted epoch milliseconds back to a timestamp.
///
/// Returns `None` for values outside chrono's representable range.
pub fn from_epoch_millis(millis: EpochMillis) -> Option<Timestamp> {
    chrono::DateTime::from_timestamp_millis(millis)
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip() {
        let ts = from_epoch_millis(1_735_689_600_123).unwrap();
        assert_eq!(to_epoch_millis(&ts), 1_735_689_600_123);
    }

    #[test]
    fn out_of_range_millis_is_none() {
        assert!(from_epoch_millis(i64::MAX).is_none());
    }
}
