use std::fmt::{Display, Formatter};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::ValidationError;

/// Bar start time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    /// Build from microseconds since the Unix epoch, as read from the store.
    pub fn from_unix_micros(micros: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000)
            .map(Self)
            .map_err(|_| ValidationError::TimestampOutOfRange { micros })
    }

    /// Milliseconds since the Unix epoch, floored; the charting client's time unit.
    pub fn unix_millis(self) -> i64 {
        // Any instant `time` can represent fits in i64 milliseconds.
        self.0.unix_timestamp_nanos().div_euclid(1_000_000) as i64
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_store_micros_to_client_millis() {
        let ts = UtcDateTime::from_unix_micros(1_704_153_600_000_000).expect("in range");
        assert_eq!(ts.unix_millis(), 1_704_153_600_000);
        assert_eq!(ts.to_string(), "2024-01-02T00:00:00Z");
    }

    #[test]
    fn sub_millisecond_precision_is_floored() {
        let ts = UtcDateTime::from_unix_micros(1_704_153_600_000_999).expect("in range");
        assert_eq!(ts.unix_millis(), 1_704_153_600_000);

        let before_epoch = UtcDateTime::from_unix_micros(-1).expect("in range");
        assert_eq!(before_epoch.unix_millis(), -1);
    }

    #[test]
    fn rejects_out_of_range_micros() {
        let err = UtcDateTime::from_unix_micros(i64::MAX).expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampOutOfRange { .. }));
    }
}
