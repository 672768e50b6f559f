use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::{datetime, offset};
use time::{OffsetDateTime, PrimitiveDateTime};


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcDateTime(PrimitiveDateTime);

impl UtcDateTime {
    pub const UNIX_EPOCH: Self = Self(datetime!(1970-01-01 0:00));
    pub fn now() -> Self {
        let now_odt = OffsetDateTime::now_utc();
        Self(PrimitiveDateTime::new(now_odt.date(), now_odt.time()))
    }

    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        let nanos = i128::from(millis) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok().map(Self::from)
    }

    // Accepts RFC 3339 timestamps in any offset, e.g. "2024-03-01T12:30:00+01:00".
    pub fn parse_rfc3339(s: &str) -> Option<Self> {
        OffsetDateTime::parse(s, &Rfc3339).ok().map(Self::from)
    }

    pub fn to_rfc3339(self) -> String {
        // Formatting a UTC time as RFC 3339 cannot fail for years 0-9999.
        OffsetDateTime::from(self).format(&Rfc3339).unwrap_or_default()
    }

    // Time elapsed from `earlier` to `self`, or `None` if `earlier` is in the future.
    pub fn duration_since(self, earlier: UtcDateTime) -> Option<Duration> {
        (self.0 - earlier.0).try_into().ok()
    }
}

impl From<PrimitiveDateTime> for UtcDateTime {
    fn from(pdt: PrimitiveDateTime) -> Self { Self(pdt) }
}
impl From<OffsetDateTime> for UtcDateTime {
    fn from(odt: OffsetDateTime) -> Self {
        let utc = odt.to_offset(offset!(UTC));
        Self::from(PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<UtcDateTime> for OffsetDateTime {
    fn from(udt: UtcDateTime) -> Self { udt.0.assume_utc() }
}
