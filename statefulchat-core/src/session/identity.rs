//! Record identity derived from the creation timestamp

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H-%M-%S";
const RECORD_PREFIX: &str = "conversation_";
const RECORD_SUFFIX: &str = ".json";
const LOG_PREFIX: &str = "log_";
const LOG_SUFFIX: &str = ".txt";

/// Creation timestamp (second granularity) identifying a record and its audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(NaiveDateTime);

impl RecordId {
    /// Identity for a record created now, in local time
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// The identity one second later, used to step past a taken slot
    pub fn next(&self) -> Self {
        Self(self.0 + Duration::seconds(1))
    }

    /// Day component, `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// Time-of-day component, `HH-MM-SS`
    pub fn time(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }

    /// File name of the record
    pub fn record_file_name(&self) -> String {
        format!("{}{}{}", RECORD_PREFIX, self, RECORD_SUFFIX)
    }

    /// File name of the companion audit log
    pub fn log_file_name(&self) -> String {
        format!("{}{}{}", LOG_PREFIX, self, LOG_SUFFIX)
    }

    /// Parse `conversation_<date>_<time>.json`; anything else is not a record.
    ///
    /// Only the canonical zero-padded spelling is accepted, so the name can be
    /// rebuilt from the identity.
    pub fn from_record_file_name(name: &str) -> Option<Self> {
        let id: Self = name
            .strip_prefix(RECORD_PREFIX)?
            .strip_suffix(RECORD_SUFFIX)?
            .parse()
            .ok()?;
        (id.record_file_name() == name).then_some(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date(), self.time())
    }
}

impl std::str::FromStr for RecordId {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, &format!("{}_{}", DATE_FORMAT, TIME_FORMAT)).map(Self)
    }
}
