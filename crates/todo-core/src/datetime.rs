//! Display and input conversions for task timestamps.
//!
//! The backend speaks RFC 3339. Users read and type dates in a single fixed
//! offset (JST unless configured otherwise), never in the offset the server
//! happened to serialise.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, TimeZone, Timelike, Utc};

use crate::TodoError;

/// Format of the editable date field, minute precision.
pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Shown in place of a missing due date.
pub const NO_DUE_DATE: &str = "なし";

const DEFAULT_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(FixedOffset);

impl DisplayZone {
    pub fn from_hours(hours: i32) -> Result<Self, TodoError> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self)
            .ok_or_else(|| TodoError::InvalidInput(format!("utc offset out of range: {hours}")))
    }

    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Long display form, e.g. `2023年7月1日 09:00`.
    pub fn format_date(&self, date: &DateTime<FixedOffset>) -> String {
        let local = date.with_timezone(&self.0);
        format!(
            "{}年{}月{}日 {:02}:{:02}",
            local.year(),
            local.month(),
            local.day(),
            local.hour(),
            local.minute()
        )
    }

    pub fn format_due(&self, due: Option<&DateTime<FixedOffset>>) -> String {
        due.map(|d| self.format_date(d))
            .unwrap_or_else(|| NO_DUE_DATE.to_string())
    }

    /// Editable form, e.g. `2023-07-01T09:00`.
    pub fn format_date_to_local(&self, date: &DateTime<FixedOffset>) -> String {
        date.with_timezone(&self.0)
            .format(LOCAL_INPUT_FORMAT)
            .to_string()
    }

    /// Inverse of [`format_date_to_local`](Self::format_date_to_local): the
    /// wall-clock input is read in this zone and keeps its offset.
    pub fn parse_local_input(&self, input: &str) -> Result<DateTime<FixedOffset>, TodoError> {
        let naive = NaiveDateTime::parse_from_str(input.trim(), LOCAL_INPUT_FORMAT)
            .map_err(|e| TodoError::InvalidDate(format!("{input:?}: {e}")))?;
        self.0
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| TodoError::InvalidDate(format!("{input:?}: ambiguous local time")))
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::from_hours(DEFAULT_OFFSET_HOURS).unwrap_or_else(|_| Self::utc())
    }
}
