//! Photo-proof validation: extract the EXIF capture timestamp from an
//! uploaded image and compare it against "now" to produce a trust
//! signal. Decode problems are data, not errors: a result with `error`
//! set means "unverifiable, proceed without penalty", and submission is
//! never blocked.

use std::io::Cursor;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use exif::{In, Tag, Value};

/// Maximum allowed age of a proof photo, in minutes.
pub const DEFAULT_MAX_AGE_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ProofCheck {
    pub is_valid: bool,
    pub photo_timestamp: Option<NaiveDateTime>,
    pub checked_at: NaiveDateTime,
    /// Absolute capture-to-now distance in whole minutes (truncated).
    pub minutes_difference: Option<i64>,
    pub error: Option<String>,
}

impl ProofCheck {
    /// The risk flag attached to a task at completion time: raised only
    /// when a timestamp was extracted and it is out of range. An
    /// unverifiable photo is never flagged.
    pub fn fraud_warning(&self) -> bool {
        self.photo_timestamp.is_some() && !self.is_valid
    }

    fn unverifiable(checked_at: NaiveDateTime, error: impl Into<String>) -> Self {
        ProofCheck {
            is_valid: false,
            photo_timestamp: None,
            checked_at,
            minutes_difference: None,
            error: Some(error.into()),
        }
    }
}

/// Validate `bytes` against the local wall clock.
pub fn validate_photo_timestamp(bytes: &[u8], max_minutes: i64) -> ProofCheck {
    validate_photo_timestamp_at(bytes, max_minutes, Local::now().naive_local())
}

/// Deterministic variant of [`validate_photo_timestamp`] taking an
/// explicit "now". EXIF capture times carry no zone, so the comparison
/// is between naive local datetimes.
pub fn validate_photo_timestamp_at(
    bytes: &[u8],
    max_minutes: i64,
    now: NaiveDateTime,
) -> ProofCheck {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => return ProofCheck::unverifiable(now, format!("no EXIF metadata: {e}")),
    };

    // Capture time, falling back to modify time, then digitized time.
    let field = [Tag::DateTimeOriginal, Tag::DateTime, Tag::DateTimeDigitized]
        .iter()
        .find_map(|tag| exif.get_field(*tag, In::PRIMARY));
    let Some(field) = field else {
        return ProofCheck::unverifiable(now, "no EXIF timestamp found in photo");
    };

    let Some(timestamp) = parse_exif_datetime(&field.value) else {
        return ProofCheck::unverifiable(now, "could not parse EXIF timestamp");
    };

    // The threshold check runs at second precision; the reported
    // difference is truncated to whole minutes.
    let diff_seconds = (now - timestamp).num_seconds().abs();
    ProofCheck {
        is_valid: diff_seconds <= max_minutes * 60,
        photo_timestamp: Some(timestamp),
        checked_at: now,
        minutes_difference: Some(diff_seconds / 60),
        error: None,
    }
}

/// Parse an EXIF ASCII datetime ("YYYY:MM:DD HH:MM:SS").
fn parse_exif_datetime(value: &Value) -> Option<NaiveDateTime> {
    let Value::Ascii(ascii) = value else {
        return None;
    };
    let raw = ascii.first()?;
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    let date = NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?;
    let time = NaiveTime::from_hms_opt(dt.hour.into(), dt.minute.into(), dt.second.into())?;
    Some(NaiveDateTime::new(date, time))
}
