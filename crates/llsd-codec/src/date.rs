use core::fmt;

use chrono::{DateTime, NaiveDateTime};

/// A point in time stored as seconds since the POSIX epoch.
///
/// The textual form shared by the notation format is
/// `YYYY-MM-DDTHH:MM:SSZ`, with two fractional digits (`…:SS.FFZ`) when the
/// timestamp has a sub-second part.
///
/// ```rust
/// use llsd_codec::Date;
///
/// let date = Date::parse("2006-02-01T14:29:53.43Z").unwrap();
/// assert_eq!(date.to_string(), "2006-02-01T14:29:53.43Z");
/// assert_eq!(Date::parse("").unwrap(), Date::EPOCH);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Date(f64);

impl Date {
    pub const EPOCH: Date = Date(0.0);

    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub fn seconds_since_epoch(&self) -> f64 {
        self.0
    }

    /// Parses the textual date form. An empty string is the epoch.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self::EPOCH);
        }
        let body = text.strip_suffix('Z')?;
        let (whole, fraction) = match body.split_once('.') {
            Some((whole, digits)) => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                // "0." + digits is always a valid float literal here
                let mut literal = alloc::string::String::with_capacity(digits.len() + 2);
                literal.push_str("0.");
                literal.push_str(digits);
                (whole, literal.parse::<f64>().ok()?)
            }
            None => (body, 0.0),
        };
        let naive = NaiveDateTime::parse_from_str(whole, "%Y-%m-%dT%H:%M:%S").ok()?;
        #[allow(clippy::cast_precision_loss)]
        let seconds = naive.and_utc().timestamp() as f64;
        Some(Self(seconds + fraction))
    }

    /// Splits into whole seconds and hundredths, carrying a rounded-up
    /// fraction into the seconds.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_precision_loss)]
    fn split(self) -> (i64, i64) {
        let mut whole = self.0 as i64;
        if (whole as f64) > self.0 {
            whole -= 1;
        }
        let fraction = self.0 - whole as f64;
        let mut hundredths = (fraction * 100.0 + 0.5) as i64;
        if hundredths >= 100 {
            whole += 1;
            hundredths = 0;
        }
        (whole, hundredths)
    }
}

impl From<f64> for Date {
    fn from(seconds: f64) -> Self {
        Self(seconds)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, hundredths) = if self.0.is_finite() { self.split() } else { (0, 0) };
        let Some(at) = DateTime::from_timestamp(whole, 0) else {
            return f.write_str("1970-01-01T00:00:00Z");
        };
        write!(f, "{}", at.format("%Y-%m-%dT%H:%M:%S"))?;
        if hundredths > 0 {
            write!(f, ".{hundredths:02}")?;
        }
        f.write_str("Z")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::Date;

    #[test]
    fn whole_seconds_have_no_fraction() {
        let date = Date::from_seconds(1_136_073_600.0);
        assert_eq!(date.to_string(), "2006-01-01T00:00:00Z");
        assert_eq!(Date::parse("2006-01-01T00:00:00Z"), Some(date));
    }

    #[test]
    fn fraction_is_two_digits() {
        let date = Date::from_seconds(0.5);
        assert_eq!(date.to_string(), "1970-01-01T00:00:00.50Z");
        assert_eq!(Date::parse("1970-01-01T00:00:00.50Z"), Some(date));
    }

    #[test]
    fn fraction_rounding_carries() {
        assert_eq!(Date::from_seconds(59.999).to_string(), "1970-01-01T00:01:00Z");
    }

    #[test]
    fn negative_timestamps() {
        assert_eq!(Date::from_seconds(-1.0).to_string(), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Date::parse("yesterday"), None);
        assert_eq!(Date::parse("2006-01-01T00:00:00"), None);
        assert_eq!(Date::parse("2006-01-01T00:00:00.Z"), None);
    }
}
