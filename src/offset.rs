//! Cue offsets: raw user values and the playback thresholds they resolve to.

use std::{fmt, time::Duration};

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// A cue point's offset, as passed to [`CueTracker::add`](crate::CueTracker::add).
///
/// Offsets are kept exactly as given: handlers receive them unchanged and removing cues
/// compares them strictly, including their type. `CueOffset::from(5)` and `CueOffset::from("5")`
/// thus are two different offsets, even though both trigger at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum CueOffset {
    /// An absolute playback time in seconds.
    Seconds(f64),
    /// A textual offset: a percentage of the duration such as `"50%"`,
    /// or a number of seconds such as `"13.5"`.
    Text(String),
}

impl CueOffset {
    /// Parse the offset into a playback threshold. Malformed offsets result in a NaN threshold,
    /// which never gets reached.
    pub fn threshold(&self) -> CueThreshold {
        CueThreshold::parse(self)
    }

    /// True when this is a text offset which describes a percentage of the playback duration.
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Text(text) if is_percentage(text))
    }

    /// Check if the offset is a finite, non-negative number of seconds or a percentage.
    /// Returns `Error::InvalidOffset` otherwise.
    pub fn validate(&self) -> Result<(), Error> {
        let is_valid = match self {
            Self::Seconds(seconds) => seconds.is_finite() && *seconds >= 0.0,
            Self::Text(text) => is_percentage(text),
        };
        if is_valid {
            Ok(())
        } else {
            Err(Error::InvalidOffset(self.to_string()))
        }
    }
}

impl fmt::Display for CueOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(seconds) => write!(f, "{seconds}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

macro_rules! impl_cue_offset_from_number {
    ($($type:ty),*) => {
        $(
            impl From<$type> for CueOffset {
                fn from(seconds: $type) -> Self {
                    Self::Seconds(seconds as f64)
                }
            }
        )*
    };
}

impl_cue_offset_from_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<Duration> for CueOffset {
    fn from(duration: Duration) -> Self {
        Self::Seconds(duration.as_secs_f64())
    }
}

impl From<&str> for CueOffset {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for CueOffset {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for CueOffset {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

// -------------------------------------------------------------------------------------------------

/// An ordered list of [`CueOffset`]s, with duplicates.
///
/// Usually created implicitly from a single offset value, a `Vec` or an array of values. Use the
/// [`cue_offsets!`](crate::cue_offsets) macro to create lists with mixed offset types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueOffsets(Vec<CueOffset>);

impl CueOffsets {
    /// Create a new, empty offset list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append an offset.
    pub fn push<O: Into<CueOffset>>(&mut self, offset: O) {
        self.0.push(offset.into());
    }

    /// True when the list holds an offset which strictly equals the given one.
    pub fn contains(&self, offset: &CueOffset) -> bool {
        self.0.contains(offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CueOffset> {
        self.0.iter()
    }

    /// Validate all offsets, returning the first error, if any.
    pub fn validate(&self) -> Result<(), Error> {
        self.0.iter().try_for_each(CueOffset::validate)
    }
}

impl IntoIterator for CueOffsets {
    type Item = CueOffset;
    type IntoIter = std::vec::IntoIter<CueOffset>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CueOffsets {
    type Item = &'a CueOffset;
    type IntoIter = std::slice::Iter<'a, CueOffset>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<CueOffset> for CueOffsets {
    fn from_iter<I: IntoIterator<Item = CueOffset>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<CueOffsets> for Vec<CueOffset> {
    fn from(offsets: CueOffsets) -> Self {
        offsets.0
    }
}

macro_rules! impl_cue_offsets_from {
    ($($type:ty),*) => {
        $(
            impl From<$type> for CueOffsets {
                fn from(offset: $type) -> Self {
                    Self(vec![offset.into()])
                }
            }

            impl From<Vec<$type>> for CueOffsets {
                fn from(offsets: Vec<$type>) -> Self {
                    Self(offsets.into_iter().map(Into::into).collect())
                }
            }

            impl<const N: usize> From<[$type; N]> for CueOffsets {
                fn from(offsets: [$type; N]) -> Self {
                    Self(offsets.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_cue_offsets_from!(
    CueOffset, f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, Duration, &str,
    String
);

/// Creates a [`CueOffsets`](crate::CueOffsets) list from offset values of mixed types.
///
/// ```rust
/// use cuepoint::{cue_offsets, CueOffset};
///
/// let offsets = cue_offsets![4, 12.5, "50%"];
/// assert_eq!(offsets.len(), 3);
/// assert!(offsets.contains(&CueOffset::Text("50%".to_string())));
/// ```
#[macro_export]
macro_rules! cue_offsets {
    () => {
        $crate::CueOffsets::new()
    };
    ($($offset:expr),+ $(,)?) => {
        $crate::CueOffsets::from(vec![$($crate::CueOffset::from($offset)),+])
    };
}

// -------------------------------------------------------------------------------------------------

/// A parsed [`CueOffset`]: the playback time or progress at which a cue triggers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueThreshold {
    /// Playback time in seconds. NaN for malformed offsets.
    Absolute(f64),
    /// Fraction of the playback duration, where `1.0` is the end of the media.
    Percentage(f64),
}

impl CueThreshold {
    /// Parse a raw offset.
    ///
    /// Percentage texts (`^\d+(\.\d+)?%`) result in a [`Percentage`](Self::Percentage). Any other
    /// text is read as seconds from its leading number, as in `"13.52"` or `"7 sec"`. Texts without
    /// a leading number result in a NaN threshold.
    pub fn parse(offset: &CueOffset) -> Self {
        match offset {
            CueOffset::Seconds(seconds) => Self::Absolute(*seconds),
            CueOffset::Text(text) => {
                if is_percentage(text) {
                    Self::Percentage(parse_leading_number(text) / 100.0)
                } else {
                    Self::Absolute(parse_leading_number(text))
                }
            }
        }
    }

    /// Resolve the threshold into an absolute time in seconds, using the given playback duration.
    /// Percentages resolve to NaN when the duration is unknown (NaN).
    pub fn resolve(&self, duration: f64) -> f64 {
        match *self {
            Self::Absolute(seconds) => seconds,
            Self::Percentage(ratio) => ratio * duration,
        }
    }

    /// True when the threshold can never be reached, whatever the playback position and duration.
    /// This is the case for texts which neither are percentages nor start with a number.
    pub fn is_malformed(&self) -> bool {
        match *self {
            Self::Absolute(value) | Self::Percentage(value) => value.is_nan(),
        }
    }

    /// True when the given playback position reached the threshold.
    #[inline]
    pub fn is_reached(&self, current_time: f64, duration: f64) -> bool {
        current_time >= self.resolve(duration)
    }
}

// -------------------------------------------------------------------------------------------------

/// Matches `^\d+(\.\d+)?%`. Anything may follow the percent sign.
fn is_percentage(text: &str) -> bool {
    let bytes = text.as_bytes();
    let int_digits = count_digits(bytes, 0);
    if int_digits == 0 {
        return false;
    }
    let mut pos = int_digits;
    if bytes.get(pos) == Some(&b'.') {
        let fraction_digits = count_digits(bytes, pos + 1);
        if fraction_digits > 0 {
            pos += 1 + fraction_digits;
        }
    }
    bytes.get(pos) == Some(&b'%')
}

/// Leniently parses the longest decimal number at the start of the text, ignoring all trailing
/// garbage. Returns NaN when the text doesn't start with a number.
fn parse_leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(bytes, end);
    end += int_digits;
    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if int_digits == 0 && fraction_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_start = end + 1;
        if matches!(bytes.get(exponent_start), Some(b'+' | b'-')) {
            exponent_start += 1;
        }
        let exponent_digits = count_digits(bytes, exponent_start);
        if exponent_digits > 0 {
            end = exponent_start + exponent_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_pattern() {
        assert!(is_percentage("50%"));
        assert!(is_percentage("12.5%"));
        assert!(is_percentage("0%"));
        assert!(is_percentage("50%abc"));
        assert!(!is_percentage("50"));
        assert!(!is_percentage("5.%"));
        assert!(!is_percentage(".5%"));
        assert!(!is_percentage("-5%"));
        assert!(!is_percentage(" 5%"));
        assert!(!is_percentage("%"));
        assert!(!is_percentage(""));
    }

    #[test]
    fn leading_numbers() {
        assert_eq!(parse_leading_number("13.52"), 13.52);
        assert_eq!(parse_leading_number("  7 sec"), 7.0);
        assert_eq!(parse_leading_number("-2.5"), -2.5);
        assert_eq!(parse_leading_number("+.5"), 0.5);
        assert_eq!(parse_leading_number("1."), 1.0);
        assert_eq!(parse_leading_number("1e2"), 100.0);
        assert_eq!(parse_leading_number("1e"), 1.0);
        assert_eq!(parse_leading_number("2E-1x"), 0.2);
        assert_eq!(parse_leading_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_leading_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_leading_number("").is_nan());
        assert!(parse_leading_number(".").is_nan());
        assert!(parse_leading_number("abc").is_nan());
        assert!(parse_leading_number("-").is_nan());
    }

    #[test]
    fn thresholds() {
        assert_eq!(
            CueOffset::from(4.25).threshold(),
            CueThreshold::Absolute(4.25)
        );
        assert_eq!(
            CueOffset::from("13.52").threshold(),
            CueThreshold::Absolute(13.52)
        );
        assert_eq!(
            CueOffset::from("25%").threshold(),
            CueThreshold::Percentage(0.25)
        );
        assert_eq!(CueThreshold::Percentage(0.25).resolve(15.0), 3.75);
        assert_eq!(CueThreshold::Absolute(3.0).resolve(f64::NAN), 3.0);
        assert!(CueThreshold::Percentage(0.1).resolve(f64::NAN).is_nan());

        let malformed = CueOffset::from("soon").threshold();
        assert!(malformed.is_malformed());
        assert!(!malformed.is_reached(f64::INFINITY, 10.0));
        assert!(!CueOffset::from("13.52").threshold().is_malformed());
        assert!(!CueOffset::from("7 sec").threshold().is_malformed());
        assert!(!CueOffset::from(-2).threshold().is_malformed());
        assert!(!CueOffset::from("50%").threshold().is_malformed());
        assert!(CueOffset::from(f64::NAN).threshold().is_malformed());
        assert!(!CueThreshold::Percentage(0.5).is_reached(100.0, f64::NAN));
        assert!(CueThreshold::Percentage(0.5).is_reached(15.0, 30.0));
        assert!(!CueThreshold::Percentage(0.5).is_reached(14.9, 30.0));
    }

    #[test]
    fn strict_equality() {
        assert_eq!(CueOffset::from(5), CueOffset::from(5.0));
        assert_ne!(CueOffset::from(5), CueOffset::from("5"));
        assert_ne!(CueOffset::from(f64::NAN), CueOffset::from(f64::NAN));
        assert_eq!(
            CueOffset::from(Duration::from_millis(1500)),
            CueOffset::Seconds(1.5)
        );
    }

    #[test]
    fn validation() {
        assert!(CueOffset::from(0).validate().is_ok());
        assert!(CueOffset::from(16.6).validate().is_ok());
        assert!(CueOffset::from("50%").validate().is_ok());
        assert_eq!(
            CueOffset::from(-1).validate(),
            Err(Error::InvalidOffset("-1".to_string()))
        );
        assert!(CueOffset::from(f64::INFINITY).validate().is_err());
        assert!(CueOffset::from(f64::NAN).validate().is_err());
        assert!(CueOffset::from("13.52").validate().is_err());
        assert!(cue_offsets![1, "10%"].validate().is_ok());
        assert!(cue_offsets![1, "ten"].validate().is_err());
    }

    #[test]
    fn offset_lists() {
        assert_eq!(CueOffsets::from(16.6), cue_offsets![16.6]);
        assert_eq!(
            CueOffsets::from(vec![2, 4, 8]),
            cue_offsets![2.0, 4.0, 8.0]
        );
        assert_eq!(CueOffsets::from(["a", "b"]).len(), 2);
        assert!(cue_offsets![].is_empty());

        let offsets = cue_offsets![2, "50%"];
        assert_eq!(
            Vec::from(offsets),
            vec![CueOffset::Seconds(2.0), CueOffset::Text("50%".to_string())]
        );
        assert_eq!(CueOffset::from(16.6).to_string(), "16.6");
        assert_eq!(CueOffset::from(0).to_string(), "0");
    }
}
