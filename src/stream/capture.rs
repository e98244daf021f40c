#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CAPTURE_MARKER, DEFAULT_PLACEHOLDER};

/// Framing of lines written by a logic-analyzer UART decoder.
///
/// Such lines look like `uart-1: $GNRMC,...*36??$GNGGA,...`: a marker, then the
/// decoded bytes with a placeholder for each unprintable byte. A single line may
/// hold several sentences or fragments of them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFraming {
    /// Text preceding the decoded bytes
    pub marker: String,
    /// Text standing for one unprintable byte; removed before splitting
    pub placeholder: String,
}

impl CaptureFraming {
    pub fn new(marker: impl Into<String>, placeholder: impl Into<String>) -> Self {
        CaptureFraming {
            marker: marker.into(),
            placeholder: placeholder.into(),
        }
    }

    /// The decoded bytes of a framed line, [`None`] if the line has no marker.
    ///
    /// Only the text between the first marker and the next one (if any) is kept.
    pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.marker.is_empty() {
            return None;
        }

        line.split(self.marker.as_str()).nth(1).map(str::trim)
    }

    /// Extracts every `$`-initiated span from a framed line.
    ///
    /// Returns [`None`] for lines without the marker, which the caller treats
    /// as plain text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_analyzer::stream::CaptureFraming;
    ///
    /// let framing = CaptureFraming::default();
    /// let spans = framing.sentences("uart-1: $GNTXT,01*00??$GNGGA,1*11").unwrap();
    /// assert_eq!(spans, ["$GNTXT,01*00", "$GNGGA,1*11"]);
    ///
    /// assert_eq!(framing.sentences("$GNTXT,01*00"), None);
    /// assert_eq!(framing.sentences("uart-1: ????").unwrap(), Vec::<String>::new());
    /// ```
    pub fn sentences(&self, line: &str) -> Option<Vec<String>> {
        let payload = self.payload(line)?;
        let cleaned = if self.placeholder.is_empty() {
            payload.to_owned()
        } else {
            payload.replace(self.placeholder.as_str(), "")
        };

        Some(
            cleaned
                .split('$')
                .skip(1)
                .map(|span| format!("${span}"))
                .collect(),
        )
    }
}

impl Default for CaptureFraming {
    fn default() -> Self {
        CaptureFraming::new(DEFAULT_CAPTURE_MARKER, DEFAULT_PLACEHOLDER)
    }
}
