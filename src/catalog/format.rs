//! The closed set of download formats offered by the catalog.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A downloadable encoding/container offered by the remote catalog.
///
/// The set is closed: the server only understands these ten tags, so
/// anything else is rejected before a network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Fb2Zip,
    HtmlZip,
    TxtZip,
    RtfZip,
    Fb3,
    A4Pdf,
    A6Pdf,
    MobiPrc,
    Epub,
    IosEpub,
}

/// The requested format string is not one of the known tags.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown format: {value}")]
pub struct FormatParseError {
    /// The unrecognized format string.
    pub value: String,
}

impl Format {
    /// All known formats, in the order the remote service documents them.
    pub const ALL: [Format; 10] = [
        Format::Fb2Zip,
        Format::HtmlZip,
        Format::TxtZip,
        Format::RtfZip,
        Format::Fb3,
        Format::A4Pdf,
        Format::A6Pdf,
        Format::MobiPrc,
        Format::Epub,
        Format::IosEpub,
    ];

    /// The wire tag sent in `type=` form fields.
    ///
    /// The same string doubles as the local filename extension, so
    /// `book.fb2` requested as `ios.epub` is saved as `book.ios.epub`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Fb2Zip => "fb2.zip",
            Format::HtmlZip => "html.zip",
            Format::TxtZip => "txt.zip",
            Format::RtfZip => "rtf.zip",
            Format::Fb3 => "fb3",
            Format::A4Pdf => "a4.pdf",
            Format::A6Pdf => "a6.pdf",
            Format::MobiPrc => "mobi.prc",
            Format::Epub => "epub",
            Format::IosEpub => "ios.epub",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| FormatParseError {
                value: s.to_string(),
            })
    }
}
