//! Result types handed back to the rendering layer.
//!
//! A scan always ends in exactly one [`Outcome`]. Callers map
//! [`Outcome::Resolved`] to a details view and [`Outcome::NotFound`] to the
//! message returned by [`NotFoundReason::user_message`].

use crate::error::ParseFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A phone number the numbering-plan parser accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNumber {
    /// International calling code, e.g. `1` or `44`.
    pub calling_code: u16,
    /// English country name. `None` for non-geographic codes such as `+800`.
    pub country_name: Option<String>,
    /// ISO 3166-1 alpha-2 region the number belongs to, e.g. `"US"`.
    pub region: Option<String>,
    /// Canonical `+<code><national>` form.
    pub e164: String,
    /// National significant number without the calling code.
    pub national_number: u64,
    /// Whether the number matches a known pattern for its region.
    pub is_valid: bool,
}

/// Why a scan produced no phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundReason {
    /// No QR symbol located, or the symbol could not be read.
    NoQr,
    /// Decoded text carried nothing shaped like a phone number.
    NoToken,
    /// A phone-shaped token was found but could not be parsed.
    Unparseable,
}

impl NotFoundReason {
    /// Stable kebab-case code, matching the serialised form.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundReason::NoQr => "no-qr",
            NotFoundReason::NoToken => "no-token",
            NotFoundReason::Unparseable => "unparseable",
        }
    }

    /// Message shown to the person who uploaded the image.
    pub fn user_message(&self) -> &'static str {
        match self {
            NotFoundReason::NoQr | NotFoundReason::NoToken => {
                "No phone number found in the QR code"
            }
            NotFoundReason::Unparseable => "Error parsing phone number",
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Resolved {
        /// The substring of the QR payload that was parsed.
        phone_token: String,
        #[serde(flatten)]
        number: ResolvedNumber,
    },
    NotFound {
        reason: NotFoundReason,
        /// Raw QR payload, when one was decoded.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        decoded_text: Option<String>,
        /// Parser diagnostics, set only for [`NotFoundReason::Unparseable`].
        #[serde(skip_serializing_if = "Option::is_none", default)]
        failure: Option<ParseFailure>,
    },
}

impl Outcome {
    pub(crate) fn not_found(reason: NotFoundReason, decoded_text: Option<&str>) -> Self {
        Outcome::NotFound {
            reason,
            decoded_text: decoded_text.map(str::to_owned),
            failure: None,
        }
    }

    pub(crate) fn unparseable(failure: ParseFailure, decoded_text: &str) -> Self {
        Outcome::NotFound {
            reason: NotFoundReason::Unparseable,
            decoded_text: Some(decoded_text.to_owned()),
            failure: Some(failure),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved { .. })
    }

    /// The resolved number, if any.
    pub fn number(&self) -> Option<&ResolvedNumber> {
        match self {
            Outcome::Resolved { number, .. } => Some(number),
            Outcome::NotFound { .. } => None,
        }
    }

    /// The reason nothing was resolved, if any.
    pub fn reason(&self) -> Option<NotFoundReason> {
        match self {
            Outcome::Resolved { .. } => None,
            Outcome::NotFound { reason, .. } => Some(*reason),
        }
    }
}
