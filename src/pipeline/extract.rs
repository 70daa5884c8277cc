//! Phone-token extraction: find the first phone-shaped substring in a QR
//! payload.
//!
//! The shape check is deliberately permissive and purely syntactic. Whether
//! the digits form a real number is decided later by the resolver, which
//! has the numbering-plan metadata; this stage only needs to cut a plausible
//! candidate out of surrounding prose such as `"Contact us: +1 415 555 2671"`.

use once_cell::sync::Lazy;
use regex::Regex;

// Optional `+`, then at least three groups of 1–4 digits. A group may be
// wrapped in parentheses and groups are joined by at most one space or
// hyphen, so the match never starts or ends on a separator.
static RE_PHONE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d{1,4}\)?(?:[ -]?\(?\d{1,4}\)?){2,}").unwrap());

/// Return the leftmost phone-shaped substring of `text`.
///
/// Ties are broken by position, not length: the first place a match can
/// start wins, even if a longer candidate appears later.
pub fn extract_token(text: Option<&str>) -> Option<&str> {
    let text = text?;
    RE_PHONE_TOKEN.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_text_yields_absent_token() {
        assert_eq!(extract_token(None), None);
    }

    #[test]
    fn bare_number_is_its_own_token() {
        assert_eq!(extract_token(Some("+14155552671")), Some("+14155552671"));
    }

    #[test]
    fn number_embedded_in_prose() {
        assert_eq!(
            extract_token(Some("Contact us: +14155552671 for details")),
            Some("+14155552671")
        );
    }

    #[test]
    fn spaced_and_hyphenated_groups() {
        assert_eq!(
            extract_token(Some("tel +1 (415) 555-2671, ask for Sam")),
            Some("+1 (415) 555-2671")
        );
        assert_eq!(
            extract_token(Some("Office: 020 7946 0958.")),
            Some("020 7946 0958")
        );
    }

    #[test]
    fn no_trailing_separator() {
        assert_eq!(extract_token(Some("+44 20 7946 0958 - ")), Some("+44 20 7946 0958"));
    }

    #[test]
    fn no_digits_no_token() {
        assert_eq!(extract_token(Some("no numbers here")), None);
        assert_eq!(extract_token(Some("")), None);
        assert_eq!(extract_token(Some("+")), None);
    }

    #[test]
    fn short_digit_runs_are_not_tokens() {
        assert_eq!(extract_token(Some("room 12, floor 3")), None);
        assert_eq!(extract_token(Some("v1.2 build 7")), None);
    }

    #[test]
    fn first_match_wins_over_longer_later_match() {
        assert_eq!(
            extract_token(Some("ref 123 456 789 then +441632960961")),
            Some("123 456 789")
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "WhatsApp me at +91 98765 43210 anytime";
        let first = extract_token(Some(text));
        assert_eq!(extract_token(Some(text)), first);
        assert_eq!(extract_token(first), first);
        assert_eq!(first, Some("+91 98765 43210"));
    }
}
