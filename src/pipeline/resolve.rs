//! Number resolution: parse a phone token and attach country metadata.
//!
//! Parsing runs with no default region. A token such as `4155552671` is
//! ambiguous (it is a valid national number in several plans) so it is
//! rejected rather than guessed; only tokens carrying an explicit
//! `+<calling code>` prefix can resolve.

use crate::error::ParseFailure;
use crate::output::ResolvedNumber;
use crate::pipeline::regions;
use phonenumber::Mode;
use tracing::debug;

/// Parse `token` into a [`ResolvedNumber`].
///
/// A number whose calling code maps to no single country (e.g. `+800`
/// international freephone) still resolves, with `country_name: None`.
pub fn resolve(token: &str) -> Result<ResolvedNumber, ParseFailure> {
    let number = phonenumber::parse(None, token).map_err(|e| ParseFailure::Unparseable {
        token: token.to_string(),
        detail: e.to_string(),
    })?;

    let calling_code = number.code().value();
    let region = number.country().id().map(|id| format!("{id:?}"));
    let country_name = region
        .as_deref()
        .and_then(regions::country_name)
        .map(str::to_owned);
    let is_valid = phonenumber::is_valid(&number);

    debug!(
        "Resolved '{}' → +{} ({}), valid={}",
        token,
        calling_code,
        region.as_deref().unwrap_or("non-geographic"),
        is_valid
    );

    Ok(ResolvedNumber {
        calling_code,
        country_name,
        region,
        e164: number.format().mode(Mode::E164).to_string(),
        national_number: number.national().value(),
        is_valid,
    })
}
