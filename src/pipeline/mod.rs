//! Pipeline stages for QR-to-phone-number extraction.
//!
//! Each submodule implements exactly one transformation step, and each step
//! depends only on the previous step's output, so every stage is testable
//! on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ extract ──▶ resolve
//! (path/URL)  (rqrr)    (regex)     (phonenumber + regions)
//! ```
//!
//! 1. [`input`]: canonicalise the user-supplied path or URL to a local
//!    file and apply the extension whitelist
//! 2. [`decode`]: flatten to luma and read the first QR symbol
//! 3. [`extract`]: cut the first phone-shaped substring out of the payload
//! 4. [`resolve`]: region-less numbering-plan parse, calling code and
//!    country name via [`regions`]
//!
//! Stages 2–4 are synchronous, pure with respect to process state, and
//! report "nothing found" as a normal return value.

pub mod decode;
pub mod extract;
pub mod input;
pub mod regions;
pub mod resolve;
