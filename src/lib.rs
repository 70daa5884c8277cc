//! # qrphone
//!
//! Read the QR code in an image, pull out the phone number it carries, and
//! resolve that number to its calling code and country.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image
//!  │
//!  ├─ 1. Intake   whitelist the filename, materialise uploads, fetch URLs
//!  ├─ 2. Decode   luma conversion + first QR symbol (rqrr)
//!  ├─ 3. Extract  first phone-shaped substring of the payload (regex)
//!  └─ 4. Resolve  region-less parse, calling code, country name
//! ```
//!
//! Stages 2–4 form the core and never fail: every image ends in an
//! [`Outcome`], either `Resolved` or `NotFound` with one of three reasons.
//! Only intake can return an error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qrphone::{scan_file, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     match scan_file("contact.png")? {
//!         Outcome::Resolved { phone_token, number } => {
//!             println!("{phone_token}: +{} {:?}", number.calling_code, number.country_name);
//!         }
//!         Outcome::NotFound { reason, .. } => eprintln!("{}", reason.user_message()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `qrphone` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! qrphone = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IntakeConfig, IntakeConfigBuilder};
pub use error::{ParseFailure, ScanError};
pub use output::{NotFoundReason, Outcome, ResolvedNumber};
pub use pipeline::decode::{decode, ImageHandle};
pub use pipeline::extract::extract_token;
pub use pipeline::resolve::resolve;
pub use scan::{scan, scan_file, scan_input, scan_sync, scan_text, scan_upload};
