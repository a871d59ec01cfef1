//! Page language determination.
//!
//! A page declares its language through `<html lang>` and the
//! `Content-Language` header, and a statistical classifier guesses it from the
//! text. [`LanguageResolver`] reconciles the three into one language code.

pub mod code;
pub mod page;
pub mod telemetry;

mod classifier;
mod resolver;
mod tables;

pub use classifier::Detection;
pub use classifier::TextClassifier;
pub use resolver::LanguageResolver;
pub use resolver::LanguageVerdict;
pub use resolver::ResolverConfig;
pub use resolver::VerificationOutcome;
pub use tables::LanguageTables;
pub use tables::Similarity;
pub use tables::can_complement_region;
pub use telemetry::LanguageTelemetry;
pub use telemetry::LogTelemetry;
pub use telemetry::NoopTelemetry;

/// Language code meaning "no determination".
pub const UNKNOWN_LANGUAGE_CODE: &str = "und";
