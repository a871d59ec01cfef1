//! Telemetry hooks fired while resolving a page language.

use crate::VerificationOutcome;
use std::time::Duration;

/// Receives resolution events for offline analysis.
///
/// Every method is fire-and-forget and must not influence the resolution.
pub trait LanguageTelemetry {
    fn html_lang(&self, _raw: &str, _normalized: &str) {}

    fn content_language(&self, _raw: &str, _normalized: &str) {}

    /// Fired exactly once per resolution.
    fn verification(&self, _outcome: VerificationOutcome) {}

    /// `false` for a plain primary-tag match, otherwise whether the two codes
    /// share a similar-language group.
    fn similar_language_match(&self, _matched: bool) {}

    fn detection_time(&self, _elapsed: Duration) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl LanguageTelemetry for NoopTelemetry {}

/// Forwards events to the `log` facade under the `sk_language::telemetry`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl LanguageTelemetry for LogTelemetry {
    fn html_lang(&self, raw: &str, normalized: &str) {
        log::debug!("html lang `{raw}` normalized to `{normalized}`");
    }

    fn content_language(&self, raw: &str, normalized: &str) {
        log::debug!("Content-Language `{raw}` normalized to `{normalized}`");
    }

    fn verification(&self, outcome: VerificationOutcome) {
        log::debug!("language verification: {}", outcome.as_str());
    }

    fn similar_language_match(&self, matched: bool) {
        log::debug!("similar language match: {matched}");
    }

    fn detection_time(&self, elapsed: Duration) {
        log::debug!("language detection took {elapsed:?}");
    }
}
