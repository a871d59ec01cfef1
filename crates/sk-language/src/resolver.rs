//! Combines declared page languages with the classifier verdict.

use crate::Detection;
use crate::LanguageTables;
use crate::Similarity;
use crate::TextClassifier;
use crate::UNKNOWN_LANGUAGE_CODE;
use crate::telemetry::LanguageTelemetry;
use crate::telemetry::NoopTelemetry;
use sk_core::ShellError;
use sk_core::ShellResult;
use std::fmt;
use std::time::Instant;

const DEFAULT_MIN_RELIABLE_TEXT_BYTES: usize = 100;

/// How the final language was reached. Only used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationOutcome {
    /// Nothing was declared; the classifier result is used as-is.
    ClassifierOnly,
    /// The classifier had no trustworthy answer; the declared code wins.
    UnknownClassifier,
    /// Declared `zh`, classifier supplied the dialect.
    ClassifierComplementsRegion,
    Agreement,
    /// Declared English looks like a server default; classifier wins.
    SuspectedMisconfiguration,
    /// Conflicting signals; no language is suggested.
    Disagreement,
    ClassifierDisabled,
}

impl VerificationOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClassifierOnly => "classifier_only",
            Self::UnknownClassifier => "unknown_classifier",
            Self::ClassifierComplementsRegion => "classifier_complements_region",
            Self::Agreement => "agreement",
            Self::SuspectedMisconfiguration => "suspected_misconfiguration",
            Self::Disagreement => "disagreement",
            Self::ClassifierDisabled => "classifier_disabled",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`LanguageResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVerdict {
    pub language: String,
    pub outcome: VerificationOutcome,
    /// Raw classifier language before the trust check; `None` when the
    /// classifier is disabled.
    pub classifier_language: Option<String>,
    pub classifier_reliable: bool,
}

/// Resolver tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Shorter samples often lead to wrong classifier results.
    pub min_reliable_text_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_reliable_text_bytes: DEFAULT_MIN_RELIABLE_TEXT_BYTES,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> ShellResult<()> {
        if self.min_reliable_text_bytes == 0 {
            return Err(ShellError::new(
                "language.min_text_bytes_invalid",
                "min_reliable_text_bytes must be greater than zero",
            ));
        }

        Ok(())
    }
}

type SharedClassifier = Box<dyn TextClassifier + Send + Sync>;
type SharedTelemetry = Box<dyn LanguageTelemetry + Send + Sync>;

/// Determines the language of a loaded page.
///
/// Holds no per-call state: a resolver can be shared between pages as long as
/// the classifier itself is side-effect free.
pub struct LanguageResolver {
    tables: LanguageTables,
    config: ResolverConfig,
    classifier: Option<SharedClassifier>,
    telemetry: SharedTelemetry,
}

impl fmt::Debug for LanguageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageResolver")
            .field("tables", &self.tables)
            .field("config", &self.config)
            .field("classifier_enabled", &self.classifier.is_some())
            .finish_non_exhaustive()
    }
}

impl LanguageResolver {
    /// Builds a resolver without a classifier; see [`Self::with_classifier`].
    pub fn new(tables: LanguageTables, config: ResolverConfig) -> ShellResult<Self> {
        tables.validate()?;
        config.validate()?;

        Ok(Self {
            tables,
            config,
            classifier: None,
            telemetry: Box::new(NoopTelemetry),
        })
    }

    pub fn with_classifier(
        mut self,
        classifier: impl TextClassifier + Send + Sync + 'static,
    ) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn with_telemetry(
        mut self,
        telemetry: impl LanguageTelemetry + Send + Sync + 'static,
    ) -> Self {
        self.telemetry = Box::new(telemetry);
        self
    }

    pub fn tables(&self) -> &LanguageTables {
        &self.tables
    }

    pub fn classifier_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    /// Model version of the classifier, empty when none is installed.
    pub fn classifier_version(&self) -> String {
        self.classifier
            .as_ref()
            .map(|classifier| classifier.version())
            .unwrap_or_default()
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.tables.normalize(raw)
    }

    /// Resolves the page language from the `Content-Language` header, the
    /// `<html lang>` attribute and the page text.
    pub fn resolve(&self, content_language: &str, html_lang: &str, text: &str) -> LanguageVerdict {
        let classified = self.classifier.as_ref().map(|classifier| {
            let started = Instant::now();
            let detection = classifier.classify(text);
            self.telemetry.detection_time(started.elapsed());
            log::trace!(
                "classifier saw `{}` (reliable: {}, {} bytes)",
                detection.language,
                detection.is_reliable,
                detection.text_bytes
            );
            let trusted = self.trusted_language(&detection);
            (detection, self.tables.to_synonym(&trusted))
        });

        let declared = self.declared_language(content_language, html_lang);

        let Some((detection, classifier_language)) = classified else {
            return self.finish(declared, VerificationOutcome::ClassifierDisabled, None, false);
        };

        let (language, outcome) = self.verify(declared, classifier_language);
        self.finish(
            language,
            outcome,
            Some(detection.language),
            detection.is_reliable,
        )
    }

    fn trusted_language(&self, detection: &Detection) -> String {
        let usable = detection.is_reliable
            && detection.text_bytes >= self.config.min_reliable_text_bytes
            && !detection.language.is_empty()
            && detection.language != UNKNOWN_LANGUAGE_CODE;

        if usable {
            detection.language.clone()
        } else {
            UNKNOWN_LANGUAGE_CODE.to_owned()
        }
    }

    /// The normalized `lang` attribute if usable, else the header.
    fn declared_language(&self, content_language: &str, html_lang: &str) -> String {
        let mut html = String::new();
        if !html_lang.is_empty() {
            html = self.tables.normalize(html_lang);
            self.telemetry.html_lang(html_lang, &html);
            log::trace!("html lang `{html_lang}` normalized to `{html}`");
        }

        let mut header = String::new();
        if !content_language.is_empty() {
            header = self.tables.normalize(content_language);
            self.telemetry.content_language(content_language, &header);
            log::trace!("Content-Language `{content_language}` normalized to `{header}`");
        }

        if html.is_empty() { header } else { html }
    }

    fn verify(&self, declared: String, classifier: String) -> (String, VerificationOutcome) {
        if declared.is_empty() {
            return (classifier, VerificationOutcome::ClassifierOnly);
        }

        if classifier == UNKNOWN_LANGUAGE_CODE {
            return (declared, VerificationOutcome::UnknownClassifier);
        }

        if crate::tables::can_complement_region(&declared, &classifier) {
            return (classifier, VerificationOutcome::ClassifierComplementsRegion);
        }

        let similarity = self.tables.similarity(&declared, &classifier);
        self.telemetry
            .similar_language_match(similarity == Similarity::SimilarGroup);
        if similarity.is_match() {
            return (declared, VerificationOutcome::Agreement);
        }

        if self.tables.maybe_server_misconfiguration(&declared, &classifier) {
            return (classifier, VerificationOutcome::SuspectedMisconfiguration);
        }

        // The declared code may be wrong, but the classifier is not trusted
        // enough to replace it either.
        (
            UNKNOWN_LANGUAGE_CODE.to_owned(),
            VerificationOutcome::Disagreement,
        )
    }

    fn finish(
        &self,
        language: String,
        outcome: VerificationOutcome,
        classifier_language: Option<String>,
        classifier_reliable: bool,
    ) -> LanguageVerdict {
        self.telemetry.verification(outcome);
        log::trace!("resolved page language `{language}` ({outcome})");

        LanguageVerdict {
            language,
            outcome,
            classifier_language,
            classifier_reliable,
        }
    }
}
