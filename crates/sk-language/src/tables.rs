//! Static language data consulted while resolving a page language.

use crate::code;
use sk_core::ShellError;
use sk_core::ShellResult;

/// Whole-code mappings applied before the primary-tag synonyms.
const DEFAULT_SIMILITUDES: &[(&str, &str)] = &[
    ("zh-HK", "zh-TW"),
    ("zh-MO", "zh-TW"),
    ("zh-SG", "zh-CN"),
];

/// Primary tags the translation backend knows under a different name.
const DEFAULT_SYNONYMS: &[(&str, &str)] = &[("nb", "no"), ("he", "iw"), ("jv", "jw"), ("fil", "tl")];

// Some languages are very similar and difficult for the classifier to
// tell apart.
const DEFAULT_SIMILAR_GROUPS: &[(&str, u32)] = &[("bs", 1), ("hr", 1), ("hi", 2), ("ne", 2)];

/// Languages whose sites often ship `Content-Language: en` by mistake.
const DEFAULT_MISCONFIGURED_AS_ENGLISH: &[&str] = &[
    "es", "pt", "ja", "ru", "de", "zh-CN", "zh-TW", "ar", "id", "fr", "it", "th",
];

/// How a declared code relates to a classifier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Similarity {
    /// Primary tags match; region is ignored.
    SameLanguage,
    /// Different tags that share a similar-language group.
    SimilarGroup,
    Different,
}

impl Similarity {
    pub fn is_match(self) -> bool {
        !matches!(self, Self::Different)
    }
}

/// Synonym, similarity and misconfiguration tables.
///
/// Injected into [`crate::LanguageResolver`] at construction and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTables {
    pub similitudes: Vec<(String, String)>,
    pub synonyms: Vec<(String, String)>,
    pub similar_groups: Vec<(String, u32)>,
    pub misconfigured_as_english: Vec<String>,
}

impl Default for LanguageTables {
    fn default() -> Self {
        Self {
            similitudes: owned_pairs(DEFAULT_SIMILITUDES),
            synonyms: owned_pairs(DEFAULT_SYNONYMS),
            similar_groups: DEFAULT_SIMILAR_GROUPS
                .iter()
                .map(|(code, group)| ((*code).to_owned(), *group))
                .collect(),
            misconfigured_as_english: DEFAULT_MISCONFIGURED_AS_ENGLISH
                .iter()
                .map(|code| (*code).to_owned())
                .collect(),
        }
    }
}

impl LanguageTables {
    pub fn validate(&self) -> ShellResult<()> {
        for (from, to) in self.similitudes.iter().chain(&self.synonyms) {
            if from.is_empty() {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    "synonym source code must not be empty",
                ));
            }
            if !code::is_valid(to) {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    format!("synonym target `{to}` for `{from}` is not a valid language code"),
                ));
            }
        }

        self.validate_fixed_point()?;

        for (language, group) in &self.similar_groups {
            if language.is_empty() {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    "similar-language entry has an empty code",
                ));
            }
            if *group == 0 {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    format!("similar-language group for `{language}` must be nonzero"),
                ));
            }
        }

        if let Some(bad) = self
            .misconfigured_as_english
            .iter()
            .find(|language| !code::is_valid(language))
        {
            return Err(ShellError::new(
                "language.tables_invalid",
                format!("misconfiguration entry `{bad}` is not a valid language code"),
            ));
        }

        Ok(())
    }

    /// Mapping a code must never produce another mapping source, otherwise
    /// `normalize` would not be idempotent.
    fn validate_fixed_point(&self) -> ShellResult<()> {
        let is_similitude_source =
            |language: &str| self.similitudes.iter().any(|(from, _)| from == language);
        let is_synonym_source =
            |language: &str| self.synonyms.iter().any(|(from, _)| from == language);

        for (from, to) in &self.similitudes {
            let (main, _) = code::split_main_and_tail(to);
            if is_similitude_source(to.as_str()) || is_synonym_source(main) {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    format!("similitude target `{to}` for `{from}` is itself mapped again"),
                ));
            }
        }

        for (from, to) in &self.synonyms {
            if to.contains('-') {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    format!("synonym target `{to}` for `{from}` must be a bare primary tag"),
                ));
            }

            let feeds_similitude = self
                .similitudes
                .iter()
                .any(|(source, _)| code::split_main_and_tail(source).0 == to.as_str());
            if is_synonym_source(to.as_str()) || feeds_similitude {
                return Err(ShellError::new(
                    "language.tables_invalid",
                    format!("synonym target `{to}` for `{from}` is itself mapped again"),
                ));
            }
        }

        Ok(())
    }

    /// Corrects, validates and maps `raw` to its canonical form.
    ///
    /// Invalid input yields an empty string. The result is a fixed point:
    /// normalizing it again returns it unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let corrected = code::correct_typo(raw);
        if !code::is_valid(&corrected) {
            return String::new();
        }

        self.to_synonym(&corrected)
    }

    /// Maps a code to the name the translation backend uses for it.
    pub fn to_synonym(&self, language: &str) -> String {
        if let Some((_, to)) = self.similitudes.iter().find(|(from, _)| from == language) {
            return to.clone();
        }

        let (main, tail) = code::split_main_and_tail(language);
        if main.is_empty() {
            return language.to_owned();
        }

        let main = self
            .synonyms
            .iter()
            .find(|(from, _)| from == main)
            .map_or(main, |(_, to)| to.as_str());
        format!("{main}{tail}")
    }

    /// Group id of the first entry that prefixes `language`, or 0.
    pub fn similar_group(&self, language: &str) -> u32 {
        self.similar_groups
            .iter()
            .find(|(prefix, _)| language.starts_with(prefix.as_str()))
            .map_or(0, |(_, group)| *group)
    }

    pub fn similarity(&self, page_language: &str, classifier_language: &str) -> Similarity {
        if page_language.len() >= 2
            && classifier_language
                .as_bytes()
                .starts_with(&page_language.as_bytes()[..2])
        {
            return Similarity::SameLanguage;
        }

        let group = self.similar_group(page_language);
        if group != 0 && group == self.similar_group(classifier_language) {
            Similarity::SimilarGroup
        } else {
            Similarity::Different
        }
    }

    pub fn is_same_or_similar(&self, page_language: &str, classifier_language: &str) -> bool {
        self.similarity(page_language, classifier_language).is_match()
    }

    /// True when the page claims English but the classifier confidently saw a
    /// language whose sites are known to default their headers to `en`.
    pub fn maybe_server_misconfiguration(
        &self,
        page_language: &str,
        classifier_language: &str,
    ) -> bool {
        if !starts_with_ignore_ascii_case(page_language, "en") {
            return false;
        }

        self.misconfigured_as_english
            .iter()
            .any(|language| language == classifier_language)
    }
}

/// The classifier may supply the dialect a bare `zh` lacks.
pub fn can_complement_region(page_language: &str, classifier_language: &str) -> bool {
    page_language == "zh" && starts_with_ignore_ascii_case(classifier_language, "zh-")
}

pub(crate) fn starts_with_ignore_ascii_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(from, to)| ((*from).to_owned(), (*to).to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::LanguageTables;
    use super::Similarity;
    use super::can_complement_region;

    #[test]
    fn default_tables_validate() {
        assert!(LanguageTables::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_similarity_group() {
        let mut tables = LanguageTables::default();
        tables.similar_groups.push(("sr".to_owned(), 0));
        let result = tables.validate();
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "language.tables_invalid");
        }
    }

    #[test]
    fn rejects_invalid_synonym_target() {
        let mut tables = LanguageTables::default();
        tables.synonyms.push(("xx".to_owned(), "not a code".to_owned()));
        assert!(tables.validate().is_err());
    }

    #[test]
    fn rejects_chained_synonyms() {
        let mut tables = LanguageTables::default();
        tables.synonyms.push(("aa".to_owned(), "bb".to_owned()));
        tables.synonyms.push(("bb".to_owned(), "cc".to_owned()));
        let result = tables.validate();
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "language.tables_invalid");
        }
    }

    #[test]
    fn rejects_synonym_target_with_region() {
        let mut tables = LanguageTables::default();
        tables.synonyms.retain(|(from, _)| from != "fil");
        tables.synonyms.push(("fil".to_owned(), "tl-PH".to_owned()));
        assert!(tables.validate().is_err());
    }

    #[test]
    fn rejects_synonym_feeding_similitude() {
        let mut tables = LanguageTables::default();
        tables.synonyms.push(("cmn".to_owned(), "zh".to_owned()));
        assert!(tables.validate().is_err());
    }

    #[test]
    fn rejects_chained_similitudes() {
        let mut tables = LanguageTables::default();
        tables.similitudes.push(("zh-TW".to_owned(), "zh-CN".to_owned()));
        assert!(tables.validate().is_err());

        let mut tables = LanguageTables::default();
        tables.similitudes.push(("pt-PT".to_owned(), "nb-NO".to_owned()));
        assert!(tables.validate().is_err());
    }

    #[test]
    fn validated_custom_tables_normalize_idempotently() {
        let mut tables = LanguageTables::default();
        tables.synonyms.push(("aa".to_owned(), "bb".to_owned()));
        tables.similitudes.push(("pt-PT".to_owned(), "pt-BR".to_owned()));
        assert!(tables.validate().is_ok());

        for raw in ["aa", "bb", "aa_pt", "pt-pt", "nb"] {
            let once = tables.normalize(raw);
            assert_eq!(tables.normalize(&once), once, "input {raw:?}");
        }
        assert_eq!(tables.normalize("aa-pt"), "bb-PT");
        assert_eq!(tables.normalize("pt_pt"), "pt-BR");
    }

    #[test]
    fn normalizes_common_inputs() {
        let tables = LanguageTables::default();
        assert_eq!(tables.normalize("en_us"), "en-US");
        assert_eq!(tables.normalize("EN"), "en");
        assert_eq!(tables.normalize("toolong1234"), "");
        assert_eq!(tables.normalize("fr,en;q=0.5"), "fr");
        assert_eq!(tables.normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let tables = LanguageTables::default();
        for raw in [
            "en_us", "EN", "toolong1234", "fr,en;q=0.5", "nb-no", "he", "zh_hk", "fil", " de ",
            "en-", "zh", "und", "x",
        ] {
            let once = tables.normalize(raw);
            assert_eq!(tables.normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn maps_synonyms_keeping_region() {
        let tables = LanguageTables::default();
        assert_eq!(tables.normalize("nb"), "no");
        assert_eq!(tables.normalize("nb_NO"), "no-NO");
        assert_eq!(tables.normalize("he-IL"), "iw-IL");
        assert_eq!(tables.normalize("zh-hk"), "zh-TW");
        assert_eq!(tables.normalize("zh-sg"), "zh-CN");
        assert_eq!(tables.normalize("zh"), "zh");
    }

    #[test]
    fn same_or_similar_languages() {
        let tables = LanguageTables::default();
        assert_eq!(tables.similarity("en-US", "en"), Similarity::SameLanguage);
        assert_eq!(tables.similarity("bs", "hr"), Similarity::SimilarGroup);
        assert!(tables.is_same_or_similar("hi", "ne"));
        assert!(!tables.is_same_or_similar("en", "fr"));
        assert!(!tables.is_same_or_similar("bs", "hi"));
        assert!(!tables.is_same_or_similar("e", "en"));
    }

    #[test]
    fn detects_english_misconfiguration() {
        let tables = LanguageTables::default();
        assert!(tables.maybe_server_misconfiguration("en", "es"));
        assert!(tables.maybe_server_misconfiguration("EN-gb", "zh-TW"));
        assert!(!tables.maybe_server_misconfiguration("en", "nl"));
        assert!(!tables.maybe_server_misconfiguration("de", "es"));
    }

    #[test]
    fn complements_bare_chinese_only() {
        assert!(can_complement_region("zh", "zh-CN"));
        assert!(!can_complement_region("zh-TW", "zh-CN"));
        assert!(!can_complement_region("zh", "zh"));
    }
}
