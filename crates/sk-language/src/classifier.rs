//! Text language classifier collaborator.

/// Raw verdict of a [`TextClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Detected language, possibly with a dialect (`zh-CN`). Empty or
    /// [`crate::UNKNOWN_LANGUAGE_CODE`] when nothing was detected.
    pub language: String,
    pub is_reliable: bool,
    /// Bytes of text the classifier actually examined.
    pub text_bytes: usize,
}

impl Detection {
    pub fn unknown() -> Self {
        Self {
            language: crate::UNKNOWN_LANGUAGE_CODE.to_owned(),
            is_reliable: false,
            text_bytes: 0,
        }
    }
}

/// Statistical detector for the language of page text.
pub trait TextClassifier {
    fn classify(&self, text: &str) -> Detection;

    /// Version string of the underlying model.
    fn version(&self) -> String {
        String::new()
    }
}
