/// Class label given to every row reshaped out of a wide table, which has no
/// class column of its own.
pub const DEFAULT_WIDE_CLASS: &str = "7A";

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub wide_class_label: String,
}

impl IngestOptions {
    pub fn with_class(label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        Self {
            wide_class_label: if trimmed.is_empty() {
                DEFAULT_WIDE_CLASS.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            wide_class_label: DEFAULT_WIDE_CLASS.to_string(),
        }
    }
}
