//! The known category set.
//!
//! Categories are a fixed, ordered list of labels. The first label is the
//! default for new notes and the display fallback for rows without a
//! category. [`ALL`] is a meta-label used only for aggregation and
//! filtering in the UI; it is never stored on a note.

/// Meta-label meaning "every category". Never stored on a note.
pub const ALL: &str = "全部";

/// The categories shipped with memo, in picker order.
pub const BUILTIN: [&str; 7] = ["默认", "工作", "行程", "学习", "灵感", "生活", "其他"];

/// Ordered set of known category labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategorySet {
    /// The built-in category list.
    pub fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    /// Build a set from `labels`, keeping first occurrences in order.
    ///
    /// The [`ALL`] meta-label and empty labels are dropped.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if label.is_empty() || label == ALL || out.contains(&label) {
                continue;
            }
            out.push(label);
        }
        Self { labels: out }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Label used for new notes and for rows with no category.
    pub fn default_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(BUILTIN[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}
