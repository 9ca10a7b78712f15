//! Prefix-based message suppression

/// Rejects records whose rendered message starts with a configured prefix.
///
/// Typically used to silence chatty, well-known messages (for example a
/// scheduler's per-task status lines) before they reach any appender.
///
/// # Example
///
/// ```
/// use rust_event_logger::core::TextFilter;
///
/// let filter = TextFilter::new(["Checking if", "Informed scheduler"]);
/// assert!(!filter.accepts("Checking if Demographics is complete"));
/// assert!(filter.accepts("0:00:00 [1] Build house..."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    skips: Vec<String>,
}

impl TextFilter {
    /// Create a filter; empty prefixes are ignored since they would match
    /// every message.
    pub fn new<I, S>(skips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().skipping(skips)
    }

    #[must_use]
    pub fn skip(mut self, prefix: impl Into<String>) -> Self {
        self.add_skip(prefix);
        self
    }

    #[must_use]
    pub fn skipping<I, S>(mut self, skips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in skips {
            self.add_skip(prefix);
        }
        self
    }

    pub fn add_skip(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.skips.push(prefix);
        }
    }

    #[inline]
    pub fn accepts(&self, message: &str) -> bool {
        !self.skips.iter().any(|skip| message.starts_with(skip.as_str()))
    }

    pub fn skips(&self) -> &[String] {
        &self.skips
    }

    pub fn is_empty(&self) -> bool {
        self.skips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_matching_prefix() {
        let filter = TextFilter::new(["DEBUG noise"]);
        assert!(!filter.accepts("DEBUG noise: heartbeat"));
        assert!(filter.accepts("useful DEBUG noise"));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = TextFilter::default();
        assert!(filter.is_empty());
        assert!(filter.accepts(""));
        assert!(filter.accepts("anything"));
    }

    #[test]
    fn test_empty_prefix_ignored() {
        let filter = TextFilter::new(["", "skip"]);
        assert_eq!(filter.skips(), ["skip".to_string()]);
        assert!(filter.accepts("keep me"));
    }

    #[test]
    fn test_builder_style() {
        let filter = TextFilter::default().skip("a").skipping(vec!["b", "c"]);
        assert_eq!(filter.skips().len(), 3);
        assert!(!filter.accepts("candidate"));
    }
}
