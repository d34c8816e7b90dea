//! Catalog configuration.

/// Configuration for opening a catalog.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to load every collection when the catalog is opened.
    pub load_on_open: bool,

    /// Whether review mutations persist the book collection immediately.
    pub autosave_reviews: bool,

    /// Whether attaching an existing category checks for ancestor cycles.
    ///
    /// Self-attachment is always rejected; this adds the transitive check.
    pub strict_category_tree: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            load_on_open: true,
            autosave_reviews: true,
            strict_category_tree: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the data directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to load all collections on open.
    #[must_use]
    pub const fn load_on_open(mut self, value: bool) -> Self {
        self.load_on_open = value;
        self
    }

    /// Sets whether review mutations save the book collection.
    #[must_use]
    pub const fn autosave_reviews(mut self, value: bool) -> Self {
        self.autosave_reviews = value;
        self
    }

    /// Sets whether category attachment rejects ancestor cycles.
    #[must_use]
    pub const fn strict_category_tree(mut self, value: bool) -> Self {
        self.strict_category_tree = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_if_missing);
        assert!(config.load_on_open);
        assert!(config.autosave_reviews);
        assert!(!config.strict_category_tree);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .create_if_missing(false)
            .autosave_reviews(false)
            .strict_category_tree(true);

        assert!(!config.create_if_missing);
        assert!(!config.autosave_reviews);
        assert!(config.strict_category_tree);
        assert!(config.load_on_open);
    }
}
