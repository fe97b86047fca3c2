use glob::{MatchOptions, Pattern, PatternError};

/// Sends raw files whose name matches a glob pattern to a category folder.
#[derive(Clone, Debug)]
pub struct CopyRule {
    pattern: Pattern,
    category: String,
}

impl CopyRule {
    pub fn new(pattern: &str, category: impl Into<String>) -> Result<Self, PatternError> {
        Ok(CopyRule {
            pattern: Pattern::new(pattern)?,
            category: category.into(),
        })
    }

    /// Whether a bare file name (no directories) matches the rule's pattern.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches_with(
            file_name,
            MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            },
        )
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Ordered list of [`CopyRule`]s. A file belongs to the first rule it matches and no other,
/// so specific patterns must be listed before broader patterns that also match them.
#[derive(Clone, Debug, Default)]
pub struct CopyTable {
    rules: Vec<CopyRule>,
}

impl CopyTable {
    #[must_use]
    pub fn new(rules: Vec<CopyRule>) -> Self {
        CopyTable { rules }
    }

    /// Build a table from `(pattern, category)` pairs in priority order.
    pub fn from_patterns<'a>(
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PatternError> {
        rules
            .into_iter()
            .map(|(pattern, category)| CopyRule::new(pattern, category))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The rule a file is copied by. `None` if no rule claims it.
    #[must_use]
    pub fn classify(&self, file_name: &str) -> Option<&CopyRule> {
        self.rules.iter().find(|rule| rule.matches(file_name))
    }

    /// Every category the table copies into, in rule order without repeats.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !categories.contains(&rule.category()) {
                categories.push(rule.category());
            }
        }
        categories
    }

    pub fn rules(&self) -> &[CopyRule] {
        &self.rules
    }
}
