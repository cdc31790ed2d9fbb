/// Names of the predicates exported by `power-assert`.
pub const DEFAULT_ASSERTION_NAMES: &[&str] = &[
    "assert",
    "assertEquals",
    "assertNotEquals",
    "assertStrictEquals",
    "assertNotStrictEquals",
    "assertStringIncludes",
    "assertArrayIncludes",
    "assertMatch",
    "assertNotMatch",
    "assertThrows",
    "assertThrowsAsync",
];

/// Knobs for one instrumentation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentConfig {
    /// Callee names whose statements get rewritten.
    pub assertion_names: Vec<String>,
    /// Resolve relative import specifiers against the file's directory.
    pub rewrite_imports: bool,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        InstrumentConfig {
            assertion_names: DEFAULT_ASSERTION_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            rewrite_imports: true,
        }
    }
}

impl InstrumentConfig {
    pub fn is_assertion(&self, name: &str) -> bool {
        self.assertion_names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn with_assertion_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assertion_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_rewrite_imports(mut self, rewrite: bool) -> Self {
        self.rewrite_imports = rewrite;
        self
    }
}
