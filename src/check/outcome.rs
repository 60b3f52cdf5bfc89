//! Ordered check results for one value.

use serde::{Deserialize, Serialize};

/// The outcome of a single named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name (e.g., "required", "length")
    pub name: String,
    /// Whether the value satisfied the check
    pub passed: bool,
}

impl CheckResult {
    /// Create a result
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
        }
    }

    /// Create a passing result
    pub fn pass(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Create a failing result
    pub fn fail(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }
}

/// Check results in evaluation-priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckList {
    results: Vec<CheckResult>,
}

impl CheckList {
    /// Create an empty list
    pub fn new() -> Self {
        Self { results: Vec::new() }
    }

    /// Append a result; later entries have lower priority
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Append a result (builder pattern)
    pub fn with(mut self, name: impl Into<String>, passed: bool) -> Self {
        self.push(CheckResult::new(name, passed));
        self
    }

    /// Name of the first failing check, in order
    pub fn first_failure(&self) -> Option<&str> {
        self.results.iter().find(|r| !r.passed).map(|r| r.name.as_str())
    }

    /// Names of every failing check, in order
    pub fn failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Whether every check passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Get the results as a slice
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Iterate over the results in order
    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    /// Get the number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl FromIterator<CheckResult> for CheckList {
    fn from_iter<I: IntoIterator<Item = CheckResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
