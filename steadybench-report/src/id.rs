//! Benchmark Identity

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Rejected benchmark identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Group id was empty or whitespace
    #[error("benchmark group id must be a non-empty string")]
    EmptyGroup,
    /// Function id was empty or whitespace
    #[error("benchmark function id must be a non-empty string")]
    EmptyFunction,
}

/// `group_id/function_id` pair naming one benchmark
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BenchmarkId {
    group_id: String,
    function_id: String,
}

impl BenchmarkId {
    /// Validate and build an identity
    pub fn new(
        group_id: impl Into<String>,
        function_id: impl Into<String>,
    ) -> Result<Self, IdError> {
        let group_id = group_id.into();
        let function_id = function_id.into();

        if group_id.trim().is_empty() {
            return Err(IdError::EmptyGroup);
        }
        if function_id.trim().is_empty() {
            return Err(IdError::EmptyFunction);
        }

        Ok(Self {
            group_id,
            function_id,
        })
    }

    /// Group this benchmark belongs to
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Function within the group
    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    /// Display title, `group_id/function_id`
    pub fn title(&self) -> String {
        format!("{}/{}", self.group_id, self.function_id)
    }
}

impl fmt::Display for BenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.function_id)
    }
}

// Ordered by title so sorting matches the displayed names
impl Ord for BenchmarkId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group_id
            .bytes()
            .chain(std::iter::once(b'/'))
            .chain(self.function_id.bytes())
            .cmp(
                other
                    .group_id
                    .bytes()
                    .chain(std::iter::once(b'/'))
                    .chain(other.function_id.bytes()),
            )
            // "a/b" + "c" and "a" + "b/c" share a title
            .then_with(|| self.group_id.cmp(&other.group_id))
    }
}

impl PartialOrd for BenchmarkId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
