//! Instance filters for the primary and canary subsets.
//!
//! Both subsets are derived from the same primary-name pattern: the
//! primary subset selects instances whose ID starts with
//! `<primary>-`, the canary subset selects everything else. Building
//! both from [`instance_pattern`] keeps the two filters complementary.

use regex::Regex;

/// Subset name for the stable workload.
pub const PRIMARY_SUBSET: &str = "primary";
/// Subset name for the experimental workload.
pub const CANARY_SUBSET: &str = "canary";

/// A filter over mesh instance IDs, expressed in the mesh's filter
/// language as `Service.ID [not] matches "<pattern>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetFilter {
    pattern: String,
    negated: bool,
}

/// Pattern matching instance IDs of the workload named `primary_name`.
fn instance_pattern(primary_name: &str) -> String {
    format!("{primary_name}-.+")
}

impl SubsetFilter {
    /// Filter selecting instances of the primary workload.
    pub fn primary(primary_name: &str) -> Self {
        Self {
            pattern: instance_pattern(primary_name),
            negated: false,
        }
    }

    /// Filter selecting every instance that is not a primary instance.
    pub fn canary(primary_name: &str) -> Self {
        Self {
            pattern: instance_pattern(primary_name),
            negated: true,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Filter expression in the mesh's filter language.
    pub fn expression(&self) -> String {
        let op = if self.negated { "not matches" } else { "matches" };
        format!("Service.ID {op} \"{}\"", self.pattern)
    }

    /// Evaluate the filter against an instance ID the way the mesh does
    /// (unanchored regular-expression match).
    pub fn matches(&self, instance_id: &str) -> Result<bool, regex::Error> {
        let re = Regex::new(&self.pattern)?;
        Ok(re.is_match(instance_id) != self.negated)
    }
}
