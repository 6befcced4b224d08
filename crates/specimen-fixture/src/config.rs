//! Fixture configuration

use serde::{Deserialize, Serialize};
use specimen_builders::{RecursionPolicy, DEFAULT_RECURSION_DEPTH, DEFAULT_REPEAT_COUNT};
use specimen_kernel::FixtureError;

/// How the engine produces numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericGeneration {
    /// Per-type counters starting at 1
    #[default]
    Sequential,
    /// Unique random draws from widening ranges
    RandomUnique,
}

/// Fixture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Items produced for `Multiple` requests and `create_many`
    pub repeat_count: usize,
    /// Policy applied to cyclic requests
    pub recursion_policy: RecursionPolicy,
    /// Occurrences of a request allowed on the path before it counts as a cycle
    pub recursion_depth: usize,
    /// Skip member population for every type
    pub omit_auto_properties: bool,
    /// Fail when a member cannot be resolved instead of skipping it
    pub strict_members: bool,
    /// Number generation mode
    pub numeric_generation: NumericGeneration,
}

impl FixtureConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With repeat count
    #[inline]
    #[must_use]
    pub fn with_repeat_count(mut self, count: usize) -> Self {
        self.repeat_count = count;
        self
    }

    /// With recursion policy
    #[inline]
    #[must_use]
    pub fn with_recursion_policy(mut self, policy: RecursionPolicy) -> Self {
        self.recursion_policy = policy;
        self
    }

    /// With recursion depth
    #[inline]
    #[must_use]
    pub fn with_recursion_depth(mut self, depth: usize) -> Self {
        self.recursion_depth = depth;
        self
    }

    /// With auto-properties disabled
    #[inline]
    #[must_use]
    pub fn with_omit_auto_properties(mut self, omit: bool) -> Self {
        self.omit_auto_properties = omit;
        self
    }

    /// With strict member population
    #[inline]
    #[must_use]
    pub fn with_strict_members(mut self, strict: bool) -> Self {
        self.strict_members = strict;
        self
    }

    /// With numeric generation mode
    #[inline]
    #[must_use]
    pub fn with_numeric_generation(mut self, mode: NumericGeneration) -> Self {
        self.numeric_generation = mode;
        self
    }

    /// Check settings for contradictions
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] for a zero repeat count
    /// or recursion depth.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.repeat_count == 0 {
            return Err(FixtureError::invalid_configuration(
                "repeat_count must be at least 1",
            ));
        }
        if self.recursion_depth == 0 {
            return Err(FixtureError::invalid_configuration(
                "recursion_depth must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document; missing keys take their defaults
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] for malformed TOML or
    /// settings rejected by [`Self::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, FixtureError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| FixtureError::invalid_configuration(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT_COUNT,
            recursion_policy: RecursionPolicy::Throw,
            recursion_depth: DEFAULT_RECURSION_DEPTH,
            omit_auto_properties: false,
            strict_members: false,
            numeric_generation: NumericGeneration::Sequential,
        }
    }
}
