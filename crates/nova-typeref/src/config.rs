use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::minimal_jdk::FUNCTIONS_PREFIX;

/// Knobs for a single analysis pass.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Treat unknown or missing type information as conformant.
    ///
    /// Partial analyses (content assist, incremental re-checks) want this so that one broken
    /// expression doesn't cascade into false negatives. Final resolution passes may turn it off.
    pub permissive_unknown: bool,

    /// Let the last parameter of a variable-arity operation accept the remaining arguments.
    pub variable_arity: bool,

    /// Qualified-name prefix identifying structural function types (`FunctionN<P.., R>`).
    pub function_type_prefix: String,

    /// Recursion limit for conformance checks.
    #[schemars(range(min = 1))]
    pub max_depth: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            permissive_unknown: true,
            variable_arity: false,
            function_type_prefix: FUNCTIONS_PREFIX.to_string(),
            max_depth: 64,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// JSON schema of [`AnalysisConfig`], for editor integration.
pub fn json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(AnalysisConfig)
}
