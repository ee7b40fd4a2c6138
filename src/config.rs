//! The `muter.conf.json` project configuration.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::{MuterError, Result};
use crate::operators::{DiscoveryPolicy, MutationOperatorKind};

pub const CONFIG_FILE_NAME: &str = "muter.conf.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Program that runs the test suite.
    pub executable: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Paths containing any of these entries are never mutated.
    #[serde(default)]
    pub exclude_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Operators to apply. All of them when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<MutationOperatorKind>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub operator_policies: BTreeMap<MutationOperatorKind, DiscoveryPolicy>,
}

impl Configuration {
    /// Read `muter.conf.json` from `directory`.
    pub fn load(directory: &Utf8Path) -> Result<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Err(MuterError::ConfigurationMissing);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| MuterError::Configuration {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| MuterError::Configuration {
            path,
            reason: e.to_string(),
        })
    }

    /// The placeholder configuration written by `muter init`.
    pub fn template() -> Self {
        Self {
            executable: "absolute path to the executable that runs your tests".to_string(),
            arguments: vec![
                "an argument the test runner needs".to_string(),
                "another argument the test runner needs".to_string(),
            ],
            exclude_list: Vec::new(),
            timeout_secs: None,
            operators: None,
            operator_policies: BTreeMap::new(),
        }
    }

    /// Pretty-printed JSON with keys in sorted order.
    pub fn to_pretty_json(&self) -> Result<String> {
        // Round-tripping through `Value` sorts object keys.
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    pub fn enabled_operators(&self) -> Vec<MutationOperatorKind> {
        match &self.operators {
            Some(operators) => MutationOperatorKind::ALL
                .into_iter()
                .filter(|operator| operators.contains(operator))
                .collect(),
            None => MutationOperatorKind::ALL.to_vec(),
        }
    }

    pub fn policy_for(&self, operator: MutationOperatorKind) -> DiscoveryPolicy {
        self.operator_policies
            .get(&operator)
            .copied()
            .unwrap_or_else(|| operator.default_policy())
    }
}
