//! TOML build graph files.

#![allow(missing_docs)]

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::debug::VariableOrigin;
use crate::error::ConfigError;

use super::graph::{BuildGraph, TargetRule, Variable};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphToml {
    #[serde(default)]
    variables: IndexMap<String, String>,
    #[serde(default)]
    targets: IndexMap<String, TargetSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TargetSection {
    prerequisites: Vec<String>,
    recipe: Vec<String>,
    variables: IndexMap<String, String>,
    fails: bool,
}

impl BuildGraph {
    /// Parse a graph from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut graph = Self::new();
        graph.read_toml_str(text)?;
        Ok(graph)
    }

    /// Merge a graph file into this graph. Later definitions replace earlier ones.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_toml_str(&text)
    }

    pub fn read_toml_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let raw: GraphToml = toml::from_str(text)?;
        for (name, value) in raw.variables {
            self.set_variable(name, value);
        }
        for (name, section) in raw.targets {
            let rule = TargetRule {
                prerequisites: section.prerequisites.into_iter().map(Into::into).collect(),
                recipe: section.recipe,
                variables: section
                    .variables
                    .into_iter()
                    .map(|(name, value)| {
                        let variable = Variable {
                            value,
                            origin: VariableOrigin::File,
                        };
                        (name.into(), variable)
                    })
                    .collect(),
                fails: section.fails,
            };
            self.add_target(name, rule);
        }
        Ok(())
    }
}
