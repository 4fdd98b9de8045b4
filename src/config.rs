use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_NEIGHBORHOOD_SIZE, DEFAULT_PENALTY_SCALING};

/// Tunable constants for the `CostEvaluator`.
///
/// The search core is otherwise parameter-free: everything it does beyond
/// these knobs follows directly from the solution it is handed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Number of nearest non-depot nodes kept per node (`K` in spec).
    pub neighborhood_size: usize,

    /// Scaling factor applied to `baseline_cost` when penalizing an edge.
    pub penalty_scaling: f64,
}

impl Config {
    pub fn default() -> Self {
        Self {
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            penalty_scaling: DEFAULT_PENALTY_SCALING,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn read_yaml_file(filepath: &str) -> Value {
        let file = File::open(filepath).unwrap_or_else(|_| panic!("Cannot open file {}", filepath));
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .unwrap_or_else(|_| panic!("Failed to read file {}", filepath))
    }

    pub fn load_yaml_file(filepath: &str) -> Self {
        let mut config = Self::default();
        config.patch(&Self::read_yaml_file(filepath));
        config
    }

    pub fn patch_from_yaml_file(&mut self, filepath: &str) {
        self.patch(&Self::read_yaml_file(filepath));
    }

    pub fn patch(&mut self, values: &Value) {
        let mut config: Value = serde_json::to_value(&self).expect("Failed to serialize config");
        match values {
            Value::Object(values_map) => {
                for (key, value) in values_map.iter() {
                    let root_key = format!("/{}", key);
                    if let Some(config_value) = config.pointer_mut(&root_key) {
                        *config_value = value.clone();
                    }
                }
            }
            _ => panic!("Cannot patch Config as JSON is not an Object"),
        }
        *self = serde_json::from_value(config).expect("Failed to deserialize patched config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_spec_constants() {
        let config = Config::default();
        assert_eq!(config.neighborhood_size, DEFAULT_NEIGHBORHOOD_SIZE);
        assert_eq!(config.penalty_scaling, DEFAULT_PENALTY_SCALING);
    }

    #[test]
    fn patch_overrides_single_field() {
        let mut config = Config::default();
        let patch: Value = serde_json::from_str(r#"{"neighborhood_size": 10}"#).unwrap();
        config.patch(&patch);
        assert_eq!(config.neighborhood_size, 10);
        assert_eq!(config.penalty_scaling, DEFAULT_PENALTY_SCALING);
    }
}
