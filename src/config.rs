//! Per-run configuration: boundary-input overrides from a JSON file and from
//! `name=value` assignments.
use crate::assembly::Assembly;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid run configuration '{path}': {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("expected NAME=VALUE, got '{0}'")]
    Assignment(String),
    #[error("'{name}': '{value}' is not a number")]
    NotANumber { name: String, value: String },
    #[error("configuration is for system '{found}', not '{expected}'")]
    SystemMismatch { expected: String, found: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, f64>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }

    /// Fails if the file names a different system than `system`.
    pub fn check_system(&self, system: &str) -> Result<(), ConfigError> {
        match &self.system {
            Some(found) if found != system => {
                Err(ConfigError::SystemMismatch { expected: system.to_string(), found: found.clone() })
            }
            _ => Ok(()),
        }
    }

    /// Merges `name=value` assignments over the file inputs.
    pub fn with_assignments<S: AsRef<str>>(mut self, assignments: &[S]) -> Result<Self, ConfigError> {
        for a in assignments {
            let (name, value) = parse_assignment(a.as_ref())?;
            self.inputs.insert(name, value);
        }
        Ok(self)
    }

    /// Sets every override on `assembly`. All names and values are checked
    /// first; on error the assembly is left untouched.
    pub fn apply(&self, assembly: &mut Assembly) -> Result<(), ConfigError> {
        for (name, value) in &self.inputs {
            if assembly.input(name).is_none() {
                return Err(EngineError::UnknownInput(name.clone()).into());
            }
            if !value.is_finite() {
                return Err(EngineError::InvalidInput { name: name.clone(), value: *value }.into());
            }
        }
        for (name, value) in &self.inputs {
            assembly.set_input(name, *value)?;
            log::debug!("{}: {} = {}", assembly.name(), name, value);
        }
        Ok(())
    }
}

pub fn parse_assignment(s: &str) -> Result<(String, f64), ConfigError> {
    let (name, value) = s.split_once('=').ok_or_else(|| ConfigError::Assignment(s.to_string()))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() {
        return Err(ConfigError::Assignment(s.to_string()));
    }
    let parsed: f64 = value
        .parse()
        .map_err(|_| ConfigError::NotANumber { name: name.to_string(), value: value.to_string() })?;
    Ok((name.to_string(), parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::Pod;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("n_rows=16", "n_rows", 16.0)]
    #[case(" speed_max = 250.5 ", "speed_max", 250.5)]
    #[case("Ps_tube=1e2", "Ps_tube", 100.0)]
    fn test_parse_assignment(#[case] input: &str, #[case] name: &str, #[case] value: f64) {
        assert_eq!(parse_assignment(input).unwrap(), (name.to_string(), value));
    }

    #[rstest]
    #[case("n_rows")]
    #[case("=3")]
    fn test_parse_assignment_syntax(#[case] input: &str) {
        assert!(matches!(parse_assignment(input), Err(ConfigError::Assignment(_))));
    }

    #[test]
    fn test_parse_assignment_not_a_number() {
        assert!(matches!(parse_assignment("n_rows=many"), Err(ConfigError::NotANumber { .. })));
    }

    #[test]
    fn test_load_and_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"system": "pod", "inputs": {{"n_rows": 16, "speed_max": 200}}}}"#).unwrap();

        let cfg = RunConfig::from_file(file.path()).unwrap().with_assignments(&["n_rows=18"]).unwrap();
        cfg.check_system("pod").unwrap();
        assert!(matches!(cfg.check_system("heat_exchanger"), Err(ConfigError::SystemMismatch { .. })));
        assert_eq!(cfg.inputs["n_rows"], 18.0);

        let mut asm = Assembly::configure(&Pod).unwrap();
        cfg.apply(&mut asm).unwrap();
        assert_eq!(asm.input("n_rows"), Some(18.0));
        assert_eq!(asm.input("speed_max"), Some(200.0));
    }

    #[test]
    fn test_unknown_input_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"inputs": {"warp_factor": 9}}"#).unwrap();
        let cfg = RunConfig::from_file(&path).unwrap();
        assert!(cfg.system.is_none());

        let mut asm = Assembly::configure(&Pod).unwrap();
        assert!(matches!(cfg.apply(&mut asm), Err(ConfigError::Engine(EngineError::UnknownInput(_)))));
    }

    #[test]
    fn test_rejected_config_leaves_assembly_untouched() {
        let mut asm = Assembly::configure(&Pod).unwrap();

        // "n_rows" sorts before the unknown name and before the bad value.
        let unknown = RunConfig::default().with_assignments(&["n_rows=16", "zeta=1"]).unwrap();
        assert!(matches!(unknown.apply(&mut asm), Err(ConfigError::Engine(EngineError::UnknownInput(_)))));
        assert_eq!(asm.input("n_rows"), Some(14.0));

        let infinite = RunConfig::default().with_assignments(&["n_rows=16", "speed_max=inf"]).unwrap();
        assert!(matches!(infinite.apply(&mut asm), Err(ConfigError::Engine(EngineError::InvalidInput { .. }))));
        assert_eq!(asm.input("n_rows"), Some(14.0));
    }

    #[test]
    fn test_malformed_and_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"inputs\": [1, 2]}}").unwrap();
        assert!(matches!(RunConfig::from_file(file.path()), Err(ConfigError::Json { .. })));
        assert!(matches!(
            RunConfig::from_file(Path::new("/nonexistent/run.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
