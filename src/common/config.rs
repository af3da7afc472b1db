//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Interpreter command prefixes, keyed by tested file extension
    #[serde(default)]
    pub interpreters: HashMap<String, Vec<String>>,
}

/// Default settings
#[derive(Debug, Deserialize)]
pub struct Defaults {
    /// Name of the file holding the code under test
    #[serde(default = "default_tested_file")]
    pub tested_file: String,

    /// Name of the file holding the tests
    #[serde(default = "default_tests_file")]
    pub tests_file: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            tested_file: default_tested_file(),
            tests_file: default_tests_file(),
        }
    }
}

fn default_tested_file() -> String {
    "student.py".to_string()
}

fn default_tests_file() -> String {
    "tests.yaml".to_string()
}

/// Interpreters used when neither the tests file nor the config names one
const BUILTIN_INTERPRETERS: &[(&str, &str)] =
    &[("py", "python3"), ("rb", "ruby"), ("js", "node"), ("sh", "sh")];

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, &e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Get the interpreter command prefix for a tested file
    ///
    /// Explicit configuration wins over the built-in table. `None` means
    /// the tested file is executed directly.
    pub fn interpreter_for(&self, tested_file: &Path) -> Option<Vec<String>> {
        let ext = tested_file.extension()?.to_str()?;

        if let Some(command) = self.interpreters.get(ext) {
            return Some(command.clone());
        }

        BUILTIN_INTERPRETERS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, program)| vec![program.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.defaults.tested_file, "student.py");
        assert_eq!(config.defaults.tests_file, "tests.yaml");
        assert!(config.interpreters.is_empty());
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
[defaults]
tested_file = "solution.rb"

[interpreters]
py = ["python3", "-B"]
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.tested_file, "solution.rb");
        assert_eq!(config.defaults.tests_file, "tests.yaml");
        assert_eq!(
            config.interpreter_for(Path::new("student.py")),
            Some(vec!["python3".to_string(), "-B".to_string()])
        );
    }

    #[test]
    fn test_builtin_interpreters() {
        let config = Config::default();
        assert_eq!(
            config.interpreter_for(Path::new("student.sh")),
            Some(vec!["sh".to_string()])
        );
        assert_eq!(config.interpreter_for(Path::new("student")), None);
        assert_eq!(config.interpreter_for(Path::new("student.exe")), None);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::parse("[defaults\n").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }
}
