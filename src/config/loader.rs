// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BUILD_COMMAND, DEFAULT_MAKEFILE, SETTINGS_FILE_NAMES, TARGET_ENV_VAR,
};
use crate::enumerator::{EnumerateOptions, KeyPolicy};
use crate::errors::{FailureStrategy, SettingsError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Project settings for hlgen.
///
/// Settings are optional: a project without a settings file uses the
/// defaults below. The file is typically `hlgen.yaml` next to the Makefile.
///
/// # Fields
/// * `default_target` - Target for configurations without `target=` (overridden by `HL_TARGET`)
/// * `policy` - `strict` (default) or `lenient` handling of malformed bindings
/// * `makefile` - Makefile holding the bindings, relative to the project directory
/// * `generator_dir` - Directory scanned for `*.gen.cpp`; no discovery when unset
/// * `build` - Build stage options
///
/// # Example
/// ```yaml
/// default_target: x86-64-linux
/// policy: strict
/// makefile: Makefile
/// generator_dir: .
/// build:
///   command: "make {artifact} HL_TARGET={target} GENERATOR_ARGS={params}"
///   max_concurrency: 4
///   failure_strategy: continue_on_error
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub default_target: Option<String>,
    #[serde(default)]
    pub policy: KeyPolicy,
    #[serde(default = "default_makefile")]
    pub makefile: PathBuf,
    #[serde(default)]
    pub generator_dir: Option<PathBuf>,
    #[serde(default)]
    pub build: BuildSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_target: None,
            policy: KeyPolicy::default(),
            makefile: default_makefile(),
            generator_dir: None,
            build: BuildSettings::default(),
        }
    }
}

/// Build stage options.
///
/// # Fields
/// * `command` - Command template run once per configuration (optional)
/// * `max_concurrency` - Concurrent builds; defaults to the number of CPUs
/// * `failure_strategy` - `fail_fast` (default) or `continue_on_error`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BuildSettings {
    pub command: Option<String>,
    pub max_concurrency: Option<usize>,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
}

impl BuildSettings {
    /// The configured command template, or the built-in `make` invocation.
    pub fn command_template(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_BUILD_COMMAND)
    }

    /// The configured concurrency, falling back to the available parallelism.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}

impl Settings {
    /// Apply environment overrides from `vars` (currently only `HL_TARGET`).
    pub fn with_env_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if key == TARGET_ENV_VAR && !value.trim().is_empty() {
                self.default_target = Some(value.trim().to_string());
            }
        }
        self
    }

    /// Enumeration options derived from these settings.
    pub fn enumerate_options(&self, known_generators: Option<Vec<String>>) -> EnumerateOptions {
        EnumerateOptions {
            default_target: self.default_target.clone(),
            policy: self.policy,
            known_generators,
        }
    }
}

fn default_makefile() -> PathBuf {
    PathBuf::from(DEFAULT_MAKEFILE)
}

/// Load settings from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(SettingsError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load `explicit` if given, otherwise the first settings file found in
/// `project_dir`, otherwise the defaults.
pub fn load_project_settings(
    explicit: Option<&Path>,
    project_dir: &Path,
) -> Result<Settings, SettingsError> {
    if let Some(path) = explicit {
        return load_settings(path);
    }
    SETTINGS_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(load_settings)
        .unwrap_or_else(|| Ok(Settings::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_settings() {
        let yaml = r#"
default_target: x86-64-linux
policy: lenient
generator_dir: gens
build:
  command: "echo {artifact}"
  max_concurrency: 2
  failure_strategy: continue_on_error
"#;

        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.default_target.as_deref(), Some("x86-64-linux"));
        assert_eq!(settings.policy, KeyPolicy::Lenient);
        assert_eq!(settings.makefile, PathBuf::from("Makefile"));
        assert_eq!(settings.generator_dir, Some(PathBuf::from("gens")));
        assert_eq!(settings.build.command_template(), "echo {artifact}");
        assert_eq!(settings.build.max_concurrency(), 2);
        assert_eq!(
            settings.build.failure_strategy,
            FailureStrategy::ContinueOnError
        );
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.policy, KeyPolicy::Strict);
        assert_eq!(settings.build.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(settings.build.command_template(), DEFAULT_BUILD_COMMAND);
        assert!(settings.build.max_concurrency() >= 1);
    }

    #[test]
    fn test_toml_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hlgen.toml");
        std::fs::write(
            &path,
            "default_target = \"host\"\nmakefile = \"build.mk\"\n\n[build]\nmax_concurrency = 3\n",
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.default_target.as_deref(), Some("host"));
        assert_eq!(settings.makefile, PathBuf::from("build.mk"));
        assert_eq!(settings.build.max_concurrency, Some(3));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hlgen.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("policy: sloppy");
        assert!(result.is_err());
    }

    #[test]
    fn test_project_settings_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_project_settings(None, dir.path()).unwrap(),
            Settings::default()
        );

        std::fs::write(dir.path().join("hlgen.yml"), "default_target: arm-64-linux\n").unwrap();
        let settings = load_project_settings(None, dir.path()).unwrap();
        assert_eq!(settings.default_target.as_deref(), Some("arm-64-linux"));
    }

    #[test]
    fn test_env_override_of_default_target() {
        let settings = Settings {
            default_target: Some("host".to_string()),
            ..Settings::default()
        }
        .with_env_overrides(vec![
            ("PATH".to_string(), "/bin".to_string()),
            ("HL_TARGET".to_string(), " wasm-32-wasmrt ".to_string()),
        ]);
        assert_eq!(settings.default_target.as_deref(), Some("wasm-32-wasmrt"));

        let untouched = Settings::default()
            .with_env_overrides(vec![("HL_TARGET".to_string(), "  ".to_string())]);
        assert_eq!(untouched.default_target, None);
    }

    #[test]
    fn test_enumerate_options_from_settings() {
        let settings = Settings {
            default_target: Some("host".to_string()),
            policy: KeyPolicy::Lenient,
            ..Settings::default()
        };
        let options = settings.enumerate_options(Some(vec!["blur".to_string()]));
        assert_eq!(options.default_target.as_deref(), Some("host"));
        assert_eq!(options.policy, KeyPolicy::Lenient);
        assert_eq!(options.known_generators, Some(vec!["blur".to_string()]));
    }
}
