use std::fs;
use std::path::{Component, Path, PathBuf};

use heck::ToLowerCamelCase;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "tsw.yaml";

/// Key holding a target inside `package.json`.
pub const PACKAGE_JSON_KEY: &str = "tsw";

/// Runtime config key the generated plugin reads axios settings from.
pub const RUNTIME_CONFIG_KEY: &str = "tsw";

pub const DEFAULT_PLUGIN_NAME: &str = "api";
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";
pub const DEFAULT_BASE_PATH: &str = "/v1";

/// How call-site arguments are arranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentForm {
    /// Path parameters are curried through the accessor tree.
    #[default]
    Default,
    /// Path parameters become `_param` keys and leading call arguments.
    Underscore,
}

/// When query/header/form parameters are bundled into one destructured
/// object argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupingThresholds {
    /// Default form: bundle when there are more than this many.
    pub bundle_above: usize,
    /// Underscore form: bundle when this many non-path, non-body
    /// parameters are present.
    pub underscore_bundle_at: usize,
}

impl Default for GroupingThresholds {
    fn default() -> Self {
        Self {
            bundle_above: 2,
            underscore_bundle_at: 5,
        }
    }
}

/// Everything one generation run needs besides the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub plugin_name: String,
    /// Accessor name, injected as `$<inject>`.
    pub inject: String,
    /// Prefix stripped from paths before building the accessor tree.
    pub base_path: String,
    pub skip_header: bool,
    pub form: ArgumentForm,
    /// Emit a per-plugin axios instance configured from runtime config.
    pub axios_config: bool,
    /// Module path the plugin imports definitions from.
    pub rel_type_path: String,
    pub thresholds: GroupingThresholds,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            inject: DEFAULT_PLUGIN_NAME.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            skip_header: false,
            form: ArgumentForm::Default,
            axios_config: false,
            rel_type_path: "./types".to_string(),
            thresholds: GroupingThresholds::default(),
        }
    }
}

/// One generation target as written in `tsw.yaml`, `package.json` or on
/// the command line. Unset fields fall back to the next source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub src: Option<String>,
    #[serde(alias = "pluginsDir")]
    pub plugins_dir: Option<String>,
    #[serde(alias = "pluginName")]
    pub plugin_name: Option<String>,
    pub inject: Option<String>,
    #[serde(alias = "typePath")]
    pub type_path: Option<String>,
    #[serde(alias = "basePath")]
    pub base_path: Option<String>,
    #[serde(alias = "skipHeader")]
    pub skip_header: Option<bool>,
    pub form: Option<ArgumentForm>,
    #[serde(alias = "axiosConfig")]
    pub axios_config: Option<bool>,
    pub thresholds: Option<GroupingThresholds>,
}

impl TargetConfig {
    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: &TargetConfig) -> TargetConfig {
        TargetConfig {
            src: self.src.or_else(|| fallback.src.clone()),
            plugins_dir: self.plugins_dir.or_else(|| fallback.plugins_dir.clone()),
            plugin_name: self.plugin_name.or_else(|| fallback.plugin_name.clone()),
            inject: self.inject.or_else(|| fallback.inject.clone()),
            type_path: self.type_path.or_else(|| fallback.type_path.clone()),
            base_path: self.base_path.or_else(|| fallback.base_path.clone()),
            skip_header: self.skip_header.or(fallback.skip_header),
            form: self.form.or(fallback.form),
            axios_config: self.axios_config.or(fallback.axios_config),
            thresholds: self.thresholds.or(fallback.thresholds),
        }
    }

    fn plugin_name_or_default(&self) -> &str {
        self.plugin_name.as_deref().unwrap_or(DEFAULT_PLUGIN_NAME)
    }

    /// Apply defaults. Fails only when no spec source is known.
    pub fn resolve(self) -> Result<ResolvedTarget, ConfigError> {
        let src = self
            .src
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSource)?;
        let plugins_dir = self
            .plugins_dir
            .unwrap_or_else(|| DEFAULT_PLUGINS_DIR.to_string());
        let plugin_name = self
            .plugin_name
            .unwrap_or_else(|| DEFAULT_PLUGIN_NAME.to_string());
        let inject = accessor_name(self.inject.as_deref().unwrap_or(&plugin_name));
        let type_path = self.type_path.map(PathBuf::from).unwrap_or_else(|| {
            Path::new(&plugins_dir).join(&plugin_name).join("types.ts")
        });
        Ok(ResolvedTarget {
            src,
            plugins_dir: PathBuf::from(plugins_dir),
            plugin_name,
            inject,
            type_path,
            base_path: self
                .base_path
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            skip_header: self.skip_header.unwrap_or(false),
            form: self.form.unwrap_or_default(),
            axios_config: self.axios_config.unwrap_or(false),
            thresholds: self.thresholds.unwrap_or_default(),
        })
    }
}

/// A target with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub src: String,
    pub plugins_dir: PathBuf,
    pub plugin_name: String,
    pub inject: String,
    pub type_path: PathBuf,
    pub base_path: String,
    pub skip_header: bool,
    pub form: ArgumentForm,
    pub axios_config: bool,
    pub thresholds: GroupingThresholds,
}

impl ResolvedTarget {
    fn types_beside_plugin(&self) -> bool {
        let plugin_dir = self.plugins_dir.join(&self.plugin_name);
        let type_dir = self.type_path.parent().unwrap_or(Path::new(""));
        normal_components(&plugin_dir) == normal_components(type_dir)
    }

    /// `<plugins_dir>/<name>/index.ts` when the types file lives in
    /// `<plugins_dir>/<name>/`, otherwise `<plugins_dir>/<name>.ts`.
    pub fn plugin_path(&self) -> PathBuf {
        if self.types_beside_plugin() {
            self.plugins_dir.join(&self.plugin_name).join("index.ts")
        } else {
            self.plugins_dir.join(format!("{}.ts", self.plugin_name))
        }
    }

    /// Import path of the types module as seen from the plugin file.
    pub fn rel_type_path(&self) -> String {
        let plugin_path = self.plugin_path();
        let from = plugin_path.parent().unwrap_or(Path::new(""));
        let relative = relative_path(from, &self.type_path);
        let relative = relative.strip_suffix(".ts").unwrap_or(&relative);
        if relative.starts_with('.') {
            relative.to_string()
        } else {
            format!("./{relative}")
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            plugin_name: self.plugin_name.clone(),
            inject: self.inject.clone(),
            base_path: self.base_path.clone(),
            skip_header: self.skip_header,
            form: self.form,
            axios_config: self.axios_config,
            rel_type_path: self.rel_type_path(),
            thresholds: self.thresholds,
        }
    }
}

/// Normalise an accessor name: leading non-letters dropped, lower camel case.
pub fn accessor_name(raw: &str) -> String {
    let trimmed = raw.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
    let name = trimmed.to_lower_camel_case();
    if name.is_empty() {
        DEFAULT_PLUGIN_NAME.to_string()
    } else {
        name
    }
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from = normal_components(from_dir);
    let to = normal_components(to);
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

/// Top-level config file: a list of generation targets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TswConfig {
    pub targets: Vec<TargetConfig>,
}

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<TswConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TswConfig =
        serde_yaml_ng::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(Some(config))
}

/// Read the `"tsw"` target from a `package.json`, if present.
pub fn load_package_target(path: &Path) -> Result<Option<TargetConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |e: serde_json::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let package: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
    match package.get(PACKAGE_JSON_KEY) {
        Some(value) => Ok(Some(
            serde_json::from_value(value.clone()).map_err(parse_error)?,
        )),
        None => Ok(None),
    }
}

/// Combine command-line, config-file and `package.json` targets.
///
/// Command-line values win over config-file values, which win over
/// `package.json`. When the command line names a plugin or a source, only
/// targets for that plugin are kept. Targets are unique by plugin name.
pub fn merge_targets(
    cli: &TargetConfig,
    file_targets: &[TargetConfig],
    package: Option<&TargetConfig>,
) -> Vec<TargetConfig> {
    let cli_selects = cli.plugin_name.is_some() || cli.src.is_some();
    let mut candidates: Vec<TargetConfig> = file_targets.to_vec();
    candidates.extend(package.cloned());
    if candidates.is_empty() || cli_selects {
        candidates.push(cli.clone());
    }
    if cli_selects {
        let wanted = cli.plugin_name_or_default();
        candidates.retain(|c| c.plugin_name_or_default() == wanted);
    }

    let fallback = package.cloned().unwrap_or_default();
    let mut merged: Vec<TargetConfig> = Vec::new();
    for candidate in candidates {
        let target = cli.clone().or(&candidate).or(&fallback);
        let name = target.plugin_name_or_default();
        if merged.iter().all(|m| m.plugin_name_or_default() != name) {
            merged.push(target);
        }
    }
    merged
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# tsw configuration
targets:
  - src: https://petstore.swagger.io/v2/swagger.json
    plugins_dir: plugins
    plugin_name: api
    # inject: api                 # accessor name, defaults to plugin_name
    # type_path: plugins/api/types.ts
    base_path: /v1              # stripped before building the accessor tree
    skip_header: false
    form: default               # default | underscore
    axios_config: false         # per-plugin axios instance from runtime config
    # thresholds:
    #   bundle_above: 2
    #   underscore_bundle_at: 5
"#
}
