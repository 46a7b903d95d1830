//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::extract::DEFAULT_MARKER_COLOR;
use crate::infra::archive::BODY_PART;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".docxmark/config.toml";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Config {
    pub extract: Extract,
    pub staging: Staging,
    pub templates: Vec<TemplateEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extract {
    pub marker_color: String,
    pub body_part: String,
}

impl Default for Extract {
    fn default() -> Self {
        Self {
            marker_color: DEFAULT_MARKER_COLOR.to_owned(),
            body_part: BODY_PART.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Staging {
    pub upload_dir: PathBuf,
    pub template_dir: PathBuf,
}

impl Default for Staging {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            template_dir: PathBuf::from("templates"),
        }
    }
}

/// One row of the source-name to canonical-name mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub id: String,
    pub name: String,
    pub source: String,
    pub target: String,
}

/// One config file as written. Unset keys stay `None` so they never mask a lower layer.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    extract: ExtractLayer,
    #[serde(default)]
    staging: StagingLayer,
    #[serde(default)]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractLayer {
    marker_color: Option<String>,
    body_part: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StagingLayer {
    upload_dir: Option<PathBuf>,
    template_dir: Option<PathBuf>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    marker_color: Option<String>,
    upload_dir: Option<PathBuf>,
    template_dir: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            marker_color: env::var("DOCXMARK_MARKER_COLOR").ok(),
            upload_dir: env::var_os("DOCXMARK_UPLOAD_DIR").map(PathBuf::from),
            template_dir: env::var_os("DOCXMARK_TEMPLATE_DIR").map(PathBuf::from),
        }
    }

    #[cfg(test)]
    fn for_tests(marker_color: &str, template_dir: &str) -> Self {
        Self {
            marker_color: Some(marker_color.to_owned()),
            upload_dir: None,
            template_dir: Some(PathBuf::from(template_dir)),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config,
    /// an optional explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, explicit.map(Path::to_path_buf), env)
    }

    /// Configuration built from the embedded defaults only.
    pub fn defaults() -> Result<Self> {
        Ok(Self::default().overlay(ConfigLayer::from_str(&DEFAULT_CONFIG)?))
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<ConfigLayer> = Vec::new();

        layers.push(ConfigLayer::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&workspace_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(ConfigLayer::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().fold(Config::default(), Config::overlay);
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn overlay(mut self, layer: ConfigLayer) -> Self {
        if let Some(color) = layer.extract.marker_color {
            self.extract.marker_color = color;
        }
        if let Some(part) = layer.extract.body_part {
            self.extract.body_part = part;
        }
        if let Some(dir) = layer.staging.upload_dir {
            self.staging.upload_dir = dir;
        }
        if let Some(dir) = layer.staging.template_dir {
            self.staging.template_dir = dir;
        }
        self.templates = merge_templates(self.templates, layer.templates);
        self
    }
}

/// Overlay entries replace base entries with the same source name; new ones are appended.
fn merge_templates(mut base: Vec<TemplateEntry>, overlay: Vec<TemplateEntry>) -> Vec<TemplateEntry> {
    for entry in overlay {
        match base.iter_mut().find(|existing| existing.source == entry.source) {
            Some(existing) => *existing = entry,
            None => base.push(entry),
        }
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("docxmark/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(color) = env.marker_color {
        config.extract.marker_color = color;
    }
    if let Some(dir) = env.upload_dir {
        config.staging.upload_dir = dir;
    }
    if let Some(dir) = env.template_dir {
        config.staging.template_dir = dir;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.extract.marker_color, "yellow");
        assert_eq!(config.extract.body_part, "word/document.xml");
        assert_eq!(config.staging.template_dir, PathBuf::from("templates"));
        assert!(
            config
                .templates
                .iter()
                .any(|entry| entry.source == "Annual_Update.docx" && entry.id == "annual_update")
        );
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[extract]
marker_color = "cyan"
[staging]
upload_dir = "/srv/uploads"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".docxmark"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".docxmark/config.toml"),
            r#"
[staging]
template_dir = "server/templates"

[[templates]]
id = "annual_update_v2"
name = "Annual Update"
source = "Annual_Update.docx"
target = "annual_update_v2.docx"

[[templates]]
id = "fee_letter"
name = "Fee Letter"
source = "Fee_Letter.docx"
target = "fee_letter.docx"
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".docxmark/config.toml"));

        let config = Config::load_with_layers(
            global_path,
            workspace_path,
            None,
            EnvOverrides::default(),
        )?;

        assert_eq!(config.extract.marker_color, "cyan");
        assert_eq!(config.staging.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.staging.template_dir, PathBuf::from("server/templates"));

        let annual: Vec<_> = config
            .templates
            .iter()
            .filter(|entry| entry.source == "Annual_Update.docx")
            .collect();
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].target, "annual_update_v2.docx");
        assert!(config.templates.iter().any(|entry| entry.id == "fee_letter"));
        Ok(())
    }

    #[test]
    fn explicit_file_must_exist() {
        let result = Config::load_with_layers(
            None,
            None,
            Some(PathBuf::from("/definitely/not/here.toml")),
            EnvOverrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("green", "/tmp/templates");
        let config = Config::load_with_layers(None, None, None, overrides)?;
        assert_eq!(config.extract.marker_color, "green");
        assert_eq!(config.staging.template_dir, PathBuf::from("/tmp/templates"));
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = ConfigLayer::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn later_layer_wins_even_with_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[extract]
marker_color = "cyan"
body_part = "word/header1.xml"
[staging]
upload_dir = "/srv/uploads"
template_dir = "/srv/templates"
"#,
        )?;
        let explicit = temp.path().join("explicit.toml");
        fs::write(
            &explicit,
            r#"
[extract]
marker_color = "yellow"
body_part = "word/document.xml"
[staging]
upload_dir = "uploads"
template_dir = "templates"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), None, Some(explicit), EnvOverrides::default())?;
        assert_eq!(config.extract, Extract::default());
        assert_eq!(config.staging, Staging::default());
        Ok(())
    }

    #[test]
    fn unset_keys_keep_lower_layer_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(&global, "[extract]\nmarker_color = \"cyan\"\n")?;
        let explicit = temp.path().join("explicit.toml");
        fs::write(&explicit, "[staging]\ntemplate_dir = \"out\"\n")?;

        let config =
            Config::load_with_layers(Some(global), None, Some(explicit), EnvOverrides::default())?;
        assert_eq!(config.extract.marker_color, "cyan");
        assert_eq!(config.staging.template_dir, PathBuf::from("out"));
        assert_eq!(config.staging.upload_dir, PathBuf::from("uploads"));
        Ok(())
    }
}
