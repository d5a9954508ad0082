//! CLI configuration.
//!
//! The first of these wins: the `--config` path, `.llmux/llmux.toml`
//! under the working directory, then `llmux/llmux.toml` in the user
//! config directory. When none exists the user config is written from
//! [`DEFAULT_CONFIG`].

use anyhow::{Context, Result, bail};
use llm::ToolDescriptor;
use provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config template generated when no config exists.
pub const DEFAULT_CONFIG: &str = r#"# The first provider is used unless --provider names another.

[[providers]]
name = "openai"
backend = "openai"
model = "gpt-4o-mini"
api_key = "${OPENAI_API_KEY}"

[[providers]]
name = "gemini"
backend = "gemini"
model = "gemini-2.0-flash"
api_key = "${GEMINI_API_KEY}"

[[providers]]
name = "ollama"
backend = "local"
model = "llama3.2"
# extra = "temperature=0.2"
# timeout_secs = 1800

# [[tools]]
# name = "Colour Scheme"
# internal_name = "colour-scheme"
# output_filename = "colorscheme.json"
# schema = '''
# // Colour Scheme
# { "name": "ColorSchemeTool", "description": "...", "input_schema": { "type": "object" } }
# '''
"#;

/// Parsed llmux.toml.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Configured providers, first one is the default.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Tools that can be forced with `--tool`.
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

impl CliConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Locate and load the active config, writing the default one first
    /// when nothing is found.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        let user = user_config_path();
        let source = ConfigSource::locate(flag.map(Path::new), Path::new("."), &user);
        if let ConfigSource::Generated(path) = &source {
            Self::write_default(path)?;
            tracing::info!("generated default config at {}", path.display());
        }
        tracing::debug!("using {source:?}");
        Self::load(source.path())
    }

    /// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        std::fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The provider named `name`, or the first one when no name is given.
    pub fn provider(&self, name: Option<&str>) -> Result<&ProviderConfig> {
        match name {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name == name)
                .with_context(|| format!("no provider named {name}")),
            None => match self.providers.first() {
                Some(provider) => Ok(provider),
                None => bail!("no providers configured"),
            },
        }
    }
}

/// Where the active config lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `--config`
    Flag(PathBuf),
    /// `.llmux/llmux.toml` under the working directory
    Workspace(PathBuf),
    /// The user config
    User(PathBuf),
    /// Nothing found, the default belongs at the user path
    Generated(PathBuf),
}

impl ConfigSource {
    /// Pick the source for a flag, a working directory and the user path.
    pub fn locate(flag: Option<&Path>, cwd: &Path, user: &Path) -> Self {
        if let Some(path) = flag {
            return Self::Flag(path.to_owned());
        }
        let workspace = cwd.join(".llmux").join("llmux.toml");
        if workspace.exists() {
            Self::Workspace(workspace)
        } else if user.exists() {
            Self::User(user.to_owned())
        } else {
            Self::Generated(user.to_owned())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Flag(path) | Self::Workspace(path) | Self::User(path) | Self::Generated(path) => {
                path
            }
        }
    }
}

fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("llmux")
        .join("llmux.toml")
}
