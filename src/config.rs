use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::gallery::WidthClass;

/// How the column count is chosen.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnsMode {
    /// Follow the terminal width across the breakpoint.
    Auto,
    /// Always two columns.
    Compact,
    /// Always three columns.
    Desktop,
}

impl ColumnsMode {
    /// The width class to pin, if any.
    pub const fn forced_class(self) -> Option<WidthClass> {
        match self {
            Self::Auto => None,
            Self::Compact => Some(WidthClass::Compact),
            Self::Desktop => Some(WidthClass::Desktop),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub per_page: Option<u32>,
    pub breakpoint: Option<u16>,
    pub columns: Option<ColumnsMode>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches accumulate, values from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            per_page: other.per_page.or(self.per_page),
            breakpoint: other.breakpoint.or(self.breakpoint),
            columns: other.columns.or(self.columns),
            endpoint: other.endpoint.clone().or_else(|| self.endpoint.clone()),
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mosaic").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mosaic")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mosaic").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("mosaic")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mosaicrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as rc tokens. The API key is never persisted.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mosaic defaults (saved with --save)".to_string()];
    if let Some(per_page) = flags.per_page {
        lines.push(format!("--per-page {per_page}"));
    }
    if let Some(breakpoint) = flags.breakpoint {
        lines.push(format!("--breakpoint {breakpoint}"));
    }
    if let Some(value) = flags.columns.and_then(|columns| columns.to_possible_value()) {
        lines.push(format!("--columns {}", value.get_name()));
    }
    if let Some(endpoint) = &flags.endpoint {
        lines.push(format!("--endpoint {endpoint}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw arguments or rc tokens. Unknown tokens and
/// unparsable values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--perf" {
            flags.perf = true;
            i += 1;
            continue;
        }
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        if !is_valued_flag(name) {
            i += 1;
            continue;
        }
        let value = match inline {
            Some(value) => value,
            None => match tokens.get(i + 1) {
                Some(next) => {
                    i += 1;
                    next.clone()
                }
                None => break,
            },
        };
        apply_valued_flag(&mut flags, name, value);
        i += 1;
    }
    flags
}

fn is_valued_flag(name: &str) -> bool {
    matches!(
        name,
        "--per-page"
            | "--breakpoint"
            | "--columns"
            | "--endpoint"
            | "--api-key"
            | "--render-debug-log"
    )
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--per-page" => flags.per_page = value.parse().ok(),
        "--breakpoint" => flags.breakpoint = value.parse().ok(),
        "--columns" => flags.columns = ColumnsMode::from_str(&value, true).ok(),
        "--endpoint" => flags.endpoint = Some(value),
        "--api-key" => flags.api_key = Some(value),
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}
