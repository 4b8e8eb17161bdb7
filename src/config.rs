//! Runtime configuration for the demo applications
//!
//! [`DemoConfig`] holds the few knobs that are not part of a demo's static
//! scene description: where assets live, where snapshots go, how strictly
//! resources are loaded and how the surface presents. The binaries parse it
//! from the command line with `clap`; every flag falls back to an environment
//! variable:
//!
//! | Flag              | Variable               | Example              |
//! |-------------------|------------------------|----------------------|
//! | `--window-size`   | `VITRINE_WINDOW_SIZE`  | `1600x900`           |
//! | `--asset-dir`     | `VITRINE_ASSET_DIR`    | `/opt/vitrine/assets`|
//! | `--snapshot-dir`  | `VITRINE_SNAPSHOT_DIR` | `shots` or `off`     |
//! | `--load-policy`   | `VITRINE_LOAD_POLICY`  | `fail-fast`, `fallback` |
//! | `--vsync`         | `VITRINE_VSYNC`        | `0`, `1`, `true`, `false` |
//! | `--shader`        | `VITRINE_SHADER`       | `shaders/plasma.wgsl`|

use std::path::{Path, PathBuf};

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

/// What to do when a texture or shader cannot be loaded at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LoadPolicy {
    /// Abort scene construction with a `ResourceLoadError`
    #[default]
    FailFast,
    /// Log a warning and substitute a neutral placeholder
    Fallback,
}

/// Configuration shared by all demo variants
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version, about = "Interactive wgpu demo scene")]
pub struct DemoConfig {
    /// Initial logical window size, WIDTHxHEIGHT
    #[arg(
        long,
        env = "VITRINE_WINDOW_SIZE",
        default_value = "1200x800",
        value_parser = parse_window_size
    )]
    pub window_size: (u32, u32),

    /// Root directory that holds `textures/`
    #[arg(long, env = "VITRINE_ASSET_DIR", default_value = "assets")]
    pub asset_dir: PathBuf,

    /// Directory receiving exported snapshots; `off` blocks exports
    // Fully qualified so clap parses the whole `Option` with the value parser
    #[arg(
        long,
        env = "VITRINE_SNAPSHOT_DIR",
        default_value = "snapshots",
        value_parser = parse_snapshot_dir
    )]
    pub snapshot_dir: std::option::Option<PathBuf>,

    #[arg(long, env = "VITRINE_LOAD_POLICY", value_enum, default_value_t = LoadPolicy::FailFast)]
    pub load_policy: LoadPolicy,

    /// Synchronise presentation with the display refresh
    #[arg(
        long,
        env = "VITRINE_VSYNC",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub vsync: bool,

    /// Custom WGSL module for the shader plane
    #[arg(long = "shader", env = "VITRINE_SHADER")]
    pub shader_path: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_size: (1200, 800),
            asset_dir: PathBuf::from("assets"),
            snapshot_dir: Some(PathBuf::from("snapshots")),
            load_policy: LoadPolicy::FailFast,
            vsync: true,
            shader_path: None,
        }
    }
}

impl DemoConfig {
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn with_asset_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.asset_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_snapshot_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.snapshot_dir = dir;
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_shader_path(mut self, path: impl AsRef<Path>) -> Self {
        self.shader_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resolves a path relative to the asset directory
    pub fn asset_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(relative)
    }
}

fn parse_window_size(value: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("expected WIDTHxHEIGHT, got '{value}'");
    let (w, h) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(format!("window size must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

fn parse_snapshot_dir(value: &str) -> Result<Option<PathBuf>, String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("off") || trimmed.eq_ignore_ascii_case("none") {
        Ok(None)
    } else if trimmed.is_empty() {
        Err("snapshot directory must not be empty".to_string())
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        DemoConfig::command().debug_assert();
    }

    #[test]
    fn test_flag_defaults_match_default() {
        let config = DemoConfig::try_parse_from(["vitrine"]).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.load_policy, LoadPolicy::FailFast);
        assert_eq!(config.window_size, (1200, 800));
    }

    #[test]
    fn test_flag_overrides() {
        let config = DemoConfig::try_parse_from([
            "vitrine",
            "--window-size",
            "640x480",
            "--asset-dir",
            "/tmp/assets",
            "--snapshot-dir",
            "off",
            "--load-policy",
            "fallback",
            "--vsync",
            "0",
            "--shader",
            "plasma.wgsl",
        ])
        .unwrap();

        assert_eq!(config.window_size, (640, 480));
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/assets"));
        assert_eq!(config.snapshot_dir, None);
        assert_eq!(config.load_policy, LoadPolicy::Fallback);
        assert!(!config.vsync);
        assert_eq!(config.shader_path, Some(PathBuf::from("plasma.wgsl")));
    }

    #[test]
    fn test_malformed_values_rejected() {
        for args in [
            ["vitrine", "--window-size", "big"],
            ["vitrine", "--load-policy", "whatever"],
            ["vitrine", "--vsync", "maybe"],
        ] {
            assert!(DemoConfig::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_window_size_parser() {
        assert!(parse_window_size("0x600").is_err());
        assert_eq!(parse_window_size(" 800 X 600 "), Ok((800, 600)));
    }

    #[test]
    fn test_snapshot_dir_parser() {
        assert_eq!(parse_snapshot_dir("OFF"), Ok(None));
        assert_eq!(
            parse_snapshot_dir("shots"),
            Ok(Some(PathBuf::from("shots")))
        );
        assert!(parse_snapshot_dir("  ").is_err());
    }

    #[test]
    fn test_asset_path_joins_root() {
        let config = DemoConfig::default().with_asset_dir("data");
        assert_eq!(
            config.asset_path("textures/a.jpg"),
            PathBuf::from("data").join("textures/a.jpg")
        );
    }
}
