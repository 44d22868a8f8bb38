use anyhow::{bail, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use starfield_core::RectKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestitutionConfig {
    pub panel: f32,
    pub text: f32,
    pub control: f32,
    pub button: f32,
    pub card: f32,
}

impl Default for RestitutionConfig {
    fn default() -> Self {
        Self {
            panel: 0.8,
            text: 0.9,
            control: 0.85,
            button: 0.9,
            card: 0.75,
        }
    }
}

impl RestitutionConfig {
    pub fn for_kind(&self, kind: RectKind) -> f32 {
        match kind {
            RectKind::Panel => self.panel,
            RectKind::Text => self.text,
            RectKind::Control => self.control,
            RectKind::Button => self.button,
            RectKind::Card => self.card,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub tick_ms: u64,
    pub initial_speed: f32,
    pub cluster_fraction: f32,
    pub centering_threshold: f32,
    pub centering_gain: f32,
    pub escape_chance: f32,
    pub wall_restitution: f32,
    pub escape_padding: f32,
    pub escape_damping: f32,
    pub escape_jitter: f32,
    pub cross_jitter: f32,
    pub rect_padding: f32,
    pub rect_jitter: f32,
    pub restitution: RestitutionConfig,
    pub trail_len: u32,
    // Screen area (px²) per background point.
    pub background_density: f32,
    pub max_background_points: usize,
    pub seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            initial_speed: 0.75,
            cluster_fraction: 0.3,
            centering_threshold: 0.4,
            centering_gain: 0.02,
            escape_chance: 0.2,
            wall_restitution: 0.8,
            escape_padding: 5.0,
            escape_damping: 0.9,
            escape_jitter: 0.2,
            cross_jitter: 0.3,
            rect_padding: 2.0,
            rect_jitter: 0.1,
            restitution: RestitutionConfig::default(),
            trail_len: 15,
            background_density: 1500.0,
            max_background_points: 6000,
            seed: None,
        }
    }
}

impl PhysicsConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let non_negative = [
            ("initial_speed", self.initial_speed),
            ("centering_gain", self.centering_gain),
            ("escape_padding", self.escape_padding),
            ("escape_damping", self.escape_damping),
            ("escape_jitter", self.escape_jitter),
            ("cross_jitter", self.cross_jitter),
            ("rect_padding", self.rect_padding),
            ("rect_jitter", self.rect_jitter),
            ("restitution.panel", self.restitution.panel),
            ("restitution.text", self.restitution.text),
            ("restitution.control", self.restitution.control),
            ("restitution.button", self.restitution.button),
            ("restitution.card", self.restitution.card),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                bail!("physics.{name} must be finite and >= 0, got {v}");
            }
        }
        let unit = [
            ("cluster_fraction", self.cluster_fraction),
            ("centering_threshold", self.centering_threshold),
            ("escape_chance", self.escape_chance),
            ("wall_restitution", self.wall_restitution),
        ];
        for (name, v) in unit {
            if !(0.0..=1.0).contains(&v) {
                bail!("physics.{name} {v} outside 0..=1");
            }
        }
        if !(self.background_density.is_finite() && self.background_density > 0.0) {
            bail!("physics.background_density must be > 0, got {}", self.background_density);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub hide_delay_ms: u64,
    pub hover_scale: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 3000,
            hover_scale: 1.3,
        }
    }
}

impl InteractionConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeConfig {
    pub tier: u8,
    pub min_popularity: u64,
    pub radius: f32,
    pub brightness: f32,
    pub glow: f32,
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl MagnitudeConfig {
    fn row(tier: u8, min_popularity: u64, radius: f32, brightness: f32, glow: f32, label: &str) -> Self {
        Self {
            tier,
            min_popularity,
            radius,
            brightness,
            glow,
            label: label.to_string(),
            enabled: true,
        }
    }
}

pub fn default_magnitudes() -> Vec<MagnitudeConfig> {
    vec![
        MagnitudeConfig::row(1, 1000, 8.0, 1.0, 20.0, "brightest"),
        MagnitudeConfig::row(2, 500, 6.0, 0.9, 16.0, "very bright"),
        MagnitudeConfig::row(3, 200, 5.0, 0.8, 12.0, "bright"),
        MagnitudeConfig::row(4, 100, 4.0, 0.7, 10.0, "medium"),
        MagnitudeConfig::row(5, 50, 3.5, 0.6, 8.0, "dim"),
        MagnitudeConfig::row(6, 20, 3.0, 0.5, 6.0, "very dim"),
        MagnitudeConfig::row(7, 0, 2.5, 0.4, 4.0, "faintest"),
    ]
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub show_names: bool,
    pub demo_mode: bool,
    pub items_path: Option<String>,
    pub endpoint: String,
    pub auto_connect: bool,
    pub catalog_refresh_secs: u64,
    pub physics: PhysicsConfig,
    pub interaction: InteractionConfig,
    #[serde(default = "default_magnitudes")]
    pub magnitudes: Vec<MagnitudeConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            show_names: false,
            demo_mode: true,
            items_path: None,
            endpoint: default_uds_path(),
            auto_connect: true,
            catalog_refresh_secs: 30,
            physics: PhysicsConfig::default(),
            interaction: InteractionConfig::default(),
            magnitudes: default_magnitudes(),
        }
    }
}

fn default_uds_path() -> String {
    static CACHED: OnceLock<String> = OnceLock::new();
    CACHED
        .get_or_init(|| {
            if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
                format!("{dir}/starfield.sock")
            } else {
                "/tmp/starfield.sock".to_string()
            }
        })
        .clone()
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "starfield")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let Some(path) = config_file_path() else {
        return ViewerConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid viewer config");
            ViewerConfig::default()
        }
    }
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}
