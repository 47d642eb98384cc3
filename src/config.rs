use super::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable constant of the page behaviour and the smoke test. All
/// sections and fields are optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub nav: NavConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub smoke: SmokeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    /// Bias subtracted from every section top before matching the scroll offset
    #[serde(default = "default_highlight_lookahead")]
    pub highlight_lookahead: f64,
    /// Scroll offset past which the navbar switches to its solid style
    #[serde(default = "default_navbar_threshold")]
    pub navbar_scroll_threshold: f64,
    /// Space left above an anchor target by the smooth scroll
    #[serde(default = "default_header_offset")]
    pub header_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            highlight_lookahead: default_highlight_lookahead(),
            navbar_scroll_threshold: default_navbar_threshold(),
            header_offset: default_header_offset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Minimum visible fraction (0.0-1.0)
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// CSS margin around the viewport, e.g. "0px 0px -50px 0px"
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: i64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            root_margin: default_root_margin(),
            stagger_ms: default_stagger_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_role_start_ms")]
    pub role_start_ms: i64,
    #[serde(default = "default_role_interval_ms")]
    pub role_interval_ms: i64,
    #[serde(default = "default_typing_start_ms")]
    pub typing_start_ms: i64,
    #[serde(default = "default_typing_step_ms")]
    pub typing_step_ms: i64,
    #[serde(default = "default_ripple_ms")]
    pub ripple_ms: i64,
    /// Parallax speed of the first orb; orb `i` moves `(i + 1)` times as fast
    #[serde(default = "default_parallax_factor")]
    pub parallax_factor: f64,
    /// Animation delay step between floating cards, in seconds
    #[serde(default = "default_floating_card_step_s")]
    pub floating_card_step_s: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            role_start_ms: default_role_start_ms(),
            role_interval_ms: default_role_interval_ms(),
            typing_start_ms: default_typing_start_ms(),
            typing_step_ms: default_typing_step_ms(),
            ripple_ms: default_ripple_ms(),
            parallax_factor: default_parallax_factor(),
            floating_card_step_s: default_floating_card_step_s(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeConfig {
    /// Fake time allowed for the page's start-up animations
    #[serde(default = "default_smoke_wait_ms")]
    pub wait_ms: i64,
    /// Scroll offsets visited after the wait, in order
    #[serde(default)]
    pub scroll_steps: Vec<f64>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_smoke_wait_ms(),
            scroll_steps: Vec::new(),
        }
    }
}

fn default_highlight_lookahead() -> f64 {
    ScrollHighlighter::DEFAULT_LOOKAHEAD
}

fn default_navbar_threshold() -> f64 {
    100.0
}

fn default_header_offset() -> f64 {
    80.0
}

fn default_reveal_threshold() -> f64 {
    0.1
}

fn default_root_margin() -> String {
    "0px 0px -50px 0px".to_string()
}

fn default_stagger_ms() -> i64 {
    100
}

fn default_role_start_ms() -> i64 {
    1200
}

fn default_role_interval_ms() -> i64 {
    3000
}

fn default_typing_start_ms() -> i64 {
    1500
}

fn default_typing_step_ms() -> i64 {
    30
}

fn default_ripple_ms() -> i64 {
    600
}

fn default_parallax_factor() -> f64 {
    0.1
}

fn default_floating_card_step_s() -> f64 {
    0.5
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    720.0
}

fn default_smoke_wait_ms() -> i64 {
    2000
}

impl SiteConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(Error::Config(format!(
                "reveal.threshold must be within 0.0..=1.0, got {}",
                self.reveal.threshold
            )));
        }
        self.root_margin()?;
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(Error::Config(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        let delays = [
            ("reveal.stagger_ms", self.reveal.stagger_ms),
            ("effects.role_start_ms", self.effects.role_start_ms),
            ("effects.typing_start_ms", self.effects.typing_start_ms),
            ("effects.typing_step_ms", self.effects.typing_step_ms),
            ("effects.ripple_ms", self.effects.ripple_ms),
            ("smoke.wait_ms", self.smoke.wait_ms),
        ];
        if let Some((name, value)) = delays.iter().find(|(_, value)| *value < 0) {
            return Err(Error::Config(format!("{name} must not be negative, got {value}")));
        }
        if self.effects.role_interval_ms <= 0 {
            return Err(Error::Config(format!(
                "effects.role_interval_ms must be positive, got {}",
                self.effects.role_interval_ms
            )));
        }
        Ok(())
    }

    pub fn root_margin(&self) -> Result<RootMargin> {
        RootMargin::parse(&self.reveal.root_margin)
    }
}
