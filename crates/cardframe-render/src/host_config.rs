//! Host configuration: the styling knobs a host hands the renderer once per
//! session. Loaded from JSON with unknown fields rejected, so typos surface
//! instead of silently falling back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cardframe_model::{ContainerStyle, ImageSize, TextSize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct HostConfig {
    #[serde(default)]
    pub spacing: SpacingConfig,
    #[serde(default)]
    pub container_styles: ContainerStylesConfig,
    #[serde(default)]
    pub image_sizes: ImageSizesConfig,
    #[serde(default)]
    pub font_sizes: FontSizesConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            spacing: SpacingConfig::default(),
            container_styles: ContainerStylesConfig::default(),
            image_sizes: ImageSizesConfig::default(),
            font_sizes: FontSizesConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl HostConfig {
    pub fn from_json_str(text: &str) -> Result<Self, HostConfigError> {
        let config: HostConfig =
            serde_json::from_str(text).map_err(|err| HostConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HostConfigError> {
        let image_sizes = [
            ("small", self.image_sizes.small),
            ("medium", self.image_sizes.medium),
            ("large", self.image_sizes.large),
        ];
        for (name, value) in image_sizes {
            if value == 0 {
                return Err(HostConfigError::ZeroImageSize(name));
            }
        }
        let font_sizes = [
            ("small", self.font_sizes.small),
            ("default", self.font_sizes.default),
            ("medium", self.font_sizes.medium),
            ("large", self.font_sizes.large),
            ("extraLarge", self.font_sizes.extra_large),
        ];
        for (name, value) in font_sizes {
            if value == 0 {
                return Err(HostConfigError::ZeroFontSize(name));
            }
        }
        for style in [
            &self.container_styles.default,
            &self.container_styles.emphasis,
            &self.container_styles.good,
            &self.container_styles.attention,
            &self.container_styles.warning,
            &self.container_styles.accent,
        ] {
            if let Some(color) = &style.background_color {
                if !color.starts_with('#') {
                    return Err(HostConfigError::BadColor(color.clone()));
                }
            }
        }
        Ok(())
    }

    /// Pixel box for an image size class. `Auto` and `Stretch` size to
    /// content, so they have no configured pixel value.
    pub fn image_size_px(&self, size: ImageSize) -> Option<u32> {
        match size {
            ImageSize::Auto | ImageSize::Stretch => None,
            ImageSize::Small => Some(self.image_sizes.small),
            ImageSize::Medium => Some(self.image_sizes.medium),
            ImageSize::Large => Some(self.image_sizes.large),
        }
    }

    pub fn font_size_px(&self, size: TextSize) -> u32 {
        match size {
            TextSize::Small => self.font_sizes.small,
            TextSize::Default => self.font_sizes.default,
            TextSize::Medium => self.font_sizes.medium,
            TextSize::Large => self.font_sizes.large,
            TextSize::ExtraLarge => self.font_sizes.extra_large,
        }
    }

    /// Background for a container style. Styles without a configured color
    /// fall back to the default style's color; `None` style stays unpainted.
    pub fn background_color(&self, style: ContainerStyle) -> Option<&str> {
        let styles = &self.container_styles;
        let config = match style {
            ContainerStyle::None => return None,
            ContainerStyle::Default => &styles.default,
            ContainerStyle::Emphasis => &styles.emphasis,
            ContainerStyle::Good => &styles.good,
            ContainerStyle::Attention => &styles.attention,
            ContainerStyle::Warning => &styles.warning,
            ContainerStyle::Accent => &styles.accent,
        };
        config
            .background_color
            .as_deref()
            .or(styles.default.background_color.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SpacingConfig {
    #[serde(default = "default_spacing_small")]
    pub small: u32,
    #[serde(default = "default_spacing")]
    pub default: u32,
    #[serde(default = "default_spacing_medium")]
    pub medium: u32,
    #[serde(default = "default_spacing_large")]
    pub large: u32,
    #[serde(default = "default_spacing_extra_large")]
    pub extra_large: u32,
    #[serde(default = "default_padding")]
    pub padding: u32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            small: default_spacing_small(),
            default: default_spacing(),
            medium: default_spacing_medium(),
            large: default_spacing_large(),
            extra_large: default_spacing_extra_large(),
            padding: default_padding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ContainerStylesConfig {
    #[serde(default = "default_style")]
    pub default: StyleConfig,
    #[serde(default = "emphasis_style")]
    pub emphasis: StyleConfig,
    #[serde(default)]
    pub good: StyleConfig,
    #[serde(default)]
    pub attention: StyleConfig,
    #[serde(default)]
    pub warning: StyleConfig,
    #[serde(default)]
    pub accent: StyleConfig,
}

impl Default for ContainerStylesConfig {
    fn default() -> Self {
        Self {
            default: default_style(),
            emphasis: emphasis_style(),
            good: StyleConfig::default(),
            attention: StyleConfig::default(),
            warning: StyleConfig::default(),
            accent: StyleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ImageSizesConfig {
    #[serde(default = "default_image_small")]
    pub small: u32,
    #[serde(default = "default_image_medium")]
    pub medium: u32,
    #[serde(default = "default_image_large")]
    pub large: u32,
}

impl Default for ImageSizesConfig {
    fn default() -> Self {
        Self {
            small: default_image_small(),
            medium: default_image_medium(),
            large: default_image_large(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FontSizesConfig {
    #[serde(default = "default_font_small")]
    pub small: u32,
    #[serde(default = "default_font")]
    pub default: u32,
    #[serde(default = "default_font_medium")]
    pub medium: u32,
    #[serde(default = "default_font_large")]
    pub large: u32,
    #[serde(default = "default_font_extra_large")]
    pub extra_large: u32,
}

impl Default for FontSizesConfig {
    fn default() -> Self {
        Self {
            small: default_font_small(),
            default: default_font(),
            medium: default_font_medium(),
            large: default_font_large(),
            extra_large: default_font_extra_large(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MediaConfig {
    #[serde(default = "default_true")]
    pub allow_inline_playback: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            allow_inline_playback: true,
        }
    }
}

fn default_spacing_small() -> u32 {
    3
}
fn default_spacing() -> u32 {
    8
}
fn default_spacing_medium() -> u32 {
    20
}
fn default_spacing_large() -> u32 {
    30
}
fn default_spacing_extra_large() -> u32 {
    40
}
fn default_padding() -> u32 {
    15
}
fn default_image_small() -> u32 {
    40
}
fn default_image_medium() -> u32 {
    80
}
fn default_image_large() -> u32 {
    160
}
fn default_font_small() -> u32 {
    12
}
fn default_font() -> u32 {
    14
}
fn default_font_medium() -> u32 {
    17
}
fn default_font_large() -> u32 {
    21
}
fn default_font_extra_large() -> u32 {
    26
}
fn default_true() -> bool {
    true
}
fn default_style() -> StyleConfig {
    StyleConfig {
        background_color: Some("#FFFFFFFF".into()),
    }
}
fn emphasis_style() -> StyleConfig {
    StyleConfig {
        background_color: Some("#08000000".into()),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostConfigError {
    #[error("failed to parse host config: {0}")]
    Parse(String),
    #[error("image size `{0}` must be greater than zero")]
    ZeroImageSize(&'static str),
    #[error("font size `{0}` must be greater than zero")]
    ZeroFontSize(&'static str),
    #[error("background color `{0}` must be a `#AARRGGBB` value")]
    BadColor(String),
}
