//! Declarative generation settings.
//!
//! [`GenerationSettings`] is the single input record the renderer consumes. It is immutable per
//! render call: templates and other callers derive new settings through [`SettingsPatch::apply`]
//! instead of mutating a shared object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PfpError, PfpResult};

/// Mask shape used for the background and, optionally, the final image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundShape {
    #[serde(rename = "RECT")]
    Rect,
    #[serde(rename = "CIRCLE")]
    Circle,
    #[serde(rename = "ROUNDEDRECT")]
    RoundedRect,
    /// Any other value. Only reachable when boundary validation was bypassed; the renderer
    /// rejects it.
    #[serde(untagged)]
    Unknown(String),
}

impl BackgroundShape {
    /// Fail with a configuration error for [`BackgroundShape::Unknown`].
    pub fn ensure_known(&self) -> PfpResult<()> {
        match self {
            Self::Unknown(name) => Err(unknown_shape_error(name)),
            _ => Ok(()),
        }
    }
}

pub(crate) fn unknown_shape_error(name: &str) -> PfpError {
    PfpError::config(format!("unknown background shape '{name}'"))
}

impl fmt::Display for BackgroundShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rect => f.write_str("RECT"),
            Self::Circle => f.write_str("CIRCLE"),
            Self::RoundedRect => f.write_str("ROUNDEDRECT"),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

/// Whether the border sits under the subject or over everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorderLayer {
    #[default]
    Background,
    Foreground,
}

/// Encoded output container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

/// Full settings record for one render call.
///
/// Numeric fields are expected inside the ranges checked by [`GenerationSettings::validate`];
/// the renderer itself does not re-validate them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Solid CSS color or a `linear-gradient(...)` / `radial-gradient(...)` descriptor.
    pub brand_color: String,
    /// Optional `data:` URL raster drawn over the fill.
    pub background_image: Option<String>,
    pub background_shape: BackgroundShape,
    /// Fraction of the canvas side, `[0, 1.5]`.
    pub background_scale: f64,
    /// Vertical anchor, `[0, 2]`; `1.0` bottom-aligns the shape.
    pub background_vertical_position: f64,

    /// Multiplier on the fit-inside scale, `[0, 1.5]`.
    pub subject_scale: f64,
    /// Fraction of the half canvas, `[-2, 2]`.
    pub subject_top_margin: f64,
    /// Fraction of the half canvas, `[-2, 2]`.
    pub subject_left_margin: f64,
    /// Degrees, `[-360, 360]`.
    pub subject_rotation: f64,
    /// Percent, `[0, 200]`, 100 is neutral.
    pub subject_saturation: f64,
    /// Percent, `[0, 200]`, 100 is neutral.
    pub subject_contrast: f64,
    /// Percent, `[0, 200]`, 100 is neutral.
    pub subject_brightness: f64,
    pub subject_shadow: bool,

    pub border: bool,
    pub border_layer: BorderLayer,
    pub border_color: String,
    /// Stroke width in pixels, `[0, 128]`.
    pub border_thickness: f64,

    pub badge_enabled: bool,
    pub badge_text: String,
    pub badge_background_color: String,
    pub badge_text_color: String,
    /// Per-character advance multiplier, `[0, 2]`.
    pub badge_text_letter_spacing: f64,
    pub badge_text_bold: bool,

    pub output_format: OutputFormat,
    /// Side of the square output in pixels, `[64, 4096]`.
    pub output_size: u32,

    pub use_background_shape_as_image_mask: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            brand_color: "#F1337F".to_owned(),
            background_image: None,
            background_shape: BackgroundShape::Circle,
            background_scale: 1.0,
            background_vertical_position: 1.0,
            subject_scale: 0.95,
            subject_top_margin: 0.0,
            subject_left_margin: 0.0,
            subject_rotation: 0.0,
            subject_saturation: 100.0,
            subject_contrast: 100.0,
            subject_brightness: 100.0,
            subject_shadow: false,
            border: false,
            border_layer: BorderLayer::Background,
            border_color: "#FFFFFF".to_owned(),
            border_thickness: 16.0,
            badge_enabled: false,
            badge_text: "#OPENTOWORK".to_owned(),
            badge_background_color: "#057642".to_owned(),
            badge_text_color: "#FFFFFF".to_owned(),
            badge_text_letter_spacing: 1.0,
            badge_text_bold: true,
            output_format: OutputFormat::Png,
            output_size: 1024,
            use_background_shape_as_image_mask: true,
        }
    }
}

impl GenerationSettings {
    /// Deserialize JSON over the defaults and validate the result.
    pub fn from_json_slice(bytes: &[u8]) -> PfpResult<Self> {
        let settings: Self = serde_json::from_slice(bytes)
            .map_err(|e| PfpError::validation(format!("invalid settings json: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Range and membership checks performed at the settings boundary.
    pub fn validate(&self) -> PfpResult<()> {
        self.background_shape
            .ensure_known()
            .map_err(|e| PfpError::validation(e.to_string()))?;

        check_range("backgroundScale", self.background_scale, 0.0, 1.5)?;
        check_range(
            "backgroundVerticalPosition",
            self.background_vertical_position,
            0.0,
            2.0,
        )?;
        check_range("subjectScale", self.subject_scale, 0.0, 1.5)?;
        check_range("subjectTopMargin", self.subject_top_margin, -2.0, 2.0)?;
        check_range("subjectLeftMargin", self.subject_left_margin, -2.0, 2.0)?;
        check_range("subjectRotation", self.subject_rotation, -360.0, 360.0)?;
        check_range("subjectSaturation", self.subject_saturation, 0.0, 200.0)?;
        check_range("subjectContrast", self.subject_contrast, 0.0, 200.0)?;
        check_range("subjectBrightness", self.subject_brightness, 0.0, 200.0)?;
        check_range("borderThickness", self.border_thickness, 0.0, 128.0)?;
        check_range(
            "badgeTextLetterSpacing",
            self.badge_text_letter_spacing,
            0.0,
            2.0,
        )?;
        if !(64..=4096).contains(&self.output_size) {
            return Err(PfpError::validation(format!(
                "outputSize must be in [64, 4096], got {}",
                self.output_size
            )));
        }
        if self.brand_color.trim().is_empty() {
            return Err(PfpError::validation("brandColor must be non-empty"));
        }
        Ok(())
    }

    /// Canvas side as a float.
    pub fn side(&self) -> f64 {
        f64::from(self.output_size)
    }
}

fn check_range(name: &str, v: f64, min: f64, max: f64) -> PfpResult<()> {
    if !v.is_finite() || v < min || v > max {
        return Err(PfpError::validation(format!(
            "{name} must be in [{min}, {max}], got {v}"
        )));
    }
    Ok(())
}

/// Partial settings: every field optional.
///
/// Used for template overwrites and for layering user-supplied JSON over a base record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub brand_color: Option<String>,
    pub background_image: Option<String>,
    pub background_shape: Option<BackgroundShape>,
    pub background_scale: Option<f64>,
    pub background_vertical_position: Option<f64>,
    pub subject_scale: Option<f64>,
    pub subject_top_margin: Option<f64>,
    pub subject_left_margin: Option<f64>,
    pub subject_rotation: Option<f64>,
    pub subject_saturation: Option<f64>,
    pub subject_contrast: Option<f64>,
    pub subject_brightness: Option<f64>,
    pub subject_shadow: Option<bool>,
    pub border: Option<bool>,
    pub border_layer: Option<BorderLayer>,
    pub border_color: Option<String>,
    pub border_thickness: Option<f64>,
    pub badge_enabled: Option<bool>,
    pub badge_text: Option<String>,
    pub badge_background_color: Option<String>,
    pub badge_text_color: Option<String>,
    pub badge_text_letter_spacing: Option<f64>,
    pub badge_text_bold: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_size: Option<u32>,
    pub use_background_shape_as_image_mask: Option<bool>,
}

macro_rules! overwrite_fields {
    ($patch:expr, $out:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(v) = &$patch.$field {
                $out.$field = v.clone();
            }
        )*
    };
}

macro_rules! layer_fields {
    ($over:expr, $out:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $over.$field.is_some() {
                $out.$field = $over.$field.clone();
            }
        )*
    };
}

impl SettingsPatch {
    /// Produce a new settings record with every present field taken from `self`.
    ///
    /// `base` is left untouched.
    pub fn apply(&self, base: &GenerationSettings) -> GenerationSettings {
        let mut out = base.clone();
        if let Some(img) = &self.background_image {
            out.background_image = Some(img.clone());
        }
        overwrite_fields!(
            self,
            out,
            [
                brand_color,
                background_shape,
                background_scale,
                background_vertical_position,
                subject_scale,
                subject_top_margin,
                subject_left_margin,
                subject_rotation,
                subject_saturation,
                subject_contrast,
                subject_brightness,
                subject_shadow,
                border,
                border_layer,
                border_color,
                border_thickness,
                badge_enabled,
                badge_text,
                badge_background_color,
                badge_text_color,
                badge_text_letter_spacing,
                badge_text_bold,
                output_format,
                output_size,
                use_background_shape_as_image_mask,
            ]
        );
        out
    }

    /// Layer `other` over `self`; fields present in `other` win.
    pub fn merged_with(&self, other: &SettingsPatch) -> SettingsPatch {
        let mut out = self.clone();
        layer_fields!(
            other,
            out,
            [
                brand_color,
                background_image,
                background_shape,
                background_scale,
                background_vertical_position,
                subject_scale,
                subject_top_margin,
                subject_left_margin,
                subject_rotation,
                subject_saturation,
                subject_contrast,
                subject_brightness,
                subject_shadow,
                border,
                border_layer,
                border_color,
                border_thickness,
                badge_enabled,
                badge_text,
                badge_background_color,
                badge_text_color,
                badge_text_letter_spacing,
                badge_text_bold,
                output_format,
                output_size,
                use_background_shape_as_image_mask,
            ]
        );
        out
    }

    pub fn from_json_slice(bytes: &[u8]) -> PfpResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| PfpError::validation(format!("invalid settings patch json: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
