//! Named presets that derive settings from a base record and render them.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::assets::decode::SubjectBitmap;
use crate::encode::EncodedImage;
use crate::foundation::error::{PfpError, PfpResult};
use crate::paint::color::CssColor;
use crate::render::pipeline::{RenderOpts, render};
use crate::settings::{BackgroundShape, GenerationSettings, SettingsPatch};

const RGBA_WHITE: &str = "rgba(255, 255, 255, 1)";

/// A named variant: settings overwrites plus a generator.
pub trait Template: Send + Sync {
    fn id(&self) -> &str;

    /// Overwrites derived from `base`. Must not depend on anything but `base`.
    fn compute_overwrites(&self, base: &GenerationSettings) -> SettingsPatch;

    fn generate(
        &self,
        subject: &SubjectBitmap,
        settings: &GenerationSettings,
        opts: &RenderOpts,
    ) -> PfpResult<EncodedImage> {
        render(subject, settings, opts)
    }

    /// `base` with this template's overwrites applied, as a new record.
    fn settings_for(&self, base: &GenerationSettings) -> GenerationSettings {
        self.compute_overwrites(base).apply(base)
    }
}

/// Template whose overwrites come from a plain function and which uses the default generator.
pub struct BuiltinTemplate {
    id: &'static str,
    overwrites: fn(&GenerationSettings) -> SettingsPatch,
}

impl BuiltinTemplate {
    pub const fn new(id: &'static str, overwrites: fn(&GenerationSettings) -> SettingsPatch) -> Self {
        Self { id, overwrites }
    }
}

impl Template for BuiltinTemplate {
    fn id(&self) -> &str {
        self.id
    }

    fn compute_overwrites(&self, base: &GenerationSettings) -> SettingsPatch {
        (self.overwrites)(base)
    }
}

/// Result of one template in a fan-out.
#[derive(Debug)]
pub struct TemplateOutput {
    pub id: String,
    pub result: PfpResult<EncodedImage>,
}

/// Template id to implementation.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Box<dyn Template>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in template.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for t in builtin_templates() {
            reg.register(Box::new(t));
        }
        reg
    }

    /// Add `template`, returning any template previously registered under the same id.
    pub fn register(&mut self, template: Box<dyn Template>) -> Option<Box<dyn Template>> {
        self.templates.insert(template.id().to_string(), template)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Template> {
        self.templates.get(id).map(|t| t.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn lookup(&self, id: &str) -> PfpResult<&dyn Template> {
        self.get(id)
            .ok_or_else(|| PfpError::config(format!("unknown template '{id}'")))
    }

    /// Settings `id` would render with.
    pub fn settings_for(&self, id: &str, base: &GenerationSettings) -> PfpResult<GenerationSettings> {
        Ok(self.lookup(id)?.settings_for(base))
    }

    /// Render one template from `base`.
    pub fn render(
        &self,
        id: &str,
        subject: &SubjectBitmap,
        base: &GenerationSettings,
        opts: &RenderOpts,
    ) -> PfpResult<EncodedImage> {
        let template = self.lookup(id)?;
        let settings = template.settings_for(base);
        tracing::debug!(template = id, "rendering template");
        template.generate(subject, &settings, opts)
    }

    /// Render several templates from one base record in parallel, each on its own canvas.
    /// Outputs come back in request order.
    #[tracing::instrument(skip_all, fields(count = ids.len()))]
    pub fn render_all(
        &self,
        ids: &[&str],
        subject: &SubjectBitmap,
        base: &GenerationSettings,
        opts: &RenderOpts,
    ) -> Vec<TemplateOutput> {
        ids.par_iter()
            .map(|&id| TemplateOutput {
                id: id.to_string(),
                result: self.render(id, subject, base, opts),
            })
            .collect()
    }
}

/// The built-in templates.
pub fn builtin_templates() -> Vec<BuiltinTemplate> {
    vec![
        BuiltinTemplate::new("default", |_| SettingsPatch::default()),
        BuiltinTemplate::new("gradient-background-lighter-darker", |base| SettingsPatch {
            brand_color: Some(lighter_darker_gradient(base, 0.0)),
            ..SettingsPatch::default()
        }),
        BuiltinTemplate::new(
            "horizontal-gradient-background-lighter-darker",
            |base| SettingsPatch {
                brand_color: Some(lighter_darker_gradient(base, 90.0)),
                ..SettingsPatch::default()
            },
        ),
        BuiltinTemplate::new("smaller-background", |base| SettingsPatch {
            background_scale: Some(0.75),
            background_vertical_position: Some(1.08),
            border: Some(false),
            brand_color: Some(lighter_darker_gradient(base, 0.0)),
            ..SettingsPatch::default()
        }),
        BuiltinTemplate::new("smaller-background-bottom", |base| SettingsPatch {
            background_scale: Some(0.8),
            background_vertical_position: Some(0.8),
            subject_scale: Some(0.9),
            border: Some(false),
            brand_color: Some(lighter_darker_gradient(base, 0.0)),
            ..SettingsPatch::default()
        }),
        BuiltinTemplate::new("hollow-ring", |base| {
            let brand = brand_color(base).to_rgb_string();
            SettingsPatch {
                background_scale: Some(1.0),
                background_vertical_position: Some(1.0),
                border: Some(false),
                brand_color: Some(format!(
                    "radial-gradient({RGBA_WHITE} 0%, {RGBA_WHITE} 75%, {brand} 75%, {brand} 100%)"
                )),
                ..SettingsPatch::default()
            }
        }),
        BuiltinTemplate::new("multiple-hollow-rings", |base| {
            let brand = brand_color(base).to_rgb_string();
            let bands = [brand.as_str(), RGBA_WHITE, brand.as_str(), RGBA_WHITE, brand.as_str()];
            let stops: Vec<String> = bands
                .iter()
                .enumerate()
                .flat_map(|(i, c)| [format!("{c} {}%", i * 20), format!("{c} {}%", (i + 1) * 20)])
                .collect();
            SettingsPatch {
                background_scale: Some(1.0),
                background_vertical_position: Some(1.0),
                border: Some(false),
                subject_scale: Some(0.9),
                brand_color: Some(format!("radial-gradient({})", stops.join(", "))),
                ..SettingsPatch::default()
            }
        }),
        BuiltinTemplate::new("default-black-and-white", |_| SettingsPatch {
            subject_saturation: Some(0.0),
            subject_contrast: Some(115.0),
            ..SettingsPatch::default()
        }),
        BuiltinTemplate::new("smaller-square-bg", |_| SettingsPatch {
            background_shape: Some(BackgroundShape::Rect),
            background_scale: Some(0.7),
            ..SettingsPatch::default()
        }),
    ]
}

/// Brand colour as a plain colour; descriptors that are not colours count as black.
fn brand_color(base: &GenerationSettings) -> CssColor {
    CssColor::parse(&base.brand_color).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "brand colour is not a plain colour, deriving from black");
        CssColor::rgba(0, 0, 0, 1.0)
    })
}

/// Linear gradient from a lighter to a darker shade of the brand colour.
fn lighter_darker_gradient(base: &GenerationSettings, angle_deg: f64) -> String {
    let brand = brand_color(base);
    format!(
        "linear-gradient({angle_deg}deg, {} 0%, {} 50%, {} 100%)",
        brand.lighten(32.0).to_rgb_string(),
        brand.to_rgb_string(),
        brand.darken(24.0).to_rgb_string(),
    )
}

#[cfg(test)]
#[path = "../tests/unit/templates.rs"]
mod tests;
