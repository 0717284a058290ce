//! Effect interpretation: `profile_COMMON` techniques to flat material colors.
//!
//! COLLADA describes transparency as a transparent color plus a scalar
//! transparency, combined according to an opaque mode. The importer folds
//! that into the ambient, diffuse and specular colors up front, so a
//! [`MaterialDescriptor`] never carries a separate opacity value: whether a
//! material is transparent is read back from the diffuse alpha.

use std::path::PathBuf;

use dae_math::{luminance, DVec4};
use serde::{Deserialize, Serialize};

use crate::dom::{
    ColorOrTexture, Effect, EffectProfile, FloatOrParam, OpaqueMode, ParamValue, PhongShading,
    ProfileCommon, ShadingTechnique, Transparent,
};

/// A resolved material as handed to the factory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub ambient: DVec4,
    pub diffuse: DVec4,
    pub specular: DVec4,
    pub shininess: f64,

    /// Existing texture file, if the effect binds one and it was found
    pub texture_path: Option<PathBuf>,
}

impl Default for MaterialDescriptor {
    /// The material used when a batch has no (resolvable) binding.
    fn default() -> Self {
        Self {
            ambient: DVec4::ONE,
            diffuse: DVec4::ONE,
            specular: DVec4::new(0.5, 0.5, 0.5, 1.0),
            shininess: 50.0,
            texture_path: None,
        }
    }
}

impl MaterialDescriptor {
    /// Transparency is derived from the diffuse alpha, never stored.
    pub fn is_transparent(&self) -> bool {
        self.diffuse.w < 1.0
    }
}

/// Shading parameters resolved from an effect, before texture lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectParameters {
    pub ambient: DVec4,
    pub diffuse: DVec4,
    pub specular: DVec4,
    pub shininess: f64,

    /// Image id from the profile's surface parameter
    pub image_id: Option<String>,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            ambient: DVec4::ONE,
            diffuse: DVec4::ONE,
            specular: DVec4::ONE,
            shininess: 5.0,
            image_id: None,
        }
    }
}

impl EffectParameters {
    pub fn is_transparent(&self) -> bool {
        self.diffuse.w < 1.0
    }

    /// Attach the resolved texture path.
    pub fn into_descriptor(self, texture_path: Option<PathBuf>) -> MaterialDescriptor {
        MaterialDescriptor {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
            texture_path,
        }
    }
}

/// The transparency inputs of one technique.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Opacity {
    pub mode: OpaqueMode,
    pub color: DVec4,
    pub transparency: f64,
}

impl Default for Opacity {
    /// No `<transparent>`: RGB_ZERO against opaque white.
    fn default() -> Self {
        Self {
            mode: OpaqueMode::RgbZero,
            color: DVec4::ONE,
            transparency: 1.0,
        }
    }
}

impl Opacity {
    /// Read the transparency inputs of a technique.
    ///
    /// The mode defaults to RGB_ZERO and the color to opaque white, also
    /// when `<transparent>` is absent. A non-literal color reads as white.
    /// `<transparency>` defaults to 1.
    pub fn from_technique(
        transparent: Option<&Transparent>,
        transparency: Option<&FloatOrParam>,
    ) -> Self {
        let transparency = transparency.and_then(FloatOrParam::as_float).unwrap_or(1.0);

        match transparent {
            Some(t) => Self {
                mode: t.opaque.unwrap_or_default(),
                color: rgba(&t.value),
                transparency,
            },
            None => Self {
                transparency,
                ..Default::default()
            },
        }
    }

    /// Fold the opacity into `color`.
    pub fn apply(&self, color: DVec4) -> DVec4 {
        match self.mode {
            OpaqueMode::AOne => color * (self.color.w * self.transparency),
            OpaqueMode::RgbZero => {
                let rgb = color.truncate() * (1.0 - self.color.truncate() * self.transparency);
                let alpha = 1.0 - luminance(self.color.truncate()) * self.transparency;
                rgb.extend(alpha)
            }
        }
    }
}

/// Literal color of a color-or-texture value; textures and params read as white.
fn rgba(value: &ColorOrTexture) -> DVec4 {
    match value {
        ColorOrTexture::Color(color) => *color,
        ColorOrTexture::Param(_) | ColorOrTexture::Texture { .. } => DVec4::ONE,
    }
}

/// Resolve an effect into shading parameters.
///
/// Profiles are applied in order and later ones overwrite earlier results.
pub fn resolve_effect(effect: &Effect) -> EffectParameters {
    let mut params = EffectParameters::default();

    for profile in &effect.profiles {
        match profile {
            EffectProfile::Common(common) => apply_profile(&mut params, common),
            EffectProfile::Other(kind) => {
                log::debug!("Effect '{}': ignoring <{}>", effect.id, kind);
            }
        }
    }

    params
}

fn apply_profile(params: &mut EffectParameters, profile: &ProfileCommon) {
    if let Some(image_id) = surface_image(profile) {
        params.image_id = Some(image_id);
    }

    match &profile.technique {
        ShadingTechnique::Constant(c) => {
            let opacity = Opacity::from_technique(c.transparent.as_ref(), c.transparency.as_ref());
            if let Some(emission) = &c.emission {
                let color = opacity.apply(rgba(emission));
                params.ambient = color;
                params.diffuse = color;
                params.specular = color;
                params.shininess = 0.0;
            }
        }
        ShadingTechnique::Lambert(l) => {
            let opacity = Opacity::from_technique(l.transparent.as_ref(), l.transparency.as_ref());
            if let Some(ambient) = &l.ambient {
                params.ambient = opacity.apply(rgba(ambient));
            }
            if let Some(diffuse) = &l.diffuse {
                params.diffuse = opacity.apply(rgba(diffuse));
            }
            params.specular = DVec4::ZERO;
        }
        ShadingTechnique::Phong(p) | ShadingTechnique::Blinn(p) => apply_phong(params, p),
    }
}

fn apply_phong(params: &mut EffectParameters, p: &PhongShading) {
    let opacity = Opacity::from_technique(p.transparent.as_ref(), p.transparency.as_ref());

    if let Some(ambient) = &p.ambient {
        params.ambient = opacity.apply(rgba(ambient));
    }
    if let Some(diffuse) = &p.diffuse {
        params.diffuse = opacity.apply(rgba(diffuse));
    }
    if let Some(specular) = &p.specular {
        params.specular = opacity.apply(rgba(specular));
    }
    if let Some(shininess) = p.shininess.as_ref().and_then(FloatOrParam::as_float) {
        params.shininess = shininess;
    }
}

/// First `<init_from>` of the first surface parameter that has one.
fn surface_image(profile: &ProfileCommon) -> Option<String> {
    profile.newparams.iter().find_map(|param| match &param.value {
        ParamValue::Surface { init_from } => init_from.first().cloned(),
        _ => None,
    })
}
