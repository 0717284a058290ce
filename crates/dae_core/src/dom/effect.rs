//! Effect library types (`profile_COMMON` only is interpreted).

use dae_math::DVec4;

/// An `<effect>` element.
#[derive(Clone, Debug, Default)]
pub struct Effect {
    pub id: String,
    pub name: Option<String>,
    pub profiles: Vec<EffectProfile>,
}

/// A profile inside an `<effect>`.
#[derive(Clone, Debug)]
pub enum EffectProfile {
    Common(ProfileCommon),

    /// `profile_GLSL`, `profile_CG`, ... (element name kept for diagnostics)
    Other(String),
}

/// A `<profile_COMMON>` element.
#[derive(Clone, Debug)]
pub struct ProfileCommon {
    pub newparams: Vec<NewParam>,
    pub technique: ShadingTechnique,
}

/// A `<newparam>` inside a profile.
#[derive(Clone, Debug)]
pub struct NewParam {
    pub sid: String,
    pub value: ParamValue,
}

/// The value carried by a `<newparam>`.
#[derive(Clone, Debug)]
pub enum ParamValue {
    /// `<surface>` with its `<init_from>` image ids in document order
    Surface { init_from: Vec<String> },

    /// `<sampler2D>` pointing at a surface param sid
    Sampler2D { source: String },

    /// Anything else
    Other,
}

/// The shading model of a `profile_COMMON` technique.
#[derive(Clone, Debug)]
pub enum ShadingTechnique {
    Constant(ConstantShading),
    Lambert(LambertShading),
    Phong(PhongShading),
    Blinn(PhongShading),
}

/// `<constant>` shading.
#[derive(Clone, Debug, Default)]
pub struct ConstantShading {
    pub emission: Option<ColorOrTexture>,
    pub transparent: Option<Transparent>,
    pub transparency: Option<FloatOrParam>,
}

/// `<lambert>` shading.
#[derive(Clone, Debug, Default)]
pub struct LambertShading {
    pub emission: Option<ColorOrTexture>,
    pub ambient: Option<ColorOrTexture>,
    pub diffuse: Option<ColorOrTexture>,
    pub transparent: Option<Transparent>,
    pub transparency: Option<FloatOrParam>,
}

/// `<phong>` or `<blinn>` shading (identical parameter sets).
#[derive(Clone, Debug, Default)]
pub struct PhongShading {
    pub emission: Option<ColorOrTexture>,
    pub ambient: Option<ColorOrTexture>,
    pub diffuse: Option<ColorOrTexture>,
    pub specular: Option<ColorOrTexture>,
    pub shininess: Option<FloatOrParam>,
    pub transparent: Option<Transparent>,
    pub transparency: Option<FloatOrParam>,
}

/// A `common_color_or_texture_type` value.
#[derive(Clone, Debug)]
pub enum ColorOrTexture {
    Color(DVec4),
    Param(String),
    Texture { texture: String, texcoord: String },
}

/// A `common_float_or_param_type` value.
#[derive(Clone, Debug)]
pub enum FloatOrParam {
    Float(f64),
    Param(String),
}

impl FloatOrParam {
    /// The literal value, if this is not a param reference.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FloatOrParam::Float(value) => Some(*value),
            FloatOrParam::Param(_) => None,
        }
    }
}

/// The `<transparent>` element.
#[derive(Clone, Debug)]
pub struct Transparent {
    /// `opaque` attribute, `None` when absent
    pub opaque: Option<OpaqueMode>,
    pub value: ColorOrTexture,
}

/// How a transparent color is turned into an opacity mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpaqueMode {
    /// Opacity comes from the alpha channel
    AOne,

    /// Opacity comes from the inverted RGB channels
    #[default]
    RgbZero,
}
