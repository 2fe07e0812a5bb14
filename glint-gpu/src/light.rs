use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{Vec3Ext, WhiteNoise, DISTANT_LIGHT_DISTANCE};

#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Pod,
    Zeroable,
    Debug,
)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Emissive,
    Environment,
    Analytic,
}

/// A single light sample, as stored inside light tiles and reservoirs.
///
/// All of the light types share the same layout:
///
/// - for emissive triangles and point lights, `point` is the sampled position,
/// - for the environment map and directional lights, `point` is the
///   (normalized) direction towards the light.
///
/// `pdf` is the probability density of drawing this sample - with respect to
/// area for emissive triangles, to solid angle for the environment map and a
/// discrete probability for analytic lights.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct LightSample {
    pub point: Vec3,
    pub ty: u32,
    pub normal: Vec3,
    pub light_id: LightId,
    pub radiance: Vec3,
    pub pdf: f32,
}

impl LightSample {
    pub const TYPE_NONE: u32 = 0;
    pub const TYPE_EMISSIVE: u32 = 1;
    pub const TYPE_ENVIRONMENT: u32 = 2;
    pub const TYPE_POINT: u32 = 3;
    pub const TYPE_DIRECTIONAL: u32 = 4;

    pub fn emissive(
        light_id: LightId,
        point: Vec3,
        normal: Vec3,
        radiance: Vec3,
        pdf: f32,
    ) -> Self {
        Self {
            point,
            ty: Self::TYPE_EMISSIVE,
            normal,
            light_id,
            radiance,
            pdf,
        }
    }

    pub fn environment(
        light_id: LightId,
        dir: Vec3,
        radiance: Vec3,
        pdf: f32,
    ) -> Self {
        Self {
            point: dir,
            ty: Self::TYPE_ENVIRONMENT,
            normal: Vec3::ZERO,
            light_id,
            radiance,
            pdf,
        }
    }

    pub fn analytic(
        light_id: LightId,
        light: &AnalyticLight,
        pdf: f32,
    ) -> Self {
        Self {
            point: light.position,
            ty: if light.is_directional() {
                Self::TYPE_DIRECTIONAL
            } else {
                Self::TYPE_POINT
            },
            normal: Vec3::ZERO,
            light_id,
            radiance: light.intensity,
            pdf,
        }
    }

    pub fn is_none(&self) -> bool {
        self.ty == Self::TYPE_NONE
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn kind(&self) -> Option<LightKind> {
        match self.ty {
            Self::TYPE_EMISSIVE => Some(LightKind::Emissive),
            Self::TYPE_ENVIRONMENT => Some(LightKind::Environment),
            Self::TYPE_POINT | Self::TYPE_DIRECTIONAL => {
                Some(LightKind::Analytic)
            }
            _ => None,
        }
    }

    /// Returns whether this light is infinitely far away, i.e. whether
    /// `point` encodes a direction.
    pub fn is_distant(&self) -> bool {
        self.ty == Self::TYPE_ENVIRONMENT || self.ty == Self::TYPE_DIRECTIONAL
    }

    /// Returns the light arriving at `point` from this sample, with all of
    /// the geometry terms that belong to the light's side already applied
    /// (emitter's cosine and the inverse-square falloff).
    ///
    /// Doesn't perform any visibility checks.
    pub fn incident(&self, point: Vec3) -> Option<Incidence> {
        match self.ty {
            Self::TYPE_EMISSIVE | Self::TYPE_POINT => {
                let to_light = self.point - point;
                let distance_squared = to_light.length_squared();

                if distance_squared <= 1.0e-12 {
                    return None;
                }

                let distance = distance_squared.sqrt();
                let dir = to_light / distance;

                let falloff = if self.ty == Self::TYPE_EMISSIVE {
                    // Emissive triangles emit only on their front side
                    let cos_light = self.normal.dot(-dir);

                    if cos_light <= 0.0 {
                        return None;
                    }

                    cos_light / distance_squared
                } else {
                    1.0 / distance_squared
                };

                Some(Incidence {
                    dir,
                    distance,
                    radiance: self.radiance * falloff,
                })
            }

            Self::TYPE_ENVIRONMENT | Self::TYPE_DIRECTIONAL => Some(Incidence {
                dir: self.point,
                distance: f32::INFINITY,
                radiance: self.radiance,
            }),

            _ => None,
        }
    }

    /// Returns the point that visibility rays shot from `point` towards this
    /// light should end at.
    pub fn visibility_target(&self, point: Vec3) -> Vec3 {
        if self.is_distant() {
            point + self.point * DISTANT_LIGHT_DISTANCE
        } else {
            self.point
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Incidence {
    /// Normalized direction from the shaded point towards the light.
    pub dir: Vec3,

    /// Distance to the light; infinite for distant lights.
    pub distance: f32,

    pub radiance: Vec3,
}

/// Single triangle of an emissive mesh.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct EmissiveTriangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,

    /// Average radiance emitted from the triangle's front face (the one
    /// pointed at by `(p1 - p0) × (p2 - p0)`).
    pub radiance: Vec3,
}

impl EmissiveTriangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, radiance: Vec3) -> Self {
        Self {
            p0,
            p1,
            p2,
            radiance,
        }
    }

    pub fn area(&self) -> f32 {
        (self.p1 - self.p0).cross(self.p2 - self.p0).length() * 0.5
    }

    pub fn normal(&self) -> Vec3 {
        (self.p1 - self.p0).cross(self.p2 - self.p0).normalize_or_zero()
    }

    /// Returns the weight this triangle has when picking between emissive
    /// triangles - i.e. its total emitted luminance.
    pub fn weight(&self) -> f32 {
        self.radiance.luma() * self.area()
    }

    /// Picks a uniformly distributed point on this triangle.
    pub fn sample(&self, wnoise: &mut WhiteNoise) -> Vec3 {
        let u = wnoise.sample();
        let v = wnoise.sample();
        let su = u.sqrt();
        let b0 = 1.0 - su;
        let b1 = v * su;

        self.p0 * b0 + self.p1 * b1 + self.p2 * (1.0 - b0 - b1)
    }
}

/// Point or directional light.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct AnalyticLight {
    /// Position (for point lights) or normalized direction towards the light
    /// (for directional lights).
    pub position: Vec3,
    pub ty: u32,

    /// Radiant intensity (for point lights) or irradiance (for directional
    /// lights).
    pub intensity: Vec3,
}

impl AnalyticLight {
    pub const TYPE_POINT: u32 = 0;
    pub const TYPE_DIRECTIONAL: u32 = 1;

    pub fn point(position: Vec3, intensity: Vec3) -> Self {
        Self {
            position,
            ty: Self::TYPE_POINT,
            intensity,
        }
    }

    pub fn directional(dir: Vec3, irradiance: Vec3) -> Self {
        Self {
            position: dir.normalize_or_zero(),
            ty: Self::TYPE_DIRECTIONAL,
            intensity: irradiance,
        }
    }

    pub fn is_directional(&self) -> bool {
        self.ty == Self::TYPE_DIRECTIONAL
    }

    pub fn weight(&self) -> f32 {
        self.intensity.luma()
    }
}
