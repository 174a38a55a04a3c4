//! Visual attributes for particles.
//!
//! A particle's appearance is drawn once at creation from bounded random bands
//! and is never touched again. The measurement does not feed into appearance;
//! it only controls how many particles exist.
//!
//! # Usage
//!
//! The default is a small molecule: a blue to violet core with two smaller
//! satellites mirrored left and right of it.
//!
//! ```ignore
//! Scene::new(pm25)
//!     .with_visuals(|v| {
//!         v.hue_range(20.0, 45.0);
//!         v.lightness_range(0.35, 0.6);
//!         v.satellites(3, 1.4, 0.35).satellite_layout(SatelliteLayout::Scattered);
//!     });
//! ```

use crate::error::ConfigError;
use crate::spawn::SphericalSampler;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How satellites are placed around the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteLayout {
    /// Mirrored pairs along x, then y, then z. Each further round of three
    /// pairs sits one spread farther out.
    #[default]
    Paired,
    /// Independent random directions.
    Scattered,
}

/// Bands that visual attributes are drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Hue band in degrees, `0.0..=360.0`.
    pub hue_range: (f32, f32),
    /// Fixed HSL saturation, `0.0..=1.0`.
    pub saturation: f32,
    /// HSL lightness band, `0.0..=1.0`.
    pub lightness_range: (f32, f32),
    /// Core sphere radius band, world units.
    pub size_range: (f32, f32),
    /// Number of small sub-spheres clustered around the core.
    pub satellite_count: u32,
    /// Satellite distance from the core, as a multiple of core size.
    pub satellite_spread: f32,
    /// Satellite radius, as a multiple of core size.
    pub satellite_scale: f32,
    pub satellite_layout: SatelliteLayout,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            // Blue to violet, 0.04 core with 0.025 satellites at +-0.07
            hue_range: (200.0, 280.0),
            saturation: 0.8,
            lightness_range: (0.65, 0.65),
            size_range: (0.04, 0.04),
            satellite_count: 2,
            satellite_spread: 1.75,
            satellite_scale: 0.625,
            satellite_layout: SatelliteLayout::Paired,
        }
    }
}

impl VisualConfig {
    /// Set the hue band in degrees.
    pub fn hue_range(&mut self, min: f32, max: f32) -> &mut Self {
        self.hue_range = (min, max);
        self
    }

    /// Set the lightness band.
    pub fn lightness_range(&mut self, min: f32, max: f32) -> &mut Self {
        self.lightness_range = (min, max);
        self
    }

    /// Set the saturation.
    pub fn saturation(&mut self, saturation: f32) -> &mut Self {
        self.saturation = saturation;
        self
    }

    /// Set the core size band.
    pub fn size_range(&mut self, min: f32, max: f32) -> &mut Self {
        self.size_range = (min, max);
        self
    }

    /// Configure the satellite cluster.
    pub fn satellites(&mut self, count: u32, spread: f32, scale: f32) -> &mut Self {
        self.satellite_count = count;
        self.satellite_spread = spread;
        self.satellite_scale = scale;
        self
    }

    pub fn satellite_layout(&mut self, layout: SatelliteLayout) -> &mut Self {
        self.satellite_layout = layout;
        self
    }

    /// Check every band is ordered and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_band("hue", self.hue_range, 0.0, 360.0)?;
        check_band("lightness", self.lightness_range, 0.0, 1.0)?;
        check_band("size", self.size_range, 0.0, f32::MAX)?;
        check_band("saturation", (self.saturation, self.saturation), 0.0, 1.0)?;
        check_band("satellite spread", (self.satellite_spread, self.satellite_spread), 0.0, f32::MAX)?;
        check_band("satellite scale", (self.satellite_scale, self.satellite_scale), 0.0, f32::MAX)?;
        Ok(())
    }

    /// Draw a new set of visual attributes.
    pub fn generate(&self, sampler: &mut SphericalSampler) -> Visual {
        let hue = sampler.random_range(self.hue_range.0, self.hue_range.1);
        let lightness = sampler.random_range(self.lightness_range.0, self.lightness_range.1);
        let size = sampler.random_range(self.size_range.0, self.size_range.1);

        let distance = self.satellite_spread * size;
        let satellites = (0..self.satellite_count)
            .map(|i| {
                let direction = match self.satellite_layout {
                    SatelliteLayout::Paired => paired_direction(i),
                    SatelliteLayout::Scattered => sampler.sample_unit(),
                };
                Satellite {
                    offset: direction * distance,
                    size: size * self.satellite_scale,
                }
            })
            .collect();

        Visual {
            hue,
            lightness,
            color: hsl_to_rgb(hue, self.saturation, lightness),
            size,
            satellites,
        }
    }
}

/// Negative side first, then positive; axes cycle x, y, z.
fn paired_direction(index: u32) -> Vec3 {
    const AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];
    let pair = index / 2;
    let side = if index % 2 == 0 { -1.0 } else { 1.0 };
    let round = (pair / 3) as f32 + 1.0;
    AXES[(pair % 3) as usize] * side * round
}

fn check_band(name: &'static str, (min, max): (f32, f32), lo: f32, hi: f32) -> Result<(), ConfigError> {
    let ok = min.is_finite() && max.is_finite() && min <= max && min >= lo && max <= hi;
    if ok {
        Ok(())
    } else {
        Err(ConfigError::VisualRange { name, min, max })
    }
}

/// A sub-sphere attached to a particle's core.
#[derive(Clone, Debug, PartialEq)]
pub struct Satellite {
    /// Offset from the particle position.
    pub offset: Vec3,
    /// Radius.
    pub size: f32,
}

/// Appearance of one particle, fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    /// Hue in degrees.
    pub hue: f32,
    /// HSL lightness.
    pub lightness: f32,
    /// RGB, each channel `0.0..=1.0`.
    pub color: Vec3,
    /// Core radius.
    pub size: f32,
    /// Sub-spheres around the core.
    pub satellites: Vec<Satellite>,
}

/// Convert HSL to RGB.
///
/// * `h` - hue in degrees (wraps)
/// * `s` - saturation, 0.0 (gray) to 1.0 (vivid)
/// * `l` - lightness, 0.0 (black) to 1.0 (white)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgb() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!((blue - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);

        let gray = hsl_to_rgb(123.0, 0.0, 0.5);
        assert!((gray - Vec3::splat(0.5)).length() < 1e-4);
    }

    #[test]
    fn test_generate_stays_in_band() {
        let mut config = VisualConfig::default();
        config
            .hue_range(20.0, 45.0)
            .lightness_range(0.35, 0.6)
            .size_range(0.02, 0.05)
            .satellites(3, 1.4, 0.35)
            .satellite_layout(SatelliteLayout::Scattered);
        let mut sampler = SphericalSampler::seeded(11);
        for _ in 0..200 {
            let v = config.generate(&mut sampler);
            assert!(v.hue >= 20.0 && v.hue < 45.0);
            assert!(v.lightness >= 0.35 && v.lightness < 0.6);
            assert!(v.size >= 0.02 && v.size < 0.05);
            assert_eq!(v.satellites.len(), 3);
            for sat in &v.satellites {
                assert!((sat.offset.length() - 1.4 * v.size).abs() < 1e-5);
            }
            assert!(v.color.min_element() >= 0.0 && v.color.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_default_is_blue_molecule() {
        let config = VisualConfig::default();
        let mut sampler = SphericalSampler::seeded(5);
        for _ in 0..100 {
            let v = config.generate(&mut sampler);
            assert!(v.hue >= 200.0 && v.hue < 280.0);
            assert_eq!(v.lightness, 0.65);
            assert_eq!(v.size, 0.04);
            assert_eq!(v.satellites.len(), 2);

            let (left, right) = (&v.satellites[0], &v.satellites[1]);
            assert!((left.offset - Vec3::new(-0.07, 0.0, 0.0)).length() < 1e-6);
            assert!((right.offset - Vec3::new(0.07, 0.0, 0.0)).length() < 1e-6);
            assert!((left.size - 0.025).abs() < 1e-6 && (right.size - 0.025).abs() < 1e-6);
            // Blue dominates for every hue in the band
            assert!(v.color.z >= v.color.x && v.color.z >= v.color.y);
        }
    }

    #[test]
    fn test_paired_layout_mirrors_each_pair() {
        let mut config = VisualConfig::default();
        config.satellites(8, 1.0, 0.5);
        let v = config.generate(&mut SphericalSampler::seeded(0));
        for pair in v.satellites.chunks(2) {
            assert!((pair[0].offset + pair[1].offset).length() < 1e-6);
        }
        assert!((v.satellites[2].offset - Vec3::new(0.0, -0.04, 0.0)).length() < 1e-6);
        assert!((v.satellites[7].offset - Vec3::new(0.08, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_layout_names() {
        let config: VisualConfig = serde_json::from_str(r#"{ "satellite_layout": "scattered" }"#).unwrap();
        assert_eq!(config.satellite_layout, SatelliteLayout::Scattered);
        assert_eq!(config.satellite_count, 2);
    }

    #[test]
    fn test_fixed_band_is_deterministic() {
        let mut config = VisualConfig::default();
        config.hue_range(200.0, 200.0).lightness_range(0.5, 0.5).satellites(0, 1.0, 1.0);
        let mut sampler = SphericalSampler::seeded(0);
        let v = config.generate(&mut sampler);
        assert_eq!(v.hue, 200.0);
        assert!(v.satellites.is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_hue() {
        let mut config = VisualConfig::default();
        config.hue_range(90.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::VisualRange { name: "hue", .. })
        ));
        assert!(VisualConfig::default().validate().is_ok());
    }
}
