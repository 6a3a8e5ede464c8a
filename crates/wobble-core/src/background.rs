//! Knobs and clock for the animated background behind the stage. The web
//! renderer uploads [`BackgroundUniforms`] once per frame; everything else
//! about the effect lives in `shaders/background.wgsl`.

use serde::{Deserialize, Serialize};

/// Shader time wraps at this period to keep `f32` precision.
const TIME_WRAP_SEC: f64 = 3600.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundParams {
    pub rotation_speed: f32,
    pub contrast: f32,
    pub warp: f32,
    /// Kaleidoscope fold count; rounded to a whole number by `sanitized`.
    pub symmetry: f32,
    pub flow_speed: f32,
    pub vortex: f32,
    pub noise_scale: f32,
    pub ripple: f32,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            rotation_speed: 0.15,
            contrast: 1.2,
            warp: 0.6,
            symmetry: 6.0,
            flow_speed: 0.4,
            vortex: 0.5,
            noise_scale: 2.0,
            ripple: 0.3,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl BackgroundParams {
    /// Clamp every knob into the range the shader is tuned for. Non-finite
    /// values fall back to the default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            rotation_speed: clamp_or(self.rotation_speed, 0.0, 2.0, d.rotation_speed),
            contrast: clamp_or(self.contrast, 0.0, 3.0, d.contrast),
            warp: clamp_or(self.warp, 0.0, 2.0, d.warp),
            symmetry: clamp_or(self.symmetry, 1.0, 16.0, d.symmetry).round(),
            flow_speed: clamp_or(self.flow_speed, 0.0, 3.0, d.flow_speed),
            vortex: clamp_or(self.vortex, 0.0, 2.0, d.vortex),
            noise_scale: clamp_or(self.noise_scale, 0.1, 8.0, d.noise_scale),
            ripple: clamp_or(self.ripple, 0.0, 2.0, d.ripple),
        }
    }

    /// Calmer variant used when the user asked for reduced motion.
    pub fn calmed(self) -> Self {
        Self {
            rotation_speed: self.rotation_speed * 0.2,
            flow_speed: self.flow_speed * 0.2,
            ripple: 0.0,
            ..self
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub rotation_speed: f32,
    pub contrast: f32,
    pub warp: f32,
    pub symmetry: f32,
    pub flow_speed: f32,
    pub vortex: f32,
    pub noise_scale: f32,
    pub ripple: f32,
    pub _pad: f32,
}

#[derive(Clone, Debug, Default)]
pub struct BackgroundEffect {
    params: BackgroundParams,
    time: f64,
}

impl BackgroundEffect {
    pub fn new(params: BackgroundParams) -> Self {
        Self {
            params: params.sanitized(),
            time: 0.0,
        }
    }

    #[inline]
    pub fn params(&self) -> &BackgroundParams {
        &self.params
    }

    pub fn set_params(&mut self, params: BackgroundParams) {
        self.params = params.sanitized();
    }

    /// Seconds accumulated through [`advance`](Self::advance).
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Move the clock forward. Negative or non-finite steps are ignored so
    /// time never runs backwards.
    pub fn advance(&mut self, dt_sec: f32) {
        if dt_sec.is_finite() && dt_sec > 0.0 {
            self.time += dt_sec as f64;
        }
    }

    pub fn uniforms(&self, resolution: [f32; 2]) -> BackgroundUniforms {
        let p = &self.params;
        BackgroundUniforms {
            resolution,
            time: (self.time % TIME_WRAP_SEC) as f32,
            rotation_speed: p.rotation_speed,
            contrast: p.contrast,
            warp: p.warp,
            symmetry: p.symmetry,
            flow_speed: p.flow_speed,
            vortex: p.vortex,
            noise_scale: p.noise_scale,
            ripple: p.ripple,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_monotonic() {
        let mut fx = BackgroundEffect::default();
        fx.advance(0.5);
        fx.advance(-1.0);
        fx.advance(f32::NAN);
        fx.advance(f32::INFINITY);
        assert_eq!(fx.time(), 0.5);
        fx.advance(0.25);
        assert_eq!(fx.time(), 0.75);
    }

    #[test]
    fn sanitized_clamps_and_repairs() {
        let p = BackgroundParams {
            contrast: 99.0,
            symmetry: 5.6,
            noise_scale: 0.0,
            warp: f32::NAN,
            ..BackgroundParams::default()
        }
        .sanitized();
        assert_eq!(p.contrast, 3.0);
        assert_eq!(p.symmetry, 6.0);
        assert_eq!(p.noise_scale, 0.1);
        assert_eq!(p.warp, BackgroundParams::default().warp);
    }

    #[test]
    fn set_params_keeps_the_clock() {
        let mut fx = BackgroundEffect::default();
        fx.advance(2.0);
        fx.set_params(BackgroundParams::default().calmed());
        assert_eq!(fx.time(), 2.0);
        assert_eq!(fx.params().ripple, 0.0);
        fx.set_params(BackgroundParams {
            symmetry: 40.0,
            ..BackgroundParams::default()
        });
        assert_eq!(fx.params().symmetry, 16.0);
    }

    #[test]
    fn uniforms_are_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<BackgroundUniforms>() % 16, 0);
        let fx = BackgroundEffect::new(BackgroundParams::default());
        let u = fx.uniforms([800.0, 600.0]);
        assert_eq!(u.resolution, [800.0, 600.0]);
        assert_eq!(bytemuck::bytes_of(&u).len(), 48);
    }
}
