// Shared layout and animation tuning. Stage coordinates are logical pixels;
// surfaces scale the stage to fit their backing store.

// Stage
pub const STAGE_WIDTH: f32 = 400.0;
pub const STAGE_HEIGHT: f32 = 300.0;
pub const GROUND_Y: f32 = 260.0;

// Frame clock
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // longer gaps (tab switch) are clamped

// Target easing time constants (seconds)
pub const EASE_RISE_TAU_SEC: f32 = 0.10;
pub const EASE_FALL_TAU_SEC: f32 = 0.45;

// Wobble character
pub const WOBBLE_RADIUS: f32 = 42.0;
pub const WOBBLE_EYE_RADIUS: f32 = 6.0;
pub const WOBBLE_SIZE_RANGE: (f32, f32) = (0.25, 2.5);
pub const WOBBLE_STRETCH_RANGE: (f32, f32) = (0.3, 1.7);
pub const WOBBLE_BOB_PX: f32 = 10.0; // vertical bob at full oscillation
pub const WOBBLE_DRIFT_PX_PER_SEC: f32 = 60.0; // per unit of speed channel
pub const WOBBLE_SHAKE_MAX_PX: f32 = 12.0;
pub const GLOW_MAX_PX: f32 = 36.0;
pub const GLOW_MAX_INTENSITY: f32 = 2.0;

// Projectile
pub const PROJECTILE_ORIGIN_X: f32 = 28.0;
pub const PROJECTILE_PX_PER_METRE: f32 = 340.0 / 150.0;
pub const PROJECTILE_APEX_MAX_PX: f32 = 220.0;
pub const PROJECTILE_BALL_RADIUS: f32 = 9.0;
pub const TRAJECTORY_SAMPLES: usize = 48;
pub const FLIGHT_TIME_SCALE: f32 = 0.35; // animated seconds per physical second
pub const FLIGHT_SECONDS_RANGE: (f32, f32) = (0.6, 3.0);
pub const LANDING_PAUSE_SEC: f32 = 0.5;

// Wave
pub const WAVE_SAMPLES: usize = 96;
pub const WAVE_AMPLITUDE_PX: f32 = 42.0;
pub const WAVE_PX_PER_METRE: f32 = 36.0;
pub const WAVE_CENTER_Y: f32 = 150.0;

// Pendulum
pub const PENDULUM_PIVOT: [f32; 2] = [200.0, 30.0];
pub const PENDULUM_PX_PER_METRE: f32 = 44.0;
pub const PENDULUM_BOB_RADIUS: f32 = 16.0;

// Labels
pub const LABEL_SIZE_PX: f32 = 16.0;
pub const LABEL_Y: f32 = 288.0;
