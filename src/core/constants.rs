// Default tuning for every effect. `FxConfig` starts from these values and
// the page may override any of them.

// Starfield population
pub const STAR_COUNT: usize = 800;
pub const HEART_STAR_COUNT: usize = 60;

// Depth bands: (upper depth bound, size span, opacity span, twinkle speed span)
pub const DEPTH_BANDS: [(f32, [f32; 2], [f32; 2], [f32; 2]); 3] = [
    (0.4, [0.2, 1.0], [0.1, 0.4], [0.005, 0.025]), // distant
    (0.8, [0.8, 2.3], [0.3, 0.7], [0.01, 0.04]),   // mid
    (1.0, [1.5, 3.5], [0.5, 1.0], [0.02, 0.07]),   // close
];

// Heart constellation placement (fractions of the viewport)
pub const HEART_CENTER: [f32; 2] = [0.8, 0.3];
pub const HEART_SCALE_DIVISOR: f32 = 40.0;
pub const HEART_FUZZ: f32 = 1.0; // +/- this many scale units of jitter
pub const HEART_SIZE: [f32; 2] = [1.5, 3.5];
pub const HEART_OPACITY: f32 = 0.8;
pub const HEART_TWINKLE: [f32; 2] = [0.02, 0.07];

// Twinkle
pub const TWINKLE_AMPLITUDE: f32 = 0.3;
pub const MIN_STAR_OPACITY: f32 = 0.1;
pub const MAX_STAR_OPACITY: f32 = 1.0;
pub const GLOW_SIZE_THRESHOLD: f32 = 2.0;
pub const GLOW_RADIUS_FACTOR: f32 = 3.0;

// Shooting stars
pub const SHOOTING_STAR_CHANCE: f64 = 0.005; // per frame, roughly one every 3-4 s at 60 fps
pub const SHOOTING_SPAWN_BAND: f32 = 0.4; // spawn within the top 40% of the viewport
pub const SHOOTING_ANGLE_DEG: [f32; 2] = [35.0, 60.0];
pub const SHOOTING_SPEED: [f32; 2] = [15.0, 25.0];
pub const SHOOTING_LENGTH: [f32; 2] = [100.0, 250.0];
pub const SHOOTING_TRAIL_WIDTH: f32 = 1.5;
pub const SHOOTING_HEAD_RADIUS: f32 = 1.0;
pub const SHOOTING_HEAD_BLUR: f32 = 10.0;

// Warp tunnel
pub const WARP_STAR_COUNT: usize = 1000;
pub const WARP_SPEED: f32 = 2.0;
pub const WARP_Z_STEP: f32 = 10.0; // z travelled per frame per unit of speed
pub const WARP_FADE_ALPHA: f32 = 0.3;
pub const WARP_MAX_SIZE: f32 = 3.0;

// Ship ambience
pub const AMBIENCE_MASTER_LEVEL: f32 = 0.3;
pub const NOISE_BUFFER_SECONDS: f32 = 2.0;

pub const BED_CUTOFF_HZ: f32 = 120.0;
pub const BED_LEVEL: f32 = 0.5;

pub const REACTOR_HZ: f32 = 55.0;
pub const REACTOR_CUTOFF_HZ: f32 = 80.0;
pub const REACTOR_LEVEL: f32 = 0.15;
pub const REACTOR_LFO_HZ: f32 = 0.5;
pub const REACTOR_LFO_DEPTH_HZ: f32 = 20.0;

pub const AIR_CENTER_HZ: f32 = 800.0;
pub const AIR_Q: f32 = 1.0;
pub const AIR_LEVEL: f32 = 0.05;
pub const BREATH_LFO_HZ: f32 = 0.1;
pub const BREATH_LFO_DEPTH: f32 = 0.02;

pub const GRAVITY_HZ: f32 = 32.0;
pub const GRAVITY_LEVEL: f32 = 0.3;

pub const BEEP_PITCH_HZ: [f32; 2] = [2000.0, 3000.0];
pub const BEEP_INTERVAL_MS: [f32; 2] = [2000.0, 7000.0];
pub const BEEP_PEAK: f32 = 0.02;
pub const BEEP_ATTACK_SEC: f64 = 0.05;
pub const BEEP_DECAY_SEC: f64 = 0.2;
pub const BEEP_STOP_SEC: f64 = 0.3;

pub const CREAK_PITCH_HZ: [f32; 2] = [100.0, 200.0];
pub const CREAK_INTERVAL_MS: [f32; 2] = [5000.0, 15000.0];
pub const CREAK_DURATION_SEC: [f32; 2] = [1.0, 3.0];
pub const CREAK_Q: f32 = 5.0;
pub const CREAK_PEAK: f32 = 0.05;
pub const CREAK_ATTACK_FRACTION: f64 = 0.2;
pub const CREAK_TAIL_SEC: f64 = 0.5;
/// Longest accepted gap between ambience transients (ten minutes).
pub const MAX_TRANSIENT_INTERVAL_MS: f32 = 600_000.0;

// Sound board
pub const SFX_MASTER_LEVEL: f32 = 0.7;
pub const TONE_ATTACK_SEC: f64 = 0.01;
pub const ENVELOPE_FLOOR: f32 = 0.001; // exponential ramps cannot reach zero
pub const MUTE_RAMP_SEC: f64 = 0.1;
pub const AMBIENCE_FADE_IN_SEC: f64 = 2.0;
pub const AMBIENCE_FADE_OUT_SEC: f64 = 1.0;
pub const SYNTH_HUM_HZ: f32 = 60.0;
pub const SYNTH_MOD_HZ: f32 = 2.0;
pub const SYNTH_MOD_DEPTH_HZ: f32 = 30.0;

// Cursor spring
pub const CURSOR_STIFFNESS: f32 = 700.0;
pub const CURSOR_DAMPING: f32 = 25.0;
pub const CURSOR_HOTSPOT: f32 = 16.0;
pub const CURSOR_START: f32 = -100.0;
pub const CURSOR_SPIN_PERIOD_SEC: f32 = 20.0;
pub const CURSOR_SUBSTEP_SEC: f32 = 1.0 / 240.0;
pub const CURSOR_MAX_DT_SEC: f32 = 0.1;

// Parallax
pub const PARALLAX_SPEED: f32 = 0.15;
pub const PARALLAX_MAX_OFFSET: f32 = 60.0;
pub const PARALLAX_FAST_SCROLL_PX: f32 = 50.0;
pub const PARALLAX_COOLDOWN_MS: f64 = 500.0;
pub const PARALLAX_MIN_VIEWPORT: f32 = 768.0;

// Konami / ice shower
pub const KONAMI_RESET_MS: f64 = 2000.0;
pub const ICE_PARTICLE_COUNT: usize = 50;
pub const ICE_ACTIVE_SEC: f32 = 10.0;
pub const ICE_DURATION_SEC: [f32; 2] = [5.0, 10.0];
pub const ICE_DELAY_SEC: [f32; 2] = [0.0, 2.0];
pub const ICE_GLYPH_PX: f32 = 24.0;

/// Upper bound for any configured particle or star population.
pub const MAX_PARTICLES: usize = 20_000;
