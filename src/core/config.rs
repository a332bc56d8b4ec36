//! Effect configuration.
//!
//! Every field has a default taken from [`constants`](super::constants), so a
//! page only needs to supply the values it wants to change:
//!
//! ```json
//! { "starfield": { "shootingStarChance": 0.01 }, "ambience": { "masterLevel": 0.2 } }
//! ```

use super::constants::*;
use super::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive-exclusive numeric range sampled uniformly. Written as `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)`. A degenerate span always yields `min`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(invalid(
                field,
                format!("min {} is greater than max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl From<[f32; 2]> for Span {
    fn from(v: [f32; 2]) -> Self {
        Span::new(v[0], v[1])
    }
}

impl From<Span> for [f32; 2] {
    fn from(s: Span) -> Self {
        [s.min, s.max]
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_level(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be a non-negative number")))
    }
}

fn check_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value <= MAX_PARTICLES {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} exceeds the limit of {MAX_PARTICLES}")))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be greater than zero")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarfieldConfig {
    pub star_count: usize,
    pub heart_star_count: usize,
    pub twinkle_amplitude: f32,
    /// Probability of spawning one shooting star per frame.
    pub shooting_star_chance: f64,
    pub shooting_angle_deg: Span,
    pub shooting_speed: Span,
    pub shooting_length: Span,
    /// Fraction of the viewport height (from the top) shooting stars spawn in.
    pub spawn_band: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: STAR_COUNT,
            heart_star_count: HEART_STAR_COUNT,
            twinkle_amplitude: TWINKLE_AMPLITUDE,
            shooting_star_chance: SHOOTING_STAR_CHANCE,
            shooting_angle_deg: SHOOTING_ANGLE_DEG.into(),
            shooting_speed: SHOOTING_SPEED.into(),
            shooting_length: SHOOTING_LENGTH.into(),
            spawn_band: SHOOTING_SPAWN_BAND,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarpConfig {
    pub star_count: usize,
    pub speed: f32,
    pub fade_alpha: f32,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            star_count: WARP_STAR_COUNT,
            speed: WARP_SPEED,
            fade_alpha: WARP_FADE_ALPHA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmbienceConfig {
    pub master_level: f32,
    pub beep_pitch_hz: Span,
    pub beep_interval_ms: Span,
    pub creak_pitch_hz: Span,
    pub creak_interval_ms: Span,
    pub creak_duration_sec: Span,
}

impl Default for AmbienceConfig {
    fn default() -> Self {
        Self {
            master_level: AMBIENCE_MASTER_LEVEL,
            beep_pitch_hz: BEEP_PITCH_HZ.into(),
            beep_interval_ms: BEEP_INTERVAL_MS.into(),
            creak_pitch_hz: CREAK_PITCH_HZ.into(),
            creak_interval_ms: CREAK_INTERVAL_MS.into(),
            creak_duration_sec: CREAK_DURATION_SEC.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SfxConfig {
    pub master_level: f32,
}

impl Default for SfxConfig {
    fn default() -> Self {
        Self {
            master_level: SFX_MASTER_LEVEL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub hotspot: f32,
    pub spin_period_sec: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            stiffness: CURSOR_STIFFNESS,
            damping: CURSOR_DAMPING,
            hotspot: CURSOR_HOTSPOT,
            spin_period_sec: CURSOR_SPIN_PERIOD_SEC,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub speed: f32,
    pub max_offset: f32,
    pub fast_scroll_px: f32,
    pub cooldown_ms: f64,
    pub min_viewport: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: PARALLAX_SPEED,
            max_offset: PARALLAX_MAX_OFFSET,
            fast_scroll_px: PARALLAX_FAST_SCROLL_PX,
            cooldown_ms: PARALLAX_COOLDOWN_MS,
            min_viewport: PARALLAX_MIN_VIEWPORT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IceConfig {
    pub particle_count: usize,
    pub active_sec: f32,
    pub duration_sec: Span,
    pub delay_sec: Span,
    /// Inactivity after which a partly typed Konami code is forgotten.
    pub konami_reset_ms: f64,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            particle_count: ICE_PARTICLE_COUNT,
            active_sec: ICE_ACTIVE_SEC,
            duration_sec: ICE_DURATION_SEC.into(),
            delay_sec: ICE_DELAY_SEC.into(),
            konami_reset_ms: KONAMI_RESET_MS,
        }
    }
}

/// Root configuration for all effects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    pub starfield: StarfieldConfig,
    pub warp: WarpConfig,
    pub ambience: AmbienceConfig,
    pub sfx: SfxConfig,
    pub cursor: CursorConfig,
    pub parallax: ParallaxConfig,
    pub ice: IceConfig,
}

impl FxConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: FxConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.starfield;
        if !(0.0..=1.0).contains(&s.shooting_star_chance) {
            return Err(invalid(
                "starfield.shootingStarChance",
                format!("{} is not a probability", s.shooting_star_chance),
            ));
        }
        if !(s.spawn_band > 0.0 && s.spawn_band <= 1.0) {
            return Err(invalid(
                "starfield.spawnBand",
                format!("{} must be in (0, 1]", s.spawn_band),
            ));
        }
        check_level("starfield.twinkleAmplitude", s.twinkle_amplitude)?;
        s.shooting_angle_deg.check("starfield.shootingAngleDeg")?;
        s.shooting_speed.check("starfield.shootingSpeed")?;
        s.shooting_length.check("starfield.shootingLength")?;
        if s.shooting_speed.min <= 0.0 {
            return Err(invalid("starfield.shootingSpeed", "speed must be greater than zero"));
        }
        if s.shooting_length.min < 0.0 {
            return Err(invalid("starfield.shootingLength", "length must not be negative"));
        }
        check_count("starfield.starCount", s.star_count)?;
        check_count("starfield.heartStarCount", s.heart_star_count)?;
        check_count("warp.starCount", self.warp.star_count)?;

        check_positive("warp.speed", self.warp.speed)?;
        if !(0.0..=1.0).contains(&self.warp.fade_alpha) {
            return Err(invalid(
                "warp.fadeAlpha",
                format!("{} must be in [0, 1]", self.warp.fade_alpha),
            ));
        }

        let a = &self.ambience;
        check_level("ambience.masterLevel", a.master_level)?;
        a.beep_pitch_hz.check("ambience.beepPitchHz")?;
        a.beep_interval_ms.check("ambience.beepIntervalMs")?;
        a.creak_pitch_hz.check("ambience.creakPitchHz")?;
        a.creak_interval_ms.check("ambience.creakIntervalMs")?;
        a.creak_duration_sec.check("ambience.creakDurationSec")?;
        if a.beep_interval_ms.min <= 0.0 || a.creak_interval_ms.min <= 0.0 {
            return Err(invalid(
                "ambience",
                "transient intervals must be greater than zero",
            ));
        }
        if a.beep_interval_ms.max > MAX_TRANSIENT_INTERVAL_MS {
            return Err(invalid(
                "ambience.beepIntervalMs",
                format!("intervals are limited to {MAX_TRANSIENT_INTERVAL_MS} ms"),
            ));
        }
        if a.creak_interval_ms.max > MAX_TRANSIENT_INTERVAL_MS {
            return Err(invalid(
                "ambience.creakIntervalMs",
                format!("intervals are limited to {MAX_TRANSIENT_INTERVAL_MS} ms"),
            ));
        }

        check_level("sfx.masterLevel", self.sfx.master_level)?;

        check_positive("cursor.stiffness", self.cursor.stiffness)?;
        check_level("cursor.damping", self.cursor.damping)?;
        check_positive("cursor.spinPeriodSec", self.cursor.spin_period_sec)?;

        check_level("parallax.speed", self.parallax.speed)?;
        check_level("parallax.maxOffset", self.parallax.max_offset)?;

        check_positive("ice.activeSec", self.ice.active_sec)?;
        check_count("ice.particleCount", self.ice.particle_count)?;
        self.ice.duration_sec.check("ice.durationSec")?;
        self.ice.delay_sec.check("ice.delaySec")?;
        if self.ice.duration_sec.min <= 0.0 {
            return Err(invalid("ice.durationSec", "durations must be positive"));
        }
        if !(self.ice.konami_reset_ms > 0.0) {
            return Err(invalid("ice.konamiResetMs", "must be greater than zero"));
        }
        Ok(())
    }
}
