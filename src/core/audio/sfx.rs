//! UI sound effects: short synthesized tones, sample playback and a single
//! cross-faded ambience slot.

use super::{AudioBackend, AudioHost, AudioSession, Param, Ramp, Waveform};
use crate::core::config::SfxConfig;
use crate::core::constants::*;
use crate::core::error::AudioResult;
use rand::prelude::*;
use smallvec::SmallVec;

type Node<H> = <<H as AudioHost>::Backend as AudioBackend>::Node;
type Buffer<H> = <<H as AudioHost>::Backend as AudioBackend>::Buffer;

/// What to loop in the ambience slot.
#[derive(Clone, Debug)]
pub enum AmbienceSource<Buf> {
    /// Frequency-modulated sawtooth engine thrum.
    Synth,
    Buffer(Buf),
}

struct AmbienceVoice<N> {
    sources: SmallVec<[N; 2]>,
    gain: N,
}

impl<N: Clone + 'static> AmbienceVoice<N> {
    fn fade_out<B: AudioBackend<Node = N>>(&self, backend: &B, now: f64) {
        let end = now + AMBIENCE_FADE_OUT_SEC;
        if let Err(e) = backend.automate(&self.gain, Param::Gain, Ramp::ExponentialTo(ENVELOPE_FLOOR, end)) {
            log::debug!("[sfx] ambience fade failed: {}", e);
        }
        for src in &self.sources {
            if let Err(e) = backend.stop(src, Some(end)) {
                log::debug!("[sfx] ambience stop failed: {}", e);
            }
        }
    }
}

pub struct SoundBoard<H: AudioHost> {
    host: H,
    config: SfxConfig,
    supported: Option<bool>,
    session: Option<AudioSession<H::Backend>>,
    muted: bool,
    ambience: Option<AmbienceVoice<Node<H>>>,
    rng: StdRng,
}

impl<H: AudioHost> SoundBoard<H> {
    pub fn new(host: H, config: SfxConfig, seed: u64) -> Self {
        Self {
            host,
            config,
            supported: None,
            session: None,
            muted: false,
            ambience: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn session(&self) -> Option<&AudioSession<H::Backend>> {
        self.session.as_ref()
    }

    pub fn has_ambience(&self) -> bool {
        self.ambience.is_some()
    }

    /// Open (or resume) the session. Call from a user gesture; returns
    /// whether audio is available.
    pub fn unlock(&mut self) -> bool {
        self.ready()
    }

    fn ready(&mut self) -> bool {
        let supported = *self
            .supported
            .get_or_insert_with(|| self.host.supports_audio());
        if !supported {
            return false;
        }
        if self.session.is_none() {
            match AudioSession::open(&self.host, self.config.master_level) {
                Ok(s) => self.session = Some(s),
                Err(e) => {
                    log::error!("[sfx] audio unavailable: {}", e);
                    self.supported = Some(false);
                    return false;
                }
            }
        }
        if let Some(session) = &self.session {
            session.resume_if_suspended();
        }
        true
    }

    fn live_session(&mut self) -> Option<&AudioSession<H::Backend>> {
        if self.ready() {
            self.session.as_ref()
        } else {
            None
        }
    }

    pub fn play_tone(&mut self, frequency_hz: f32, waveform: Waveform, duration_sec: f64, volume: f32) {
        self.play_tone_after(0.0, frequency_hz, waveform, duration_sec, volume);
    }

    /// Like [`play_tone`](Self::play_tone) but starting `delay_sec` from now
    /// on the audio clock.
    pub fn play_tone_after(
        &mut self,
        delay_sec: f64,
        frequency_hz: f32,
        waveform: Waveform,
        duration_sec: f64,
        volume: f32,
    ) {
        if self.muted {
            return;
        }
        let Some(session) = self.live_session() else {
            return;
        };
        let backend = session.backend();
        let start = backend.current_time() + delay_sec;
        if let Err(e) = tone(backend, session.master(), start, frequency_hz, waveform, duration_sec, volume) {
            log::warn!("[sfx] tone {:.0} Hz failed: {}", frequency_hz, e);
        }
    }

    pub fn play_hover(&mut self) {
        self.play_tone(2000.0, Waveform::Sine, 0.05, 0.1);
    }

    pub fn play_click(&mut self) {
        self.play_tone(1200.0, Waveform::Square, 0.05, 0.2);
        self.play_tone_after(0.02, 600.0, Waveform::Triangle, 0.1, 0.2);
    }

    pub fn play_error(&mut self) {
        self.play_tone(150.0, Waveform::Sawtooth, 0.3, 0.3);
    }

    pub fn play_success(&mut self) {
        for (i, hz) in [440.0, 554.0, 659.0, 880.0].into_iter().enumerate() {
            self.play_tone_after(i as f64 * 0.05, hz, Waveform::Sine, 0.2, 0.2);
        }
    }

    pub fn play_typing(&mut self) {
        let drift = self.rng.gen::<f32>() * 200.0 - 100.0;
        self.play_tone(3000.0 + drift, Waveform::Square, 0.02, 0.05);
    }

    /// One-shot playback of a decoded buffer.
    pub fn play_sample(&mut self, buffer: &Buffer<H>, volume: f32) {
        if self.muted {
            return;
        }
        let Some(session) = self.live_session() else {
            return;
        };
        let result = (|| -> AudioResult<()> {
            let backend = session.backend();
            let src = backend.buffer_source(buffer, false)?;
            let gain = backend.gain(volume)?;
            backend.chain(&[&src, &gain, session.master()])?;
            backend.start(&src, backend.current_time())
        })();
        if let Err(e) = result {
            log::warn!("[sfx] sample playback failed: {}", e);
        }
    }

    /// Replace the ambience loop. The previous one fades out; the new one
    /// fades in unless the board is muted.
    pub fn play_ambience(&mut self, source: AmbienceSource<Buffer<H>>, volume: f32) {
        let previous = self.ambience.take();
        let muted = self.muted;
        if !self.ready() {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        let backend = session.backend();
        let now = backend.current_time();
        if let Some(prev) = previous {
            prev.fade_out(backend, now);
        }
        if muted {
            return;
        }
        match start_ambience(backend, session.master(), source, volume, now) {
            Ok(voice) => self.ambience = Some(voice),
            Err(e) => log::warn!("[sfx] ambience failed: {}", e),
        }
    }

    /// Fade out the current ambience, if any.
    pub fn stop_ambience(&mut self) {
        let Some(voice) = self.ambience.take() else {
            return;
        };
        if let Some(session) = &self.session {
            let backend = session.backend();
            voice.fade_out(backend, backend.current_time());
        }
    }

    /// Flip mute and glide the master level. Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        let target = if self.muted { 0.0 } else { self.config.master_level };
        if let Some(session) = &self.session {
            if let Err(e) = session.ramp_master(target, MUTE_RAMP_SEC) {
                log::warn!("[sfx] mute ramp failed: {}", e);
            }
        }
        log::info!("[sfx] muted={}", self.muted);
        self.muted
    }

    /// Stop everything and close the session.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(voice) = self.ambience.take() {
                for src in &voice.sources {
                    _ = session.backend().stop(src, None);
                    session.backend().disconnect(src);
                }
                session.backend().disconnect(&voice.gain);
            }
            session.close();
        }
    }
}

fn tone<B: AudioBackend>(
    backend: &B,
    out: &B::Node,
    start: f64,
    frequency_hz: f32,
    waveform: Waveform,
    duration_sec: f64,
    volume: f32,
) -> AudioResult<()> {
    let osc = backend.oscillator(waveform, frequency_hz)?;
    let gain = backend.gain(0.0)?;
    backend.envelope(
        &gain,
        Param::Gain,
        &[
            Ramp::SetAt(0.0, start),
            Ramp::LinearTo(volume, start + TONE_ATTACK_SEC),
            Ramp::ExponentialTo(ENVELOPE_FLOOR, start + duration_sec),
        ],
    )?;
    backend.chain(&[&osc, &gain, out])?;
    backend.start(&osc, start)?;
    backend.stop(&osc, Some(start + duration_sec))
}

fn start_ambience<B: AudioBackend>(
    backend: &B,
    out: &B::Node,
    source: AmbienceSource<B::Buffer>,
    volume: f32,
    now: f64,
) -> AudioResult<AmbienceVoice<B::Node>> {
    let gain = backend.gain(0.0)?;
    backend.connect(&gain, out)?;
    let mut sources = SmallVec::new();
    match source {
        AmbienceSource::Synth => {
            let hum = backend.oscillator(Waveform::Sawtooth, SYNTH_HUM_HZ)?;
            let wobble = backend.oscillator(Waveform::Sine, SYNTH_MOD_HZ)?;
            let depth = backend.gain(SYNTH_MOD_DEPTH_HZ)?;
            backend.connect(&wobble, &depth)?;
            backend.modulate(&depth, &hum, Param::Frequency)?;
            backend.connect(&hum, &gain)?;
            backend.start(&hum, now)?;
            backend.start(&wobble, now)?;
            sources.push(hum);
            sources.push(wobble);
        }
        AmbienceSource::Buffer(buffer) => {
            let src = backend.buffer_source(&buffer, true)?;
            backend.connect(&src, &gain)?;
            backend.start(&src, now)?;
            sources.push(src);
        }
    }
    backend.envelope(
        &gain,
        Param::Gain,
        &[
            Ramp::SetAt(0.0, now),
            Ramp::LinearTo(volume, now + AMBIENCE_FADE_IN_SEC),
        ],
    )?;
    Ok(AmbienceVoice { sources, gain })
}
