//! Ship ambience: four continuous layers plus randomly re-armed beeps and
//! hull creaks, mixed into one destination.

use super::{AudioBackend, FilterKind, Param, Ramp, SourceNode, Waveform};
use crate::core::config::{AmbienceConfig, Span};
use crate::core::constants::*;
use crate::core::error::AudioResult;
use crate::core::schedule::{RepeatingTask, Timer};
use rand::prelude::*;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Number of long-lived sources a complete build tracks.
pub const TRACKED_SOURCES: usize = 6;

pub struct AmbienceGraph<B: AudioBackend> {
    config: AmbienceConfig,
    sources: SmallVec<[SourceNode<B::Node>; TRACKED_SOURCES]>,
    // Filters, gains and LFO depth stages of the continuous layers.
    stages: SmallVec<[B::Node; 12]>,
    transients: SmallVec<[RepeatingTask; 2]>,
    rng: Rc<RefCell<StdRng>>,
    builds: usize,
}

impl<B: AudioBackend> AmbienceGraph<B> {
    pub fn new(config: AmbienceConfig, seed: u64) -> Self {
        Self {
            config,
            sources: SmallVec::new(),
            stages: SmallVec::new(),
            transients: SmallVec::new(),
            rng: Rc::new(RefCell::new(StdRng::seed_from_u64(seed))),
            builds: 0,
        }
    }

    /// Long-lived sources currently owned by the graph.
    pub fn tracked(&self) -> &[SourceNode<B::Node>] {
        &self.sources
    }

    pub fn build_count(&self) -> usize {
        self.builds
    }

    pub fn is_built(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Whether exactly one complete build's sources are tracked.
    pub fn is_complete(&self) -> bool {
        self.sources.len() == TRACKED_SOURCES
    }

    /// Tear down whatever is playing and wire a fresh graph into
    /// `destination`. On error the partially built nodes stay tracked so a
    /// later `teardown` still reaches them.
    pub fn build<T: Timer>(&mut self, backend: &B, destination: &B::Node, timer: &T) -> AudioResult<()> {
        self.teardown(backend);
        self.builds += 1;

        let noise = {
            let len = (backend.sample_rate() * NOISE_BUFFER_SECONDS) as usize;
            let mut rng = self.rng.borrow_mut();
            let samples: Vec<f32> = (0..len).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();
            backend.buffer(&samples)?
        };
        let t = backend.current_time();

        self.noise_bed(backend, destination, &noise, t)?;
        self.reactor(backend, destination, t)?;
        self.life_support(backend, destination, &noise, t)?;
        self.gravity(backend, destination, t)?;
        self.spawn_transients(backend, destination, &noise, timer);

        log::info!(
            "[ambience] graph built (#{}) with {} tracked sources",
            self.builds,
            self.sources.len()
        );
        Ok(())
    }

    /// Cancel transient tasks, stop and disconnect every tracked source
    /// exactly once and release the layer stages. Safe to call repeatedly.
    pub fn teardown(&mut self, backend: &B) {
        for task in self.transients.drain(..) {
            task.cancel();
        }
        if self.sources.is_empty() && self.stages.is_empty() {
            return;
        }
        let stopped = self.sources.len();
        for source in self.sources.drain(..) {
            source.stop_and_disconnect(backend);
        }
        for stage in self.stages.drain(..) {
            backend.disconnect(&stage);
        }
        log::info!("[ambience] teardown stopped {} sources", stopped);
    }

    fn stage(&mut self, node: AudioResult<B::Node>) -> AudioResult<B::Node> {
        let node = node?;
        self.stages.push(node.clone());
        Ok(node)
    }

    fn oscillator(&mut self, backend: &B, waveform: Waveform, hz: f32) -> AudioResult<B::Node> {
        let node = backend.oscillator(waveform, hz)?;
        self.sources.push(SourceNode::Oscillator(node.clone()));
        Ok(node)
    }

    fn looping_noise(&mut self, backend: &B, noise: &B::Buffer) -> AudioResult<B::Node> {
        let node = backend.buffer_source(noise, true)?;
        self.sources.push(SourceNode::BufferSource(node.clone()));
        Ok(node)
    }

    // Low rumble of the hull.
    fn noise_bed(&mut self, backend: &B, dest: &B::Node, noise: &B::Buffer, t: f64) -> AudioResult<()> {
        let src = self.looping_noise(backend, noise)?;
        let filter = self.stage(backend.filter(FilterKind::Lowpass, BED_CUTOFF_HZ, 1.0))?;
        let gain = self.stage(backend.gain(BED_LEVEL))?;
        backend.chain(&[&src, &filter, &gain, dest])?;
        backend.start(&src, t)
    }

    // Filtered sawtooth whose cutoff pulses with a slow LFO.
    fn reactor(&mut self, backend: &B, dest: &B::Node, t: f64) -> AudioResult<()> {
        let osc = self.oscillator(backend, Waveform::Sawtooth, REACTOR_HZ)?;
        let filter = self.stage(backend.filter(FilterKind::Lowpass, REACTOR_CUTOFF_HZ, 1.0))?;
        let gain = self.stage(backend.gain(REACTOR_LEVEL))?;
        let lfo = self.oscillator(backend, Waveform::Sine, REACTOR_LFO_HZ)?;
        let depth = self.stage(backend.gain(REACTOR_LFO_DEPTH_HZ))?;
        backend.connect(&lfo, &depth)?;
        backend.modulate(&depth, &filter, Param::Frequency)?;
        backend.chain(&[&osc, &filter, &gain, dest])?;
        backend.start(&osc, t)?;
        backend.start(&lfo, t)
    }

    // Band-passed hiss with a very slow breathing swell.
    fn life_support(&mut self, backend: &B, dest: &B::Node, noise: &B::Buffer, t: f64) -> AudioResult<()> {
        let src = self.looping_noise(backend, noise)?;
        let filter = self.stage(backend.filter(FilterKind::Bandpass, AIR_CENTER_HZ, AIR_Q))?;
        let gain = self.stage(backend.gain(AIR_LEVEL))?;
        let lfo = self.oscillator(backend, Waveform::Sine, BREATH_LFO_HZ)?;
        let depth = self.stage(backend.gain(BREATH_LFO_DEPTH))?;
        backend.connect(&lfo, &depth)?;
        backend.modulate(&depth, &gain, Param::Gain)?;
        backend.chain(&[&src, &filter, &gain, dest])?;
        backend.start(&src, t)?;
        backend.start(&lfo, t)
    }

    // Steady sub-bass.
    fn gravity(&mut self, backend: &B, dest: &B::Node, t: f64) -> AudioResult<()> {
        let osc = self.oscillator(backend, Waveform::Sine, GRAVITY_HZ)?;
        let gain = self.stage(backend.gain(GRAVITY_LEVEL))?;
        backend.chain(&[&osc, &gain, dest])?;
        backend.start(&osc, t)
    }

    fn spawn_transients<T: Timer>(&mut self, backend: &B, dest: &B::Node, noise: &B::Buffer, timer: &T) {
        let beep = {
            let (backend, dest, rng) = (backend.clone(), dest.clone(), Rc::clone(&self.rng));
            let pitch = self.config.beep_pitch_hz;
            move || {
                let hz = pitch.sample(&mut *rng.borrow_mut());
                if let Err(e) = fire_beep(&backend, &dest, hz) {
                    log::warn!("[ambience] beep failed: {}", e);
                }
            }
        };
        let beep_delay = interval(Rc::clone(&self.rng), self.config.beep_interval_ms);
        self.transients
            .push(RepeatingTask::spawn(timer, beep, beep_delay));

        let creak = {
            let (backend, dest, noise, rng) = (
                backend.clone(),
                dest.clone(),
                noise.clone(),
                Rc::clone(&self.rng),
            );
            let (pitch, length) = (self.config.creak_pitch_hz, self.config.creak_duration_sec);
            move || {
                let (hz, duration) = {
                    let mut rng = rng.borrow_mut();
                    (pitch.sample(&mut *rng), length.sample(&mut *rng))
                };
                if let Err(e) = fire_creak(&backend, &dest, &noise, hz, duration as f64) {
                    log::warn!("[ambience] creak failed: {}", e);
                }
            }
        };
        let creak_delay = interval(Rc::clone(&self.rng), self.config.creak_interval_ms);
        self.transients
            .push(RepeatingTask::spawn(timer, creak, creak_delay));
    }
}

fn interval(rng: Rc<RefCell<StdRng>>, span_ms: Span) -> impl FnMut() -> Duration {
    move || {
        let ms = span_ms.sample(&mut *rng.borrow_mut()).max(0.0);
        Duration::try_from_secs_f32(ms / 1000.0).unwrap_or_else(|e| {
            log::warn!("[ambience] interval {} ms unusable ({}); capping", ms, e);
            Duration::from_millis(MAX_TRANSIENT_INTERVAL_MS as u64)
        })
    }
}

/// Short console blip. Not tracked: the source stops itself.
pub fn fire_beep<B: AudioBackend>(backend: &B, dest: &B::Node, hz: f32) -> AudioResult<()> {
    let osc = backend.oscillator(Waveform::Sine, hz)?;
    let gain = backend.gain(0.0)?;
    let now = backend.current_time();
    backend.envelope(
        &gain,
        Param::Gain,
        &[
            Ramp::SetAt(0.0, now),
            Ramp::LinearTo(BEEP_PEAK, now + BEEP_ATTACK_SEC),
            Ramp::ExponentialTo(ENVELOPE_FLOOR, now + BEEP_DECAY_SEC),
        ],
    )?;
    backend.chain(&[&osc, &gain, dest])?;
    backend.start(&osc, now)?;
    backend.stop(&osc, Some(now + BEEP_STOP_SEC))
}

/// Slow band-passed noise swell. Not tracked: the source stops itself.
pub fn fire_creak<B: AudioBackend>(
    backend: &B,
    dest: &B::Node,
    noise: &B::Buffer,
    hz: f32,
    duration: f64,
) -> AudioResult<()> {
    let src = backend.buffer_source(noise, false)?;
    let filter = backend.filter(FilterKind::Bandpass, hz, CREAK_Q)?;
    let gain = backend.gain(0.0)?;
    let now = backend.current_time();
    backend.envelope(
        &gain,
        Param::Gain,
        &[
            Ramp::SetAt(0.0, now),
            Ramp::LinearTo(CREAK_PEAK, now + duration * CREAK_ATTACK_FRACTION),
            Ramp::LinearTo(0.0, now + duration),
        ],
    )?;
    backend.chain(&[&src, &filter, &gain, dest])?;
    backend.start(&src, now)?;
    backend.stop(&src, Some(now + duration + CREAK_TAIL_SEC))
}
