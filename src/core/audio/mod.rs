//! Audio graph abstraction.
//!
//! [`AudioBackend`] is the minimal slice of Web Audio the effects need. The
//! browser implementation lives in the crate-level `audio` module; tests
//! drive the same code through a recording fake.

pub mod graph;
pub mod session;
pub mod sfx;

pub use graph::*;
pub use session::*;
pub use sfx::*;

use super::error::{AudioError, AudioResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Web Audio oscillator type name (`"sine"`, `"square"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sine" => Some(Waveform::Sine),
            "square" => Some(Waveform::Square),
            "sawtooth" | "saw" => Some(Waveform::Sawtooth),
            "triangle" => Some(Waveform::Triangle),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Bandpass,
}

/// Automatable parameter of a node: the level of a gain stage, or the
/// frequency of an oscillator or filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Gain,
    Frequency,
}

/// One automation event on the audio clock (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ramp {
    SetAt(f32, f64),
    LinearTo(f32, f64),
    /// Target must be strictly positive.
    ExponentialTo(f32, f64),
}

/// Handle to an audio context.
///
/// Handles are cheap to clone and refer to the same underlying context.
pub trait AudioBackend: Clone + 'static {
    type Node: Clone + 'static;
    type Buffer: Clone + 'static;

    fn current_time(&self) -> f64;
    fn sample_rate(&self) -> f32;
    fn destination(&self) -> Self::Node;
    fn is_suspended(&self) -> bool;
    fn resume(&self) -> AudioResult<()>;
    fn close(&self) -> AudioResult<()>;

    fn oscillator(&self, waveform: Waveform, frequency_hz: f32) -> AudioResult<Self::Node>;
    /// Mono buffer at the context sample rate.
    fn buffer(&self, samples: &[f32]) -> AudioResult<Self::Buffer>;
    fn buffer_source(&self, buffer: &Self::Buffer, looping: bool) -> AudioResult<Self::Node>;
    fn gain(&self, level: f32) -> AudioResult<Self::Node>;
    fn filter(&self, kind: FilterKind, frequency_hz: f32, q: f32) -> AudioResult<Self::Node>;

    fn connect(&self, from: &Self::Node, to: &Self::Node) -> AudioResult<()>;
    /// Route `from`'s output into `param` of `target` (LFO / FM wiring).
    fn modulate(&self, from: &Self::Node, target: &Self::Node, param: Param) -> AudioResult<()>;
    fn automate(&self, node: &Self::Node, param: Param, ramp: Ramp) -> AudioResult<()>;
    fn start(&self, source: &Self::Node, at: f64) -> AudioResult<()>;
    /// Stop now (`None`) or at a scheduled time. Stopping a source twice is
    /// an error on most hosts.
    fn stop(&self, source: &Self::Node, at: Option<f64>) -> AudioResult<()>;
    fn disconnect(&self, node: &Self::Node);

    /// Connect `nodes` in series.
    fn chain(&self, nodes: &[&Self::Node]) -> AudioResult<()> {
        for pair in nodes.windows(2) {
            self.connect(pair[0], pair[1])?;
        }
        Ok(())
    }

    fn envelope(&self, node: &Self::Node, param: Param, ramps: &[Ramp]) -> AudioResult<()> {
        for ramp in ramps {
            self.automate(node, param, *ramp)?;
        }
        Ok(())
    }
}

/// Factory for audio contexts. Creation is deferred until a user gesture.
pub trait AudioHost {
    type Backend: AudioBackend;

    /// Capability probe; `false` means every audio operation is a no-op.
    fn supports_audio(&self) -> bool;
    fn create_context(&self) -> AudioResult<Self::Backend>;
}

/// Long-lived source node kept for explicit teardown.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceNode<N> {
    Oscillator(N),
    BufferSource(N),
}

impl<N> SourceNode<N> {
    pub fn node(&self) -> &N {
        match self {
            SourceNode::Oscillator(n) | SourceNode::BufferSource(n) => n,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SourceNode::Oscillator(_) => "oscillator",
            SourceNode::BufferSource(_) => "buffer source",
        }
    }

    /// Stop and disconnect. A source that was already stopped is not an error.
    pub fn stop_and_disconnect<B: AudioBackend<Node = N>>(&self, backend: &B) {
        match backend.stop(self.node(), None) {
            Ok(()) | Err(AudioError::Closed) => {}
            Err(e) => log::debug!("[audio] {} already stopped: {}", self.kind(), e),
        }
        backend.disconnect(self.node());
    }
}
