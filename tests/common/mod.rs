// Host-side fakes for the browser seams: a recording 2D surface, an in-memory
// audio context, and manually driven frame and timer sources.

#![allow(dead_code)]

use glam::Vec2;
use nebula_fx::core::{
    AudioBackend, AudioError, AudioHost, AudioResult, FilterKind, FrameClock, Param, Ramp, Rgba,
    Surface, Timer, Waveform,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

// ---------------- Surface ----------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Fade(f32),
    Circle { center: Vec2, radius: f32, color: Rgba },
    Glow { center: Vec2, radius: f32 },
    Trail { head: Vec2, tail: Vec2 },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    GlowPoint { center: Vec2 },
    Tint { stops: Vec<(f32, Rgba)> },
    Glyph { center: Vec2, alpha: f32 },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.ops.push(DrawOp::Clear);
    }
    fn fade(&mut self, _width: f32, _height: f32, alpha: f32) {
        self.ops.push(DrawOp::Fade(alpha));
    }
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle { center, radius, color });
    }
    fn radial_glow(&mut self, center: Vec2, radius: f32, _color: Rgba) {
        self.ops.push(DrawOp::Glow { center, radius });
    }
    fn gradient_line(&mut self, head: Vec2, tail: Vec2, _width: f32, _stops: &[(f32, Rgba)]) {
        self.ops.push(DrawOp::Trail { head, tail });
    }
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }
    fn glow_point(&mut self, center: Vec2, _radius: f32, _fill: Rgba, _halo: Rgba, _blur: f32) {
        self.ops.push(DrawOp::GlowPoint { center });
    }
    fn tint(&mut self, _width: f32, _height: f32, stops: &[(f32, Rgba)]) {
        self.ops.push(DrawOp::Tint {
            stops: stops.to_vec(),
        });
    }
    fn glyph(&mut self, _text: &str, center: Vec2, _size: f32, _angle: f32, alpha: f32) {
        self.ops.push(DrawOp::Glyph { center, alpha });
    }
}

// ---------------- Audio ----------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Destination,
    Oscillator(Waveform, f32),
    BufferSource { looping: bool },
    Gain(f32),
    Filter(FilterKind, f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeNode {
    pub id: usize,
    pub kind: NodeKind,
}

impl FakeNode {
    pub fn is_source(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Oscillator(..) | NodeKind::BufferSource { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeBuffer {
    pub len: usize,
}

#[derive(Default)]
pub struct FakeState {
    pub time: f64,
    pub suspended: bool,
    pub closed: bool,
    pub resumes: usize,
    pub closes: usize,
    pub nodes: Vec<FakeNode>,
    pub buffers: Vec<usize>,
    pub connections: Vec<(usize, usize)>,
    pub modulations: Vec<(usize, usize, Param)>,
    pub automations: Vec<(usize, Param, Ramp)>,
    pub starts: Vec<(usize, f64)>,
    pub stops: HashMap<usize, usize>,
    pub scheduled_stops: Vec<(usize, f64)>,
    pub disconnects: HashMap<usize, usize>,
    /// Creation of this node type fails (`"oscillator"`, `"gain"`, ...).
    pub fail_create: Option<&'static str>,
}

/// In-memory audio context. Clones share state.
#[derive(Clone)]
pub struct FakeBackend {
    pub state: Rc<RefCell<FakeState>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                suspended: true,
                ..FakeState::default()
            })),
        }
    }
}

pub const FAKE_SAMPLE_RATE: f32 = 8000.0;

impl FakeBackend {
    fn create(&self, name: &'static str, kind: NodeKind) -> AudioResult<FakeNode> {
        let mut s = self.state.borrow_mut();
        if s.closed {
            return Err(AudioError::Closed);
        }
        if s.fail_create == Some(name) {
            return Err(AudioError::create(name, "injected failure"));
        }
        let node = FakeNode {
            id: s.nodes.len() + 1,
            kind,
        };
        s.nodes.push(node.clone());
        Ok(node)
    }

    pub fn advance(&self, seconds: f64) {
        self.state.borrow_mut().time += seconds;
    }

    pub fn sources(&self) -> Vec<FakeNode> {
        self.state
            .borrow()
            .nodes
            .iter()
            .filter(|n| n.is_source())
            .cloned()
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    pub fn stop_count(&self, id: usize) -> usize {
        self.state.borrow().stops.get(&id).copied().unwrap_or(0)
    }

    pub fn disconnect_count(&self, id: usize) -> usize {
        self.state.borrow().disconnects.get(&id).copied().unwrap_or(0)
    }

    pub fn automations_for(&self, id: usize) -> Vec<(Param, Ramp)> {
        self.state
            .borrow()
            .automations
            .iter()
            .filter(|(n, ..)| *n == id)
            .map(|(_, p, r)| (*p, *r))
            .collect()
    }

    pub fn oscillators(&self) -> Vec<(Waveform, f32)> {
        self.state
            .borrow()
            .nodes
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Oscillator(w, hz) => Some((w, hz)),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for FakeBackend {
    type Node = FakeNode;
    type Buffer = FakeBuffer;

    fn current_time(&self) -> f64 {
        self.state.borrow().time
    }

    fn sample_rate(&self) -> f32 {
        FAKE_SAMPLE_RATE
    }

    fn destination(&self) -> FakeNode {
        FakeNode {
            id: 0,
            kind: NodeKind::Destination,
        }
    }

    fn is_suspended(&self) -> bool {
        self.state.borrow().suspended
    }

    fn resume(&self) -> AudioResult<()> {
        let mut s = self.state.borrow_mut();
        s.suspended = false;
        s.resumes += 1;
        Ok(())
    }

    fn close(&self) -> AudioResult<()> {
        let mut s = self.state.borrow_mut();
        s.closed = true;
        s.closes += 1;
        Ok(())
    }

    fn oscillator(&self, waveform: Waveform, frequency_hz: f32) -> AudioResult<FakeNode> {
        self.create("oscillator", NodeKind::Oscillator(waveform, frequency_hz))
    }

    fn buffer(&self, samples: &[f32]) -> AudioResult<FakeBuffer> {
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        self.state.borrow_mut().buffers.push(samples.len());
        Ok(FakeBuffer { len: samples.len() })
    }

    fn buffer_source(&self, _buffer: &FakeBuffer, looping: bool) -> AudioResult<FakeNode> {
        self.create("buffer source", NodeKind::BufferSource { looping })
    }

    fn gain(&self, level: f32) -> AudioResult<FakeNode> {
        self.create("gain", NodeKind::Gain(level))
    }

    fn filter(&self, kind: FilterKind, frequency_hz: f32, _q: f32) -> AudioResult<FakeNode> {
        self.create("filter", NodeKind::Filter(kind, frequency_hz))
    }

    fn connect(&self, from: &FakeNode, to: &FakeNode) -> AudioResult<()> {
        self.state.borrow_mut().connections.push((from.id, to.id));
        Ok(())
    }

    fn modulate(&self, from: &FakeNode, target: &FakeNode, param: Param) -> AudioResult<()> {
        self.state
            .borrow_mut()
            .modulations
            .push((from.id, target.id, param));
        Ok(())
    }

    fn automate(&self, node: &FakeNode, param: Param, ramp: Ramp) -> AudioResult<()> {
        if let Ramp::ExponentialTo(v, _) = ramp {
            if v <= 0.0 {
                return Err(AudioError::Schedule("exponential target must be positive".into()));
            }
        }
        self.state
            .borrow_mut()
            .automations
            .push((node.id, param, ramp));
        Ok(())
    }

    fn start(&self, source: &FakeNode, at: f64) -> AudioResult<()> {
        self.state.borrow_mut().starts.push((source.id, at));
        Ok(())
    }

    fn stop(&self, source: &FakeNode, at: Option<f64>) -> AudioResult<()> {
        let mut s = self.state.borrow_mut();
        if let Some(t) = at {
            s.scheduled_stops.push((source.id, t));
            return Ok(());
        }
        let count = s.stops.entry(source.id).or_insert(0);
        *count += 1;
        if *count > 1 {
            return Err(AudioError::Playback("InvalidStateError: already stopped".into()));
        }
        Ok(())
    }

    fn disconnect(&self, node: &FakeNode) {
        *self
            .state
            .borrow_mut()
            .disconnects
            .entry(node.id)
            .or_insert(0) += 1;
    }
}

/// Host whose every context is the same inspectable [`FakeBackend`].
#[derive(Clone)]
pub struct FakeHost {
    pub supported: bool,
    pub backend: FakeBackend,
    pub probes: Rc<Cell<usize>>,
    pub contexts: Rc<Cell<usize>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            supported: true,
            backend: FakeBackend::default(),
            probes: Rc::new(Cell::new(0)),
            contexts: Rc::new(Cell::new(0)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }
}

impl AudioHost for FakeHost {
    type Backend = FakeBackend;

    fn supports_audio(&self) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.supported
    }

    fn create_context(&self) -> AudioResult<FakeBackend> {
        if !self.supported {
            return Err(AudioError::Unsupported);
        }
        self.contexts.set(self.contexts.get() + 1);
        Ok(self.backend.clone())
    }
}

// ---------------- Time ----------------

type TimerQueue = Rc<RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>>;

/// `setTimeout` stand-in; callbacks run only when the test fires them.
#[derive(Clone, Default)]
pub struct ManualTimer {
    queue: TimerQueue,
    pub armed: Rc<Cell<usize>>,
}

impl ManualTimer {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.queue.borrow().iter().map(|(d, _)| *d).collect()
    }

    /// Run every callback queued so far (not ones they queue in turn).
    pub fn fire_all(&self) -> usize {
        let due: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let n = due.len();
        for (_, cb) in due {
            cb();
        }
        n
    }
}

impl Timer for ManualTimer {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        self.armed.set(self.armed.get() + 1);
        self.queue.borrow_mut().push((delay, callback));
    }
}

#[derive(Default)]
struct ClockState {
    next_handle: i32,
    queued: Vec<(i32, Box<dyn FnOnce(f64)>)>,
    cancelled: Vec<i32>,
    refuse: bool,
}

/// `requestAnimationFrame` stand-in.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn refusing() -> Self {
        let clock = Self::default();
        clock.state.borrow_mut().refuse = true;
        clock
    }

    pub fn queued(&self) -> usize {
        self.state.borrow().queued.len()
    }

    pub fn cancelled(&self) -> Vec<i32> {
        self.state.borrow().cancelled.clone()
    }

    /// Deliver one frame to every queued callback, including ones whose
    /// handle was cancelled (as if the host had already dispatched them).
    pub fn tick_including_cancelled(&self, ts: f64) -> usize {
        let due: Vec<_> = self.state.borrow_mut().queued.drain(..).collect();
        let n = due.len();
        for (_, cb) in due {
            cb(ts);
        }
        n
    }

    /// Deliver one frame, honouring cancellations.
    pub fn tick(&self, ts: f64) -> usize {
        let due: Vec<_> = {
            let mut s = self.state.borrow_mut();
            let cancelled = s.cancelled.clone();
            s.queued
                .drain(..)
                .filter(|(h, _)| !cancelled.contains(h))
                .collect()
        };
        let n = due.len();
        for (_, cb) in due {
            cb(ts);
        }
        n
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<i32> {
        let mut s = self.state.borrow_mut();
        if s.refuse {
            return None;
        }
        s.next_handle += 1;
        let handle = s.next_handle;
        s.queued.push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: i32) {
        self.state.borrow_mut().cancelled.push(handle);
    }
}
