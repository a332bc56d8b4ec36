//! Gesture-gated startup of the ship ambience.
//!
//! Browsers keep audio contexts suspended until the user interacts with the
//! page, so nothing is created until the first click or key press.

use crate::core::audio::{AmbienceGraph, AudioHost, AudioSession};
use crate::core::config::AmbienceConfig;
use crate::core::error::AudioResult;
use crate::core::schedule::Timer;

/// DOM events that count as an activating gesture.
pub const GESTURE_EVENTS: [&str; 2] = ["click", "keydown"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Armed,
    Fired,
    Disarmed,
}

/// Lets exactly one gesture through.
#[derive(Debug)]
pub struct ActivationGate {
    state: GateState,
}

impl Default for ActivationGate {
    fn default() -> Self {
        Self {
            state: GateState::Armed,
        }
    }
}

impl ActivationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// `true` only for the first call on an armed gate.
    pub fn try_fire(&mut self) -> bool {
        if self.state != GateState::Armed {
            return false;
        }
        self.state = GateState::Fired;
        true
    }

    pub fn disarm(&mut self) {
        self.state = GateState::Disarmed;
    }
}

pub struct ShipAmbience<H: AudioHost, T: Timer> {
    host: H,
    timer: T,
    config: AmbienceConfig,
    gate: ActivationGate,
    session: Option<AudioSession<H::Backend>>,
    graph: AmbienceGraph<H::Backend>,
}

impl<H: AudioHost, T: Timer> ShipAmbience<H, T> {
    pub fn new(host: H, timer: T, config: AmbienceConfig, seed: u64) -> Self {
        let graph = AmbienceGraph::new(config.clone(), seed);
        Self {
            host,
            timer,
            config,
            gate: ActivationGate::new(),
            session: None,
            graph,
        }
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn graph(&self) -> &AmbienceGraph<H::Backend> {
        &self.graph
    }

    pub fn session(&self) -> Option<&AudioSession<H::Backend>> {
        self.session.as_ref()
    }

    /// Handle a click or key press. Returns whether this call activated the
    /// ambience; the listeners can be removed once it has fired.
    pub fn on_gesture(&mut self) -> bool {
        if !self.gate.try_fire() {
            return false;
        }
        if !self.host.supports_audio() {
            log::info!("[ambience] no audio support; staying silent");
            return true;
        }
        if let Err(e) = self.activate() {
            log::error!("[ambience] activation failed: {}", e);
            if let Some(session) = &self.session {
                self.graph.teardown(session.backend());
            }
        }
        true
    }

    fn activate(&mut self) -> AudioResult<()> {
        if self.session.is_none() {
            self.session = Some(AudioSession::open(&self.host, self.config.master_level)?);
        }
        let Some(session) = &self.session else {
            return Ok(());
        };
        session.resume_if_suspended();
        self.graph.build(session.backend(), session.master(), &self.timer)
    }

    /// Stop every layer and close the session. Safe before activation and
    /// safe to repeat.
    pub fn unmount(&mut self) {
        self.gate.disarm();
        if let Some(mut session) = self.session.take() {
            self.graph.teardown(session.backend());
            session.close();
        }
    }
}

impl<H: AudioHost, T: Timer> Drop for ShipAmbience<H, T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
