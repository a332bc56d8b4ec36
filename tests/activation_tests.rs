// Host-side tests for gesture-gated ambience startup and unmount.

mod common;

use common::{FakeHost, ManualTimer, NodeKind};
use nebula_fx::core::*;

fn ambience(host: &FakeHost, timer: &ManualTimer) -> ShipAmbience<FakeHost, ManualTimer> {
    ShipAmbience::new(host.clone(), timer.clone(), AmbienceConfig::default(), 21)
}

#[test]
fn gate_fires_exactly_once() {
    let mut gate = ActivationGate::new();
    assert_eq!(gate.state(), GateState::Armed);
    assert!(gate.try_fire());
    assert!(!gate.try_fire());
    assert_eq!(gate.state(), GateState::Fired);
    gate.disarm();
    assert!(!gate.try_fire());
    assert_eq!(gate.state(), GateState::Disarmed);
}

#[test]
fn nothing_is_created_before_a_gesture() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    let amb = ambience(&host, &timer);
    assert_eq!(host.contexts.get(), 0);
    assert_eq!(host.backend.node_count(), 0);
    assert!(amb.session().is_none());
    assert_eq!(GESTURE_EVENTS, ["click", "keydown"]);
}

#[test]
fn first_gesture_builds_the_graph() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);

    assert!(amb.on_gesture());
    assert!(amb.graph().is_complete());
    assert_eq!(host.contexts.get(), 1);

    let session = amb.session().expect("session opened");
    assert_eq!(session.master().kind, NodeKind::Gain(0.3));
    assert_eq!(host.backend.state.borrow().resumes, 1);
}

#[test]
fn later_gestures_are_ignored() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);
    assert!(amb.on_gesture());
    let nodes = host.backend.node_count();

    assert!(!amb.on_gesture());
    assert!(!amb.on_gesture());
    assert_eq!(amb.graph().build_count(), 1);
    assert_eq!(host.contexts.get(), 1);
    assert_eq!(host.backend.node_count(), nodes);
}

#[test]
fn unsupported_host_stays_silent() {
    let host = FakeHost::unsupported();
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);
    assert!(amb.on_gesture());
    assert_eq!(host.contexts.get(), 0);
    assert_eq!(host.backend.node_count(), 0);
    assert_eq!(timer.pending(), 0);
    assert!(!amb.on_gesture());
}

#[test]
fn unmount_before_activation_is_harmless() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);
    amb.unmount();
    amb.unmount();
    assert_eq!(amb.gate_state(), GateState::Disarmed);
    assert!(!amb.on_gesture());
    assert_eq!(host.contexts.get(), 0);
    assert_eq!(host.backend.state.borrow().closes, 0);
}

#[test]
fn unmount_stops_every_layer_and_closes() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);
    amb.on_gesture();
    let ids: Vec<usize> = amb.graph().tracked().iter().map(|s| s.node().id).collect();
    assert_eq!(ids.len(), TRACKED_SOURCES);

    amb.unmount();
    for id in &ids {
        assert_eq!(host.backend.stop_count(*id), 1);
    }
    assert!(amb.session().is_none());
    assert_eq!(host.backend.state.borrow().closes, 1);

    let nodes = host.backend.node_count();
    timer.fire_all();
    assert_eq!(host.backend.node_count(), nodes);
    assert_eq!(timer.pending(), 0);

    amb.unmount();
    assert_eq!(host.backend.state.borrow().closes, 1);
}

#[test]
fn dropping_the_ambience_closes_the_context() {
    let host = FakeHost::new();
    let timer = ManualTimer::default();
    {
        let mut amb = ambience(&host, &timer);
        amb.on_gesture();
    }
    assert!(host.backend.state.borrow().closed);
    assert_eq!(host.backend.state.borrow().closes, 1);
}

#[test]
fn failed_build_is_logged_and_cleaned_up() {
    let host = FakeHost::new();
    host.backend.state.borrow_mut().fail_create = Some("filter");
    let timer = ManualTimer::default();
    let mut amb = ambience(&host, &timer);

    assert!(amb.on_gesture());
    assert!(amb.graph().tracked().is_empty());
    assert!(!amb.graph().is_complete());
    let noise = host
        .backend
        .sources()
        .into_iter()
        .find(|n| matches!(n.kind, NodeKind::BufferSource { .. }))
        .expect("partial noise source");
    assert_eq!(host.backend.stop_count(noise.id), 1);
    assert_eq!(timer.pending(), 0);
}
