// Host-side tests for the ambience graph and the owned audio session,
// driven through the in-memory backend.

mod common;

use common::{FakeBackend, FakeHost, ManualTimer, NodeKind, FAKE_SAMPLE_RATE};
use nebula_fx::core::constants::MAX_TRANSIENT_INTERVAL_MS;
use nebula_fx::core::*;

fn built_graph() -> (FakeBackend, ManualTimer, AmbienceGraph<FakeBackend>) {
    let backend = FakeBackend::default();
    let timer = ManualTimer::default();
    let mut graph = AmbienceGraph::new(AmbienceConfig::default(), 9);
    let dest = backend.destination();
    graph
        .build(&backend, &dest, &timer)
        .expect("graph builds on a healthy backend");
    (backend, timer, graph)
}

fn tracked_ids(graph: &AmbienceGraph<FakeBackend>) -> Vec<usize> {
    graph.tracked().iter().map(|s| s.node().id).collect()
}

#[test]
fn build_tracks_six_long_lived_sources() {
    let (backend, _timer, graph) = built_graph();
    assert_eq!(graph.tracked().len(), TRACKED_SOURCES);
    assert!(graph.is_complete());

    let noise = graph
        .tracked()
        .iter()
        .filter(|s| matches!(s, SourceNode::BufferSource(_)))
        .count();
    assert_eq!(noise, 2);

    let state = backend.state.borrow();
    for id in tracked_ids(&graph) {
        assert_eq!(state.starts.iter().filter(|(n, _)| *n == id).count(), 1);
    }
    for s in graph.tracked() {
        if let SourceNode::BufferSource(n) = s {
            assert_eq!(n.kind, NodeKind::BufferSource { looping: true });
        }
    }
}

#[test]
fn noise_buffer_is_two_seconds_long() {
    let (backend, _timer, _graph) = built_graph();
    let buffers = backend.state.borrow().buffers.clone();
    assert_eq!(buffers, vec![(FAKE_SAMPLE_RATE * 2.0) as usize]);
}

#[test]
fn continuous_layers_use_the_documented_voices() {
    let (backend, _timer, _graph) = built_graph();
    let oscs = backend.oscillators();
    assert!(oscs.contains(&(Waveform::Sawtooth, 55.0)));
    assert!(oscs.contains(&(Waveform::Sine, 0.5)));
    assert!(oscs.contains(&(Waveform::Sine, 0.1)));
    assert!(oscs.contains(&(Waveform::Sine, 32.0)));
    let state = backend.state.borrow();
    assert_eq!(state.modulations.len(), 2);
    assert!(state
        .modulations
        .iter()
        .any(|(_, _, p)| *p == Param::Frequency));
    assert!(state.modulations.iter().any(|(_, _, p)| *p == Param::Gain));
}

#[test]
fn first_beep_and_creak_fire_at_build() {
    let (backend, timer, graph) = built_graph();
    // Six tracked sources plus one transient beep and one creak.
    assert_eq!(backend.sources().len(), TRACKED_SOURCES + 2);
    assert_eq!(timer.pending(), 2);

    let beep = backend
        .sources()
        .into_iter()
        .find(|n| matches!(n.kind, NodeKind::Oscillator(Waveform::Sine, hz) if (2000.0..=3000.0).contains(&hz)))
        .expect("a beep oscillator");
    assert!(!tracked_ids(&graph).contains(&beep.id));
}

#[test]
fn teardown_stops_and_disconnects_each_source_once() {
    let (backend, _timer, mut graph) = built_graph();
    let ids = tracked_ids(&graph);
    graph.teardown(&backend);
    assert!(graph.tracked().is_empty());
    for id in &ids {
        assert_eq!(backend.stop_count(*id), 1);
        assert_eq!(backend.disconnect_count(*id), 1);
    }

    graph.teardown(&backend);
    for id in &ids {
        assert_eq!(backend.stop_count(*id), 1);
    }
}

#[test]
fn rebuilding_never_accumulates_sources() {
    let backend = FakeBackend::default();
    let timer = ManualTimer::default();
    let dest = backend.destination();
    let mut graph = AmbienceGraph::new(AmbienceConfig::default(), 9);

    let mut previous: Vec<usize> = Vec::new();
    for n in 1..=3 {
        graph.build(&backend, &dest, &timer).expect("build");
        assert_eq!(graph.tracked().len(), TRACKED_SOURCES);
        assert_eq!(graph.build_count(), n);
        for id in &previous {
            assert_eq!(backend.stop_count(*id), 1, "source {} of the last build", id);
        }
        previous = tracked_ids(&graph);
    }
}

#[test]
fn transients_rearm_until_teardown() {
    let (backend, timer, mut graph) = built_graph();
    let before = backend.node_count();
    assert_eq!(timer.fire_all(), 2);
    assert!(backend.node_count() > before);
    assert_eq!(timer.pending(), 2);

    graph.teardown(&backend);
    let after_teardown = backend.node_count();
    timer.fire_all();
    assert_eq!(backend.node_count(), after_teardown);
    assert_eq!(timer.pending(), 0);
}

#[test]
fn transient_delays_follow_their_ranges() {
    let (_backend, timer, _graph) = built_graph();
    let delays = timer.delays();
    assert!((2.0..=7.0).contains(&delays[0].as_secs_f32()), "{:?}", delays);
    assert!((5.0..=15.0).contains(&delays[1].as_secs_f32()), "{:?}", delays);
}

#[test]
fn beep_envelope_and_self_stop() {
    let backend = FakeBackend::default();
    backend.advance(3.0);
    let dest = backend.destination();
    fire_beep(&backend, &dest, 2500.0).expect("beep");

    let osc = backend.sources().pop().expect("oscillator");
    let gain_id = osc.id + 1;
    assert_eq!(
        backend.automations_for(gain_id),
        vec![
            (Param::Gain, Ramp::SetAt(0.0, 3.0)),
            (Param::Gain, Ramp::LinearTo(0.02, 3.0 + 0.05)),
            (Param::Gain, Ramp::ExponentialTo(0.001, 3.0 + 0.2)),
        ]
    );
    assert_eq!(backend.state.borrow().scheduled_stops, vec![(osc.id, 3.0 + 0.3)]);
}

#[test]
fn creak_swells_and_releases() {
    let backend = FakeBackend::default();
    let dest = backend.destination();
    let noise = backend.buffer(&[0.0; 16]).expect("buffer");
    fire_creak(&backend, &dest, &noise, 150.0, 2.0).expect("creak");

    let src = backend.sources().pop().expect("source");
    assert_eq!(src.kind, NodeKind::BufferSource { looping: false });
    let gain_id = src.id + 2;
    let ramps = backend.automations_for(gain_id);
    assert_eq!(ramps[1], (Param::Gain, Ramp::LinearTo(0.05, 0.4)));
    assert_eq!(ramps[2], (Param::Gain, Ramp::LinearTo(0.0, 2.0)));
    assert_eq!(backend.state.borrow().scheduled_stops, vec![(src.id, 2.5)]);
}

#[test]
fn failed_build_keeps_partial_sources_for_teardown() {
    let backend = FakeBackend::default();
    backend.state.borrow_mut().fail_create = Some("filter");
    let timer = ManualTimer::default();
    let dest = backend.destination();
    let mut graph = AmbienceGraph::new(AmbienceConfig::default(), 9);

    let err = graph.build(&backend, &dest, &timer).unwrap_err();
    assert!(matches!(err, AudioError::Create { node: "filter", .. }));
    assert_eq!(graph.tracked().len(), 1);
    assert_eq!(timer.pending(), 0);

    let id = graph.tracked()[0].node().id;
    graph.teardown(&backend);
    assert_eq!(backend.stop_count(id), 1);
}

// ---------------- session ----------------

#[test]
fn session_refuses_unsupported_hosts() {
    let host = FakeHost::unsupported();
    let err = AudioSession::open(&host, 0.3).err();
    assert_eq!(err, Some(AudioError::Unsupported));
    assert_eq!(host.contexts.get(), 0);
    assert_eq!(host.backend.node_count(), 0);
}

#[test]
fn session_routes_master_to_destination_and_resumes() {
    let host = FakeHost::new();
    let session = AudioSession::open(&host, 0.3).expect("session");
    assert_eq!(session.master().kind, NodeKind::Gain(0.3));
    let state = host.backend.state.borrow();
    assert!(state.connections.contains(&(session.master().id, 0)));
    assert_eq!(state.resumes, 1);
    assert!(!state.suspended);
}

#[test]
fn master_ramps_linearly() {
    let host = FakeHost::new();
    let session = AudioSession::open(&host, 0.7).expect("session");
    host.backend.advance(1.0);
    session.ramp_master(0.0, 0.1).expect("ramp");
    assert_eq!(
        host.backend.automations_for(session.master().id),
        vec![(Param::Gain, Ramp::LinearTo(0.0, 1.1))]
    );
}

#[test]
fn session_closes_exactly_once() {
    let host = FakeHost::new();
    let mut session = AudioSession::open(&host, 0.3).expect("session");
    session.close();
    session.close();
    assert!(session.is_closed());
    assert_eq!(session.ramp_master(0.5, 0.1), Err(AudioError::Closed));
    drop(session);
    assert_eq!(host.backend.state.borrow().closes, 1);
}

#[test]
fn dropping_a_session_closes_the_context() {
    let host = FakeHost::new();
    {
        let _session = AudioSession::open(&host, 0.3).expect("session");
    }
    assert!(host.backend.state.borrow().closed);
}

#[test]
fn master_creation_failure_closes_the_context() {
    let host = FakeHost::new();
    host.backend.state.borrow_mut().fail_create = Some("gain");
    assert!(AudioSession::open(&host, 0.3).is_err());
    assert_eq!(host.backend.state.borrow().closes, 1);
}

#[test]
fn stopping_an_already_stopped_source_is_quiet() {
    let (backend, _timer, graph) = built_graph();
    let source = graph.tracked()[0].clone();
    let id = source.node().id;

    source.stop_and_disconnect(&backend);
    source.stop_and_disconnect(&backend);
    assert_eq!(backend.stop_count(id), 2);
    assert_eq!(backend.disconnect_count(id), 2);
}

#[test]
fn oversized_intervals_fall_back_to_the_cap() {
    let backend = FakeBackend::default();
    let timer = ManualTimer::default();
    let dest = backend.destination();
    let config = AmbienceConfig {
        beep_interval_ms: Span::new(1e38, 1e38),
        creak_interval_ms: Span::new(1e38, 1e38),
        ..AmbienceConfig::default()
    };
    let mut graph = AmbienceGraph::new(config, 9);
    graph.build(&backend, &dest, &timer).expect("build");

    let cap = std::time::Duration::from_millis(MAX_TRANSIENT_INTERVAL_MS as u64);
    assert_eq!(timer.delays(), vec![cap, cap]);
}
