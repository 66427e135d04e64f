//! End-to-end command scenarios: bytes in on the scripted serial link,
//! actuator calls and response frames out.

use petfeeder::actuators::ActuatorState;
use petfeeder::protocol::frame::ProtocolRevision;
use petfeeder::protocol::ids::ResponseId;

use crate::mock_hw::{ActuatorCall, Bench, Response};

const TONE_400HZ_100MS: [u8; 4] = [0x01, 0x90, 0x00, 0x64];

// ── Scenario A: reference simple-tone frame ───────────────────

#[test]
fn reference_tone_frame_starts_simple_task() {
    let mut bench = Bench::new(ProtocolRevision::Legacy);
    bench
        .serial
        .push(&[0xAA, 0x10, 0x04, 0x01, 0x90, 0x00, 0x64, 0x4B]);

    assert_eq!(bench.tick_at(5_000), 1);
    assert_eq!(bench.app.buzzer().state(), ActuatorState::SimpleTask);
    assert_eq!(bench.app.buzzer().deadline_ms(), Some(5_100));
    assert_eq!(bench.hw.calls, vec![ActuatorCall::ToneOn(400)]);
    assert_eq!(
        bench.responses(),
        vec![Response {
            id: ResponseId::CommandReceived,
            correlation_id: None,
            payload: vec![],
        }]
    );

    bench.tick_at(5_100);
    assert!(bench.responses().is_empty(), "deadline reached but not passed");

    bench.tick_at(5_101);
    assert!(bench.app.buzzer().is_idle());
    assert_eq!(bench.hw.tone(), None);
    assert_eq!(bench.response_ids(), vec![ResponseId::TaskComplete]);
}

// ── Scenario B: short payload ─────────────────────────────────

#[test]
fn short_tone_payload_is_invalid_and_changes_nothing() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x10, Some(0x31), &[0x01, 0x90, 0x00]);

    bench.tick_at(0);
    assert!(bench.app.buzzer().is_idle());
    assert!(bench.hw.calls.is_empty());
    assert_eq!(
        bench.responses(),
        vec![Response {
            id: ResponseId::InvalidPayload,
            correlation_id: Some(0x31),
            payload: vec![],
        }]
    );
}

// ── Scenario C: melody runs to completion ─────────────────────

#[test]
fn melody_plays_each_note_for_one_beat() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x11, Some(7), &[0x00, 0x78, 0x02, 0x01, 0xB8, 0x03, 0x70]);

    bench.tick_at(0);
    assert_eq!(bench.app.buzzer().state(), ActuatorState::MultiStepTask);
    assert_eq!(bench.app.buzzer().melody().unwrap().note_duration_ms(), 500);
    assert_eq!(bench.app.buzzer().deadline_ms(), Some(500));
    assert_eq!(bench.response_ids(), vec![ResponseId::CommandReceived]);

    bench.tick_at(501);
    assert_eq!(bench.hw.tone(), Some(880));
    assert!(bench.responses().is_empty());

    bench.tick_at(1_002);
    assert!(bench.app.buzzer().is_idle());
    assert_eq!(
        bench.hw.calls,
        vec![
            ActuatorCall::ToneOn(440),
            ActuatorCall::ToneOff,
            ActuatorCall::ToneOn(880),
            ActuatorCall::ToneOff,
        ]
    );

    let done = bench.responses();
    assert_eq!(done.len(), 1, "exactly one completion");
    assert_eq!(done[0].id, ResponseId::TaskComplete);
    assert_eq!(done[0].correlation_id, Some(7));

    bench.tick_at(5_000);
    assert!(bench.responses().is_empty());
}

// ── Scenario D: unknown command ───────────────────────────────

#[test]
fn unknown_command_echoes_offending_id() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0xFF, Some(2), &[]);

    bench.tick_at(0);
    assert_eq!(
        bench.responses(),
        vec![Response {
            id: ResponseId::UnknownCommand,
            correlation_id: Some(2),
            payload: vec![0xFF],
        }]
    );
}

// ── Scenario E: melody while a tone is running ────────────────

#[test]
fn melody_during_tone_is_busy_and_keeps_deadline() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x10, Some(1), &TONE_400HZ_100MS);
    bench.tick_at(1_000);
    let deadline = bench.app.buzzer().deadline_ms();

    bench.send(0x11, Some(2), &[0x00, 0x78, 0x01, 0x01, 0xB8]);
    bench.tick_at(1_050);

    assert_eq!(bench.app.buzzer().state(), ActuatorState::SimpleTask);
    assert_eq!(bench.app.buzzer().deadline_ms(), deadline);
    let ids: Vec<_> = bench
        .responses()
        .into_iter()
        .map(|r| (r.id, r.correlation_id))
        .collect();
    assert_eq!(
        ids,
        vec![
            (ResponseId::CommandReceived, Some(1)),
            (ResponseId::ResourceBusy, Some(2)),
        ]
    );
}

// ── Ordering and idempotence ──────────────────────────────────

#[test]
fn back_to_back_frames_are_dispatched_in_order() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x10, Some(1), &TONE_400HZ_100MS);
    bench.send(0x10, Some(2), &TONE_400HZ_100MS);
    bench.send(0x42, Some(3), &[]);

    assert_eq!(bench.tick_at(0), 3);
    let got: Vec<_> = bench
        .responses()
        .into_iter()
        .map(|r| (r.id, r.correlation_id))
        .collect();
    assert_eq!(
        got,
        vec![
            (ResponseId::CommandReceived, Some(1)),
            (ResponseId::ResourceBusy, Some(2)),
            (ResponseId::UnknownCommand, Some(3)),
        ]
    );
}

#[test]
fn sequential_tones_behave_identically() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    let mut runs = Vec::new();

    for (start, freq) in [(0u64, 400u16), (1_000, 1_000)] {
        let f = freq.to_be_bytes();
        bench.send(0x10, None, &[f[0], f[1], 0x00, 0x64]);
        bench.tick_at(start);
        let deadline = bench.app.buzzer().deadline_ms().unwrap() - start;
        bench.tick_at(start + 101);
        runs.push((deadline, bench.app.buzzer().is_idle(), bench.response_ids()));
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(
        runs[0],
        (100, true, vec![ResponseId::CommandReceived, ResponseId::TaskComplete])
    );
}

#[test]
fn clock_is_read_once_per_tick() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x10, None, &TONE_400HZ_100MS);
    bench.send(0x20, None, &[0x00, 0x01]);
    bench.tick_at(0);
    bench.tick_at(10);
    assert_eq!(bench.clock.reads.get(), 2);
}
