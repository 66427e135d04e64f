//! Dispense command through the full service: gate open, close, settle.

use petfeeder::actuators::ActuatorState;
use petfeeder::config::SystemConfig;
use petfeeder::protocol::frame::ProtocolRevision;
use petfeeder::protocol::ids::ResponseId;

use crate::mock_hw::{ActuatorCall, Bench};

fn bench() -> Bench {
    Bench::with_config(SystemConfig {
        dispenser_ms_per_gram: 10,
        dispenser_settle_ms: 100,
        dispenser_max_grams: 50,
        ..SystemConfig::default()
    })
}

#[test]
fn start_homes_the_gate() {
    let mut app = petfeeder::app::service::AppService::new(&SystemConfig::default());
    let mut hw = crate::mock_hw::MockHardware::new();
    app.start(&mut hw);
    assert_eq!(hw.calls, vec![ActuatorCall::ToneOff, ActuatorCall::Servo(0)]);
}

#[test]
fn dispense_runs_open_close_settle() {
    let mut bench = bench();
    bench.send(0x20, Some(0x10), &[0x00, 0x14]); // 20 g

    bench.tick_at(1_000);
    assert_eq!(bench.hw.servo_angle(), Some(90));
    assert!(bench.app.dispenser().is_gate_open());
    assert_eq!(bench.app.dispenser().deadline_ms(), Some(1_200));
    assert_eq!(bench.response_ids(), vec![ResponseId::CommandReceived]);

    bench.tick_at(1_201);
    assert_eq!(bench.hw.servo_angle(), Some(0));
    assert_eq!(bench.app.dispenser().state(), ActuatorState::MultiStepTask);
    assert!(bench.responses().is_empty());

    bench.tick_at(1_302);
    assert!(bench.app.dispenser().is_idle());
    let done = bench.responses();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, ResponseId::TaskComplete);
    assert_eq!(done[0].correlation_id, Some(0x10));
    assert_eq!(bench.app.dispenser().total_grams(), 20);
}

#[test]
fn over_limit_quantity_is_invalid() {
    let mut bench = bench();
    bench.send(0x20, None, &[0x00, 0x33]); // 51 g > 50
    bench.tick_at(0);
    assert_eq!(bench.response_ids(), vec![ResponseId::InvalidPayload]);
    assert!(bench.hw.calls.is_empty());
}

#[test]
fn dispense_while_settling_is_busy() {
    let mut bench = bench();
    bench.send(0x20, None, &[0x00, 0x01]);
    bench.tick_at(0);
    bench.tick_at(11);
    bench.send(0x20, None, &[0x00, 0x01]);
    bench.tick_at(12);
    assert_eq!(
        bench.response_ids(),
        vec![ResponseId::CommandReceived, ResponseId::ResourceBusy]
    );
}

#[test]
fn buzzer_and_dispenser_complete_independently() {
    let mut bench = bench();
    bench.send(0x20, Some(1), &[0x00, 0x05]); // open 50 ms, settle 100 ms
    bench.send(0x10, Some(2), &[0x01, 0xB8, 0x00, 0x0A]); // 440 Hz, 10 ms
    bench.tick_at(0);
    bench.responses();

    bench.tick_at(11);
    let first = bench.responses();
    assert_eq!(first.len(), 1);
    assert_eq!((first[0].id, first[0].correlation_id), (ResponseId::TaskComplete, Some(2)));

    bench.tick_at(51);
    bench.tick_at(152);
    let second = bench.responses();
    assert_eq!((second[0].id, second[0].correlation_id), (ResponseId::TaskComplete, Some(1)));
    assert!(bench.app.is_quiescent());
}

#[test]
fn legacy_dispense_has_no_correlation() {
    let mut bench = Bench::new(ProtocolRevision::Legacy);
    bench.send(0x20, None, &[0x00, 0x01]);
    bench.tick_at(0);
    let r = bench.responses();
    assert_eq!(r[0].correlation_id, None);
}
