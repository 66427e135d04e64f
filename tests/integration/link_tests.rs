//! Serial link robustness: noise, corruption, chunking and read faults.

use petfeeder::protocol::frame::{ProtocolRevision, encode_frame};
use petfeeder::protocol::ids::ResponseId;

use crate::mock_hw::Bench;

#[test]
fn noise_before_frame_is_ignored() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.serial.push(&[0x00, 0x13, 0x37]);
    bench.send(0x10, Some(5), &[0x01, 0x90, 0x00, 0x64]);

    bench.tick_at(0);
    assert_eq!(bench.response_ids(), vec![ResponseId::CommandReceived]);
    assert_eq!(bench.app.assembler_stats().skipped_bytes, 3);
}

#[test]
fn corrupted_frame_is_dropped_silently() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    let mut frame = encode_frame(ProtocolRevision::Correlated, 0x10, Some(1), &[0x01, 0x90, 0x00, 0x64])
        .unwrap();
    let last = frame.len() - 1;
    frame[last] ^= 0x01;
    bench.serial.push(&frame);

    bench.tick_at(0);
    assert!(bench.responses().is_empty());
    assert!(bench.app.buzzer().is_idle());
    assert_eq!(bench.app.assembler_stats().bad_checksum, 1);

    // The link recovers on the next good frame.
    bench.send(0x10, Some(2), &[0x01, 0x90, 0x00, 0x64]);
    bench.tick_at(1);
    assert_eq!(bench.response_ids(), vec![ResponseId::CommandReceived]);
}

#[test]
fn frame_split_across_ticks_is_assembled() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    let frame = encode_frame(ProtocolRevision::Correlated, 0x10, Some(9), &[0x01, 0x90, 0x00, 0x64])
        .unwrap();
    let (head, tail) = frame.split_at(5);

    bench.serial.push(head);
    assert_eq!(bench.tick_at(0), 0);
    assert!(bench.responses().is_empty());

    bench.serial.push(tail);
    assert_eq!(bench.tick_at(1), 1);
    assert_eq!(bench.app.buzzer().deadline_ms(), Some(101));
}

#[test]
fn read_fault_ends_the_drain_but_actuators_still_update() {
    let mut bench = Bench::new(ProtocolRevision::Correlated);
    bench.send(0x10, None, &[0x01, 0x90, 0x00, 0x64]);
    bench.tick_at(0);
    bench.responses();

    bench.serial.fail_reads = true;
    bench.tick_at(200);
    assert!(bench.app.buzzer().is_idle());
    assert_eq!(bench.response_ids(), vec![ResponseId::TaskComplete]);
}
