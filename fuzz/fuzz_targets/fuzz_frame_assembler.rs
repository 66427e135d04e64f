//! Fuzz target: `FrameAssembler::feed`
//!
//! Drives arbitrary byte sequences through the assembler under both protocol
//! revisions and asserts it never panics, never yields a payload longer than
//! the revision allows, and returns to the start-marker search after a
//! reset.
//!
//! cargo fuzz run fuzz_frame_assembler

#![no_main]

use libfuzzer_sys::fuzz_target;
use petfeeder::protocol::assembler::FrameAssembler;
use petfeeder::protocol::frame::{encode_frame, ProtocolRevision};

fuzz_target!(|data: &[u8]| {
    for revision in [ProtocolRevision::Legacy, ProtocolRevision::Correlated] {
        let mut assembler = FrameAssembler::new(revision);

        for &byte in data {
            if let Some(packet) = assembler.feed(byte) {
                assert!(packet.payload().len() <= revision.max_payload());
                assert_eq!(packet.correlation_id().is_some(), revision.has_correlation());

                // Anything accepted must re-encode to a frame that decodes
                // to the same packet.
                let frame = encode_frame(
                    revision,
                    packet.command_id(),
                    packet.correlation_id(),
                    packet.payload(),
                )
                .expect("accepted payload must re-encode");
                let mut check = FrameAssembler::new(revision);
                let echoed = frame.iter().find_map(|&b| check.feed(b));
                assert_eq!(echoed.as_ref(), Some(&packet));
            }
        }

        let stats = assembler.stats();
        assert!(stats.accepted as usize <= data.len());

        assembler.reset();
        assert!(assembler.is_idle());
    }
});
