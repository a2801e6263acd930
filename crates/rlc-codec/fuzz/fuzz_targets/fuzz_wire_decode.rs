#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use rlc_codec::wire::{Packet, RepairPacket, SourcePacket};

/// Fuzz the unit parsers.
///
/// Decoding must never panic; it returns `None` for anything malformed.
fuzz_target!(|data: &[u8]| {
    let _ = SourcePacket::decode(&mut &data[..]);
    let _ = RepairPacket::decode(&mut &data[..]);

    // Whatever decodes must re-encode to the same bytes.
    if let Some(pkt) = Packet::decode(&mut &data[..]) {
        let mut buf = BytesMut::new();
        pkt.encode(&mut buf);
        assert_eq!(&buf[..], data, "re-encoding changed the unit");
    }
});
