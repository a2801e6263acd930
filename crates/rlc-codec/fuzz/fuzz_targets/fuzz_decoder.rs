#![no_main]

use libfuzzer_sys::fuzz_target;
use rlc_codec::wire::Packet;
use rlc_codec::{CodecConfig, RlcDecoder};

const SYMBOL_SIZE: usize = 8;

/// Fuzz the decoder with a stream of arbitrary units.
///
/// Input is split into length-prefixed chunks, each parsed as a unit and fed
/// to one decoder. Errors are fine; panics are not.
fuzz_target!(|data: &[u8]| {
    let Ok(config) =
        CodecConfig::new(SYMBOL_SIZE, 8).and_then(|c| c.with_max_linear_system_size(64))
    else {
        return;
    };
    let mut dec = RlcDecoder::new(&config);

    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let len = (len as usize).min(tail.len());
        let (chunk, next) = tail.split_at(len);
        rest = next;

        let outcome = match Packet::decode(&mut &chunk[..]) {
            Some(Packet::Source(p)) => dec.decode_source_packet(&p),
            Some(Packet::Repair(p)) => dec.decode_repair_packet(&p),
            None => continue,
        };
        if let Ok(decoded) = outcome {
            for sym in decoded {
                assert_eq!(sym.data.len(), SYMBOL_SIZE);
                assert!(dec.is_decoded(sym.id));
            }
        }
    }
    let _ = dec.take_removed_ids();
});
