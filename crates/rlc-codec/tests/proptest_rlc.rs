//! Property-based tests for the sliding-window RLC codec.

use proptest::prelude::*;
use rlc_codec::gf256;
use rlc_codec::wire::{Packet, RepairPacket, SourcePacket};
use rlc_codec::{CodecConfig, CodedSymbol, DecodedSymbol, RlcDecoder, RlcEncoder, Symbol, SymbolSet};

fn make_symbols(n: usize, symbol_len: usize, seed: u64) -> Vec<Vec<u8>> {
    (0..n)
        .map(|i| {
            (0..symbol_len)
                .map(|j| {
                    (i as u64)
                        .wrapping_mul(37)
                        .wrapping_add(j as u64)
                        .wrapping_add(seed) as u8
                })
                .collect()
        })
        .collect()
}

/// Feed every source except `missing`, then repairs with keys `1..=repairs`.
fn run_session(
    symbols: &[Vec<u8>],
    missing: &[usize],
    repairs: u16,
) -> (RlcDecoder, Vec<DecodedSymbol>) {
    let cfg = CodecConfig::new(symbols[0].len(), symbols.len()).unwrap();
    let mut enc = RlcEncoder::new(&cfg);
    let mut dec = RlcDecoder::new(&cfg);
    for (i, sym) in symbols.iter().enumerate() {
        enc.add_source_symbol_to_coding_window(sym, i as u32).unwrap();
        if !missing.contains(&i) {
            dec.decode_with_new_source_symbol(sym, i as u32).unwrap();
        }
    }
    let mut recovered = Vec::new();
    for key in 1..=repairs {
        let repair = enc.generate_repair_symbol(key, 0).unwrap();
        recovered.extend(dec.decode_repair_packet(&repair.to_packet().unwrap()).unwrap());
    }
    recovered.sort_by_key(|d| d.id);
    (dec, recovered)
}

// ─── Field Axioms ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn gf256_field_axioms(x in any::<u8>(), y in any::<u8>(), z in any::<u8>()) {
        prop_assert_eq!(gf256::add(x, y), gf256::add(y, x));
        prop_assert_eq!(gf256::mul(x, y), gf256::mul(y, x));
        prop_assert_eq!(gf256::mul(x, 1), x);
        prop_assert_eq!(gf256::add(x, 0), x);
        prop_assert_eq!(gf256::mul(x, 0), 0);
        prop_assert_eq!(
            gf256::mul(x, gf256::add(y, z)),
            gf256::add(gf256::mul(x, y), gf256::mul(x, z))
        );
        prop_assert_eq!(gf256::mul(gf256::mul(x, y), z), gf256::mul(x, gf256::mul(y, z)));
        if x != 0 {
            prop_assert_eq!(gf256::mul(x, gf256::inv(x).unwrap()), 1);
            prop_assert_eq!(gf256::div(gf256::mul(y, x), x).unwrap(), y);
        }
    }
}

// ─── Symbol Algebra ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn symbol_add_is_self_inverse(
        a in prop::collection::vec(any::<u8>(), 1..64),
        seed in any::<u8>(),
    ) {
        let b: Vec<u8> = a.iter().map(|v| v.wrapping_mul(seed).wrapping_add(3)).collect();
        let sa = Symbol::new(a.clone());
        let sb = Symbol::new(b);
        prop_assert_eq!(sa.add(&sb).unwrap().add(&sb).unwrap(), sa.clone());
        prop_assert!(sa.sub(&sa).unwrap().is_all_zero());
    }

    #[test]
    fn symbol_scale_round_trip(
        a in prop::collection::vec(any::<u8>(), 1..64),
        c in 1u8..=255,
    ) {
        let s = Symbol::new(a);
        prop_assert_eq!(s.scale(c).scale_inv(c).unwrap(), s);
    }

    #[test]
    fn coded_symbol_cancels_itself(
        min_id in 0u32..1000,
        coefs in prop::collection::vec(any::<u8>(), 1..8),
        data in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let s = CodedSymbol::from_coefs_and_symbol(min_id, coefs, data).unwrap();
        prop_assert!(s.add(&s).is_zero());
        if let (Some(lo), Some(hi)) = (s.min_id(), s.max_id()) {
            prop_assert!(s.coef(lo) != 0);
            prop_assert!(s.coef(hi) != 0);
        }
    }
}

// ─── Elimination Order Invariance ───────────────────────────────────────────

fn consistent_rows() -> impl Strategy<Value = (Vec<(u32, Vec<u8>)>, Vec<(u32, Vec<u8>)>)> {
    prop::collection::vec(
        (0u32..4, prop::collection::vec(any::<u8>(), 1..=3)),
        1..8,
    )
    .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle()))
}

fn eliminate(rows: &[(u32, Vec<u8>)], sources: &[Vec<u8>]) -> SymbolSet {
    let mut set = SymbolSet::new();
    for (min_id, coefs) in rows {
        let mut data = vec![0u8; sources[0].len()];
        for (k, &c) in coefs.iter().enumerate() {
            gf256::add_scaled_assign(&mut data, c, &sources[*min_id as usize + k]);
        }
        let row = CodedSymbol::from_coefs_and_symbol(*min_id, coefs.clone(), data).unwrap();
        set.add_with_elimination(&row).unwrap();
    }
    set
}

proptest! {
    /// The reduced system does not depend on the order rows arrive in.
    #[test]
    fn elimination_is_order_invariant(
        (rows, shuffled) in consistent_rows(),
        seed in any::<u64>(),
    ) {
        let sources = make_symbols(6, 4, seed);
        let a = eliminate(&rows, &sources);
        let b = eliminate(&shuffled, &sources);
        let a_rows: Vec<_> = a.iter().map(|(id, r)| (id, r.clone())).collect();
        let b_rows: Vec<_> = b.iter().map(|(id, r)| (id, r.clone())).collect();
        prop_assert_eq!(a_rows, b_rows);

        // Every pivot row is normalized and free of the other pivots.
        let pivots: Vec<u32> = a.pivot_ids().collect();
        for (id, row) in a.iter() {
            prop_assert_eq!(row.leading_coef(), Some((id, 1)));
            for &other in &pivots {
                if other != id {
                    prop_assert_eq!(row.coef(other), 0);
                }
            }
        }
    }
}

// ─── Single-Loss Recovery ───────────────────────────────────────────────────

proptest! {
    /// With N source symbols and 1 repair symbol, any single loss is recovered.
    #[test]
    fn rlc_recovers_single_loss(
        n in 2usize..=16,
        missing in 0usize..16,
        symbol_len in 1usize..=64,
        seed in any::<u64>(),
    ) {
        let missing = missing % n;
        let symbols = make_symbols(n, symbol_len, seed);
        let (_, recovered) = run_session(&symbols, &[missing], 1);

        prop_assert_eq!(recovered.len(), 1, "should recover exactly 1 symbol");
        prop_assert_eq!(recovered[0].id, missing as u32);
        prop_assert!(recovered[0].recovered);
        prop_assert_eq!(&recovered[0].data[..], &symbols[missing][..]);
    }
}

// ─── Multi-Loss Recovery ────────────────────────────────────────────────────

proptest! {
    /// `losses + 2` repair symbols recover every loss; rank deficiency over
    /// GF(256) is astronomically unlikely.
    #[test]
    fn rlc_recovers_multiple_losses(
        n in 3usize..=12,
        miss_a in 0usize..12,
        miss_b in 0usize..12,
        symbol_len in 4usize..=32,
        seed in any::<u64>(),
    ) {
        let miss_a = miss_a % n;
        let mut miss_b = miss_b % n;
        if miss_b == miss_a {
            miss_b = (miss_a + 1) % n;
        }
        let symbols = make_symbols(n, symbol_len, seed);
        let (dec, recovered) = run_session(&symbols, &[miss_a, miss_b], 4);

        let mut expected = [miss_a as u32, miss_b as u32];
        expected.sort();
        let ids: Vec<u32> = recovered.iter().map(|d| d.id).collect();
        prop_assert_eq!(ids, expected.to_vec());
        for d in &recovered {
            prop_assert_eq!(&d.data[..], &symbols[d.id as usize][..]);
        }
        prop_assert_eq!(dec.decoded_count(), n);
    }

    #[test]
    fn rlc_no_recovery_when_complete(
        n in 1usize..=16,
        symbol_len in 1usize..=32,
    ) {
        let symbols: Vec<Vec<u8>> = (0..n).map(|i| vec![i as u8; symbol_len]).collect();
        let (dec, recovered) = run_session(&symbols, &[], 2);
        prop_assert!(recovered.is_empty());
        prop_assert_eq!(dec.rank(), n);
    }
}

// ─── Wire Robustness ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn wire_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = SourcePacket::decode(&mut &data[..]);
        let _ = RepairPacket::decode(&mut &data[..]);
        if let Some(pkt) = Packet::decode(&mut &data[..]) {
            prop_assert_eq!(&pkt.to_bytes()[..], &data[..]);
        }
    }

    #[test]
    fn decoder_survives_arbitrary_repairs(
        units in prop::collection::vec(
            (any::<u16>(), any::<u16>(), 0u32..64, 0u32..8, prop::collection::vec(any::<u8>(), 8)),
            0..32,
        ),
    ) {
        let cfg = CodecConfig::new(8, 8)
            .unwrap()
            .with_max_linear_system_size(16)
            .unwrap();
        let mut dec = RlcDecoder::new(&cfg);
        for (key, add_param, first, span, payload) in units {
            if let Ok(decoded) = dec.decode_with_new_repair_symbol(&payload, key, add_param, first, first + span) {
                for d in decoded {
                    prop_assert!(dec.is_decoded(d.id));
                }
            }
        }
    }
}
