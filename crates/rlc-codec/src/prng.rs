//! # TinyMT32
//!
//! The 127-bit-state Mersenne Twister variant used by the RLC FEC scheme to
//! derive coding coefficients. Both ends of a session must produce the exact
//! same sequence for a given seed, so the parameter set is fixed.

const MAT1: u32 = 0x8f70_11ee;
const MAT2: u32 = 0xfc78_ff1f;
const TMAT: u32 = 0x3793_fdff;

const SH0: u32 = 1;
const SH1: u32 = 10;
const SH8: u32 = 8;
const MASK: u32 = 0x7fff_ffff;

const MIN_LOOP: usize = 8;
const PRE_LOOP: usize = 8;

#[derive(Clone, Debug)]
pub struct TinyMt32 {
    status: [u32; 4],
}

impl TinyMt32 {
    pub fn new(seed: u32) -> Self {
        let mut status = [seed, MAT1, MAT2, TMAT];
        for i in 1..MIN_LOOP {
            let prev = status[(i - 1) & 3];
            status[i & 3] ^= (i as u32)
                .wrapping_add(1_812_433_253u32.wrapping_mul(prev ^ (prev >> 30)));
        }
        let mut rng = TinyMt32 { status };
        for _ in 0..PRE_LOOP {
            rng.next_state();
        }
        rng
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.next_state();
        self.temper()
    }

    /// Uniform integer in `0..maxv`, by rejection over equal-size buckets.
    pub fn rand(&mut self, maxv: u32) -> u32 {
        assert!(maxv > 0, "rand range must be non-empty");
        let buckets = u32::MAX / maxv;
        let limit = buckets * maxv;
        loop {
            let r = self.next_u32();
            if r < limit {
                return r / buckets;
            }
        }
    }

    pub fn rand256(&mut self) -> u8 {
        self.rand(256) as u8
    }

    pub fn rand16(&mut self) -> u8 {
        self.rand(16) as u8
    }

    fn next_state(&mut self) {
        let s = &mut self.status;
        let mut y = s[3];
        let mut x = (s[0] & MASK) ^ s[1] ^ s[2];
        x ^= x << SH0;
        y ^= (y >> SH0) ^ x;
        s[0] = s[1];
        s[1] = s[2];
        s[2] = x ^ (y << SH1);
        s[3] = y;
        // All ones when the low bit of y is set.
        let lsb_mask = (y & 1).wrapping_neg();
        s[1] ^= lsb_mask & MAT1;
        s[2] ^= lsb_mask & MAT2;
    }

    fn temper(&self) -> u32 {
        let s = &self.status;
        let mut t0 = s[3];
        let t1 = s[0].wrapping_add(s[2] >> SH8);
        t0 ^= t1;
        t0 ^= (t1 & 1).wrapping_neg() & TMAT;
        t0
    }
}
