//! # RLC Wire Units
//!
//! Byte layout of the two units exchanged between encoder and decoder. There
//! is no framing: a unit occupies a whole datagram (or whatever the caller
//! uses), and the payload runs to the end of the buffer.
//!
//! ## Source unit
//!
//! ```text
//! +--------+--------------------+---------------------------+
//! | 0x01   | Symbol ID (32)     | Payload (symbol_size)     |
//! +--------+--------------------+---------------------------+
//! ```
//!
//! ## Repair unit
//!
//! ```text
//! +--------+----------+---------------+-------------+-------------+---------+
//! | 0x02   | Key (16) | AddParam (16) | First ID 32 | Last ID 32  | Payload |
//! +--------+----------+---------------+-------------+-------------+---------+
//! ```
//!
//! All integers are big-endian. Coding coefficients are never carried; the
//! decoder regenerates them from the key, the extra parameter and the window.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::SymbolId;

// ─── Constants ───────────────────────────────────────────────────────────────

pub const SOURCE_UNIT_TYPE: u8 = 0x01;
pub const REPAIR_UNIT_TYPE: u8 = 0x02;

/// Type byte + id.
pub const SOURCE_HEADER_SIZE: usize = 1 + 4;

/// Type byte + key + add_param + first id + last id.
pub const REPAIR_HEADER_SIZE: usize = 1 + 2 + 2 + 4 + 4;

// ─── Source Unit ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePacket {
    pub id: SymbolId,
    pub payload: Bytes,
}

impl SourcePacket {
    pub fn new(id: SymbolId, payload: impl Into<Bytes>) -> Self {
        SourcePacket {
            id,
            payload: payload.into(),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_u8(SOURCE_UNIT_TYPE);
        buf.put_u32(self.id);
        buf.put_slice(&self.payload);
    }

    /// Decode a source unit, consuming the rest of `buf` as payload.
    /// Returns `None` if the buffer is too short or not a source unit.
    pub fn decode(buf: &mut impl Buf) -> Option<Self> {
        if buf.remaining() < SOURCE_HEADER_SIZE || buf.chunk().first() != Some(&SOURCE_UNIT_TYPE)
        {
            return None;
        }
        buf.advance(1);
        let id = buf.get_u32();
        let payload = buf.copy_to_bytes(buf.remaining());
        Some(SourcePacket { id, payload })
    }

    pub fn encoded_len(&self) -> usize {
        SOURCE_HEADER_SIZE + self.payload.len()
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

// ─── Repair Unit ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairPacket {
    pub key: u16,
    pub add_param: u16,
    pub first_id: SymbolId,
    pub last_id: SymbolId,
    pub payload: Bytes,
}

impl RepairPacket {
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_u8(REPAIR_UNIT_TYPE);
        buf.put_u16(self.key);
        buf.put_u16(self.add_param);
        buf.put_u32(self.first_id);
        buf.put_u32(self.last_id);
        buf.put_slice(&self.payload);
    }

    /// Decode a repair unit, consuming the rest of `buf` as payload.
    /// The window range is not validated here; the decoder does that.
    pub fn decode(buf: &mut impl Buf) -> Option<Self> {
        if buf.remaining() < REPAIR_HEADER_SIZE || buf.chunk().first() != Some(&REPAIR_UNIT_TYPE)
        {
            return None;
        }
        buf.advance(1);
        let key = buf.get_u16();
        let add_param = buf.get_u16();
        let first_id = buf.get_u32();
        let last_id = buf.get_u32();
        let payload = buf.copy_to_bytes(buf.remaining());
        Some(RepairPacket {
            key,
            add_param,
            first_id,
            last_id,
            payload,
        })
    }

    pub fn encoded_len(&self) -> usize {
        REPAIR_HEADER_SIZE + self.payload.len()
    }

    /// Number of source ids covered by the window, if the range is ordered.
    pub fn window_len(&self) -> Option<usize> {
        (self.first_id <= self.last_id).then(|| (self.last_id - self.first_id) as usize + 1)
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Either unit, distinguished by the leading type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Source(SourcePacket),
    Repair(RepairPacket),
}

impl Packet {
    pub fn decode(buf: &mut impl Buf) -> Option<Self> {
        match buf.chunk().first() {
            Some(&SOURCE_UNIT_TYPE) => SourcePacket::decode(buf).map(Packet::Source),
            Some(&REPAIR_UNIT_TYPE) => RepairPacket::decode(buf).map(Packet::Repair),
            _ => None,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Packet::Source(p) => p.encode(buf),
            Packet::Repair(p) => p.encode(buf),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Packet::Source(p) => p.to_bytes(),
            Packet::Repair(p) => p.to_bytes(),
        }
    }
}

impl From<SourcePacket> for Packet {
    fn from(p: SourcePacket) -> Self {
        Packet::Source(p)
    }
}

impl From<RepairPacket> for Packet {
    fn from(p: RepairPacket) -> Self {
        Packet::Repair(p)
    }
}
