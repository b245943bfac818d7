//! Identity colors for pixel hit testing.
//!
//! Every layer in a scene owns one slot of a dense table. The slot index is
//! encoded into a 24-bit RGB value that the hit pass paints as a flat color;
//! decoding a sampled pixel gives the slot back, and the slot gives the layer.
//!
//! Encoding multiplies `slot + 1` by an odd step modulo 2^24. An odd step is
//! invertible in that ring, so the mapping is a bijection and decoding is an
//! exact multiplication by the inverse. `0x000000` never encodes a slot and
//! reads back as "no layer".

use std::collections::VecDeque;

use inkframe_core::{Rgba, SceneError, SceneResult};

const MASK: u32 = 0x00ff_ffff;

/// Largest number of simultaneously live identities.
pub const MAX_IDENTITIES: usize = MASK as usize;

/// Step used in debug mode so adjacent layers get very different colors.
pub const DEBUG_STEP: u32 = 0x009e_3779;

/// A layer's encoded 24-bit identity color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(u32);

impl Identity {
    /// Placeholder for a layer whose slot is not allocated yet.
    pub(crate) const NONE: Identity = Identity(0);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn color(self) -> Rgba {
        Rgba::from_u24(self.0)
    }

    /// Six hex digits, e.g. `#00a3f1`.
    pub fn hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

/// Bijective slot <-> color mapping.
#[derive(Debug, Clone, Copy)]
pub struct IdentityCodec {
    step: u32,
    inverse: u32,
}

impl IdentityCodec {
    pub fn new(step: u32) -> Self {
        let step = (step | 1) & MASK;
        // Newton iteration; each round doubles the number of correct low bits.
        let mut inverse = step;
        for _ in 0..5 {
            inverse = inverse.wrapping_mul(2u32.wrapping_sub(step.wrapping_mul(inverse)));
        }
        Self {
            step,
            inverse: inverse & MASK,
        }
    }

    pub fn debug() -> Self {
        Self::new(DEBUG_STEP)
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn encode(&self, slot: u32) -> u32 {
        (slot + 1).wrapping_mul(self.step) & MASK
    }

    pub fn decode(&self, value: u32) -> Option<u32> {
        let value = value & MASK;
        if value == 0 {
            return None;
        }
        let n = value.wrapping_mul(self.inverse) & MASK;
        Some(n - 1)
    }
}

impl Default for IdentityCodec {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Dense slot table from identity to owner.
#[derive(Debug, Clone)]
pub struct IdentityTable<K: Copy> {
    slots: Vec<Option<K>>,
    free: VecDeque<u32>,
    codec: IdentityCodec,
}

impl<K: Copy> IdentityTable<K> {
    pub fn new(codec: IdentityCodec) -> Self {
        Self {
            slots: Vec::new(),
            free: VecDeque::new(),
            codec,
        }
    }

    pub fn codec(&self) -> IdentityCodec {
        self.codec
    }

    /// Reserves a slot for `owner`. Freed slots are reused oldest first.
    pub fn allocate(&mut self, owner: K) -> SceneResult<Identity> {
        let slot = match self.free.pop_front() {
            Some(slot) => {
                self.slots[slot as usize] = Some(owner);
                slot
            }
            None => {
                if self.slots.len() >= MAX_IDENTITIES {
                    return Err(SceneError::IdentityExhausted);
                }
                self.slots.push(Some(owner));
                (self.slots.len() - 1) as u32
            }
        };
        Ok(Identity(self.codec.encode(slot)))
    }

    pub fn release(&mut self, identity: Identity) {
        let Some(slot) = self.codec.decode(identity.0) else {
            return;
        };
        if let Some(entry) = self.slots.get_mut(slot as usize) {
            if entry.take().is_some() {
                self.free.push_back(slot);
            }
        }
    }

    /// Owner of a decoded pixel value, if any.
    pub fn lookup(&self, value: u32) -> Option<K> {
        let slot = self.codec.decode(value)?;
        self.slots.get(slot as usize).copied().flatten()
    }

    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_round_trip() {
        for codec in [IdentityCodec::default(), IdentityCodec::debug()] {
            for slot in (0..5000).chain([MASK - 2, MASK - 1]) {
                let value = codec.encode(slot);
                assert_ne!(value, 0, "slot {slot} encoded to the empty color");
                assert_eq!(codec.decode(value), Some(slot));
            }
        }
    }

    #[test]
    fn test_zero_is_empty() {
        assert_eq!(IdentityCodec::debug().decode(0), None);
    }

    #[test]
    fn test_debug_colors_are_spread() {
        let codec = IdentityCodec::debug();
        let a = Rgba::from_u24(codec.encode(0));
        let b = Rgba::from_u24(codec.encode(1));
        let diff = (a.r as i32 - b.r as i32).abs()
            + (a.g as i32 - b.g as i32).abs()
            + (a.b as i32 - b.b as i32).abs();
        assert!(diff > 64, "neighbouring debug colors too close: {a} {b}");
    }

    #[test]
    fn test_released_slot_is_reused() {
        let mut table = IdentityTable::new(IdentityCodec::default());
        let a = table.allocate('a').unwrap();
        let _b = table.allocate('b').unwrap();
        table.release(a);
        assert_eq!(table.lookup(a.value()), None);
        assert_eq!(table.live_count(), 1);
        let c = table.allocate('c').unwrap();
        assert_eq!(c, a);
        assert_eq!(table.lookup(c.value()), Some('c'));
    }

    #[test]
    fn test_hex_format() {
        let mut table = IdentityTable::new(IdentityCodec::default());
        let id = table.allocate(()).unwrap();
        assert_eq!(id.hex(), "#000001");
    }
}
