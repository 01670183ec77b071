//! Seed derivation for pictures and random constructions
//!
//! Each picture owns a seed. Loose objects are sampled from `StdRng` seeded
//! with it; random constructions draw from a substream derived from
//! `(picture seed, object id)` by SipHash-1-3 with fixed zero keys, so the
//! picture's own stream is never touched after initialization.

use crate::ir::ObjectId;
use rand::rngs::StdRng;
use rand::SeedableRng;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Derive the deterministic seed of a substream
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Seed of picture `index` in reconstruction round `generation`
pub fn picture_seed(master_seed: u64, generation: u64, index: usize) -> u64 {
    derive_substream_seed(derive_substream_seed(master_seed, generation), index as u64)
}

/// Random source for one random object in one picture
pub fn object_rng(picture_seed: u64, object: ObjectId) -> StdRng {
    StdRng::seed_from_u64(derive_substream_seed(picture_seed, object.0))
}
