//! Per-run RNG construction.
//!
//! Each breakdown run owns exactly one `StdRng`. A run is reproducible only
//! when its seed is fixed; unseeded runs draw a seed from OS entropy and
//! report it back so the run can be replayed.
//!
//! For many independent runs (batches), a master seed is expanded into
//! per-job sub-seeds via BLAKE3, independently of scheduling order.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seeded RNG for one run.
pub fn run_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A fresh seed from OS entropy.
pub fn entropy_seed() -> u64 {
    rand::rngs::OsRng.next_u64()
}

/// Deterministic sub-seed derivation from a master seed.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the seed for job `label` at position `index`.
    ///
    /// Independent of derivation order: the same `(label, index)` always
    /// yields the same seed.
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}
