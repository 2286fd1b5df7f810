// src/entropy.rs
use crate::error::{GeneratorError, GeneratorResult};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// A source of unbiased random bytes.
///
/// Implementations must be safe to call from several threads; each call either
/// returns the full amount requested or fails with `InsufficientEntropy`.
pub trait SecureByteSource: Send + Sync + std::fmt::Debug {
    /// Produces exactly `len` random bytes.
    fn random_bytes(&self, len: usize) -> GeneratorResult<Vec<u8>>;

    /// Whether the bytes come from a cryptographically secure generator.
    fn is_crypto_strong(&self) -> bool;

    /// Produces one unbiased integer in the inclusive range `[low, high]`.
    ///
    /// Uses rejection sampling over 64-bit draws, so no value is favoured
    /// regardless of the width of the range.
    fn random_int(&self, low: usize, high: usize) -> GeneratorResult<usize> {
        if low > high {
            return Err(GeneratorError::InvalidRange { low, high });
        }
        if low == high {
            return Ok(low);
        }

        let span = ((high - low) as u64).wrapping_add(1);
        if span == 0 {
            // The range covers every u64 value.
            return Ok(low.wrapping_add(self.next_u64()? as usize));
        }

        // 2^64 mod span; draws at or above 2^64 - rejected would skew the result.
        let rejected = (u64::MAX % span + 1) % span;
        loop {
            let value = self.next_u64()?;
            if rejected == 0 || value < 0u64.wrapping_sub(rejected) {
                return Ok(low + (value % span) as usize);
            }
        }
    }

    #[doc(hidden)]
    fn next_u64(&self) -> GeneratorResult<u64> {
        let bytes = self.random_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes);
        Ok(u64::from_le_bytes(buf))
    }
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl SecureByteSource for OsEntropy {
    fn random_bytes(&self, len: usize) -> GeneratorResult<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            let msg = format!("OS random source failed to supply {} bytes: {}", len, e);
            log::error!("OsEntropy::random_bytes: {}", msg);
            GeneratorError::InsufficientEntropy(msg)
        })?;
        Ok(bytes)
    }

    fn is_crypto_strong(&self) -> bool {
        true
    }
}

/// A reproducible source seeded from a fixed value.
///
/// Output is predictable to anyone who knows the seed, so it reports itself as
/// not crypto-strong. Meant for tests and diagnostics, never for secrets.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        SeededEntropy {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SecureByteSource for SeededEntropy {
    fn random_bytes(&self, len: usize) -> GeneratorResult<Vec<u8>> {
        // A panic mid-draw leaves the generator in a valid state, so poisoning is ignored.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut bytes = vec![0u8; len];
        rng.try_fill_bytes(&mut bytes).map_err(|e| {
            let msg = format!("Seeded generator failed to supply {} bytes: {}", len, e);
            log::error!("SeededEntropy::random_bytes: {}", msg);
            GeneratorError::InsufficientEntropy(msg)
        })?;
        Ok(bytes)
    }

    fn is_crypto_strong(&self) -> bool {
        false
    }
}
