// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use evencycle_algebra::Multiplier;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

pub mod telemetry;

/// Seeded stream when a seed is given, OS entropy otherwise.
pub fn rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => {
            info!("no seed given, drawing one from the OS");
            ChaCha20Rng::from_entropy()
        }
    }
}

pub fn parse_multiplier(s: &str) -> Result<Multiplier> {
    Ok(match s {
        "reference" => Multiplier::Reference,
        "carryless" => Multiplier::Carryless,
        "kronecker" => Multiplier::Kronecker,
        other => bail!("unknown multiplier '{other}', expected reference, carryless or kronecker"),
    })
}

/// Ensure a decimal or `0x`-prefixed modulus
pub fn parse_modulus(s: &str) -> Result<u64> {
    Ok(evencycle_config::parse_modulus(s)?)
}
