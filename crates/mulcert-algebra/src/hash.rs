//! Hash values for variable names and terms
//!
//! All hashes are derived from a fixed table of odd 64-bit multipliers
//! ("nonces") drawn from a pseudo-random generator with a fixed seed, so hash
//! values (and hence iteration orders depending on them) are reproducible
//! across runs.

use std::sync::OnceLock;

use nanorand::{Rng, WyRand};

/// Number of nonces
pub const NUM_NONCES: usize = 32;

const SEED: u64 = 42;

/// Get the nonce table
pub fn nonces() -> &'static [u64; NUM_NONCES] {
    static NONCES: OnceLock<[u64; NUM_NONCES]> = OnceLock::new();
    NONCES.get_or_init(|| {
        let mut rng = WyRand::new_seed(SEED);
        let mut nonces = [0; NUM_NONCES];
        for n in &mut nonces {
            *n = rng.generate::<u64>() | 1;
        }
        nonces
    })
}

/// Hash a variable name
///
/// Every byte is added to the running value, which is then multiplied by the
/// next nonce (cycling through the table).
pub fn hash_str(s: &str) -> u64 {
    let nonces = nonces();
    let mut res: u64 = 0;
    for (i, &b) in s.as_bytes().iter().enumerate() {
        res = res.wrapping_add(b as u64);
        res = res.wrapping_mul(nonces[i % NUM_NONCES]);
    }
    res
}

/// Hash of the term with head variable hash `var_hash` and tail hash
/// `rest_hash` (0 for the empty tail)
#[inline]
pub fn hash_term(var_hash: u64, rest_hash: u64) -> u64 {
    let nonces = nonces();
    rest_hash
        .wrapping_mul(nonces[0])
        .wrapping_add(var_hash)
        .wrapping_mul(nonces[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonces_are_odd_and_stable() {
        let n = nonces();
        assert!(n.iter().all(|&x| x & 1 == 1));
        assert_eq!(n, nonces());
    }

    #[test]
    fn string_hash_depends_on_order() {
        assert_eq!(hash_str(""), 0);
        assert_eq!(hash_str("a1"), hash_str("a1"));
        assert_ne!(hash_str("a1"), hash_str("1a"));
    }

    #[test]
    fn term_hash_depends_on_tail() {
        let v = hash_str("a0");
        assert_ne!(hash_term(v, 0), hash_term(v, hash_term(hash_str("b0"), 0)));
    }
}
