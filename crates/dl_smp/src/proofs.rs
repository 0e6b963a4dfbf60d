//! Fiat–Shamir discrete-log, joint-coordinate, and equal-logs proofs
//! (§4.2 steps 1–5), plus the hash construction they share.
//!
//! The hash is SHA-256 over the domain-separation tag (`'1'..'8'`)
//! concatenated with the decimal-ASCII digits of one or more group
//! elements, then truncated by one hex nibble before being read back as
//! an integer. That truncation comes from the source computing
//! `hex(n)[2:-1]` — Python's `hex()` drops the `0x` prefix and the
//! slice then drops the last character of the remaining digits, i.e. the
//! digest's last nibble. Dropping the low nibble of an integer is just
//! `n >> 4`, so that's what this does — the two are bit-identical.

use dl_crypto::bigint::{to_decimal_ascii, ModpGroup};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::error::SmpError;
use crate::group::random_exponent;

fn fiat_shamir_hash(parts: &[&str]) -> BigUint {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    BigUint::from_bytes_be(&digest) >> 4u32
}

/// `createLogProof` / `checkLogProof` (tags `'1'..'4'`): proves knowledge
/// of the discrete log of `g^x` without revealing `x`.
pub fn create_log_proof(group: &ModpGroup, tag: &str, x: &BigUint) -> (BigUint, BigUint) {
    let r = random_exponent();
    let c = fiat_shamir_hash(&[tag, &to_decimal_ascii(&group.pow_g(&r))]);
    let d = sub_mod(&r, &mulm(x, &c, &group.q), &group.q);
    (c, d)
}

pub fn check_log_proof(group: &ModpGroup, tag: &str, g: &BigUint, c: &BigUint, d: &BigUint) -> bool {
    let gd = group.pow_g(d);
    let gc = group.pow(g, c);
    let gdgc = mulm(&gd, &gc, &group.p);
    fiat_shamir_hash(&[tag, &to_decimal_ascii(&gdgc)]) == *c
}

/// `createCoordsProof` / `checkCoordsProof` (tags `'5'`,`'6'`): a joint
/// proof that `(p, q)` are correctly formed from `(g2, g3, r, secret)`.
pub fn create_coords_proof(
    group: &ModpGroup,
    tag: &str,
    g2: &BigUint,
    g3: &BigUint,
    r: &BigUint,
    secret: &BigUint,
) -> (BigUint, BigUint, BigUint) {
    let r1 = random_exponent();
    let r2 = random_exponent();

    let tmp1 = group.pow(g3, &r1);
    let tmp2 = mulm(&group.pow_g(&r1), &group.pow(g2, &r2), &group.p);

    let c = fiat_shamir_hash(&[tag, &to_decimal_ascii(&tmp1), &to_decimal_ascii(&tmp2)]);

    let d1 = sub_mod(&r1, &mulm(r, &c, &group.q), &group.q);
    let d2 = sub_mod(&r2, &mulm(secret, &c, &group.q), &group.q);

    (c, d1, d2)
}

#[allow(clippy::too_many_arguments)]
pub fn check_coords_proof(
    group: &ModpGroup,
    tag: &str,
    c: &BigUint,
    d1: &BigUint,
    d2: &BigUint,
    g2: &BigUint,
    g3: &BigUint,
    p: &BigUint,
    q: &BigUint,
) -> bool {
    let tmp1 = mulm(&group.pow(g3, d1), &group.pow(p, c), &group.p);
    let inner = mulm(&group.pow_g(d1), &group.pow(g2, d2), &group.p);
    let tmp2 = mulm(&inner, &group.pow(q, c), &group.p);

    let cprime = fiat_shamir_hash(&[tag, &to_decimal_ascii(&tmp1), &to_decimal_ascii(&tmp2)]);
    cprime == *c
}

/// `createEqualLogsProof` / `checkEqualLogs` (tags `'7'`,`'8'`): proves
/// `ra`/`rb` were raised to the same exponent `x3` used elsewhere.
pub fn create_equal_logs_proof(
    group: &ModpGroup,
    tag: &str,
    qa: &BigUint,
    qb_inv: &BigUint,
    x: &BigUint,
) -> (BigUint, BigUint) {
    let r = random_exponent();
    let tmp1 = group.pow_g(&r);
    let qab = mulm(qa, qb_inv, &group.p);
    let tmp2 = group.pow(&qab, &r);

    let c = fiat_shamir_hash(&[tag, &to_decimal_ascii(&tmp1), &to_decimal_ascii(&tmp2)]);
    let d = sub_mod(&r, &mulm(x, &c, &group.q), &group.q);

    (c, d)
}

pub fn check_equal_logs(
    group: &ModpGroup,
    tag: &str,
    c: &BigUint,
    d: &BigUint,
    g3: &BigUint,
    qab: &BigUint,
    r: &BigUint,
) -> bool {
    let tmp1 = mulm(&group.pow_g(d), &group.pow(g3, c), &group.p);
    let tmp2 = mulm(&group.pow(qab, d), &group.pow(r, c), &group.p);

    let cprime = fiat_shamir_hash(&[tag, &to_decimal_ascii(&tmp1), &to_decimal_ascii(&tmp2)]);
    cprime == *c
}

pub fn mulm(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    (x * y) % modulus
}

/// `(x - y) mod m`, correct even when `x < y` (BigUint has no sign).
pub fn sub_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    let x = x % modulus;
    let y = y % modulus;
    if x >= y {
        x - y
    } else {
        modulus - (y - x)
    }
}

pub fn require(cond: bool, err: SmpError) -> Result<(), SmpError> {
    if cond {
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::smp_group;

    #[test]
    fn log_proof_round_trips() {
        let group = smp_group();
        let x = random_exponent() % &group.q;
        let g = group.pow_g(&x);
        let (c, d) = create_log_proof(&group, "1", &x);
        assert!(check_log_proof(&group, "1", &g, &c, &d));
    }

    #[test]
    fn log_proof_rejects_wrong_tag() {
        let group = smp_group();
        let x = random_exponent() % &group.q;
        let g = group.pow_g(&x);
        let (c, d) = create_log_proof(&group, "1", &x);
        assert!(!check_log_proof(&group, "2", &g, &c, &d));
    }

    #[test]
    fn sub_mod_wraps_on_underflow() {
        let modulus = BigUint::from(10u32);
        assert_eq!(sub_mod(&BigUint::from(2u32), &BigUint::from(5u32), &modulus), BigUint::from(7u32));
    }
}
