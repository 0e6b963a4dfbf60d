//! MODP group primitives shared by the Diffie-Hellman key exchange and the
//! SMP engine (`dl_smp` depends on this module through the public re-export
//! in `lib.rs` — both protocols run over a fixed safe-prime group with
//! generator 2, one 4096-bit and one 1536-bit, in the style of RFC 3526's
//! named MODP groups).

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// A fixed 4096-bit safe-prime MODP group (generator 2), embedded for the
/// session's outer Diffie-Hellman key agreement (`dh::generate_dh_key`,
/// `dh::compute_shared`).
pub const DH_4096_PRIME_HEX: &str = concat!(
    "FD7C1188632894A4EE59DA87F081C77B8A1AB860549BE337",
    "45FDB94F764814573CA8708FA6A31410D8A5137D6D902346",
    "D2F82CEBF4559E591C36E4E64DD7D1D85F79CE3F6242DE75",
    "5169C3DFAFA589BC75CF5F9A518AEA2A7A9D0FBBC0649E54",
    "3A34DF076712BDB375780508F8D4E376CC290C9122425B12",
    "0D714EC646E060EE68EAFDAE92C49B14341AFD76D3A79439",
    "4D48A31C97097E4A617329921DCEE8111E4BD7321B808D63",
    "1C7AC2C27E194451DE5AC71CA60916A9C510862B3C429005",
    "279013E870D7BAF5BCB61E61320113B345A1F4B3E7A0A9A4",
    "AB9C8712CFBDCAC6C4176FDE20AF078FE6D6FDA65D5F8B89",
    "6E9512833F3CD5FA7374D498788EBE6ABFC78CC76E044881",
    "DE5024403BF5BD21A6BE9F4F59593698617CE65C33DE1D1F",
    "22F5FAEBAAFC0B16DB9151EF444ACA277336B6CC3954E967",
    "7728297A34857A6E6AD9584E5E4503F7DAE4AC5BF45D4C29",
    "E7F7FED4AB7EBFBD13BD707B4EFCCB058A29C6CC1DAE0807",
    "5386D64044E627C34A585EA84441A2A2BD5CE83AD5597748",
    "9FCFEB5C632B53331D221BB6B479004F8C13B08D04B15249",
    "8AFC0A482A8FD585CF5AB839EC78D9C66F13C42DAC74DDAC",
    "B3499ED3D2B02838DB00D078BFC58F9A56442FAFA25DB7C5",
    "CD330B320A9D8EEFD67F7159D2F9F8CD807A0DFD7F4C9A54",
    "2CCC8E1127C4CB7BF294352B7A0B530451447B9CE5879C1A",
    "9B0C026D159160AF",
);

/// A fixed 1536-bit safe-prime MODP group (generator 2), embedded for the
/// SMP zero-knowledge sub-protocol (`dl_smp::group`). `q = (p-1)/2` is
/// itself prime, giving the prime-order subgroup SMP's Schnorr-style
/// proofs run over.
pub const SMP_1536_PRIME_HEX: &str = concat!(
    "DC6E8D7CB3503CDF149F71C5AD082E8270873DABE6D56BB2",
    "B5132C379C8ADD01DAA95634BB46D03B9DD31F7C2EA61830",
    "DDAC2CFCC5C888AA2BB8010C12127A799E36A5E9DB0E467A",
    "C75338E884C1204AAE82B6E543AE9E0E7E3122550A2A9E82",
    "DC6A1B413107BE5402E6A2B732E47AB3EE20B85603AB740D",
    "C647A3ED3107C2AA693B8F4D857937F1430FB610FB7A55E2",
    "19314560C9E95B3BC1DCE15D2BBABBD253490846A0AE86C1",
    "161121CC8F06DC7A720E01600EC72EB5FB9855216563BA9F",
);

/// A fixed, safe-prime MODP group: `p` prime, `g` a generator, `q = (p-1)/2`
/// the order of the prime-order subgroup used in SMP's Schnorr-style proofs.
#[derive(Clone)]
pub struct ModpGroup {
    pub p: BigUint,
    pub g: BigUint,
    pub q: BigUint,
}

impl ModpGroup {
    pub fn from_hex(prime_hex: &str, generator: u32) -> Self {
        let p = BigUint::parse_bytes(prime_hex.as_bytes(), 16)
            .expect("embedded MODP prime constant must be valid hex");
        let q = (&p - BigUint::one()) / BigUint::from(2u32);
        Self { p, g: BigUint::from(generator), q }
    }

    /// `g^x mod p`.
    pub fn pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.p)
    }

    /// `g^x mod p` with the group's fixed generator.
    pub fn pow_g(&self, exp: &BigUint) -> BigUint {
        self.g.modpow(exp, &self.p)
    }

    /// `x^(p-2) mod p` — Fermat inversion in this prime field.
    pub fn invm(&self, x: &BigUint) -> BigUint {
        let two = BigUint::from(2u32);
        x.modpow(&(&self.p - two), &self.p)
    }

    /// A group element is valid iff it lies in `[2, p-2]`.
    pub fn is_valid_element(&self, v: &BigUint) -> bool {
        let two = BigUint::from(2u32);
        *v >= two && *v <= &self.p - &two
    }

    pub fn zero_mod_q() -> BigUint {
        BigUint::zero()
    }
}

/// Decimal-ASCII representation of a `BigUint`, as required by every
/// wire-critical hash construction in §4.1/§4.2 (`H(str(x))`-shaped hashes
/// hash the decimal digits of `x`, not its raw bytes).
pub fn to_decimal_ascii(v: &BigUint) -> String {
    v.to_str_radix(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dh_group_prime_is_odd_and_right_bit_length() {
        let group = ModpGroup::from_hex(DH_4096_PRIME_HEX, 2);
        assert_eq!(group.p.bits(), 4096);
        assert!(&group.p % BigUint::from(2u32) == BigUint::one());
    }

    #[test]
    fn smp_group_prime_is_1536_bits() {
        let group = ModpGroup::from_hex(SMP_1536_PRIME_HEX, 2);
        assert_eq!(group.p.bits(), 1536);
    }

    #[test]
    fn q_is_half_of_p_minus_one() {
        let group = ModpGroup::from_hex(SMP_1536_PRIME_HEX, 2);
        assert_eq!(&group.q * BigUint::from(2u32) + BigUint::one(), group.p);
    }
}
