//! The SMP state machine (§4.2). One `SmpEngine` instance is shared by
//! both roles — the initiator calls `step1`, `step3`, `step5`; the
//! responder calls `step2`, `step4` — mirroring the single-class design
//! of the source protocol rather than splitting into two role-specific
//! types.

use dl_crypto::bigint::ModpGroup;
use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SmpError;
use crate::group::{random_exponent, secret_from_str, smp_group};
use crate::proofs::{
    check_coords_proof, check_equal_logs, check_log_proof, create_coords_proof,
    create_equal_logs_proof, create_log_proof, mulm, require,
};

fn invm(group: &ModpGroup, x: &BigUint) -> BigUint {
    group.invm(x)
}

fn is_valid(group: &ModpGroup, v: &BigUint) -> bool {
    group.is_valid_element(v)
}

/// Wraps a `BigUint` so secret exponents and the shared secret can be
/// zeroized on drop without every field needing its own boilerplate.
#[derive(Clone, Default)]
struct Secret(BigUint);

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0 = BigUint::default();
    }
}

/// Holds the per-session SMP exchange state. `secret`, `x2`, `x3` are
/// zeroized when the engine is dropped (destroyed after step 4 or 5, per
/// the data model).
#[derive(ZeroizeOnDrop)]
pub struct SmpEngine {
    #[zeroize(skip)]
    group: ModpGroup,
    secret: Secret,
    x2: Secret,
    x3: Secret,

    #[zeroize(skip)]
    g2: Option<BigUint>,
    #[zeroize(skip)]
    g3: Option<BigUint>,
    #[zeroize(skip)]
    g2a: Option<BigUint>,
    #[zeroize(skip)]
    g3a: Option<BigUint>,
    #[zeroize(skip)]
    g2b: Option<BigUint>,
    #[zeroize(skip)]
    g3b: Option<BigUint>,
    #[zeroize(skip)]
    gb2: Option<BigUint>,
    #[zeroize(skip)]
    gb3: Option<BigUint>,
    #[zeroize(skip)]
    ga2: Option<BigUint>,
    #[zeroize(skip)]
    ga3: Option<BigUint>,
    #[zeroize(skip)]
    pa: Option<BigUint>,
    #[zeroize(skip)]
    qa: Option<BigUint>,
    #[zeroize(skip)]
    pb: Option<BigUint>,
    #[zeroize(skip)]
    qb: Option<BigUint>,

    pub matched: bool,
}

impl SmpEngine {
    pub fn new(secret: &str) -> Self {
        SmpEngine {
            group: smp_group(),
            secret: Secret(secret_from_str(secret)),
            x2: Secret::default(),
            x3: Secret::default(),
            g2: None,
            g3: None,
            g2a: None,
            g3a: None,
            g2b: None,
            g3b: None,
            gb2: None,
            gb3: None,
            ga2: None,
            ga3: None,
            pa: None,
            qa: None,
            pb: None,
            qb: None,
            matched: false,
        }
    }

    /// Initiator, step 1: publish `g2a`, `g3a` with discrete-log proofs.
    pub fn step1(&mut self) -> (BigUint, BigUint, BigUint, BigUint, BigUint, BigUint) {
        let x2 = random_exponent();
        let x3 = random_exponent();

        let g2 = self.group.pow_g(&x2);
        let g3 = self.group.pow_g(&x3);

        let (c1, d1) = create_log_proof(&self.group, "1", &x2);
        let (c2, d2) = create_log_proof(&self.group, "2", &x3);

        self.x2 = Secret(x2);
        self.x3 = Secret(x3);
        self.g2 = Some(g2.clone());
        self.g3 = Some(g3.clone());

        (g2, g3, c1, d1, c2, d2)
    }

    /// Responder, step 2: validate step 1's output; reply with `g2b`,
    /// `g3b`, `pb`, `qb` and the corresponding proofs.
    #[allow(clippy::too_many_arguments)]
    pub fn step2(
        &mut self,
        g2a: BigUint,
        g3a: BigUint,
        c1: BigUint,
        d1: BigUint,
        c2: BigUint,
        d2: BigUint,
    ) -> Result<(BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint), SmpError> {
        require(is_valid(&self.group, &g2a) && is_valid(&self.group, &g3a), SmpError::InvalidElement)?;
        require(check_log_proof(&self.group, "1", &g2a, &c1, &d1), SmpError::LogProofFailed)?;
        require(check_log_proof(&self.group, "2", &g3a, &c2, &d2), SmpError::LogProofFailed)?;

        let x2 = random_exponent();
        let x3 = random_exponent();
        let r = random_exponent();

        let g2 = self.group.pow_g(&x2);
        let g3 = self.group.pow_g(&x3);

        let (c3, d3) = create_log_proof(&self.group, "3", &x2);
        let (c4, d4) = create_log_proof(&self.group, "4", &x3);

        let gb2 = self.group.pow(&g2a, &x2);
        let gb3 = self.group.pow(&g3a, &x3);

        let pb = self.group.pow(&gb3, &r);
        let qb = mulm(&self.group.pow_g(&r), &self.group.pow(&gb2, &self.secret.0), &self.group.p);

        let (c5, d5, d6) = create_coords_proof(&self.group, "5", &gb2, &gb3, &r, &self.secret.0);

        self.g2a = Some(g2a);
        self.g3a = Some(g3a);
        self.x2 = Secret(x2);
        self.x3 = Secret(x3);
        self.g2 = Some(g2.clone());
        self.g3 = Some(g3.clone());
        self.gb2 = Some(gb2);
        self.gb3 = Some(gb3);
        self.pb = Some(pb.clone());
        self.qb = Some(qb.clone());

        Ok((g2, g3, pb, qb, c3, d3, c4, d4, c5, d5, d6))
    }

    /// Initiator, step 3: validate step 2's output; reply with `pa`,
    /// `qa`, `ra` and the coordinate/equal-logs proofs.
    #[allow(clippy::too_many_arguments)]
    pub fn step3(
        &mut self,
        g2b: BigUint,
        g3b: BigUint,
        pb: BigUint,
        qb: BigUint,
        c3: BigUint,
        d3: BigUint,
        c4: BigUint,
        d4: BigUint,
        c5: BigUint,
        d5: BigUint,
        d6: BigUint,
    ) -> Result<(BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint, BigUint), SmpError> {
        require(
            is_valid(&self.group, &g2b)
                && is_valid(&self.group, &g3b)
                && is_valid(&self.group, &pb)
                && is_valid(&self.group, &qb),
            SmpError::InvalidElement,
        )?;
        require(check_log_proof(&self.group, "3", &g2b, &c3, &d3), SmpError::LogProofFailed)?;
        require(check_log_proof(&self.group, "4", &g3b, &c4, &d4), SmpError::LogProofFailed)?;

        let ga2 = self.group.pow(&g2b, &self.x2.0);
        let ga3 = self.group.pow(&g3b, &self.x3.0);

        require(
            check_coords_proof(&self.group, "5", &c5, &d5, &d6, &ga2, &ga3, &pb, &qb),
            SmpError::CoordsProofFailed,
        )?;

        let s = random_exponent();

        let pa = self.group.pow(&ga3, &s);
        let qa = mulm(&self.group.pow_g(&s), &self.group.pow(&ga2, &self.secret.0), &self.group.p);

        let (c6, d7, d8) = create_coords_proof(&self.group, "6", &ga2, &ga3, &s, &self.secret.0);

        let inv = invm(&self.group, &qb);
        let ra = self.group.pow(&mulm(&qa, &inv, &self.group.p), &self.x3.0);

        let (c7, d9) = create_equal_logs_proof(&self.group, "7", &qa, &inv, &self.x3.0);

        self.g2b = Some(g2b);
        self.g3b = Some(g3b);
        self.ga2 = Some(ga2);
        self.ga3 = Some(ga3);
        self.pa = Some(pa.clone());
        self.qa = Some(qa.clone());
        self.pb = Some(pb);
        self.qb = Some(qb);

        Ok((pa, qa, ra, c6, d7, d8, c7, d9))
    }

    /// Responder, step 4: validate step 3's output; reply with `rb` and
    /// its equal-logs proof. Sets `matched` if the proved exponent
    /// equality implies the two secrets were the same.
    #[allow(clippy::too_many_arguments)]
    pub fn step4(
        &mut self,
        pa: BigUint,
        qa: BigUint,
        ra: BigUint,
        c6: BigUint,
        d7: BigUint,
        d8: BigUint,
        c7: BigUint,
        d9: BigUint,
    ) -> Result<(BigUint, BigUint, BigUint), SmpError> {
        require(
            is_valid(&self.group, &pa) && is_valid(&self.group, &qa) && is_valid(&self.group, &ra),
            SmpError::InvalidElement,
        )?;

        let gb2 = self.gb2.clone().ok_or(SmpError::OutOfOrder("step4 before step2"))?;
        let gb3 = self.gb3.clone().ok_or(SmpError::OutOfOrder("step4 before step2"))?;
        require(
            check_coords_proof(&self.group, "6", &c6, &d7, &d8, &gb2, &gb3, &pa, &qa),
            SmpError::CoordsProofFailed,
        )?;

        let g3a = self.g3a.clone().ok_or(SmpError::OutOfOrder("step4 before step2"))?;
        let qb = self.qb.clone().ok_or(SmpError::OutOfOrder("step4 before step2"))?;
        let qb_inv = invm(&self.group, &qb);
        let qab = mulm(&qa, &qb_inv, &self.group.p);
        require(
            check_equal_logs(&self.group, "7", &c7, &d9, &g3a, &qab, &ra),
            SmpError::EqualLogsProofFailed,
        )?;

        let inv = invm(&self.group, &qb);
        let rb = self.group.pow(&mulm(&qa, &inv, &self.group.p), &self.x3.0);

        let (c8, d10) = create_equal_logs_proof(&self.group, "8", &qa, &inv, &self.x3.0);

        let rab = self.group.pow(&ra, &self.x3.0);
        let pb = self.pb.clone().ok_or(SmpError::OutOfOrder("step4 before step2"))?;
        let pb_inv = invm(&self.group, &pb);
        if rab == mulm(&pa, &pb_inv, &self.group.p) {
            self.matched = true;
        }

        self.pa = Some(pa);
        self.qa = Some(qa);

        Ok((rb, c8, d10))
    }

    /// Initiator, step 5: validate step 4's output; sets `matched`.
    pub fn step5(&mut self, rb: BigUint, c8: BigUint, d10: BigUint) -> Result<(), SmpError> {
        require(is_valid(&self.group, &rb), SmpError::InvalidElement)?;

        let g3b = self.g3b.clone().ok_or(SmpError::OutOfOrder("step5 before step3"))?;
        let qa = self.qa.clone().ok_or(SmpError::OutOfOrder("step5 before step3"))?;
        let qb = self.qb.clone().ok_or(SmpError::OutOfOrder("step5 before step3"))?;
        let qab = mulm(&qa, &invm(&self.group, &qb), &self.group.p);
        require(
            check_equal_logs(&self.group, "8", &c8, &d10, &g3b, &qab, &rb),
            SmpError::EqualLogsProofFailed,
        )?;

        let rab = self.group.pow(&rb, &self.x3.0);
        let pa = self.pa.clone().ok_or(SmpError::OutOfOrder("step5 before step3"))?;
        let pb = self.pb.clone().ok_or(SmpError::OutOfOrder("step5 before step3"))?;
        if rab == mulm(&pa, &invm(&self.group, &pb), &self.group.p) {
            self.matched = true;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_secrets_produce_a_match_on_both_sides() {
        let mut initiator = SmpEngine::new("shared-secret");
        let mut responder = SmpEngine::new("shared-secret");

        let (g2a, g3a, c1, d1, c2, d2) = initiator.step1();
        let (g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6) =
            responder.step2(g2a, g3a, c1, d1, c2, d2).unwrap();
        let (pa, qa, ra, c6, d7, d8, c7, d9) = initiator
            .step3(g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6)
            .unwrap();
        let (rb, c8, d10) = responder.step4(pa, qa, ra, c6, d7, d8, c7, d9).unwrap();
        initiator.step5(rb, c8, d10).unwrap();

        assert!(initiator.matched);
        assert!(responder.matched);
    }

    #[test]
    fn mismatched_secrets_do_not_match() {
        let mut initiator = SmpEngine::new("secret-a");
        let mut responder = SmpEngine::new("secret-b");

        let (g2a, g3a, c1, d1, c2, d2) = initiator.step1();
        let (g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6) =
            responder.step2(g2a, g3a, c1, d1, c2, d2).unwrap();
        let (pa, qa, ra, c6, d7, d8, c7, d9) = initiator
            .step3(g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6)
            .unwrap();
        let (rb, c8, d10) = responder.step4(pa, qa, ra, c6, d7, d8, c7, d9).unwrap();
        initiator.step5(rb, c8, d10).unwrap();

        assert!(!initiator.matched);
        assert!(!responder.matched);
    }

    #[test]
    fn step2_rejects_tampered_proof() {
        let mut initiator = SmpEngine::new("shared-secret");
        let mut responder = SmpEngine::new("shared-secret");

        let (g2a, g3a, c1, d1, c2, d2) = initiator.step1();
        let tampered_d1 = d1 + BigUint::from(1u32);
        let result = responder.step2(g2a, g3a, c1, tampered_d1, c2, d2);
        assert!(matches!(result, Err(SmpError::LogProofFailed)));
    }

    #[test]
    fn step2_rejects_out_of_range_element() {
        let mut responder = SmpEngine::new("shared-secret");
        let result = responder.step2(
            BigUint::from(0u32),
            BigUint::from(5u32),
            BigUint::from(1u32),
            BigUint::from(1u32),
            BigUint::from(1u32),
            BigUint::from(1u32),
        );
        assert!(matches!(result, Err(SmpError::InvalidElement)));
    }
}
