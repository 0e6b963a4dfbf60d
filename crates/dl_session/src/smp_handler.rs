//! SMP sub-handler dispatch (§4.3.2). Commands `SMP_0..SMP_4` carry: (0)
//! the plaintext question the initiator asked, (1)..(4) the packed
//! buffers produced by `dl_smp::SmpEngine::step1..step4`.
//!
//! On `SMP_1` without a prepared answer, the buffer is stashed rather
//! than processed immediately — the responder's upper layer must first
//! be asked for an answer (via the `REQUEST` callback on `SMP_0`) before
//! an `SmpEngine` bound to that answer can run `step2`.

use dl_proto::smp_buffer::{pack_list, unpack_list};
use dl_smp::SmpEngine;

use crate::error::SessionError;

enum SmpState {
    Idle,
    /// Responder received `SMP_1` but has no answer yet.
    AwaitingAnswer { stashed_buffer: Vec<u8> },
    Active(SmpEngine),
    Done,
}

pub struct SmpHandler {
    state: SmpState,
}

impl SmpHandler {
    pub fn new() -> Self {
        SmpHandler { state: SmpState::Idle }
    }

    /// Initiator: begin SMP with `secret`, returning the `SMP_1` payload
    /// to send after the plaintext `SMP_0` question.
    pub fn initiate(&mut self, secret: &str) -> Vec<u8> {
        let mut engine = SmpEngine::new(secret);
        let (g2a, g3a, c1, d1, c2, d2) = engine.step1();
        self.state = SmpState::Active(engine);
        pack_list(&[g2a, g3a, c1, d1, c2, d2])
    }

    /// Responder: `SMP_1` arrived before an answer was supplied by the
    /// upper layer — stash it.
    pub fn stash(&mut self, buffer: Vec<u8>) {
        self.state = SmpState::AwaitingAnswer { stashed_buffer: buffer };
    }

    pub fn has_stashed_buffer(&self) -> bool {
        matches!(self.state, SmpState::AwaitingAnswer { .. })
    }

    /// Responder: the upper layer supplied an answer for a previously
    /// stashed `SMP_1` buffer — run `step2` and return the `SMP_2`
    /// payload.
    pub fn answer_stashed(&mut self, secret: &str) -> Result<Vec<u8>, SessionError> {
        let stashed = match std::mem::replace(&mut self.state, SmpState::Idle) {
            SmpState::AwaitingAnswer { stashed_buffer } => stashed_buffer,
            other => {
                self.state = other;
                return Err(SessionError::BadHandshake);
            }
        };
        let items = unpack_list(&stashed)?;
        let [g2a, g3a, c1, d1, c2, d2] = six(items)?;

        let mut engine = SmpEngine::new(secret);
        let (g2, g3, pb, qb, c3, d3, c4, d4, c5, d5, d6) =
            engine.step2(g2a, g3a, c1, d1, c2, d2)?;
        self.state = SmpState::Active(engine);

        Ok(pack_list(&[g2, g3, pb, qb, c3, d3, c4, d4, c5, d5, d6]))
    }

    /// Initiator: process the `SMP_2` payload (`step3`), returning the
    /// `SMP_3` payload to send.
    pub fn process_step2(&mut self, buffer: &[u8]) -> Result<Vec<u8>, SessionError> {
        let engine = self.active_engine()?;
        let items = unpack_list(buffer)?;
        let [g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6] = eleven(items)?;
        let (pa, qa, ra, c6, d7, d8, c7, d9) =
            engine.step3(g2b, g3b, pb, qb, c3, d3, c4, d4, c5, d5, d6)?;
        Ok(pack_list(&[pa, qa, ra, c6, d7, d8, c7, d9]))
    }

    /// Responder: process the `SMP_3` payload (`step4`), returning the
    /// `SMP_4` payload. Returns `matched` — already decided at this
    /// point for the responder (§4.2 step4).
    pub fn process_step3(&mut self, buffer: &[u8]) -> Result<(Vec<u8>, bool), SessionError> {
        let engine = self.active_engine()?;
        let items = unpack_list(buffer)?;
        let [pa, qa, ra, c6, d7, d8, c7, d9] = eight(items)?;
        let (rb, c8, d10) = engine.step4(pa, qa, ra, c6, d7, d8, c7, d9)?;
        let matched = engine.matched;
        self.state = SmpState::Done;
        Ok((pack_list(&[rb, c8, d10]), matched))
    }

    /// Initiator: process the `SMP_4` payload (`step5`). Returns
    /// `matched`.
    pub fn process_step4(&mut self, buffer: &[u8]) -> Result<bool, SessionError> {
        let engine = self.active_engine()?;
        let items = unpack_list(buffer)?;
        let [rb, c8, d10] = three(items)?;
        engine.step5(rb, c8, d10)?;
        let matched = engine.matched;
        self.state = SmpState::Done;
        Ok(matched)
    }

    fn active_engine(&mut self) -> Result<&mut SmpEngine, SessionError> {
        match &mut self.state {
            SmpState::Active(engine) => Ok(engine),
            _ => Err(SessionError::BadHandshake),
        }
    }
}

impl Default for SmpHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn three<T>(items: Vec<T>) -> Result<[T; 3], SessionError> {
    items
        .try_into()
        .map_err(|_| SessionError::Proto(dl_proto::ProtoError::MalformedMessage("expected 3 SMP items".into())))
}

fn six<T>(items: Vec<T>) -> Result<[T; 6], SessionError> {
    items
        .try_into()
        .map_err(|_| SessionError::Proto(dl_proto::ProtoError::MalformedMessage("expected 6 SMP items".into())))
}

fn eight<T>(items: Vec<T>) -> Result<[T; 8], SessionError> {
    items
        .try_into()
        .map_err(|_| SessionError::Proto(dl_proto::ProtoError::MalformedMessage("expected 8 SMP items".into())))
}

fn eleven<T>(items: Vec<T>) -> Result<[T; 11], SessionError> {
    items
        .try_into()
        .map_err(|_| SessionError::Proto(dl_proto::ProtoError::MalformedMessage("expected 11 SMP items".into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_smp_exchange_matches_on_both_sides() {
        let mut initiator = SmpHandler::new();
        let mut responder = SmpHandler::new();

        let smp1 = initiator.initiate("swordfish");
        responder.stash(smp1);
        assert!(responder.has_stashed_buffer());

        let smp2 = responder.answer_stashed("swordfish").unwrap();
        let smp3 = initiator.process_step2(&smp2).unwrap();
        let (smp4, responder_matched) = responder.process_step3(&smp3).unwrap();
        let initiator_matched = initiator.process_step4(&smp4).unwrap();

        assert!(responder_matched);
        assert!(initiator_matched);
    }

    #[test]
    fn mismatched_secrets_do_not_match() {
        let mut initiator = SmpHandler::new();
        let mut responder = SmpHandler::new();

        let smp1 = initiator.initiate("swordfish");
        responder.stash(smp1);
        let smp2 = responder.answer_stashed("SWORDFISH").unwrap();
        let smp3 = initiator.process_step2(&smp2).unwrap();
        let (smp4, responder_matched) = responder.process_step3(&smp3).unwrap();
        let initiator_matched = initiator.process_step4(&smp4).unwrap();

        assert!(!responder_matched);
        assert!(!initiator_matched);
    }
}
