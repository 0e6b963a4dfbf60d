//! §8 scenarios 5 and 6: SMP success and failure carried out entirely
//! through two `Session`s exchanging `Message`s, mirroring how a relay
//! would forward opaque frames between them.

use dl_proto::{Command, Route};
use dl_session::{Role, Session, SessionObserver, SmpPhase};

#[derive(Default)]
struct RecordingObserver {
    smp_events: Vec<(SmpPhase, Option<String>, Option<bool>)>,
    errors: Vec<String>,
}

impl SessionObserver for RecordingObserver {
    fn recv(&mut self, _command: Command, _route: Route, _plaintext: &[u8]) {}

    fn handshake_done(&mut self, _session_id: u64, _server_initiated: bool) {}

    fn err(&mut self, _session_id: u64, error: &dl_session::SessionError) {
        self.errors.push(error.to_string());
    }

    fn smp(&mut self, phase: SmpPhase, _session_id: u64, payload: Option<&str>, matched: Option<bool>) {
        self.smp_events.push((phase, payload.map(str::to_owned), matched));
    }
}

fn handshake(a: &mut Session, b: &mut Session, obs_a: &mut RecordingObserver, obs_b: &mut RecordingObserver) {
    let redy = b.begin_handshake();
    let _ = a.begin_handshake();
    let pk_a = a.handle_handshake_message(&redy, obs_a).unwrap().unwrap();
    let pk_b = b.handle_handshake_message(&pk_a, obs_b).unwrap().unwrap();
    a.handle_handshake_message(&pk_b, obs_a).unwrap();
}

#[test]
fn smp_with_matching_secrets_reports_success_on_both_sides() {
    let mut a = Session::new(10, 20, Role::Initiator);
    let mut b = Session::new(20, 10, Role::Responder);
    let mut obs_a = RecordingObserver::default();
    let mut obs_b = RecordingObserver::default();
    handshake(&mut a, &mut b, &mut obs_a, &mut obs_b);

    let (smp0, smp1) = a.smp_initiate("favourite colour?", "blue").unwrap();
    b.handle_loop_message(&smp0, &mut obs_b).unwrap();
    assert_eq!(
        obs_b.smp_events[0],
        (SmpPhase::Request, Some("favourite colour?".to_string()), None)
    );

    b.handle_loop_message(&smp1, &mut obs_b).unwrap();
    let smp2 = b.smp_provide_answer("blue").unwrap();

    let smp3 = a.handle_loop_message(&smp2, &mut obs_a).unwrap().expect("initiator replies with SMP_3");
    let smp4 = b.handle_loop_message(&smp3, &mut obs_b).unwrap().expect("responder replies with SMP_4");
    let done = a.handle_loop_message(&smp4, &mut obs_a).unwrap();
    assert!(done.is_none());

    assert!(obs_a.smp_events.iter().any(|e| e.0 == SmpPhase::Complete && e.2 == Some(true)));
    assert!(obs_b.smp_events.iter().any(|e| e.0 == SmpPhase::Complete && e.2 == Some(true)));
    assert!(obs_a.errors.is_empty());
    assert!(obs_b.errors.is_empty());
}

#[test]
fn smp_with_mismatched_secrets_reports_failure_and_err_callback() {
    let mut a = Session::new(11, 21, Role::Initiator);
    let mut b = Session::new(21, 11, Role::Responder);
    let mut obs_a = RecordingObserver::default();
    let mut obs_b = RecordingObserver::default();
    handshake(&mut a, &mut b, &mut obs_a, &mut obs_b);

    let (smp0, smp1) = a.smp_initiate("favourite colour?", "blue").unwrap();
    b.handle_loop_message(&smp0, &mut obs_b).unwrap();
    b.handle_loop_message(&smp1, &mut obs_b).unwrap();
    let smp2 = b.smp_provide_answer("red").unwrap();

    let smp3 = a.handle_loop_message(&smp2, &mut obs_a).unwrap().unwrap();
    let smp4 = b.handle_loop_message(&smp3, &mut obs_b).unwrap().unwrap();
    a.handle_loop_message(&smp4, &mut obs_a).unwrap();

    assert!(obs_a.smp_events.iter().any(|e| e.0 == SmpPhase::Error && e.2 == Some(false)));
    assert!(obs_b.smp_events.iter().any(|e| e.0 == SmpPhase::Error && e.2 == Some(false)));
    assert!(obs_a.errors.iter().any(|e| e.contains("SMP secrets did not match")));
    assert!(obs_b.errors.iter().any(|e| e.contains("SMP secrets did not match")));
}
