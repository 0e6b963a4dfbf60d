//! End-to-end scenarios 2 and 3 from §8: full handshake between an
//! initiator and a responder, followed by an encrypted message
//! round-trip in both directions.

use dl_proto::{Command, Route};
use dl_session::{Role, Session, SessionObserver, SmpPhase};

#[derive(Default)]
struct RecordingObserver {
    received: Vec<(Command, Route, Vec<u8>)>,
    handshake_done: Vec<(u64, bool)>,
    errors: Vec<String>,
}

impl SessionObserver for RecordingObserver {
    fn recv(&mut self, command: Command, route: Route, plaintext: &[u8]) {
        self.received.push((command, route, plaintext.to_vec()));
    }

    fn handshake_done(&mut self, session_id: u64, server_initiated: bool) {
        self.handshake_done.push((session_id, server_initiated));
    }

    fn err(&mut self, _session_id: u64, error: &dl_session::SessionError) {
        self.errors.push(error.to_string());
    }

    fn smp(&mut self, _phase: SmpPhase, _session_id: u64, _payload: Option<&str>, _matched: Option<bool>) {}
}

#[test]
fn full_handshake_then_encrypted_round_trip_both_directions() {
    let mut a = Session::new(101, 202, Role::Initiator);
    let mut b = Session::new(202, 101, Role::Responder);
    let mut obs_a = RecordingObserver::default();
    let mut obs_b = RecordingObserver::default();

    // A -> S -> B: HELO
    let helo = a.begin_handshake();
    assert_eq!(helo.command, Command::Helo);

    // B -> S -> A: REDY
    let redy = b.begin_handshake();
    assert_eq!(redy.command, Command::Redy);

    // A processes REDY, sends PUB_KEY
    let a_pub_key = a
        .handle_handshake_message(&redy, &mut obs_a)
        .unwrap()
        .expect("initiator replies with PUB_KEY after REDY");
    assert_eq!(a_pub_key.command, Command::PubKey);

    // B processes A's PUB_KEY, completes its own handshake, replies PUB_KEY
    let b_pub_key = b
        .handle_handshake_message(&a_pub_key, &mut obs_b)
        .unwrap()
        .expect("responder replies with its own PUB_KEY");
    assert_eq!(b_pub_key.command, Command::PubKey);
    assert!(b.handshake_done());

    // A processes B's PUB_KEY, completes handshake
    let reply = a.handle_handshake_message(&b_pub_key, &mut obs_a).unwrap();
    assert!(reply.is_none());
    assert!(a.handshake_done());

    assert_eq!(obs_a.handshake_done, vec![(101, false)]);
    assert_eq!(obs_b.handshake_done, vec![(202, true)]);

    // A sends an encrypted MSG, B decrypts it
    let msg = a.send_message(Command::Msg, Some(b"hello")).unwrap();
    let reply = b.handle_loop_message(&msg, &mut obs_b).unwrap();
    assert!(reply.is_none());
    assert_eq!(obs_b.received, vec![(Command::Msg, (101, 202), b"hello".to_vec())]);

    // B replies, A decrypts it
    let reply_msg = b.send_message(Command::Msg, Some(b"hi")).unwrap();
    a.handle_loop_message(&reply_msg, &mut obs_a).unwrap();
    assert_eq!(obs_a.received, vec![(Command::Msg, (202, 101), b"hi".to_vec())]);

    assert!(obs_a.errors.is_empty());
    assert!(obs_b.errors.is_empty());
}

#[test]
fn replayed_frame_is_detected_and_counter_unchanged() {
    let mut a = Session::new(1, 2, Role::Initiator);
    let mut b = Session::new(2, 1, Role::Responder);
    let mut obs_a = RecordingObserver::default();
    let mut obs_b = RecordingObserver::default();

    let redy = b.begin_handshake();
    let _ = a.begin_handshake();
    let pk_a = a.handle_handshake_message(&redy, &mut obs_a).unwrap().unwrap();
    let pk_b = b.handle_handshake_message(&pk_a, &mut obs_b).unwrap().unwrap();
    a.handle_handshake_message(&pk_b, &mut obs_a).unwrap();

    let msg = a.send_message(Command::Msg, Some(b"first")).unwrap();
    b.handle_loop_message(&msg, &mut obs_b).unwrap();
    assert_eq!(obs_b.received.len(), 1);

    // Replay the same frame.
    b.handle_loop_message(&msg, &mut obs_b).unwrap();
    assert_eq!(obs_b.received.len(), 1, "replayed frame must not be delivered again");
    assert!(obs_b.errors.iter().any(|e| e.contains("replay")));
}
