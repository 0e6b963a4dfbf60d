//! The per-peer `Session` state machine (§4.3): `INIT → HANDSHAKING →
//! ENCRYPTED_LOOP → TERMINATED`, flattened from the source's
//! `Session → PrivateSession` class hierarchy into one type with a
//! `Role` enum selecting the handshake variant (§9).

use base64::{engine::general_purpose::STANDARD, Engine};
use dl_proto::{Command, Message, Route};
use tracing::{info, warn};

use crate::callbacks::{SessionObserver, SmpPhase};
use crate::crypto_context::CryptoContext;
use crate::error::SessionError;
use crate::smp_handler::SmpHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Handshaking,
    EncryptedLoop,
    Terminated,
}

/// The commands valid once `handshake_done` is true (glossary: Loop
/// Command Set).
fn is_loop_command(command: Command) -> bool {
    command.is_loop_command()
}

fn is_smp_command(command: Command) -> bool {
    command.is_smp_command()
}

pub struct Session {
    own_id: u64,
    remote_id: u64,
    role: Role,
    phase: Phase,

    crypto: CryptoContext,
    smp: Option<SmpHandler>,

    encrypted: bool,
    handshake_done: bool,
    incoming_counter: u64,
    outgoing_counter: u64,
}

impl Session {
    pub fn new(own_id: u64, remote_id: u64, role: Role) -> Self {
        Session {
            own_id,
            remote_id,
            role,
            phase: Phase::Init,
            crypto: CryptoContext::new(),
            smp: None,
            encrypted: false,
            handshake_done: false,
            incoming_counter: 0,
            outgoing_counter: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }

    fn route(&self) -> Route {
        (self.own_id, self.remote_id)
    }

    /// The first frame this role sends to begin the handshake
    /// (§4.3: initiator sends `HELO`, responder sends `REDY`).
    pub fn begin_handshake(&mut self) -> Message {
        self.phase = Phase::Handshaking;
        match self.role {
            Role::Initiator => Message::new(Command::Helo).with_route(self.route()),
            Role::Responder => Message::new(Command::Redy).with_route(self.route()),
        }
    }

    /// Drives the handshake forward given an inbound handshake-phase
    /// message. Returns the next frame to send, if any.
    pub fn handle_handshake_message(
        &mut self,
        message: &Message,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<Message>, SessionError> {
        match message.command {
            Command::End => {
                self.phase = Phase::Terminated;
                Err(SessionError::ConnectionEnded)
            }
            Command::Reject => {
                self.phase = Phase::Terminated;
                Err(SessionError::ConnectionRejected)
            }
            Command::Redy if self.role == Role::Initiator => {
                Ok(Some(
                    Message::new(Command::PubKey)
                        .with_route(self.route())
                        .with_data(self.crypto.public_key_data()),
                ))
            }
            Command::PubKey => {
                self.crypto.complete_handshake(&message.data)?;
                self.encrypted = true;

                let reply = if self.role == Role::Responder && !self.handshake_done {
                    Some(
                        Message::new(Command::PubKey)
                            .with_route(self.route())
                            .with_data(self.crypto.public_key_data()),
                    )
                } else {
                    None
                };

                self.handshake_done = true;
                self.phase = Phase::EncryptedLoop;
                info!(own_id = self.own_id, remote_id = self.remote_id, "handshake complete");
                observer.handshake_done(self.own_id, self.role == Role::Responder);
                Ok(reply)
            }
            other => {
                self.phase = Phase::Terminated;
                Err(SessionError::InvalidCommand(other))
            }
        }
    }

    /// The encrypted loop (§4.3 numbered steps 1–5) for one inbound
    /// `Message`. Returns the frame to send in reply, if the dispatch
    /// produces one (e.g. an SMP sub-step).
    pub fn handle_loop_message(
        &mut self,
        message: &Message,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<Message>, SessionError> {
        if message.command == Command::End {
            self.phase = Phase::Terminated;
            observer.err(self.own_id, &SessionError::ConnectionEnded);
            return Err(SessionError::ConnectionEnded);
        }

        if self.handshake_done && !is_loop_command(message.command) {
            self.phase = Phase::Terminated;
            let err = SessionError::InvalidCommand(message.command);
            observer.err(self.own_id, &err);
            return Err(err);
        }

        let plaintext = match self.decrypt_frame(message) {
            Ok(pt) => pt,
            Err(e) => {
                observer.err(self.own_id, &e);
                if e.is_tampering_signal() {
                    return Ok(None);
                }
                return Err(e);
            }
        };

        if is_smp_command(message.command) {
            return self.dispatch_smp(message.command, &plaintext, observer);
        }

        observer.recv(message.command, message.route.unwrap_or((0, 0)), &plaintext);
        Ok(None)
    }

    /// §4.3.1: decrypt and authenticate one inbound frame. Handshake-
    /// phase messages (where `data` is plaintext, not yet AES-framed)
    /// pass through unchanged.
    fn decrypt_frame(&mut self, message: &Message) -> Result<Vec<u8>, SessionError> {
        if !self.encrypted || message.hmac.is_empty() {
            return Ok(message.data.clone().into_bytes());
        }

        let ct = STANDARD.decode(&message.data)?;
        let mac_received = STANDARD.decode(&message.hmac)?;
        let mac_computed = self.crypto.hmac(&ct)?;
        if !dl_crypto::mac::secure_compare(&mac_computed, &mac_received) {
            return Err(SessionError::BadHmac);
        }

        if !message.num.is_empty() {
            let enc_num = STANDARD.decode(&message.num)?;
            let num_plaintext = self.crypto.decrypt(&enc_num)?;
            let n: u64 = String::from_utf8_lossy(&num_plaintext)
                .parse()
                .map_err(|_| SessionError::BadDecrypt)?;

            if n < self.incoming_counter {
                return Err(SessionError::MessageReplay { received: n, expected: self.incoming_counter });
            }
            if n > self.incoming_counter {
                return Err(SessionError::MessageDeletion { received: n, expected: self.incoming_counter });
            }
            self.incoming_counter += 1;
        }

        self.crypto.decrypt(&ct)
    }

    /// `send_message` (§4.3): construct and encrypt an outbound Message.
    pub fn send_message(&mut self, command: Command, plaintext: Option<&[u8]>) -> Result<Message, SessionError> {
        let mut msg = Message::new(command).with_route(self.route());

        if let (true, Some(pt)) = (self.encrypted, plaintext) {
            let ct = self.crypto.encrypt(pt)?;
            let enc_num = self.crypto.encrypt(self.outgoing_counter.to_string().as_bytes())?;
            let mac = self.crypto.hmac(&ct)?;

            msg = msg
                .with_data(STANDARD.encode(&ct))
                .with_num(STANDARD.encode(&enc_num))
                .with_hmac(STANDARD.encode(mac));

            self.outgoing_counter += 1;
        } else if let Some(pt) = plaintext {
            msg = msg.with_data(String::from_utf8_lossy(pt).into_owned());
        }

        Ok(msg)
    }

    /// Initiator: begin an SMP exchange by asking `question`, returning
    /// the `SMP_0` (plaintext question) and `SMP_1` frames to send.
    pub fn smp_initiate(&mut self, question: &str, secret: &str) -> Result<(Message, Message), SessionError> {
        let smp0 = self.send_message(Command::Smp0, Some(question.as_bytes()))?;
        let mut handler = SmpHandler::new();
        let buffer = handler.initiate(secret);
        self.smp = Some(handler);
        let smp1 = self.send_message(Command::Smp1, Some(&buffer))?;
        Ok((smp0, smp1))
    }

    /// Responder: the upper layer supplied an answer after an `SMP_0`
    /// `REQUEST` callback and a stashed `SMP_1` buffer (§4.3.2).
    pub fn smp_provide_answer(&mut self, secret: &str) -> Result<Message, SessionError> {
        let handler = self.smp.as_mut().ok_or(SessionError::BadHandshake)?;
        let buffer = handler.answer_stashed(secret)?;
        self.send_message(Command::Smp2, Some(&buffer))
    }

    fn dispatch_smp(
        &mut self,
        command: Command,
        plaintext: &[u8],
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<Message>, SessionError> {
        match command {
            Command::Smp0 => {
                let question = String::from_utf8_lossy(plaintext).into_owned();
                observer.smp(SmpPhase::Request, self.own_id, Some(&question), None);
                Ok(None)
            }
            Command::Smp1 => {
                let handler = self.smp.get_or_insert_with(SmpHandler::new);
                handler.stash(plaintext.to_vec());
                Ok(None)
            }
            Command::Smp2 => {
                let handler = self.smp.as_mut().ok_or(SessionError::BadHandshake)?;
                let buffer = handler.process_step2(plaintext)?;
                Ok(Some(self.send_message(Command::Smp3, Some(&buffer))?))
            }
            Command::Smp3 => {
                let handler = self.smp.as_mut().ok_or(SessionError::BadHandshake)?;
                let (buffer, matched) = handler.process_step3(plaintext)?;
                self.report_smp_outcome(matched, observer);
                Ok(Some(self.send_message(Command::Smp4, Some(&buffer))?))
            }
            Command::Smp4 => {
                let handler = self.smp.as_mut().ok_or(SessionError::BadHandshake)?;
                let matched = handler.process_step4(plaintext)?;
                self.report_smp_outcome(matched, observer);
                self.smp = None;
                Ok(None)
            }
            _ => unreachable!("dispatch_smp called with non-SMP command"),
        }
    }

    fn report_smp_outcome(&self, matched: bool, observer: &mut dyn SessionObserver) {
        if matched {
            observer.smp(SmpPhase::Complete, self.own_id, None, Some(true));
        } else {
            warn!(own_id = self.own_id, "SMP secrets did not match");
            observer.smp(SmpPhase::Error, self.own_id, None, Some(false));
            observer.err(self.own_id, &SessionError::SmpMatchFailed);
        }
    }
}
