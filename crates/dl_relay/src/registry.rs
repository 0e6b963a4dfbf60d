//! `ClientRegistry` (§3): the relay's id/nick/ip maps, held behind a
//! single mutex so multi-reader/serialized-writer access is trivially
//! correct (§5 Shared resources), matching the teacher's
//! `guard-core::ipc::IpcAuthContext.sessions` approach of one lock
//! covering session state.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use dl_proto::Message;

pub const NICK_MAX_LEN: usize = 32;

/// A registered peer endpoint: its outbound frame queue and address.
pub struct Connection {
    pub id: u64,
    pub nick: String,
    pub ip: IpAddr,
    pub sender: mpsc::Sender<Message>,
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<u64, Arc<Connection>>,
    id_by_nick: HashMap<String, u64>,
    next_id: u64,
}

/// The three maps named in §3's `ClientRegistry` entity, collapsed to
/// one `by_id` map plus a nick index — `ip` lives on the `Connection`
/// itself rather than a fourth map, since nothing in §4.4 looks a
/// Connection up *by* IP.
#[derive(Default)]
pub struct ClientRegistry {
    inner: Mutex<Inner>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        ClientRegistry { inner: Mutex::new(Inner { by_id: HashMap::new(), id_by_nick: HashMap::new(), next_id: 1 }) }
    }

    /// Validates and reserves `nick`, returning the freshly assigned id
    /// and a registered `Connection` on success (§4.4 step 1).
    pub fn register(&self, nick: String, ip: IpAddr, sender: mpsc::Sender<Message>) -> Result<Arc<Connection>, crate::error::RelayError> {
        validate_nick(&nick)?;

        let mut inner = self.inner.lock();
        if inner.id_by_nick.contains_key(&nick) {
            return Err(crate::error::RelayError::NickInUse);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let conn = Arc::new(Connection { id, nick: nick.clone(), ip, sender });
        inner.by_id.insert(id, conn.clone());
        inner.id_by_nick.insert(nick, id);
        Ok(conn)
    }

    pub fn unregister(&self, id: u64) {
        let mut inner = self.inner.lock();
        if let Some(conn) = inner.by_id.remove(&id) {
            inner.id_by_nick.remove(&conn.nick);
        }
    }

    pub fn lookup_by_id(&self, id: u64) -> Option<Arc<Connection>> {
        self.inner.lock().by_id.get(&id).cloned()
    }

    /// `REQ_ID` (§4.4): resolve a nick to an id, or `None` on miss.
    pub fn lookup_id_by_nick(&self, nick: &str) -> Option<u64> {
        self.inner.lock().id_by_nick.get(nick).copied()
    }

    /// `REQ_NICK` (§4.4): the symmetric lookup.
    pub fn lookup_nick_by_id(&self, id: u64) -> Option<String> {
        self.inner.lock().by_id.get(&id).map(|c| c.nick.clone())
    }

    pub fn all_connections(&self) -> Vec<Arc<Connection>> {
        self.inner.lock().by_id.values().cloned().collect()
    }
}

fn validate_nick(nick: &str) -> Result<(), crate::error::RelayError> {
    if nick.is_empty() {
        return Err(crate::error::RelayError::EmptyNick);
    }
    if !nick.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(crate::error::RelayError::InvalidNickContent);
    }
    if nick.chars().count() > NICK_MAX_LEN {
        return Err(crate::error::RelayError::InvalidNickLength(NICK_MAX_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_sender() -> mpsc::Sender<Message> {
        mpsc::channel(8).0
    }

    #[test]
    fn registers_and_resolves_a_nick() {
        let registry = ClientRegistry::new();
        let conn = registry.register("alice".into(), "127.0.0.1".parse().unwrap(), dummy_sender()).unwrap();
        assert_eq!(registry.lookup_id_by_nick("alice"), Some(conn.id));
        assert_eq!(registry.lookup_nick_by_id(conn.id), Some("alice".to_string()));
    }

    #[test]
    fn rejects_duplicate_nick() {
        let registry = ClientRegistry::new();
        registry.register("bob".into(), "127.0.0.1".parse().unwrap(), dummy_sender()).unwrap();
        let err = registry.register("bob".into(), "127.0.0.1".parse().unwrap(), dummy_sender()).unwrap_err();
        assert!(matches!(err, crate::error::RelayError::NickInUse));
    }

    #[test]
    fn rejects_empty_and_overlong_and_non_alphanumeric_nicks() {
        let registry = ClientRegistry::new();
        let ip = "127.0.0.1".parse().unwrap();
        assert!(matches!(
            registry.register("".into(), ip, dummy_sender()).unwrap_err(),
            crate::error::RelayError::EmptyNick
        ));
        assert!(matches!(
            registry.register("a".repeat(33), ip, dummy_sender()).unwrap_err(),
            crate::error::RelayError::InvalidNickLength(NICK_MAX_LEN)
        ));
        assert!(matches!(
            registry.register("bad nick!".into(), ip, dummy_sender()).unwrap_err(),
            crate::error::RelayError::InvalidNickContent
        ));
    }

    #[test]
    fn unregister_frees_the_nick_for_reuse() {
        let registry = ClientRegistry::new();
        let conn = registry.register("carol".into(), "127.0.0.1".parse().unwrap(), dummy_sender()).unwrap();
        registry.unregister(conn.id);
        assert!(registry.lookup_id_by_nick("carol").is_none());
        assert!(registry.register("carol".into(), "127.0.0.1".parse().unwrap(), dummy_sender()).is_ok());
    }

    #[test]
    fn boundary_nick_length_32_is_accepted_33_is_rejected() {
        let registry = ClientRegistry::new();
        let ip = "127.0.0.1".parse().unwrap();
        assert!(registry.register("a".repeat(32), ip, dummy_sender()).is_ok());
        assert!(matches!(
            registry.register("b".repeat(33), ip, dummy_sender()).unwrap_err(),
            crate::error::RelayError::InvalidNickLength(_)
        ));
    }
}
