//! The relay's service loop (§4.4) and shared state, plus the accept
//! loop and administrative shutdown path (§10 ambient supplement, §5
//! Cancellation/timeout). The accept-loop-that-spawns-a-task shape is
//! grounded in `guard-core::ipc::IpcServer::start`.

use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::net::TcpListener;
use tracing::{info, warn};

use dl_proto::framing::read_message;
use dl_proto::{Command, ErrorCode, Message};

use crate::error::RelayError;
use crate::log::EventLog;
use crate::registry::ClientRegistry;

pub const SERVER_ROUTE: u64 = 0;
pub const PROTOCOL_VERSION: &str = "1";

pub struct Shared {
    pub registry: ClientRegistry,
    pub max_send_queue: usize,
    pub event_log: EventLog,
}

pub struct Preamble {
    pub nick: String,
}

/// §4.4 step 1: expect `VERSION` then `REGISTER`. On any mismatch,
/// returns the `ErrorCode` and a diagnostic message for the caller to
/// relay as an `ERR` frame before closing — the connection is never
/// registered in the failure path.
pub async fn enforce_preamble<R>(
    reader: &mut R,
    peer_addr: SocketAddr,
    _registry: &ClientRegistry,
) -> Result<Preamble, (ErrorCode, String)>
where
    R: AsyncRead + Unpin,
{
    let version_msg = read_message(reader)
        .await
        .map_err(|e| (ErrorCode::NetworkError, e.to_string()))?
        .ok_or((ErrorCode::ClosedConn, "connection closed before VERSION".into()))?;

    if version_msg.command != Command::Version || version_msg.data != PROTOCOL_VERSION {
        return Err((ErrorCode::ProtocolVersionMismatch, format!("bad VERSION frame from {peer_addr}")));
    }

    let register_msg = read_message(reader)
        .await
        .map_err(|e| (ErrorCode::NetworkError, e.to_string()))?
        .ok_or((ErrorCode::ClosedConn, "connection closed before REGISTER".into()))?;

    if register_msg.command != Command::Register {
        return Err((ErrorCode::BadHandshake, format!("expected REGISTER from {peer_addr}")));
    }

    Ok(Preamble { nick: register_msg.data })
}

/// §4.4 step 2: dispatch one inbound frame from Connection `sender_id`.
/// Returns `ControlFlow::Break` when the Recv Worker must exit (an `END`
/// addressed to the server, or an invalid command).
pub async fn dispatch(sender_id: u64, msg: Message, shared: &Arc<Shared>) -> ControlFlow<()> {
    match msg.command {
        Command::End => {
            let route = msg.route.unwrap_or((sender_id, SERVER_ROUTE));
            if route.1 == SERVER_ROUTE {
                return ControlFlow::Break(());
            }
            let dest = route.1;
            let mut msg = msg;
            msg.route = Some((sender_id, dest));
            forward_or_invalid_id(sender_id, dest, msg, shared).await;
            ControlFlow::Continue(())
        }
        Command::ReqId => {
            let resolved = shared.registry.lookup_id_by_nick(&msg.data);
            let reply = Message::new(Command::SendId)
                .with_route((SERVER_ROUTE, sender_id))
                .with_data(resolved.map(|id| id.to_string()).unwrap_or_default());
            send_to(sender_id, reply, shared).await;
            ControlFlow::Continue(())
        }
        Command::ReqNick => {
            let nick: u64 = match msg.data.parse() {
                Ok(id) => id,
                Err(_) => return ControlFlow::Continue(()),
            };
            let resolved = shared.registry.lookup_nick_by_id(nick);
            let reply = Message::new(Command::SendNick)
                .with_route((SERVER_ROUTE, sender_id))
                .with_data(resolved.unwrap_or_default());
            send_to(sender_id, reply, shared).await;
            ControlFlow::Continue(())
        }
        cmd if cmd.is_forwardable_session_command() => {
            let Some(route) = msg.route else {
                return ControlFlow::Continue(());
            };
            let dest = route.1;
            let mut msg = msg;
            msg.route = Some((sender_id, dest));
            forward_or_invalid_id(sender_id, dest, msg, shared).await;
            ControlFlow::Continue(())
        }
        _ => {
            warn!(sender_id, command = ?msg.command, "invalid command, closing connection");
            ControlFlow::Break(())
        }
    }
}

async fn forward_or_invalid_id(sender_id: u64, dest: u64, msg: Message, shared: &Arc<Shared>) {
    if shared.registry.lookup_by_id(dest).is_some() {
        send_to(dest, msg, shared).await;
    } else {
        let err = Message::new(Command::Err)
            .with_route((SERVER_ROUTE, sender_id))
            .with_error((ErrorCode::InvalidId as u32).to_string());
        send_to(sender_id, err, shared).await;
    }
}

async fn send_to(dest: u64, msg: Message, shared: &Arc<Shared>) {
    if let Some(conn) = shared.registry.lookup_by_id(dest) {
        if conn.sender.send(msg).await.is_err() {
            shared.registry.unregister(dest);
        }
    }
}

/// Accept loop: binds `bind_addr`, spawns a connection task per accepted
/// socket, and drives administrative shutdown on `ctrl_c` by sending
/// `ERR(SERVER_SHUTDOWN)` to every registered Connection before the
/// process exits (§5 Cancellation/timeout, §10 supplement).
pub async fn run(bind_addr: &str, shared: Arc<Shared>) -> Result<(), RelayError> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "relay listening");

    let accept_shared = shared.clone();
    let accept_task = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    let shared = accept_shared.clone();
                    tokio::spawn(async move {
                        crate::connection::handle_connection(stream, peer_addr, shared).await;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept error");
                }
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    for conn in shared.registry.all_connections() {
        let shutdown = Message::new(Command::Err)
            .with_route((SERVER_ROUTE, conn.id))
            .with_error((ErrorCode::ServerShutdown as u32).to_string());
        let _ = conn.sender.send(shutdown).await;
    }
    shared.event_log.append("SERVER_STOP", "");

    accept_task.abort();
    Ok(())
}
