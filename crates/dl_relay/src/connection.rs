//! Per-connection Send Worker / Recv Worker pair (§4.4, §5), grounded in
//! `guard-core::ipc::handle_connection`'s split-stream-plus-spawned-task
//! shape. The Send Worker drains a bounded `mpsc` queue onto the socket;
//! the Recv Worker reads frames and dispatches them through
//! `crate::server::dispatch`. Either exiting unregisters the Connection.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{info, warn};

use dl_proto::framing::{read_message, write_message};
use dl_proto::Message;

use crate::server::Shared;

/// Runs one accepted TCP connection end to end: preamble, service loop,
/// teardown. Spawns the Send Worker as a sibling task and drives the
/// Recv Worker inline on the calling task.
pub async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, shared: Arc<Shared>) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!(%peer_addr, error = %e, "failed to set TCP_NODELAY");
    }
    let (reader, writer) = tokio::io::split(stream);
    run_connection(reader, writer, peer_addr, shared).await;
}

async fn run_connection<R, W>(mut reader: R, writer: W, peer_addr: SocketAddr, shared: Arc<Shared>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let preamble = match crate::server::enforce_preamble(&mut reader, peer_addr, &shared.registry).await {
        Ok(conn) => conn,
        Err((code, msg)) => {
            let mut writer = writer;
            let err = Message::new(dl_proto::Command::Err).with_error((code as u32).to_string());
            let _ = write_message(&mut writer, &err).await;
            info!(%peer_addr, reason = %msg, "preamble rejected");
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel::<Message>(shared.max_send_queue);
    let conn = match shared.registry.register(preamble.nick.clone(), peer_addr.ip(), tx) {
        Ok(conn) => conn,
        Err(e) => {
            let mut writer = writer;
            let err = Message::new(dl_proto::Command::Err).with_error((e.error_code() as u32).to_string());
            let _ = write_message(&mut writer, &err).await;
            info!(%peer_addr, reason = %e, "registration rejected");
            return;
        }
    };
    shared.event_log.append("CONNECTION_REGISTERED", &format!("id={} nick={}", conn.id, conn.nick));
    info!(id = conn.id, nick = %conn.nick, %peer_addr, "connection registered");

    let send_worker = {
        let mut writer = writer;
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if write_message(&mut writer, &msg).await.is_err() {
                    break;
                }
            }
        })
    };

    loop {
        match read_message(&mut reader).await {
            Ok(Some(msg)) => {
                if crate::server::dispatch(conn.id, msg, &shared).await.is_break() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(id = conn.id, error = %e, "recv worker error");
                break;
            }
        }
    }

    shared.registry.unregister(conn.id);
    send_worker.abort();
    shared.event_log.append("CONNECTION_CLOSED", &format!("id={}", conn.id));
    info!(id = conn.id, "connection unregistered");
}
