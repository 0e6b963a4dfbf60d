//! 4-byte big-endian length-prefixed JSON framing (§3, §6).
//!
//! Every frame on the wire is `[u32 length][JSON bytes]`. This mirrors the
//! length-delimited pattern the workspace already uses for its IPC
//! transport, generalized here to an async TCP stream and a JSON payload
//! instead of a line-delimited one.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProtoError;
use crate::message::Message;

/// Frames above this size are rejected before the length-prefixed body is
/// even read, bounding memory use against a hostile or confused peer.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Message,
) -> Result<(), ProtoError> {
    let body = message.to_json()?;
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge(body.len()));
    }
    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame. Returns `Ok(None)` on a clean EOF that lands exactly
/// on a frame boundary (the peer closed its write half between frames);
/// any other short read is `ConnectionClosed`.
pub async fn read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Message>, ProtoError> {
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge(len));
    }
    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ProtoError::ConnectionClosed
            } else {
                ProtoError::Io(e)
            }
        })?;
    Message::from_json(&body).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[tokio::test]
    async fn round_trips_a_message_through_a_duplex_pipe() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        let msg = Message::new(Command::Msg).with_route((1, 2)).with_data("aGk=");
        write_message(&mut client, &msg).await.unwrap();
        let received = read_message(&mut server).await.unwrap().unwrap();
        assert_eq!(msg, received);
    }

    #[tokio::test]
    async fn clean_eof_between_frames_yields_none() {
        let (client, mut server) = tokio::io::duplex(4096);
        drop(client);
        let result = read_message(&mut server).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn oversized_declared_length_is_rejected() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        client
            .write_u32((MAX_FRAME_LEN + 1) as u32)
            .await
            .unwrap();
        let result = read_message(&mut server).await;
        assert!(matches!(result, Err(ProtoError::FrameTooLarge(_))));
    }

    #[tokio::test]
    async fn truncated_body_is_connection_closed() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        client.write_u32(10).await.unwrap();
        client.write_all(b"ab").await.unwrap();
        drop(client);
        let result = read_message(&mut server).await;
        assert!(matches!(result, Err(ProtoError::ConnectionClosed)));
    }
}
