//! Stream framing
//!
//! Segments an unstructured byte stream into discrete messages. Messages
//! end with the tail marker, but the marker's byte value can legitimately
//! occur inside variable-length payload fields, so each read is bounded
//! below by the id's minimum length from [`min_response_length`]: a tail
//! byte seen before that minimum is payload, not a terminator.
//!
//! Reads are deliberately one byte at a time. The device guarantees
//! nothing beyond the tail/min-length rule, and messages are a handful of
//! bytes, so there is no grammar to parse ahead of.

use bytes::{BufMut, Bytes, BytesMut};
use std::io::{ErrorKind, Read, Write};

use crate::constants::{MESSAGE_TAIL, min_response_length};
use crate::error::TransportError;

#[cfg(feature = "async")]
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read one complete framed message, blocking until the tail marker is
/// accepted at or past the id's minimum length.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Bytes, TransportError> {
    let mut raw = read_byte(reader)?;
    let min = min_response_length(raw);
    let mut message = BytesMut::with_capacity(min.max(8));
    let mut count = 1;
    while raw != MESSAGE_TAIL || count < min {
        message.put_u8(raw);
        raw = read_byte(reader)?;
        count += 1;
    }
    message.put_u8(raw);
    Ok(message.freeze())
}

/// Async flavor of [`read_message`].
#[cfg(feature = "async")]
pub async fn read_message_async<R>(reader: &mut R) -> Result<Bytes, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = read_byte_async(reader).await?;
    let min = min_response_length(raw);
    let mut message = BytesMut::with_capacity(min.max(8));
    let mut count = 1;
    while raw != MESSAGE_TAIL || count < min {
        message.put_u8(raw);
        raw = read_byte_async(reader).await?;
        count += 1;
    }
    message.put_u8(raw);
    Ok(message.freeze())
}

/// Write an already-framed message to the sink.
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<(), TransportError> {
    writer.write_all(frame)?;
    writer.flush()?;
    Ok(())
}

/// Async flavor of [`write_frame`].
#[cfg(feature = "async")]
pub async fn write_frame_async<W>(writer: &mut W, frame: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await?;
    Ok(())
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8, TransportError> {
    let mut byte = [0u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(byte[0]),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(TransportError::Closed),
        Err(e) => Err(e.into()),
    }
}

#[cfg(feature = "async")]
async fn read_byte_async<R>(reader: &mut R) -> Result<u8, TransportError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_u8().await {
        Ok(byte) => Ok(byte),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(TransportError::Closed),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{RESP_COMMAND_STATUS, RESP_STATUS, RESP_WIFI_LIST};
    use std::io::Cursor;

    #[test]
    fn test_read_simple_message() {
        let mut source = Cursor::new(vec![RESP_COMMAND_STATUS, 0x00, MESSAGE_TAIL]);
        let message = read_message(&mut source).unwrap();
        assert_eq!(&message[..], &[RESP_COMMAND_STATUS, 0x00, MESSAGE_TAIL]);
    }

    #[test]
    fn test_tail_valued_payload_byte_does_not_terminate_early() {
        // Kettle status whose water-sensor low byte equals the tail marker.
        let wire = vec![RESP_STATUS, 0x00, 90, MESSAGE_TAIL, 0x01, MESSAGE_TAIL];
        let mut source = Cursor::new(wire.clone());
        let message = read_message(&mut source).unwrap();
        assert_eq!(&message[..], &wire[..]);
    }

    #[test]
    fn test_variable_length_message_ends_at_first_tail() {
        let mut wire = vec![RESP_WIFI_LIST];
        wire.extend_from_slice(b"HomeNet,-40}");
        wire.push(MESSAGE_TAIL);
        wire.extend_from_slice(b"junk from the next message");
        let mut source = Cursor::new(wire);
        let message = read_message(&mut source).unwrap();
        assert_eq!(message[0], RESP_WIFI_LIST);
        assert_eq!(*message.last().unwrap(), MESSAGE_TAIL);
        assert_eq!(message.len(), 14);
    }

    #[test]
    fn test_consecutive_messages_stay_aligned() {
        let mut wire = vec![RESP_COMMAND_STATUS, 0x00, MESSAGE_TAIL];
        wire.extend_from_slice(&[RESP_STATUS, 0x01, 90, 0x0a, 0x08, MESSAGE_TAIL]);
        let mut source = Cursor::new(wire);
        let first = read_message(&mut source).unwrap();
        let second = read_message(&mut source).unwrap();
        assert_eq!(first[0], RESP_COMMAND_STATUS);
        assert_eq!(second[0], RESP_STATUS);
        assert_eq!(second.len(), 6);
    }

    #[test]
    fn test_closed_source_mid_message() {
        let mut source = Cursor::new(vec![RESP_STATUS, 0x01, 90]);
        let err = read_message(&mut source).unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }

    #[test]
    fn test_closed_source_before_any_byte() {
        let mut source = Cursor::new(Vec::<u8>::new());
        assert!(matches!(
            read_message(&mut source).unwrap_err(),
            TransportError::Closed
        ));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_read_matches_sync() {
        let wire = vec![RESP_STATUS, 0x00, 90, MESSAGE_TAIL, 0x01, MESSAGE_TAIL];
        let mut sync_source = Cursor::new(wire.clone());
        let sync_message = read_message(&mut sync_source).unwrap();

        let (mut client, mut device) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut device, &wire)
            .await
            .unwrap();
        let async_message = read_message_async(&mut client).await.unwrap();
        assert_eq!(sync_message, async_message);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_write_frame_async_passes_bytes_through() {
        let (mut client, mut device) = tokio::io::duplex(64);
        write_frame_async(&mut client, &[0x64, MESSAGE_TAIL])
            .await
            .unwrap();
        let mut received = [0u8; 2];
        tokio::io::AsyncReadExt::read_exact(&mut device, &mut received)
            .await
            .unwrap();
        assert_eq!(received, [0x64, MESSAGE_TAIL]);
    }
}
