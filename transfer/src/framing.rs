use bytes::{BufMut, BytesMut};
use log::debug;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.2
//
// The message is prefixed with a two byte length field which gives the
// message length, excluding the two byte length field.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Reads one length-prefixed message. `Ok(None)` if the peer closed the
/// stream before sending a prefix.
pub async fn read_message<R>(reader: &mut R) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u16().await {
        Ok(len) => usize::from(len),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf).await?;
    debug!("read framed message, length: {}", len);

    Ok(Some(buf))
}

pub async fn write_message<W>(writer: &mut W, message: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if message.len() > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("message of {} bytes does not fit a frame", message.len()),
        ));
    }

    let mut frame = BytesMut::with_capacity(2 + message.len());
    frame.put_u16(message.len() as u16);
    frame.put_slice(message);
    writer.write_all(&frame).await?;
    writer.flush().await?;
    debug!("wrote framed message, length: {}", message.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_both_ways() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        write_message(&mut client, &[1, 2, 3]).await.unwrap();
        write_message(&mut client, &[]).await.unwrap();
        drop(client);

        assert_eq!(read_message(&mut server).await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(read_message(&mut server).await.unwrap(), Some(vec![]));
        assert_eq!(read_message(&mut server).await.unwrap(), None);
    }

    #[tokio::test]
    async fn prefix_is_big_endian() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let message = vec![7u8; 300];
        write_message(&mut client, &message).await.unwrap();

        let mut prefix = [0u8; 2];
        server.read_exact(&mut prefix).await.unwrap();
        assert_eq!(prefix, [1, 44]);
    }

    #[tokio::test]
    async fn truncated_frame_is_an_error() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&[0, 5, 1, 2]).await.unwrap();
        drop(client);

        let err = read_message(&mut server).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn oversized_message_is_rejected() {
        let (mut client, _server) = tokio::io::duplex(16);
        let err = write_message(&mut client, &vec![0; MAX_FRAME_LEN + 1])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
