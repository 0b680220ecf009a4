//! The RESP subset Faktory speaks: simple strings, errors and bulk strings.
//!
//! Parsing rules:
//! - Every reply is read line-first; bulk payloads are read with an exact
//!   length and must be followed by CRLF.
//! - Bulk lengths above [`MAX_BULK_LEN`] are rejected before allocating.
//! - Reply lines longer than [`MAX_LINE_LEN`] are rejected without buffering
//!   the rest of the line.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound for a single bulk reply (an `INFO` payload is a few KiB).
pub const MAX_BULK_LEN: usize = 16 * 1024 * 1024;

/// Upper bound for a status line (`+HI {...}`, `-ERR ...`, `$len`), CRLF excluded.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("connection closed by server")]
    Closed,
    #[error("timed out after {0}ms")]
    Timeout(u64),
    #[error("server error: {0}")]
    Server(String),
    #[error("protocol: {0}")]
    Protocol(String),
    #[error("auth: {0}")]
    Auth(String),
}

/// A non-error reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+text`
    Simple(String),
    /// `$len` payload; `None` for `$-1`.
    Bulk(Option<Vec<u8>>),
}

async fn read_line<R: AsyncBufRead + Unpin>(r: &mut R) -> Result<String, WireError> {
    let mut buf = Vec::new();
    let limit = (MAX_LINE_LEN + 2) as u64;
    let n = (&mut *r).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Err(WireError::Closed);
    }
    if !buf.ends_with(b"\n") && n as u64 == limit {
        return Err(WireError::Protocol(format!("reply line longer than {MAX_LINE_LEN} bytes")));
    }
    if !buf.ends_with(b"\r\n") {
        return Err(WireError::Protocol("reply line not terminated by CRLF".into()));
    }
    buf.truncate(buf.len() - 2);
    String::from_utf8(buf).map_err(|_| WireError::Protocol("reply line is not utf-8".into()))
}

/// Read one reply. `-ERR ...` replies surface as [`WireError::Server`].
pub async fn read_reply<R: AsyncBufRead + Unpin>(r: &mut R) -> Result<Reply, WireError> {
    let line = read_line(r).await?;
    let mut chars = line.chars();
    let tag = chars.next();
    let body = chars.as_str();

    match tag {
        Some('+') => Ok(Reply::Simple(body.to_string())),
        Some('-') => Err(WireError::Server(body.to_string())),
        Some('$') => {
            let len: i64 = body
                .parse()
                .map_err(|_| WireError::Protocol(format!("invalid bulk length {body:?}")))?;
            if len < 0 {
                return Ok(Reply::Bulk(None));
            }
            let len = len as usize;
            if len > MAX_BULK_LEN {
                return Err(WireError::Protocol(format!("bulk reply too large: {len} bytes")));
            }
            let mut payload = vec![0u8; len + 2];
            r.read_exact(&mut payload).await.map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => WireError::Closed,
                _ => WireError::Io(e),
            })?;
            if !payload.ends_with(b"\r\n") {
                return Err(WireError::Protocol("bulk reply not terminated by CRLF".into()));
            }
            payload.truncate(len);
            Ok(Reply::Bulk(Some(payload)))
        }
        _ => Err(WireError::Protocol(format!("unexpected reply {line:?}"))),
    }
}

/// Write one command line and flush.
pub async fn write_command<W: AsyncWrite + Unpin>(w: &mut W, line: &str) -> Result<(), WireError> {
    w.write_all(line.as_bytes()).await?;
    w.write_all(b"\r\n").await?;
    w.flush().await?;
    Ok(())
}
