//! Faktory client: handshake + `INFO`.
//!
//! Lifecycle:
//! - `connect` dials and completes `HI`/`HELLO` eagerly so a bad address or
//!   password stops the process at startup.
//! - After any failed fetch the connection is dropped; the next fetch dials a
//!   fresh one.
//! - Every network step is bounded by the configured timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::BufStream;
use tokio::net::TcpStream;

use faktory_exporter_core::{ExporterError, Result, StatusDocument};

use super::resp::{read_reply, write_command, Reply, WireError};
use super::url::ConnectionUrl;
use super::StatusSource;

/// Protocol version this client speaks.
const PROTOCOL_VERSION: u32 = 2;

type Conn = BufStream<TcpStream>;

/// Server greeting (`+HI {...}`).
#[derive(Debug, Deserialize)]
struct Hi {
    v: u32,
    /// Password hash iterations, present when a password is required.
    #[serde(default)]
    i: Option<u32>,
    /// Password salt, present when a password is required.
    #[serde(default)]
    s: Option<String>,
}

/// Client greeting (`HELLO {...}`).
#[derive(Debug, Serialize)]
struct Hello {
    hostname: String,
    pid: u32,
    v: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pwdhash: Option<String>,
}

/// `sha256(password + salt)` re-hashed until `iterations` rounds, hex encoded.
pub fn hash_password(password: &str, salt: &str, iterations: u32) -> String {
    let mut digest = Sha256::digest(format!("{password}{salt}").as_bytes());
    for _ in 1..iterations.max(1) {
        digest = Sha256::digest(digest);
    }
    hex::encode(digest)
}

/// Kernel hostname, then `/etc/hostname`, then `$HOSTNAME`.
fn hostname() -> String {
    ["/proc/sys/kernel/hostname", "/etc/hostname"]
        .iter()
        .filter_map(|p| std::fs::read_to_string(p).ok())
        .chain(std::env::var("HOSTNAME").ok())
        .map(|h| h.trim().to_string())
        .find(|h| !h.is_empty())
        .unwrap_or_else(|| "faktory_exporter".to_string())
}

pub struct FaktoryClient {
    target: ConnectionUrl,
    timeout: Duration,
    conn: Option<Conn>,
}

impl FaktoryClient {
    /// Dial and handshake. Any failure is a `ConnectionSetup` error.
    pub async fn connect(target: ConnectionUrl, timeout: Duration) -> Result<Self> {
        let conn = dial(&target, timeout)
            .await
            .map_err(|e| ExporterError::ConnectionSetup(format!("{target}: {e}")))?;
        tracing::info!(url = %target, "connected to faktory");
        Ok(Self {
            target,
            timeout,
            conn: Some(conn),
        })
    }

    /// Issue `INFO` and parse its JSON payload.
    pub async fn info(&mut self) -> Result<StatusDocument> {
        let res = self.try_info().await;
        if res.is_err() {
            self.conn = None;
        }
        res.map_err(|e| ExporterError::Fetch(format!("{}: {e}", self.target)))
    }

    async fn try_info(&mut self) -> std::result::Result<StatusDocument, WireError> {
        let conn = match self.conn.take() {
            Some(c) => c,
            None => {
                tracing::debug!(url = %self.target, "redialing faktory");
                dial(&self.target, self.timeout).await?
            }
        };
        let conn = self.conn.insert(conn);

        let reply = bounded(self.timeout, async move {
            write_command(conn, "INFO").await?;
            read_reply(conn).await
        })
        .await?;

        let payload = match reply {
            Reply::Bulk(Some(p)) => p,
            Reply::Bulk(None) => return Err(WireError::Protocol("empty INFO reply".into())),
            Reply::Simple(s) => {
                return Err(WireError::Protocol(format!("unexpected INFO reply {s:?}")))
            }
        };
        let value: serde_json::Value = serde_json::from_slice(&payload)
            .map_err(|e| WireError::Protocol(format!("INFO is not json: {e}")))?;
        tracing::debug!(info = %value, "faktory INFO");
        StatusDocument::from_value(value)
            .ok_or_else(|| WireError::Protocol("INFO is not a json object".into()))
    }
}

#[async_trait]
impl StatusSource for FaktoryClient {
    async fn fetch_status(&mut self) -> Result<StatusDocument> {
        self.info().await
    }
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> std::result::Result<T, WireError>
where
    F: Future<Output = std::result::Result<T, WireError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| WireError::Timeout(timeout.as_millis() as u64))?
}

async fn dial(target: &ConnectionUrl, timeout: Duration) -> std::result::Result<Conn, WireError> {
    let stream = bounded(timeout, async {
        TcpStream::connect(target.address()).await.map_err(WireError::Io)
    })
    .await?;
    stream.set_nodelay(true).ok();

    let mut conn = BufStream::new(stream);
    bounded(timeout, handshake(&mut conn, target.password.as_deref())).await?;
    Ok(conn)
}

async fn handshake(conn: &mut Conn, password: Option<&str>) -> std::result::Result<(), WireError> {
    let greeting = match read_reply(conn).await? {
        Reply::Simple(s) => s,
        other => return Err(WireError::Protocol(format!("expected HI, got {other:?}"))),
    };
    let json = greeting
        .strip_prefix("HI ")
        .ok_or_else(|| WireError::Protocol(format!("expected HI, got {greeting:?}")))?;
    let hi: Hi = serde_json::from_str(json)
        .map_err(|e| WireError::Protocol(format!("invalid HI payload: {e}")))?;

    if hi.v > PROTOCOL_VERSION {
        tracing::warn!(
            server = hi.v,
            client = PROTOCOL_VERSION,
            "faktory protocol versions differ"
        );
    }

    let pwdhash = match hi.s {
        Some(salt) => {
            let pwd = password
                .ok_or_else(|| WireError::Auth("server requires a password".into()))?;
            Some(hash_password(pwd, &salt, hi.i.unwrap_or(1)))
        }
        None => None,
    };

    let hello = Hello {
        hostname: hostname(),
        pid: std::process::id(),
        v: PROTOCOL_VERSION,
        pwdhash,
    };
    let hello = serde_json::to_string(&hello)
        .map_err(|e| WireError::Protocol(format!("encode HELLO: {e}")))?;
    write_command(conn, &format!("HELLO {hello}")).await?;

    match read_reply(conn).await {
        Ok(Reply::Simple(s)) if s == "OK" => Ok(()),
        Ok(other) => Err(WireError::Protocol(format!("expected OK, got {other:?}"))),
        Err(WireError::Server(msg)) => Err(WireError::Auth(msg)),
        Err(e) => Err(e),
    }
}
