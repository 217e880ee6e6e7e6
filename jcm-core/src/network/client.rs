use std::fmt;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::codec::{CommandCodec, ResponseCodec};
use crate::error::JcmError;
use crate::response::Response;

/// A client connection to a JCM server.
///
/// Commands go out newline-terminated; responses come back whole, however
/// many frames the server split them into.
#[derive(Debug)]
pub struct JcmClient {
    writer: FramedWrite<OwnedWriteHalf, CommandCodec>,
    reader: FramedRead<OwnedReadHalf, ResponseCodec>,
}

impl JcmClient {
    pub fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            writer: FramedWrite::new(write_half, CommandCodec::new()),
            reader: FramedRead::new(read_half, ResponseCodec::default()),
        }
    }

    pub async fn connect(info: &ConnectionInfo) -> Result<Self, JcmError> {
        let stream = TcpStream::connect(info.to_string()).await?;
        Ok(Self::new(stream))
    }

    /// Send one command without waiting for its response.
    pub async fn send(&mut self, line: &str) -> Result<(), JcmError> {
        self.writer.send(line).await
    }

    /// Next response from the server.
    ///
    /// `ConnectionClosed` if the stream ends before a full response.
    pub async fn recv(&mut self) -> Result<Response, JcmError> {
        self.reader.next().await.ok_or(JcmError::ConnectionClosed)?
    }

    /// Send a command and wait for its response.
    pub async fn request(&mut self, line: &str) -> Result<Response, JcmError> {
        self.send(line).await?;
        self.recv().await
    }

    /// Send `exit` and wait for the server to close the stream.
    ///
    /// Any response arriving instead of end of stream is returned as an
    /// error.
    pub async fn exit(mut self) -> Result<(), JcmError> {
        self.send("exit").await?;
        match self.reader.next().await {
            None => Ok(()),
            Some(Ok(response)) => Err(JcmError::Other(format!(
                "unexpected {} response after exit",
                response.kind()
            ))),
            Some(Err(e)) if e.is_transport() => Ok(()),
            Some(Err(e)) => Err(e),
        }
    }
}

/// Address of a JCM server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    host: String,
    port: u16,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_info_display() {
        let info = ConnectionInfo::new("10.0.0.2", 3490);
        assert_eq!(info.to_string(), "10.0.0.2:3490");
        assert_eq!(info.host(), "10.0.0.2");
    }
}
