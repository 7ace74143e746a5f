//! Transport layer for VISCA over Datavideo's DVIP TCP protocol.
//!
//! This typically operates over port 5002.
use crate::{
    protocol::{Frame, LengthMode},
    Error, Result,
};
use binrw::BinWrite;
use std::io::Cursor;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, ToSocketAddrs},
};

pub struct DvipTcpChannel {
    sock: Option<TcpStream>,
}

impl Default for DvipTcpChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DvipTcpChannel {
    /// Largest chunk read from the socket at once.
    const READ_BUFFER_SIZE: usize = 1024;

    pub fn new() -> Self {
        Self { sock: None }
    }

    pub async fn connect<A: ToSocketAddrs>(&mut self, addr: A) -> Result {
        self.close();
        let sock = TcpStream::connect(addr).await?;
        sock.set_nodelay(true)?;
        self.sock = Some(sock);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.sock.is_some()
    }

    /// Drops the connection, if any.
    pub fn close(&mut self) {
        if self.sock.take().is_some() {
            debug!("closed connection");
        }
    }

    pub async fn send(&mut self, frame: &Frame, mode: LengthMode) -> Result {
        let sock = self.sock.as_mut().ok_or(Error::NotConnected)?;
        let mut out = Cursor::new(Vec::new());
        frame.write_args(&mut out, (mode,))?;
        let out = out.into_inner();
        trace!(">>> {}", hex::encode(&out));
        sock.write_all(&out).await?;
        Ok(())
    }

    /// Reads whatever the camera has sent.
    ///
    /// Replies are not framed: one read may return part of a reply, or many
    /// replies.
    ///
    /// ## Errors
    ///
    /// * [`Error::Disconnected`] when the camera closed the connection
    pub async fn recv(&mut self) -> Result<Vec<u8>> {
        let sock = self.sock.as_mut().ok_or(Error::NotConnected)?;
        let mut b = [0u8; Self::READ_BUFFER_SIZE];
        let l = sock.read(&mut b).await?;
        if l == 0 {
            return Err(Error::Disconnected);
        }

        let b = &b[..l];
        trace!("<<< {}", hex::encode(b));
        Ok(b.to_vec())
    }
}
