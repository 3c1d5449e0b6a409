/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! newline framed message transport over a byte stream.
//!
//! A [`LineTransport`] delivers whole lines only: partial data stays buffered until its delimiter
//! arrives, and a stream that ends in the middle of a line counts as closed. The reader buffer lives
//! as long as the connection so that bytes following a delimiter are kept for the next read.

use std::{fmt, io::{BufRead, BufReader, Read, Write, ErrorKind}, net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs}, time::Duration};
use tracing::{debug,info,warn};

use crate::config::TacnetConfig;
use crate::errors::{Result,OdinTacnetError,malformed};

pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// a handle that can unblock a reader of the transport it was obtained from, from any thread.
/// Aborting makes a pending (or subsequent) `read_line` fail
pub struct AbortHandle ( Box<dyn Fn() + Send + Sync> );

impl AbortHandle {
    pub fn new (f: impl Fn() + Send + Sync + 'static)->Self { AbortHandle( Box::new(f)) }

    pub fn abort (&self) { (self.0)() }
}

impl fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("AbortHandle") }
}

/// the capability the protocol layer needs from a connection. There is one TCP implementation but
/// tests substitute capturing fakes
pub trait LineTransport: Send {
    /// open a connection, closing a previously open one first
    fn connect (&mut self, host: &str, port: u16)->Result<()>;

    /// write `text` followed by a single '\n' as one write
    fn write_line (&mut self, text: &str)->Result<()>;

    /// block until a full line is available and return it without its delimiter
    fn read_line (&mut self)->Result<String>;

    /// idempotent. Errors are returned for reporting only, the transport is closed afterwards in any case
    fn close (&mut self)->Result<()>;

    /// true while a connection handle exists (this is not a liveness probe)
    fn is_connected (&self)->bool;

    fn abort_handle (&self)->Option<AbortHandle> { None }
}

struct TcpConnection {
    peer: SocketAddr,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// consume input up to and including the next '\n' so that the following read starts at a message boundary.
/// Returns false if the stream ended before a delimiter
fn skip_line (reader: &mut impl BufRead)->std::io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(false)
        }
        match buf.iter().position( |b| *b == b'\n') {
            Some(i) => {
                reader.consume( i+1);
                return Ok(true)
            }
            None => {
                let len = buf.len();
                reader.consume( len);
            }
        }
    }
}

/// blocking TCP implementation of [`LineTransport`]
pub struct TcpLineTransport {
    connect_timeout: Option<Duration>,
    max_line_len: usize,
    nodelay: bool,
    conn: Option<TcpConnection>,
}

impl TcpLineTransport {
    pub fn new ()->Self {
        TcpLineTransport { connect_timeout: None, max_line_len: DEFAULT_MAX_LINE_LEN, nodelay: true, conn: None }
    }

    pub fn from_config (config: &TacnetConfig)->Self {
        TcpLineTransport {
            connect_timeout: config.connect_timeout,
            max_line_len: config.max_line_len,
            nodelay: config.tcp_nodelay,
            conn: None
        }
    }

    pub fn with_max_line_len (mut self, max_line_len: usize)->Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn peer_addr (&self)->Option<SocketAddr> { self.conn.as_ref().map( |c| c.peer) }

    fn open_stream (&self, addr: &SocketAddr)->std::io::Result<TcpStream> {
        match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout( addr, timeout),
            None => TcpStream::connect( addr)
        }
    }
}

impl Default for TcpLineTransport {
    fn default()->Self { TcpLineTransport::new() }
}

impl LineTransport for TcpLineTransport {
    fn connect (&mut self, host: &str, port: u16)->Result<()> {
        if let Err(e) = self.close() {
            warn!("closing previous connection failed: {e}");
        }

        let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()
            .map_err( |e| OdinTacnetError::ConnectionError( format!("cannot resolve {host}:{port}: {e}")))?
            .collect();

        let mut last_err: Option<std::io::Error> = None;
        for addr in &addrs {
            match self.open_stream( addr) {
                Ok(stream) => {
                    if let Err(e) = stream.set_nodelay( self.nodelay) { warn!("failed to set TCP_NODELAY: {e}") }
                    let writer = stream.try_clone().map_err( |e| OdinTacnetError::ConnectionError( format!("cannot clone socket: {e}")))?;
                    debug!("TCP connection to {addr} established");
                    self.conn = Some( TcpConnection { peer: *addr, reader: BufReader::with_capacity( 8192, stream), writer });
                    return Ok(())
                }
                Err(e) => {
                    debug!("connect to {addr} failed: {e}");
                    last_err = Some(e)
                }
            }
        }

        match last_err {
            Some(e) => Err( OdinTacnetError::ConnectionError( format!("failed to connect to {host}:{port}: {e}"))),
            None => Err( OdinTacnetError::ConnectionError( format!("no address for {host}:{port}")))
        }
    }

    fn write_line (&mut self, text: &str)->Result<()> {
        let conn = self.conn.as_mut().ok_or( OdinTacnetError::NotConnected)?;

        let mut buf = Vec::with_capacity( text.len() + 1);
        buf.extend_from_slice( text.as_bytes());
        buf.push( b'\n');

        conn.writer.write_all( &buf)?;
        conn.writer.flush()?;
        Ok(())
    }

    fn read_line (&mut self)->Result<String> {
        let conn = self.conn.as_mut().ok_or( OdinTacnetError::NotConnected)?;

        let limit = self.max_line_len as u64 + 1; // content plus delimiter
        let mut buf: Vec<u8> = Vec::with_capacity(512);
        let n = (&mut conn.reader).take( limit).read_until( b'\n', &mut buf)?;

        if n == 0 {
            return Err( OdinTacnetError::ConnectionClosed)
        }
        if buf.last() != Some(&b'\n') {
            if n as u64 >= limit {
                if !skip_line( &mut conn.reader)? {
                    return Err( OdinTacnetError::ConnectionClosed) // peer closed within the over-long line
                }
                return Err( malformed!("line exceeds {} bytes", self.max_line_len))
            } else {
                debug!("discarding {n} bytes of incomplete line");
                return Err( OdinTacnetError::ConnectionClosed) // peer closed within a line
            }
        }

        buf.pop();
        String::from_utf8( buf).map_err( |e| malformed!("line is not valid UTF-8: {e}"))
    }

    fn close (&mut self)->Result<()> {
        if let Some(conn) = self.conn.take() {
            info!("closing connection to {}", conn.peer);
            match conn.writer.shutdown( Shutdown::Both) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()), // peer already gone
                Err(e) => Err( OdinTacnetError::IOError(e))
            }
            // both stream handles are dropped here
        } else {
            Ok(())
        }
    }

    fn is_connected (&self)->bool { self.conn.is_some() }

    fn abort_handle (&self)->Option<AbortHandle> {
        let conn = self.conn.as_ref()?;
        match conn.writer.try_clone() {
            Ok(stream) => Some( AbortHandle::new( move || {
                if let Err(e) = stream.shutdown( Shutdown::Both) {
                    debug!("socket shutdown on abort: {e}");
                }
            })),
            Err(e) => {
                warn!("cannot obtain abort handle: {e}");
                None
            }
        }
    }
}
