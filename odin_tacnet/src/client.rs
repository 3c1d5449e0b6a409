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

//! the public operation set of the tactical entity protocol.
//!
//! Each [`TacnetClient`] owns one transport behind its own mutex. Every operation holds that lock for
//! its whole duration (including blocking reads) so that concurrent sends and receives never interleave
//! bytes on the wire. The only operation that does not wait for the lock first is [`TacticalNetwork::close`],
//! which aborts a blocked reader through the transport's abort handle before it takes the lock.
//!
//! Failure policy:
//!  - sends validate entities locally and write nothing if the invariant fails. Send failures never close the transport
//!  - PE, Emitter and complex blob receives close the transport on *any* failure (the stream is considered desynchronized)
//!  - setting and blob receives only close on transport failures, decode errors leave the connection open

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, atomic::{AtomicBool, Ordering}};
use tracing::{debug,info,warn,error};

use crate::codec::{self, DELIMITER};
use crate::config::TacnetConfig;
use crate::entity::{PlatformElement,Emitter,SettingKind,SettingUpdate,ComplexBlob,DoubleMap};
use crate::errors::{Result,OdinTacnetError};
use crate::transport::{AbortHandle,LineTransport,TcpLineTransport};

/// receives human readable messages for failures that are not returned to a caller (e.g. during close)
pub type ErrorListener = Arc<dyn Fn(&str) + Send + Sync>;

/// the capability interface of a tactical entity peer connection
pub trait TacticalNetwork: Send + Sync {
    /// connect to the peer, closing any previous connection first
    fn initialise (&self, host: &str, port: u16)->Result<()>;

    fn is_connected (&self)->bool;

    fn send_pe (&self, pe: &PlatformElement)->Result<()>;
    fn send_emitter (&self, emitter: &Emitter)->Result<()>;
    fn send_setting (&self, kind: SettingKind, id: &str, setting: &str, value: i32)->Result<()>;

    fn send_pe_setting (&self, setting: &str, id: &str, value: i32)->Result<()> {
        self.send_setting( SettingKind::Pe, id, setting, value)
    }

    fn send_emitter_setting (&self, setting: &str, id: &str, value: i32)->Result<()> {
        self.send_setting( SettingKind::Emitter, id, setting, value)
    }

    /// send raw text plus delimiter without any encoding or validation
    fn send_blob (&self, text: &str)->Result<()>;

    /// entity invariants are not checked for complex blobs
    fn send_complex_blob (&self, pe: &PlatformElement, emitter: &Emitter, values: &DoubleMap)->Result<()>;

    fn receive_setting (&self)->Result<SettingUpdate>;
    fn receive_pe (&self)->Result<PlatformElement>;
    fn receive_emitter (&self)->Result<Emitter>;

    /// the raw line as a single element sequence
    fn receive_blob (&self)->Result<Vec<String>>;
    fn receive_complex_blob (&self)->Result<ComplexBlob>;

    /// idempotent, never fails observably
    fn close (&self);
}

#[derive(Debug,Clone,Copy,PartialEq)]
enum ClosePolicy {
    OnAnyFailure,
    OnTransportFailure,
}

pub struct TacnetClient<T: LineTransport = TcpLineTransport> {
    transport: Mutex<T>,
    abort: Mutex<Option<AbortHandle>>,
    connected: AtomicBool,
    error_listener: Option<ErrorListener>,
}

impl TacnetClient<TcpLineTransport> {
    pub fn from_config (config: &TacnetConfig)->Self {
        TacnetClient::new( TcpLineTransport::from_config( config))
    }
}

impl<T: LineTransport> TacnetClient<T> {
    pub fn new (transport: T)->Self {
        let connected = AtomicBool::new( transport.is_connected());
        TacnetClient { transport: Mutex::new(transport), abort: Mutex::new(None), connected, error_listener: None }
    }

    pub fn with_error_listener (mut self, listener: impl Fn(&str) + Send + Sync + 'static)->Self {
        self.error_listener = Some( Arc::new(listener));
        self
    }

    /// run `f` with exclusive access to the transport (e.g. to inspect a test transport)
    pub fn with_transport<R> (&self, f: impl FnOnce(&mut T)->R)->R {
        let mut t = self.lock_transport();
        f( &mut *t)
    }

    // a panic while holding the lock does not leave the transport in an inconsistent state
    fn lock_transport (&self)->MutexGuard<'_,T> {
        self.transport.lock().unwrap_or_else( PoisonError::into_inner)
    }

    fn lock_abort (&self)->MutexGuard<'_,Option<AbortHandle>> {
        self.abort.lock().unwrap_or_else( PoisonError::into_inner)
    }

    fn notify (&self, msg: &str) {
        if let Some(listener) = &self.error_listener {
            listener( msg)
        }
    }

    fn close_locked (&self, t: &mut T) {
        self.connected.store( false, Ordering::Release);
        self.lock_abort().take();
        if let Err(e) = t.close() {
            let msg = format!("failed to close connection: {e}");
            warn!("{msg}");
            self.notify( &msg);
        }
    }

    fn send_line (&self, op: &str, line: &str)->Result<()> {
        let mut t = self.lock_transport();
        if !t.is_connected() {
            warn!("{op} failed: not connected");
            return Err( OdinTacnetError::NotConnected)
        }

        t.write_line( line).inspect_err( |e| error!("{op} failed: {e}"))
    }

    // codec output carries its delimiter, the transport adds its own
    fn send_encoded (&self, op: &str, line: &str)->Result<()> {
        self.send_line( op, line.strip_suffix( DELIMITER).unwrap_or( line))
    }

    fn receive_with<R> (&self, op: &str, policy: ClosePolicy, decode: impl FnOnce(&str)->Result<R>)->Result<R> {
        let mut t = self.lock_transport();
        if !t.is_connected() {
            warn!("{op} failed: not connected");
            return Err( OdinTacnetError::NotConnected)
        }

        let res = t.read_line().and_then( |line| {
            debug!("{op} - received data buffer of length {}", line.len());
            decode( line.as_str())
        });

        if let Err(e) = &res {
            match e {
                OdinTacnetError::ConnectionClosed => warn!("{op} failed: connection closed by peer"),
                _ => error!("{op} failed: {e}")
            }
            let must_close = match policy {
                ClosePolicy::OnAnyFailure => true,
                ClosePolicy::OnTransportFailure => e.is_transport_error()
            };
            if must_close {
                self.close_locked( &mut *t);
            }
        }
        res
    }
}

impl<T: LineTransport> TacticalNetwork for TacnetClient<T> {
    fn initialise (&self, host: &str, port: u16)->Result<()> {
        let mut t = self.lock_transport();
        if t.is_connected() {
            self.close_locked( &mut *t);
        }

        info!("attempting to connect to {host}:{port}");
        match t.connect( host, port) {
            Ok(()) => {
                *self.lock_abort() = t.abort_handle();
                self.connected.store( true, Ordering::Release);
                info!("connected to {host}:{port}");
                Ok(())
            }
            Err(e) => {
                self.connected.store( false, Ordering::Release);
                error!("failed to initialize connection: {e}");
                Err(e)
            }
        }
    }

    // this does not wait for operations in progress
    fn is_connected (&self)->bool {
        self.connected.load( Ordering::Acquire)
    }

    fn send_pe (&self, pe: &PlatformElement)->Result<()> {
        if let Err(e) = pe.validate() {
            warn!("invalid PE data: {e}");
            return Err(e)
        }
        let line = codec::encode_pe( pe)?;
        self.send_encoded( "sendPE", &line)
    }

    fn send_emitter (&self, emitter: &Emitter)->Result<()> {
        if let Err(e) = emitter.validate() {
            warn!("invalid Emitter data: {e}");
            return Err(e)
        }
        let line = codec::encode_emitter( emitter)?;
        self.send_encoded( "sendEmitter", &line)
    }

    fn send_setting (&self, kind: SettingKind, id: &str, setting: &str, value: i32)->Result<()> {
        let line = codec::encode_setting( kind, id, setting, value)?;
        self.send_encoded( "sendSetting", &line)
    }

    fn send_blob (&self, text: &str)->Result<()> {
        self.send_line( "sendBlob", text)
    }

    fn send_complex_blob (&self, pe: &PlatformElement, emitter: &Emitter, values: &DoubleMap)->Result<()> {
        let line = codec::encode_complex_blob( pe, emitter, values)?;
        self.send_encoded( "sendComplexBlob", &line)
    }

    fn receive_setting (&self)->Result<SettingUpdate> {
        self.receive_with( "receiveSetting", ClosePolicy::OnTransportFailure, codec::decode_setting)
    }

    fn receive_pe (&self)->Result<PlatformElement> {
        self.receive_with( "receivePE", ClosePolicy::OnAnyFailure, codec::decode_pe)
    }

    fn receive_emitter (&self)->Result<Emitter> {
        self.receive_with( "receiveEmitter", ClosePolicy::OnAnyFailure, codec::decode_emitter)
    }

    fn receive_blob (&self)->Result<Vec<String>> {
        self.receive_with( "receiveBlob", ClosePolicy::OnTransportFailure, |line| Ok( vec![line.to_string()]))
    }

    fn receive_complex_blob (&self)->Result<ComplexBlob> {
        self.receive_with( "receiveComplexBlob", ClosePolicy::OnAnyFailure, codec::decode_complex_blob)
    }

    fn close (&self) {
        // unblock a reader that holds the transport lock
        let abort = self.lock_abort().take();
        if let Some(handle) = abort {
            handle.abort();
        }

        let mut t = self.lock_transport();
        self.close_locked( &mut *t);
    }
}
