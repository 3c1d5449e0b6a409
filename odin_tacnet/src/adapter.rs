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

//! adapter for consumers that work with generic records instead of typed entities and that expect
//! failures to be reported through a callback rather than returned. Records are JSON objects with the
//! same keys as the wire messages

use std::{fmt, sync::Arc};
use serde_json::Value;

use crate::codec::{self, JsonObject};
use crate::entity::DoubleMap;
use crate::client::TacticalNetwork;
use crate::errors::{Result,malformed};

pub type Record = JsonObject;

pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub struct NetworkAdapter<N: TacticalNetwork + ?Sized> {
    net: Arc<N>,
    on_error: ErrorCallback,
}

impl<N: TacticalNetwork + ?Sized> NetworkAdapter<N> {
    pub fn new (net: Arc<N>, on_error: impl Fn(&str) + Send + Sync + 'static)->Self {
        NetworkAdapter { net, on_error: Arc::new(on_error) }
    }

    pub fn network (&self)->&Arc<N> { &self.net }

    fn report (&self, e: impl fmt::Display) {
        (self.on_error)( &e.to_string())
    }

    fn ok_or_report<T> (&self, res: Result<T>)->Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(e) => { self.report(e); None }
        }
    }

    // this is just the boolean view of a send result
    fn sent (&self, res: Result<()>)->bool {
        self.ok_or_report( res).is_some()
    }

    pub fn initialise (&self, host: &str, port: u16)->bool {
        self.sent( self.net.initialise( host, port))
    }

    pub fn is_connected (&self)->bool { self.net.is_connected() }

    pub fn send_pe (&self, pe: &Record)->bool {
        self.sent( codec::build_pe( pe.clone()).and_then( |pe| self.net.send_pe( &pe)))
    }

    pub fn send_emitter (&self, emitter: &Record)->bool {
        self.sent( codec::build_emitter( emitter.clone()).and_then( |emitter| self.net.send_emitter( &emitter)))
    }

    pub fn send_blob (&self, text: &str)->bool {
        self.sent( self.net.send_blob( text))
    }

    pub fn send_complex_blob (&self, pe: &Record, emitter: &Record, values: &Record)->bool {
        let res = codec::build_pe( pe.clone()).and_then( |pe| {
            let emitter = codec::build_emitter( emitter.clone())?;
            let values = to_double_map( values)?;
            self.net.send_complex_blob( &pe, &emitter, &values)
        });
        self.sent( res)
    }

    pub fn send_pe_setting (&self, setting: &str, id: &str, value: i32)->bool {
        self.sent( self.net.send_pe_setting( setting, id, value))
    }

    pub fn send_emitter_setting (&self, setting: &str, id: &str, value: i32)->bool {
        self.sent( self.net.send_emitter_setting( setting, id, value))
    }

    /// `[type, id, setting, value]` or empty on failure
    pub fn receive_setting (&self)->Vec<Value> {
        match self.ok_or_report( self.net.receive_setting()) {
            Some(s) => vec![ Value::from( s.kind.as_str()), Value::from( s.id), Value::from( s.setting), Value::from( s.value) ],
            None => Vec::new()
        }
    }

    /// the PE record or an empty record on failure
    pub fn receive_pe (&self)->Record {
        self.ok_or_report( self.net.receive_pe().and_then( |pe| codec::pe_to_object( &pe))).unwrap_or_default()
    }

    /// the Emitter record or an empty record on failure
    pub fn receive_emitter (&self)->Record {
        self.ok_or_report( self.net.receive_emitter().and_then( |e| codec::emitter_to_object( &e))).unwrap_or_default()
    }

    pub fn receive_blob (&self)->Vec<Value> {
        match self.ok_or_report( self.net.receive_blob()) {
            Some(lines) => lines.into_iter().map( Value::String).collect(),
            None => Vec::new()
        }
    }

    /// `[peRecord, emitterRecord, valueRecord]` or empty on failure
    pub fn receive_complex_blob (&self)->Vec<Value> {
        let res = self.net.receive_complex_blob().and_then( |blob| {
            let pe = codec::pe_to_object( &blob.pe)?;
            let emitter = codec::emitter_to_object( &blob.emitter)?;
            let values: Record = blob.values.into_iter().map( |(k,v)| (k, Value::from(v))).collect();
            Ok( vec![ Value::Object(pe), Value::Object(emitter), Value::Object(values) ])
        });
        self.ok_or_report( res).unwrap_or_default()
    }

    pub fn close (&self) { self.net.close() }
}

/// convert a label record into a numeric map. Every value has to be a number
pub fn to_double_map (record: &Record)->Result<DoubleMap> {
    let mut map = DoubleMap::new();
    for (k,v) in record {
        match v.as_f64() {
            Some(d) => { map.insert( k.clone(), d); }
            None => return Err( malformed!("value of '{k}' is not a number: {v}"))
        }
    }
    Ok(map)
}
