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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};

use crate::errors::{Result,OdinTacnetError};
use crate::transport::DEFAULT_MAX_LINE_LEN;

/// connection and polling parameters for a tactical entity peer
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct TacnetConfig {
    pub host: String, // of the peer that provides PE/Emitter messages
    pub port: u16,
    pub connect_timeout: Option<Duration>, // None means OS default
    pub max_line_len: usize, // longer lines are rejected as malformed
    pub tcp_nodelay: bool,
    pub poll_interval: Duration, // cadence in which consumers poll for PE/Emitter updates
}

impl Default for TacnetConfig {
    fn default()->Self {
        TacnetConfig {
            host: "127.0.0.1".to_string(),
            port: 5555,
            connect_timeout: Some( Duration::from_secs(5)),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            tcp_nodelay: true,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// load a RON config file into any deserializable config struct
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for <'a> Deserialize<'a> {
    let path = path.as_ref();
    let data = fs::read( path).map_err( |e| OdinTacnetError::ConfigError( format!("cannot read {path:?}: {e}")))?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn config_from_str<C> (src: &str)->Result<C> where C: for <'a> Deserialize<'a> {
    Ok( ron::de::from_str( src)? )
}
