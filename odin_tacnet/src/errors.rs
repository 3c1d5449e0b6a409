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

use thiserror::Error;

pub type Result<T> = std::result::Result<T,OdinTacnetError>;

/// the failure modes of the tactical entity protocol. Connect, transport and decode errors are kept apart
/// since callers react differently: send-side rejections are recoverable, receive-side failures mean the
/// stream can't be trusted anymore
#[derive(Error,Debug)]
pub enum OdinTacnetError {

    #[error("connection error {0}")]
    ConnectionError(String),

    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("not connected")]
    NotConnected,

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("malformed message {0}")]
    MalformedMessage(String),

    #[error("missing field {0}")]
    MissingField(String),

    #[error("validation error {0}")]
    ValidationError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

impl OdinTacnetError {
    /// true if the error indicates the line stream is dead or desynchronized, i.e. the transport has to be re-initialised
    pub fn is_stream_fatal (&self)->bool {
        matches!( self,
            OdinTacnetError::ConnectionClosed | OdinTacnetError::IOError(_) |
            OdinTacnetError::MalformedMessage(_) | OdinTacnetError::MissingField(_) | OdinTacnetError::ValidationError(_)
        )
    }

    /// true for errors produced by the transport layer (as opposed to decoding or validation)
    pub fn is_transport_error (&self)->bool {
        matches!( self, OdinTacnetError::ConnectionClosed | OdinTacnetError::IOError(_) | OdinTacnetError::ConnectionError(_))
    }
}

impl From<serde_json::Error> for OdinTacnetError {
    fn from (e: serde_json::Error)->Self { OdinTacnetError::MalformedMessage( e.to_string()) }
}

impl From<ron::error::SpannedError> for OdinTacnetError {
    fn from (e: ron::error::SpannedError)->Self { OdinTacnetError::ConfigError( e.to_string()) }
}

macro_rules! malformed {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinTacnetError::MalformedMessage( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use malformed;

macro_rules! invalid {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinTacnetError::ValidationError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use invalid;
