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

//! point-to-point protocol for exchanging tactical entity state - platform elements (PE) and RF emitters -
//! between a simulation/tracking source and a consumer over a single TCP connection.
//!
//! Messages are single-line JSON objects terminated by '\n'. The layers are
//!  - [`entity`]: data model and invariant checks
//!  - [`codec`]: line encoding/decoding with validation
//!  - [`transport`]: newline framed TCP transport
//!  - [`client`]: the operation set with its locking and failure policy
//!  - [`adapter`]: record/callback based facade for UI-like consumers
//!
//! plus a consumer side [`store::EntityStore`] and a [`poller`] that keeps it up to date.

pub mod errors;
pub mod entity;
pub mod codec;
pub mod transport;
pub mod config;
pub mod client;
pub mod adapter;
pub mod store;
pub mod poller;

pub use errors::{OdinTacnetError,Result};
pub use entity::{PlatformElement,PeCategory,Emitter,SettingKind,SettingUpdate,ComplexBlob,DoubleMap};
pub use transport::{LineTransport,TcpLineTransport,AbortHandle};
pub use config::{TacnetConfig,load_config};
pub use client::{TacticalNetwork,TacnetClient,ErrorListener};
pub use adapter::NetworkAdapter;
pub use store::{EntityStore,StoreChange};
pub use poller::{poll_once,run_poller};
