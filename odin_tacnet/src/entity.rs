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

//! the tactical entity data model: platform elements (PE), RF emitters and the transient
//! setting/blob records that travel alongside them

use std::{collections::BTreeMap, fmt};
use serde::{Serialize,Deserialize};
use serde_repr::{Serialize_repr,Deserialize_repr};

use crate::errors::{Result,invalid};

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/* #region shared primitive rules ********************************************************************************/

pub fn check_id (entity: &str, id: &str)->Result<()> {
    if id.is_empty() { Err( invalid!("{entity} id is empty")) } else { Ok(()) }
}

pub fn check_finite (field: &str, v: f64)->Result<()> {
    if v.is_finite() { Ok(()) } else { Err( invalid!("{field} is not a finite number: {v}")) }
}

pub fn check_lat_lon (lat: f64, lon: f64)->Result<()> {
    // NaN fails both comparisons
    if !(lat >= MIN_LAT && lat <= MAX_LAT) { return Err( invalid!("lat out of range [-90,90]: {lat}")) }
    if !(lon >= MIN_LON && lon <= MAX_LON) { return Err( invalid!("lon out of range [-180,180]: {lon}")) }
    Ok(())
}

/* #endregion shared primitive rules */

/// the small integer tag identifying the domain of a platform element. Encoded on the wire as its number
#[derive(Serialize_repr,Deserialize_repr,Debug,Clone,Copy,PartialEq,Eq,Hash,Default)]
#[repr(u8)]
pub enum PeCategory {
    #[default]
    Unknown = 0,
    Air = 1,
    Ground = 2,
    Sea = 3,
    Subsurface = 4,
    Space = 5,
}

impl PeCategory {
    pub fn from_tag (tag: i64)->Option<PeCategory> {
        match tag {
            0 => Some(PeCategory::Unknown),
            1 => Some(PeCategory::Air),
            2 => Some(PeCategory::Ground),
            3 => Some(PeCategory::Sea),
            4 => Some(PeCategory::Subsurface),
            5 => Some(PeCategory::Space),
            _ => None
        }
    }

    pub fn tag (&self)->u8 { *self as u8 }
}

/// a tracked air/ground entity. The field order is the wire order
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct PlatformElement {
    pub id: String,
    #[serde(rename="type")]
    pub kind: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub speed: f64,
    #[serde(default)]
    pub heading: f64, // degrees
    pub apd: String,  // auxiliary designator
    pub priority: String,
    pub jam: bool,
    pub ghost: bool,  // simulated / placeholder
    #[serde(default)]
    pub category: PeCategory,
    #[serde(default)]
    pub state: String,
}

impl PlatformElement {
    /// keys that have to be present in a received PE message. The others default
    pub const REQUIRED_FIELDS: [&'static str;10] = ["id", "type", "lat", "lon", "altitude", "speed", "apd", "priority", "jam", "ghost"];

    pub fn new (id: impl ToString, kind: impl ToString, lat: f64, lon: f64, altitude: f64)->Self {
        PlatformElement { id: id.to_string(), kind: kind.to_string(), lat, lon, altitude, ..Default::default() }
    }

    /// the single invariant check for PEs, used before sending and after receiving
    pub fn validate (&self)->Result<()> {
        check_id( "PE", &self.id)?;
        check_lat_lon( self.lat, self.lon)?;
        if !(self.altitude >= 0.0) { return Err( invalid!("PE altitude is negative: {}", self.altitude)) }
        self.check_encodable()
    }

    /// all numbers finite, i.e. representable in JSON. This is the only check on the encode path
    pub fn check_encodable (&self)->Result<()> {
        check_finite( "lat", self.lat)?;
        check_finite( "lon", self.lon)?;
        check_finite( "altitude", self.altitude)?;
        check_finite( "speed", self.speed)?;
        check_finite( "heading", self.heading)
    }

    pub fn is_valid (&self)->bool { self.validate().is_ok() }
}

impl fmt::Display for PlatformElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "PE( id: {}, type: {}, pos: ({:.5},{:.5}), alt: {:.0}, spd: {:.1}, hdg: {:.0}, cat: {:?}",
                self.id, self.kind, self.lat, self.lon, self.altitude, self.speed, self.heading, self.category)?;
        if self.jam { write!( f, ", jam")?; }
        if self.ghost { write!( f, ", ghost")?; }
        if !self.state.is_empty() { write!( f, ", state: \"{}\"", self.state)?; }
        write!( f, ")")
    }
}

/// an RF emission source. The field order is the wire order
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
#[serde(rename_all="camelCase")]
pub struct Emitter {
    pub id: String,
    #[serde(rename="type")]
    pub kind: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)] pub altitude: f64,
    #[serde(default)] pub heading: f64,
    #[serde(default)] pub speed: f64,
    pub freq_min: f64,
    pub freq_max: f64,
    #[serde(default)] pub active: bool,
    #[serde(default)] pub ea_priority: String,
    #[serde(default)] pub es_priority: String,
    #[serde(default)] pub jam_responsible: bool,
    #[serde(default)] pub reactive_eligible: bool,
    #[serde(default)] pub preemptive_eligible: bool,
    #[serde(default)] pub consent_required: bool,
    #[serde(default)] pub operator_managed: bool,
    pub jam: bool, // jam requested
    #[serde(default)] pub jam_ineffective: i32,
    #[serde(default)] pub jam_effective: i32,
}

impl Emitter {
    /// keys that have to be present in a received Emitter message. The others default
    pub const REQUIRED_FIELDS: [&'static str;8] = ["id", "type", "category", "lat", "lon", "freqMin", "freqMax", "jam"];

    pub fn new (id: impl ToString, kind: impl ToString, category: impl ToString, lat: f64, lon: f64, freq_min: f64, freq_max: f64)->Self {
        Emitter {
            id: id.to_string(), kind: kind.to_string(), category: category.to_string(),
            lat, lon, freq_min, freq_max,
            ..Default::default()
        }
    }

    /// the single invariant check for Emitters, used before sending and after receiving
    pub fn validate (&self)->Result<()> {
        check_id( "Emitter", &self.id)?;
        check_lat_lon( self.lat, self.lon)?;
        self.check_encodable()?;
        if !(self.freq_min < self.freq_max) {
            return Err( invalid!("Emitter freqMin {} not below freqMax {}", self.freq_min, self.freq_max))
        }
        Ok(())
    }

    pub fn check_encodable (&self)->Result<()> {
        check_finite( "lat", self.lat)?;
        check_finite( "lon", self.lon)?;
        check_finite( "altitude", self.altitude)?;
        check_finite( "heading", self.heading)?;
        check_finite( "speed", self.speed)?;
        check_finite( "freqMin", self.freq_min)?;
        check_finite( "freqMax", self.freq_max)
    }

    pub fn is_valid (&self)->bool { self.validate().is_ok() }
}

impl fmt::Display for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Emitter( id: {}, type: {}, cat: {}, pos: ({:.5},{:.5}), freq: [{},{}]",
                self.id, self.kind, self.category, self.lat, self.lon, self.freq_min, self.freq_max)?;
        if self.active { write!( f, ", active")?; }
        if self.jam { write!( f, ", jam")?; }
        write!( f, ", jam_eff: {}/{}", self.jam_effective, self.jam_ineffective + self.jam_effective)?;
        write!( f, ")")
    }
}

/// the entity kind a setting update refers to
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum SettingKind {
    #[serde(rename="PE_SETTING")]
    Pe,
    #[serde(rename="EMITTER_SETTING")]
    Emitter,
}

impl SettingKind {
    pub fn as_str (&self)->&'static str {
        match self {
            SettingKind::Pe => "PE_SETTING",
            SettingKind::Emitter => "EMITTER_SETTING",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str( self.as_str()) }
}

/// a transient instruction to change one integer setting of the entity `id`. Consumed on receipt,
/// values are opaque to the protocol (no range checks)
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq)]
pub struct SettingUpdate {
    #[serde(rename="type")]
    pub kind: SettingKind,
    pub id: String,
    pub setting: String,
    pub value: i32,
}

impl SettingUpdate {
    pub fn new (kind: SettingKind, id: impl ToString, setting: impl ToString, value: i32)->Self {
        SettingUpdate { kind, id: id.to_string(), setting: setting.to_string(), value }
    }
}

impl fmt::Display for SettingUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}( id: {}, {} = {})", self.kind, self.id, self.setting, self.value)
    }
}

/// label -> value map carried by complex blobs. Keys are unique, order is irrelevant
pub type DoubleMap = BTreeMap<String,f64>;

/// envelope for one PE, one Emitter and a numeric label map, exists only for one send/receive
#[derive(Debug,Clone,PartialEq,Default)]
pub struct ComplexBlob {
    pub pe: PlatformElement,
    pub emitter: Emitter,
    pub values: DoubleMap,
}

impl ComplexBlob {
    pub fn new (pe: PlatformElement, emitter: Emitter, values: DoubleMap)->Self {
        ComplexBlob { pe, emitter, values }
    }

    pub fn into_parts (self)->(PlatformElement,Emitter,DoubleMap) {
        (self.pe, self.emitter, self.values)
    }
}
