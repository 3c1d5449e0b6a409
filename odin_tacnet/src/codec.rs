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

//! single-line JSON codec for the tactical entity protocol.
//!
//! Every encoded message is one compact JSON object terminated by exactly one '\n'. Decoding is two-phase:
//! the text is parsed into a generic JSON object first so that we can tell malformed text, absent
//! required keys and out-of-range values apart, then the typed record is built and invariant-checked.
//!
//! Complex blobs embed the PE and Emitter messages *as strings* (including their newline) under
//! `{"data": ..}`, which keeps them wire compatible with existing peers.

use serde::{Serialize,Deserialize};
use serde_json::{Map,Value};

use crate::entity::{PlatformElement,PeCategory,Emitter,SettingKind,SettingUpdate,ComplexBlob,DoubleMap,check_finite};
use crate::errors::{Result,OdinTacnetError,malformed,invalid};

pub const DELIMITER: char = '\n';

pub type JsonObject = Map<String,Value>;

fn to_line<T: Serialize> (msg: &T)->Result<String> {
    let mut line = serde_json::to_string( msg)?;
    line.push( DELIMITER);
    Ok(line)
}

/// parse text into a JSON object (trailing newline/whitespace is tolerated)
pub fn parse_object (line: &str, what: &str)->Result<JsonObject> {
    match serde_json::from_str::<Value>( line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err( malformed!("{what} message is not a JSON object")),
        Err(e) => Err( malformed!("invalid JSON for {what}: {e}"))
    }
}

fn check_required (obj: &JsonObject, required: &[&str])->Result<()> {
    for key in required {
        if !obj.contains_key( *key) {
            return Err( OdinTacnetError::MissingField( key.to_string()))
        }
    }
    Ok(())
}

// optional keys sent as null are treated as absent, i.e. they get their defaults
fn drop_null_optionals (obj: &mut JsonObject, required: &[&str]) {
    obj.retain( |k,v| !v.is_null() || required.contains( &k.as_str()));
}

/* #region PE ****************************************************************************************************/

/// encoding does not check the entity invariant, only that all numbers can be represented in JSON
pub fn encode_pe (pe: &PlatformElement)->Result<String> {
    pe.check_encodable()?;
    to_line( pe)
}

pub fn decode_pe (line: &str)->Result<PlatformElement> {
    let obj = parse_object( line, "PE")?;
    pe_from_object( obj)
}

/// build and validate a PE from an already parsed JSON object
pub fn pe_from_object (obj: JsonObject)->Result<PlatformElement> {
    let pe = build_pe( obj)?;
    pe.validate()?;
    Ok(pe)
}

/// build a PE from a JSON object without checking the entity invariant (field presence and types are checked)
pub fn build_pe (mut obj: JsonObject)->Result<PlatformElement> {
    check_required( &obj, &PlatformElement::REQUIRED_FIELDS)?;
    drop_null_optionals( &mut obj, &PlatformElement::REQUIRED_FIELDS);

    if let Some(v) = obj.get("category") {
        if !v.is_number() { return Err( malformed!("PE category is not a number: {v}")) }
        if v.as_i64().and_then( PeCategory::from_tag).is_none() {
            return Err( invalid!("unknown PE category tag: {v}"))
        }
    }

    serde_json::from_value( Value::Object(obj)).map_err( |e| malformed!("PE field error: {e}"))
}

pub fn pe_to_object (pe: &PlatformElement)->Result<JsonObject> {
    match serde_json::to_value( pe)? {
        Value::Object(map) => Ok(map),
        _ => Err( malformed!("PE did not serialize into an object"))
    }
}

/* #endregion PE */

/* #region Emitter ***********************************************************************************************/

pub fn encode_emitter (emitter: &Emitter)->Result<String> {
    emitter.check_encodable()?;
    to_line( emitter)
}

pub fn decode_emitter (line: &str)->Result<Emitter> {
    let obj = parse_object( line, "Emitter")?;
    emitter_from_object( obj)
}

pub fn emitter_from_object (obj: JsonObject)->Result<Emitter> {
    let emitter = build_emitter( obj)?;
    emitter.validate()?;
    Ok(emitter)
}

/// build an Emitter from a JSON object without checking the entity invariant
pub fn build_emitter (mut obj: JsonObject)->Result<Emitter> {
    check_required( &obj, &Emitter::REQUIRED_FIELDS)?;
    drop_null_optionals( &mut obj, &Emitter::REQUIRED_FIELDS);

    serde_json::from_value( Value::Object(obj)).map_err( |e| malformed!("Emitter field error: {e}"))
}

pub fn emitter_to_object (emitter: &Emitter)->Result<JsonObject> {
    match serde_json::to_value( emitter)? {
        Value::Object(map) => Ok(map),
        _ => Err( malformed!("Emitter did not serialize into an object"))
    }
}

/* #endregion Emitter */

/* #region settings **********************************************************************************************/

const SETTING_FIELDS: [&'static str;4] = ["type", "id", "setting", "value"];

pub fn encode_setting (kind: SettingKind, id: &str, setting: &str, value: i32)->Result<String> {
    to_line( &SettingUpdate::new( kind, id, setting, value))
}

/// no range checks here - setting values are opaque to the protocol
pub fn decode_setting (line: &str)->Result<SettingUpdate> {
    let obj = parse_object( line, "setting")?;
    check_required( &obj, &SETTING_FIELDS)?;
    serde_json::from_value( Value::Object(obj)).map_err( |e| malformed!("setting field error: {e}"))
}

/* #endregion settings */

/* #region complex blob ******************************************************************************************/

#[derive(Serialize,Deserialize,Debug)]
struct EmbeddedMsg { data: String }

#[derive(Serialize,Debug)]
#[serde(rename_all="camelCase")]
struct ComplexBlobMsg<'a> {
    pe: EmbeddedMsg,
    emitter: EmbeddedMsg,
    double_map: &'a DoubleMap,
}

pub fn encode_complex_blob (pe: &PlatformElement, emitter: &Emitter, values: &DoubleMap)->Result<String> {
    for (label,v) in values {
        check_finite( label, *v)?;
    }
    let msg = ComplexBlobMsg {
        pe: EmbeddedMsg { data: encode_pe( pe)? },
        emitter: EmbeddedMsg { data: encode_emitter( emitter)? },
        double_map: values
    };
    to_line( &msg)
}

pub fn decode_complex_blob (line: &str)->Result<ComplexBlob> {
    let mut obj = parse_object( line, "complex blob")?;

    let pe = decode_pe( &embedded_data( &mut obj, "pe")?)?;
    let emitter = decode_emitter( &embedded_data( &mut obj, "emitter")?)?;

    let values: DoubleMap = match obj.remove("doubleMap") {
        Some(v) => serde_json::from_value( v).map_err( |e| malformed!("complex blob doubleMap error: {e}"))?,
        None => return Err( OdinTacnetError::MissingField("doubleMap".to_string()))
    };

    Ok( ComplexBlob::new( pe, emitter, values))
}

fn embedded_data (obj: &mut JsonObject, key: &str)->Result<String> {
    let v = obj.remove( key).ok_or_else( || OdinTacnetError::MissingField( key.to_string()))?;
    let msg: EmbeddedMsg = serde_json::from_value( v).map_err( |e| malformed!("complex blob {key} envelope error: {e}"))?;
    Ok(msg.data)
}

/* #endregion complex blob */
