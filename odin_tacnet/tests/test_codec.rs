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

use odin_tacnet::{PlatformElement,PeCategory,Emitter,SettingKind,DoubleMap,OdinTacnetError, codec};
use serde_json::Value;

fn sample_pe ()->PlatformElement {
    let mut pe = PlatformElement::new( "PE-1", "fighter", 37.41, -122.05, 3000.0);
    pe.speed = 250.5;
    pe.heading = 270.0;
    pe.apd = "A01".to_string();
    pe.priority = "high".to_string();
    pe.category = PeCategory::Air;
    pe.state = "tracking".to_string();
    pe
}

fn sample_emitter ()->Emitter {
    let mut e = Emitter::new( "EM-1", "radar", "search", 37.41, -122.05, 2.9e9, 3.1e9);
    e.active = true;
    e.ea_priority = "medium".to_string();
    e.jam_effective = 3;
    e
}

#[test]
fn test_pe_roundtrip() {
    let pe = sample_pe();
    let line = codec::encode_pe( &pe).unwrap();
    println!("{line}");

    assert!( line.ends_with('\n'));
    assert_eq!( line.matches('\n').count(), 1);
    assert!( line.contains("\"type\":\"fighter\""));
    assert!( line.contains("\"category\":1"));

    let decoded = codec::decode_pe( &line).unwrap();
    assert_eq!( decoded, pe);
}

#[test]
fn test_pe_field_order() {
    let line = codec::encode_pe( &sample_pe()).unwrap();
    let keys = ["\"id\"", "\"type\"", "\"lat\"", "\"lon\"", "\"altitude\"", "\"speed\"", "\"heading\"", "\"apd\"",
                "\"priority\"", "\"jam\"", "\"ghost\"", "\"category\"", "\"state\""];
    let positions: Vec<usize> = keys.iter().map( |k| line.find(k).unwrap()).collect();
    assert!( positions.windows(2).all( |w| w[0] < w[1]));
}

#[test]
fn test_emitter_roundtrip() {
    let e = sample_emitter();
    let line = codec::encode_emitter( &e).unwrap();
    println!("{line}");

    let v: Value = serde_json::from_str( &line).unwrap();
    assert_eq!( v["freqMin"].as_f64(), Some(2.9e9));
    assert!( line.contains("\"eaPriority\":\"medium\""));
    assert!( line.contains("\"jamEffective\":3"));

    let decoded = codec::decode_emitter( &line).unwrap();
    assert_eq!( decoded, e);
}

#[test]
fn test_fractional_values_survive() {
    let mut pe = sample_pe();
    pe.lat = 0.1 + 0.2;
    pe.lon = -122.123456789012345;
    let decoded = codec::decode_pe( &codec::encode_pe( &pe).unwrap()).unwrap();
    assert_eq!( decoded.lat, pe.lat);
    assert_eq!( decoded.lon, pe.lon);
}

#[test]
fn test_missing_id() {
    let line = r#"{"type":"fighter","lat":1.0,"lon":2.0,"altitude":0.0,"speed":0.0,"apd":"","priority":"","jam":false,"ghost":false}"#;
    match codec::decode_pe( line) {
        Err(OdinTacnetError::MissingField(key)) => assert_eq!( key, "id"),
        other => panic!("unexpected result: {other:?}")
    }
}

#[test]
fn test_missing_emitter_freq() {
    let line = r#"{"id":"E","type":"radar","category":"c","lat":1.0,"lon":2.0,"freqMin":1.0,"jam":false}"#;
    assert!( matches!( codec::decode_emitter( line), Err(OdinTacnetError::MissingField(k)) if k == "freqMax"));
}

#[test]
fn test_lat_range() {
    let mut pe = sample_pe();
    pe.lat = 95.0;
    let line = codec::encode_pe( &pe).unwrap(); // encoding does not validate
    assert!( matches!( codec::decode_pe( &line), Err(OdinTacnetError::ValidationError(_))));

    pe.lat = 90.0;
    let line = codec::encode_pe( &pe).unwrap();
    assert_eq!( codec::decode_pe( &line).unwrap().lat, 90.0);

    pe.lat = 0.0;
    pe.lon = -180.5;
    assert!( pe.validate().is_err());
    pe.lon = -180.0;
    assert!( pe.validate().is_ok());
}

#[test]
fn test_negative_altitude() {
    let mut pe = sample_pe();
    pe.altitude = -1.0;
    assert!( matches!( pe.validate(), Err(OdinTacnetError::ValidationError(_))));
    pe.altitude = 0.0;
    assert!( pe.is_valid());
}

#[test]
fn test_empty_freq_band() {
    let mut e = sample_emitter();
    e.freq_max = e.freq_min;
    assert!( matches!( e.validate(), Err(OdinTacnetError::ValidationError(_))));

    let line = codec::encode_emitter( &e).unwrap();
    assert!( matches!( codec::decode_emitter( &line), Err(OdinTacnetError::ValidationError(_))));
}

#[test]
fn test_non_finite_rejected() {
    let mut pe = sample_pe();
    pe.speed = f64::NAN;
    assert!( !pe.is_valid());

    let mut e = sample_emitter();
    e.freq_max = f64::INFINITY;
    assert!( !e.is_valid());
}

#[test]
fn test_non_finite_not_encodable() {
    let mut pe = sample_pe();
    pe.heading = f64::NAN;
    assert!( matches!( codec::encode_pe( &pe), Err(OdinTacnetError::ValidationError(_))));

    let mut e = sample_emitter();
    e.altitude = f64::NEG_INFINITY;
    assert!( matches!( codec::encode_emitter( &e), Err(OdinTacnetError::ValidationError(_))));
    assert!( matches!( codec::encode_complex_blob( &sample_pe(), &e, &DoubleMap::new()), Err(OdinTacnetError::ValidationError(_))));

    let mut values = DoubleMap::new();
    values.insert( "gain".to_string(), f64::INFINITY);
    assert!( matches!( codec::encode_complex_blob( &sample_pe(), &sample_emitter(), &values), Err(OdinTacnetError::ValidationError(_))));

    // out of range but finite values are still encodable for complex blobs
    let mut pe = sample_pe();
    pe.lat = 100.0;
    values.insert( "gain".to_string(), 3.5);
    assert!( codec::encode_complex_blob( &pe, &sample_emitter(), &values).is_ok());
}

#[test]
fn test_malformed_json() {
    assert!( matches!( codec::decode_pe( "{\"id\":\"PE-1\", "), Err(OdinTacnetError::MalformedMessage(_))));
    assert!( matches!( codec::decode_emitter( "[1,2,3]"), Err(OdinTacnetError::MalformedMessage(_))));
    assert!( matches!( codec::decode_setting( ""), Err(OdinTacnetError::MalformedMessage(_))));
}

#[test]
fn test_wrong_field_type() {
    let line = r#"{"id":"PE-1","type":"fighter","lat":"north","lon":2.0,"altitude":0.0,"speed":0.0,"apd":"","priority":"","jam":false,"ghost":false}"#;
    assert!( matches!( codec::decode_pe( line), Err(OdinTacnetError::MalformedMessage(_))));

    // a required key that is present but null is not a missing key
    let line = r#"{"id":"PE-1","type":"fighter","lat":null,"lon":2.0,"altitude":0.0,"speed":0.0,"apd":"","priority":"","jam":false,"ghost":false}"#;
    assert!( matches!( codec::decode_pe( line), Err(OdinTacnetError::MalformedMessage(_))));
}

#[test]
fn test_category_tags() {
    let base = r#""id":"PE-1","type":"fighter","lat":1.0,"lon":2.0,"altitude":0.0,"speed":0.0,"apd":"","priority":"","jam":false,"ghost":false"#;

    let pe = codec::decode_pe( &format!("{{{base},\"category\":3}}")).unwrap();
    assert_eq!( pe.category, PeCategory::Sea);

    let res = codec::decode_pe( &format!("{{{base},\"category\":42}}"));
    assert!( matches!( res, Err(OdinTacnetError::ValidationError(_))));

    let res = codec::decode_pe( &format!("{{{base},\"category\":\"air\"}}"));
    assert!( matches!( res, Err(OdinTacnetError::MalformedMessage(_))));

    let pe = codec::decode_pe( &format!("{{{base}}}")).unwrap();
    assert_eq!( pe.category, PeCategory::Unknown);
}

#[test]
fn test_null_optionals() {
    let line = r#"{"id":"PE-1","type":"fighter","lat":1.0,"lon":2.0,"altitude":0.0,"speed":0.0,"heading":null,"apd":"","priority":"","jam":false,"ghost":true,"category":null,"state":null}"#;
    let pe = codec::decode_pe( line).unwrap();
    assert_eq!( pe.heading, 0.0);
    assert_eq!( pe.category, PeCategory::Unknown);
    assert!( pe.state.is_empty());
    assert!( pe.ghost);

    let line = r#"{"id":"E","type":"radar","category":"c","lat":1.0,"lon":2.0,"freqMin":1.0,"freqMax":2.0,"jam":true,"active":null,"eaPriority":null}"#;
    let e = codec::decode_emitter( line).unwrap();
    assert!( !e.active);
    assert!( e.ea_priority.is_empty());
    assert!( e.jam);
}

#[test]
fn test_unknown_keys_ignored() {
    let line = r#"{"id":"E","type":"radar","category":"c","lat":1.0,"lon":2.0,"freqMin":1.0,"freqMax":2.0,"jam":false,"vendorExt":{"x":1}}"#;
    assert_eq!( codec::decode_emitter( line).unwrap().id, "E");
}

#[test]
fn test_settings() {
    let line = codec::encode_setting( SettingKind::Pe, "PE-1", "power", 75).unwrap();
    assert_eq!( line, "{\"type\":\"PE_SETTING\",\"id\":\"PE-1\",\"setting\":\"power\",\"value\":75}\n");

    let s = codec::decode_setting( &line).unwrap();
    assert_eq!( s.kind, SettingKind::Pe);
    assert_eq!( s.id, "PE-1");
    assert_eq!( s.setting, "power");
    assert_eq!( s.value, 75);

    // values are opaque, no range check
    let s = codec::decode_setting( r#"{"type":"EMITTER_SETTING","id":"E","setting":"mode","value":-2147483648}"#).unwrap();
    assert_eq!( s.kind, SettingKind::Emitter);
    assert_eq!( s.value, i32::MIN);

    let res = codec::decode_setting( r#"{"type":"PE_SETTING","id":"E","setting":"mode"}"#);
    assert!( matches!( res, Err(OdinTacnetError::MissingField(k)) if k == "value"));

    let res = codec::decode_setting( r#"{"type":"RADIO_SETTING","id":"E","setting":"mode","value":1}"#);
    assert!( matches!( res, Err(OdinTacnetError::MalformedMessage(_))));
}

#[test]
fn test_complex_blob() {
    let pe = sample_pe();
    let emitter = sample_emitter();
    let mut values = DoubleMap::new();
    values.insert( "gain".to_string(), 3.5);

    let line = codec::encode_complex_blob( &pe, &emitter, &values).unwrap();
    println!("{line}");
    assert_eq!( line.matches('\n').count(), 1); // embedded delimiters are escaped

    // the embedded messages are strings that carry their own delimiter
    let v: Value = serde_json::from_str( &line).unwrap();
    let pe_data = v["pe"]["data"].as_str().unwrap();
    assert!( pe_data.ends_with('\n'));
    assert_eq!( pe_data, codec::encode_pe( &pe).unwrap());
    assert_eq!( v["doubleMap"]["gain"].as_f64(), Some(3.5));

    let blob = codec::decode_complex_blob( &line).unwrap();
    assert_eq!( blob.pe, pe);
    assert_eq!( blob.emitter, emitter);
    assert_eq!( blob.values, values);
}

#[test]
fn test_complex_blob_errors() {
    let pe = codec::encode_pe( &sample_pe()).unwrap();
    let pe_data = serde_json::to_string( &pe).unwrap();

    let line = format!("{{\"pe\":{{\"data\":{pe_data}}},\"doubleMap\":{{}}}}");
    assert!( matches!( codec::decode_complex_blob( &line), Err(OdinTacnetError::MissingField(k)) if k == "emitter"));

    let em = codec::encode_emitter( &sample_emitter()).unwrap();
    let em_data = serde_json::to_string( &em).unwrap();
    let line = format!("{{\"pe\":{{\"data\":{pe_data}}},\"emitter\":{{\"data\":{em_data}}}}}");
    assert!( matches!( codec::decode_complex_blob( &line), Err(OdinTacnetError::MissingField(k)) if k == "doubleMap"));

    let line = format!("{{\"pe\":{{\"data\":{pe_data}}},\"emitter\":{{\"data\":{em_data}}},\"doubleMap\":{{\"gain\":\"high\"}}}}");
    assert!( matches!( codec::decode_complex_blob( &line), Err(OdinTacnetError::MalformedMessage(_))));

    // inner decode errors are propagated
    let mut bad = sample_emitter();
    bad.freq_min = bad.freq_max;
    let line = codec::encode_complex_blob( &sample_pe(), &bad, &DoubleMap::new()).unwrap();
    assert!( matches!( codec::decode_complex_blob( &line), Err(OdinTacnetError::ValidationError(_))));
}
