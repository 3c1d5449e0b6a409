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

use std::time::Duration;
use odin_tacnet::{TacnetConfig, OdinTacnetError, TcpLineTransport, load_config, config::config_from_str};

#[test]
fn test_load_config_file() {
    let config: TacnetConfig = load_config( "configs/tacnet.ron").unwrap();
    println!("{config:?}");

    assert_eq!( config.host, "127.0.0.1");
    assert_eq!( config.port, 5555);
    assert_eq!( config.connect_timeout, Some( Duration::from_secs(5)));
    assert_eq!( config.poll_interval, Duration::from_millis(100));
    assert_eq!( config.max_line_len, 65536);
}

#[test]
fn test_partial_config() {
    let config: TacnetConfig = config_from_str( "TacnetConfig( host: \"tacnet.local\", port: 6000, connect_timeout: None )").unwrap();
    assert_eq!( config.host, "tacnet.local");
    assert_eq!( config.port, 6000);
    assert_eq!( config.connect_timeout, None);
    assert!( config.tcp_nodelay);
    assert_eq!( config.poll_interval, TacnetConfig::default().poll_interval);

    let transport = TcpLineTransport::from_config( &config);
    assert!( transport.peer_addr().is_none());
}

#[test]
fn test_bad_config() {
    let res: Result<TacnetConfig,_> = config_from_str( "TacnetConfig( port: \"five\" )");
    assert!( matches!( res, Err(OdinTacnetError::ConfigError(_))));

    let res: Result<TacnetConfig,_> = load_config( "configs/does_not_exist.ron");
    assert!( matches!( res, Err(OdinTacnetError::ConfigError(_))));
}
