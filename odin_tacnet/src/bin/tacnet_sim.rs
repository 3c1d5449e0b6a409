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

//! tactical entity peer simulator: accepts consumer connections and streams PE / Emitter pairs of
//! a number of entities moving on circular tracks. Setting updates received from the consumer are logged

use std::{f64::consts::PI, time::Duration};
use tokio::{net::{TcpListener,TcpStream}, io::{AsyncBufReadExt,AsyncWriteExt,BufReader}};
use clap::Parser;
use anyhow::Result;
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;
use odin_tacnet::{PlatformElement,PeCategory,Emitter, codec};

#[derive(Parser,Debug,Clone)]
#[command(about="tactical entity peer simulator")]
struct Args {
    /// port to listen on
    #[arg(long, default_value_t=5555)]
    port: u16,

    /// number of simulated entities
    #[arg(long, default_value_t=3)]
    entities: usize,

    /// update interval in milliseconds
    #[arg(long, default_value_t=500)]
    interval_ms: u64,

    /// latitude of track centers
    #[arg(long, default_value_t=37.4)]
    lat: f64,

    /// longitude of track centers
    #[arg(long, default_value_t=-122.1)]
    lon: f64,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let listener = TcpListener::bind( ("0.0.0.0", args.port)).await?;
    info!("simulator listening on port {}", args.port);

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("consumer connected: {addr}");
        let args = args.clone();
        tokio::spawn( async move {
            if let Err(e) = serve( socket, args).await {
                warn!("connection to {addr} terminated: {e}");
            }
        });
    }
}

async fn serve (socket: TcpStream, args: Args)->Result<()> {
    let (rd, mut wr) = socket.into_split();

    tokio::spawn( async move {
        let mut lines = BufReader::new( rd).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match codec::decode_setting( &line) {
                    Ok(setting) => info!("received {setting}"),
                    Err(_) => info!("received {} bytes: {}", line.len(), line)
                }
                Ok(None) => break,
                Err(e) => { warn!("read error: {e}"); break }
            }
        }
    });

    let mut interval = tokio::time::interval( Duration::from_millis( args.interval_ms));
    let mut step: u64 = 0;
    loop {
        interval.tick().await;
        for i in 0..args.entities {
            let (pe, emitter) = track_point( &args, i, step);
            wr.write_all( codec::encode_pe( &pe)?.as_bytes()).await?;
            wr.write_all( codec::encode_emitter( &emitter)?.as_bytes()).await?;
        }
        step += 1;
    }
}

// entity `i` circles the center with a radius of (i+1)*0.05 degrees, 1 degree per step
fn track_point (args: &Args, i: usize, step: u64)->(PlatformElement,Emitter) {
    let r = 0.05 * (i+1) as f64;
    let angle = ((step + 40 * i as u64) % 360) as f64;
    let a = angle * PI / 180.0;
    let lat = (args.lat + r * a.cos()).clamp( -90.0, 90.0);
    let lon = args.lon + r * a.sin();
    let lon = if lon > 180.0 { lon - 360.0 } else if lon < -180.0 { lon + 360.0 } else { lon };

    let mut pe = PlatformElement::new( format!("PE-{i}"), "fighter", lat, lon, 3000.0 + 500.0 * i as f64);
    pe.speed = 250.0;
    pe.heading = (angle + 90.0) % 360.0;
    pe.apd = format!("A{i:02}");
    pe.priority = if i == 0 { "high".to_string() } else { "normal".to_string() };
    pe.category = PeCategory::Air;
    pe.state = "tracking".to_string();

    let mut emitter = Emitter::new( format!("EM-{i}"), "radar", "search", lat, lon, 2.9e9, 3.1e9);
    emitter.altitude = pe.altitude;
    emitter.heading = pe.heading;
    emitter.speed = pe.speed;
    emitter.active = step % 20 < 15;
    emitter.ea_priority = "medium".to_string();
    emitter.es_priority = "high".to_string();
    emitter.reactive_eligible = true;
    emitter.jam_effective = (step / 10) as i32;

    (pe, emitter)
}
