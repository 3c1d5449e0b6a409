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

//! connects to a tactical entity peer, polls PE / Emitter updates into an entity store and periodically
//! prints the store contents. Ctrl-C closes the connection, which also cancels a pending receive

use std::{path::PathBuf, sync::Arc, time::Duration};
use clap::Parser;
use anyhow::Result;
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;
use odin_tacnet::{load_config, run_poller, EntityStore, TacnetClient, TacnetConfig, TacticalNetwork};

#[derive(Parser,Debug)]
#[command(about="tactical entity network monitor")]
struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// overrides the configured peer host
    #[arg(long)]
    host: Option<String>,

    /// overrides the configured peer port
    #[arg(long)]
    port: Option<u16>,

    /// seconds between store printouts
    #[arg(long, default_value_t=5)]
    print_interval: u64,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config: TacnetConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => TacnetConfig::default()
    };
    if let Some(host) = &args.host { config.host = host.clone(); }
    if let Some(port) = args.port { config.port = port; }

    let client = Arc::new( TacnetClient::from_config( &config).with_error_listener( |msg| eprintln!("network error: {msg}")));
    let store = Arc::new( EntityStore::new());

    let c = client.clone();
    let (host, port) = (config.host.clone(), config.port);
    tokio::task::spawn_blocking( move || c.initialise( &host, port)).await??;

    let poller = tokio::spawn( run_poller( client.clone(), store.clone(), config.poll_interval));

    let printer = {
        let store = store.clone();
        let dt = Duration::from_secs( args.print_interval);
        tokio::spawn( async move {
            let mut interval = tokio::time::interval( dt);
            loop {
                interval.tick().await;
                println!("------------------ {} PEs, {} Emitters", store.pe_count(), store.emitter_count());
                for pe in store.pes() { println!("{pe}"); }
                for emitter in store.emitters() { println!("{emitter}"); }
            }
        })
    };

    tokio::select! {
        res = poller => {
            match res? {
                Ok(()) => info!("poller done"),
                Err(e) => warn!("poller terminated: {e}")
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("terminating");
            let c = client.clone();
            tokio::task::spawn_blocking( move || c.close()).await?;
        }
    }

    printer.abort();
    Ok(())
}
