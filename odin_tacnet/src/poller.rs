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

use std::{sync::Arc, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug,info};

use crate::client::TacticalNetwork;
use crate::errors::{Result,OdinTacnetError};
use crate::store::EntityStore;

/// receive one PE and then one Emitter and merge them into the store. This is the per-tick unit of
/// work of the poll loop, it blocks until both messages have arrived
pub fn poll_once<N> (net: &N, store: &EntityStore)->Result<()> where N: TacticalNetwork + ?Sized {
    let pe = net.receive_pe()?;
    debug!("{:?} {}", store.update_pe( pe.clone()), pe);

    let emitter = net.receive_emitter()?;
    debug!("{:?} {}", store.update_emitter( emitter.clone()), emitter);

    Ok(())
}

/// poll `net` in the given interval until a tick finds it disconnected (which ends the loop normally) or a
/// receive fails (which returns the error). The blocking receives run on tokio's blocking thread pool, closing
/// `net` from another task cancels a pending receive with `ConnectionClosed` or `IOError`
pub async fn run_poller<N> (net: Arc<N>, store: Arc<EntityStore>, interval: Duration)->Result<()>
    where N: TacticalNetwork + ?Sized + 'static
{
    let mut ticker = time::interval( interval);
    ticker.set_missed_tick_behavior( MissedTickBehavior::Delay); // a slow peer should not cause bursts

    loop {
        ticker.tick().await;
        if !net.is_connected() {
            info!("poller terminated: not connected");
            return Ok(())
        }

        let (net, store) = (net.clone(), store.clone());
        tokio::task::spawn_blocking( move || poll_once( net.as_ref(), store.as_ref())).await
            .map_err( |e| OdinTacnetError::OpFailedError( format!("poll task failed: {e}")))??;
    }
}
