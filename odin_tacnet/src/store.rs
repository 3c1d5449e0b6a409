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

use dashmap::DashMap;

use crate::entity::{PlatformElement,Emitter};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum StoreChange {
    Added,
    Updated,
}

/// the consumer side entity store. Entries are keyed by entity id, known entities only get their
/// position/motion patched by subsequent updates. Shared between the poller (writer) and whoever
/// displays the data, hence the concurrent maps
#[derive(Debug,Default)]
pub struct EntityStore {
    pes: DashMap<String,PlatformElement>,
    emitters: DashMap<String,Emitter>,
}

impl EntityStore {
    pub fn new ()->Self { EntityStore::default() }

    pub fn update_pe (&self, pe: PlatformElement)->StoreChange {
        if let Some(mut e) = self.pes.get_mut( &pe.id) {
            e.lat = pe.lat;
            e.lon = pe.lon;
            e.altitude = pe.altitude;
            e.heading = pe.heading;
            e.speed = pe.speed;
            StoreChange::Updated
        } else {
            self.pes.insert( pe.id.clone(), pe);
            StoreChange::Added
        }
    }

    pub fn update_emitter (&self, emitter: Emitter)->StoreChange {
        if let Some(mut e) = self.emitters.get_mut( &emitter.id) {
            e.lat = emitter.lat;
            e.lon = emitter.lon;
            StoreChange::Updated
        } else {
            self.emitters.insert( emitter.id.clone(), emitter);
            StoreChange::Added
        }
    }

    pub fn pe (&self, id: &str)->Option<PlatformElement> { self.pes.get( id).map( |e| e.value().clone()) }
    pub fn emitter (&self, id: &str)->Option<Emitter> { self.emitters.get( id).map( |e| e.value().clone()) }

    pub fn pe_count (&self)->usize { self.pes.len() }
    pub fn emitter_count (&self)->usize { self.emitters.len() }

    /// snapshot of all PEs, sorted by id
    pub fn pes (&self)->Vec<PlatformElement> {
        let mut list: Vec<PlatformElement> = self.pes.iter().map( |e| e.value().clone()).collect();
        list.sort_by( |a,b| a.id.cmp( &b.id));
        list
    }

    /// snapshot of all Emitters, sorted by id
    pub fn emitters (&self)->Vec<Emitter> {
        let mut list: Vec<Emitter> = self.emitters.iter().map( |e| e.value().clone()).collect();
        list.sort_by( |a,b| a.id.cmp( &b.id));
        list
    }

    pub fn remove_pe (&self, id: &str)->Option<PlatformElement> { self.pes.remove( id).map( |(_,v)| v) }
    pub fn remove_emitter (&self, id: &str)->Option<Emitter> { self.emitters.remove( id).map( |(_,v)| v) }

    pub fn clear (&self) {
        self.pes.clear();
        self.emitters.clear();
    }
}
