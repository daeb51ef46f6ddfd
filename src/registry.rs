//! Registry half of component D: a name→station mapping with stable, `Copy` handles.

use crate::station::Station;
use std::collections::HashMap;

struct Slot {
    generation: u32,
    station: Station,
}

/// A stable handle to a registered station.
///
/// Obtained from [`crate::Kernel::station_create`] or [`crate::Kernel::station_get`]. Cheap to copy and
/// pass around, but *not* valid forever: deleting the station it refers to invalidates it, and using a
/// stale handle afterward panics the next time it's dereferenced.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StationId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Default)]
pub(crate) struct StationRegistry {
    slots: Vec<Option<Slot>>,
    /// Generation of the most recent occupant of each slot, kept even after that slot goes vacant, so
    /// the next occupant gets a generation one higher and stale handles from before the vacancy still
    /// fail to resolve.
    generations: Vec<u32>,
    free_list: Vec<u32>,
    name_to_id: HashMap<String, StationId>,
}

impl StationRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a new station under `name`. Returns `None` if the name is already taken, matching the
    /// reference's `macsim_station_create` returning a null pointer on collision.
    pub(crate) fn create(&mut self, name: &str) -> Option<StationId> {
        if self.name_to_id.contains_key(name) {
            return None;
        }

        let station = Station::new(name.to_string());
        let id = if let Some(index) = self.free_list.pop() {
            let generation = self.generations[index as usize].wrapping_add(1);
            self.generations[index as usize] = generation;
            self.slots[index as usize] = Some(Slot { generation, station });
            StationId { index, generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(Slot { generation: 0, station }));
            self.generations.push(0);
            StationId { index, generation: 0 }
        };

        self.name_to_id.insert(name.to_string(), id);
        Some(id)
    }

    /// Unregister the station named `name`, freeing its slot. Returns `UnknownStation` if no such
    /// station exists.
    pub(crate) fn delete(&mut self, name: &str) -> crate::StationStatus {
        match self.name_to_id.remove(name) {
            Some(id) => {
                self.slots[id.index as usize] = None;
                self.free_list.push(id.index);
                crate::StationStatus::Success
            }
            None => crate::StationStatus::UnknownStation,
        }
    }

    /// Look up a station's handle by name.
    pub(crate) fn get(&self, name: &str) -> Option<StationId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of currently registered stations.
    pub(crate) fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Shared access to a station through its handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a station that has since been deleted.
    pub(crate) fn resolve(&self, id: StationId) -> &Station {
        self.try_resolve(id)
            .unwrap_or_else(|| panic!("station registry: stale or unknown station handle {id:?}"))
    }

    /// Exclusive access to a station through its handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a station that has since been deleted.
    pub(crate) fn resolve_mut(&mut self, id: StationId) -> &mut Station {
        self.try_resolve_mut(id)
            .unwrap_or_else(|| panic!("station registry: stale or unknown station handle {id:?}"))
    }

    fn try_resolve(&self, id: StationId) -> Option<&Station> {
        match self.slots.get(id.index as usize)?.as_ref() {
            Some(slot) if slot.generation == id.generation => Some(&slot.station),
            _ => None,
        }
    }

    fn try_resolve_mut(&mut self, id: StationId) -> Option<&mut Station> {
        match self.slots.get_mut(id.index as usize)?.as_mut() {
            Some(slot) if slot.generation == id.generation => Some(&mut slot.station),
            _ => None,
        }
    }

    /// Iterate over every registered station by name.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Station)> {
        self.name_to_id
            .iter()
            .map(move |(name, id)| (name.as_str(), self.resolve(*id)))
    }

    /// Zero accounting counters across every registered station.
    pub(crate) fn reset_all_statistics(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.station.reset_statistics();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_duplicate_names() {
        let mut reg = StationRegistry::new();
        assert!(reg.create("X").is_some());
        assert!(reg.create("X").is_none());
    }

    #[test]
    fn delete_then_recreate_reuses_slot_with_new_generation() {
        let mut reg = StationRegistry::new();
        let first = reg.create("X").unwrap();
        assert_eq!(crate::StationStatus::Success, reg.delete("X"));
        let second = reg.create("X").unwrap();

        assert_eq!(first.index, second.index, "slot should be reused");
        assert_ne!(first.generation, second.generation, "generation should change on reuse");
    }

    #[test]
    #[should_panic(expected = "stale or unknown")]
    fn stale_handle_panics_on_resolve() {
        let mut reg = StationRegistry::new();
        let id = reg.create("X").unwrap();
        reg.delete("X");
        reg.resolve(id);
    }

    #[test]
    fn delete_unknown_station_reports_unknown() {
        let mut reg = StationRegistry::new();
        assert_eq!(crate::StationStatus::UnknownStation, reg.delete("nope"));
    }

    #[test]
    fn len_tracks_live_stations() {
        let mut reg = StationRegistry::new();
        reg.create("A").unwrap();
        reg.create("B").unwrap();
        assert_eq!(2, reg.len());
        reg.delete("A");
        assert_eq!(1, reg.len());
    }
}
