//! Per-warehouse spatial index of storage locations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use wms_core::{
    Aggregate, CoordinateKey, DomainError, DomainResult, Footprint, LocationId, Registry,
    WarehouseId,
};

use crate::grid::{Grid, RowOrder};
use crate::location::{
    LocationCommand, LocationEvent, LocationStatus, RegisterLocation, StorageLocation,
};

/// Position of a location within its footprint's stack.
///
/// Field order is the stack order: ascending `z`, then `sequence_number`,
/// then lexical `location_id`. None of these change after registration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct StackKey {
    z: u32,
    sequence_number: u32,
    location_id: LocationId,
}

/// Storage locations of one warehouse, indexed by identity, exact
/// coordinate and footprint.
///
/// One index never holds locations of another warehouse: registration of a
/// foreign `warehouse_id` is refused, so queries against this index cannot
/// leak across tenants.
#[derive(Debug, Clone)]
pub struct LocationIndex {
    warehouse_id: WarehouseId,
    locations: Registry<StorageLocation>,
    by_coordinate: HashMap<CoordinateKey, LocationId>,
    by_footprint: BTreeMap<Footprint, BTreeSet<StackKey>>,
}

/// Location counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub free: usize,
    pub occupied: usize,
    pub blocked: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.free + self.occupied + self.blocked
    }
}

impl LocationIndex {
    pub fn new(warehouse_id: WarehouseId) -> Self {
        Self {
            warehouse_id,
            locations: Registry::new(),
            by_coordinate: HashMap::new(),
            by_footprint: BTreeMap::new(),
        }
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    /// Decide a registration without applying it.
    pub fn plan_register(&self, cmd: RegisterLocation) -> DomainResult<LocationEvent> {
        if cmd.warehouse_id != self.warehouse_id {
            return Err(DomainError::validation(format!(
                "location {} belongs to warehouse {}, not {}",
                cmd.location_id, cmd.warehouse_id, self.warehouse_id
            )));
        }
        if self.locations.contains(&cmd.location_id) {
            return Err(DomainError::DuplicateLocationId(cmd.location_id.to_string()));
        }
        if let Some(existing) = self.by_coordinate.get(&cmd.coordinate.key()) {
            return Err(DomainError::DuplicateCoordinate(
                cmd.coordinate.to_string(),
                existing.to_string(),
            ));
        }
        Ok(LocationEvent::LocationRegistered(cmd.into_event()))
    }

    /// Register a new location (`addLocation`).
    pub fn add(&mut self, cmd: RegisterLocation) -> DomainResult<LocationEvent> {
        let event = self.plan_register(cmd)?;
        self.apply(&event);
        Ok(event)
    }

    /// Decide a command against an existing location without applying it.
    pub fn plan(
        &self,
        location_id: &LocationId,
        command: &LocationCommand,
    ) -> DomainResult<Vec<LocationEvent>> {
        self.require(location_id)?.handle(command)
    }

    /// Unrestricted status change (`setStatus`).
    pub fn set_status(
        &mut self,
        location_id: &LocationId,
        status: LocationStatus,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<LocationEvent>> {
        let events = self.plan(location_id, &LocationCommand::SetStatus { status, occurred_at })?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }

    /// Apply a previously planned event.
    ///
    /// Events that were not produced by `plan`/`plan_register` against the
    /// current state are ignored.
    pub fn apply(&mut self, event: &LocationEvent) {
        match event {
            LocationEvent::LocationRegistered(e) => {
                let location = StorageLocation::from_registered(e);
                let key = StackKey {
                    z: e.coordinate.z(),
                    sequence_number: e.sequence_number,
                    location_id: e.location_id.clone(),
                };
                if self.locations.insert(location).is_err() {
                    return;
                }
                self.by_coordinate
                    .insert(e.coordinate.key(), e.location_id.clone());
                self.by_footprint
                    .entry(e.coordinate.footprint())
                    .or_default()
                    .insert(key);
            }
            LocationEvent::LocationStatusChanged(e) => {
                if let Some(location) = self.locations.get_mut(&e.location_id) {
                    location.apply(event);
                }
            }
        }
    }

    pub fn get(&self, location_id: &LocationId) -> Option<&StorageLocation> {
        self.locations.get(location_id)
    }

    pub fn require(&self, location_id: &LocationId) -> DomainResult<&StorageLocation> {
        self.get(location_id)
            .ok_or_else(|| DomainError::LocationNotFound(location_id.to_string()))
    }

    /// Locations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StorageLocation> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The vertical stack at `(x, y)` (`locationsAt`): ascending z, then
    /// sequence number, then location id.
    pub fn locations_at(&self, x: u32, y: u32) -> Vec<&StorageLocation> {
        self.by_footprint
            .get(&Footprint::new(x, y))
            .map(|stack| {
                stack
                    .iter()
                    .filter_map(|k| self.locations.get(&k.location_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `(max_x, max_y)` over all locations, `(0, 0)` when empty.
    pub fn bounds(&self) -> (u32, u32) {
        self.by_footprint
            .keys()
            .fold((0, 0), |(mx, my), fp| (mx.max(fp.x), my.max(fp.y)))
    }

    /// Footprints that hold at least one location, in `(x, y)` order.
    pub fn footprints(&self) -> impl Iterator<Item = Footprint> + '_ {
        self.by_footprint.keys().copied()
    }

    /// Dense grid over `1..=max_x × 1..=max_y` (`materializeGrid`).
    pub fn materialize_grid(&self, row_order: RowOrder) -> Grid {
        Grid::materialize(self, row_order)
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.iter().fold(StatusCounts::default(), |mut acc, loc| {
            match loc.status() {
                LocationStatus::Free => acc.free += 1,
                LocationStatus::Occupied => acc.occupied += 1,
                LocationStatus::Blocked => acc.blocked += 1,
            }
            acc
        })
    }
}
