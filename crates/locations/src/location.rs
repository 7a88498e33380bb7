use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{Aggregate, AggregateRoot, Coordinate, DomainError, LocationId, WarehouseId};
use wms_events::Event;

/// Storage location role in the warehouse flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    Standard,
    Inbound,
    Outbound,
    Removal,
    Picking,
    /// Automated storage and retrieval rack (`rgb` in older data sets).
    #[serde(alias = "rgb")]
    AutomatedStorage,
}

impl LocationType {
    pub const ALL: [LocationType; 6] = [
        LocationType::Standard,
        LocationType::Inbound,
        LocationType::Outbound,
        LocationType::Removal,
        LocationType::Picking,
        LocationType::AutomatedStorage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Standard => "standard",
            LocationType::Inbound => "inbound",
            LocationType::Outbound => "outbound",
            LocationType::Removal => "removal",
            LocationType::Picking => "picking",
            LocationType::AutomatedStorage => "automated-storage",
        }
    }
}

impl core::fmt::Display for LocationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "rgb" {
            return Ok(LocationType::AutomatedStorage);
        }
        LocationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown location type {s:?}")))
    }
}

/// Occupancy status of a storage location.
///
/// Exchanged by name (`"Free"`, `"Occupied"`, `"Blocked"`), never by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationStatus {
    Free,
    Occupied,
    Blocked,
}

impl LocationStatus {
    pub const ALL: [LocationStatus; 3] = [
        LocationStatus::Free,
        LocationStatus::Occupied,
        LocationStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Free => "Free",
            LocationStatus::Occupied => "Occupied",
            LocationStatus::Blocked => "Blocked",
        }
    }
}

impl core::fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown location status {s:?}")))
    }
}

/// Aggregate root: StorageLocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    warehouse_id: WarehouseId,
    #[serde(rename = "locationId")]
    id: LocationId,
    #[serde(rename = "type")]
    location_type: LocationType,
    sequence_number: u32,
    coordinate: Coordinate,
    status: LocationStatus,
    version: u64,
}

impl StorageLocation {
    /// Materialize a location from its registration event.
    pub fn from_registered(event: &LocationRegistered) -> Self {
        Self {
            warehouse_id: event.warehouse_id.clone(),
            id: event.location_id.clone(),
            location_type: event.location_type,
            sequence_number: event.sequence_number,
            coordinate: event.coordinate,
            status: event.status,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> &LocationId {
        &self.id
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn status(&self) -> LocationStatus {
        self.status
    }

    pub fn is_blocked(&self) -> bool {
        self.status == LocationStatus::Blocked
    }
}

impl AggregateRoot for StorageLocation {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterLocation (admin action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLocation {
    pub warehouse_id: WarehouseId,
    pub location_id: LocationId,
    pub location_type: LocationType,
    pub sequence_number: u32,
    pub coordinate: Coordinate,
    pub status: LocationStatus,
    pub occurred_at: DateTime<Utc>,
}

impl RegisterLocation {
    pub fn into_event(self) -> LocationRegistered {
        LocationRegistered {
            warehouse_id: self.warehouse_id,
            location_id: self.location_id,
            location_type: self.location_type,
            sequence_number: self.sequence_number,
            coordinate: self.coordinate,
            status: self.status,
            occurred_at: self.occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationCommand {
    /// Unrestricted status change (putaway, pick, block, unblock).
    SetStatus {
        status: LocationStatus,
        occurred_at: DateTime<Utc>,
    },
    /// Assign occupancy; refused on a Blocked location.
    Occupy { occurred_at: DateTime<Utc> },
    /// Free an Occupied location; a no-op on Free or Blocked ones.
    Release { occurred_at: DateTime<Utc> },
}

/// Event: LocationRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRegistered {
    pub warehouse_id: WarehouseId,
    pub location_id: LocationId,
    pub location_type: LocationType,
    pub sequence_number: u32,
    pub coordinate: Coordinate,
    pub status: LocationStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LocationStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStatusChanged {
    pub warehouse_id: WarehouseId,
    pub location_id: LocationId,
    pub from: LocationStatus,
    pub to: LocationStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationEvent {
    LocationRegistered(LocationRegistered),
    LocationStatusChanged(LocationStatusChanged),
}

impl LocationEvent {
    pub fn location_id(&self) -> &LocationId {
        match self {
            LocationEvent::LocationRegistered(e) => &e.location_id,
            LocationEvent::LocationStatusChanged(e) => &e.location_id,
        }
    }
}

impl Event for LocationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LocationEvent::LocationRegistered(_) => "locations.location.registered",
            LocationEvent::LocationStatusChanged(_) => "locations.location.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LocationEvent::LocationRegistered(e) => e.occurred_at,
            LocationEvent::LocationStatusChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StorageLocation {
    type Command = LocationCommand;
    type Event = LocationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LocationEvent::LocationRegistered(e) => {
                *self = StorageLocation::from_registered(e);
                return;
            }
            LocationEvent::LocationStatusChanged(e) => {
                self.status = e.to;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LocationCommand::SetStatus { status, occurred_at } => {
                Ok(self.transition_to(*status, *occurred_at))
            }
            LocationCommand::Occupy { occurred_at } => {
                if self.is_blocked() {
                    return Err(DomainError::LocationBlocked(self.id.to_string()));
                }
                Ok(self.transition_to(LocationStatus::Occupied, *occurred_at))
            }
            LocationCommand::Release { occurred_at } => {
                if self.status != LocationStatus::Occupied {
                    return Ok(vec![]);
                }
                Ok(self.transition_to(LocationStatus::Free, *occurred_at))
            }
        }
    }
}

impl StorageLocation {
    fn transition_to(&self, to: LocationStatus, occurred_at: DateTime<Utc>) -> Vec<LocationEvent> {
        if self.status == to {
            return vec![];
        }
        vec![LocationEvent::LocationStatusChanged(LocationStatusChanged {
            warehouse_id: self.warehouse_id.clone(),
            location_id: self.id.clone(),
            from: self.status,
            to,
            occurred_at,
        })]
    }
}
