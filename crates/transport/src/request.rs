use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    Aggregate, AggregateRoot, ArticleId, Coordinate, DomainError, DomainResult, Registry,
    RequestId, TenantId,
};
use wms_events::Event;
use wms_inventory::ArticleType;

use crate::order::normalize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    Inbound,
    Outbound,
    Picking,
    Inventory,
}

impl RequestType {
    pub const ALL: [RequestType; 4] = [
        RequestType::Inbound,
        RequestType::Outbound,
        RequestType::Picking,
        RequestType::Inventory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Inbound => "Inbound",
            RequestType::Outbound => "Outbound",
            RequestType::Picking => "Picking",
            RequestType::Inventory => "Inventory",
        }
    }
}

impl core::fmt::Display for RequestType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown request type {s:?}")))
    }
}

/// Lifecycle of a request.
///
/// `Created → Assigned → Processing → Completed`; `Cancelled` is reachable
/// from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Created,
    Assigned,
    Processing,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Created,
        RequestStatus::Assigned,
        RequestStatus::Processing,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Created => "Created",
            RequestStatus::Assigned => "Assigned",
            RequestStatus::Processing => "Processing",
            RequestStatus::Completed => "Completed",
            RequestStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        match (self, to) {
            (from, RequestStatus::Cancelled) => !from.is_terminal(),
            (RequestStatus::Created, RequestStatus::Assigned)
            | (RequestStatus::Assigned, RequestStatus::Processing)
            | (RequestStatus::Processing, RequestStatus::Completed) => true,
            _ => false,
        }
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        RequestStatus::ALL
            .into_iter()
            .find(|st| normalize_name(st.as_str()) == key)
            .ok_or_else(|| DomainError::validation(format!("unknown request status {s:?}")))
    }
}

/// Aggregate root: Request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "requestId")]
    id: RequestId,
    client_id: TenantId,
    request_type: RequestType,
    article_id: ArticleId,
    article_type: ArticleType,
    quantity: u32,
    target: Coordinate,
    status: RequestStatus,
    timestamp: DateTime<Utc>,
    version: u64,
}

impl Request {
    pub fn from_submitted(event: &RequestSubmitted) -> Self {
        Self {
            id: event.request_id.clone(),
            client_id: event.client_id.clone(),
            request_type: event.request_type,
            article_id: event.article_id.clone(),
            article_type: event.article_type,
            quantity: event.quantity,
            target: event.target,
            status: event.status,
            timestamp: event.occurred_at,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> &RequestId {
        &self.id
    }

    pub fn client_id(&self) -> &TenantId {
        &self.client_id
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    pub fn article_type(&self) -> ArticleType {
        self.article_type
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn target(&self) -> Coordinate {
        self.target
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Stock delta applied when the request completes.
    ///
    /// Inbound adds `quantity`, Outbound and Picking remove it, Inventory
    /// counts leave stock alone.
    pub fn stock_delta(&self) -> Option<i64> {
        let quantity = i64::from(self.quantity);
        match self.request_type {
            RequestType::Inbound => Some(quantity),
            RequestType::Outbound | RequestType::Picking => Some(-quantity),
            RequestType::Inventory => None,
        }
    }
}

impl AggregateRoot for Request {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitRequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub request_id: RequestId,
    pub client_id: TenantId,
    pub request_type: RequestType,
    pub article_id: ArticleId,
    pub article_type: ArticleType,
    pub quantity: u32,
    pub target: Coordinate,
    pub occurred_at: DateTime<Utc>,
}

impl SubmitRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        Ok(())
    }

    pub fn into_event(self, status: RequestStatus) -> RequestSubmitted {
        RequestSubmitted {
            request_id: self.request_id,
            client_id: self.client_id,
            request_type: self.request_type,
            article_id: self.article_id,
            article_type: self.article_type,
            quantity: self.quantity,
            target: self.target,
            status,
            occurred_at: self.occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestCommand {
    Advance {
        to: RequestStatus,
        occurred_at: DateTime<Utc>,
    },
}

/// Event: RequestSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSubmitted {
    pub request_id: RequestId,
    pub client_id: TenantId,
    pub request_type: RequestType,
    pub article_id: ArticleId,
    pub article_type: ArticleType,
    pub quantity: u32,
    pub target: Coordinate,
    pub status: RequestStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RequestStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatusChanged {
    pub request_id: RequestId,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestEvent {
    RequestSubmitted(RequestSubmitted),
    RequestStatusChanged(RequestStatusChanged),
}

impl RequestEvent {
    pub fn request_id(&self) -> &RequestId {
        match self {
            RequestEvent::RequestSubmitted(e) => &e.request_id,
            RequestEvent::RequestStatusChanged(e) => &e.request_id,
        }
    }
}

impl Event for RequestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RequestEvent::RequestSubmitted(_) => "transport.request.submitted",
            RequestEvent::RequestStatusChanged(_) => "transport.request.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RequestEvent::RequestSubmitted(e) => e.occurred_at,
            RequestEvent::RequestStatusChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Request {
    type Command = RequestCommand;
    type Event = RequestEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RequestEvent::RequestSubmitted(e) => {
                *self = Request::from_submitted(e);
                return;
            }
            RequestEvent::RequestStatusChanged(e) => {
                self.status = e.to;
                self.timestamp = e.occurred_at;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RequestCommand::Advance { to, occurred_at } => {
                if !self.status.can_transition_to(*to) {
                    return Err(DomainError::invalid_transition(self.status, to));
                }
                Ok(vec![RequestEvent::RequestStatusChanged(RequestStatusChanged {
                    request_id: self.id.clone(),
                    from: self.status,
                    to: *to,
                    occurred_at: *occurred_at,
                })])
            }
        }
    }
}

/// Requests of one warehouse.
#[derive(Debug, Clone, Default)]
pub struct RequestBook {
    requests: Registry<Request>,
}

impl RequestBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide a submission. The article reference is checked by the caller.
    pub fn plan_submit(
        &self,
        cmd: SubmitRequest,
        status: RequestStatus,
    ) -> DomainResult<RequestEvent> {
        if self.requests.contains(&cmd.request_id) {
            return Err(DomainError::DuplicateRequestId(cmd.request_id.to_string()));
        }
        cmd.validate()?;
        Ok(RequestEvent::RequestSubmitted(cmd.into_event(status)))
    }

    pub fn plan_advance(
        &self,
        request_id: &RequestId,
        to: RequestStatus,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<RequestEvent>> {
        self.require(request_id)?
            .handle(&RequestCommand::Advance { to, occurred_at })
    }

    pub fn apply(&mut self, event: &RequestEvent) {
        match event {
            RequestEvent::RequestSubmitted(e) => {
                let _ = self.requests.insert(Request::from_submitted(e));
            }
            RequestEvent::RequestStatusChanged(e) => {
                if let Some(request) = self.requests.get_mut(&e.request_id) {
                    request.apply(event);
                }
            }
        }
    }

    pub fn get(&self, request_id: &RequestId) -> Option<&Request> {
        self.requests.get(request_id)
    }

    pub fn require(&self, request_id: &RequestId) -> DomainResult<&Request> {
        self.get(request_id)
            .ok_or_else(|| DomainError::RequestNotFound(request_id.to_string()))
    }

    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.requests.contains(request_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|r| r.is_active()).count()
    }
}
