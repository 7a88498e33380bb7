//! Infrastructure wiring: engine, event bus and the realtime fan-out.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use serde_json::Value as JsonValue;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use wms_core::{TenantDirectory, TenantId};
use wms_events::{EventBus, EventEnvelope, InMemoryEventBus};
use wms_infra::WarehouseEngine;

pub type Envelope = EventEnvelope<JsonValue>;
pub type Bus = Arc<InMemoryEventBus<Envelope>>;
pub type Engine = WarehouseEngine<Bus>;

const REALTIME_CAPACITY: usize = 256;

pub struct AppServices {
    engine: Arc<Engine>,
    realtime_tx: broadcast::Sender<Envelope>,
}

impl AppServices {
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<Envelope> {
        &self.realtime_tx
    }
}

/// Build the engine for `directory`, optionally loading the demo fixtures.
pub fn build_services(directory: TenantDirectory, seed_demo: bool) -> anyhow::Result<AppServices> {
    let bus: Bus = Arc::new(InMemoryEventBus::new());
    let engine = Arc::new(WarehouseEngine::new(directory, bus.clone()));

    // Realtime channel (SSE): lossy broadcast, tenant-filtered in handlers.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<Envelope>(REALTIME_CAPACITY);

    // The bus subscription is blocking; bridge it on a plain thread that
    // ends when the bus is dropped.
    let sub = bus.subscribe();
    let tx = realtime_tx.clone();
    std::thread::Builder::new()
        .name("wms-realtime".into())
        .spawn(move || {
            while let Ok(envelope) = sub.recv() {
                // No receivers is not an error: nobody is streaming.
                let _ = tx.send(envelope);
            }
        })?;

    if seed_demo {
        wms_infra::load_demo(&*engine)?;
        tracing::info!(tenants = engine.directory().len(), "demo fixtures loaded");
    }

    Ok(AppServices {
        engine,
        realtime_tx,
    })
}

pub fn tenant_sse_stream(
    services: Arc<AppServices>,
    tenant_id: TenantId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(envelope) if *envelope.tenant_id() == tenant_id => {
            let data = serde_json::to_string(&envelope).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default()
                .event(envelope.event_type().to_string())
                .id(envelope.sequence_number().to_string())
                .data(data)))
        }
        // Lagged receivers skip what they missed.
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
