//! Transport orders and the client requests behind them.
//!
//! Both are small state machines. Completing an order or a request has side
//! effects on locations and stock; this crate only decides the status
//! transitions, the coupling lives in the warehouse engine.

pub mod order;
pub mod request;

pub use order::{
    OrderBook, OrderCommand, OrderEvent, OrderStatus, OrderStatusChanged, OrderSubmitted,
    SubmitOrder, TransportOrder,
};
pub use request::{
    Request, RequestBook, RequestCommand, RequestEvent, RequestStatus, RequestStatusChanged,
    RequestSubmitted, RequestType, SubmitRequest,
};
