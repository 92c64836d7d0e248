//! Realtime Connection & Signaling Core
//!
//! Tracks which users are online, routes chat/typing/call events to the
//! correct live connection, and manages room membership for conversations.
//! REST handlers push events in through the [`EventRouter`]; when a direct
//! target is offline the router reports it so the handler can fall back to
//! an email notification.

pub mod events;
pub mod handler;
pub mod presence;
pub mod rooms;
pub mod router;
pub mod session;

pub use events::{InboundFrame, OutboundEvent};
pub use handler::ws_handler;
pub use presence::PresenceRegistry;
pub use rooms::RoomTable;
pub use router::{Delivery, EventRouter};
pub use session::{ConnectionSession, SessionHandle, SessionLifecycle};
