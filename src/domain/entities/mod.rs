//! # Domain Entities
//!
//! Core domain entities of the counseling platform. All entities map
//! directly to their corresponding database tables and are keyed by
//! prefixed string ids.
//!
//! ## Core Entities
//!
//! - **User**: Platform account (student, counselor, admin)
//! - **Conversation**: Two-party chat thread; its id doubles as the realtime room id
//! - **Message**: A chat message, also the payload of the `new_message` realtime event
//! - **CallSession**: An audio/video call record with WebRTC signaling relayed live
//!
//! ## Supporting Entities
//!
//! - **Booking**: A scheduled counseling session
//! - **Reminder**: In-app booking reminder pushed over the realtime layer
//! - **EmailLog**: Offline-fallback notification record
//! - **StoredFile**: Chat attachment metadata
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod booking;
mod call;
mod conversation;
mod email_log;
mod message;
mod reminder;
mod stored_file;
mod user;

pub use booking::{Booking, BookingRepository, BookingStatus};
pub use call::{CallRepository, CallSession, CallStatus, CallType};
pub use conversation::{Conversation, ConversationRepository};
pub use email_log::{EmailLog, EmailLogRepository};
pub use message::{Message, MessageRepository};
pub use reminder::{Reminder, ReminderRepository};
pub use stored_file::{FileRepository, StoredFile};
pub use user::{User, UserRepository, UserType};
