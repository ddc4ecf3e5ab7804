pub mod clock;
pub mod lifecycle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lifecycle::{CheckReason, Purchase, TicketCheck, TicketError, TicketLifecycle, TicketPolicy};
