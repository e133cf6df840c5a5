//! pooltix-domain
//!
//! Pure domain models (TicketType, Catalog, Ticket, DailyReport, calendar stamping).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod calendar;
pub mod catalog;
pub mod report;
pub mod ticket;

pub use calendar::*;
pub use catalog::*;
pub use report::*;
pub use ticket::*;
