//! Ticket domain core
//!
//! Pure, storage-free logic shared by the server and any storefront that
//! embeds this crate: grid classification, ordered selection state, the
//! sold-number ledger algebra, and the confirmation handoff payload.

pub mod grid;
pub mod handoff;
pub mod ledger;
pub mod selection;

pub use grid::{NumberState, TicketGrid};
pub use handoff::ConfirmationMessage;
pub use ledger::LedgerError;
pub use selection::Selection;
