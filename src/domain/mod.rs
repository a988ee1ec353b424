pub mod draft;
pub mod ledger;
pub mod order;

pub use draft::{DraftField, DraftOrder, DraftPatch};
pub use ledger::OrderLedger;
pub use order::ConfirmedOrder;
