//! The two user-facing pipelines: reading one account's state and sending
//! an STX transfer. Each flow owns its own API handles and shares nothing
//! with the other.

pub mod account_query;
pub mod transfer;

pub use account_query::AccountQueryFlow;
pub use transfer::{TransferFlow, TransferLookup};
