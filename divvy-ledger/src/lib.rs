#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod registry;
pub mod service;

pub use error::LedgerError;
pub use model::{DebtEntry, DebtEntryId, Participant, PaymentLine, PaymentSet, PaymentSetId};
pub use ports::IdSource;
pub use registry::Registry;
pub use service::LedgerService;
