#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{Money, ParticipantId, SuggestedPayment, TotalDebt};
pub use services::suggest_payments;
