use divvy_domain::{Money, ParticipantId};
use thiserror::Error;

use crate::model::PaymentSetId;

/// Failures surfaced by ledger operations. All are permanent precondition
/// failures: nothing here is transient and nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Participant {0} is not registered")]
    ParticipantNotFound(ParticipantId),
    #[error("Payment set {set} does not exist for participant {person}")]
    PaymentSetNotFound {
        person: ParticipantId,
        set: PaymentSetId,
    },
    #[error("Line item references unknown participant {0}")]
    InvalidReference(ParticipantId),
    #[error("Line item for {to} has negative amount {amount}")]
    InvalidAmount { to: ParticipantId, amount: Money },
}
