use std::fmt;

use arcstr::ArcStr;
use divvy_domain::{Money, ParticipantId};
use indexmap::IndexMap;

/// Opaque unique token identifying a recorded payment set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaymentSetId(ArcStr);

impl PaymentSetId {
    pub fn new(token: impl Into<ArcStr>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque unique token identifying one debt-ledger line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DebtEntryId(ArcStr);

impl DebtEntryId {
    pub fn new(token: impl Into<ArcStr>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DebtEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One instruction within a payment set: the recording participant paid
/// `amount` on behalf of `to`. Amounts are validated non-negative before a
/// set is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentLine {
    pub to: ParticipantId,
    pub amount: Money,
}

/// A batch of payment lines submitted together by one payer, plus the debt
/// entries the batch created. The entry list is what makes deletion able to
/// reverse the batch on both sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentSet {
    lines: Vec<PaymentLine>,
    debt_entries: Vec<(ParticipantId, DebtEntryId)>,
}

impl PaymentSet {
    pub fn new(lines: Vec<PaymentLine>, debt_entries: Vec<(ParticipantId, DebtEntryId)>) -> Self {
        Self {
            lines,
            debt_entries,
        }
    }

    pub fn lines(&self) -> &[PaymentLine] {
        &self.lines
    }

    pub fn debt_entries(&self) -> &[(ParticipantId, DebtEntryId)] {
        &self.debt_entries
    }

    /// Sum over every line, self-payments included.
    pub fn total_amount(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.amount)
    }
}

/// One signed ledger line. A non-self payment creates a matched pair:
/// `+amount` on the payee (who now owes the payer) and `-amount` on the
/// payer. The counterparty is held by id, never by a handle to the other
/// participant, so mutually indebted participants form no ownership cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebtEntry {
    pub counterparty: ParticipantId,
    pub amount: Money,
}

/// Per-participant state: payment history and debt ledger, both in insertion
/// order. A participant starts empty and knows nothing about the registry.
#[derive(Clone, Debug)]
pub struct Participant {
    id: ParticipantId,
    payments: IndexMap<PaymentSetId, PaymentSet>,
    debts: IndexMap<DebtEntryId, DebtEntry>,
}

impl Participant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            payments: IndexMap::new(),
            debts: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn add_payment_set(&mut self, set_id: PaymentSetId, set: PaymentSet) {
        self.payments.insert(set_id, set);
    }

    pub fn payment_set(&self, set_id: &PaymentSetId) -> Option<&PaymentSet> {
        self.payments.get(set_id)
    }

    pub fn payment_sets(&self) -> impl Iterator<Item = (&PaymentSetId, &PaymentSet)> {
        self.payments.iter()
    }

    pub fn remove_payment_set(&mut self, set_id: &PaymentSetId) -> Option<PaymentSet> {
        self.payments.shift_remove(set_id)
    }

    pub fn add_debt(&mut self, entry_id: DebtEntryId, entry: DebtEntry) {
        debug_assert_ne!(entry.counterparty, self.id, "no participant owes itself");
        self.debts.insert(entry_id, entry);
    }

    pub fn remove_debt(&mut self, entry_id: &DebtEntryId) -> Option<DebtEntry> {
        self.debts.shift_remove(entry_id)
    }

    pub fn debts(&self) -> impl Iterator<Item = (&DebtEntryId, &DebtEntry)> {
        self.debts.iter()
    }

    /// Sum of every line in every recorded payment set.
    pub fn total_spend(&self) -> Money {
        self.payments
            .values()
            .fold(Money::zero(), |acc, set| acc + set.total_amount())
    }

    /// Signed net balance: the sum of all debt entries.
    pub fn net_balance(&self) -> Money {
        self.debts
            .values()
            .fold(Money::zero(), |acc, entry| acc + entry.amount)
    }
}
