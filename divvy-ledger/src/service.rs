use divvy_domain::{suggest_payments, ParticipantId, SuggestedPayment, TotalDebt};
use fxhash::FxHashSet;

use crate::{
    error::LedgerError,
    model::{DebtEntry, DebtEntryId, Participant, PaymentLine, PaymentSet, PaymentSetId},
    ports::IdSource,
    registry::Registry,
};

/// Orchestrates recording payments into the registry and derives aggregates.
///
/// Single-threaded and fully synchronous: no internal locking exists, so
/// concurrent callers must serialize access externally. `record_payment_set`
/// is atomic to observers because validation completes before the first
/// mutation; there is no rollback machinery and none is needed.
pub struct LedgerService<'a> {
    registry: Registry,
    ids: &'a dyn IdSource,
}

impl<'a> LedgerService<'a> {
    pub fn new(ids: &'a dyn IdSource) -> Self {
        Self {
            registry: Registry::new(),
            ids,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Creates and registers an empty participant. Never fails.
    pub fn add_participant(&mut self) -> ParticipantId {
        let id = ParticipantId::new(self.ids.next_token());
        self.registry.insert(Participant::new(id.clone()));
        tracing::debug!(participant = %id, "Registered participant");
        id
    }

    /// Deletes the participant. Debt entries on other participants that
    /// reference the removed id stay in place and keep counting toward
    /// their owners' balances; removing someone whose own balance is
    /// non-zero therefore leaves the remaining balances summing away from
    /// zero.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<(), LedgerError> {
        let balance = self.registry.require(id)?.net_balance();
        if !balance.is_zero() {
            tracing::warn!(
                participant = %id,
                balance = %balance,
                "Removing participant with non-zero balance; remaining balances no longer sum to zero"
            );
        }
        self.registry.remove(id);
        Ok(())
    }

    /// Records a batch of payment lines for `payer` and distributes the
    /// matching debt-entry pairs. Validation of every reference and amount
    /// happens before any mutation, so a failing call leaves the ledger
    /// unchanged. Returns the fresh payment-set id.
    pub fn record_payment_set(
        &mut self,
        payer: &ParticipantId,
        lines: Vec<PaymentLine>,
    ) -> Result<PaymentSetId, LedgerError> {
        self.registry.require(payer)?;

        // Check phase.
        let mut verified: FxHashSet<&ParticipantId> = FxHashSet::default();
        for line in &lines {
            if line.amount.signum() < 0 {
                return Err(LedgerError::InvalidAmount {
                    to: line.to.clone(),
                    amount: line.amount,
                });
            }
            if verified.contains(&line.to) {
                continue;
            }
            if !self.registry.contains(&line.to) {
                return Err(LedgerError::InvalidReference(line.to.clone()));
            }
            verified.insert(&line.to);
        }

        // Commit phase; no fallible step remains.
        let set_id = PaymentSetId::new(self.ids.next_token());
        let mut entries: Vec<(ParticipantId, DebtEntryId, DebtEntry)> = Vec::new();
        for line in &lines {
            if line.to == *payer {
                // Self-payment: counts toward spend, never enters the ledger.
                continue;
            }
            entries.push((
                line.to.clone(),
                DebtEntryId::new(self.ids.next_token()),
                DebtEntry {
                    counterparty: payer.clone(),
                    amount: line.amount,
                },
            ));
            entries.push((
                payer.clone(),
                DebtEntryId::new(self.ids.next_token()),
                DebtEntry {
                    counterparty: line.to.clone(),
                    amount: -line.amount,
                },
            ));
        }

        tracing::debug!(
            payer = %payer,
            set = %set_id,
            lines = lines.len(),
            "Recording payment set"
        );

        let entry_refs = entries
            .iter()
            .map(|(owner, entry_id, _)| (owner.clone(), entry_id.clone()))
            .collect();
        self.registry
            .require_mut(payer)?
            .add_payment_set(set_id.clone(), PaymentSet::new(lines, entry_refs));
        for (owner, entry_id, entry) in entries {
            self.registry.require_mut(&owner)?.add_debt(entry_id, entry);
        }

        Ok(set_id)
    }

    /// Everything the participant ever paid, self-payments included.
    pub fn total_spend(&self, id: &ParticipantId) -> Result<i64, LedgerError> {
        Ok(self.registry.require(id)?.total_spend().amount())
    }

    /// Signed net balance: positive = net debtor, negative = net creditor.
    pub fn total_debt(&self, id: &ParticipantId) -> Result<i64, LedgerError> {
        Ok(self.registry.require(id)?.net_balance().amount())
    }

    /// One entry per registered participant, in registry insertion order.
    pub fn list_all_total_debts(&self) -> Vec<TotalDebt> {
        self.registry
            .iter()
            .map(|participant| TotalDebt {
                person: participant.id().clone(),
                amount: participant.net_balance(),
            })
            .collect()
    }

    /// Balances for exactly the given ids, in the given order. Any
    /// unregistered id fails the whole call; there is no partial result.
    pub fn list_debts_for_ids(
        &self,
        ids: &[ParticipantId],
    ) -> Result<Vec<TotalDebt>, LedgerError> {
        ids.iter()
            .map(|id| {
                Ok(TotalDebt {
                    person: id.clone(),
                    amount: self.registry.require(id)?.net_balance(),
                })
            })
            .collect()
    }

    /// Runs the settlement engine over a snapshot of the current balances.
    /// The ledger's own state is never mutated.
    pub fn suggested_payments(&self) -> Vec<SuggestedPayment> {
        suggest_payments(self.list_all_total_debts())
    }

    pub fn payment_set(
        &self,
        person: &ParticipantId,
        set_id: &PaymentSetId,
    ) -> Result<&PaymentSet, LedgerError> {
        self.registry
            .require(person)?
            .payment_set(set_id)
            .ok_or_else(|| LedgerError::PaymentSetNotFound {
                person: person.clone(),
                set: set_id.clone(),
            })
    }

    pub fn payment_sets(
        &self,
        person: &ParticipantId,
    ) -> Result<impl Iterator<Item = (&PaymentSetId, &PaymentSet)>, LedgerError> {
        Ok(self.registry.require(person)?.payment_sets())
    }

    /// Removes a payment set and reverses the debt entries it created on
    /// both sides, so conservation holds afterwards. Entries whose owner has
    /// since been removed have nothing left to reverse.
    pub fn delete_payment_set(
        &mut self,
        person: &ParticipantId,
        set_id: &PaymentSetId,
    ) -> Result<(), LedgerError> {
        let removed = self.registry.require_mut(person)?.remove_payment_set(set_id);
        let Some(set) = removed else {
            return Err(LedgerError::PaymentSetNotFound {
                person: person.clone(),
                set: set_id.clone(),
            });
        };

        for (owner, entry_id) in set.debt_entries() {
            if let Some(participant) = self.registry.get_mut(owner) {
                participant.remove_debt(entry_id);
            }
        }

        tracing::debug!(person = %person, set = %set_id, "Deleted payment set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstr::ArcStr;
    use divvy_domain::Money;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct StubIdSource(AtomicU64);

    impl StubIdSource {
        fn new() -> Self {
            Self(AtomicU64::new(0))
        }
    }

    impl IdSource for StubIdSource {
        fn next_token(&self) -> ArcStr {
            let n = self.0.fetch_add(1, Ordering::Relaxed);
            ArcStr::from(format!("token-{n}"))
        }
    }

    fn line(to: &ParticipantId, amount: i64) -> PaymentLine {
        PaymentLine {
            to: to.clone(),
            amount: Money::from_i64(amount),
        }
    }

    #[test]
    fn non_self_line_creates_matched_entry_pair() {
        let ids = StubIdSource::new();
        let mut service = LedgerService::new(&ids);
        let payer = service.add_participant();
        let payee = service.add_participant();

        service
            .record_payment_set(&payer, vec![line(&payee, 120)])
            .expect("recording failed");

        let payer_entries: Vec<DebtEntry> = service
            .registry()
            .require(&payer)
            .unwrap()
            .debts()
            .map(|(_, entry)| entry.clone())
            .collect();
        let payee_entries: Vec<DebtEntry> = service
            .registry()
            .require(&payee)
            .unwrap()
            .debts()
            .map(|(_, entry)| entry.clone())
            .collect();

        assert_eq!(
            payee_entries,
            vec![DebtEntry {
                counterparty: payer.clone(),
                amount: Money::from_i64(120),
            }]
        );
        assert_eq!(
            payer_entries,
            vec![DebtEntry {
                counterparty: payee,
                amount: Money::from_i64(-120),
            }]
        );
    }

    #[test]
    fn self_payment_produces_no_entries() {
        let ids = StubIdSource::new();
        let mut service = LedgerService::new(&ids);
        let payer = service.add_participant();

        service
            .record_payment_set(&payer, vec![line(&payer, 300)])
            .expect("recording failed");

        assert_eq!(service.total_spend(&payer), Ok(300));
        assert_eq!(service.total_debt(&payer), Ok(0));
        assert_eq!(
            service
                .registry()
                .require(&payer)
                .unwrap()
                .debts()
                .count(),
            0
        );
    }

    #[test]
    fn payment_set_remembers_created_entries() {
        let ids = StubIdSource::new();
        let mut service = LedgerService::new(&ids);
        let payer = service.add_participant();
        let payee = service.add_participant();

        let set_id = service
            .record_payment_set(&payer, vec![line(&payee, 50), line(&payer, 10)])
            .expect("recording failed");

        let set = service.payment_set(&payer, &set_id).expect("set missing");
        // One non-self line, two sides.
        assert_eq!(set.debt_entries().len(), 2);
        assert_eq!(set.total_amount(), Money::from_i64(60));
    }
}
