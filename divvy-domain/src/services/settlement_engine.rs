use crate::model::{Money, SuggestedPayment, TotalDebt};

/// Produce the ordered list of payments that nets every balance to zero.
///
/// Greedy two-cursor matching: the largest borrower pays the largest lender
/// until one side of the pair reaches zero. This is a deterministic
/// heuristic, not the minimum-transaction-count solution (that variant is
/// NP-hard and explicitly out of scope).
///
/// Sorting is stable, so participants with equal amounts keep the order of
/// the input snapshot. Callers pass balances in registry insertion order to
/// get reproducible output. The snapshot is consumed; live ledger state is
/// never touched.
pub fn suggest_payments<I>(balances: I) -> Vec<SuggestedPayment>
where
    I: IntoIterator<Item = TotalDebt>,
{
    let mut borrowers: Vec<TotalDebt> = Vec::new();
    let mut lenders: Vec<TotalDebt> = Vec::new();

    for debt in balances {
        match debt.amount.signum() {
            1 => borrowers.push(debt),
            -1 => lenders.push(debt),
            _ => {}
        }
    }

    // Owes the most first / is owed the most first.
    borrowers.sort_by(|a, b| b.amount.cmp(&a.amount));
    lenders.sort_by(|a, b| a.amount.cmp(&b.amount));

    let mut payments = Vec::new();
    let mut borrower_index = 0;
    let mut lender_index = 0;

    while borrower_index < borrowers.len() && lender_index < lenders.len() {
        let borrower = &mut borrowers[borrower_index];
        let lender = &mut lenders[lender_index];

        let amount = Money::from_i64(borrower.amount.abs().min(lender.amount.abs()));

        payments.push(SuggestedPayment {
            from: borrower.person.clone(),
            to: lender.person.clone(),
            amount,
        });

        borrower.amount -= amount;
        lender.amount += amount;

        // Both cursors advance in the same round when the amounts tie.
        if borrower.amount.is_zero() {
            borrower_index += 1;
        }
        if lender.amount.is_zero() {
            lender_index += 1;
        }
    }

    payments
}
