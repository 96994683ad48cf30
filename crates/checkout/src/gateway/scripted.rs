//! Deterministic payment gateway for tests and demos.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use common::{Money, RecordId};
use domain::Transaction;

use super::{PaymentDeclined, PaymentGateway, PaymentReceipt};

#[derive(Debug, Default)]
struct ScriptedState {
    outcomes: VecDeque<bool>,
    decline_all: bool,
    charges: Vec<(RecordId, Money)>,
    next_reference: u32,
}

/// Gateway whose outcomes are set by the caller.
///
/// Approves by default. Queued outcomes are consumed first; once the queue is
/// empty the `decline_all` switch decides.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPaymentGateway {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedPaymentGateway {
    /// Creates a gateway that approves every charge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that declines every charge.
    pub fn declining() -> Self {
        let gateway = Self::new();
        gateway.set_decline_all(true);
        gateway
    }

    /// Switches between approving and declining when no outcome is queued.
    pub fn set_decline_all(&self, decline: bool) {
        self.lock().decline_all = decline;
    }

    /// Queues outcomes for the next charges, `true` meaning approve.
    pub fn queue_outcomes(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.lock().outcomes.extend(outcomes);
    }

    /// Returns how many charges were attempted.
    pub fn charge_count(&self) -> usize {
        self.lock().charges.len()
    }

    /// Returns the amounts of all attempted charges, in order.
    pub fn charged_amounts(&self) -> Vec<Money> {
        self.lock().charges.iter().map(|(_, amount)| *amount).collect()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PaymentGateway for ScriptedPaymentGateway {
    async fn charge(&self, transaction: &Transaction) -> Result<PaymentReceipt, PaymentDeclined> {
        let mut state = self.lock();
        state.charges.push((transaction.id, transaction.amount));

        let approve = match state.outcomes.pop_front() {
            Some(outcome) => outcome,
            None => !state.decline_all,
        };
        if !approve {
            return Err(PaymentDeclined::new("Payment declined"));
        }

        state.next_reference += 1;
        Ok(PaymentReceipt {
            reference: format!("PAY-{:04}", state.next_reference),
        })
    }
}
