//! Coin-flip payment gateway.

use std::time::Duration;

use async_trait::async_trait;
use domain::Transaction;
use rand::Rng;

use super::{PaymentDeclined, PaymentGateway, PaymentReceipt};

/// Share of charges approved by default.
pub const DEFAULT_SUCCESS_RATE: f64 = 0.95;

const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Waits a fixed delay, then approves with probability `success_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentGateway {
    success_rate: f64,
    delay: Duration,
}

impl SimulatedPaymentGateway {
    /// Creates a gateway. Rates outside `0.0..=1.0` are clamped; NaN falls
    /// back to the default rate.
    pub fn new(success_rate: f64, delay: Duration) -> Self {
        let success_rate = if success_rate.is_nan() {
            DEFAULT_SUCCESS_RATE
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self {
            success_rate,
            delay,
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_RATE, DEFAULT_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    #[tracing::instrument(skip(self, transaction), fields(transaction_id = %transaction.id))]
    async fn charge(&self, transaction: &Transaction) -> Result<PaymentReceipt, PaymentDeclined> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let approved = rand::thread_rng().gen_bool(self.success_rate);
        if approved {
            Ok(PaymentReceipt {
                reference: format!("SIM-{}", transaction.reference()),
            })
        } else {
            tracing::debug!("simulated decline");
            Err(PaymentDeclined::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use domain::{PaymentMethod, ShippingAddress};

    fn transaction() -> Transaction {
        Transaction::pending(
            UserId::new("buyer1"),
            vec![],
            ShippingAddress::default(),
            PaymentMethod::CreditCard,
        )
    }

    #[test]
    fn rate_is_clamped() {
        assert_eq!(SimulatedPaymentGateway::new(1.5, Duration::ZERO).success_rate(), 1.0);
        assert_eq!(SimulatedPaymentGateway::new(-1.0, Duration::ZERO).success_rate(), 0.0);
        assert_eq!(
            SimulatedPaymentGateway::new(f64::NAN, Duration::ZERO).success_rate(),
            DEFAULT_SUCCESS_RATE
        );
    }

    #[test]
    fn default_matches_storefront_odds() {
        let gateway = SimulatedPaymentGateway::default();
        assert_eq!(gateway.success_rate(), 0.95);
        assert_eq!(gateway.delay(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn certain_success_always_approves() {
        let gateway = SimulatedPaymentGateway::new(1.0, Duration::ZERO);
        for _ in 0..20 {
            let receipt = gateway.charge(&transaction()).await.unwrap();
            assert!(receipt.reference.starts_with("SIM-"));
        }
    }

    #[tokio::test]
    async fn certain_failure_always_declines() {
        let gateway = SimulatedPaymentGateway::new(0.0, Duration::ZERO);
        for _ in 0..20 {
            let declined = gateway.charge(&transaction()).await.unwrap_err();
            assert_eq!(declined, PaymentDeclined::default());
        }
    }

    #[tokio::test]
    async fn delay_is_waited() {
        let gateway = SimulatedPaymentGateway::new(1.0, Duration::from_millis(20));
        let started = std::time::Instant::now();
        gateway.charge(&transaction()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
