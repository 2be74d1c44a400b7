use std::sync::Arc;
use std::time::Duration;

use api::Session;
use api::repository::AccountRepository;
use chrono::{DateTime, Utc};
use course_core::model::{SubscriptionPlan, find_plan, standard_plans};
use rand::Rng;

use crate::Clock;
use crate::error::SubscriptionError;

/// How long the simulated checkout "processes" the card.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(1500);

const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub plan: SubscriptionPlan,
    pub confirmation_code: String,
    pub purchased_at: DateTime<Utc>,
}

/// Plan catalog and simulated checkout. No payment provider is involved.
#[derive(Clone)]
pub struct SubscriptionService {
    clock: Clock,
    account: Arc<dyn AccountRepository>,
    session: Session,
    processing_delay: Duration,
}

impl SubscriptionService {
    #[must_use]
    pub fn new(clock: Clock, account: Arc<dyn AccountRepository>, session: Session) -> Self {
        Self {
            clock,
            account,
            session,
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }

    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    #[must_use]
    pub fn plans(&self) -> Vec<SubscriptionPlan> {
        standard_plans()
    }

    /// Run the simulated checkout for `plan_id` and record the subscription.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::SignInRequired` when signed out,
    /// `SubscriptionError::UnknownPlan` for an id outside the catalog, and
    /// `SubscriptionError::Api` if the backend refuses the purchase.
    pub async fn purchase(&self, plan_id: &str) -> Result<PurchaseReceipt, SubscriptionError> {
        let plan =
            find_plan(plan_id).ok_or_else(|| SubscriptionError::UnknownPlan(plan_id.to_string()))?;
        if !self.session.is_signed_in() {
            return Err(SubscriptionError::SignInRequired);
        }

        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }
        self.account.subscribe(plan.id).await?;

        let receipt = PurchaseReceipt {
            confirmation_code: confirmation_code(),
            purchased_at: self.clock.now(),
            plan,
        };
        log::info!(
            "subscribed to {} plan, confirmation {}",
            receipt.plan.id,
            receipt.confirmation_code
        );
        Ok(receipt)
    }
}

fn confirmation_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{InMemoryBackend, MemoryTokenStore};
    use course_core::model::AuthToken;
    use course_core::time::{fixed_clock, fixed_now};

    fn signed_in() -> Session {
        let token = AuthToken::parse("demo-token-1").unwrap();
        Session::load(Arc::new(MemoryTokenStore::with_token(token)))
    }

    fn service(backend: &InMemoryBackend, session: Session) -> SubscriptionService {
        SubscriptionService::new(fixed_clock(), Arc::new(backend.clone()), session)
            .with_processing_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn purchase_records_plan_and_issues_receipt() {
        let backend = InMemoryBackend::new();
        let receipt = service(&backend, signed_in())
            .purchase("yearly")
            .await
            .unwrap();
        assert_eq!(receipt.plan.id, "yearly");
        assert_eq!(receipt.purchased_at, fixed_now());
        assert_eq!(receipt.confirmation_code.len(), CODE_LEN);
        assert!(receipt.confirmation_code.bytes().all(|b| CODE_CHARSET.contains(&b)));
        assert_eq!(backend.subscribed_plan().as_deref(), Some("yearly"));
    }

    #[tokio::test]
    async fn purchase_requires_sign_in() {
        let backend = InMemoryBackend::new();
        let err = service(&backend, Session::in_memory())
            .purchase("monthly")
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::SignInRequired));
        assert!(backend.subscribed_plan().is_none());
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let backend = InMemoryBackend::new();
        let err = service(&backend, signed_in())
            .purchase("weekly")
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::UnknownPlan(id) if id == "weekly"));
    }

    #[test]
    fn plan_catalog_is_static() {
        let backend = InMemoryBackend::new();
        let plans = service(&backend, Session::in_memory()).plans();
        assert_eq!(plans.len(), 3);
    }
}
