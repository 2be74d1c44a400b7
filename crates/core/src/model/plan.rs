/// Billing cadence of a subscription plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BillingPeriod {
    Monthly,
    Yearly,
    Lifetime,
}

impl BillingPeriod {
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Monthly => "/ month",
            Self::Yearly => "/ year",
            Self::Lifetime => "once",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price_cents: u64,
    pub billing: BillingPeriod,
    pub features: Vec<&'static str>,
    pub highlighted: bool,
}

impl SubscriptionPlan {
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("{} {}", format_price_cents(self.price_cents), self.billing.suffix())
    }
}

/// "$12.50" style rendering of an amount in cents.
#[must_use]
pub fn format_price_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Plans offered on the pricing page.
#[must_use]
pub fn standard_plans() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "monthly",
            name: "Monthly",
            price_cents: 1_900,
            billing: BillingPeriod::Monthly,
            features: vec!["All premium courses", "Quizzes and progress tracking", "Cancel anytime"],
            highlighted: false,
        },
        SubscriptionPlan {
            id: "yearly",
            name: "Yearly",
            price_cents: 14_900,
            billing: BillingPeriod::Yearly,
            features: vec![
                "Everything in Monthly",
                "Two months free",
                "Early access to new courses",
            ],
            highlighted: true,
        },
        SubscriptionPlan {
            id: "lifetime",
            name: "Lifetime",
            price_cents: 39_900,
            billing: BillingPeriod::Lifetime,
            features: vec!["Everything in Yearly", "One payment, no renewals"],
            highlighted: false,
        },
    ]
}

#[must_use]
pub fn find_plan(id: &str) -> Option<SubscriptionPlan> {
    standard_plans().into_iter().find(|plan| plan.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents() {
        assert_eq!(format_price_cents(0), "$0.00");
        assert_eq!(format_price_cents(1_905), "$19.05");
    }

    #[test]
    fn exactly_one_plan_is_highlighted() {
        let plans = standard_plans();
        assert_eq!(plans.iter().filter(|plan| plan.highlighted).count(), 1);
        assert_eq!(find_plan("yearly").unwrap().price_label(), "$149.00 / year");
        assert!(find_plan("weekly").is_none());
    }
}
