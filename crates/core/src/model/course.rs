use serde::{Deserialize, Deserializer};

use crate::lenient;
use crate::model::ids::CourseId;
use crate::model::plan::format_price_cents;

//
// ─── TIERS ─────────────────────────────────────────────────────────────────────
//

/// Difficulty tier advertised for a course.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Maps a free-form label onto a tier; unknown labels are `Beginner`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "intermediate" | "medium" => Self::Intermediate,
            "advanced" | "expert" | "hard" => Self::Advanced,
            _ => Self::Beginner,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(|raw| Self::from_label(&raw))
    }
}

/// Pricing tier of a course.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PricingTier {
    #[default]
    Free,
    Premium,
}

impl PricingTier {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "premium" | "paid" | "pro" => Self::Premium,
            _ => Self::Free,
        }
    }
}

impl<'de> Deserialize<'de> for PricingTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(|raw| Self::from_label(&raw))
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Course summary/detail record as delivered by the API.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: CourseId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, alias = "lessons_count", deserialize_with = "lenient::u32")]
    pub lesson_count: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub duration: String,
    #[serde(default, alias = "level")]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient::string")]
    pub instructor: String,
    #[serde(default, alias = "tier")]
    pub pricing_tier: PricingTier,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_premium: bool,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub price_cents: u64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub billing: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub rating: f64,
    #[serde(default, alias = "students_enrolled", deserialize_with = "lenient::u32")]
    pub students: u32,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub completion_rate: f64,
}

/// Who is looking at the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub signed_in: bool,
    pub subscriber: bool,
}

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            signed_in: false,
            subscriber: false,
        }
    }
}

/// Where opening a course should lead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseAccess {
    Open,
    RequiresSubscription,
}

impl Course {
    /// Premium if either the flag or the pricing tier says so.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.is_premium || self.pricing_tier == PricingTier::Premium
    }

    #[must_use]
    pub fn access_for(&self, viewer: Viewer) -> CourseAccess {
        if self.is_premium() && !viewer.subscriber {
            CourseAccess::RequiresSubscription
        } else {
            CourseAccess::Open
        }
    }

    #[must_use]
    pub fn price_label(&self) -> String {
        if !self.is_premium() || self.price_cents == 0 {
            return "Free".to_string();
        }
        let price = format_price_cents(self.price_cents);
        match self.billing.as_deref() {
            Some(billing) => format!("{price} / {billing}"),
            None => price,
        }
    }

    /// Case-insensitive match over title, description and instructor.
    ///
    /// `query` is expected to be lower-cased already.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        [&self.title, &self.description, &self.instructor]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}
