//! Static subscription plan catalog.

use serde::Serialize;

use crate::plan::gate::QualityTier;

/// Immutable reference data describing one subscription plan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SubscriptionPlan {
    /// Stable plan id (`basic`, `professional`, ...).
    pub id: &'static str,
    /// Human-facing name.
    pub name: &'static str,
    /// Monthly price in `currency`.
    pub price: f64,
    /// ISO currency code.
    pub currency: &'static str,
    /// Highest quality tier renders may use.
    pub max_quality: QualityTier,
    /// Marketing feature bullets.
    pub features: &'static [&'static str],
}

/// Every purchasable plan, cheapest first.
pub static PLANS: [SubscriptionPlan; 4] = [
    SubscriptionPlan {
        id: "basic",
        name: "Basic",
        price: 19.99,
        currency: "EUR",
        max_quality: QualityTier::Sd,
        features: &[
            "SD video export (480p)",
            "Branded intro and outro",
            "Unlimited projects",
        ],
    },
    SubscriptionPlan {
        id: "professional",
        name: "Professional",
        price: 39.99,
        currency: "EUR",
        max_quality: QualityTier::Hd,
        features: &[
            "HD video export (720p)",
            "Branded intro and outro",
            "Agent contact cards",
            "All social formats (16:9, 9:16, 1:1)",
        ],
    },
    SubscriptionPlan {
        id: "enterprise",
        name: "Enterprise",
        price: 99.99,
        currency: "EUR",
        max_quality: QualityTier::FullHd,
        features: &[
            "Full HD video export (1080p)",
            "Multiple agents",
            "Custom fonts and accent colors",
            "Priority rendering",
        ],
    },
    SubscriptionPlan {
        id: "ai_caption",
        name: "AI Caption",
        price: 199.99,
        currency: "EUR",
        max_quality: QualityTier::UltraHd,
        features: &[
            "4K video export (2160p)",
            "AI generated captions",
            "Everything in Enterprise",
        ],
    },
];

/// Lookup a plan by id or display name, ignoring case and surrounding whitespace.
pub fn find_plan(name: &str) -> Option<&'static SubscriptionPlan> {
    let needle = name.trim();
    PLANS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(needle) || p.name.eq_ignore_ascii_case(needle))
}
