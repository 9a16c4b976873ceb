//! Subscription plan → maximum quality tier gating.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{RenderError, RenderResult};

/// Output quality preset, ordered from most to least restrictive.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum QualityTier {
    /// 480p class, 24 fps.
    #[default]
    #[serde(rename = "sd")]
    Sd,
    /// 720p class.
    #[serde(rename = "hd")]
    Hd,
    /// 1080p class.
    #[serde(rename = "fullhd")]
    FullHd,
    /// 2160p class.
    #[serde(rename = "4k")]
    UltraHd,
}

impl QualityTier {
    /// All tiers in ascending order.
    pub const ALL: [QualityTier; 4] = [Self::Sd, Self::Hd, Self::FullHd, Self::UltraHd];

    /// Ordinal level: `sd`=1, `hd`=2, `fullhd`=3, `4k`=4.
    pub const fn level(self) -> u8 {
        match self {
            Self::Sd => 1,
            Self::Hd => 2,
            Self::FullHd => 3,
            Self::UltraHd => 4,
        }
    }

    /// Wire name of the tier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sd => "sd",
            Self::Hd => "hd",
            Self::FullHd => "fullhd",
            Self::UltraHd => "4k",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sd" => Ok(Self::Sd),
            "hd" => Ok(Self::Hd),
            "fullhd" => Ok(Self::FullHd),
            "4k" => Ok(Self::UltraHd),
            other => Err(RenderError::validation(format!(
                "unknown quality '{other}' (expected one of sd, hd, fullhd, 4k)"
            ))),
        }
    }
}

/// Highest tier the named plan may render. Unknown, free and trial plans get `sd`.
pub fn max_quality(plan_name: &str) -> QualityTier {
    crate::plan::catalog::find_plan(plan_name)
        .map(|p| p.max_quality)
        .unwrap_or(QualityTier::Sd)
}

/// `level(requested) <= level(max_quality(plan_name))`.
pub fn is_allowed(plan_name: &str, requested: QualityTier) -> bool {
    requested.level() <= max_quality(plan_name).level()
}

/// Like [`is_allowed`] but returns an [`RenderError::Authorization`] naming the maximum tier.
pub fn authorize(plan_name: &str, requested: QualityTier) -> RenderResult<()> {
    let max_allowed = max_quality(plan_name);
    if requested.level() <= max_allowed.level() {
        return Ok(());
    }
    Err(RenderError::Authorization {
        plan: plan_name.to_string(),
        requested,
        max_allowed,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/plan/gate.rs"]
mod tests;
