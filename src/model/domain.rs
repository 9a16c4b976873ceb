//! Documents the pipeline reads from the surrounding CRUD layer.

use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::Context as _;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{RenderError, RenderResult},
    plan::gate::QualityTier,
};

/// Target aspect ratio of a rendered video.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// `16:9`
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// `9:16`
    #[serde(rename = "9:16")]
    Portrait,
    /// `1:1`
    #[serde(rename = "1:1")]
    Square,
}

/// Overlay layout family derived from [`OutputFormat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Landscape and square frames.
    Horizontal,
    /// Portrait frames.
    Vertical,
}

impl OutputFormat {
    /// All formats in wire order.
    pub const ALL: [OutputFormat; 3] = [Self::Landscape, Self::Portrait, Self::Square];

    /// Wire name (`16:9`, `9:16`, `1:1`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Square => "1:1",
        }
    }

    /// Layout family; square frames reuse the horizontal layout.
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Portrait => Orientation::Vertical,
            Self::Landscape | Self::Square => Orientation::Horizontal,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            "1:1" => Ok(Self::Square),
            other => Err(RenderError::validation(format!(
                "unknown format '{other}' (expected one of 16:9, 9:16, 1:1)"
            ))),
        }
    }
}

/// Where an image payload lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    /// File on local disk.
    Path(PathBuf),
    /// Inline base64 payload, optionally as a `data:<mime>;base64,` URL.
    Base64(String),
}

impl ImageRef {
    /// Load the raw encoded bytes.
    ///
    /// Unreadable files and malformed base64 are [`RenderError::Resource`] so callers can decide
    /// whether a single bad payload is fatal.
    pub fn load_bytes(&self) -> RenderResult<Vec<u8>> {
        match self {
            Self::Path(path) => std::fs::read(path)
                .with_context(|| format!("read image '{}'", path.display()))
                .map_err(|e| RenderError::resource(format!("{e:#}"))),
            Self::Base64(data) => {
                let payload = match data.split_once(";base64,") {
                    Some((prefix, rest)) if prefix.starts_with("data:") => rest,
                    _ => data.as_str(),
                };
                base64::engine::general_purpose::STANDARD
                    .decode(payload.trim())
                    .map_err(|e| RenderError::resource(format!("invalid base64 image: {e}")))
            }
        }
    }
}

/// One property photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub project_id: String,
    pub original: ImageRef,
    #[serde(default)]
    pub enhanced: Option<ImageRef>,
    #[serde(default)]
    pub caption: String,
    pub position: u32,
}

impl Photo {
    /// Image used for rendering: the enhanced version when present.
    pub fn render_source(&self) -> &ImageRef {
        self.enhanced.as_ref().unwrap_or(&self.original)
    }
}

/// A listing's photo collection plus its marketing copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub banner_text: Option<String>,
    #[serde(default)]
    pub price_text: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Photos in slide order (by position; ties keep document order).
    pub fn ordered_photos(&self) -> Vec<&Photo> {
        let mut photos: Vec<&Photo> = self.photos.iter().collect();
        photos.sort_by_key(|p| p.position);
        photos
    }

    /// Price overlay text with the currency symbol applied once.
    ///
    /// `fallback_currency` is the branding profile's symbol, used when the project has none.
    pub fn price_label(&self, fallback_currency: &str) -> Option<String> {
        let price = non_empty(self.price_text.as_deref())?;
        let symbol = non_empty(self.currency_symbol.as_deref())
            .or_else(|| non_empty(Some(fallback_currency)))
            .unwrap_or("");
        if symbol.is_empty() || price.starts_with(symbol) || price.ends_with(symbol) {
            return Some(price.to_string());
        }
        Some(format!("{symbol} {price}"))
    }

    /// Banner overlay text, if any.
    pub fn banner_label(&self) -> Option<&str> {
        non_empty(self.banner_text.as_deref())
    }
}

/// Listing agent shown on the outro card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo: Option<ImageRef>,
}

/// Horizontal text alignment preference from the branding profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Per-user look and feel. Fields default to neutral values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct BrandingProfile {
    pub owner_id: String,
    #[serde(default)]
    pub logo: Option<ImageRef>,
    #[serde(default)]
    pub accent_color: String,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub alignment: TextAlign,
    #[serde(default)]
    pub currency_symbol: String,
}

impl BrandingProfile {
    /// Profile created lazily for users that never customized their branding.
    pub fn neutral(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }
}

/// Caller's render parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub project_id: String,
    #[serde(rename = "format_type")]
    pub format: OutputFormat,
    pub quality: QualityTier,
}

impl RenderRequest {
    /// Build a request from wire strings, rejecting unknown formats or qualities.
    pub fn parse(project_id: impl Into<String>, format: &str, quality: &str) -> RenderResult<Self> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(RenderError::validation("project_id must be non-empty"));
        }
        Ok(Self {
            project_id,
            format: format.parse()?,
            quality: quality.parse()?,
        })
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/model/domain.rs"]
mod tests;
