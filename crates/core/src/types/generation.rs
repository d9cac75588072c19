//! Generation records: the unit of AI-produced marketing content.
//!
//! These are the canonical shapes. The backend's wire spellings drifted
//! over deployment revisions (`is_favorite` vs `is_favorited`,
//! `generated_description` vs `product_description`, ...); the client's
//! transport layer reconciles all of them into these types, and nothing
//! outside that boundary sees a wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::GenerationId;

/// Product metadata submitted to the generator.
///
/// Only the product name is required; the rest refine the generated copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBrief {
    /// Name of the product being marketed.
    pub product_name: String,
    /// Product category (e.g. "Fitness", "Home Office").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text feature list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
    /// Intended audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Tone of voice for the copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_of_voice: Option<String>,
    /// SEO keywords to weave into the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<String>,
}

impl ProductBrief {
    /// Create a brief with only the required product name.
    #[must_use]
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Self::default()
        }
    }
}

/// The three pieces of copy produced for one brief.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCopy {
    /// SEO-optimized product description.
    pub description: String,
    /// Social ad variations (one per platform).
    pub ad_copy: Vec<String>,
    /// Marketing email blurb.
    pub email_blurb: String,
}

/// One unit of generated marketing content plus its input parameters and
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Unique record ID.
    pub id: GenerationId,
    /// The brief this record was generated from.
    pub brief: ProductBrief,
    /// The generated copy (possibly edited after the fact).
    pub copy: GeneratedCopy,
    /// Whether the user starred this record.
    pub is_favorite: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Partial update to a generation record.
///
/// Mirrors the backend's update contract: absent fields are left untouched.
/// Used for toggling the favorite flag and for saving edited copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPatch {
    /// New favorite state, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    /// Edited description, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Edited ad copy, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_copy: Option<Vec<String>>,
    /// Edited email blurb, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_blurb: Option<String>,
}

impl GenerationPatch {
    /// A patch that only sets the favorite flag.
    #[must_use]
    pub fn favorite(value: bool) -> Self {
        Self {
            is_favorite: Some(value),
            ..Self::default()
        }
    }

    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_favorite.is_none()
            && self.description.is_none()
            && self.ad_copy.is_none()
            && self.email_blurb.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_skips_absent_fields() {
        let brief = ProductBrief::named("Trail Kettle");
        let json = serde_json::to_value(&brief).expect("serialize");
        assert_eq!(json, serde_json::json!({"product_name": "Trail Kettle"}));
    }

    #[test]
    fn test_patch_favorite_only() {
        let patch = GenerationPatch::favorite(true);
        assert!(!patch.is_empty());
        let json = serde_json::to_value(&patch).expect("serialize");
        assert_eq!(json, serde_json::json!({"is_favorite": true}));
    }

    #[test]
    fn test_empty_patch() {
        assert!(GenerationPatch::default().is_empty());
    }
}
