//! Wire shapes for generation records and their canonical conversions.
//!
//! The backend's field names drifted across deployment revisions: the same
//! record appears with `product_category` or `category`, `is_favorite` or
//! `is_favorited`, and the ad copy as a string array, a single string, or a
//! JSON-encoded array stored in a text column. This module is the single
//! place those spellings are reconciled; everything outside it works with
//! the canonical types from `eqori-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eqori_core::{GeneratedCopy, GenerationId, GenerationPatch, GenerationRecord, ProductBrief};

/// Alias-tolerant inbound record.
#[derive(Debug, Deserialize)]
pub(crate) struct WireGeneration {
    id: i64,
    product_name: String,
    #[serde(default, alias = "product_category")]
    category: Option<String>,
    #[serde(default, alias = "input_features")]
    features: Option<String>,
    #[serde(default, alias = "input_audience")]
    target_audience: Option<String>,
    #[serde(default, alias = "input_tone")]
    tone_of_voice: Option<String>,
    #[serde(default, alias = "input_keywords")]
    seo_keywords: Option<String>,
    #[serde(default, alias = "product_description")]
    generated_description: Option<String>,
    #[serde(default, alias = "social_media_ads")]
    generated_ad_copy: Option<AdCopy>,
    #[serde(default, alias = "email_content")]
    generated_email_blurb: Option<String>,
    #[serde(default, alias = "is_favorited")]
    is_favorite: bool,
    created_at: DateTime<Utc>,
}

/// Ad copy as observed on the wire: a string array, or one string that may
/// itself be a JSON-encoded array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AdCopy {
    Many(Vec<String>),
    One(String),
}

impl AdCopy {
    fn normalize(self) -> Vec<String> {
        match self {
            Self::Many(variants) => variants,
            Self::One(s) => match serde_json::from_str::<Vec<String>>(&s) {
                Ok(variants) => variants,
                Err(_) => vec![s],
            },
        }
    }
}

impl From<WireGeneration> for GenerationRecord {
    fn from(wire: WireGeneration) -> Self {
        Self {
            id: GenerationId::new(wire.id),
            brief: ProductBrief {
                product_name: wire.product_name,
                category: wire.category,
                features: wire.features,
                target_audience: wire.target_audience,
                tone_of_voice: wire.tone_of_voice,
                seo_keywords: wire.seo_keywords,
            },
            copy: GeneratedCopy {
                description: wire.generated_description.unwrap_or_default(),
                ad_copy: wire
                    .generated_ad_copy
                    .map(AdCopy::normalize)
                    .unwrap_or_default(),
                email_blurb: wire.generated_email_blurb.unwrap_or_default(),
            },
            is_favorite: wire.is_favorite,
            created_at: wire.created_at,
        }
    }
}

/// Outbound partial update, in the backend's canonical spelling.
#[derive(Debug, Serialize)]
pub(crate) struct WireGenerationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_ad_copy: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_email_blurb: Option<String>,
}

impl From<GenerationPatch> for WireGenerationPatch {
    fn from(patch: GenerationPatch) -> Self {
        Self {
            is_favorite: patch.is_favorite,
            generated_description: patch.description,
            generated_ad_copy: patch.ad_copy,
            generated_email_blurb: patch.email_blurb,
        }
    }
}

/// Acknowledgement body returned by the delete endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteAck {
    #[allow(dead_code)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_revision_field_names() {
        let record: GenerationRecord = serde_json::from_str::<WireGeneration>(
            r#"{
                "id": 7,
                "product_name": "Trail Kettle",
                "category": "Outdoors",
                "features": "titanium, 600ml",
                "target_audience": "hikers",
                "tone_of_voice": "playful",
                "seo_keywords": "camping kettle",
                "generated_description": "A kettle.",
                "generated_ad_copy": ["Ad one", "Ad two"],
                "generated_email_blurb": "Buy the kettle.",
                "is_favorite": true,
                "created_at": "2026-02-01T08:30:00Z"
            }"#,
        )
        .expect("deserialize")
        .into();

        assert_eq!(record.id, GenerationId::new(7));
        assert_eq!(record.brief.category.as_deref(), Some("Outdoors"));
        assert_eq!(record.copy.ad_copy, vec!["Ad one", "Ad two"]);
        assert!(record.is_favorite);
    }

    #[test]
    fn test_legacy_revision_field_names() {
        let record: GenerationRecord = serde_json::from_str::<WireGeneration>(
            r#"{
                "id": 8,
                "product_name": "Trail Kettle",
                "product_category": "Outdoors",
                "input_features": "titanium",
                "input_audience": "hikers",
                "input_tone": "playful",
                "input_keywords": "kettle",
                "product_description": "A kettle.",
                "social_media_ads": "One big ad",
                "email_content": "Buy it.",
                "is_favorited": true,
                "created_at": "2026-02-01T08:30:00Z"
            }"#,
        )
        .expect("deserialize")
        .into();

        assert_eq!(record.brief.category.as_deref(), Some("Outdoors"));
        assert_eq!(record.copy.description, "A kettle.");
        assert_eq!(record.copy.ad_copy, vec!["One big ad"]);
        assert_eq!(record.copy.email_blurb, "Buy it.");
        assert!(record.is_favorite);
    }

    #[test]
    fn test_ad_copy_json_encoded_string() {
        // Some revisions persisted the array as JSON text in a string column.
        let record: GenerationRecord = serde_json::from_str::<WireGeneration>(
            r#"{
                "id": 9,
                "product_name": "Trail Kettle",
                "social_media_ads": "[\"Ad A\", \"Ad B\", \"Ad C\"]",
                "created_at": "2026-02-01T08:30:00Z"
            }"#,
        )
        .expect("deserialize")
        .into();

        assert_eq!(record.copy.ad_copy, vec!["Ad A", "Ad B", "Ad C"]);
        assert!(!record.is_favorite);
        assert!(record.copy.description.is_empty());
    }

    #[test]
    fn test_patch_serializes_backend_spelling() {
        let patch = WireGenerationPatch::from(GenerationPatch {
            is_favorite: Some(true),
            description: Some("New description".to_string()),
            ad_copy: None,
            email_blurb: None,
        });
        let json = serde_json::to_value(&patch).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "is_favorite": true,
                "generated_description": "New description"
            })
        );
    }
}
