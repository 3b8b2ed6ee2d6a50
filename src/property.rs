//! Property data model
//!
//! Field names mirror the upstream service's JSON contract (camelCase), so
//! a stored property document deserializes directly. Localized content is
//! validated strictly: an object that fails the full-schema parse is
//! treated as absent and the resolver falls back to legacy content.

use serde::{Deserialize, Deserializer, Serialize};

/// Immutable input to brochure generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// First URL is the canonical hero image
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub agent_info: AgentInfo,
    /// Always-present fallback content
    #[serde(default, alias = "aiContent")]
    pub legacy_content: LegacyContent,
    #[serde(default, deserialize_with = "lenient_localized")]
    pub english_content: Option<LocalizedContent>,
    #[serde(default, deserialize_with = "lenient_localized")]
    pub arabic_content: Option<LocalizedContent>,
}

/// Agent contact triple shown on the contact page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Plain fallback content used whenever localized content is absent or
/// fails validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyContent {
    #[serde(default)]
    pub english_description: String,
    #[serde(default)]
    pub arabic_description: String,
    #[serde(default)]
    pub key_highlights: Vec<String>,
}

/// AI-generated content for one language.
///
/// Every field is required at the schema level; a partially-populated
/// object does not exist in this model. Labels that parse as empty strings
/// are later filled from the built-in default table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedContent {
    pub title: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub amenities: Vec<String>,
    pub price_label: String,
    pub address_label: String,
    pub city_label: String,
    pub state_label: String,
    pub zip_code_label: String,
    pub amenities_label: String,
    pub agent_label: String,
    pub property_description_label: String,
    pub key_highlights_label: String,
    pub property_gallery_label: String,
}

impl LocalizedContent {
    /// Strict parse of a JSON value; any missing field means the whole
    /// object is treated as absent.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

fn lenient_localized<'de, D>(deserializer: D) -> Result<Option<LocalizedContent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(LocalizedContent::from_value(&value))
}

impl PropertyRecord {
    pub fn localized(&self, language: crate::locale::Language) -> Option<&LocalizedContent> {
        match language {
            crate::locale::Language::English => self.english_content.as_ref(),
            crate::locale::Language::Arabic => self.arabic_content.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_localized() -> serde_json::Value {
        json!({
            "title": "Luxury Villa",
            "description": "A bright villa.",
            "highlights": ["Sea view"],
            "amenities": ["Pool"],
            "priceLabel": "Price",
            "addressLabel": "Address",
            "cityLabel": "City",
            "stateLabel": "State",
            "zipCodeLabel": "ZIP Code",
            "amenitiesLabel": "Amenities & Features",
            "agentLabel": "Contact Your Agent",
            "propertyDescriptionLabel": "Property Description",
            "keyHighlightsLabel": "Key Highlights",
            "propertyGalleryLabel": "Property Gallery"
        })
    }

    #[test]
    fn test_strict_parse_accepts_full_object() {
        let parsed = LocalizedContent::from_value(&full_localized());
        assert!(parsed.is_some());
        assert_eq!(parsed.unwrap().title, "Luxury Villa");
    }

    #[test]
    fn test_strict_parse_rejects_missing_field() {
        let mut value = full_localized();
        value.as_object_mut().unwrap().remove("agentLabel");
        assert!(LocalizedContent::from_value(&value).is_none());
    }

    #[test]
    fn test_strict_parse_rejects_null_and_garbage() {
        assert!(LocalizedContent::from_value(&serde_json::Value::Null).is_none());
        assert!(LocalizedContent::from_value(&json!("not an object")).is_none());
    }

    #[test]
    fn test_property_parse_with_broken_localized() {
        // A malformed localized object degrades to None instead of failing
        // the whole property document
        let record: PropertyRecord = serde_json::from_value(json!({
            "title": "Test Home",
            "price": 550000.0,
            "englishContent": {"title": "only a title"},
            "aiContent": {"englishDescription": "Nice home."}
        }))
        .unwrap();
        assert!(record.english_content.is_none());
        assert!(record.arabic_content.is_none());
        assert_eq!(record.legacy_content.english_description, "Nice home.");
    }

    #[test]
    fn test_property_parse_camel_case() {
        let record: PropertyRecord = serde_json::from_value(json!({
            "title": "Test Home",
            "price": 1.0,
            "zipCode": "12345",
            "imageUrls": ["http://example.com/a.jpg"],
            "agentInfo": {"name": "Jo", "email": "jo@x.com", "phone": "555"}
        }))
        .unwrap();
        assert_eq!(record.zip_code, "12345");
        assert_eq!(record.image_urls.len(), 1);
        assert_eq!(record.agent_info.name, "Jo");
    }
}
