//! Language handling and content resolution
//!
//! Selects between AI-generated localized content and legacy fallback
//! fields for each language, fills empty labels from one built-in default
//! table, and runs every resolved Arabic string through the mojibake
//! repair before it reaches layout.

use crate::property::PropertyRecord;
use crate::sanitize::{repair_mojibake, strip_bullet_prefix};
use crate::types::Align;

/// Brochure language variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Arabic,
}

impl Language {
    pub fn direction(&self) -> Direction {
        match self {
            Language::English => Direction::Ltr,
            Language::Arabic => Direction::Rtl,
        }
    }
}

/// Writing direction, carrying alignment for text blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }

    /// Default alignment of body text in this direction
    pub fn text_align(&self) -> Align {
        match self {
            Direction::Ltr => Align::Left,
            Direction::Rtl => Align::Right,
        }
    }
}

/// The ten UI label strings drawn on brochure pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub price: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub amenities: String,
    pub agent: String,
    pub description: String,
    pub highlights: String,
    pub gallery: String,
}

impl Labels {
    /// Built-in defaults, the single source for label fallback in both
    /// resolution paths
    pub fn defaults(language: Language) -> Self {
        match language {
            Language::English => Self {
                price: "Price".to_string(),
                address: "Address".to_string(),
                city: "City".to_string(),
                state: "State".to_string(),
                zip: "ZIP Code".to_string(),
                amenities: "Amenities & Features".to_string(),
                agent: "Contact Your Agent".to_string(),
                description: "Property Description".to_string(),
                highlights: "Key Highlights".to_string(),
                gallery: "Property Gallery".to_string(),
            },
            Language::Arabic => Self {
                price: "السعر".to_string(),
                address: "العنوان".to_string(),
                city: "المدينة".to_string(),
                state: "الولاية".to_string(),
                zip: "الرمز البريدي".to_string(),
                amenities: "المرافق والميزات".to_string(),
                agent: "اتصل بوكيلك".to_string(),
                description: "وصف العقار".to_string(),
                highlights: "المميزات الرئيسية".to_string(),
                gallery: "معرض العقار".to_string(),
            },
        }
    }
}

/// Built-in page copy that is not part of the localized label set
#[derive(Debug, Clone)]
pub struct BuiltinCopy {
    pub cover_heading: &'static str,
    pub investment_heading: &'static str,
    pub investment_body: &'static str,
    pub contact_name: &'static str,
    pub contact_email: &'static str,
    pub contact_phone: &'static str,
    pub thank_you: &'static str,
    pub image_unavailable: &'static str,
}

impl BuiltinCopy {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self {
                cover_heading: "Exclusive Property Listing",
                investment_heading: "Investment Opportunity",
                investment_body: "This property combines a prime location with \
lasting value. Contact our team for a private viewing and a detailed \
investment profile.",
                contact_name: "Name",
                contact_email: "Email",
                contact_phone: "Phone",
                thank_you: "Thank you for your interest in this property",
                image_unavailable: "Image not available",
            },
            Language::Arabic => Self {
                cover_heading: "عرض عقاري حصري",
                investment_heading: "فرصة استثمارية",
                investment_body: "يجمع هذا العقار بين موقع مميز وقيمة دائمة. تواصل مع فريقنا لترتيب معاينة خاصة والحصول على ملف استثماري مفصل.",
                contact_name: "الاسم",
                contact_email: "البريد الإلكتروني",
                contact_phone: "الهاتف",
                thank_you: "شكراً لاهتمامكم بهذا العقار",
                image_unavailable: "الصورة غير متوفرة",
            },
        }
    }
}

/// Content ready to draw: selected, sanitized and repaired
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    pub language: Language,
    pub title: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub amenities: Vec<String>,
    pub labels: Labels,
}

impl ResolvedContent {
    pub fn direction(&self) -> Direction {
        self.language.direction()
    }
}

/// Resolve drawable content for one language.
///
/// Localized content wins when it parsed strictly and carries a non-empty
/// description; otherwise the legacy fields apply with the built-in default
/// labels for the requested language.
pub fn resolve(property: &PropertyRecord, language: Language) -> ResolvedContent {
    let localized = property
        .localized(language)
        .filter(|content| !content.description.trim().is_empty());

    let (title, description, highlights, amenities, labels) = match localized {
        Some(content) => {
            log::debug!("using localized content for {:?}", language);
            let defaults = Labels::defaults(language);
            let labels = Labels {
                price: pick(&content.price_label, &defaults.price),
                address: pick(&content.address_label, &defaults.address),
                city: pick(&content.city_label, &defaults.city),
                state: pick(&content.state_label, &defaults.state),
                zip: pick(&content.zip_code_label, &defaults.zip),
                amenities: pick(&content.amenities_label, &defaults.amenities),
                agent: pick(&content.agent_label, &defaults.agent),
                description: pick(&content.property_description_label, &defaults.description),
                highlights: pick(&content.key_highlights_label, &defaults.highlights),
                gallery: pick(&content.property_gallery_label, &defaults.gallery),
            };
            let amenities = if content.amenities.is_empty() {
                property.amenities.clone()
            } else {
                content.amenities.clone()
            };
            (
                pick(&content.title, &property.title),
                content.description.clone(),
                content.highlights.clone(),
                amenities,
                labels,
            )
        }
        None => {
            log::debug!("falling back to legacy content for {:?}", language);
            let legacy = &property.legacy_content;
            let description = match language {
                Language::English => pick(&legacy.english_description, &property.description),
                Language::Arabic => {
                    let fallback = pick(&legacy.english_description, &property.description);
                    pick(&legacy.arabic_description, &fallback)
                }
            };
            (
                property.title.clone(),
                description,
                legacy.key_highlights.clone(),
                property.amenities.clone(),
                Labels::defaults(language),
            )
        }
    };

    let highlights: Vec<String> = highlights
        .iter()
        .map(|h| strip_bullet_prefix(h))
        .filter(|h| !h.is_empty())
        .collect();
    let amenities: Vec<String> = amenities
        .iter()
        .map(|a| strip_bullet_prefix(a))
        .filter(|a| !a.is_empty())
        .collect();

    let mut resolved = ResolvedContent {
        language,
        title,
        description,
        highlights,
        amenities,
        labels,
    };

    if language == Language::Arabic {
        repair_in_place(&mut resolved);
    }

    resolved
}

fn pick(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn repair_in_place(content: &mut ResolvedContent) {
    content.title = repair_mojibake(&content.title);
    content.description = repair_mojibake(&content.description);
    for item in content.highlights.iter_mut().chain(content.amenities.iter_mut()) {
        *item = repair_mojibake(item);
    }
    let labels = &mut content.labels;
    for label in [
        &mut labels.price,
        &mut labels.address,
        &mut labels.city,
        &mut labels.state,
        &mut labels.zip,
        &mut labels.amenities,
        &mut labels.agent,
        &mut labels.description,
        &mut labels.highlights,
        &mut labels.gallery,
    ] {
        *label = repair_mojibake(label);
    }
}
