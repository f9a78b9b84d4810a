//! Resolved metadata record handed to the head renderer.
//!
//! Every field is either `None` or a fully normalized value. Serialized in
//! camelCase with explicit nulls so the renderer always sees a fixed shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::JsonMap;

/// Viewport used when no segment declares one.
pub const DEFAULT_VIEWPORT: &str = "width=device-width, initial-scale=1";

/// Resolved title: the final text plus the template it carries forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteTitle {
    pub absolute: String,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Image attached to Open Graph or Twitter cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDescriptor {
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIcons {
    pub icon: Vec<IconDescriptor>,
    pub apple: Vec<IconDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<Vec<IconDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Vec<IconDescriptor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOpenGraph {
    pub title: AbsoluteTitle,
    #[serde(rename = "type")]
    pub og_type: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub site_name: Option<String>,
    pub locale: Option<String>,
    pub images: Option<Vec<ResolvedImage>>,
    /// Type-specific arrays and remaining scalar properties.
    #[serde(flatten)]
    pub properties: JsonMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTwitter {
    pub title: AbsoluteTitle,
    pub card: String,
    pub site: Option<String>,
    pub site_id: Option<String>,
    pub creator: Option<String>,
    pub creator_id: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<ResolvedImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<serde_json::Value>,
    /// Whether `card` was declared rather than inferred from `images`.
    #[serde(skip)]
    pub card_declared: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRobots {
    pub basic: Option<String>,
    pub google_bot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

pub type AlternateLinks = BTreeMap<String, Vec<AlternateLink>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAlternates {
    pub canonical: Option<AlternateLink>,
    pub languages: Option<AlternateLinks>,
    pub media: Option<AlternateLinks>,
    pub types: Option<AlternateLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVerification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yahoo: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yandex: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub me: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAppleWebApp {
    pub capable: bool,
    pub title: Option<String>,
    pub startup_image: Option<Vec<StartupImage>>,
    pub status_bar_style: Option<String>,
}

/// Platform (`ios`, `android`, `web`, ...) to its app link entries.
pub type ResolvedAppLinks = BTreeMap<String, Vec<serde_json::Value>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColorDescriptor {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesApp {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_argument: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatDetection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<bool>,
}

/// Merged, normalized metadata of a whole route.
///
/// The accumulator of the fold and the value observed by generators
/// through their parent promise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetadata {
    pub metadata_base: Option<Url>,
    pub title: Option<AbsoluteTitle>,
    pub description: Option<String>,
    pub application_name: Option<String>,
    pub authors: Option<Vec<Author>>,
    pub generator: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub referrer: Option<String>,
    pub theme_color: Option<Vec<ThemeColorDescriptor>>,
    pub color_scheme: Option<String>,
    pub viewport: Option<String>,
    pub creator: Option<String>,
    pub publisher: Option<String>,
    pub robots: Option<ResolvedRobots>,
    pub alternates: Option<ResolvedAlternates>,
    pub icons: Option<ResolvedIcons>,
    pub open_graph: Option<ResolvedOpenGraph>,
    pub twitter: Option<ResolvedTwitter>,
    pub verification: Option<ResolvedVerification>,
    pub apple_web_app: Option<ResolvedAppleWebApp>,
    pub format_detection: Option<FormatDetection>,
    pub itunes: Option<ItunesApp>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub app_links: Option<ResolvedAppLinks>,
    pub archives: Option<Vec<String>>,
    pub assets: Option<Vec<String>>,
    pub bookmarks: Option<Vec<String>>,
    pub category: Option<String>,
    pub classification: Option<String>,
    pub manifest: Option<String>,
    pub other: JsonMap,
}

impl Default for ResolvedMetadata {
    /// Initial accumulator of the fold.
    fn default() -> Self {
        Self {
            metadata_base: None,
            title: None,
            description: None,
            application_name: None,
            authors: None,
            generator: None,
            keywords: None,
            referrer: None,
            theme_color: None,
            color_scheme: None,
            viewport: Some(DEFAULT_VIEWPORT.to_owned()),
            creator: None,
            publisher: None,
            robots: None,
            alternates: Some(ResolvedAlternates::default()),
            icons: None,
            open_graph: None,
            twitter: None,
            verification: Some(ResolvedVerification::default()),
            apple_web_app: None,
            format_detection: None,
            itunes: None,
            abstract_text: None,
            app_links: None,
            archives: None,
            assets: None,
            bookmarks: None,
            category: None,
            classification: None,
            manifest: None,
            other: JsonMap::new(),
        }
    }
}

impl ResolvedMetadata {
    /// Clear fields that never inherit from an ancestor level.
    ///
    /// Called once per declared metadata object before its fields are
    /// applied: a level that omits one of these fields resets it.
    pub(crate) fn reset_passthrough(&mut self) {
        self.application_name = None;
        self.description = None;
        self.generator = None;
        self.creator = None;
        self.publisher = None;
        self.category = None;
        self.classification = None;
        self.referrer = None;
        self.color_scheme = None;
        self.abstract_text = None;
        self.itunes = None;
        self.format_detection = None;
        self.manifest = None;
    }

    /// Slot of a plain string field, by declaration key.
    pub(crate) fn scalar_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "applicationName" => &mut self.application_name,
            "description" => &mut self.description,
            "generator" => &mut self.generator,
            "creator" => &mut self.creator,
            "publisher" => &mut self.publisher,
            "category" => &mut self.category,
            "classification" => &mut self.classification,
            "referrer" => &mut self.referrer,
            "colorScheme" => &mut self.color_scheme,
            "abstract" => &mut self.abstract_text,
            _ => return None,
        };
        Some(slot)
    }

    /// Resolved page title, if any.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(|t| t.absolute.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata() {
        let metadata = ResolvedMetadata::default();
        assert!(metadata.title.is_none());
        assert!(metadata.description.is_none());
        assert!(metadata.icons.is_none());
        assert!(metadata.other.is_empty());
        assert_eq!(metadata.viewport.as_deref(), Some(DEFAULT_VIEWPORT));
        assert_eq!(metadata.alternates, Some(ResolvedAlternates::default()));
        assert_eq!(metadata.verification, Some(ResolvedVerification::default()));
    }

    #[test]
    fn test_default_serializes_fixed_shape() {
        let json = serde_json::to_value(ResolvedMetadata::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj["title"].is_null());
        assert!(obj["metadataBase"].is_null());
        assert!(obj["abstract"].is_null());
        assert_eq!(obj["alternates"]["canonical"], serde_json::Value::Null);
        assert!(obj["other"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_reset_passthrough_keeps_structured_fields() {
        let mut metadata = ResolvedMetadata {
            description: Some("root".into()),
            manifest: Some("/manifest.json".into()),
            title: Some(AbsoluteTitle {
                absolute: "Site".into(),
                template: None,
            }),
            ..Default::default()
        };
        metadata.reset_passthrough();
        assert!(metadata.description.is_none());
        assert!(metadata.manifest.is_none());
        assert_eq!(metadata.title_text(), Some("Site"));
    }

    #[test]
    fn test_scalar_mut_unknown_key() {
        let mut metadata = ResolvedMetadata::default();
        assert!(metadata.scalar_mut("title").is_none());
        *metadata.scalar_mut("colorScheme").unwrap() = Some("dark".into());
        assert_eq!(metadata.color_scheme.as_deref(), Some("dark"));
    }
}
