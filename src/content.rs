//! Content types, target languages, and the fields each content type asks for.
//!
//! A template is identified by a `(ContentType, Language)` pair. The field
//! specs here are the caller-facing surface: the CLI collects these values and
//! hands them to the assembler unchanged (after filling declared defaults).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the placeholder that receives retrieved context.
pub const CONTEXT_FIELD: &str = "context";

/// Kind of content to generate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Long-form blog post.
    BlogPost,
    /// Short post for a social platform.
    SocialMedia,
    /// E-commerce product copy.
    ProductDescription,
    /// Marketing email.
    EmailCampaign,
    /// Keyword-targeted SEO article.
    SeoContent,
}

/// A user-supplied field a content type needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Placeholder name in the template body.
    pub name: &'static str,
    /// Short human-readable description.
    pub label: &'static str,
    /// Value the caller surface fills in when the user leaves the field out.
    pub default: Option<&'static str>,
}

const BLOG_POST_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "topic",
    label: "Blog topic",
    default: None,
}];

const SOCIAL_MEDIA_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "topic",
        label: "Post topic",
        default: None,
    },
    FieldSpec {
        name: "platform",
        label: "Target platform",
        default: Some("LinkedIn"),
    },
];

const PRODUCT_DESCRIPTION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "product_name",
        label: "Product name",
        default: None,
    },
    FieldSpec {
        name: "features",
        label: "Key features",
        default: None,
    },
];

const EMAIL_CAMPAIGN_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "topic",
    label: "Campaign topic",
    default: None,
}];

const SEO_CONTENT_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "keyword",
    label: "Target keyword",
    default: None,
}];

impl ContentType {
    /// Every supported content type, in display order.
    pub const ALL: [ContentType; 5] = [
        ContentType::BlogPost,
        ContentType::SocialMedia,
        ContentType::ProductDescription,
        ContentType::EmailCampaign,
        ContentType::SeoContent,
    ];

    /// Fields the user supplies for this content type.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            ContentType::BlogPost => BLOG_POST_FIELDS,
            ContentType::SocialMedia => SOCIAL_MEDIA_FIELDS,
            ContentType::ProductDescription => PRODUCT_DESCRIPTION_FIELDS,
            ContentType::EmailCampaign => EMAIL_CAMPAIGN_FIELDS,
            ContentType::SeoContent => SEO_CONTENT_FIELDS,
        }
    }

    /// Field whose value is used as the retrieval query.
    ///
    /// `None` means this content type never retrieves context.
    pub fn query_field(self) -> Option<&'static str> {
        match self {
            ContentType::BlogPost | ContentType::SocialMedia | ContentType::EmailCampaign => {
                Some("topic")
            }
            ContentType::SeoContent => Some("keyword"),
            ContentType::ProductDescription => None,
        }
    }

    /// Whether templates for this content type take a `{context}` placeholder.
    pub fn uses_context(self) -> bool {
        self.query_field().is_some()
    }

    /// Placeholders every template of this content type must declare, in order.
    pub fn placeholder_names(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.fields().iter().map(|f| f.name).collect();
        if self.uses_context() {
            names.push(CONTEXT_FIELD);
        }
        names
    }

    /// Stable snake_case identifier (matches the config file keys).
    pub fn key(self) -> &'static str {
        match self {
            ContentType::BlogPost => "blog_post",
            ContentType::SocialMedia => "social_media",
            ContentType::ProductDescription => "product_description",
            ContentType::EmailCampaign => "email_campaign",
            ContentType::SeoContent => "seo_content",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentType::BlogPost => "Blog Post",
            ContentType::SocialMedia => "Social Media",
            ContentType::ProductDescription => "Product Description",
            ContentType::EmailCampaign => "Email Campaign",
            ContentType::SeoContent => "SEO Content",
        };
        f.write_str(label)
    }
}

/// Target natural language for the generated content.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Default language.
    #[default]
    English,
    /// Tamil.
    Tamil,
}

impl Language {
    /// Every supported language; the first entry is the default.
    pub const ALL: [Language; 2] = [Language::English, Language::Tamil];

    /// Stable snake_case identifier (matches the config file keys).
    pub fn key(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Tamil => "tamil",
        }
    }

    /// Whether this is the default language.
    pub fn is_default(self) -> bool {
        self == Language::default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("English"),
            Language::Tamil => f.write_str("Tamil"),
        }
    }
}
