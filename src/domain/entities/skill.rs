use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{empty_as_none, iso_millis, lenient_i64, lenient_string};

/// Canonical skill schema: numeric proficiency percentage with optional icon
/// and certificate media.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub proficiency: i64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub certificate_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub order: i64,
    #[serde(default, serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(default, serialize_with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SkillInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub proficiency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order: Option<String>,
}

#[derive(Debug, MultipartForm)]
pub struct SkillForm {
    pub name: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub proficiency: Option<Text<String>>,
    pub order: Option<Text<String>>,
    pub icon: Option<TempFile>,
    pub certificate: Option<TempFile>,
}

/// Files attached to a skill submission.
#[derive(Debug)]
pub struct SkillMedia<F> {
    pub icon: Option<F>,
    pub certificate: Option<F>,
}

impl<F> Default for SkillMedia<F> {
    fn default() -> Self {
        SkillMedia { icon: None, certificate: None }
    }
}

impl SkillForm {
    pub fn into_parts(self) -> (SkillInput, SkillMedia<TempFile>) {
        let input = SkillInput {
            name: self.name.map(Text::into_inner),
            category: self.category.map(Text::into_inner),
            proficiency: self.proficiency.map(Text::into_inner),
            order: self.order.map(Text::into_inner),
        };
        let media = SkillMedia {
            icon: self.icon,
            certificate: self.certificate,
        };
        (input, media)
    }
}

/// Proficiency is a percentage.
pub fn clamp_proficiency(value: i64) -> i64 {
    value.clamp(0, 100)
}
