use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{empty_as_none, iso_millis_opt, none_as_empty};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialLinks {
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub email: String,
}

/// The single About document. `Default` is the empty shape served before the
/// first update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, deserialize_with = "empty_as_none", serialize_with = "none_as_empty")]
    pub profile_image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", serialize_with = "none_as_empty")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "iso_millis_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "iso_millis_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone)]
pub struct AboutInput {
    pub bio: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, MultipartForm)]
pub struct AboutForm {
    pub bio: Option<Text<String>>,
    pub github: Option<Text<String>>,
    pub linkedin: Option<Text<String>>,
    pub twitter: Option<Text<String>>,
    pub email: Option<Text<String>>,
    #[multipart(rename = "profileImage")]
    pub profile_image: Option<TempFile>,
    pub resume: Option<TempFile>,
}

#[derive(Debug)]
pub struct AboutMedia<F> {
    pub profile_image: Option<F>,
    pub resume: Option<F>,
}

impl<F> Default for AboutMedia<F> {
    fn default() -> Self {
        AboutMedia { profile_image: None, resume: None }
    }
}

impl AboutForm {
    pub fn into_parts(self) -> (AboutInput, AboutMedia<TempFile>) {
        let input = AboutInput {
            bio: self.bio.map(Text::into_inner),
            github: self.github.map(Text::into_inner),
            linkedin: self.linkedin.map(Text::into_inner),
            twitter: self.twitter.map(Text::into_inner),
            email: self.email.map(Text::into_inner),
        };
        let media = AboutMedia {
            profile_image: self.profile_image,
            resume: self.resume,
        };
        (input, media)
    }
}
