use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{empty_as_none, iso_millis, lenient_i64, lenient_string};

// ───── Stored Model ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub live_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub order: i64,
    #[serde(default, serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(default, serialize_with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

// ───── Input ────────────────────────────────────────────────────────

/// Raw project fields as submitted; every value is still text.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// JSON-encoded array of strings.
    #[serde(default, deserialize_with = "lenient_string")]
    pub technologies: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub live_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub featured: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order: Option<String>,
}

#[derive(Debug, MultipartForm)]
pub struct ProjectForm {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub technologies: Option<Text<String>>,
    #[multipart(rename = "liveUrl")]
    pub live_url: Option<Text<String>>,
    #[multipart(rename = "githubUrl")]
    pub github_url: Option<Text<String>>,
    pub featured: Option<Text<String>>,
    pub order: Option<Text<String>>,
    pub image: Option<TempFile>,
}

impl ProjectForm {
    pub fn into_parts(self) -> (ProjectInput, Option<TempFile>) {
        let input = ProjectInput {
            title: self.title.map(Text::into_inner),
            description: self.description.map(Text::into_inner),
            technologies: self.technologies.map(Text::into_inner),
            live_url: self.live_url.map(Text::into_inner),
            github_url: self.github_url.map(Text::into_inner),
            featured: self.featured.map(Text::into_inner),
            order: self.order.map(Text::into_inner),
        };
        (input, self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_document_with_empty_links_reads_as_absent() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "title": "Site",
            "description": "desc",
            "technologies": ["rust"],
            "imageUrl": "",
            "liveUrl": "",
            "githubUrl": "https://github.com/x/y",
            "featured": true,
            "order": 2,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(project.image_url, None);
        assert_eq!(project.live_url, None);
        assert_eq!(project.github_url.as_deref(), Some("https://github.com/x/y"));
        assert_eq!(project.order, 2);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let project: Project = serde_json::from_value(serde_json::json!({"title": "T"})).unwrap();
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["technologies"], serde_json::json!([]));
    }

    #[test]
    fn json_input_accepts_arrays_and_numbers() {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "title": "T",
            "technologies": ["rust", "actix"],
            "order": 4,
            "featured": true
        }))
        .unwrap();

        assert_eq!(input.technologies.as_deref(), Some(r#"["rust","actix"]"#));
        assert_eq!(input.order.as_deref(), Some("4"));
        assert_eq!(input.featured.as_deref(), Some("true"));
    }
}
