// ABOUTME: Registry catalog types: projects, artifacts and their tags.
// ABOUTME: Artifacts are tagged on `type`; only IMAGE artifacts carry usable tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registry namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub project_id: u64,
    #[serde(default)]
    pub repo_count: u64,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub public: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub push_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub push_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Artifact {
    #[serde(rename = "IMAGE")]
    Image(ImageArtifact),
    #[serde(other)]
    Unknown,
}

impl Artifact {
    /// Tag names carried by the artifact; empty for non-image artifacts.
    pub fn tag_names(&self) -> Vec<&str> {
        match self {
            Artifact::Image(image) => image
                .tags
                .iter()
                .flatten()
                .map(|tag| tag.name.as_str())
                .collect(),
            Artifact::Unknown => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_artifact_types_have_no_tags() {
        let json = r#"[
            {"type": "IMAGE", "id": 3, "digest": "sha256:aa", "tags": [{"name": "2.36-template"}]},
            {"type": "IMAGE", "id": 4, "tags": null},
            {"type": "CHART", "id": 5}
        ]"#;
        let artifacts: Vec<Artifact> = serde_json::from_str(json).unwrap();

        assert_eq!(artifacts[0].tag_names(), vec!["2.36-template"]);
        assert!(artifacts[1].tag_names().is_empty());
        assert_eq!(artifacts[2], Artifact::Unknown);
    }

    #[test]
    fn project_timestamps_parse_as_rfc3339() {
        let json = r#"{
            "name": "acme",
            "project_id": 12,
            "repo_count": 1,
            "owner_name": "admin",
            "creation_time": "2021-05-10T10:00:00.000Z",
            "metadata": {"public": "true"}
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.name, "acme");
        assert!(project.creation_time.is_some());
        assert_eq!(project.metadata.public.as_deref(), Some("true"));
    }
}
