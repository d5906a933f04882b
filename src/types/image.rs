// ABOUTME: DHIS2 data image value type and its registry reference format.
// ABOUTME: Composes and parses references like registry/project/dhis2-data:2.36-name.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::ImageId;

/// Repository holding every DHIS2 data image inside a registry project.
pub const DATA_REPOSITORY: &str = "dhis2-data";

/// An immutable DHIS2 data image.
///
/// The identifier is derived from `project`, `dhis2_version` and `name`; two
/// images with the same fields are the same image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    pub registry_url: String,
    pub project: String,
    pub dhis2_version: String,
    pub name: String,
}

impl Image {
    pub fn new(
        registry_url: impl Into<String>,
        project: impl Into<String>,
        dhis2_version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            registry_url: registry_url.into(),
            project: project.into(),
            dhis2_version: dhis2_version.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> ImageId {
        ImageId::new(format!(
            "{}.{}.{}",
            self.project, self.dhis2_version, self.name
        ))
    }

    /// Same registry, project and version with another name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// The full reference understood by the gateway and the registry.
    pub fn docker_ref(&self) -> String {
        let tagged = format!("{}:{}-{}", DATA_REPOSITORY, self.dhis2_version, self.name);
        [self.registry_url.as_str(), self.project.as_str(), tagged.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.docker_ref())
    }
}

/// Split a data image tag (`2.36-template`) into version and name.
///
/// The version ends at the first hyphen; the name keeps any later hyphens.
pub fn image_info_from_tag(tag: &str) -> Option<(String, String)> {
    let (version, name) = tag.split_once('-')?;
    if version.is_empty() || name.is_empty() {
        return None;
    }
    Some((version.to_string(), name.to_string()))
}

/// Parse a raw container name of the form
/// `<registry>/<project>/dhis2-data:<version>-<name>`.
///
/// Returns `None` for anything else; callers filter such containers out.
pub fn parse_image_name(raw: &str) -> Option<Image> {
    let parts: Vec<&str> = raw.split('/').collect();
    let [registry_url, project, repository] = parts.as_slice() else {
        return None;
    };

    let (repository_name, tag) = repository.split_once(':')?;
    if repository_name != DATA_REPOSITORY || project.is_empty() {
        return None;
    }

    let (dhis2_version, name) = image_info_from_tag(tag)?;
    Some(Image::new(*registry_url, *project, dhis2_version, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_joins_project_version_and_name() {
        let image = Image::new("r.example.com", "acme", "2.36", "template");
        assert_eq!(image.id().as_str(), "acme.2.36.template");
    }

    #[test]
    fn docker_ref_omits_empty_registry() {
        let image = Image::new("", "acme", "2.36", "template");
        assert_eq!(image.docker_ref(), "acme/dhis2-data:2.36-template");
    }

    #[test]
    fn tag_splits_on_first_hyphen_only() {
        assert_eq!(
            image_info_from_tag("2.36-sierra-leone"),
            Some(("2.36".to_string(), "sierra-leone".to_string()))
        );
        assert_eq!(image_info_from_tag("2.36"), None);
        assert_eq!(image_info_from_tag("-name"), None);
        assert_eq!(image_info_from_tag("2.36-"), None);
    }

    #[test]
    fn parse_rejects_other_repositories() {
        assert!(parse_image_name("r.example.com/acme/postgis:2.36-x").is_none());
    }
}
