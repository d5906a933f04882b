// ABOUTME: Container definitions: drafts describing an instance to build or restart.
// ABOUTME: validate() is the single gate that turns a draft into a ContainerDefinitionValid.

use thiserror::Error;

use super::container::Container;
use super::container_name::{ContainerName, ContainerNameError};
use super::image::Image;
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("an image must be selected")]
    MissingImage,

    #[error(transparent)]
    InvalidName(#[from] ContainerNameError),

    #[error("{field} should be greater than 0")]
    PortTooSmall { field: &'static str },

    #[error("{field} should be smaller than 65535")]
    PortTooLarge { field: &'static str },
}

/// A draft instance, as entered by the user or derived from a container.
///
/// `existing = true` restarts an already published local image; `false`
/// derives a new local image named `name` from the template `image`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub project_name: String,
    pub image: Option<Image>,
    pub port: String,
    pub name: String,
    pub existing: bool,
    pub url: Option<String>,
    pub db_port: Option<String>,
    pub deploy_path: Option<String>,
    pub java_opt: Option<String>,
}

impl ContainerDefinition {
    /// Reverse-derive a restart definition from a listed container.
    pub fn from_container(config: &Config, container: &Container) -> Self {
        Self {
            project_name: container.image.project.clone(),
            image: Some(container.image.clone()),
            port: config.default_port.to_string(),
            name: container.image.name.clone(),
            existing: true,
            url: container.dhis2_url.clone(),
            ..Self::default()
        }
    }
}

/// A definition that passed [`validate`]: the image is present and the name
/// is a valid [`ContainerName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinitionValid {
    definition: ContainerDefinition,
    image: Image,
    name: ContainerName,
}

impl ContainerDefinitionValid {
    pub fn definition(&self) -> &ContainerDefinition {
        &self.definition
    }

    pub fn name(&self) -> &ContainerName {
        &self.name
    }

    pub fn existing(&self) -> bool {
        self.definition.existing
    }

    /// The template image the local image is derived from.
    pub fn template_image(&self) -> &Image {
        &self.image
    }

    /// The template image renamed to the user-chosen name.
    pub fn local_image(&self) -> Image {
        self.image.with_name(self.name.as_str())
    }

    /// Requested host port, if one was given as a number.
    pub fn port(&self) -> Option<u16> {
        self.definition.port.trim().parse().ok()
    }

    pub fn db_port(&self) -> Option<u16> {
        self.definition
            .db_port
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
    }
}

/// Validate a draft before any remote call is made.
pub fn validate(definition: ContainerDefinition) -> Result<ContainerDefinitionValid, ValidationError> {
    let image = definition
        .image
        .clone()
        .ok_or(ValidationError::MissingImage)?;
    let name = ContainerName::new(&definition.name)?;

    check_port("port", &definition.port)?;
    if let Some(db_port) = &definition.db_port {
        check_port("db port", db_port)?;
    }

    Ok(ContainerDefinitionValid {
        definition,
        image,
        name,
    })
}

// Non-numeric values pass; only numbers outside 1..65535 are rejected.
fn check_port(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let Ok(port) = value.trim().parse::<f64>() else {
        return Ok(());
    };
    if port <= 0.0 {
        Err(ValidationError::PortTooSmall { field })
    } else if port >= 65535.0 {
        Err(ValidationError::PortTooLarge { field })
    } else {
        Ok(())
    }
}
