// ABOUTME: Domain model: images, containers, container definitions, registry catalog entries.
// ABOUTME: Pure value types and the functions that derive, parse and validate them.

mod container;
mod container_name;
mod definition;
mod id;
mod image;
mod project;

pub use container::{ApiContainer, Container, ContainerStatus};
pub use container_name::{ContainerName, ContainerNameError};
pub use definition::{ContainerDefinition, ContainerDefinitionValid, ValidationError, validate};
pub use id::{ContainerId, ImageId};
pub use image::{DATA_REPOSITORY, Image, image_info_from_tag, parse_image_name};
pub use project::{Artifact, ImageArtifact, Project, ProjectMetadata, Tag};
