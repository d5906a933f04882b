// ABOUTME: Capability traits for the lifecycle gateway and the image registry.
// ABOUTME: One HTTP adapter per trait plus an in-memory fake implementing both.

mod containers;
mod images;
pub mod memory;
pub mod wire;

pub use containers::ContainersHttpRepository;
pub use images::ImagesHttpRepository;
pub use memory::{Call, InMemoryRepository, Operation};

use serde::Serialize;

use crate::deferred::Deferred;
use crate::types::{Container, ContainerDefinitionValid, Image, Project};

/// An instance that the gateway reports as started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedInstance {
    pub url: String,
}

/// Instance lifecycle operations on the gateway.
pub trait ContainersRepository: Send + Sync {
    /// Every instance the gateway knows about.
    fn get_all(&self) -> Deferred<Vec<Container>>;

    /// Start an already published image, keeping other containers.
    fn start(&self, image: &Image) -> Deferred<()>;

    /// Start the local image of a definition. Existing definitions keep the
    /// instance's current containers.
    fn start_initial(&self, definition: &ContainerDefinitionValid) -> Deferred<StartedInstance>;

    fn stop(&self, image: &Image) -> Deferred<()>;

    fn commit(&self, container: &Container) -> Deferred<()>;

    /// Navigable URL for downloading the instance logs.
    fn logs_url(&self, container: &Container, limit: Option<u64>) -> Deferred<String>;

    /// Navigable URL for downloading the instance database dump.
    fn database_url(&self, container: &Container) -> Deferred<String>;
}

/// Image operations on the registry, performed through the gateway.
pub trait ImagesRepository: Send + Sync {
    fn get_projects(&self) -> Deferred<Vec<Project>>;

    /// Data images published in a project.
    fn get_for_project(&self, project: &str) -> Deferred<Vec<Image>>;

    fn pull(&self, image: &Image) -> Deferred<()>;

    fn push(&self, image: &Image) -> Deferred<()>;

    fn delete(&self, images: &[Image]) -> Deferred<()>;

    /// Copy the definition's template image to its local image.
    fn create(&self, definition: &ContainerDefinitionValid) -> Deferred<()>;
}

/// `path` under the gateway base URL.
pub(crate) fn endpoint(api_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
