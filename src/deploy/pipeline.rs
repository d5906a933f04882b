// ABOUTME: The create-container-image use case: drives a Deployment through every state.
// ABOUTME: Any failing step aborts the rest and propagates its error unchanged.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::repositories::{ContainersRepository, ImagesRepository, StartedInstance};
use crate::types::ContainerDefinitionValid;

use super::Deployment;
use super::progress::Progress;

/// Builds (or restarts) a local instance from a validated definition.
///
/// Completed steps are not compensated when a later step fails; the caller
/// restarts the whole pipeline.
#[derive(Clone)]
pub struct CreateContainerImage {
    images: Arc<dyn ImagesRepository>,
    containers: Arc<dyn ContainersRepository>,
}

impl std::fmt::Debug for CreateContainerImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateContainerImage").finish_non_exhaustive()
    }
}

impl CreateContainerImage {
    pub fn new(
        images: Arc<dyn ImagesRepository>,
        containers: Arc<dyn ContainersRepository>,
    ) -> Self {
        Self { images, containers }
    }

    pub fn execute(
        &self,
        definition: ContainerDefinitionValid,
        progress: Progress,
    ) -> Deferred<StartedInstance> {
        let deployment = match Deployment::new(definition, progress) {
            Ok(deployment) => deployment,
            Err(err) => return Deferred::error(err),
        };

        if deployment.definition().existing() {
            return deployment
                .start_existing(self.containers.as_ref())
                .map(|d| d.finish());
        }

        let images = Arc::clone(&self.images);
        let containers = Arc::clone(&self.containers);

        deployment
            .inspect(self.containers.as_ref())
            .flat_map({
                let images = Arc::clone(&images);
                move |d| d.pull_template(images.as_ref())
            })
            .flat_map({
                let images = Arc::clone(&images);
                move |d| d.copy_image(images.as_ref())
            })
            .flat_map({
                let images = Arc::clone(&images);
                move |d| d.tidy_template(images.as_ref())
            })
            .flat_map(move |d| d.publish(images.as_ref()))
            .flat_map({
                let containers = Arc::clone(&containers);
                move |d| d.stop_previous(containers.as_ref())
            })
            .flat_map(move |d| d.start(containers.as_ref()))
            .map(|d| d.finish())
    }
}
