// ABOUTME: Generic pipeline struct parameterized by state marker.
// ABOUTME: Holds the validated definition plus the template and local images derived from it.

use crate::error::Error;
use crate::repositories::StartedInstance;
use crate::types::{ContainerDefinitionValid, Image};

use super::progress::Progress;
use super::state::{Initialized, Started};

/// A deployment in progress, parameterized by its current state.
///
/// Each transition consumes the deployment and yields the next state once
/// its remote step succeeds, so steps can only run in pipeline order.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) definition: ContainerDefinitionValid,
    pub(crate) template: Image,
    pub(crate) local: Image,
    pub(crate) progress: Progress,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Start a deployment of `definition`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SameTemplateAndLocal` when a new local image would
    /// share its identifier with the template image.
    pub fn new(definition: ContainerDefinitionValid, progress: Progress) -> Result<Self, Error> {
        let template = definition.template_image().clone();
        let local = definition.local_image();

        if !definition.existing() && local.id() == template.id() {
            return Err(Error::SameTemplateAndLocal);
        }

        Ok(Deployment {
            definition,
            template,
            local,
            progress,
            state: Initialized,
        })
    }
}

impl<S> Deployment<S> {
    pub fn definition(&self) -> &ContainerDefinitionValid {
        &self.definition
    }

    pub fn template_image(&self) -> &Image {
        &self.template
    }

    pub fn local_image(&self) -> &Image {
        &self.local
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl Deployment<Started> {
    /// Report completion and hand back the started instance.
    pub fn finish(self) -> StartedInstance {
        self.progress.done();
        self.state.instance
    }
}
