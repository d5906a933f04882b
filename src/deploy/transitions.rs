// ABOUTME: State transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self and returns a Deferred of the next state.

use tracing::{debug, info};

use crate::deferred::Deferred;
use crate::repositories::{ContainersRepository, ImagesRepository};
use crate::types::Image;

use super::Deployment;
use super::progress::TOTAL_STEPS;
use super::state::{
    ImageCopied, Initialized, Inspected, Published, Started, Stopped, TemplatePulled,
    TemplateTidied,
};

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S: Send + 'static> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            definition: self.definition,
            template: self.template,
            local: self.local,
            progress: self.progress,
            state,
        }
    }

    /// Run `action` as pipeline step `step`, reporting progress when it starts.
    fn step<T, U, F>(
        self,
        step: u32,
        label: &'static str,
        image: Image,
        action: Deferred<U>,
        next: F,
    ) -> Deferred<Deployment<T>>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnOnce(U) -> T + Send + 'static,
    {
        Deferred::empty()
            .flat_map(move |()| {
                info!(step, image = %image, "{label}");
                self.progress.step(step, label, &image);
                action.map(move |value| self.transition(next(value)))
            })
    }
}

// =============================================================================
// Initialized -> Started (existing local image)
// =============================================================================

impl Deployment<Initialized> {
    /// Restart an already published local image, keeping its containers.
    #[must_use = "deployment state must be used"]
    pub fn start_existing(self, containers: &dyn ContainersRepository) -> Deferred<Deployment<Started>> {
        let action = containers.start_initial(&self.definition);
        let image = self.local.clone();
        self.step(1, "Start image", image, action, |instance| Started { instance })
    }

    /// List instances to learn whether the template image is already present.
    #[must_use = "deployment state must be used"]
    pub fn inspect(self, containers: &dyn ContainersRepository) -> Deferred<Deployment<Inspected>> {
        containers.get_all().map(move |listed| {
            let template_present = listed.iter().any(|c| c.image == self.template);
            debug!(template = %self.template, template_present, "inspected instances");
            self.transition(Inspected { template_present })
        })
    }
}

// =============================================================================
// Inspected -> TemplatePulled -> ImageCopied
// =============================================================================

impl Deployment<Inspected> {
    #[must_use = "deployment state must be used"]
    pub fn pull_template(self, images: &dyn ImagesRepository) -> Deferred<Deployment<TemplatePulled>> {
        let template_present = self.state.template_present;
        let action = images.pull(&self.template);
        let image = self.template.clone();
        self.step(1, "Pull remote image", image, action, move |()| TemplatePulled {
            template_present,
        })
    }
}

impl Deployment<TemplatePulled> {
    #[must_use = "deployment state must be used"]
    pub fn copy_image(self, images: &dyn ImagesRepository) -> Deferred<Deployment<ImageCopied>> {
        let template_present = self.state.template_present;
        let action = images.create(&self.definition);
        let image = self.local.clone();
        self.step(2, "Copy image", image, action, move |()| ImageCopied {
            template_present,
        })
    }
}

// =============================================================================
// ImageCopied -> TemplateTidied
// =============================================================================

impl Deployment<ImageCopied> {
    /// Delete the template image unless it was present before this run.
    #[must_use = "deployment state must be used"]
    pub fn tidy_template(self, images: &dyn ImagesRepository) -> Deferred<Deployment<TemplateTidied>> {
        if self.state.template_present {
            debug!(template = %self.template, "template was already present, keeping it");
            return Deferred::success(self.transition(TemplateTidied));
        }

        // Reported under the local image, like every step after the copy.
        let action = images.delete(std::slice::from_ref(&self.template));
        let image = self.local.clone();
        self.step(3, "Delete template image", image, action, |()| TemplateTidied)
    }
}

// =============================================================================
// TemplateTidied -> Published -> Stopped -> Started
// =============================================================================

impl Deployment<TemplateTidied> {
    #[must_use = "deployment state must be used"]
    pub fn publish(self, images: &dyn ImagesRepository) -> Deferred<Deployment<Published>> {
        let action = images.push(&self.local);
        let image = self.local.clone();
        self.step(4, "Push new image", image, action, |()| Published)
    }
}

impl Deployment<Published> {
    /// Stop any running instance of the local image.
    #[must_use = "deployment state must be used"]
    pub fn stop_previous(self, containers: &dyn ContainersRepository) -> Deferred<Deployment<Stopped>> {
        let action = containers.stop(&self.local);
        let image = self.local.clone();
        self.step(5, "Stop image", image, action, |()| Stopped)
    }
}

impl Deployment<Stopped> {
    #[must_use = "deployment state must be used"]
    pub fn start(self, containers: &dyn ContainersRepository) -> Deferred<Deployment<Started>> {
        let action = containers.start_initial(&self.definition);
        let image = self.local.clone();
        self.step(TOTAL_STEPS, "Start image", image, action, |instance| Started {
            instance,
        })
    }
}
