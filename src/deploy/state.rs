// ABOUTME: Pipeline state marker types for the type state pattern.
// ABOUTME: States after inspection carry whether the template image was already present.

use crate::repositories::StartedInstance;

/// Initial state: definition validated, nothing sent to the gateway.
/// Available actions: `inspect()`, `start_existing()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Instances listed.
/// Available actions: `pull_template()`
#[derive(Debug, Clone, Copy)]
pub struct Inspected {
    pub(crate) template_present: bool,
}

/// Template image pulled from the registry.
/// Available actions: `copy_image()`
#[derive(Debug, Clone, Copy)]
pub struct TemplatePulled {
    pub(crate) template_present: bool,
}

/// Local image copied from the template.
/// Available actions: `tidy_template()`
#[derive(Debug, Clone, Copy)]
pub struct ImageCopied {
    pub(crate) template_present: bool,
}

/// Template image removed, or kept because it was there before.
/// Available actions: `publish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTidied;

/// Local image pushed to the registry.
/// Available actions: `stop_previous()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Published;

/// Any running instance of the local image stopped.
/// Available actions: `start()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopped;

/// Local image running.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) instance: StartedInstance,
}

impl Inspected {
    pub fn template_present(&self) -> bool {
        self.template_present
    }
}

impl Started {
    pub fn instance(&self) -> &StartedInstance {
        &self.instance
    }
}
