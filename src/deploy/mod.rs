// ABOUTME: Deployment pipeline using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, progress reporting and the use case.

mod deployment;
mod pipeline;
mod progress;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use pipeline::CreateContainerImage;
pub use progress::{Progress, TOTAL_STEPS};
pub use state::{
    ImageCopied, Initialized, Inspected, Published, Started, Stopped, TemplatePulled,
    TemplateTidied,
};
