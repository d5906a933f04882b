// ABOUTME: Progress reporting for the deployment pipeline.
// ABOUTME: Steps report "<label>: <image name>" at step / (TOTAL_STEPS + 1) percent.

use std::fmt;
use std::sync::Arc;

use crate::types::Image;

/// Number of reported steps on the build path.
pub const TOTAL_STEPS: u32 = 6;

type Callback = Arc<dyn Fn(&str, f64) + Send + Sync>;

/// Receives `(message, percent)` before each pipeline step.
#[derive(Clone)]
pub struct Progress {
    callback: Callback,
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::silent()
    }
}

impl Progress {
    pub fn new(callback: impl Fn(&str, f64) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn silent() -> Self {
        Self::new(|_, _| {})
    }

    pub(crate) fn step(&self, step: u32, label: &str, image: &Image) {
        let percent = f64::from(step) / f64::from(TOTAL_STEPS + 1) * 100.0;
        (self.callback)(&format!("{label}: {}", image.name), percent);
    }

    pub(crate) fn done(&self) {
        (self.callback)("Done", 100.0);
    }
}
