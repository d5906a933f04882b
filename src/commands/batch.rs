// ABOUTME: Batch commands applying one operation to several instances at once.
// ABOUTME: Ids are resolved against the instance list before anything is dispatched.

use d2ship::error::Result;
use d2ship::output::Output;
use d2ship::types::Image;
use d2ship::usecases::App;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Start,
    Stop,
    Commit,
    Push,
    Pull,
    Rm,
}

impl BatchAction {
    fn past_tense(self) -> &'static str {
        match self {
            BatchAction::Start => "Started",
            BatchAction::Stop => "Stopped",
            BatchAction::Commit => "Committed",
            BatchAction::Push => "Pushed",
            BatchAction::Pull => "Pulled",
            BatchAction::Rm => "Removed",
        }
    }
}

pub async fn batch(app: &App, action: BatchAction, ids: Vec<String>, mut output: Output) -> Result<()> {
    output.start_timer();
    let containers = app.containers.find(ids).await?;
    let images: Vec<Image> = containers.iter().map(|c| c.image.clone()).collect();
    info!(?action, count = containers.len(), "dispatching batch");

    let pending = match action {
        BatchAction::Start => app.containers.start(&images),
        BatchAction::Stop => app.containers.stop(&images),
        BatchAction::Commit => app.containers.commit(&containers),
        BatchAction::Push => app.images.push(&images),
        BatchAction::Pull => app.images.pull(&images),
        BatchAction::Rm => app.images.delete(&images),
    };
    pending.await?;

    output.success(&format!("{} {} instance(s)", action.past_tense(), containers.len()));
    Ok(())
}
