// ABOUTME: Download link commands for instance logs and database dumps.
// ABOUTME: URLs are printed for the user to open; nothing is downloaded here.

use d2ship::error::{Error, Result};
use d2ship::output::Output;
use d2ship::types::Container;
use d2ship::usecases::App;

pub async fn logs(app: &App, id: String, limit: Option<u64>, output: &Output) -> Result<()> {
    let container = single(app, id).await?;
    let url = match limit {
        Some(limit) => app.containers.logs_url_with_limit(&container, limit),
        None => app.containers.logs_url(&container),
    }
    .await?;
    output.success(&url);
    Ok(())
}

pub async fn database(app: &App, id: String, output: &Output) -> Result<()> {
    let container = single(app, id).await?;
    let url = app.containers.database_url(&container).await?;
    output.success(&url);
    Ok(())
}

async fn single(app: &App, id: String) -> Result<Container> {
    let found = app.containers.find(vec![id.clone()]).await?;
    found
        .into_iter()
        .next()
        .ok_or_else(|| Error::UnknownContainer(id))
}
