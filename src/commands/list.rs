// ABOUTME: Read-only listing commands: instances, projects and project images.
// ABOUTME: Each command prints one line per item, or a JSON list in json mode.

use d2ship::error::Result;
use d2ship::output::Output;
use d2ship::usecases::App;

pub async fn list(app: &App, output: &Output) -> Result<()> {
    let containers = app.containers.list().await?;
    output.items(&containers, |c| {
        let url = c.dhis2_url.as_deref().unwrap_or("-");
        format!("{}\t{}\t{}", c.id, c.status, url)
    });
    Ok(())
}

pub async fn projects(app: &App, output: &Output) -> Result<()> {
    let projects = app.images.projects().await?;
    output.items(&projects, |p| format!("{}\t{} repositories", p.name, p.repo_count));
    Ok(())
}

pub async fn images(app: &App, project: &str, output: &Output) -> Result<()> {
    let images = app.images.list(project).await?;
    output.items(&images, |i| i.docker_ref());
    Ok(())
}
