// ABOUTME: Create command: validates a definition and runs the deployment pipeline.
// ABOUTME: Ctrl-C drops the running pipeline, canceling the outstanding step.

use d2ship::config::Config;
use d2ship::deploy::Progress;
use d2ship::error::{Error, Result};
use d2ship::output::Output;
use d2ship::types::{ContainerDefinition, ContainerDefinitionValid, parse_image_name, validate};
use d2ship::usecases::App;
use tracing::warn;

use crate::cli::CreateArgs;

/// Turn command-line arguments into a validated definition, without any I/O.
pub fn definition(args: CreateArgs, config: &Config) -> Result<ContainerDefinitionValid> {
    let image = parse_image_name(&args.image).ok_or_else(|| Error::InvalidImage(args.image.clone()))?;

    let mut definition = ContainerDefinition {
        project_name: image.project.clone(),
        image: Some(image),
        port: args.port,
        name: args.name,
        existing: args.existing,
        db_port: args.db_port,
        deploy_path: args.deploy_path,
        java_opt: args.java_opt,
        ..ContainerDefinition::default()
    };

    if config.hide_advanced_options {
        let advanced = ContainerDefinition {
            project_name: definition.project_name.clone(),
            image: definition.image.clone(),
            port: definition.port.clone(),
            name: definition.name.clone(),
            existing: definition.existing,
            ..ContainerDefinition::default()
        };
        if advanced != definition {
            warn!("advanced options are hidden by configuration, ignoring them");
        }
        definition = advanced;
    }

    Ok(validate(definition)?)
}

pub async fn create(app: &App, args: CreateArgs, config: &Config, mut output: Output) -> Result<()> {
    let definition = definition(args, config)?;
    output.start_timer();

    let reporter = output.clone();
    let progress = Progress::new(move |message, percent| reporter.step(message, percent));
    let pipeline = app.create_image.execute(definition, progress);

    let instance = tokio::select! {
        result = pipeline.into_future() => result?,
        _ = tokio::signal::ctrl_c() => return Err(Error::Canceled),
    };

    output.success(&instance.url);
    Ok(())
}
