// ABOUTME: Use cases exposed to the CLI and to embedding callers.
// ABOUTME: App is the composition root wiring repositories into every use case.

mod containers;
mod images;

pub use containers::{ContainerUseCases, LOGS_LIMIT};
pub use images::ImageUseCases;

use std::sync::Arc;

use crate::config::Config;
use crate::deferred::Deferred;
use crate::deploy::CreateContainerImage;
use crate::fetch::FetchGateway;
use crate::repositories::{
    ContainersHttpRepository, ContainersRepository, ImagesHttpRepository, ImagesRepository,
};

/// Every use case, sharing one pair of repositories.
#[derive(Debug, Clone)]
pub struct App {
    pub containers: ContainerUseCases,
    pub images: ImageUseCases,
    pub create_image: CreateContainerImage,
}

impl App {
    /// Wire the HTTP adapters for `config`.
    pub fn from_config(config: Config) -> Self {
        let gateway = FetchGateway::from_config(&config);
        let config = Arc::new(config);
        let containers = Arc::new(ContainersHttpRepository::new(
            gateway.clone(),
            Arc::clone(&config),
        ));
        let images = Arc::new(ImagesHttpRepository::new(gateway, config));
        Self::with_repositories(images, containers)
    }

    pub fn with_repositories(
        images: Arc<dyn ImagesRepository>,
        containers: Arc<dyn ContainersRepository>,
    ) -> Self {
        Self {
            containers: ContainerUseCases::new(Arc::clone(&containers)),
            images: ImageUseCases::new(Arc::clone(&images)),
            create_image: CreateContainerImage::new(images, containers),
        }
    }
}

/// Run one Deferred per item concurrently, succeeding only if all do.
fn for_each<I, F>(items: &[I], f: F) -> Deferred<()>
where
    F: Fn(&I) -> Deferred<()>,
{
    Deferred::parallel(items.iter().map(f).collect()).void()
}
