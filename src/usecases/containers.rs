// ABOUTME: Instance use cases: listing, batch start/stop/commit, and download links.
// ABOUTME: Containers are addressed by id; unknown ids fail before any batch is dispatched.

use std::sync::Arc;

use super::for_each;
use crate::deferred::Deferred;
use crate::error::Error;
use crate::repositories::ContainersRepository;
use crate::types::{Container, Image};

/// Line limit applied to downloaded logs.
pub const LOGS_LIMIT: u64 = 200_000;

#[derive(Clone)]
pub struct ContainerUseCases {
    repository: Arc<dyn ContainersRepository>,
}

impl std::fmt::Debug for ContainerUseCases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerUseCases").finish_non_exhaustive()
    }
}

impl ContainerUseCases {
    pub fn new(repository: Arc<dyn ContainersRepository>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Deferred<Vec<Container>> {
        self.repository.get_all()
    }

    /// Look up listed containers by id, preserving the order of `ids`.
    pub fn find(&self, ids: Vec<String>) -> Deferred<Vec<Container>> {
        self.repository.get_all().flat_map(move |containers| {
            let found: Result<Vec<Container>, Error> = ids
                .into_iter()
                .map(|id| {
                    containers
                        .iter()
                        .find(|c| c.id.as_str() == id)
                        .cloned()
                        .ok_or_else(|| Error::UnknownContainer(id))
                })
                .collect();
            match found {
                Ok(found) => Deferred::success(found),
                Err(err) => Deferred::error(err),
            }
        })
    }

    pub fn start(&self, images: &[Image]) -> Deferred<()> {
        for_each(images, |image| self.repository.start(image))
    }

    pub fn stop(&self, images: &[Image]) -> Deferred<()> {
        for_each(images, |image| self.repository.stop(image))
    }

    pub fn commit(&self, containers: &[Container]) -> Deferred<()> {
        for_each(containers, |container| self.repository.commit(container))
    }

    pub fn logs_url(&self, container: &Container) -> Deferred<String> {
        self.logs_url_with_limit(container, LOGS_LIMIT)
    }

    pub fn logs_url_with_limit(&self, container: &Container, limit: u64) -> Deferred<String> {
        self.repository.logs_url(container, Some(limit))
    }

    pub fn database_url(&self, container: &Container) -> Deferred<String> {
        self.repository.database_url(container)
    }
}
