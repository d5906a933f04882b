// ABOUTME: Registry use cases: catalog queries and batch push/pull/delete.
// ABOUTME: Batch operations fan out one request per image via parallel dispatch.

use std::sync::Arc;

use super::for_each;
use crate::deferred::Deferred;
use crate::repositories::ImagesRepository;
use crate::types::{Image, Project};

#[derive(Clone)]
pub struct ImageUseCases {
    repository: Arc<dyn ImagesRepository>,
}

impl std::fmt::Debug for ImageUseCases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUseCases").finish_non_exhaustive()
    }
}

impl ImageUseCases {
    pub fn new(repository: Arc<dyn ImagesRepository>) -> Self {
        Self { repository }
    }

    pub fn projects(&self) -> Deferred<Vec<Project>> {
        self.repository.get_projects()
    }

    pub fn list(&self, project: &str) -> Deferred<Vec<Image>> {
        self.repository.get_for_project(project)
    }

    pub fn push(&self, images: &[Image]) -> Deferred<()> {
        for_each(images, |image| self.repository.push(image))
    }

    pub fn pull(&self, images: &[Image]) -> Deferred<()> {
        for_each(images, |image| self.repository.pull(image))
    }

    /// Delete each image with its own request.
    pub fn delete(&self, images: &[Image]) -> Deferred<()> {
        for_each(images, |image| {
            self.repository.delete(std::slice::from_ref(image))
        })
    }
}
