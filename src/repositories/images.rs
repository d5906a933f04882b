// ABOUTME: Registry adapter: catalog reads through the gateway's Harbor relay, image ops via the gateway.
// ABOUTME: Only IMAGE artifacts with parsable data tags become Images.

use nonempty::NonEmpty;
use serde::de::IgnoredAny;
use std::sync::Arc;

use super::wire::{CopyRequest, ImageRequest, RemoveRequest};
use super::{ImagesRepository, endpoint};
use crate::config::Config;
use crate::deferred::Deferred;
use crate::fetch::FetchGateway;
use crate::types::{
    Artifact, ContainerDefinitionValid, DATA_REPOSITORY, Image, Project, image_info_from_tag,
};

#[derive(Debug, Clone)]
pub struct ImagesHttpRepository {
    gateway: FetchGateway,
    config: Arc<Config>,
}

impl ImagesHttpRepository {
    pub fn new(gateway: FetchGateway, config: Arc<Config>) -> Self {
        Self { gateway, config }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.config.api_url, path)
    }

    fn harbor_url(&self, path: &str) -> String {
        format!(
            "{}/https://{}/api/v2.0/{}",
            self.url("/harbor"),
            self.config.registry_host,
            path.trim_start_matches('/')
        )
    }

    fn post_image(&self, path: &str, image: &Image) -> Deferred<()> {
        let body = ImageRequest {
            image: image.docker_ref(),
        };
        self.gateway
            .post::<_, IgnoredAny>(&self.url(path), &body)
            .void()
    }
}

/// Images described by the tags of `artifacts`, in catalog order.
pub(crate) fn images_from_artifacts(
    artifacts: &[Artifact],
    registry_host: &str,
    project: &str,
) -> Vec<Image> {
    artifacts
        .iter()
        .flat_map(Artifact::tag_names)
        .filter_map(image_info_from_tag)
        .map(|(version, name)| Image::new(registry_host, project, version, name))
        .collect()
}

impl ImagesRepository for ImagesHttpRepository {
    fn get_projects(&self) -> Deferred<Vec<Project>> {
        self.gateway.get(&self.harbor_url("projects"))
    }

    fn get_for_project(&self, project: &str) -> Deferred<Vec<Image>> {
        let url = self.harbor_url(&format!(
            "projects/{}/repositories/{}/artifacts",
            urlencoding::encode(project),
            DATA_REPOSITORY
        ));
        let registry_host = self.config.registry_host.clone();
        let project = project.to_string();

        self.gateway
            .get::<Vec<Artifact>>(&url)
            .map(move |artifacts| images_from_artifacts(&artifacts, &registry_host, &project))
    }

    fn pull(&self, image: &Image) -> Deferred<()> {
        self.post_image("/instances/pull", image)
    }

    fn push(&self, image: &Image) -> Deferred<()> {
        self.post_image("/instances/push", image)
    }

    fn delete(&self, images: &[Image]) -> Deferred<()> {
        let body = RemoveRequest {
            images: images.iter().map(Image::docker_ref).collect(),
        };
        self.gateway
            .post::<_, IgnoredAny>(&self.url("/instances/rm"), &body)
            .void()
    }

    fn create(&self, definition: &ContainerDefinitionValid) -> Deferred<()> {
        let body = CopyRequest {
            source: definition.template_image().docker_ref(),
            destinations: NonEmpty::new(definition.local_image().docker_ref()),
        };
        self.gateway
            .post::<_, IgnoredAny>(&self.url("/instances/copy"), &body)
            .void()
    }
}
