// ABOUTME: Lifecycle gateway adapter for instance operations.
// ABOUTME: Translates start/stop/commit/list and download links into gateway requests.

use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::debug;

use super::wire::{ImageRequest, InstancesResponse, StartRequest};
use super::{ContainersRepository, StartedInstance, endpoint};
use crate::config::Config;
use crate::deferred::Deferred;
use crate::fetch::{FetchGateway, with_query};
use crate::types::{Container, ContainerDefinitionValid, Image};

#[derive(Debug, Clone)]
pub struct ContainersHttpRepository {
    gateway: FetchGateway,
    config: Arc<Config>,
}

impl ContainersHttpRepository {
    pub fn new(gateway: FetchGateway, config: Arc<Config>) -> Self {
        Self { gateway, config }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.config.api_url, path)
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

impl ContainersRepository for ContainersHttpRepository {
    fn get_all(&self) -> Deferred<Vec<Container>> {
        let config = Arc::clone(&self.config);
        self.gateway
            .get::<InstancesResponse>(&self.url("/instances"))
            .map(move |response| {
                let total = response.containers.len();
                let containers: Vec<Container> = response
                    .containers
                    .into_iter()
                    .filter_map(|api| Container::from_api(api, &config))
                    .collect();
                debug!(
                    total,
                    listed = containers.len(),
                    "filtered gateway instances"
                );
                containers
            })
    }

    fn start(&self, image: &Image) -> Deferred<()> {
        let body = StartRequest::detached(image.docker_ref(), None, true);
        self.gateway
            .post::<_, IgnoredAny>(&self.url("/instances/start"), &body)
            .void()
    }

    fn start_initial(&self, definition: &ContainerDefinitionValid) -> Deferred<StartedInstance> {
        let draft = definition.definition();
        let port = definition.port().unwrap_or(self.config.default_port);
        let body = StartRequest {
            db_port: definition.db_port(),
            deploy_path: draft.deploy_path.clone(),
            java_opt: draft.java_opt.clone(),
            ..StartRequest::detached(
                definition.local_image().docker_ref(),
                Some(port),
                definition.existing(),
            )
        };

        let url = self.config.instance_url(port);
        self.gateway
            .post::<_, IgnoredAny>(&self.url("/instances/start"), &body)
            .map(move |_| StartedInstance { url })
    }

    fn stop(&self, image: &Image) -> Deferred<()> {
        self.post_image("/instances/stop", image)
    }

    fn commit(&self, container: &Container) -> Deferred<()> {
        self.post_image("/instances/commit", &container.image)
    }

    fn logs_url(&self, container: &Container, limit: Option<u64>) -> Deferred<String> {
        let mut params = vec![("image".to_string(), container.image.docker_ref())];
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        Deferred::success(with_query(&self.url("/instances/logs"), &params))
    }

    fn database_url(&self, container: &Container) -> Deferred<String> {
        let params = [("image".to_string(), container.image.docker_ref())];
        Deferred::success(with_query(&self.url("/instances/db"), &params))
    }
}
