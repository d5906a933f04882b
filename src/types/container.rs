// ABOUTME: Container instances as reported by the lifecycle gateway.
// ABOUTME: Built fresh from each list response; names that are not data images are dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::ContainerId;
use super::image::{Image, parse_image_name};
use crate::config::Config;

/// Lifecycle status of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContainerStatus {
    Running,
    Stopped,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerStatus::Running => write!(f, "RUNNING"),
            ContainerStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// One entry of the gateway's instance list, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum ApiContainer {
    Running {
        name: String,
        #[serde(default)]
        description: String,
        port: u16,
    },
    Stopped {
        name: String,
        #[serde(default)]
        description: String,
    },
}

impl ApiContainer {
    pub fn name(&self) -> &str {
        match self {
            ApiContainer::Running { name, .. } | ApiContainer::Stopped { name, .. } => name,
        }
    }
}

/// A DHIS2 instance known to the gateway.
///
/// `dhis2_url` is present exactly when the instance is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub status: ContainerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harbor_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhis2_url: Option<String>,
    pub image: Image,
}

impl Container {
    /// Convert a gateway list entry, or `None` if its name is not a data image.
    pub fn from_api(api: ApiContainer, config: &Config) -> Option<Self> {
        let image = parse_image_name(api.name())?;
        let (status, dhis2_url) = match &api {
            ApiContainer::Running { port, .. } => (
                ContainerStatus::Running,
                Some(config.instance_url(*port)),
            ),
            ApiContainer::Stopped { .. } => (ContainerStatus::Stopped, None),
        };
        let harbor_url = (!image.registry_url.is_empty()).then(|| {
            format!(
                "https://{}/harbor/projects?name={}",
                image.registry_url,
                urlencoding::encode(&image.project)
            )
        });

        Some(Self {
            id: ContainerId::new(api.name()),
            name: image.name.clone(),
            status,
            harbor_url,
            dhis2_url,
            image,
        })
    }

    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running
    }
}
