// ABOUTME: Domain fixtures shared by the integration tests.
// ABOUTME: Images live in a fixed test registry host; containers carry no URLs.

use d2ship::config::Config;
use d2ship::types::{
    Container, ContainerDefinition, ContainerDefinitionValid, ContainerId, ContainerStatus, Image,
    validate,
};

pub const REGISTRY: &str = "r.example.com";

pub fn config() -> Config {
    Config {
        dhis2_host: "dhis2.example.org".to_string(),
        ..Config::default()
    }
}

pub fn template() -> Image {
    Image::new(REGISTRY, "acme", "2.36", "template")
}

pub fn draft(name: &str, existing: bool) -> ContainerDefinition {
    ContainerDefinition {
        project_name: "acme".to_string(),
        image: Some(template()),
        port: "8080".to_string(),
        name: name.to_string(),
        existing,
        ..ContainerDefinition::default()
    }
}

pub fn definition(name: &str, existing: bool) -> ContainerDefinitionValid {
    validate(draft(name, existing)).unwrap()
}

pub fn container(image: Image, status: ContainerStatus) -> Container {
    Container {
        id: ContainerId::new(image.docker_ref()),
        name: image.name.clone(),
        status,
        harbor_url: None,
        dhis2_url: None,
        image,
    }
}
