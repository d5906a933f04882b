// ABOUTME: Integration tests for the HTTP repository adapters.
// ABOUTME: Asserts endpoints and JSON bodies through a scripted transport.

mod support;

use d2ship::config::Config;
use d2ship::fetch::{FetchGateway, RoutingMode};
use d2ship::repositories::{
    ContainersHttpRepository, ContainersRepository, ImagesHttpRepository, ImagesRepository,
};
use d2ship::types::ContainerStatus;
use serde_json::json;
use std::sync::Arc;
use support::fixtures::{self, container, definition, template};
use support::transport::{ScriptedTransport, body, json as json_response};

const API: &str = "http://gateway.local:5000";

fn config() -> Arc<Config> {
    Arc::new(Config {
        api_url: API.to_string(),
        registry_host: "r.example.com".to_string(),
        ..fixtures::config()
    })
}

fn containers(transport: &Arc<ScriptedTransport>) -> ContainersHttpRepository {
    let gateway = FetchGateway::new(transport.clone(), RoutingMode::Direct, None);
    ContainersHttpRepository::new(gateway, config())
}

fn images(transport: &Arc<ScriptedTransport>) -> ImagesHttpRepository {
    let gateway = FetchGateway::new(transport.clone(), RoutingMode::Direct, None);
    ImagesHttpRepository::new(gateway, config())
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn list_filters_unparsable_instances() {
        let transport = ScriptedTransport::new(|_| {
            Ok(json_response(json!({
                "containers": [
                    {"name": "r.example.com/acme/dhis2-data:2.36-mycopy", "status": "RUNNING", "port": 8081},
                    {"name": "nginx:latest", "status": "RUNNING", "port": 80}
                ]
            })))
        });

        let listed = containers(&transport).get_all().await.unwrap();

        assert_eq!(transport.urls(), vec![format!("{API}/instances")]);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "mycopy");
        assert_eq!(listed[0].dhis2_url.as_deref(), Some("http://dhis2.example.org:8081"));
    }

    #[tokio::test]
    async fn start_keeps_existing_containers() {
        let transport = ScriptedTransport::ok();
        containers(&transport).start(&template()).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.url, format!("{API}/instances/start"));
        assert_eq!(
            body(request),
            json!({"image": template().docker_ref(), "detach": true, "keep_containers": true})
        );
    }

    #[tokio::test]
    async fn start_initial_sends_port_and_advanced_options() {
        let transport = ScriptedTransport::ok();
        let valid = d2ship::types::validate(d2ship::types::ContainerDefinition {
            db_port: Some("5433".to_string()),
            java_opt: Some("-Xmx4g".to_string()),
            ..fixtures::draft("mycopy", false)
        })
        .unwrap();

        let instance = containers(&transport).start_initial(&valid).await.unwrap();

        assert_eq!(instance.url, "http://dhis2.example.org:8080");
        assert_eq!(
            body(&transport.requests()[0]),
            json!({
                "image": "r.example.com/acme/dhis2-data:2.36-mycopy",
                "detach": true,
                "port": 8080,
                "keep_containers": false,
                "db_port": 5433,
                "java_opt": "-Xmx4g"
            })
        );
    }

    #[tokio::test]
    async fn start_initial_falls_back_to_the_default_port() {
        let transport = ScriptedTransport::ok();
        let valid = d2ship::types::validate(d2ship::types::ContainerDefinition {
            port: String::new(),
            ..fixtures::draft("mycopy", true)
        })
        .unwrap();

        let instance = containers(&transport).start_initial(&valid).await.unwrap();

        assert_eq!(instance.url, "http://dhis2.example.org:8080");
        assert_eq!(body(&transport.requests()[0])["keep_containers"], true);
    }

    #[tokio::test]
    async fn stop_and_commit_post_the_image() {
        let transport = ScriptedTransport::ok();
        let repo = containers(&transport);
        let target = container(template(), ContainerStatus::Running);

        repo.stop(&template()).await.unwrap();
        repo.commit(&target).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, format!("{API}/instances/stop"));
        assert_eq!(requests[1].url, format!("{API}/instances/commit"));
        for request in &requests {
            assert_eq!(body(request), json!({"image": template().docker_ref()}));
        }
    }

    #[tokio::test]
    async fn download_links_are_built_without_requests() {
        let transport = ScriptedTransport::ok();
        let repo = containers(&transport);
        let target = container(template(), ContainerStatus::Running);

        let logs = repo.logs_url(&target, Some(200_000)).await.unwrap();
        let db = repo.database_url(&target).await.unwrap();

        assert_eq!(
            logs,
            format!(
                "{API}/instances/logs?image=r.example.com%2Facme%2Fdhis2-data%3A2.36-template&limit=200000"
            )
        );
        assert_eq!(
            db,
            format!("{API}/instances/db?image=r.example.com%2Facme%2Fdhis2-data%3A2.36-template")
        );
        assert!(transport.requests().is_empty());
    }
}

mod registry {
    use super::*;

    #[tokio::test]
    async fn projects_are_read_through_the_harbor_relay() {
        let transport = ScriptedTransport::new(|_| Ok(json_response(json!([{"name": "acme"}]))));

        let projects = images(&transport).get_projects().await.unwrap();

        assert_eq!(projects[0].name, "acme");
        assert_eq!(
            transport.urls(),
            vec![format!("{API}/harbor/https://r.example.com/api/v2.0/projects")]
        );
    }

    #[tokio::test]
    async fn project_images_come_from_artifact_tags() {
        let transport = ScriptedTransport::new(|_| {
            Ok(json_response(json!([
                {"type": "IMAGE", "tags": [{"name": "2.36-template"}, {"name": "2.37-sl"}]},
                {"type": "CHART"}
            ])))
        });

        let listed = images(&transport).get_for_project("acme").await.unwrap();

        assert_eq!(
            transport.urls(),
            vec![format!(
                "{API}/harbor/https://r.example.com/api/v2.0/projects/acme/repositories/dhis2-data/artifacts"
            )]
        );
        let names: Vec<&str> = listed.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["template", "sl"]);
        assert_eq!(listed[0], template());
    }

    #[tokio::test]
    async fn image_operations_hit_their_endpoints() {
        let transport = ScriptedTransport::ok();
        let repo = images(&transport);
        let valid = definition("mycopy", false);

        repo.pull(&template()).await.unwrap();
        repo.create(&valid).await.unwrap();
        repo.delete(&[template()]).await.unwrap();
        repo.push(&valid.local_image()).await.unwrap();

        let requests = transport.requests();
        let paths: Vec<String> = requests
            .iter()
            .map(|r| r.url.trim_start_matches(API).to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["/instances/pull", "/instances/copy", "/instances/rm", "/instances/push"]
        );
        assert_eq!(
            body(&requests[1]),
            json!({
                "source": template().docker_ref(),
                "destinations": ["r.example.com/acme/dhis2-data:2.36-mycopy"]
            })
        );
        assert_eq!(body(&requests[2]), json!({"images": [template().docker_ref()]}));
    }

    #[tokio::test]
    async fn api_errors_surface_with_status_text() {
        let transport = ScriptedTransport::new(|_| Ok(support::transport::empty(409, "Conflict")));

        let err = images(&transport).push(&template()).await.unwrap_err();

        assert_eq!(err.to_string(), "API error code: Conflict (409)");
        // Direct failure retried once; without a relay the URL is unchanged.
        assert_eq!(transport.requests().len(), 2);
    }
}
