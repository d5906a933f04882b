// ABOUTME: Integration tests for batch and query use cases.
// ABOUTME: Uses the in-memory repository to observe dispatched calls.

mod support;

use d2ship::error::Error;
use d2ship::repositories::{Call, InMemoryRepository, Operation};
use d2ship::types::{ContainerStatus, Image, Project};
use d2ship::usecases::{App, LOGS_LIMIT};
use std::sync::Arc;
use support::fixtures::{self, REGISTRY, container, template};

fn images() -> Vec<Image> {
    vec![
        Image::new(REGISTRY, "acme", "2.36", "one"),
        Image::new(REGISTRY, "acme", "2.36", "two"),
        Image::new(REGISTRY, "acme", "2.37", "three"),
    ]
}

fn app(repository: &Arc<InMemoryRepository>) -> App {
    App::with_repositories(repository.clone(), repository.clone())
}

fn sorted(mut calls: Vec<Call>) -> Vec<String> {
    let mut refs: Vec<String> = calls
        .drain(..)
        .map(|call| match call {
            Call::Start { image }
            | Call::Stop { image }
            | Call::Push { image }
            | Call::Pull { image }
            | Call::Commit { image } => image,
            Call::Delete { images } => images.join(","),
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    refs.sort();
    refs
}

fn expected_refs() -> Vec<String> {
    let mut refs: Vec<String> = images().iter().map(Image::docker_ref).collect();
    refs.sort();
    refs
}

mod batch {
    use super::*;

    #[tokio::test]
    async fn every_operation_reaches_every_image() {
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));
        let app = app(&repository);
        let images = images();

        app.containers.start(&images).await.unwrap();
        app.containers.stop(&images).await.unwrap();
        app.images.push(&images).await.unwrap();
        app.images.pull(&images).await.unwrap();
        app.images.delete(&images).await.unwrap();

        let calls = repository.calls();
        for operation in [
            Operation::Start,
            Operation::Stop,
            Operation::Push,
            Operation::Pull,
            Operation::Delete,
        ] {
            let matching: Vec<Call> = calls
                .iter()
                .filter(|c| c.operation() == operation)
                .cloned()
                .collect();
            assert_eq!(sorted(matching), expected_refs(), "{operation:?}");
        }
    }

    #[tokio::test]
    async fn commit_uses_each_container_image() {
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));
        let containers: Vec<_> = images()
            .into_iter()
            .map(|image| container(image, ContainerStatus::Running))
            .collect();

        app(&repository).containers.commit(&containers).await.unwrap();

        assert_eq!(sorted(repository.calls()), expected_refs());
    }

    #[tokio::test]
    async fn empty_batch_succeeds_without_calls() {
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));
        app(&repository).images.push(&[]).await.unwrap();
        assert!(repository.calls().is_empty());
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch_but_all_are_dispatched() {
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));
        repository.fail_on(Operation::Pull, "pull denied");

        let err = app(&repository).images.pull(&images()).await.unwrap_err();

        assert_eq!(err.to_string(), "pull denied");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(repository.calls().len(), 3);
    }
}

mod queries {
    use super::*;

    #[tokio::test]
    async fn find_resolves_ids_in_request_order() {
        let first = container(template(), ContainerStatus::Running);
        let second = container(images()[0].clone(), ContainerStatus::Stopped);
        let repository = Arc::new(
            InMemoryRepository::new(fixtures::config())
                .with_containers(vec![first.clone(), second.clone()]),
        );

        let found = app(&repository)
            .containers
            .find(vec![second.id.to_string(), first.id.to_string()])
            .await
            .unwrap();

        assert_eq!(found, vec![second, first]);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));
        let err = app(&repository)
            .containers
            .find(vec!["nope".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnknownContainer(ref id) if id == "nope"));
    }

    #[tokio::test]
    async fn logs_use_the_default_line_limit() {
        let target = container(template(), ContainerStatus::Running);
        let repository = Arc::new(InMemoryRepository::new(fixtures::config()));

        app(&repository).containers.logs_url(&target).await.unwrap();

        assert_eq!(LOGS_LIMIT, 200_000);
        assert_eq!(
            repository.calls(),
            vec![Call::LogsUrl {
                image: template().docker_ref(),
                limit: Some(LOGS_LIMIT),
            }]
        );
    }

    #[tokio::test]
    async fn catalog_queries_pass_through() {
        let project: Project = serde_json::from_value(serde_json::json!({"name": "acme"})).unwrap();
        let repository = Arc::new(
            InMemoryRepository::new(fixtures::config())
                .with_projects(vec![project.clone()])
                .with_images("acme", images()),
        );
        let app = app(&repository);

        assert_eq!(app.images.projects().await.unwrap(), vec![project]);
        assert_eq!(app.images.list("acme").await.unwrap(), images());
        assert!(app.images.list("other").await.unwrap().is_empty());
        assert_eq!(
            app.containers.database_url(&container(template(), ContainerStatus::Stopped)).await.unwrap(),
            format!("memory://db/{}", template().docker_ref())
        );
    }
}
