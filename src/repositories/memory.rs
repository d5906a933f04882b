// ABOUTME: In-memory implementation of both repository traits.
// ABOUTME: Records every call in run order and can be told to fail specific operations.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ContainersRepository, ImagesRepository, StartedInstance};
use crate::config::Config;
use crate::deferred::Deferred;
use crate::error::Error;
use crate::types::{
    Container, ContainerDefinitionValid, ContainerId, ContainerStatus, Image, Project,
};

/// Repository operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAll,
    Start,
    StartInitial,
    Stop,
    Commit,
    LogsUrl,
    DatabaseUrl,
    GetProjects,
    GetForProject,
    Pull,
    Push,
    Delete,
    Create,
}

/// A recorded call; images are recorded as their registry references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetAll,
    Start { image: String },
    StartInitial { image: String, port: Option<u16>, keep_containers: bool },
    Stop { image: String },
    Commit { image: String },
    LogsUrl { image: String, limit: Option<u64> },
    DatabaseUrl { image: String },
    GetProjects,
    GetForProject { project: String },
    Pull { image: String },
    Push { image: String },
    Delete { images: Vec<String> },
    Create { source: String, destination: String },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::GetAll => Operation::GetAll,
            Call::Start { .. } => Operation::Start,
            Call::StartInitial { .. } => Operation::StartInitial,
            Call::Stop { .. } => Operation::Stop,
            Call::Commit { .. } => Operation::Commit,
            Call::LogsUrl { .. } => Operation::LogsUrl,
            Call::DatabaseUrl { .. } => Operation::DatabaseUrl,
            Call::GetProjects => Operation::GetProjects,
            Call::GetForProject { .. } => Operation::GetForProject,
            Call::Pull { .. } => Operation::Pull,
            Call::Push { .. } => Operation::Push,
            Call::Delete { .. } => Operation::Delete,
            Call::Create { .. } => Operation::Create,
        }
    }
}

#[derive(Default)]
struct State {
    containers: Vec<Container>,
    projects: Vec<Project>,
    images: HashMap<String, Vec<Image>>,
    calls: Vec<Call>,
    failures: HashMap<Operation, String>,
}

/// Fake gateway and registry.
///
/// Calls are recorded when the returned Deferred runs, not when it is built.
#[derive(Clone)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
    config: Arc<Config>,
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("calls", &self.state.lock().calls.len())
            .finish()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl InMemoryRepository {
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            config: Arc::new(config),
        }
    }

    pub fn with_containers(self, containers: Vec<Container>) -> Self {
        self.state.lock().containers = containers;
        self
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.state.lock().projects = projects;
        self
    }

    pub fn with_images(self, project: &str, images: Vec<Image>) -> Self {
        self.state.lock().images.insert(project.to_string(), images);
        self
    }

    /// Make every later call of `operation` fail with `message`.
    pub fn fail_on(&self, operation: Operation, message: impl Into<String>) {
        self.state.lock().failures.insert(operation, message.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().calls.iter().map(Call::operation).collect()
    }

    pub fn containers(&self) -> Vec<Container> {
        self.state.lock().containers.clone()
    }

    fn record<T, F>(&self, call: Call, apply: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut State) -> T + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        Deferred::new(move || async move {
            let mut state = state.lock();
            let operation = call.operation();
            state.calls.push(call);
            if let Some(message) = state.failures.get(&operation) {
                return Err(Error::transport(message.clone()));
            }
            Ok(apply(&mut state))
        })
    }

    fn container_for(&self, image: &Image, status: ContainerStatus, port: u16) -> Container {
        Container {
            id: ContainerId::new(image.docker_ref()),
            name: image.name.clone(),
            status,
            harbor_url: None,
            dhis2_url: (status == ContainerStatus::Running).then(|| self.config.instance_url(port)),
            image: image.clone(),
        }
    }
}

fn set_status(state: &mut State, running: Container) {
    match state.containers.iter_mut().find(|c| c.image == running.image) {
        Some(existing) => *existing = running,
        None => state.containers.push(running),
    }
}

impl ContainersRepository for InMemoryRepository {
    fn get_all(&self) -> Deferred<Vec<Container>> {
        self.record(Call::GetAll, |state| state.containers.clone())
    }

    fn start(&self, image: &Image) -> Deferred<()> {
        let container = self.container_for(image, ContainerStatus::Running, self.config.default_port);
        self.record(
            Call::Start {
                image: image.docker_ref(),
            },
            move |state| set_status(state, container),
        )
    }

    fn start_initial(&self, definition: &ContainerDefinitionValid) -> Deferred<StartedInstance> {
        let image = definition.local_image();
        let port = definition.port().unwrap_or(self.config.default_port);
        let container = self.container_for(&image, ContainerStatus::Running, port);
        let url = self.config.instance_url(port);
        self.record(
            Call::StartInitial {
                image: image.docker_ref(),
                port: definition.port(),
                keep_containers: definition.existing(),
            },
            move |state| {
                set_status(state, container);
                StartedInstance { url }
            },
        )
    }

    fn stop(&self, image: &Image) -> Deferred<()> {
        let image = image.clone();
        self.record(
            Call::Stop {
                image: image.docker_ref(),
            },
            move |state| {
                for container in state.containers.iter_mut().filter(|c| c.image == image) {
                    container.status = ContainerStatus::Stopped;
                    container.dhis2_url = None;
                }
            },
        )
    }

    fn commit(&self, container: &Container) -> Deferred<()> {
        self.record(
            Call::Commit {
                image: container.image.docker_ref(),
            },
            |_| (),
        )
    }

    fn logs_url(&self, container: &Container, limit: Option<u64>) -> Deferred<String> {
        let image = container.image.docker_ref();
        let url = format!("memory://logs/{image}");
        self.record(Call::LogsUrl { image, limit }, move |_| url)
    }

    fn database_url(&self, container: &Container) -> Deferred<String> {
        let image = container.image.docker_ref();
        let url = format!("memory://db/{image}");
        self.record(Call::DatabaseUrl { image }, move |_| url)
    }
}

impl ImagesRepository for InMemoryRepository {
    fn get_projects(&self) -> Deferred<Vec<Project>> {
        self.record(Call::GetProjects, |state| state.projects.clone())
    }

    fn get_for_project(&self, project: &str) -> Deferred<Vec<Image>> {
        let key = project.to_string();
        self.record(
            Call::GetForProject {
                project: project.to_string(),
            },
            move |state| state.images.get(&key).cloned().unwrap_or_default(),
        )
    }

    fn pull(&self, image: &Image) -> Deferred<()> {
        self.record(
            Call::Pull {
                image: image.docker_ref(),
            },
            |_| (),
        )
    }

    fn push(&self, image: &Image) -> Deferred<()> {
        self.record(
            Call::Push {
                image: image.docker_ref(),
            },
            |_| (),
        )
    }

    fn delete(&self, images: &[Image]) -> Deferred<()> {
        self.record(
            Call::Delete {
                images: images.iter().map(Image::docker_ref).collect(),
            },
            |_| (),
        )
    }

    fn create(&self, definition: &ContainerDefinitionValid) -> Deferred<()> {
        self.record(
            Call::Create {
                source: definition.template_image().docker_ref(),
                destination: definition.local_image().docker_ref(),
            },
            |_| (),
        )
    }
}
