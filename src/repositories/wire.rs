// ABOUTME: Request and response bodies of the d2-docker gateway API.
// ABOUTME: Images travel as full registry references (registry/project/dhis2-data:tag).

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::ApiContainer;

#[derive(Debug, Clone, Deserialize)]
pub struct InstancesResponse {
    #[serde(default)]
    pub containers: Vec<ApiContainer>,
}

/// Body of pull, push, stop and commit requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyRequest {
    pub source: String,
    #[serde(serialize_with = "serialize_nonempty")]
    pub destinations: NonEmpty<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveRequest {
    pub images: Vec<String>,
}

/// Body of start requests. `db_port`, `deploy_path` and `java_opt` are
/// extensions of the gateway's basic start request and are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartRequest {
    pub image: String,
    pub detach: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub keep_containers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_opt: Option<String>,
}

impl StartRequest {
    /// Start `image` detached with gateway defaults for everything else.
    pub fn detached(image: String, port: Option<u16>, keep_containers: bool) -> Self {
        Self {
            image,
            detach: true,
            port,
            keep_containers,
            db_port: None,
            deploy_path: None,
            java_opt: None,
        }
    }
}

// The gateway expects a plain JSON array.
fn serialize_nonempty<S: Serializer>(values: &NonEmpty<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter())
}
