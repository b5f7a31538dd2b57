use thiserror::Error;

use crate::api::types::NodeId;

/// Failure while loading the asset list.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch `{path}`: {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to parse `{path}`")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{path}` returned {found} content, expected {expected}")]
    UnexpectedContent {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unsupported asset type for `{path}`")]
    Unsupported { path: String },
}

/// Invalid scene graph edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("the stage cannot be attached to another node")]
    StageIsRoot,
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Failure reported by the frame driver.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("asset loading failed")]
    Assets(#[from] AssetError),
    #[error("engine already started")]
    AlreadyRunning,
}
