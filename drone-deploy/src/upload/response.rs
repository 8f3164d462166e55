//! Interpretation of repository responses.

use serde::Deserialize;

use super::transport::TransportResponse;
use crate::error::{DeployError, DeployResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResult {
    #[serde(default)]
    created_artifacts: Vec<CreatedArtifact>,
}

#[derive(Debug, Deserialize)]
struct CreatedArtifact {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract the remote id from an upload response.
///
/// Success is status 200 with at least one created artifact; the first id
/// wins. Any other status becomes [`DeployError::UploadFailed`] carrying the
/// server's `message`, or the raw body when it is not JSON.
pub fn remote_id(artifact: &str, response: &TransportResponse) -> DeployResult<String> {
    if response.status != 200 {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .map(|body| body.message)
            .unwrap_or_else(|_| response.body.trim().to_string());
        return Err(DeployError::UploadFailed {
            artifact: artifact.to_string(),
            status: response.status,
            message,
        });
    }

    let result: UploadResult =
        serde_json::from_str(&response.body).map_err(|e| DeployError::InvalidResponse {
            artifact: artifact.to_string(),
            reason: e.to_string(),
        })?;

    result
        .created_artifacts
        .into_iter()
        .next()
        .map(|created| created.id)
        .ok_or_else(|| DeployError::InvalidResponse {
            artifact: artifact.to_string(),
            reason: "no artifact was created".to_string(),
        })
}
