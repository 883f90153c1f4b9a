//! Pub/Sub push delivery decoding.
//!
//! Cloud Build publishes each build update to the `cloud-builds` topic as a
//! base64-encoded JSON `Build` resource in the message `data` field.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::build::types::Build;
use crate::error::DecodeError;

/// Body of a Pub/Sub push subscription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: PubsubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
}

impl PubsubMessage {
    /// Wrap an encoded build the way the `cloud-builds` topic does.
    pub fn for_build(build: &Build) -> Result<Self, DecodeError> {
        let mut attributes = HashMap::new();
        if let Some(id) = &build.id {
            attributes.insert("buildId".to_string(), id.clone());
        }
        attributes.insert("status".to_string(), build.status.to_string());

        Ok(Self {
            data: Some(encode_build(build)?),
            attributes,
            message_id: None,
            publish_time: None,
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Decode the build carried by a Pub/Sub message.
pub fn decode_message(message: &PubsubMessage) -> Result<Build, DecodeError> {
    let data = message.data.as_deref().ok_or(DecodeError::MissingData)?;
    decode_build(data)
}

/// Decode a base64 JSON payload into a build. The whole record must parse.
pub fn decode_build(data: &str) -> Result<Build, DecodeError> {
    let bytes = STANDARD.decode(data.trim())?;
    debug!("Decoded {} byte build payload", bytes.len());
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode a build into the transport form read by [`decode_build`].
pub fn encode_build(build: &Build) -> Result<String, DecodeError> {
    let bytes = serde_json::to_vec(build)?;
    Ok(STANDARD.encode(bytes))
}
