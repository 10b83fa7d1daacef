//! Wire-level response shapes for the MCS gateway API.
//!
//! Every type here is transient: constructed once per call from decoded JSON
//! and handed to the caller, never cached or mutated afterwards.

use serde::{Deserialize, Serialize};

/// Result of a content-add operation.
///
/// The add endpoint emits one of these per added entry; for recursive adds
/// the final object describes the root directory itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddResult {
    /// Content identifier assigned by the node.
    #[serde(rename = "Hash")]
    pub hash: String,
    /// Path of the entry relative to the add root.
    #[serde(rename = "Name")]
    pub name: String,
    /// Cumulative DAG size, a decimal string on the wire.
    #[serde(rename = "Size")]
    pub size: String,
}

/// Envelope for the per-user gateway listing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayListResponse {
    /// Gateway-reported status string.
    pub status: String,
    /// One entry per gateway registered for the user.
    pub data: Vec<GatewayEntry>,
}

/// A single gateway registration for a user.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayEntry {
    /// Entry identifier.
    pub uid: String,
    /// Owning user identifier.
    pub user_uid: String,
    /// Subdomain assigned to the user.
    pub subdomain: String,
    /// Gateway host identifier.
    pub gateway: String,
    /// Whether the registration is currently active.
    pub is_active: bool,
    /// Numeric row id.
    pub id: i64,
    /// Creation timestamp, as formatted by the gateway.
    pub created_at: String,
    /// Last-update timestamp, as formatted by the gateway.
    pub updated_at: String,
    /// Deletion marker; null unless the entry was soft-deleted.
    pub deleted_at: Option<serde_json::Value>,
}

/// Envelope for the file-server lookup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerResponse {
    /// Gateway-reported status string.
    pub status: String,
    /// Server details; absent when the CID is unknown.
    pub data: Option<FileServerData>,
}

/// Download coordinates for a stored file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerData {
    /// CID of the stored file.
    #[serde(rename = "file_ipfsCid")]
    pub file_ipfs_cid: String,
    /// Address of the server holding the file.
    pub download_address: String,
    /// Full download URL for the file.
    pub download_url: String,
}
