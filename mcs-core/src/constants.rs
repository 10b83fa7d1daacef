//! Wire-contract spellings for the MCS gateway API.
//!
//! Query option names and endpoint paths are part of the HTTP contract and
//! must be spelled exactly as the gateway expects them.

// ═══════════════════════════════════════════════════════════════════════════════
// ENDPOINT PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Content-add endpoint (multipart POST).
pub const ENDPOINT_ADD: &str = "add";

/// Per-user gateway/subdomain listing endpoint.
pub const ENDPOINT_USER_GATEWAY: &str = "gateway/get_user_gateway";

/// File-server lookup endpoint for a stored CID.
pub const ENDPOINT_FILE_SERVER: &str = "file/get_server";

// ═══════════════════════════════════════════════════════════════════════════════
// ADD OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Compute the hash without writing anything to the node.
pub const OPT_ONLY_HASH: &str = "only-hash";

/// Pin the added content against garbage collection.
pub const OPT_PIN: &str = "pin";

/// Stream progress events while adding.
pub const OPT_PROGRESS: &str = "progress";

/// Store small leaves without the extra wrapping format.
pub const OPT_RAW_LEAVES: &str = "raw-leaves";

/// Multihash algorithm name to use for the content.
pub const OPT_HASH: &str = "hash";

/// CID version the node should produce.
pub const OPT_CID_VERSION: &str = "cid-version";

/// Add a directory tree recursively.
pub const OPT_RECURSIVE: &str = "recursive";

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Wallet address the gateway list is scoped to.
pub const OPT_WALLET: &str = "wallet";

/// Originating source identifier for the lookup.
pub const OPT_SOURCE: &str = "source";

/// CID to resolve to a file server.
pub const OPT_IPFS_CID: &str = "ipfsCid";

// ═══════════════════════════════════════════════════════════════════════════════
// MULTIPART CONTENT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Content type for regular file parts.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Content type for directory parts (empty body).
pub const MIME_DIRECTORY: &str = "application/x-directory";

/// Content type for symlink parts (body is the target path).
pub const MIME_SYMLINK: &str = "application/symlink";
