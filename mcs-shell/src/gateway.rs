//! Lookup operations against the user gateway and file-server endpoints.

use tracing::{debug, instrument};

use mcs_core::error::{McsError, Result};
use mcs_core::{
    FileServerData, FileServerResponse, GatewayListResponse, ENDPOINT_FILE_SERVER,
    ENDPOINT_USER_GATEWAY, OPT_IPFS_CID, OPT_SOURCE, OPT_WALLET,
};

use crate::shell::Shell;

impl Shell {
    /// Returns the subdomains of the user's active gateways, in response
    /// order.
    #[instrument(skip(self))]
    pub async fn get_user_subdomains(&self, wallet: &str, source: &str) -> Result<Vec<String>> {
        let list = self.fetch_user_gateways(wallet, source).await?;
        Ok(list
            .data
            .into_iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.subdomain)
            .collect())
    }

    /// Returns the gateway identifiers of the user's active gateways, in
    /// response order.
    #[instrument(skip(self))]
    pub async fn get_user_gateways(&self, wallet: &str, source: &str) -> Result<Vec<String>> {
        let list = self.fetch_user_gateways(wallet, source).await?;
        Ok(list
            .data
            .into_iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.gateway)
            .collect())
    }

    /// Resolves the file server holding `cid`. An empty response body is an
    /// explicit error rather than a silently zero-valued decode.
    #[instrument(skip(self))]
    pub async fn get_ipfs_file_server(&self, cid: &str) -> Result<FileServerData> {
        let response = self
            .request(ENDPOINT_FILE_SERVER)
            .option(OPT_IPFS_CID, cid)
            .get()
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| McsError::Http(e.to_string()))?;
        if body.is_empty() {
            return Err(McsError::EmptyResponse(
                "file server response body is empty".into(),
            ));
        }

        let decoded: FileServerResponse = serde_json::from_slice(&body)?;
        decoded.data.ok_or_else(|| {
            McsError::EmptyResponse("file server response carries no data".into())
        })
    }

    async fn fetch_user_gateways(
        &self,
        wallet: &str,
        source: &str,
    ) -> Result<GatewayListResponse> {
        let response = self
            .request(ENDPOINT_USER_GATEWAY)
            .option(OPT_WALLET, wallet)
            .option(OPT_SOURCE, source)
            .get()
            .await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| McsError::Http(e.to_string()))?;
        let list: GatewayListResponse = serde_json::from_slice(&body)?;
        debug!(entries = list.data.len(), "fetched user gateway list");
        Ok(list)
    }
}
