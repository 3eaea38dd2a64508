//! Microsoft Graph implementation of the cloud directory interface.

mod auth;
mod client;

pub use auth::TokenCache;
pub use client::{GraphClient, ODataError, ODataErrorBody, ODataResponse};

use async_trait::async_trait;

use crate::config::GraphSettings;
use crate::directory::{AuthMethod, CloudDirectory, DirectoryUser};
use crate::error::ReportResult;

/// User fields to select from the Graph API.
const USER_SELECT_FIELDS: &str = "id,userPrincipalName";

/// Users per page for the enumeration query.
const PAGE_SIZE: u32 = 999;

/// Cloud directory backed by the Microsoft Graph API.
pub struct GraphDirectory {
    client: GraphClient,
}

impl GraphDirectory {
    /// Creates a directory client from validated settings.
    ///
    /// The OAuth2 session is owned by this value; dropping it releases the
    /// cached token with it.
    pub fn new(settings: GraphSettings) -> ReportResult<Self> {
        let token_cache = TokenCache::new(
            settings.client_id,
            settings.client_secret,
            settings.tenant_id,
            settings.login_endpoint,
            settings.graph_endpoint.clone(),
        );

        let client = GraphClient::new(token_cache, settings.graph_endpoint, "v1.0".to_string())?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CloudDirectory for GraphDirectory {
    async fn list_users(&self) -> ReportResult<Vec<DirectoryUser>> {
        let url = format!(
            "{}/users?$select={}&$top={}",
            self.client.base_url(),
            USER_SELECT_FIELDS,
            PAGE_SIZE
        );

        self.client.get_all_pages(&url).await
    }

    async fn list_auth_methods(
        &self,
        user_principal_name: &str,
    ) -> ReportResult<Vec<AuthMethod>> {
        let url = format!(
            "{}/users/{}/authentication/methods",
            self.client.base_url(),
            urlencoding::encode(user_principal_name)
        );

        self.client.get_all_pages(&url).await
    }
}
