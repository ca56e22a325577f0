// Credential Store Port (Interface)

use crate::error::Result;
use crate::port::presence_client::PresenceCredential;
use async_trait::async_trait;

/// Lookup of linked presence credentials by owner.
///
/// Linking happens in the OAuth flow outside this core; the delivery handler
/// only ever reads.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The owner's presence credential, or None if never linked
    async fn find_presence_credential(&self, owner_id: &str)
        -> Result<Option<PresenceCredential>>;

    /// Store (or replace) an owner's presence credential
    async fn link_presence_credential(&self, credential: &PresenceCredential) -> Result<()>;
}
