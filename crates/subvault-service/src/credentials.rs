//! Personal credential lookup.
//!
//! A stored credential that cannot be decrypted is reported as
//! [`StoredCredential::DecodeFailed`] and then treated exactly like no credential:
//! the user falls back to the free tier and the server default key.

use std::sync::Arc;

use subvault_core::{UserId, UserProfile};
use subvault_store::{Store, StoreError};

use crate::crypto::{CipherError, CredentialCipher};

/// Outcome of reading a user's personal credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCredential {
    /// A credential was stored and decrypted.
    Present(String),
    /// No profile, or no credential on it.
    Absent,
    /// A credential was stored but could not be decrypted.
    DecodeFailed(CipherError),
}

impl StoredCredential {
    /// Whether a usable credential is available.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The plaintext credential; `DecodeFailed` collapses to `None`.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Present(key) => Some(key),
            Self::Absent | Self::DecodeFailed(_) => None,
        }
    }
}

/// Reads and decrypts personal credentials from the profile store.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn Store>,
    cipher: CredentialCipher,
}

impl CredentialResolver {
    /// Create a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, cipher: CredentialCipher) -> Self {
        Self { store, cipher }
    }

    /// Look up the user's credential, keeping the reason it may be unusable.
    ///
    /// # Errors
    ///
    /// Returns an error only if the profile store fails.
    pub async fn lookup(&self, user_id: &UserId) -> Result<StoredCredential, StoreError> {
        let profile = self.store.get_profile(user_id).await?;
        let credential = self.open(profile.as_ref());

        if let StoredCredential::DecodeFailed(err) = &credential {
            tracing::warn!(
                user_id = %user_id,
                error = %err,
                "Stored API key is unreadable - treating as absent"
            );
        }

        Ok(credential)
    }

    /// The user's plaintext credential, if one is stored and readable.
    ///
    /// # Errors
    ///
    /// Returns an error only if the profile store fails.
    pub async fn resolve(&self, user_id: &UserId) -> Result<Option<String>, StoreError> {
        Ok(self.lookup(user_id).await?.into_option())
    }

    /// Decrypt the credential on an already-loaded profile.
    #[must_use]
    pub fn open(&self, profile: Option<&UserProfile>) -> StoredCredential {
        let Some(encrypted) = profile.and_then(UserProfile::stored_api_key) else {
            return StoredCredential::Absent;
        };

        match self.cipher.decrypt(encrypted) {
            Ok(key) => StoredCredential::Present(key),
            Err(err) => StoredCredential::DecodeFailed(err),
        }
    }

    /// Encrypt a credential for storage.
    #[must_use]
    pub fn seal(&self, plaintext: &str) -> String {
        self.cipher.encrypt(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subvault_store::MemoryStore;

    fn resolver() -> (CredentialResolver, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let resolver = CredentialResolver::new(store.clone(), CredentialCipher::new("test"));
        (resolver, store)
    }

    #[tokio::test]
    async fn no_profile_is_absent() {
        let (resolver, _store) = resolver();
        let credential = resolver.lookup(&UserId::generate()).await.unwrap();
        assert_eq!(credential, StoredCredential::Absent);
    }

    #[tokio::test]
    async fn sealed_credential_resolves() {
        let (resolver, store) = resolver();
        let user_id = UserId::generate();
        let mut profile = UserProfile::new(user_id, None);
        profile.set_api_key(resolver.seal("personal-key"));
        store.put_profile(&profile).await.unwrap();

        assert_eq!(
            resolver.resolve(&user_id).await.unwrap().as_deref(),
            Some("personal-key")
        );
    }

    #[tokio::test]
    async fn unreadable_credential_fails_open() {
        let (resolver, store) = resolver();
        let user_id = UserId::generate();
        let mut profile = UserProfile::new(user_id, None);
        profile.set_api_key("garbage-without-separator".into());
        store.put_profile(&profile).await.unwrap();

        let credential = resolver.lookup(&user_id).await.unwrap();
        assert_eq!(
            credential,
            StoredCredential::DecodeFailed(CipherError::InvalidFormat)
        );
        assert!(!credential.is_present());
        assert_eq!(resolver.resolve(&user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn credential_from_other_secret_fails_open() {
        let (resolver, store) = resolver();
        let user_id = UserId::generate();
        let mut profile = UserProfile::new(user_id, None);
        profile.set_api_key(CredentialCipher::new("other").encrypt("personal-key"));
        store.put_profile(&profile).await.unwrap();

        let resolved = resolver.resolve(&user_id).await.unwrap();
        assert_ne!(resolved.as_deref(), Some("personal-key"));
    }
}
