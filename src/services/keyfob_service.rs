//! Keyfob registry - lifecycle of physical access badges.
//!
//! This service handles:
//! - Initializing new fobs (key only, unattached, enabled)
//! - Attaching and detaching users
//! - Rekeying a fob in place
//! - Disabling a fob permanently
//! - Listing fobs that are still in service
//!
//! Fobs are never deleted. Concurrent attach/detach calls on the same fob are
//! last-writer-wins; the database serializes them, this code does not.

use crate::{error::AppError, models::keyfob::Keyfob, store::KeyfobStore};

/// Create a new keyfob for a physical badge code.
///
/// # Errors
///
/// - `InvalidRequest`: `keyfob_key` is zero or negative
/// - `Database`: Database error occurred
///
/// Duplicate keys are accepted.
pub async fn initialize<S>(store: &S, keyfob_key: i64) -> Result<i64, AppError>
where
    S: KeyfobStore + ?Sized,
{
    validate_key(keyfob_key)?;

    let keyfob_id = store.insert_keyfob(keyfob_key).await?;
    tracing::info!(keyfob_id, keyfob_key, "keyfob initialized");

    Ok(keyfob_id)
}

/// Attach a user to a keyfob, replacing any previous attachment.
///
/// Re-attaching the same user is a no-op. No attachment history is kept.
///
/// # Errors
///
/// - `KeyfobNotFound`: No keyfob with this id
/// - `Database`: Database error occurred
pub async fn attach<S>(store: &S, user_id: i64, keyfob_id: i64) -> Result<(), AppError>
where
    S: KeyfobStore + ?Sized,
{
    if !store.set_attached_user(keyfob_id, Some(user_id)).await? {
        return Err(AppError::KeyfobNotFound);
    }

    tracing::info!(keyfob_id, user_id, "user attached to keyfob");
    Ok(())
}

/// Clear the attached user. Idempotent.
pub async fn detach<S>(store: &S, keyfob_id: i64) -> Result<(), AppError>
where
    S: KeyfobStore + ?Sized,
{
    if !store.set_attached_user(keyfob_id, None).await? {
        return Err(AppError::KeyfobNotFound);
    }

    tracing::info!(keyfob_id, "user detached from keyfob");
    Ok(())
}

/// Overwrite the physical key of an existing keyfob. The registry id is kept.
///
/// # Errors
///
/// - `InvalidRequest`: `new_key` is zero or negative
/// - `KeyfobNotFound`: No keyfob with this id
/// - `Database`: Database error occurred
pub async fn rekey<S>(store: &S, keyfob_id: i64, new_key: i64) -> Result<(), AppError>
where
    S: KeyfobStore + ?Sized,
{
    validate_key(new_key)?;

    if !store.set_keyfob_key(keyfob_id, new_key).await? {
        return Err(AppError::KeyfobNotFound);
    }

    tracing::info!(keyfob_id, new_key, "keyfob rekeyed");
    Ok(())
}

/// Take a keyfob out of service. There is no way back.
pub async fn disable<S>(store: &S, keyfob_id: i64) -> Result<(), AppError>
where
    S: KeyfobStore + ?Sized,
{
    if !store.disable_keyfob(keyfob_id).await? {
        return Err(AppError::KeyfobNotFound);
    }

    tracing::info!(keyfob_id, "keyfob disabled");
    Ok(())
}

/// All keyfobs that are not disabled, with attached user display fields.
pub async fn list_active<S>(store: &S) -> Result<Vec<Keyfob>, AppError>
where
    S: KeyfobStore + ?Sized,
{
    Ok(store.list_active_keyfobs().await?)
}

fn validate_key(keyfob_key: i64) -> Result<(), AppError> {
    if keyfob_key <= 0 {
        return Err(AppError::InvalidRequest(
            "keyfob key must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, UserRow};

    fn farmer() -> UserRow {
        UserRow {
            first_name: "Bert".to_string(),
            last_name: Some("Boer".to_string()),
            affix: Some("de".to_string()),
            role: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn initialize_creates_unattached_enabled_fob() {
        let store = MemoryStore::new();

        let keyfob_id = initialize(&store, 7235).await.unwrap();

        let keyfob = store.keyfob(keyfob_id).await.unwrap();
        assert_eq!(keyfob.keyfob_key, 7235);
        assert_eq!(keyfob.attached_user_id, None);
        assert!(!keyfob.disabled);
    }

    #[tokio::test]
    async fn initialize_rejects_non_positive_keys() {
        let store = MemoryStore::new();

        assert!(matches!(
            initialize(&store, 0).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            initialize(&store, -5).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(store.list_active_keyfobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_keys_are_accepted() {
        let store = MemoryStore::new();

        let first = initialize(&store, 1111).await.unwrap();
        let second = initialize(&store, 1111).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(list_active(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn attach_overwrites_previous_user() {
        let store = MemoryStore::new();
        let keyfob_id = initialize(&store, 7235).await.unwrap();

        attach(&store, 7, keyfob_id).await.unwrap();
        attach(&store, 7, keyfob_id).await.unwrap();
        assert_eq!(
            store.keyfob(keyfob_id).await.unwrap().attached_user_id,
            Some(7)
        );

        attach(&store, 8, keyfob_id).await.unwrap();
        assert_eq!(
            store.keyfob(keyfob_id).await.unwrap().attached_user_id,
            Some(8)
        );
    }

    #[tokio::test]
    async fn attach_to_unknown_keyfob_is_not_found() {
        let store = MemoryStore::new();

        assert!(matches!(
            attach(&store, 7, 404).await,
            Err(AppError::KeyfobNotFound)
        ));
    }

    #[tokio::test]
    async fn detach_attach_detach_leaves_fob_unattached() {
        let store = MemoryStore::new();
        let keyfob_id = initialize(&store, 7235).await.unwrap();

        detach(&store, keyfob_id).await.unwrap();
        attach(&store, 7, keyfob_id).await.unwrap();
        detach(&store, keyfob_id).await.unwrap();
        detach(&store, keyfob_id).await.unwrap();

        assert_eq!(
            store.keyfob(keyfob_id).await.unwrap().attached_user_id,
            None
        );
    }

    #[tokio::test]
    async fn rekey_keeps_registry_id() {
        let store = MemoryStore::new();
        store.insert_keyfob_with_id(42, 7235).await;

        rekey(&store, 42, 99999).await.unwrap();

        let keyfobs = list_active(&store).await.unwrap();
        let keyfob = keyfobs.iter().find(|k| k.keyfob_id == 42).unwrap();
        assert_eq!(keyfob.keyfob_key, 99999);
    }

    #[tokio::test]
    async fn rekey_validates_key_and_existence() {
        let store = MemoryStore::new();
        store.insert_keyfob_with_id(42, 7235).await;

        assert!(matches!(
            rekey(&store, 42, 0).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            rekey(&store, 43, 1234).await,
            Err(AppError::KeyfobNotFound)
        ));
        assert_eq!(store.keyfob(42).await.unwrap().keyfob_key, 7235);
    }

    #[tokio::test]
    async fn disabled_fobs_are_hidden_from_listing() {
        let store = MemoryStore::new();
        let kept = initialize(&store, 1000).await.unwrap();
        let retired = initialize(&store, 2000).await.unwrap();
        attach(&store, 7, retired).await.unwrap();

        disable(&store, retired).await.unwrap();
        disable(&store, retired).await.unwrap();

        let ids: Vec<i64> = list_active(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.keyfob_id)
            .collect();
        assert_eq!(ids, vec![kept]);
        assert!(store.keyfob(retired).await.unwrap().disabled);
    }

    #[tokio::test]
    async fn listing_joins_attached_user() {
        let store = MemoryStore::new();
        store.insert_user(7, farmer()).await;
        let keyfob_id = initialize(&store, 7235).await.unwrap();
        attach(&store, 7, keyfob_id).await.unwrap();

        let keyfob = list_active(&store).await.unwrap().remove(0);
        assert_eq!(keyfob.first_name.as_deref(), Some("Bert"));
        assert_eq!(keyfob.affix.as_deref(), Some("de"));
        assert_eq!(keyfob.role.as_deref(), Some("admin"));
    }
}
