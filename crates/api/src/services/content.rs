//! Content mutation services: catalog writes plus the storage cleanup
//! that has to accompany them.
//!
//! Catalog rows are the source of truth. Stored objects are cleaned up
//! on a best-effort basis: a failed storage delete is logged and skipped
//! so an unreachable bucket can never block removing content from the
//! catalog (orphaned objects cost pennies; stuck deletes cost trust).

use dapparchive_core::error::CoreError;
use dapparchive_core::types::DbId;
use dapparchive_db::models::dapp::{CreateDapp, Dapp};
use dapparchive_db::models::image::{CreateImage, Image, UpdateImage};
use dapparchive_db::repositories::dapp_repo::DappRepo;
use dapparchive_db::repositories::image_repo::ImageRepo;
use dapparchive_db::DataAccess;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::storage::ObjectStorage;

/// Objects per storage delete request.
pub const STORAGE_DELETE_BATCH: usize = 100;

/// Create a dapp. The slug is pre-checked for a friendly 409; the unique
/// constraint remains the backstop against races.
pub async fn create_dapp(data: &DataAccess, input: &CreateDapp) -> AppResult<Dapp> {
    input.validate().map_err(|e| AppError::validation(&e))?;

    let existing = data
        .write("find_dapp_by_slug", |pool| {
            let slug = input.slug.clone();
            async move { DappRepo::find_by_slug(&pool, &slug).await }
        })
        .await?;
    if existing.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A dapp with this slug already exists".into(),
        )));
    }

    let dapp = data
        .write("create_dapp", |pool| {
            let input = input.clone();
            async move { DappRepo::create(&pool, &input).await }
        })
        .await?;
    tracing::info!(dapp_id = dapp.id, slug = %dapp.slug, "Created dapp");
    Ok(dapp)
}

/// Delete a dapp, its database cascade (images, flows, steps), and the
/// stored screenshot objects.
pub async fn delete_dapp(
    data: &DataAccess,
    storage: &dyn ObjectStorage,
    id: DbId,
) -> AppResult<()> {
    let entry = data
        .write("load_dapp_for_delete", |pool| async move {
            DappRepo::find_by_id_with_images(&pool, id).await
        })
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Dapp",
            key: id.to_string(),
        })?;

    let paths: Vec<String> = entry
        .images
        .iter()
        .filter_map(|img| storage_path_from_url(id, &img.url))
        .collect();
    delete_stored_objects(storage, &paths).await;

    let deleted = data
        .write("delete_dapp", |pool| async move {
            DappRepo::delete(&pool, id).await
        })
        .await?;
    if !deleted {
        // Row disappeared between the load and the delete.
        tracing::warn!(dapp_id = id, "Dapp already deleted");
    } else {
        tracing::info!(dapp_id = id, images = entry.images.len(), "Deleted dapp");
    }
    Ok(())
}

/// Create an image record for an already-stored screenshot.
pub async fn create_image(data: &DataAccess, input: &CreateImage) -> AppResult<Image> {
    input.validate().map_err(|e| AppError::validation(&e))?;

    let dapp_id = input.dapp_id;
    let dapp = data
        .write("find_dapp", |pool| async move {
            DappRepo::find_by_id(&pool, dapp_id).await
        })
        .await?;
    if dapp.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Dapp",
            key: dapp_id.to_string(),
        }));
    }

    let image = data
        .write("create_image", |pool| {
            let input = input.clone();
            async move { ImageRepo::create(&pool, &input).await }
        })
        .await?;
    Ok(image)
}

/// Apply a partial update to an image.
pub async fn update_image(data: &DataAccess, id: DbId, input: &UpdateImage) -> AppResult<Image> {
    data.write("update_image", |pool| {
        let input = input.clone();
        async move { ImageRepo::update(&pool, id, &input).await }
    })
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Image",
            key: id.to_string(),
        })
    })
}

/// Delete an image record and its stored object.
pub async fn delete_image(
    data: &DataAccess,
    storage: &dyn ObjectStorage,
    id: DbId,
) -> AppResult<()> {
    let image = data
        .write("load_image_for_delete", |pool| async move {
            ImageRepo::find_by_id(&pool, id).await
        })
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Image",
            key: id.to_string(),
        })?;

    let paths: Vec<String> = storage_path_from_url(image.dapp_id, &image.url)
        .into_iter()
        .collect();
    delete_stored_objects(storage, &paths).await;

    data.write("delete_image", |pool| async move {
        ImageRepo::delete(&pool, id).await
    })
    .await?;
    tracing::info!(image_id = id, "Deleted image");
    Ok(())
}

/// Derive the bucket-relative object path from a stored public URL.
///
/// Uploads land under `{bucket}/{dapp_id}/{file}`, so the path is rebuilt
/// from the URL's final segment. Returns `None` for external URLs that
/// were never uploaded through this service (nothing to clean up).
pub fn storage_path_from_url(dapp_id: DbId, url: &str) -> Option<String> {
    let (_, tail) = url.split_once(&format!("/{dapp_id}/"))?;
    let file = tail.split('/').next_back()?;
    if file.is_empty() {
        return None;
    }
    Some(format!("{dapp_id}/{file}"))
}

/// Delete stored objects in batches of [`STORAGE_DELETE_BATCH`].
///
/// Returns the number of batches attempted. Failures are logged per
/// batch and never escalate to the caller.
pub async fn delete_stored_objects(storage: &dyn ObjectStorage, paths: &[String]) -> usize {
    let mut batches = 0;
    for chunk in paths.chunks(STORAGE_DELETE_BATCH) {
        batches += 1;
        match storage.delete(chunk).await {
            Ok(results) => {
                for result in results.iter().filter(|r| !r.deleted) {
                    tracing::warn!(path = %result.path, "Stored object was not deleted");
                }
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    batch_len = chunk.len(),
                    "Storage batch delete failed, continuing",
                );
            }
        }
    }
    batches
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::{ObjectDeleteResult, StorageError};

    /// Records every delete batch it receives; optionally fails them all.
    struct RecordingStorage {
        batches: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl RecordingStorage {
        fn new(fail: bool) -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            Ok(self.public_url(path))
        }

        async fn delete(
            &self,
            paths: &[String],
        ) -> Result<Vec<ObjectDeleteResult>, StorageError> {
            self.batches.lock().unwrap().push(paths.to_vec());
            if self.fail {
                return Err(StorageError::HttpStatus(500));
            }
            Ok(paths
                .iter()
                .map(|p| ObjectDeleteResult {
                    path: p.clone(),
                    deleted: true,
                })
                .collect())
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://storage.test/{path}")
        }
    }

    #[test]
    fn storage_path_is_derived_from_upload_urls() {
        let url = "https://proj.supabase.co/storage/v1/object/public/images/7/shot.png";
        assert_eq!(storage_path_from_url(7, url), Some("7/shot.png".to_string()));
    }

    #[test]
    fn external_urls_have_no_storage_path() {
        assert_eq!(
            storage_path_from_url(7, "https://res.cloudinary.com/x/gmx-limit.png"),
            None
        );
        assert_eq!(
            storage_path_from_url(7, "https://proj.supabase.co/images/7/"),
            None
        );
    }

    #[tokio::test]
    async fn deletes_are_batched_by_one_hundred() {
        let storage = RecordingStorage::new(false);
        let paths: Vec<String> = (0..250).map(|i| format!("1/{i}.png")).collect();

        let batches = delete_stored_objects(&storage, &paths).await;

        assert_eq!(batches, 3);
        let recorded = storage.batches.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].len(), 100);
        assert_eq!(recorded[1].len(), 100);
        assert_eq!(recorded[2].len(), 50);
    }

    #[tokio::test]
    async fn failed_batches_do_not_stop_the_sweep() {
        let storage = RecordingStorage::new(true);
        let paths: Vec<String> = (0..150).map(|i| format!("1/{i}.png")).collect();

        let batches = delete_stored_objects(&storage, &paths).await;

        // Both batches attempted despite every one failing.
        assert_eq!(batches, 2);
        assert_eq!(storage.batches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_path_list_skips_storage_entirely() {
        let storage = RecordingStorage::new(false);
        let batches = delete_stored_objects(&storage, &[]).await;
        assert_eq!(batches, 0);
        assert!(storage.batches.lock().unwrap().is_empty());
    }
}
