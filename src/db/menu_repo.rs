use weekmenu_core::MenuStore;

use super::{KvEntry, KvError, KvRepository};

/// Loads and saves the menu store as one JSON blob under a single key.
pub struct MenuRepository {
    kv: KvRepository,
    key: String,
}

impl MenuRepository {
    pub fn new(kv: KvRepository, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored text, if anything was saved yet.
    pub async fn raw(&self) -> Result<Option<String>, KvError> {
        self.kv.get(&self.key).await
    }

    /// Raw stored text together with when it was last saved.
    pub async fn raw_entry(&self) -> Result<Option<KvEntry>, KvError> {
        self.kv.get_entry(&self.key).await
    }

    /// Loads the store through the migration engine. Nothing saved yet means
    /// the built-in defaults.
    pub async fn load(&self) -> Result<MenuStore, KvError> {
        Ok(match self.raw().await? {
            Some(text) => MenuStore::from_json(&text),
            None => {
                tracing::debug!(key = %self.key, "No saved menu, starting from defaults");
                MenuStore::new()
            }
        })
    }

    pub async fn save(&self, store: &MenuStore) -> Result<(), KvError> {
        let text = store.to_json()?;
        self.kv.put(&self.key, &text).await
    }

    pub async fn clear(&self) -> Result<bool, KvError> {
        self.kv.delete(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::tempdir;
    use weekmenu_core::NewDish;

    async fn setup() -> (MenuRepository, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let pool = init_db(&temp_dir.path().join("menu.db")).await.unwrap();
        (MenuRepository::new(KvRepository::new(pool), "menu-storage"), temp_dir)
    }

    #[tokio::test]
    async fn test_load_empty_gives_defaults() {
        let (repo, _dir) = setup().await;
        let store = repo.load().await.unwrap();
        assert_eq!(store.persisted(), MenuStore::new().persisted());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (repo, _dir) = setup().await;
        let mut store = repo.load().await.unwrap();
        assert!(store.add_dish("葱油拌面", NewDish::with_tags(["主食"])));
        repo.save(&store).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.persisted(), store.persisted());
        assert!(repo.raw().await.unwrap().unwrap().contains("葱油拌面"));
    }

    #[tokio::test]
    async fn test_load_migrates_legacy_blob() {
        let (repo, _dir) = setup().await;
        repo.kv
            .put("menu-storage", r##"{"tags": ["大荤"], "backgroundColor": "#000000"}"##)
            .await
            .unwrap();

        let store = repo.load().await.unwrap();
        assert_eq!(store.tags().len(), 1);
        assert_eq!(store.background().color, "#000000");
    }

    #[tokio::test]
    async fn test_raw_entry_carries_save_time() {
        let (repo, _dir) = setup().await;
        assert!(repo.raw_entry().await.unwrap().is_none());

        repo.save(&MenuStore::new()).await.unwrap();
        let entry = repo.raw_entry().await.unwrap().unwrap();
        assert!(entry.value.contains("weeklyMenu"));
        assert!(entry.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let (repo, _dir) = setup().await;
        repo.save(&MenuStore::new()).await.unwrap();
        assert!(repo.clear().await.unwrap());
        assert!(repo.raw().await.unwrap().is_none());
    }
}
