use serde_json::Value;

use crate::io::kv::{KeyValueStore, StoreError};
use crate::model::view::View;
use crate::ops::view_ops::ViewStore;

pub const VIEWS_KEY: &str = "tasktable.views";
pub const ACTIVE_VIEW_KEY: &str = "tasktable.activeViewId";
pub const DEFAULT_VIEW_KEY: &str = "tasktable.defaultViewId";

/// Load the saved views. Anything missing or unreadable falls back to the
/// single default view; the failure is logged, never returned.
pub fn load_view_store(kv: &dyn KeyValueStore) -> ViewStore {
    let views = match kv.get(VIEWS_KEY) {
        Ok(Some(value)) => match serde_json::from_value::<Vec<View>>(value) {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!(key = VIEWS_KEY, error = %e, "discarding unparsable views");
                return ViewStore::default();
            }
        },
        Ok(None) => return ViewStore::default(),
        Err(e) => {
            tracing::warn!(key = VIEWS_KEY, error = %e, "could not read views");
            return ViewStore::default();
        }
    };
    let active = read_id(kv, ACTIVE_VIEW_KEY);
    let default = read_id(kv, DEFAULT_VIEW_KEY);
    ViewStore::from_parts(views, active, default)
}

fn read_id(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(Some(Value::String(id))) => Some(id),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read view id");
            None
        }
    }
}

/// Write all three keys. A missing default view id removes its key.
pub fn save_view_store(kv: &mut dyn KeyValueStore, store: &ViewStore) -> Result<(), StoreError> {
    kv.set(VIEWS_KEY, serde_json::to_value(store.views())?)?;
    kv.set(
        ACTIVE_VIEW_KEY,
        Value::String(store.active_view_id().to_string()),
    )?;
    match store.default_view_id() {
        Some(id) => kv.set(DEFAULT_VIEW_KEY, Value::String(id.to_string()))?,
        None => kv.remove(DEFAULT_VIEW_KEY)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::model::view::DEFAULT_VIEW_NAME;
    use serde_json::json;

    #[test]
    fn empty_store_loads_default_view() {
        let kv = MemoryStore::new();
        let store = load_view_store(&kv);
        assert_eq!(store.views().len(), 1);
        assert_eq!(store.active_view().name, DEFAULT_VIEW_NAME);
    }

    #[test]
    fn garbage_views_fall_back_to_default() {
        let mut kv = MemoryStore::new();
        kv.set(VIEWS_KEY, json!({"not": "a list"})).unwrap();
        let store = load_view_store(&kv);
        assert_eq!(store, ViewStore::default());
    }

    #[test]
    fn unavailable_store_falls_back_to_default() {
        let kv = MemoryStore::failing();
        assert_eq!(load_view_store(&kv), ViewStore::default());
    }

    #[test]
    fn save_then_load_preserves_views_and_pointers() {
        let mut store = ViewStore::default();
        let id = store.create_view("Mine");
        store.set_search_query("design");
        store.set_default_view(&id);

        let mut kv = MemoryStore::new();
        save_view_store(&mut kv, &store).unwrap();
        let loaded = load_view_store(&kv);

        assert_eq!(loaded.views(), store.views());
        assert_eq!(loaded.active_view_id(), id);
        assert_eq!(loaded.default_view_id(), Some(id.as_str()));
        assert_eq!(loaded.active_view().search_query, "design");
    }

    #[test]
    fn unknown_active_id_falls_back_to_first_view() {
        let mut kv = MemoryStore::new();
        save_view_store(&mut kv, &ViewStore::default()).unwrap();
        kv.set(ACTIVE_VIEW_KEY, json!("deleted-elsewhere")).unwrap();
        let loaded = load_view_store(&kv);
        assert_eq!(loaded.active_view_id(), "table");
    }

    #[test]
    fn views_use_camel_case_keys() {
        let mut kv = MemoryStore::new();
        save_view_store(&mut kv, &ViewStore::default()).unwrap();
        let raw = kv.get(VIEWS_KEY).unwrap().unwrap();
        let first = &raw[0];
        assert_eq!(first["showGridLines"], json!(true));
        assert_eq!(first["searchQuery"], json!(""));
        assert_eq!(first["columns"][0]["id"], json!("name"));
    }
}
