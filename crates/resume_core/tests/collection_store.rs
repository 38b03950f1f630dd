use resume_core::open_vault_in_memory;
use resume_core::store::collection::{ProjectStore, SkillNameStore};
use resume_core::store::collection_names;
use resume_core::{
    BaseEntity, CollectionStore, KeyValueStore, Project, SkillName, SqliteKeyValueStore,
    StoreError,
};
use serde_json::{json, Value};

fn project(id: &str, name: &str) -> Project {
    Project {
        base: BaseEntity::new(id, true),
        project_name: name.to_string(),
        project_details: String::new(),
    }
}

fn stored_json(storage: &dyn KeyValueStore, key: &str) -> Value {
    serde_json::from_str(&storage.get(key).unwrap().unwrap()).unwrap()
}

#[test]
fn add_persists_before_returning() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);

    store.add_item(project("p1", "Compiler")).unwrap();

    let stored = stored_json(&storage, "projects");
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["id"], "p1");
    assert_eq!(stored[0]["projectName"], "Compiler");
    assert_eq!(stored[0]["included"], true);
}

#[test]
fn add_rejects_duplicate_id() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);

    store.add_item(project("p1", "Compiler")).unwrap();
    let err = store.add_item(project("p1", "Other")).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { collection: "projects", .. }));
    assert_eq!(store.len(), 1);
}

#[test]
fn update_replaces_matching_record_and_ignores_unknown_id() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    store.add_item(project("p1", "Compiler")).unwrap();

    let mut edited = store.get("p1").unwrap().clone();
    edited.project_details = "Self-hosting".to_string();
    assert!(store.update_item(edited).unwrap());
    assert!(!store.update_item(project("missing", "Ghost")).unwrap());

    assert_eq!(store.len(), 1);
    let stored = stored_json(&storage, "projects");
    assert_eq!(stored[0]["projectDetails"], "Self-hosting");
}

#[test]
fn delete_persists_even_without_match() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::new(&storage, collection_names::PROJECTS);

    assert_eq!(storage.get("projects").unwrap(), None);
    store.delete_item("nothing").unwrap();
    assert_eq!(storage.get("projects").unwrap().as_deref(), Some("[]"));

    store.add_item(project("p1", "A")).unwrap();
    store.add_item(project("p2", "B")).unwrap();
    store.delete_item("p1").unwrap();
    let ids: Vec<&str> = store.items().iter().map(|item| item.base.id.as_str()).collect();
    assert_eq!(ids, vec!["p2"]);
}

#[test]
fn create_id_is_unique() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let store: ProjectStore = CollectionStore::new(&storage, collection_names::PROJECTS);

    let first = store.create_id();
    let second = store.create_id();
    assert_ne!(first, second);
    assert_eq!(first.len(), 36);
}

#[test]
fn set_included_toggles_flag() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    store.add_item(project("p1", "A")).unwrap();

    assert!(store.set_included("p1", false).unwrap());
    assert!(!store.set_included("missing", false).unwrap());
    assert!(!store.get("p1").unwrap().base.included);
    assert_eq!(stored_json(&storage, "projects")[0]["included"], false);
}

#[test]
fn malformed_storage_resets_to_empty() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);

    for corrupt in ["{not json", "{\"id\":\"p1\"}", "[{\"projectName\":\"no id\"}]"] {
        storage.set("projects", corrupt).unwrap();
        let store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
        assert!(store.is_empty(), "expected reset for `{corrupt}`");
    }
}

#[test]
fn load_normalizes_legacy_embedded_tags_and_revives_dates() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let legacy = json!([{
        "id": "s1",
        "createDate": "2024-03-01T12:30:00.250Z",
        "tags": ["t1", {"id": "t2", "tagName": "Backend"}, {"id": "t1", "tagName": "Dup"}],
        "included": true,
        "skillName": "Rust",
        "associatedSkillTypeNames": ["Languages"]
    }]);
    storage.set("skillNames", &legacy.to_string()).unwrap();

    let store: SkillNameStore = CollectionStore::open(&storage, collection_names::SKILL_NAMES);
    let skill: &SkillName = store.get("s1").unwrap();
    assert_eq!(skill.base.tags, vec!["t1".to_string(), "t2".to_string()]);
    assert_eq!(
        skill.base.create_date.to_rfc3339(),
        "2024-03-01T12:30:00.250+00:00"
    );

    store.save_to_storage().unwrap();
    let rewritten = stored_json(&storage, "skillNames");
    assert_eq!(rewritten[0]["tags"], json!(["t1", "t2"]));
    assert_eq!(rewritten[0]["createDate"], "2024-03-01T12:30:00.250Z");
}

#[test]
fn load_tolerates_missing_base_fields() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    storage
        .set("projects", r#"[{"id":"p1","projectName":"Bare","createDate":1709296200000}]"#)
        .unwrap();

    let store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    let loaded = store.get("p1").unwrap();
    assert!(loaded.base.tags.is_empty());
    assert!(!loaded.base.included);
    assert_eq!(loaded.project_details, "");
    assert_eq!(loaded.base.create_date.timestamp_millis(), 1_709_296_200_000);
}

#[test]
fn write_then_read_round_trip_preserves_timestamps_and_tags() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);

    let mut first = project("p1", "A");
    first.base.tags = vec!["t1".to_string(), "t2".to_string()];
    store.add_item(first).unwrap();
    store.add_item(project("p2", "B")).unwrap();
    let before: Vec<Project> = store.items().to_vec();

    let reloaded: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    assert_eq!(reloaded.items(), before.as_slice());

    let first_raw = storage.get("projects").unwrap().unwrap();
    reloaded.save_to_storage().unwrap();
    assert_eq!(storage.get("projects").unwrap().unwrap(), first_raw);
}

#[test]
fn legacy_null_fields_do_not_drop_the_collection() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let stored = json!([
        {"id": "p1", "createDate": "2024-01-01T00:00:00.000Z", "tags": [], "included": true,
         "projectName": "Keep me", "projectDetails": ""},
        {"id": "p2", "createDate": "2024-01-02T00:00:00.000Z", "tags": null, "included": null,
         "projectName": "Legacy", "projectDetails": null}
    ]);
    storage.set("projects", &stored.to_string()).unwrap();

    let mut store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    assert_eq!(store.len(), 2);
    assert!(!store.get("p2").unwrap().base.included);

    store.delete_item("nothing").unwrap();
    let rewritten = stored_json(&storage, "projects");
    assert_eq!(rewritten.as_array().unwrap().len(), 2);
    assert_eq!(rewritten[0]["projectName"], "Keep me");
    assert_eq!(rewritten[1]["included"], false);
}

#[test]
fn unreadable_record_is_skipped_and_rest_survive() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let stored = json!([
        {"id": "p1", "projectName": "Keep me"},
        {"projectName": "missing id"},
        {"id": "p3", "projectName": "Also kept"}
    ]);
    storage.set("projects", &stored.to_string()).unwrap();

    let store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    let names: Vec<&str> = store.items().iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(names, vec!["Keep me", "Also kept"]);
}

#[test]
fn sub_millisecond_timestamps_are_stable_after_one_cycle() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    storage
        .set(
            "projects",
            r#"[{"id":"p1","createDate":"2024-03-01T12:30:00.250123Z","projectName":"A"}]"#,
        )
        .unwrap();

    let store: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    store.save_to_storage().unwrap();
    let first_write = storage.get("projects").unwrap().unwrap();
    assert_eq!(stored_json(&storage, "projects")[0]["createDate"], "2024-03-01T12:30:00.250Z");

    let reloaded: ProjectStore = CollectionStore::open(&storage, collection_names::PROJECTS);
    assert_eq!(reloaded.items(), store.items());
    reloaded.save_to_storage().unwrap();
    assert_eq!(storage.get("projects").unwrap().unwrap(), first_write);
}
