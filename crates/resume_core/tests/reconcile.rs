use resume_core::open_vault_in_memory;
use resume_core::{
    CollectionCounts, ExtractionPayload, FactKind, ReconciliationEngine, SqliteKeyValueStore,
    StoreRegistry,
};
use serde_json::{json, Value};

fn payload(value: Value) -> ExtractionPayload {
    ExtractionPayload::from_json(&value.to_string()).unwrap()
}

fn full_payload() -> ExtractionPayload {
    payload(json!({
        "person": {"name": "Ada Lovelace", "email": "ada@example.com", "city": "London"},
        "jobs": [{
            "job": {
                "jobTitle": "Engineer",
                "companyName": "Acme",
                "startDate": "2020-01-01",
                "endDate": "2022-06-30",
                "location": "Remote"
            },
            "descriptions": ["Built the billing pipeline", "Mentored two engineers"]
        }],
        "skills": [{"skillName": "Rust", "associatedSkillTypeNames": ["Languages", "Systems"]}],
        "education": [{"schoolName": "MIT", "degreeName": "BS", "startDate": "2012-09-01"}],
        "certifications": [{"orgName": "CNCF", "certName": "CKA", "details": "2023"}],
        "volunteer": [{"orgName": "Food Bank", "details": "Weekend shifts"}],
        "projects": [{"projectName": "resume-vault", "projectDetails": "CLI"}],
        "summaries": [{"summary": "Backend engineer."}]
    }))
}

#[test]
fn end_to_end_single_job_and_skill() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    let report = ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({
            "person": {"email": "a@x.com", "name": "A"},
            "jobs": [{
                "job": {"companyName": "Acme", "startDate": "2020-01-01", "endDate": "2021-01-01", "jobTitle": "Eng"},
                "descriptions": ["Did X"]
            }],
            "skills": [{"skillName": "Go", "associatedSkillTypeNames": ["Languages"]}]
        })))
        .unwrap();

    assert_eq!(
        stores.counts(),
        CollectionCounts {
            persons: 1,
            jobs: 1,
            job_descriptions: 1,
            skill_names: 1,
            skill_types: 1,
            ..CollectionCounts::default()
        }
    );
    assert_eq!(report.total_added(), 5);
    assert_eq!(report.total_skipped(), 0);

    let person = &stores.persons.users()[0];
    assert_eq!(person.email, "a@x.com");
    assert!(person.base.included);

    let job = &stores.jobs.items()[0];
    assert_eq!(job.company_name, "Acme");
    let lines = stores.job_descriptions.descriptions_for(&job.base.id);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].description, "Did X");
    assert!(!lines[0].checked);

    assert_eq!(stores.skill_names.items()[0].skill_name, "Go");
    let skill_type = &stores.skill_types.items()[0];
    assert_eq!(skill_type.skill_type_name, "Languages");
    assert_eq!(skill_type.associated_skill_names, vec!["Go".to_string()]);
}

#[test]
fn reimporting_same_payload_adds_nothing() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let payload = full_payload();

    let first = ReconciliationEngine::new(&mut stores).reconcile(&payload).unwrap();
    let after_first = stores.counts();
    assert_eq!(
        after_first,
        CollectionCounts {
            persons: 1,
            jobs: 1,
            job_descriptions: 2,
            skill_names: 1,
            skill_types: 2,
            education: 1,
            certifications: 1,
            volunteers: 1,
            projects: 1,
            summaries: 1,
            tags: 0,
        }
    );
    assert_eq!(first.total_added(), 12);

    let second = ReconciliationEngine::new(&mut stores).reconcile(&payload).unwrap();
    assert_eq!(second.total_added(), 0);
    assert_eq!(second.total_skipped(), 8);
    assert_eq!(stores.counts(), after_first);

    let mut reopened = StoreRegistry::open(&storage);
    assert_eq!(reopened.counts(), after_first);
    let third = ReconciliationEngine::new(&mut reopened).reconcile(&payload).unwrap();
    assert_eq!(third.total_added(), 0);
    assert_eq!(reopened.counts(), after_first);
}

#[test]
fn person_without_email_is_not_created() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    let report = ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({"person": {"name": "No Email", "email": ""}})))
        .unwrap();

    assert_eq!(report.skipped(FactKind::Person), 1);
    assert!(stores.persons.users().is_empty());
}

#[test]
fn existing_email_keeps_first_person() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let mut engine = ReconciliationEngine::new(&mut stores);

    engine
        .reconcile(&payload(json!({"person": {"name": "First", "email": "same@x.io"}})))
        .unwrap();
    engine
        .reconcile(&payload(json!({"person": {"name": "Second", "email": "same@x.io"}})))
        .unwrap();

    assert_eq!(stores.persons.users().len(), 1);
    assert_eq!(stores.persons.users()[0].name, "First");
}

#[test]
fn supplied_person_id_is_kept() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    let report = ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({"person": {"id": "person-42", "email": "a@x.com", "name": "A"}})))
        .unwrap();

    assert_eq!(report.added(FactKind::Person), 1);
    let ids: Vec<&str> = stores
        .persons
        .users()
        .iter()
        .map(|person| person.base.id.as_str())
        .collect();
    assert_eq!(ids, vec!["person-42"]);
    assert!(stores.persons.get("person-42").unwrap().base.included);

    let reopened = StoreRegistry::open(&storage);
    assert_eq!(reopened.persons.get("person-42").unwrap().email, "a@x.com");
}

#[test]
fn supplied_person_id_replaces_record_with_same_id() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let existing = stores.persons.create_user().unwrap();

    ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({"person": {"id": existing.base.id.as_str(), "email": "new@x.com", "name": "B"}})))
        .unwrap();

    assert_eq!(stores.persons.users().len(), 1);
    let stored = stores.persons.get(&existing.base.id).unwrap();
    assert_eq!(stored.email, "new@x.com");
    assert_eq!(stored.name, "B");
}

#[test]
fn blank_person_id_allocates_a_new_one() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({"person": {"id": " ", "email": "a@x.com"}})))
        .unwrap();

    let person = &stores.persons.users()[0];
    assert_eq!(person.base.id.len(), 36);
}

#[test]
fn first_writer_wins_on_job_title() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let job = |title: &str| {
        payload(json!({"jobs": [{"job": {
            "jobTitle": title, "companyName": "Acme",
            "startDate": "2020-01-01", "endDate": "2021-01-01"
        }, "descriptions": ["Shipped"]}]}))
    };

    ReconciliationEngine::new(&mut stores).reconcile(&job("Engineer")).unwrap();
    let report = ReconciliationEngine::new(&mut stores)
        .reconcile(&job("Senior Engineer"))
        .unwrap();

    assert_eq!(report.skipped(FactKind::Job), 1);
    assert_eq!(report.added(FactKind::JobDescription), 0);
    assert_eq!(stores.jobs.len(), 1);
    assert_eq!(stores.jobs.items()[0].job_title, "Engineer");
    assert_eq!(stores.job_descriptions.len(), 1);
}

#[test]
fn job_key_ignores_title_and_location() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let mut engine = ReconciliationEngine::new(&mut stores);

    engine
        .reconcile(&payload(json!({"jobs": [{"job": {
            "jobTitle": "Engineer", "companyName": "Acme", "location": "Berlin",
            "startDate": "2019-03-01"
        }}]})))
        .unwrap();
    let same_key = engine
        .reconcile(&payload(json!({"jobs": [{"job": {
            "jobTitle": "Staff Engineer", "companyName": "Acme", "location": "Remote",
            "startDate": "2019-03-01", "endDate": "present"
        }}]})))
        .unwrap();
    let different_start = engine
        .reconcile(&payload(json!({"jobs": [{"job": {
            "jobTitle": "Engineer", "companyName": "Acme", "location": "Berlin",
            "startDate": "2019-04-01"
        }}]})))
        .unwrap();

    assert_eq!(same_key.skipped(FactKind::Job), 1);
    assert_eq!(different_start.added(FactKind::Job), 1);
    assert_eq!(stores.jobs.len(), 2);
}

#[test]
fn skill_types_are_not_duplicated() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    let report = ReconciliationEngine::new(&mut stores)
        .reconcile(&payload(json!({"skills": [
            {"skillName": "Go", "associatedSkillTypeNames": ["Languages"]},
            {"skillName": "Rust", "associatedSkillTypeNames": ["Languages", "Systems"]},
            {"skillName": "Go", "associatedSkillTypeNames": ["Backend"]}
        ]})))
        .unwrap();

    assert_eq!(report.added(FactKind::Skill), 2);
    assert_eq!(report.skipped(FactKind::Skill), 1);
    assert_eq!(report.added(FactKind::SkillType), 2);

    let names: Vec<&str> = stores
        .skill_types
        .items()
        .iter()
        .map(|skill_type| skill_type.skill_type_name.as_str())
        .collect();
    assert_eq!(names, vec!["Languages", "Systems"]);
    // Existing types keep their first association list.
    assert_eq!(
        stores.skill_types.items()[0].associated_skill_names,
        vec!["Go".to_string()]
    );
}

#[test]
fn education_and_summary_match_on_natural_key() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);
    let mut engine = ReconciliationEngine::new(&mut stores);

    engine
        .reconcile(&payload(json!({
            "education": [{"schoolName": "MIT", "degreeName": "BS", "location": "Cambridge"}],
            "summaries": [{"summary": "Backend engineer."}]
        })))
        .unwrap();
    let report = engine
        .reconcile(&payload(json!({
            "education": [
                {"schoolName": "MIT", "degreeName": "BS", "location": "Boston"},
                {"schoolName": "MIT", "degreeName": "MS"}
            ],
            "summary": {"summary": "Backend engineer."}
        })))
        .unwrap();

    assert_eq!(report.skipped(FactKind::Education), 1);
    assert_eq!(report.added(FactKind::Education), 1);
    assert_eq!(report.skipped(FactKind::Summary), 1);
    assert_eq!(stores.education.len(), 2);
    assert_eq!(stores.summaries.len(), 1);
}

#[test]
fn new_records_are_included_and_untagged() {
    let conn = open_vault_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let mut stores = StoreRegistry::open(&storage);

    ReconciliationEngine::new(&mut stores).reconcile(&full_payload()).unwrap();

    assert!(stores.projects.items().iter().all(|p| p.base.included && p.base.tags.is_empty()));
    assert!(stores.certifications.items()[0].base.included);
    assert!(stores.volunteers.items()[0].base.included);
}
