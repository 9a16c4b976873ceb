use super::*;
use crate::model::domain::OutputFormat;

fn fixture() -> InMemoryStore {
    let json = serde_json::json!({
        "users": [
            {"id": "u1", "plan": "professional"},
            {"id": "u2", "branding": {"owner_id": "u2", "accent_color": "#112233", "font": "Inter"}}
        ],
        "projects": [
            {"id": "p1", "owner_id": "u1", "title": "Lakeside Villa", "format": "9:16"}
        ],
        "agents": [
            {"id": "a1", "owner_id": "u1", "name": "Jane Doe", "phone": "+31 6 1234 5678"}
        ]
    });
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.json");
    std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();
    InMemoryStore::from_json_file(&path).unwrap()
}

#[test]
fn fixture_defaults_plan_and_branding() {
    let store = fixture();
    assert_eq!(store.plan_name("u1").unwrap(), "professional");
    assert_eq!(store.plan_name("u2").unwrap(), "free");

    let neutral = store.branding("u1").unwrap();
    assert_eq!(neutral, BrandingProfile::neutral("u1"));
    assert_eq!(store.branding("u2").unwrap().accent_color, "#112233");
    assert!(matches!(
        store.plan_name("ghost"),
        Err(RenderError::NotFound(_))
    ));
}

#[test]
fn projects_and_agents_are_scoped_to_owner() {
    let store = fixture();
    let p = store.get_project("p1", "u1").unwrap();
    assert_eq!(p.format, OutputFormat::Portrait);
    assert!(p.photos.is_empty());
    assert!(matches!(
        store.get_project("p1", "u2"),
        Err(RenderError::NotFound(_))
    ));

    assert_eq!(store.get_agent("a1", "u1").unwrap().unwrap().name, "Jane Doe");
    assert!(store.get_agent("a1", "u2").unwrap().is_none());
    assert!(store.get_agent("missing", "u1").unwrap().is_none());
}

#[test]
fn builder_methods_keep_index_current() {
    let store = InMemoryStore::new().with_user(UserAccount {
        id: "u9".to_string(),
        plan: "basic".to_string(),
        branding: None,
    });
    let collab = Collaborators::from_one(&store);
    assert_eq!(collab.accounts.plan_name("u9").unwrap(), "basic");
}

#[test]
fn invalid_fixture_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(matches!(
        InMemoryStore::from_json_file(&path),
        Err(RenderError::Validation(_))
    ));
}

#[test]
fn stale_index_entries_report_not_found() {
    let mut store = InMemoryStore::new().with_user(UserAccount {
        id: "u2".to_string(),
        plan: "professional".to_string(),
        branding: None,
    });
    assert_eq!(store.users().len(), 1);
    store.users.clear();
    assert!(matches!(
        store.plan_name("u2"),
        Err(RenderError::NotFound(_))
    ));
}

#[test]
fn accessors_expose_loaded_records() {
    let store = fixture();
    assert_eq!(store.users().len(), 2);
    assert_eq!(store.projects()[0].title, "Lakeside Villa");
    assert_eq!(store.agents()[0].name, "Jane Doe");
}
