use std::collections::BTreeMap;

use storage::repository::{
    FormatOptionRepository, Storage, StoredOptions, UserPreferenceRepository,
};
use storage::sqlite::SqliteRepository;
use twocol_core::model::{CourseId, CourseOptions, HiddenSections, SectionId, UserId};

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[tokio::test]
async fn sqlite_roundtrip_groups_options_by_section() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_options?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let course = CourseId::new(1);
    let section = SectionId::new(15);
    repo.save_options(
        course,
        None,
        &values(&[("headerimage", "2"), ("hiddensections", "1")]),
    )
    .await
    .unwrap();
    repo.save_options(course, Some(section), &values(&[("sectionimage", "4")]))
        .await
        .unwrap();
    repo.save_options(CourseId::new(2), None, &values(&[("headerimage", "0")]))
        .await
        .unwrap();

    let stored = StoredOptions::from_records(repo.load_options(course).await.unwrap());
    assert_eq!(stored.course["headerimage"], "2");
    assert_eq!(stored.sections[&section]["sectionimage"], "4");

    let options = CourseOptions::from_stored(&stored.course, HiddenSections::Collapsed);
    assert_eq!(options.hidden_sections, HiddenSections::Invisible);
    assert_eq!(options.header_image_index(), Some(1));
}

#[tokio::test]
async fn sqlite_upsert_replaces_and_delete_is_scoped() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Running migrations twice is a no-op.
    repo.migrate().await.expect("migrate again");

    let course = CourseId::new(3);
    let section = SectionId::new(31);
    repo.save_options(course, None, &values(&[("reversedisplay", "0")]))
        .await
        .unwrap();
    repo.save_options(course, None, &values(&[("reversedisplay", "1")]))
        .await
        .unwrap();
    repo.save_options(course, Some(section), &values(&[("sectionimage", "2")]))
        .await
        .unwrap();

    let records = repo.load_options(course).await.unwrap();
    assert_eq!(records.len(), 2);

    repo.delete_section_options(course, section).await.unwrap();
    let stored = StoredOptions::from_records(repo.load_options(course).await.unwrap());
    assert_eq!(stored.course["reversedisplay"], "1");
    assert!(stored.sections.is_empty());
}

#[tokio::test]
async fn sqlite_storage_keeps_preferences_per_user() {
    let storage = Storage::sqlite("sqlite:file:memdb_prefs?mode=memory&cache=shared")
        .await
        .expect("storage");
    let name = "format_twocol_resume_courseid_4";
    storage
        .preferences
        .set_preference(UserId::new(1), name, r#"{"path":"/a"}"#)
        .await
        .unwrap();
    storage
        .preferences
        .set_preference(UserId::new(1), name, r#"{"path":"/b"}"#)
        .await
        .unwrap();

    assert_eq!(
        storage
            .preferences
            .get_preference(UserId::new(1), name)
            .await
            .unwrap()
            .as_deref(),
        Some(r#"{"path":"/b"}"#)
    );
    assert!(storage
        .preferences
        .get_preference(UserId::new(2), name)
        .await
        .unwrap()
        .is_none());
}
