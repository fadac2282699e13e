//! FAQ datastore integration tests

use campus_kiosk::controller::ResponseStore;
use campus_kiosk::store::{self, FaqRepo, FaqStore};

fn test_repo() -> FaqRepo {
    FaqRepo::new(store::init_memory().expect("failed to init test db"))
}

#[test]
fn test_add_and_count() {
    let repo = test_repo();
    assert_eq!(repo.count().unwrap(), 0);

    repo.add("library hours", "Library opens at 8am").unwrap();
    repo.add("cafeteria menu", "Today's special is soup").unwrap();

    assert_eq!(repo.count().unwrap(), 2);
    assert_eq!(repo.list_all().unwrap().len(), 2);
}

#[test]
fn test_containment_match() {
    let repo = test_repo();
    repo.add("library hours", "Library opens at 8am").unwrap();

    // The stored question appears inside the spoken one
    let answer = repo.find_match("what are the library hours").unwrap();
    assert_eq!(answer.as_deref(), Some("Library opens at 8am"));
}

#[test]
fn test_match_is_case_insensitive() {
    let repo = test_repo();
    repo.add("Library Hours", "Library opens at 8am").unwrap();

    assert_eq!(
        repo.find_match("WHAT ARE THE LIBRARY HOURS").unwrap().as_deref(),
        Some("Library opens at 8am")
    );
    assert_eq!(
        repo.find_match("tell me the library hours please").unwrap().as_deref(),
        Some("Library opens at 8am")
    );
}

#[test]
fn test_no_match_returns_none() {
    let repo = test_repo();
    repo.add("library hours", "Library opens at 8am").unwrap();

    assert_eq!(repo.find_match("where is the gym").unwrap(), None);
}

#[test]
fn test_first_match_by_insertion_order() {
    let repo = test_repo();
    repo.add("hours", "General hours answer").unwrap();
    repo.add("library hours", "Library opens at 8am").unwrap();

    // Both rows match; the earlier row wins
    assert_eq!(
        repo.find_match("what are the library hours").unwrap().as_deref(),
        Some("General hours answer")
    );
}

#[test]
fn test_equality_is_also_containment() {
    let repo = test_repo();
    repo.add("library hours", "Library opens at 8am").unwrap();

    assert_eq!(
        repo.find_match("library hours").unwrap().as_deref(),
        Some("Library opens at 8am")
    );
}

#[tokio::test]
async fn test_faq_store_supplies_fallback() {
    let repo = test_repo();
    repo.add("library hours", "Library opens at 8am").unwrap();
    let store = FaqStore::new(repo, "Sorry, I don't have an answer for that.".to_string());

    let hit = store.lookup("what are the library hours").await.unwrap();
    assert_eq!(hit, "Library opens at 8am");

    // No row matched: a canned answer, not an error
    let miss = store.lookup("where do penguins nest").await.unwrap();
    assert_eq!(miss, "Sorry, I don't have an answer for that.");
}

#[test]
fn test_on_disk_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kiosk.db");

    {
        let repo = FaqRepo::new(store::init(&db_path).unwrap());
        repo.add("library hours", "Library opens at 8am").unwrap();
    }

    let repo = FaqRepo::new(store::init(&db_path).unwrap());
    assert_eq!(
        repo.find_match("the library hours today").unwrap().as_deref(),
        Some("Library opens at 8am")
    );
}
