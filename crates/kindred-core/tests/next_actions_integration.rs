//! Store-to-scheduler integration: records written to a file-backed
//! database come back and drive the next-action list.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use kindred_core::{
    compute_next_actions, ActionType, Clock, FixedClock, NewPerson, OwnerId, PeopleDb,
    PersonFilter, PersonStore, ReminderFrequency,
};

fn new_person(name: &str) -> NewPerson {
    NewPerson {
        name: name.into(),
        description: format!("{name}, tracked for tests"),
        relationship: "friend".into(),
        ..Default::default()
    }
}

#[test]
fn persisted_people_produce_sorted_actions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kindred.db");
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
    let owner = OwnerId::new("user-1").unwrap();

    {
        let db = PeopleDb::open_at(&path).unwrap();

        let mut ada = new_person("Ada");
        ada.birthdate = NaiveDate::from_ymd_opt(1990, 6, 1);
        db.create(&owner, ada, clock.now()).unwrap();

        let mut grace = new_person("Grace");
        grace.reminder_frequency = Some(ReminderFrequency::Weekly);
        grace.next_reminder_date = Some(clock.now() - Duration::days(10));
        db.create(&owner, grace, clock.now()).unwrap();

        db.create(&owner, new_person("Linus"), clock.now()).unwrap();
    }

    // reopen to prove persistence
    let db = PeopleDb::open_at(&path).unwrap();
    let people = db.list(&owner).unwrap();
    assert_eq!(people.len(), 3);

    let actions = compute_next_actions(&people, clock.now());
    assert_eq!(actions.len(), 2);

    assert_eq!(actions[0].action_type, ActionType::CheckIn);
    assert_eq!(actions[0].person_name, "Grace");
    assert_eq!(actions[0].due_date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());

    assert_eq!(actions[1].action_type, ActionType::Birthday);
    assert_eq!(actions[1].description, "Ada's birthday");
    assert_eq!(actions[1].due_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
}

#[test]
fn other_owners_records_never_reach_the_scheduler() {
    let dir = tempfile::tempdir().unwrap();
    let db = PeopleDb::open_at(&dir.path().join("kindred.db")).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let me = OwnerId::new("me").unwrap();
    let them = OwnerId::new("them").unwrap();

    let mut theirs = new_person("Stranger");
    theirs.birthdate = NaiveDate::from_ymd_opt(1980, 1, 1);
    db.create(&them, theirs, now).unwrap();

    let mine = db.list(&me).unwrap();
    assert!(mine.is_empty());
    assert!(compute_next_actions(&mine, now).is_empty());
}

#[test]
fn filtered_snapshot_feeds_scheduler() {
    let dir = tempfile::tempdir().unwrap();
    let db = PeopleDb::open_at(&dir.path().join("kindred.db")).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let owner = OwnerId::new("me").unwrap();

    let mut mum = new_person("Mum");
    mum.relationship = "family".into();
    mum.birthdate = NaiveDate::from_ymd_opt(1960, 4, 2);
    db.create(&owner, mum, now).unwrap();

    let mut colleague = new_person("Sam");
    colleague.relationship = "colleague".into();
    colleague.reminder_frequency = Some(ReminderFrequency::Monthly);
    db.create(&owner, colleague, now).unwrap();

    let people = db.list(&owner).unwrap();
    let filter = PersonFilter {
        relationship: Some("family".into()),
        ..Default::default()
    };
    let family: Vec<_> = filter.apply(&people).into_iter().cloned().collect();
    let actions = compute_next_actions(&family, now);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].person_name, "Mum");
}
