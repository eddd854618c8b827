use std::path::PathBuf;

use givetrack::donation::{INVALID_AMOUNT_MESSAGE, MISSING_FIELDS_MESSAGE};
use givetrack::store::open_durable;
use givetrack::volunteer::{INCOMPLETE_MESSAGE, NON_POSITIVE_HOURS_MESSAGE};
use givetrack::{
    BufferedView, DeleteKey, DonationForm, DonationTracker, FixedClock, KeyValueStore,
    MalformedPolicy, MemoryStore, SqliteStore, VolunteerForm, VolunteerTracker,
};

fn temp_db(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "givetrack_it_{}_{name}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn donation(charity: &str, amount: &str, date: &str, comment: &str) -> DonationForm {
    DonationForm {
        charity_name: charity.to_string(),
        donation_amount: amount.to_string(),
        donation_date: date.to_string(),
        donor_comment: comment.to_string(),
    }
}

fn volunteer(charity: &str, hours: &str, date: &str) -> VolunteerForm {
    VolunteerForm {
        charity_name: charity.to_string(),
        hours_volunteered: hours.to_string(),
        date: date.to_string(),
    }
}

#[test]
fn donations_survive_reopening_the_store() {
    let path = temp_db("donations_reopen");

    {
        let store = open_durable(&path).expect("open store");
        let mut tracker = DonationTracker::new(store);
        let mut view = BufferedView::new();
        tracker
            .submit(&donation("A", "5", "2023-10-01", ""), &mut view)
            .expect("first donation");
        tracker
            .submit(&donation("B", "3", "2023-10-02", "Great job."), &mut view)
            .expect("second donation");
        assert_eq!(view.total, "8.00");
        assert_eq!(view.result, "Result of the operation is 3");
    }

    let store = SqliteStore::open(&path).expect("reopen store");
    let stored = store.get_item("donations").unwrap().expect("stored donations");
    assert_eq!(
        stored,
        r#"[{"charityName":"A","donationAmount":5,"donationDate":"2023-10-01","donorComment":""},{"charityName":"B","donationAmount":3,"donationDate":"2023-10-02","donorComment":"Great job."}]"#
    );

    let mut tracker = DonationTracker::new(store);
    let mut view = BufferedView::new();
    let removed = tracker.delete(0, &mut view).unwrap().expect("removed donation");
    assert_eq!(removed.charity_name, "A");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.total, "3.00");

    let _ = std::fs::remove_file(path);
}

#[test]
fn rejected_donations_are_not_stored() {
    let mut store = MemoryStore::new();
    let mut view = BufferedView::new();

    let err = DonationTracker::new(&mut store)
        .submit(&donation("", "", "", ""), &mut view)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(view.error, MISSING_FIELDS_MESSAGE);

    let err = DonationTracker::new(&mut store)
        .submit(&donation("A", "-50", "2023-10-01", ""), &mut view)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(view.error, INVALID_AMOUNT_MESSAGE);

    assert!(store.is_empty());
}

#[test]
fn volunteer_logs_round_trip_through_sqlite() {
    let path = temp_db("volunteer_logs");
    let store = open_durable(&path).expect("open store");
    let mut tracker = VolunteerTracker::with_clock(store, FixedClock(1_680_307_200_000));
    let mut view = BufferedView::new();

    assert!(tracker.select_star(2));
    let log = tracker
        .submit(&volunteer("Charity A", "5", "2023-04-01"), &mut view)
        .expect("stored log");
    assert_eq!(log.id, 1_680_307_200_000);
    assert_eq!(log.experience_rating, 3);
    assert!(tracker.rating().is_unset());

    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].delete, DeleteKey::Id(1_680_307_200_000));
    assert_eq!(view.rows[0].cells[3], "3 / 5");
    assert_eq!(view.total, "Total Hours Volunteered: 5");

    assert_eq!(tracker.delete(1_680_307_200_000, &mut view).unwrap(), 1);
    assert!(view.rows.is_empty());
    assert_eq!(view.total, "Total Hours Volunteered: 0");

    drop(tracker);
    let _ = std::fs::remove_file(path);
}

#[test]
fn same_millisecond_submissions_get_distinct_ids() {
    let mut store = MemoryStore::new();
    let mut tracker = VolunteerTracker::with_clock(&mut store, FixedClock(1_000));
    let mut view = BufferedView::new();

    tracker.select_star(4);
    let first = tracker.submit(&volunteer("A", "1", "d"), &mut view).unwrap();
    tracker.select_star(4);
    let second = tracker.submit(&volunteer("A", "1", "d"), &mut view).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(tracker.delete(first.id, &mut view).unwrap(), 1);
    assert_eq!(view.rows.len(), 1);
}

#[test]
fn all_empty_volunteer_form_reports_both_rules() {
    let mut store = MemoryStore::new();
    let mut view = BufferedView::new();

    let err = VolunteerTracker::new(&mut store)
        .submit(&volunteer("", "", ""), &mut view)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        view.error,
        format!("{INCOMPLETE_MESSAGE}{NON_POSITIVE_HOURS_MESSAGE}")
    );
    assert!(store.is_empty());
}

#[test]
fn unavailable_store_aborts_before_any_write() {
    let blocker = std::env::temp_dir().join(format!(
        "givetrack_it_{}_blocker",
        std::process::id()
    ));
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = open_durable(&blocker.join("tracker.db")).unwrap_err();
    assert!(err.is_storage_unavailable());

    let _ = std::fs::remove_file(blocker);
}

#[test]
fn malformed_collection_respects_policy() {
    let mut store = MemoryStore::new();
    store.set_item("donations", "{not json").unwrap();

    let mut view = BufferedView::new();
    let err = DonationTracker::new(&mut store)
        .submit(&donation("A", "5", "d", ""), &mut view)
        .unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(store.get_item("donations").unwrap().as_deref(), Some("{not json"));

    let mut tracker = DonationTracker::new(&mut store).with_policy(MalformedPolicy::Empty);
    tracker
        .submit(&donation("A", "5", "d", ""), &mut view)
        .expect("recovered submission");
    assert_eq!(view.total, "5.00");
    assert_eq!(
        store.get_item("donations").unwrap().as_deref(),
        Some(r#"[{"charityName":"A","donationAmount":5,"donationDate":"d","donorComment":""}]"#)
    );
}

#[test]
fn legacy_string_hours_are_summed() {
    let mut store = MemoryStore::new();
    store
        .set_item(
            "volunteerLogs",
            r#"[{"id":1,"charityName":"A","hoursVolunteered":"5","date":"d","experienceRating":3},{"id":2,"charityName":"B","hoursVolunteered":10,"date":"d","experienceRating":4}]"#,
        )
        .unwrap();

    let mut view = BufferedView::new();
    VolunteerTracker::new(&mut store).render(&mut view).unwrap();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.total, "Total Hours Volunteered: 15");
}

#[test]
fn deleting_the_last_donation_totals_zero() {
    let mut store = MemoryStore::new();
    let mut tracker = DonationTracker::new(&mut store);
    let mut view = BufferedView::new();

    tracker.render(&mut view).unwrap();
    assert_eq!(view.total, "0.00");

    tracker
        .submit(&donation("A", "0.125", "2023-10-01", ""), &mut view)
        .unwrap();
    assert_eq!(view.total, "0.13");

    tracker.delete(0, &mut view).unwrap();
    assert!(view.rows.is_empty());
    assert_eq!(view.total, "0.00");
}

#[test]
fn form_numbers_are_read_from_their_leading_digits() {
    let mut store = MemoryStore::new();
    let mut view = BufferedView::new();

    let recorded = DonationTracker::new(&mut store)
        .submit(&donation(" ", "12abc", "2023-10-01", ""), &mut view)
        .expect("leading number accepted");
    assert_eq!(recorded.donation_amount, 12.0);
    assert_eq!(view.total, "12.00");

    let mut tracker = VolunteerTracker::with_clock(&mut store, FixedClock(1_000));
    tracker.select_star(0);
    let log = tracker
        .submit(&volunteer("Charity A", "5 hours", "2023-04-01"), &mut view)
        .expect("leading number accepted");
    assert_eq!(log.hours_volunteered, 5.0);
    assert_eq!(view.total, "Total Hours Volunteered: 5");
}
