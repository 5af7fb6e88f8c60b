// tests/end_to_end.rs
mod common;

use common::*;
use pretty_assertions::assert_eq;
use rollcall_scrape::browser::memory::MemoryPage;
use rollcall_scrape::store::{MemorySink, ATTENDANCE_HEADERS, MEMBERS_HEADERS, VOTES_HEADERS};
use rollcall_scrape::{run, Member};

fn vote_115() -> MemoryPage {
    detail(&Vote {
        number: "115",
        date: "March 7, 2024",
        result: "Bill Passed",
        measure: "H.R. 1 (As Amended)",
        title: "A bill to do things",
        entries: &["Smith (R-TX), ", "<b>Yea</b>", "Jones (D-CA), ", "<b>Nay</b>"],
    })
}

#[test]
fn two_rows_one_without_link() {
    let url = detail_url("115");
    let browser = site(
        vec![row("115", Some(&url)), row("116", None)],
        vec![(url.clone(), vote_115())],
    );
    let mut sink = MemorySink::new();

    let summary = run(browser, &opts(2024), &mut sink, None).unwrap();

    assert_eq!(summary.period, "118th Congress - 2nd Session (2024)");
    assert_eq!(summary.rows_seen, 2);
    assert_eq!(summary.rows_ok(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].index, 1);
    assert!(summary.failures[0].reason.starts_with("navigation failure"));

    let votes = sink.table("vote_details_2024").unwrap();
    assert_eq!(votes.headers, VOTES_HEADERS);
    assert_eq!(
        votes.rows,
        vec![vec!["115", "March 7, 2024", "Bill Passed", "H.R. 1", "A bill to do things"]]
    );

    let members = sink.table("senators_2024").unwrap();
    assert_eq!(members.headers, MEMBERS_HEADERS);
    assert_eq!(members.rows, vec![vec!["0", "Smith", "R", "TX"], vec!["1", "Jones", "D", "CA"]]);

    let attendance = sink.table("attendance_2024").unwrap();
    assert_eq!(attendance.headers, ATTENDANCE_HEADERS);
    assert_eq!(attendance.rows, vec![vec!["115", "0", "Yea"], vec!["115", "1", "Nay"]]);

    // one flush for the one good row
    assert_eq!(sink.writes(), 3);
    assert_eq!(
        summary.dataset.members().get(1),
        Some(&Member { name: "Jones".into(), party: "D".into(), state: "CA".into() })
    );
}

#[test]
fn members_are_shared_across_votes() {
    let (u1, u2) = (detail_url("1"), detail_url("2"));
    let second = detail(&Vote {
        number: "2",
        date: "March 8, 2024",
        result: "Motion Rejected",
        measure: "S. 5",
        title: "Another",
        entries: &["Jones (D-CA), ", "<b>Yea</b>", "Lee (I-VT), ", "<b>Not Voting</b>"],
    });
    let first = detail(&Vote {
        number: "1",
        date: "March 7, 2024",
        result: "Bill Passed",
        measure: "H.R. 1",
        title: "First",
        entries: &["Smith (R-TX), ", "<b>Yea</b>", "Jones (D-CA), ", "<b>Nay</b>"],
    });
    let browser = site(
        vec![row("1", Some(&u1)), row("2", Some(&u2))],
        vec![(u1.clone(), first), (u2.clone(), second)],
    );
    let mut sink = MemorySink::new();

    let summary = run(browser, &opts(2024), &mut sink, None).unwrap();

    assert!(summary.failures.is_empty());
    assert_eq!(summary.dataset.members().len(), 3);
    let att = sink.table("attendance_2024").unwrap();
    assert_eq!(
        att.rows,
        vec![
            vec!["1", "0", "Yea"],
            vec!["1", "1", "Nay"],
            vec!["2", "1", "Yea"],
            vec!["2", "2", "Not Voting"],
        ]
    );
    // flushed after each row
    assert_eq!(sink.writes(), 6);
}

#[test]
fn unknown_year_fails_before_writing() {
    let browser = site(vec![row("1", None)], vec![]);
    let mut sink = MemorySink::new();

    assert!(run(browser, &opts(1999), &mut sink, None).is_err());
    assert_eq!(sink.writes(), 0);
}

#[test]
fn empty_listing_is_a_successful_run() {
    let browser = site(vec![], vec![]);
    let mut sink = MemorySink::new();

    let summary = run(browser, &opts(2024), &mut sink, None).unwrap();
    assert_eq!(summary.rows_seen, 0);
    assert_eq!(sink.writes(), 0);
}

#[test]
fn files_on_disk_reload_to_the_same_dataset() {
    use rollcall_scrape::config::ExportFormat;
    use rollcall_scrape::store::{load_dataset, CsvSink};

    let url = detail_url("115");
    let browser = site(vec![row("115", Some(&url))], vec![(url.clone(), vote_115())]);
    let dir = tempfile::tempdir().unwrap();
    let mut sink = CsvSink::new(dir.path(), ExportFormat::Tsv);

    let summary = run(browser, &opts(2024), &mut sink, None).unwrap();

    assert!(dir.path().join("senators_2024.tsv").exists());
    let back = load_dataset(dir.path(), 2024, ExportFormat::Tsv).unwrap();
    assert_eq!(back.votes(), summary.dataset.votes());
    assert_eq!(back.members_table(), summary.dataset.members_table());
    assert_eq!(back.attendance(), summary.dataset.attendance());
}
