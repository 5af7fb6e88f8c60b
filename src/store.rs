// src/store.rs
//! The three output tables and where they go.
//!
//! `Dataset` is owned by the runner and handed out by `&mut`; nothing here is
//! global. `flush` serializes the whole dataset on every call, so the files on
//! disk always equal the in-memory tables as of the last processed row.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::{ATTENDANCE_TABLE, MEMBERS_TABLE, VOTES_TABLE};
use crate::config::ExportFormat;
use crate::csv::{parse_rows, rows_to_string};
use crate::error::StoreError;
use crate::file::write_replace;
use crate::members::MemberRegistry;
use crate::types::{AttendanceRecord, VoteRecord};

pub const VOTES_HEADERS: [&str; 5] = ["vote_number", "vote_date", "result", "measure_number", "measure_title"];
pub const MEMBERS_HEADERS: [&str; 4] = ["member_id", "senator_name", "party", "state"];
pub const ATTENDANCE_HEADERS: [&str; 3] = ["vote_number", "senator_number", "vote"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn with_headers(headers: &[&str]) -> Self {
        Self { headers: headers.iter().map(|h| s!(*h)).collect(), rows: Vec::new() }
    }
}

/// Durable destination for named tables. Each write replaces the table whole.
pub trait TableSink {
    fn write(&mut self, name: &str, table: &Table) -> Result<(), StoreError>;
}

/// Deterministic per-year table names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableNames {
    pub votes: String,
    pub members: String,
    pub attendance: String,
}

impl TableNames {
    pub fn for_year(year: i32) -> Self {
        let y = year.to_string();
        Self {
            votes: join!(VOTES_TABLE, &y),
            members: join!(MEMBERS_TABLE, &y),
            attendance: join!(ATTENDANCE_TABLE, &y),
        }
    }
}

/* ---------------- Sinks ---------------- */

/// `<dir>/<name>.<ext>`, header row first.
pub struct CsvSink {
    dir: PathBuf,
    format: ExportFormat,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self { dir: dir.into(), format }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(join!(name, ".", self.format.ext()))
    }
}

impl TableSink for CsvSink {
    fn write(&mut self, name: &str, table: &Table) -> Result<(), StoreError> {
        let path = self.path_for(name);
        let contents = rows_to_string(&table.headers, &table.rows, self.format.delim());
        write_replace(&path, &contents)
    }
}

/// Keeps the latest version of each table. For tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: HashMap<String, Table>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Total `write` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TableSink for MemorySink {
    fn write(&mut self, name: &str, table: &Table) -> Result<(), StoreError> {
        self.tables.insert(s!(name), table.clone());
        self.writes += 1;
        Ok(())
    }
}

/* ---------------- Dataset ---------------- */

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    votes: Vec<VoteRecord>,
    seen_votes: HashSet<String>,
    members: MemberRegistry,
    attendance: Vec<AttendanceRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn votes(&self) -> &[VoteRecord] {
        &self.votes
    }

    pub fn members(&self) -> &MemberRegistry {
        &self.members
    }

    /// Member insertion goes through the registry; the parser takes it from here.
    pub fn members_mut(&mut self) -> &mut MemberRegistry {
        &mut self.members
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    /// Appends unconditionally. Returns `false` when the vote number was already present.
    pub fn append_vote(&mut self, vote: VoteRecord) -> bool {
        let fresh = self.seen_votes.insert(vote.vote_number.clone());
        if !fresh {
            tracing::warn!("vote {} collected twice; keeping both rows", vote.vote_number);
        }
        self.votes.push(vote);
        fresh
    }

    pub fn append_attendance(&mut self, rows: impl IntoIterator<Item = AttendanceRecord>) {
        self.attendance.extend(rows);
    }

    pub fn votes_table(&self) -> Table {
        let mut t = Table::with_headers(&VOTES_HEADERS);
        t.rows = self
            .votes
            .iter()
            .map(|v| {
                vec![
                    v.vote_number.clone(),
                    v.vote_date.clone(),
                    v.result.clone(),
                    v.measure_number.clone(),
                    v.measure_title.clone(),
                ]
            })
            .collect();
        t
    }

    pub fn members_table(&self) -> Table {
        let mut t = Table::with_headers(&MEMBERS_HEADERS);
        t.rows = self
            .members
            .iter()
            .map(|(id, m)| vec![id.to_string(), m.name.clone(), m.party.clone(), m.state.clone()])
            .collect();
        t
    }

    pub fn attendance_table(&self) -> Table {
        let mut t = Table::with_headers(&ATTENDANCE_HEADERS);
        t.rows = self
            .attendance
            .iter()
            .map(|a| vec![a.vote_number.clone(), a.member_id.to_string(), a.position.clone()])
            .collect();
        t
    }

    /// Rewrite all three tables for `year`.
    pub fn flush(&self, year: i32, sink: &mut dyn TableSink) -> Result<(), StoreError> {
        let names = TableNames::for_year(year);
        sink.write(&names.votes, &self.votes_table())?;
        sink.write(&names.members, &self.members_table())?;
        sink.write(&names.attendance, &self.attendance_table())?;
        tracing::debug!(
            "flushed {} votes, {} members, {} attendance rows",
            self.votes.len(),
            self.members.len(),
            self.attendance.len()
        );
        Ok(())
    }

    /// Rebuild from previously written tables. Member ids must be the row index.
    pub fn from_tables(votes: &Table, members: &Table, attendance: &Table) -> Result<Self, StoreError> {
        check_shape("votes", votes, &VOTES_HEADERS)?;
        check_shape("members", members, &MEMBERS_HEADERS)?;
        check_shape("attendance", attendance, &ATTENDANCE_HEADERS)?;

        let mut ds = Dataset::new();
        for r in &votes.rows {
            ds.append_vote(VoteRecord {
                vote_number: r[0].clone(),
                vote_date: r[1].clone(),
                result: r[2].clone(),
                measure_number: r[3].clone(),
                measure_title: r[4].clone(),
            });
        }

        for (row_ix, r) in members.rows.iter().enumerate() {
            let id = ds.members.resolve_or_insert(&r[1], &r[2], &r[3]);
            if r[0] != row_ix.to_string() || id as usize != row_ix {
                return Err(StoreError::Shape {
                    table: s!("members"),
                    reason: format!("row {row_ix}: member_id {} is not its row index (or duplicate identity)", r[0]),
                });
            }
        }

        for (row_ix, r) in attendance.rows.iter().enumerate() {
            let member_id = r[1]
                .parse::<u32>()
                .ok()
                .filter(|id| (*id as usize) < ds.members.len())
                .ok_or_else(|| StoreError::Shape {
                    table: s!("attendance"),
                    reason: format!("row {row_ix}: unknown senator_number {:?}", r[1]),
                })?;
            ds.attendance.push(AttendanceRecord {
                vote_number: r[0].clone(),
                member_id,
                position: r[2].clone(),
            });
        }
        Ok(ds)
    }
}

fn check_shape(name: &str, table: &Table, headers: &[&str]) -> Result<(), StoreError> {
    if table.headers != headers {
        return Err(StoreError::Shape {
            table: s!(name),
            reason: format!("unexpected headers {:?}", table.headers),
        });
    }
    if let Some((ix, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
        return Err(StoreError::Shape {
            table: s!(name),
            reason: format!("row {ix} has {} cells, expected {}", row.len(), headers.len()),
        });
    }
    Ok(())
}

/// Read one table written by `CsvSink`.
pub fn load_table(path: &Path, format: ExportFormat) -> Result<Table, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let mut rows = parse_rows(&text, format.delim());
    if rows.is_empty() {
        return Ok(Table::default());
    }
    let headers = rows.remove(0);
    Ok(Table { headers, rows })
}

/// Reload the three tables for `year` from `dir`.
pub fn load_dataset(dir: &Path, year: i32, format: ExportFormat) -> Result<Dataset, StoreError> {
    let sink = CsvSink::new(dir, format);
    let names = TableNames::for_year(year);
    Dataset::from_tables(
        &load_table(&sink.path_for(&names.votes), format)?,
        &load_table(&sink.path_for(&names.members), format)?,
        &load_table(&sink.path_for(&names.attendance), format)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vote(n: &str) -> VoteRecord {
        VoteRecord {
            vote_number: s!(n),
            vote_date: s!("Jan 1, 2024"),
            result: s!("Agreed to"),
            measure_number: s!("H.R. 1"),
            measure_title: s!("Test Act"),
        }
    }

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.append_vote(vote("115"));
        let smith = ds.members_mut().resolve_or_insert("Smith", "R", "TX");
        let jones = ds.members_mut().resolve_or_insert("Jones", "D", "CA");
        ds.append_attendance([
            AttendanceRecord { vote_number: s!("115"), member_id: smith, position: s!("Yea") },
            AttendanceRecord { vote_number: s!("115"), member_id: jones, position: s!("Nay") },
        ]);
        ds
    }

    #[test]
    fn names_are_per_year() {
        let n = TableNames::for_year(2024);
        assert_eq!(n.votes, "vote_details_2024");
        assert_eq!(n.members, "senators_2024");
        assert_eq!(n.attendance, "attendance_2024");
    }

    #[test]
    fn flush_writes_three_tables() {
        let mut sink = MemorySink::new();
        sample().flush(2024, &mut sink).unwrap();
        assert_eq!(sink.writes(), 3);

        let members = sink.table("senators_2024").unwrap();
        assert_eq!(members.headers, MEMBERS_HEADERS);
        assert_eq!(members.rows[1], vec!["1", "Jones", "D", "CA"]);

        let att = sink.table("attendance_2024").unwrap();
        assert_eq!(att.rows, vec![vec!["115", "0", "Yea"], vec!["115", "1", "Nay"]]);
    }

    #[test]
    fn duplicate_vote_is_kept_and_flagged() {
        let mut ds = Dataset::new();
        assert!(ds.append_vote(vote("1")));
        assert!(!ds.append_vote(vote("1")));
        assert_eq!(ds.votes().len(), 2);
    }

    #[test]
    fn csv_round_trip_reproduces_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut ds = sample();
        ds.append_vote(VoteRecord { measure_title: s!("An Act, \"quoted\""), ..vote("116") });

        let mut sink = CsvSink::new(dir.path(), ExportFormat::Csv);
        ds.flush(2024, &mut sink).unwrap();
        // second flush rewrites, never appends
        ds.flush(2024, &mut sink).unwrap();

        let back = load_dataset(dir.path(), 2024, ExportFormat::Csv).unwrap();
        assert_eq!(back.votes(), ds.votes());
        assert_eq!(back.attendance(), ds.attendance());
        assert_eq!(back.members_table(), ds.members_table());
    }

    #[test]
    fn from_tables_rejects_dangling_member() {
        let ds = sample();
        let mut att = ds.attendance_table();
        att.rows.push(vec![s!("115"), s!("9"), s!("Yea")]);
        let err = Dataset::from_tables(&ds.votes_table(), &ds.members_table(), &att).unwrap_err();
        assert!(matches!(err, StoreError::Shape { .. }));
    }
}
