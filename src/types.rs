// src/types.rs

/// One roll-call vote, as read from its detail view. Keyed by `vote_number`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteRecord {
    pub vote_number: String,
    pub vote_date: String,
    pub result: String,
    pub measure_number: String,
    pub measure_title: String,
}

/// How one member voted on one vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub vote_number: String,
    pub member_id: u32,
    pub position: String,
}
