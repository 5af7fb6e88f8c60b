// src/config/consts.rs

// Site
pub const LISTING_URL: &str = "https://www.senate.gov/legislative/votes_new.htm";
pub const PERIOD_SELECT: &str = "select#congressSession";
pub const LENGTH_SELECT: &str = "select[name='listOfVotes_length']";
pub const LISTING_ROWS: &str = "table#listOfVotes tbody tr";
pub const ROLL_CALL: &str = "div.newspaperDisplay_3column span.contenttext";
pub const SHOW_ALL_TEXT: &str = "All";

// Detail labels
pub const VOTE_NUMBER_LABEL: &str = "Vote Number:";
pub const VOTE_DATE_LABEL: &str = "Vote Date:";
pub const RESULT_LABEL: &str = "Result:";
pub const MEASURE_NUMBER_LABEL: &str = "Measure Number:";
pub const MEASURE_TITLE_LABEL: &str = "Measure Title:";

// Readiness polling
pub const READY_TIMEOUT_MS: u64 = 8_000;
pub const POLL_INTERVAL_MS: u64 = 250;

// Local files
pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const VOTES_TABLE: &str = "vote_details_";
pub const MEMBERS_TABLE: &str = "senators_";
pub const ATTENDANCE_TABLE: &str = "attendance_";
