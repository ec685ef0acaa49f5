use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::store::KvStore;

// ── Constants ──────────────────────────────────────────────────────────

pub const GROUP_COUNT: usize = 6;
pub const GROUP_SIZE: usize = 4;
pub const FIELD_SIZE: usize = GROUP_COUNT * GROUP_SIZE;
pub const ROUNDS_PER_GROUP: u32 = 3;
pub const MATCHES_PER_GROUP: usize = 6;
pub const QUALIFIED_THIRDS: usize = 4;
pub const KNOCKOUT_ENTRANTS: usize = 16;
pub const STATE_SERVER_ADDR: &str = "127.0.0.1:17890";

// ── Store keys ─────────────────────────────────────────────────────────

pub const KEY_GROUPS: &str = "groups";
pub const KEY_MATCHES: &str = "matches";
pub const KEY_ROUNDS_GENERATED: &str = "roundsGenerated";
pub const KEY_BRACKET: &str = "knockoutBracket";

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedStore = Arc<Mutex<KvStore>>;

// ── Tournament domain types ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub index: usize,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    Scheduled,
    Played,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMatch {
    pub id: String,
    pub group_index: usize,
    pub round: u32,
    pub home: String,
    pub away: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub w: u32,
    pub d: u32,
    pub l: u32,
    pub gf: u32,
    pub ga: u32,
    pub gd: i64,
    pub pts: u32,
    pub position: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStandings {
    pub group_index: usize,
    pub group_letter: char,
    pub rows: Vec<StandingsRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPlaceRow {
    pub group_letter: char,
    pub row: StandingsRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPlaceTable {
    pub ranked: Vec<ThirdPlaceRow>,
    pub qualified: Vec<ThirdPlaceRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: String,
    pub home: String,
    pub away: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockoutBracket {
    pub r16: Vec<Fixture>,
    pub qf: Vec<Fixture>,
    pub sf: Vec<Fixture>,
    #[serde(rename = "final")]
    pub final_round: Vec<Fixture>,
}

// ── Command payload types ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsPayload {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPayload {
    pub round: u32,
    pub matches: Vec<GroupMatch>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsPayload {
    pub standings: Vec<GroupStandings>,
    pub third_place: ThirdPlaceTable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
    pub groups: Vec<Group>,
    pub matches: Vec<GroupMatch>,
    pub rounds_generated: u32,
    pub standings: Vec<GroupStandings>,
    pub third_place: ThirdPlaceTable,
    pub bracket: Option<KnockoutBracket>,
}

// ── Config types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub data_dir: String,
    pub roster_path: String,
    pub randomize_draw: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            roster_path: String::new(),
            randomize_draw: true,
        }
    }
}

// ── State server types ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct StateServerState {
    pub store: SharedStore,
}
