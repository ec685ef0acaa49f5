use crate::store::KvStore;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};
use tracing::warn;

/// Round-robin template over a 4-team group, indexed by round - 1. Each team
/// plays once per round and meets every other team exactly once across the
/// three rounds, regardless of team order.
const ROUND_TEMPLATE: [[(usize, usize); 2]; 3] = [
  [(0, 1), (2, 3)],
  [(0, 2), (1, 3)],
  [(0, 3), (1, 2)],
];

pub fn group_letter(index: usize) -> char {
  (b'A' + (index % 26) as u8) as char
}

pub fn slugify(name: &str) -> String {
  let mut out = String::new();
  let mut last_dash = false;
  for ch in name.chars() {
    let lower = ch.to_ascii_lowercase();
    if lower.is_ascii_alphanumeric() {
      out.push(lower);
      last_dash = false;
    } else if !last_dash {
      out.push('-');
      last_dash = true;
    }
  }
  out.trim_matches('-').to_string()
}

/// Match identity is a pure function of its coordinates, so regenerating a
/// round can never create a duplicate record.
pub fn match_id(group_index: usize, round: u32, home: &str, away: &str) -> String {
  format!("g{}-r{}-{}-{}", group_index + 1, round, slugify(home), slugify(away))
}

// ── Persisted tournament state ──────────────────────────────────────────

/// The four persisted slots, read and written as a unit by every operation.
/// Anything missing or malformed in the store loads as its default.
#[derive(Debug, Clone, Default)]
pub struct TournamentState {
  pub groups: Vec<Group>,
  pub matches: Vec<GroupMatch>,
  pub rounds_generated: u32,
  pub bracket: Option<KnockoutBracket>,
}

fn load_slot<T: serde::de::DeserializeOwned + Default>(store: &KvStore, key: &str) -> T {
  match store.load(key) {
    Some(value) => match serde_json::from_value(value) {
      Ok(parsed) => parsed,
      Err(e) => {
        warn!("stored {key} has unexpected shape: {e}; using default");
        T::default()
      }
    },
    None => T::default(),
  }
}

impl TournamentState {
  pub fn load(store: &KvStore) -> Self {
    let rounds_generated = store
      .load(KEY_ROUNDS_GENERATED)
      .and_then(|value| value.as_u64())
      .unwrap_or(0) as u32;
    let bracket: Option<KnockoutBracket> = match store.load(KEY_BRACKET) {
      Some(value) => match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
          warn!("stored {KEY_BRACKET} has unexpected shape: {e}; using default");
          None
        }
      },
      None => None,
    };
    TournamentState {
      groups: load_slot(store, KEY_GROUPS),
      matches: load_slot(store, KEY_MATCHES),
      rounds_generated,
      bracket,
    }
  }

  pub fn persist(&self, store: &KvStore) -> Result<(), String> {
    let groups = serde_json::to_value(&self.groups).map_err(|e| e.to_string())?;
    let matches = serde_json::to_value(&self.matches).map_err(|e| e.to_string())?;
    store.save(KEY_GROUPS, &groups)?;
    store.save(KEY_MATCHES, &matches)?;
    store.save(KEY_ROUNDS_GENERATED, &json!(self.rounds_generated))?;
    match &self.bracket {
      Some(bracket) => {
        let value: Value = serde_json::to_value(bracket).map_err(|e| e.to_string())?;
        store.save(KEY_BRACKET, &value)?;
      }
      None => store.remove(KEY_BRACKET)?,
    }
    Ok(())
  }
}

/// Clear all four persisted slots. The confirmation dialog guarding this is
/// the frontend's job.
pub fn clear_state(store: &KvStore) -> Result<(), String> {
  store.remove(KEY_GROUPS)?;
  store.remove(KEY_MATCHES)?;
  store.remove(KEY_ROUNDS_GENERATED)?;
  store.remove(KEY_BRACKET)?;
  Ok(())
}

// ── Group generation ────────────────────────────────────────────────────

/// Partition the roster into groups of four, optionally after a uniform
/// shuffle. Replaces any prior grouping wholesale: the match list, round
/// counter, and bracket are reset. A short roster errors before any
/// mutation. With `randomize` off the result is a pure function of the
/// roster order.
pub fn draw_groups<R: Rng>(
  state: &mut TournamentState,
  roster: &[String],
  randomize: bool,
  rng: &mut R,
) -> Result<Vec<Group>, String> {
  if roster.len() < FIELD_SIZE {
    return Err(format!(
      "Need at least {FIELD_SIZE} teams to draw groups, got {}.",
      roster.len()
    ));
  }

  let mut pool: Vec<String> = roster.to_vec();
  if randomize {
    pool.shuffle(rng);
  }
  pool.truncate(FIELD_SIZE);

  let groups: Vec<Group> = pool
    .chunks(GROUP_SIZE)
    .enumerate()
    .map(|(index, teams)| Group {
      index,
      teams: teams.to_vec(),
    })
    .collect();

  state.groups = groups.clone();
  state.matches = Vec::new();
  state.rounds_generated = 0;
  state.bracket = None;
  Ok(groups)
}

// ── Round generation ────────────────────────────────────────────────────

/// Emit the two fixtures per group for `round`, skipping any fixture whose
/// derived id already exists. The rounds-generated counter is set to the
/// round passed in; it is deliberately not validated monotonic (callers in
/// the UI guard ordering).
pub fn generate_round(state: &mut TournamentState, round: u32) -> Result<Vec<GroupMatch>, String> {
  if round < 1 || round > ROUNDS_PER_GROUP {
    return Err(format!("Round must be between 1 and {ROUNDS_PER_GROUP}, got {round}."));
  }
  if state.groups.is_empty() {
    return Err("Draw the groups before generating a round.".to_string());
  }

  let template = ROUND_TEMPLATE[(round - 1) as usize];
  for group in &state.groups {
    if group.teams.len() < GROUP_SIZE {
      return Err(format!(
        "Group {} has {} teams; expected {GROUP_SIZE}.",
        group_letter(group.index),
        group.teams.len()
      ));
    }
    for (home_slot, away_slot) in template {
      let home = &group.teams[home_slot];
      let away = &group.teams[away_slot];
      let id = match_id(group.index, round, home, away);
      if state.matches.iter().any(|m| m.id == id) {
        continue;
      }
      state.matches.push(GroupMatch {
        id,
        group_index: group.index,
        round,
        home: home.clone(),
        away: away.clone(),
        home_goals: None,
        away_goals: None,
        status: MatchStatus::Scheduled,
      });
    }
  }

  state.rounds_generated = round;
  Ok(state.matches.clone())
}

// ── Score entry ─────────────────────────────────────────────────────────

/// Record (or overwrite) a result. The match keeps its identity; only the
/// goals and status change.
pub fn record_score(
  state: &mut TournamentState,
  id: &str,
  home_goals: u32,
  away_goals: u32,
) -> Result<GroupMatch, String> {
  let entry = state
    .matches
    .iter_mut()
    .find(|m| m.id == id)
    .ok_or_else(|| format!("No match with id {id}."))?;
  entry.home_goals = Some(home_goals);
  entry.away_goals = Some(away_goals);
  entry.status = MatchStatus::Played;
  Ok(entry.clone())
}
