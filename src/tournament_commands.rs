use crate::config::{append_result_log, load_config_inner};
use crate::knockout::try_draw_bracket;
use crate::roster::load_roster;
use crate::standings::{compute_standings, third_place_table};
use crate::store::KvStore;
use crate::tournament::{self, TournamentState};
use crate::types::*;
use rand::thread_rng;
use tauri::State;
use tracing::info;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Lock the store handle, then call `f` with the store. Every command
/// re-reads persisted state, computes, writes, and returns the full
/// structure; nothing is cached between invocations.
fn with_store<F, R>(store: &State<'_, SharedStore>, f: F) -> Result<R, String>
where
    F: FnOnce(&KvStore) -> Result<R, String>,
{
    let guard = store.lock().map_err(|e| e.to_string())?;
    f(&guard)
}

/// The full derived view: stored slots plus standings, the third-place
/// table, and the bracket. Also served by the state server as
/// `/state.json`.
pub fn build_snapshot(store: &KvStore) -> TournamentSnapshot {
    let state = TournamentState::load(store);
    let standings = compute_standings(&state.groups, &state.matches);
    let third_place = third_place_table(&standings);
    TournamentSnapshot {
        groups: state.groups,
        matches: state.matches,
        rounds_generated: state.rounds_generated,
        standings,
        third_place,
        bracket: state.bracket,
    }
}

// ── Commands ────────────────────────────────────────────────────────────

#[tauri::command]
pub fn draw_groups(
    randomize: Option<bool>,
    store: State<'_, SharedStore>,
) -> Result<GroupsPayload, String> {
    let config = load_config_inner().unwrap_or_else(|_| AppConfig::default());
    let randomize = randomize.unwrap_or(config.randomize_draw);
    let roster = load_roster()?;
    with_store(&store, |kv| {
        let mut state = TournamentState::load(kv);
        let groups = tournament::draw_groups(&mut state, &roster, randomize, &mut thread_rng())?;
        state.persist(kv)?;
        info!("drew {} groups (randomize={randomize})", groups.len());
        Ok(GroupsPayload { groups })
    })
}

#[tauri::command]
pub fn generate_round(round: u32, store: State<'_, SharedStore>) -> Result<RoundPayload, String> {
    with_store(&store, |kv| {
        let mut state = TournamentState::load(kv);
        let matches = tournament::generate_round(&mut state, round)?;
        state.persist(kv)?;
        info!("generated round {round}; {} matches total", matches.len());
        Ok(RoundPayload { round, matches })
    })
}

#[tauri::command]
pub fn submit_score(
    match_id: String,
    home_goals: i64,
    away_goals: i64,
    store: State<'_, SharedStore>,
) -> Result<GroupMatch, String> {
    if home_goals < 0 || away_goals < 0 {
        return Err("Scores must be zero or positive whole numbers.".to_string());
    }
    with_store(&store, |kv| {
        let mut state = TournamentState::load(kv);
        let played =
            tournament::record_score(&mut state, &match_id, home_goals as u32, away_goals as u32)?;
        state.persist(kv)?;
        append_result_log(&format!(
            "{}: {} {}-{} {}",
            played.id, played.home, home_goals, away_goals, played.away
        ));
        Ok(played)
    })
}

#[tauri::command]
pub fn standings(store: State<'_, SharedStore>) -> Result<StandingsPayload, String> {
    with_store(&store, |kv| {
        let state = TournamentState::load(kv);
        let standings = compute_standings(&state.groups, &state.matches);
        let third_place = third_place_table(&standings);
        Ok(StandingsPayload {
            standings,
            third_place,
        })
    })
}

/// Polled speculatively by the frontend after every result. Returns the
/// stored bracket unchanged (possibly null) while the group stage is
/// unfinished; draws and persists it exactly once when everything is
/// played.
#[tauri::command]
pub fn draw_knockout(store: State<'_, SharedStore>) -> Result<Option<KnockoutBracket>, String> {
    with_store(&store, |kv| {
        let mut state = TournamentState::load(kv);
        let Some(bracket) = try_draw_bracket(&state, &mut thread_rng()) else {
            return Ok(state.bracket);
        };
        state.bracket = Some(bracket.clone());
        state.persist(kv)?;
        info!("knockout first round drawn");
        Ok(Some(bracket))
    })
}

#[tauri::command]
pub fn tournament_state(store: State<'_, SharedStore>) -> Result<TournamentSnapshot, String> {
    with_store(&store, |kv| Ok(build_snapshot(kv)))
}

#[tauri::command]
pub fn get_roster() -> Result<RosterPayload, String> {
    Ok(RosterPayload {
        teams: load_roster()?,
    })
}

/// Clears every persisted slot. The frontend asks the user to confirm
/// (dialog plugin) before invoking this.
#[tauri::command]
pub fn reset_tournament(store: State<'_, SharedStore>) -> Result<(), String> {
    with_store(&store, |kv| {
        tournament::clear_state(kv)?;
        info!("tournament state cleared");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::{env, fs};

    fn temp_store(tag: &str) -> KvStore {
        let root = env::temp_dir().join(format!(
            "cup-tracker-commands-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        KvStore::new(root)
    }

    fn test_roster() -> Vec<String> {
        (0..24).map(|i| format!("Team {i:02}")).collect()
    }

    #[test]
    fn test_full_flow_persists_and_snapshots() {
        let kv = temp_store("full-flow");
        let roster = test_roster();
        let mut rng = StdRng::seed_from_u64(17);

        let mut state = TournamentState::load(&kv);
        tournament::draw_groups(&mut state, &roster, false, &mut rng).unwrap();
        for round in 1..=3 {
            tournament::generate_round(&mut state, round).unwrap();
        }
        state.persist(&kv).unwrap();

        // Play everything through a fresh load, as each command does.
        let mut state = TournamentState::load(&kv);
        assert_eq!(state.matches.len(), 36);
        let ids: Vec<String> = state.matches.iter().map(|m| m.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            tournament::record_score(&mut state, id, (i % 3) as u32, (i % 2) as u32).unwrap();
        }
        state.persist(&kv).unwrap();

        let mut state = TournamentState::load(&kv);
        let bracket = try_draw_bracket(&state, &mut rng).unwrap();
        state.bracket = Some(bracket);
        state.persist(&kv).unwrap();

        let snapshot = build_snapshot(&kv);
        assert_eq!(snapshot.groups.len(), GROUP_COUNT);
        assert_eq!(snapshot.matches.len(), 36);
        assert_eq!(snapshot.rounds_generated, 3);
        assert_eq!(snapshot.standings.len(), GROUP_COUNT);
        assert_eq!(snapshot.third_place.ranked.len(), GROUP_COUNT);
        assert_eq!(snapshot.bracket.unwrap().r16.len(), 8);

        // Eligibility is spent: a later poll leaves the bracket alone.
        let state = TournamentState::load(&kv);
        assert!(try_draw_bracket(&state, &mut rng).is_none());
    }

    #[test]
    fn test_reset_then_fixed_draw_reproduces_partition() {
        let kv = temp_store("reset-redraw");
        let roster = test_roster();
        let mut rng = StdRng::seed_from_u64(2);

        let mut state = TournamentState::load(&kv);
        let first = tournament::draw_groups(&mut state, &roster, false, &mut rng).unwrap();
        tournament::generate_round(&mut state, 1).unwrap();
        state.persist(&kv).unwrap();

        tournament::clear_state(&kv).unwrap();
        let snapshot = build_snapshot(&kv);
        assert!(snapshot.groups.is_empty());
        assert!(snapshot.matches.is_empty());
        assert_eq!(snapshot.rounds_generated, 0);
        assert!(snapshot.bracket.is_none());

        let mut state = TournamentState::load(&kv);
        let second = tournament::draw_groups(&mut state, &roster, false, &mut rng).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.teams, b.teams);
        }
    }
}
