use crate::standings::{compute_standings, third_place_table};
use crate::tournament::TournamentState;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct KnockoutEntrant {
  pub team: String,
  pub group_letter: char,
}

/// True once every scheduled group match has a result.
pub fn group_stage_complete(state: &TournamentState) -> bool {
  !state.groups.is_empty()
    && state.matches.len() == state.groups.len() * MATCHES_PER_GROUP
    && state.matches.iter().all(|m| m.status == MatchStatus::Played)
}

/// Draw the round of 16, or return None when the tournament is not ready
/// for it. This is a polled "try" operation: callers invoke it
/// speculatively after every result, and an ineligible state is not an
/// error. At most one draw per group stage; an existing bracket with a
/// populated first round blocks a redraw.
pub fn try_draw_bracket<R: Rng>(state: &TournamentState, rng: &mut R) -> Option<KnockoutBracket> {
  if state.rounds_generated != ROUNDS_PER_GROUP {
    return None;
  }
  if !group_stage_complete(state) {
    return None;
  }
  if let Some(bracket) = &state.bracket {
    if !bracket.r16.is_empty() {
      return None;
    }
  }

  let standings = compute_standings(&state.groups, &state.matches);
  let thirds = third_place_table(&standings);

  let mut pool: Vec<KnockoutEntrant> = Vec::with_capacity(KNOCKOUT_ENTRANTS);
  for position in [1, 2] {
    for group in &standings {
      if let Some(row) = group.rows.iter().find(|r| r.position == position) {
        pool.push(KnockoutEntrant {
          team: row.team.clone(),
          group_letter: group.group_letter,
        });
      }
    }
  }
  for third in &thirds.qualified {
    pool.push(KnockoutEntrant {
      team: third.row.team.clone(),
      group_letter: third.group_letter,
    });
  }
  if pool.len() != KNOCKOUT_ENTRANTS {
    return None;
  }

  let pairs = pair_entrants(pool, rng);
  let r16 = pairs
    .into_iter()
    .enumerate()
    .map(|(i, (home, away))| Fixture {
      id: format!("R16-{}", i + 1),
      home: home.team,
      away: away.team,
      home_goals: None,
      away_goals: None,
      status: MatchStatus::Scheduled,
    })
    .collect();

  Some(KnockoutBracket {
    r16,
    qf: Vec::new(),
    sf: Vec::new(),
    final_round: Vec::new(),
  })
}

/// Shuffle the 16-entrant pool, split it into home and away halves in
/// shuffle order, then run the clash repair over the halves.
fn pair_entrants<R: Rng>(
  mut pool: Vec<KnockoutEntrant>,
  rng: &mut R,
) -> Vec<(KnockoutEntrant, KnockoutEntrant)> {
  pool.shuffle(rng);
  let mut away = pool.split_off(KNOCKOUT_ENTRANTS / 2);
  let mut home = pool;
  repair_clashes(&mut home, &mut away);
  home.into_iter().zip(away).collect()
}

/// Greedy swap pass over the two halves. For each same-group pairing at i,
/// look right on the away half for a swap that removes the clash without
/// creating one at j, then try the same on the home half. A clash neither
/// swap removes stays in place: this de-clasher is best effort, and a
/// residual same-group pairing is permitted output.
fn repair_clashes(home: &mut [KnockoutEntrant], away: &mut [KnockoutEntrant]) {
  for i in 0..home.len() {
    if home[i].group_letter != away[i].group_letter {
      continue;
    }
    let mut repaired = false;
    for j in (i + 1)..away.len() {
      if home[i].group_letter != away[j].group_letter
        && home[j].group_letter != away[i].group_letter
      {
        away.swap(i, j);
        repaired = true;
        break;
      }
    }
    if repaired {
      continue;
    }
    for j in (i + 1)..home.len() {
      if away[i].group_letter != home[j].group_letter
        && away[j].group_letter != home[i].group_letter
      {
        home.swap(i, j);
        break;
      }
    }
  }
}
