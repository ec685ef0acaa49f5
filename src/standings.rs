use crate::tournament::group_letter;
use crate::types::*;
use std::cmp::Ordering;

/// Ranking order shared by group tables and the third-place comparison:
/// points, then goal difference, then goals for (all descending), with
/// ascending team name as the final key. Total and stable: two distinct
/// rows never tie.
pub fn compare_records(a: &StandingsRow, b: &StandingsRow) -> Ordering {
  b.pts
    .cmp(&a.pts)
    .then(b.gd.cmp(&a.gd))
    .then(b.gf.cmp(&a.gf))
    .then(a.team.cmp(&b.team))
}

fn zero_row(team: &str) -> StandingsRow {
  StandingsRow {
    team: team.to_string(),
    played: 0,
    w: 0,
    d: 0,
    l: 0,
    gf: 0,
    ga: 0,
    gd: 0,
    pts: 0,
    position: 0,
  }
}

fn apply_result(row: &mut StandingsRow, scored: u32, conceded: u32) {
  row.played += 1;
  row.gf += scored;
  row.ga += conceded;
  row.gd = row.gf as i64 - row.ga as i64;
  if scored > conceded {
    row.w += 1;
    row.pts += 3;
  } else if scored == conceded {
    row.d += 1;
    row.pts += 1;
  } else {
    row.l += 1;
  }
}

/// Fold the played matches into one ranked table per group. A full
/// recomputation every call; unplayed matches contribute nothing.
pub fn compute_standings(groups: &[Group], matches: &[GroupMatch]) -> Vec<GroupStandings> {
  groups
    .iter()
    .map(|group| {
      let mut rows: Vec<StandingsRow> =
        group.teams.iter().map(|team| zero_row(team)).collect();

      for m in matches {
        if m.group_index != group.index || m.status != MatchStatus::Played {
          continue;
        }
        let (home_goals, away_goals) = match (m.home_goals, m.away_goals) {
          (Some(h), Some(a)) => (h, a),
          _ => continue,
        };
        if let Some(row) = rows.iter_mut().find(|r| r.team == m.home) {
          apply_result(row, home_goals, away_goals);
        }
        if let Some(row) = rows.iter_mut().find(|r| r.team == m.away) {
          apply_result(row, away_goals, home_goals);
        }
      }

      rows.sort_by(compare_records);
      for (i, row) in rows.iter_mut().enumerate() {
        row.position = (i + 1) as u32;
      }

      GroupStandings {
        group_index: group.index,
        group_letter: group_letter(group.index),
        rows,
      }
    })
    .collect()
}

/// Collect the position-3 row from each group, rank them under the shared
/// key order, and mark the top 4 qualified. At most one candidate per
/// group; a group without a third place is skipped.
pub fn third_place_table(standings: &[GroupStandings]) -> ThirdPlaceTable {
  let mut ranked: Vec<ThirdPlaceRow> = standings
    .iter()
    .filter_map(|group| {
      group
        .rows
        .iter()
        .find(|row| row.position == 3)
        .map(|row| ThirdPlaceRow {
          group_letter: group.group_letter,
          row: row.clone(),
        })
    })
    .collect();

  ranked.sort_by(|a, b| compare_records(&a.row, &b.row));
  let qualified = ranked.iter().take(QUALIFIED_THIRDS).cloned().collect();
  ThirdPlaceTable { ranked, qualified }
}
