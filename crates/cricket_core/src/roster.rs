//! Roster construction from tabular data or synthetic generation.
//!
//! Parsing is permissive: a cell that is empty, unparsable, non-finite or
//! zero is treated as missing and defaulted. Shape validation (enough rows
//! and columns) happens before data reaches this module.

use crate::models::{
    BattingAttributes, BowlingAttributes, Player, PlayerId, Team, DEFAULT_ATTRIBUTE,
};
use rand::Rng;
use std::collections::HashSet;

/// Positional column layout of a roster row.
pub const ROSTER_HEADERS: [&str; 10] = [
    "ID",
    "Player Name",
    "Power",
    "Defense",
    "Timing",
    "Running",
    "Accuracy",
    "Intelligence",
    "Variation",
    "Line & Length",
];

pub const ROSTER_COLUMNS: usize = ROSTER_HEADERS.len();

/// Size of a generated roster.
pub const GENERATED_ROSTER_SIZE: usize = 11;

const SURNAMES: [&str; GENERATED_ROSTER_SIZE] = [
    "Sharma", "Kohli", "Rahul", "Pant", "Jadeja", "Ashwin", "Bumrah", "Shami", "Siraj", "Chahal",
    "Iyer",
];

mod col {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const POWER: usize = 2;
    pub const DEFENSE: usize = 3;
    pub const TIMING: usize = 4;
    pub const RUNNING: usize = 5;
    pub const ACCURACY: usize = 6;
    pub const INTELLIGENCE: usize = 7;
    pub const VARIATION: usize = 8;
    pub const LINE_AND_LENGTH: usize = 9;
}

/// Numeric value of a cell, or `None` when the cell is falsy.
fn truthy_number(row: &[String], idx: usize) -> Option<f64> {
    let value = row.get(idx)?.trim().parse::<f64>().ok()?;
    if value.is_finite() && value != 0.0 {
        Some(value)
    } else {
        None
    }
}

fn attribute(row: &[String], idx: usize) -> u8 {
    truthy_number(row, idx)
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_ATTRIBUTE)
}

fn explicit_id(row: &[String]) -> Option<PlayerId> {
    truthy_number(row, col::ID)
        .filter(|v| *v > 0.0 && v.fract() == 0.0 && *v <= PlayerId::MAX as f64)
        .map(|v| v as PlayerId)
}

/// Resolve one id per row, unique within the team.
///
/// Explicit ids are kept unless an earlier row already claimed them. Rows
/// without a usable id, and later duplicates, take the first id at or
/// after their 1-based row index that no row claims.
fn assign_ids(team: &str, rows: &[Vec<String>]) -> Vec<PlayerId> {
    let explicit: Vec<Option<PlayerId>> = rows.iter().map(|row| explicit_id(row)).collect();
    let reserved: HashSet<PlayerId> = explicit.iter().flatten().copied().collect();
    let mut used = HashSet::with_capacity(rows.len());

    explicit
        .iter()
        .enumerate()
        .map(|(index, explicit)| {
            if let Some(id) = explicit.filter(|id| !used.contains(id)) {
                used.insert(id);
                return id;
            }
            let start = (index as PlayerId).saturating_add(1);
            let id = (start..=PlayerId::MAX)
                .chain(1..start)
                .find(|c| !used.contains(c) && !reserved.contains(c))
                .unwrap_or(start);
            if let Some(duplicate) = *explicit {
                tracing::warn!(
                    team,
                    row = index + 1,
                    duplicate,
                    reassigned = id,
                    "duplicate player id"
                );
            }
            used.insert(id);
            id
        })
        .collect()
}

fn player_name(row: &[String], index: usize) -> String {
    match row.get(col::NAME).map(|s| s.trim()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Player {}", index + 1),
    }
}

fn player_from_row(row: &[String], index: usize, id: PlayerId) -> Player {
    Player::new(
        id,
        player_name(row, index),
        BattingAttributes {
            power: attribute(row, col::POWER),
            defense: attribute(row, col::DEFENSE),
            timing: attribute(row, col::TIMING),
            running: attribute(row, col::RUNNING),
        },
        BowlingAttributes {
            accuracy: attribute(row, col::ACCURACY),
            intelligence: attribute(row, col::INTELLIGENCE),
            variation: attribute(row, col::VARIATION),
            line_and_length: attribute(row, col::LINE_AND_LENGTH),
        },
    )
}

/// Build a team from roster rows laid out as [`ROSTER_HEADERS`].
///
/// Missing ids fall back to the 1-based row index (or the next free id if
/// another row holds it), missing names to `"Player {index}"`, and missing
/// or falsy attributes to 50. Ids are unique within the team.
pub fn build_team(name: &str, rows: &[Vec<String>], headers: &[String]) -> Team {
    if headers.len() < ROSTER_COLUMNS {
        tracing::warn!(
            team = name,
            found = headers.len(),
            expected = ROSTER_COLUMNS,
            "roster header row is short; missing columns will be defaulted"
        );
    }

    let ids = assign_ids(name, rows);
    let players: Vec<Player> = rows
        .iter()
        .zip(ids)
        .enumerate()
        .map(|(index, (row, id))| player_from_row(row, index, id))
        .collect();

    tracing::debug!(team = name, players = players.len(), "built team from roster rows");
    Team::new(name, players)
}

/// Largest `id_base` for which every generated id fits in a [`PlayerId`].
pub const MAX_GENERATED_ID_BASE: PlayerId =
    PlayerId::MAX - (GENERATED_ROSTER_SIZE as PlayerId - 1);

/// Generate an 11-player roster with uniformly random attributes.
///
/// Ids run from `id_base`, clamped to `1..=MAX_GENERATED_ID_BASE`; names
/// are `"{prefix} {surname}"`.
pub fn generate_team(prefix: &str, id_base: PlayerId, rng: &mut impl Rng) -> Team {
    let base = id_base.clamp(1, MAX_GENERATED_ID_BASE);
    if base != id_base {
        tracing::warn!(requested = id_base, used = base, "generated id base out of range");
    }
    let players = SURNAMES
        .iter()
        .enumerate()
        .map(|(i, surname)| {
            Player::new(
                base + i as PlayerId,
                format!("{prefix} {surname}"),
                BattingAttributes {
                    power: rng.gen_range(0..=100),
                    defense: rng.gen_range(0..=100),
                    timing: rng.gen_range(0..=100),
                    running: rng.gen_range(0..=100),
                },
                BowlingAttributes {
                    accuracy: rng.gen_range(0..=100),
                    intelligence: rng.gen_range(0..=100),
                    variation: rng.gen_range(0..=100),
                    line_and_length: rng.gen_range(0..=100),
                },
            )
        })
        .collect();

    Team::new(format!("Team {prefix}"), players)
}

/// Sample rosters: Team A with ids 1..=11, Team B with ids 100..=110.
pub fn initialize_teams(rng: &mut impl Rng) -> (Team, Team) {
    let team_a = generate_team("A", 1, rng);
    let team_b = generate_team("B", 100, rng);
    (team_a, team_b)
}

/// Roster rows for a team, in [`ROSTER_HEADERS`] order.
pub fn team_to_rows(team: &Team) -> Vec<Vec<String>> {
    team.players
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.batting.power.to_string(),
                p.batting.defense.to_string(),
                p.batting.timing.to_string(),
                p.batting.running.to_string(),
                p.bowling.accuracy.to_string(),
                p.bowling.intelligence.to_string(),
                p.bowling.variation.to_string(),
                p.bowling.line_and_length.to_string(),
            ]
        })
        .collect()
}

pub fn default_headers() -> Vec<String> {
    ROSTER_HEADERS.iter().map(|h| h.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_build_team_reads_positional_columns() {
        let rows = vec![row(&["7", "Kane", "80", "70", "60", "50", "40", "30", "20", "10"])];
        let team = build_team("Team A", &rows, &default_headers());
        let p = &team.players[0];
        assert_eq!(team.name, "Team A");
        assert_eq!(p.id, 7);
        assert_eq!(p.name, "Kane");
        assert_eq!(p.batting.power, 80);
        assert_eq!(p.batting.running, 50);
        assert_eq!(p.bowling.accuracy, 40);
        assert_eq!(p.bowling.line_and_length, 10);
        assert_eq!(team.total_runs, 0);
        assert_eq!(team.balls, 0);
        assert!(!p.is_out());
    }

    #[test]
    fn test_build_team_defaults_falsy_cells() {
        let rows = vec![
            row(&["", "", "0", "abc", "", "NaN"]),
            row(&["0", "  ", "101", "-4", "55.6", "", "", "", "", ""]),
        ];
        let team = build_team("X", &rows, &default_headers());

        let first = &team.players[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.name, "Player 1");
        assert_eq!(first.batting, BattingAttributes::default());
        assert_eq!(first.bowling, BowlingAttributes::default());

        let second = &team.players[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.name, "Player 2");
        assert_eq!(second.batting.power, 100);
        assert_eq!(second.batting.defense, 0);
        assert_eq!(second.batting.timing, 56);
    }

    #[test]
    fn test_build_team_tolerates_short_headers() {
        let rows = vec![row(&["3", "Solo"])];
        let team = build_team("Y", &rows, &[]);
        assert_eq!(team.players.len(), 1);
        assert_eq!(team.players[0].bowling.variation, DEFAULT_ATTRIBUTE);
    }

    #[test]
    fn test_generate_team_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let team = generate_team("A", 1, &mut rng);
        assert_eq!(team.name, "Team A");
        assert_eq!(team.players.len(), GENERATED_ROSTER_SIZE);
        assert_eq!(team.players[0].name, "A Sharma");
        assert_eq!(team.players[10].id, 11);
        assert!(team.players.iter().all(|p| p.batting.power <= 100));
    }

    #[test]
    fn test_fallback_ids_skip_ids_claimed_by_other_rows() {
        let rows = vec![
            row(&["", "Blank"]),
            row(&["1", "Explicit"]),
            row(&["3", "Three"]),
            row(&["3", "Copy"]),
            row(&[]),
        ];
        let team = build_team("Z", &rows, &default_headers());
        let ids: Vec<_> = team.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4, 5]);
        assert_eq!(team.player(1).unwrap().name, "Explicit");
        assert_eq!(team.player(2).unwrap().name, "Blank");
    }

    #[test]
    fn test_generate_team_clamps_id_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let team = generate_team("A", PlayerId::MAX, &mut rng);
        assert_eq!(team.players[0].id, MAX_GENERATED_ID_BASE);
        assert_eq!(team.players[10].id, PlayerId::MAX);

        let team = generate_team("A", 0, &mut rng);
        assert_eq!(team.players[0].id, 1);
    }

    #[test]
    fn test_initialize_teams_is_seed_deterministic() {
        let (a1, b1) = initialize_teams(&mut ChaCha8Rng::seed_from_u64(9));
        let (a2, b2) = initialize_teams(&mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert_eq!(b1.players[0].id, 100);
        assert_eq!(b1.players[10].id, 110);
    }

    #[test]
    fn test_rows_rebuild_same_roster() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let team = generate_team("B", 100, &mut rng);
        let rebuilt = build_team(&team.name, &team_to_rows(&team), &default_headers());
        // Generated zeros fall back to the default on re-import.
        for (orig, back) in team.players.iter().zip(&rebuilt.players) {
            assert_eq!(orig.id, back.id);
            assert_eq!(orig.name, back.name);
            if orig.batting.power != 0 {
                assert_eq!(orig.batting.power, back.batting.power);
            }
        }
    }
}
