//! Roster Builder Library
//!
//! CSV roster file → `RosterTable` → `Team`, plus the reverse direction for
//! writing generated rosters back out.
//!
//! A roster file is one header row followed by one row per player. Columns
//! are read by position (see [`cricket_core::roster::ROSTER_HEADERS`]).

use cricket_core::api::RosterData;
use cricket_core::roster::{build_team, default_headers, team_to_rows, ROSTER_COLUMNS};
use cricket_core::Team;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to access roster file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed roster CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "roster {} has {columns} header columns and {rows} player rows; need at least {min_columns} and {min_rows}",
        path.display()
    )]
    Shape {
        path: PathBuf,
        columns: usize,
        rows: usize,
        min_columns: usize,
        min_rows: usize,
    },
}

/// Raw cells of a roster file, trimmed but otherwise uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    pub fn into_roster_data(self, name: Option<String>) -> RosterData {
        RosterData {
            name,
            headers: self.headers,
            rows: self.rows,
        }
    }
}

fn csv_error(path: &Path, source: csv::Error) -> RosterError {
    RosterError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RosterError {
    RosterError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a roster CSV. The first record is the header row.
///
/// Rows may have differing lengths; missing cells are defaulted later by
/// [`build_team`]. Blank lines are skipped.
pub fn read_roster_csv(path: &Path) -> Result<RosterTable, RosterError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(String::from)
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| csv_error(path, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(String::from).collect());
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read roster CSV");
    Ok(RosterTable { headers, rows })
}

/// Reject files with too few header columns or player rows.
pub fn validate_shape(path: &Path, table: &RosterTable, min_rows: usize) -> Result<(), RosterError> {
    if table.headers.len() < ROSTER_COLUMNS || table.rows.len() < min_rows {
        return Err(RosterError::Shape {
            path: path.to_path_buf(),
            columns: table.headers.len(),
            rows: table.rows.len(),
            min_columns: ROSTER_COLUMNS,
            min_rows,
        });
    }
    Ok(())
}

/// Read, validate and build a team from a roster file.
pub fn load_team(name: &str, path: &Path, min_rows: usize) -> Result<Team, RosterError> {
    let table = read_roster_csv(path)?;
    validate_shape(path, &table, min_rows)?;
    let team = build_team(name, &table.rows, &table.headers);
    tracing::info!(team = name, players = team.players.len(), path = %path.display(), "loaded roster");
    Ok(team)
}

/// Write a team as a roster CSV with the standard header row.
pub fn write_roster_csv(team: &Team, path: &Path) -> Result<(), RosterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(default_headers())
        .map_err(|e| csv_error(path, e))?;
    for row in team_to_rows(team) {
        writer.write_record(&row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;

    tracing::info!(team = %team.name, path = %path.display(), "wrote roster");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::roster::{generate_team, GENERATED_ROSTER_SIZE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "ID,Player Name,Power,Defense,Timing,Running,Accuracy,Intelligence,Variation,Line & Length";

    fn roster_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn full_roster() -> String {
        let mut body = format!("{HEADER}\n");
        for i in 1..=11 {
            body.push_str(&format!("{i}, Player{i} ,70,60,50,40,30,20,10,90\n"));
        }
        body
    }

    #[test]
    fn test_read_trims_cells_and_skips_blank_lines() {
        let file = roster_file(&format!("{HEADER}\n 3 , Root ,1,2,3,4,5,6,7,8\n\n4,Stokes\n"));
        let table = read_roster_csv(file.path()).unwrap();

        assert_eq!(table.headers.len(), 10);
        assert_eq!(table.headers[9], "Line & Length");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "3");
        assert_eq!(table.rows[0][1], "Root");
        assert_eq!(table.rows[1], vec!["4".to_string(), "Stokes".to_string()]);
    }

    #[test]
    fn test_load_team_builds_players() {
        let file = roster_file(&full_roster());
        let team = load_team("Team A", file.path(), 11).unwrap();

        assert_eq!(team.name, "Team A");
        assert_eq!(team.players.len(), 11);
        assert_eq!(team.players[0].name, "Player1");
        assert_eq!(team.players[0].batting.power, 70);
        assert_eq!(team.players[0].bowling.line_and_length, 90);
    }

    #[test]
    fn test_shape_rejects_short_header_and_few_rows() {
        let file = roster_file("ID,Player Name\n1,Solo\n");
        let err = load_team("Team A", file.path(), 11).unwrap_err();
        match err {
            RosterError::Shape { columns, rows, .. } => {
                assert_eq!(columns, 2);
                assert_eq!(rows, 1);
            }
            other => panic!("expected shape error, got {other}"),
        }

        let mut body = format!("{HEADER}\n");
        body.push_str("1,Only,1,1,1,1,1,1,1,1\n");
        let file = roster_file(&body);
        assert!(matches!(
            load_team("Team A", file.path(), 11),
            Err(RosterError::Shape { rows: 1, .. })
        ));
    }

    #[test]
    fn test_loaded_ids_are_unique_when_cells_are_blank() {
        let mut body = format!("{HEADER}\n,Blank\n1,Explicit\n");
        for i in 3..=11 {
            body.push_str(&format!("{i},Player{i}\n"));
        }
        let file = roster_file(&body);
        let team = load_team("Team A", file.path(), 11).unwrap();

        let mut ids: Vec<_> = team.players.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
        assert_eq!(team.player(1).unwrap().name, "Explicit");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_roster_csv(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }), "got {err}");
    }

    #[test]
    fn test_written_roster_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("team_b.csv");
        let team = generate_team("B", 100, &mut ChaCha8Rng::seed_from_u64(21));

        write_roster_csv(&team, &path).unwrap();
        let loaded = load_team(&team.name, &path, GENERATED_ROSTER_SIZE).unwrap();

        assert_eq!(loaded.players.len(), team.players.len());
        assert_eq!(loaded.players[0].id, 100);
        assert_eq!(loaded.players[0].name, team.players[0].name);
    }

    #[test]
    fn test_table_converts_to_request_roster() {
        let file = roster_file(&full_roster());
        let data = read_roster_csv(file.path())
            .unwrap()
            .into_roster_data(Some("Lions".to_string()));
        assert_eq!(data.name.as_deref(), Some("Lions"));
        assert_eq!(data.rows.len(), 11);
    }
}
