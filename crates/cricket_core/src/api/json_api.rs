use crate::config::MatchConfig;
use crate::engine::DeliveryEvent;
use crate::error::{CoreError, Result};
use crate::models::{MatchOutcome, Team, TeamSide};
use crate::roster::{build_team, generate_team};
use crate::scoreboard::{scorecards, TeamScorecard};
use crate::session::{MatchSession, SessionAction};
use crate::SCHEMA_VERSION;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Overs per innings; defaults to 20.
    #[serde(default)]
    pub overs: Option<u32>,
    #[serde(default)]
    pub max_overs_per_bowler: Option<u32>,
    #[serde(default = "default_bat_first")]
    pub bat_first: TeamSide,
    /// Imported roster for Team A; generated from the seed when omitted.
    #[serde(default)]
    pub team_a: Option<RosterData>,
    #[serde(default)]
    pub team_b: Option<RosterData>,
}

fn default_bat_first() -> TeamSide {
    TeamSide::A
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InningsSummary {
    pub team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
}

impl InningsSummary {
    fn from_team(team: &Team) -> Self {
        Self {
            team: team.name.clone(),
            runs: team.total_runs,
            wickets: team.wickets,
            overs: team.overs().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub result: String,
    pub outcome: MatchOutcome,
    pub target: Option<u32>,
    pub first_innings: InningsSummary,
    pub second_innings: InningsSummary,
    pub scorecards: Vec<TeamScorecard>,
    pub deliveries: Vec<DeliveryEvent>,
}

fn resolve_team(
    roster: Option<&RosterData>,
    default_name: &str,
    prefix: &str,
    id_base: u32,
    rng: &mut ChaCha8Rng,
) -> Team {
    match roster {
        Some(data) => {
            let name = data.name.as_deref().unwrap_or(default_name);
            build_team(name, &data.rows, &data.headers)
        }
        None => generate_team(prefix, id_base, rng),
    }
}

/// Run a whole match from a request, selecting players automatically.
pub fn simulate_match(request: &MatchRequest) -> Result<MatchResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(CoreError::SchemaVersion {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let mut config = MatchConfig::default();
    if let Some(overs) = request.overs {
        config.overs = overs;
        config.max_overs_per_bowler = config.max_overs_per_bowler.min(overs);
    }
    if let Some(cap) = request.max_overs_per_bowler {
        config.max_overs_per_bowler = cap;
    }
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let team_a = resolve_team(request.team_a.as_ref(), "Team A", "A", 1, &mut rng);
    let team_b = resolve_team(request.team_b.as_ref(), "Team B", "B", 100, &mut rng);

    let mut session = MatchSession::new(config);
    session.load_teams(team_a, team_b)?;
    session.apply(SessionAction::SetBattingTeam(request.bat_first))?;
    let outcome = session.play_out(&mut rng)?;

    let state = session.state();
    tracing::info!(seed = request.seed, result = %outcome, "simulated match");

    Ok(MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        result: outcome.to_string(),
        outcome,
        target: state.target,
        first_innings: InningsSummary::from_team(state.team(request.bat_first)),
        second_innings: InningsSummary::from_team(state.team(request.bat_first.other())),
        scorecards: scorecards(state).into_iter().collect(),
        deliveries: session.history().to_vec(),
    })
}

/// JSON in, JSON out wrapper over [`simulate_match`].
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)?;
    let response = simulate_match(&request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use serde_json::json;

    fn roster_rows(base: u32, prefix: &str) -> Vec<Vec<String>> {
        (0..11)
            .map(|i| {
                let mut row = vec![(base + i).to_string(), format!("{prefix}{i}")];
                row.extend(std::iter::repeat("60".to_string()).take(8));
                row
            })
            .collect()
    }

    #[test]
    fn test_basic_simulation() {
        let request = json!({ "schema_version": 1, "seed": 42 });
        let out = simulate_match_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["result"].is_string());
        assert_eq!(parsed["scorecards"].as_array().unwrap().len(), 2);
        assert!(!parsed["deliveries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_determinism() {
        let request = json!({ "schema_version": 1, "seed": 999, "overs": 5 }).to_string();
        let first = simulate_match_json(&request).unwrap();
        let second = simulate_match_json(&request).unwrap();
        assert_eq!(first, second, "Same seed should produce same result");
    }

    #[test]
    fn test_target_matches_first_innings() {
        let request: MatchRequest =
            serde_json::from_value(json!({ "schema_version": 1, "seed": 3, "overs": 5, "bat_first": "b" }))
                .unwrap();
        let response = simulate_match(&request).unwrap();
        assert_eq!(response.first_innings.team, "Team B");
        assert_eq!(response.target, Some(response.first_innings.runs + 1));
        assert_eq!(response.result, response.outcome.to_string());
    }

    #[test]
    fn test_imported_rosters_are_used() {
        let request = json!({
            "schema_version": 1,
            "seed": 11,
            "overs": 3,
            "team_a": { "name": "Lions", "rows": roster_rows(1, "L") },
            "team_b": { "headers": ["ID"], "rows": roster_rows(50, "T") },
        });
        let request: MatchRequest = serde_json::from_value(request).unwrap();
        let response = simulate_match(&request).unwrap();
        assert_eq!(response.first_innings.team, "Lions");
        assert_eq!(response.second_innings.team, "Team B");
        assert!(response
            .deliveries
            .iter()
            .filter(|d| d.batting_team == "Lions")
            .all(|d| d.bowler_id >= 50));
    }

    #[test]
    fn test_rejects_schema_mismatch() {
        let request = json!({ "schema_version": 9, "seed": 1 });
        let err = simulate_match_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::SchemaVersion { found: 9, expected: 1 }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_rejects_bad_config_and_short_roster() {
        let zero_overs = json!({ "schema_version": 1, "seed": 1, "overs": 0 });
        assert!(matches!(
            simulate_match_json(&zero_overs.to_string()),
            Err(CoreError::Config(_))
        ));

        let short = json!({
            "schema_version": 1,
            "seed": 1,
            "team_a": { "rows": [["1", "Solo"]] },
        });
        assert!(matches!(
            simulate_match_json(&short.to_string()),
            Err(CoreError::Session(_))
        ));

        assert!(matches!(simulate_match_json("{"), Err(CoreError::Serialization(_))));
    }

    #[test]
    fn test_rejects_bowler_cap_too_low_for_innings() {
        for seed in 0..5 {
            let request = json!({
                "schema_version": 1,
                "seed": seed,
                "overs": 20,
                "max_overs_per_bowler": 1,
            });
            assert!(matches!(
                simulate_match_json(&request.to_string()),
                Err(CoreError::Config(ConfigError::Validation(_)))
            ));
        }
    }
}
