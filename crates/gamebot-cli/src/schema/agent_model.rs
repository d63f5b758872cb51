use chrono::{DateTime, Utc};
use gamebot_engine::GameKind;
use gamebot_evaluator::agent::{Agent, AgentConfig};
use serde::{Deserialize, Serialize};

/// A trained agent as saved by `gamebot train`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AgentModel {
    pub name: String,
    pub game: GameKind,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    #[serde(flatten)]
    pub config: AgentConfig,
    /// Raw scoring model parameters, layer by layer, weights row-major then biases.
    pub parameters: Vec<f32>,
}

impl AgentModel {
    pub fn from_agent(name: String, game: GameKind, agent: &Agent) -> Self {
        Self {
            name,
            game,
            trained_at: Utc::now(),
            final_fitness: agent.fitness(),
            config: agent.config(),
            parameters: agent.model().encode(),
        }
    }

    pub fn to_agent(&self) -> anyhow::Result<Agent> {
        let agent = self
            .config
            .build(self.game.feature_count(), &self.parameters)?;
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use gamebot_engine::TicTacToeState;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_agent_model_roundtrip() {
        let config = AgentConfig {
            shape: vec![10, 4, 1],
            depth: 2,
            weight_bound: 2.0,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let agent = config.spawn(10, &mut rng).unwrap();
        let model = AgentModel::from_agent("test".to_owned(), GameKind::TicTacToe, &agent);

        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"game\":\"tictactoe\""));
        assert!(json.contains("\"shape\":[10,4,1]"));
        let loaded: AgentModel = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, model);

        let rebuilt = loaded.to_agent().unwrap();
        assert_eq!(rebuilt.model(), agent.model());
        assert_eq!(rebuilt.depth(), 2);
        let state = TicTacToeState::new().after_move(4);
        assert_eq!(rebuilt.run(&state), agent.run(&state));
    }

    #[test]
    fn test_wrong_game_is_rejected() {
        let model = AgentModel {
            name: "mismatch".to_owned(),
            game: GameKind::Connect4,
            trained_at: Utc::now(),
            final_fitness: 0.0,
            config: AgentConfig {
                shape: vec![10, 1],
                depth: 1,
                weight_bound: 1.0,
            },
            parameters: vec![0.0; 11],
        };
        assert!(model.to_agent().is_err());
    }
}
