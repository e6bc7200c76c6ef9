use serde::{Deserialize, Serialize};
use crate::action::ActionType;

/// Numeric rules of the game. Fixed for the lifetime of a game once it starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rules {
    pub starting_coins: u8,
    pub income: u8,
    pub foreign_aid: u8,
    pub tax: u8,
    /// Upper bound on what a steal transfers.
    pub steal_limit: u8,
    pub assassinate_cost: u8,
    pub coup_cost: u8,
    /// At or above this many coins a player's only legal action is a coup.
    pub forced_coup_threshold: Option<u8>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_coins: 2,
            income: 1,
            foreign_aid: 2,
            tax: 3,
            steal_limit: 2,
            assassinate_cost: 3,
            coup_cost: 7,
            forced_coup_threshold: Some(10),
        }
    }
}

impl Rules {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn cost_of(&self, action: ActionType) -> u8 {
        match action {
            ActionType::Assassinate => self.assassinate_cost,
            ActionType::Coup => self.coup_cost,
            _ => 0,
        }
    }

    pub fn must_coup(&self, coins: u8) -> bool {
        self.forced_coup_threshold.is_some_and(|threshold| coins >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let rules = Rules::from_json(r#"{"coupCost": 8, "forcedCoupThreshold": null}"#).unwrap();
        assert_eq!(rules.coup_cost, 8);
        assert_eq!(rules.forced_coup_threshold, None);
        assert_eq!(rules.tax, 3);
        assert!(!rules.must_coup(200));
    }

    #[test]
    fn costs() {
        let rules = Rules::default();
        assert_eq!(rules.cost_of(ActionType::Coup), 7);
        assert_eq!(rules.cost_of(ActionType::Assassinate), 3);
        assert_eq!(rules.cost_of(ActionType::Steal), 0);
        assert!(rules.must_coup(10));
        assert!(!rules.must_coup(9));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Rules::from_json(r#"{"tax": -1}"#).is_err());
    }
}
