//! Listing layout: ordering and the spotlight/grid split.

use serde::Serialize;

use crate::feed::Match;

/// Sort live matches before everything else, keeping feed order otherwise.
pub fn sort_live_first(matches: &mut [Match]) {
    // `sort_by_key` is stable.
    matches.sort_by_key(|m| !m.is_live());
}

/// The listing page split into a spotlight and a grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Listing {
    /// First live match, if any.
    pub spotlight: Option<Match>,
    /// Every other match, in input order.
    pub grid: Vec<Match>,
}

impl Listing {
    /// Split a match list. The spotlight's id is excluded from the grid.
    pub fn build(matches: &[Match]) -> Self {
        let Some(spotlight) = matches.iter().find(|m| m.is_live()).cloned() else {
            return Self {
                spotlight: None,
                grid: matches.to_vec(),
            };
        };

        let grid = matches
            .iter()
            .filter(|m| m.match_id != spotlight.match_id)
            .cloned()
            .collect();

        Self {
            spotlight: Some(spotlight),
            grid,
        }
    }

    /// Nothing to show at all.
    pub fn is_empty(&self) -> bool {
        self.spotlight.is_none() && self.grid.is_empty()
    }
}
