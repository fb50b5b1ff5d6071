//! End-of-game scoring.
//!
//! A seat scores its coins plus, at the rate of its popularity tier, its
//! stars, territories and resource pairs, plus the structure bonus chosen
//! at setup.
//!
//! | Popularity | per star | per territory | per resource pair |
//! |------------|----------|---------------|-------------------|
//! | 0..=6      | 3        | 2             | 1                 |
//! | 7..=12     | 4        | 3             | 2                 |
//! | 13..=18    | 5        | 4             | 3                 |

use serde::{Deserialize, Serialize};

use crate::board::{SpaceId, Terrain};
use crate::core::{PlayerId, PlayerMap};
use crate::game::{GameResult, GameState, PieceKind};

/// The structure bonus scoring rule, fixed at game start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureBonus {
    /// Tunnels adjacent to at least one of the seat's structures.
    AdjacentTunnels,
    /// Structures standing on tunnels.
    OnTunnels,
    /// Longest unbroken run of structures along a row.
    LongestRow,
    /// Lakes adjacent to at least one structure.
    AdjacentLakes,
    /// Encounter spaces with or adjacent to a structure.
    AdjacentEncounters,
    /// Structures on farms or tundras.
    OnFarmsOrTundras,
}

impl StructureBonus {
    pub const ALL: [StructureBonus; 6] = [
        StructureBonus::AdjacentTunnels,
        StructureBonus::OnTunnels,
        StructureBonus::LongestRow,
        StructureBonus::AdjacentLakes,
        StructureBonus::AdjacentEncounters,
        StructureBonus::OnFarmsOrTundras,
    ];

    /// The quantity this rule counts for `seat`.
    #[must_use]
    pub fn count(self, state: &GameState, seat: PlayerId) -> usize {
        let board = state.board();
        let structures: Vec<SpaceId> = state
            .pieces_of(state.faction_of(seat), PieceKind::Structure)
            .map(|(_, s)| s)
            .collect();

        let touched = |pred: &dyn Fn(SpaceId) -> bool, include_own: bool| {
            board
                .grid()
                .filter(|space| pred(space.id))
                .filter(|space| {
                    structures.iter().any(|&s| {
                        (include_own && s == space.id) || board.neighbours(s).contains(&space.id)
                    })
                })
                .count()
        };

        match self {
            StructureBonus::AdjacentTunnels => touched(&|s| board.is_tunnel(s), false),
            StructureBonus::OnTunnels => structures.iter().filter(|&&s| board.is_tunnel(s)).count(),
            StructureBonus::LongestRow => longest_row(&structures),
            StructureBonus::AdjacentLakes => touched(&|s| board.terrain(s) == Terrain::Lake, false),
            StructureBonus::AdjacentEncounters => touched(&|s| board.space(s).encounter, true),
            StructureBonus::OnFarmsOrTundras => structures
                .iter()
                .filter(|&&s| matches!(board.terrain(s), Terrain::Farm | Terrain::Tundra))
                .count(),
        }
    }

    /// Coins paid for a count.
    #[must_use]
    pub fn coins(self, count: usize) -> u32 {
        let table: &[u32] = match self {
            StructureBonus::AdjacentTunnels
            | StructureBonus::AdjacentLakes
            | StructureBonus::AdjacentEncounters => &[0, 2, 2, 4, 4, 6],
            StructureBonus::OnTunnels | StructureBonus::OnFarmsOrTundras => &[0, 2, 4, 4, 6],
            StructureBonus::LongestRow => &[0, 0, 2, 4, 6],
        };
        table[count.min(table.len() - 1)]
    }
}

fn longest_row(structures: &[SpaceId]) -> usize {
    let mut coords: Vec<(u8, u8)> = structures.iter().filter_map(|s| s.coords()).collect();
    coords.sort_unstable();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<(u8, u8)> = None;
    for (r, c) in coords {
        run = match prev {
            Some((pr, pc)) if pr == r && pc + 1 == c => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some((r, c));
    }
    best
}

/// Popularity tier: 0, 1 or 2.
#[must_use]
pub fn popularity_tier(popularity: u8) -> usize {
    match popularity {
        0..=6 => 0,
        7..=12 => 1,
        _ => 2,
    }
}

/// Final score of one seat.
#[must_use]
pub fn score(state: &GameState, seat: PlayerId) -> i32 {
    const PER_STAR: [u32; 3] = [3, 4, 5];
    const PER_TERRITORY: [u32; 3] = [2, 3, 4];
    const PER_PAIR: [u32; 3] = [1, 2, 3];

    let player = state.player(seat);
    let tier = popularity_tier(player.popularity);
    let stars = u32::from(player.stars.count());
    let territories = state.territory_count(seat);
    let pairs = state.controlled_resources(seat).total() / 2;
    let bonus = state.config().structure_bonus;

    let total = player.coins
        + PER_STAR[tier] * stars
        + PER_TERRITORY[tier] * territories
        + PER_PAIR[tier] * pairs
        + bonus.coins(bonus.count(state, seat));
    i32::try_from(total).unwrap_or(i32::MAX)
}

/// Scores for both seats and the winner (`None` on a tie).
#[must_use]
pub fn final_result(state: &GameState) -> GameResult {
    let scores = PlayerMap::new(|p| score(state, p));
    let (first, second) = (PlayerId::new(0), PlayerId::new(1));
    let winner = match scores[first].cmp(&scores[second]) {
        std::cmp::Ordering::Greater => Some(state.faction_of(first)),
        std::cmp::Ordering::Less => Some(state.faction_of(second)),
        std::cmp::Ordering::Equal => None,
    };
    GameResult { winner, scores }
}
