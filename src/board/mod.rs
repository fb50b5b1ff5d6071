//! Board geometry and per-faction movement tables.
//!
//! ## Key Types
//!
//! - `BoardMap`: the static standard board (terrain, rivers, tunnels,
//!   encounter markers, home bases)
//! - `SpaceId`: a space on the board
//! - `Adjacency`: where one player's units may step, given its abilities

pub mod adjacency;
pub mod map;

pub use adjacency::Adjacency;
pub use map::{BoardMap, Space, SpaceId, Terrain, COLS, GRID_SPACES, ROWS, TOTAL_SPACES};
