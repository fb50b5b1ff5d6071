//! Self-play and training data integration tests.

use rust_factions::nn::StateEncoder;
use rust_factions::training::TrainingSample;
use rust_factions::{
    ExperienceBuffer, FeatureEncoder, GameConfig, GameState, PlayerId, SelfPlayConfig,
    SelfPlayWorker, Trajectory, UniformEvaluator, ZeroConfig,
};

fn worker(max_moves: usize) -> SelfPlayWorker<UniformEvaluator> {
    let config = SelfPlayConfig::default()
        .with_zero(
            ZeroConfig::default()
                .with_simulations_per_move(1)
                .with_min_simulations(4),
        )
        .with_max_moves(max_moves)
        .with_seed_offset(100);
    SelfPlayWorker::new(config, UniformEvaluator)
}

fn short_game() -> GameState {
    GameState::new(GameConfig::default().with_turn_limit(6))
}

// =============================================================================
// Episodes
// =============================================================================

#[test]
fn test_episode_records_searched_decisions() {
    let traj = worker(0).play_episode(short_game(), 0).unwrap();
    assert_eq!(traj.seed, 100);
    assert!(traj.len() <= traj.game_length);

    let encoder = FeatureEncoder::new();
    for step in &traj.steps {
        assert_eq!(step.board.shape, encoder.board_shape());
        assert_eq!(step.aux.len(), encoder.aux_len());
        assert!(step.visits.len() >= 2);
        let visited: u32 = step.visits.iter().map(|(_, n)| n).sum();
        assert!(visited >= 4);
    }

    let numbers: Vec<usize> = traj.steps.iter().map(|s| s.move_number).collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_finished_episode_has_a_result() {
    let traj = worker(0).play_episode(short_game(), 1).unwrap();
    let scores = traj.scores.clone().unwrap();
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    match traj.winner {
        Some(_) => {
            assert_ne!(scores[p0], scores[p1]);
            assert_eq!(traj.outcome[p0] + traj.outcome[p1], 1.0);
        }
        None => {
            assert_eq!(scores[p0], scores[p1]);
            assert_eq!(traj.outcome[p0], 0.5);
        }
    }
}

#[test]
fn test_episodes_are_reproducible() {
    let a = worker(30).play_episode(short_game(), 4).unwrap();
    let b = worker(30).play_episode(short_game(), 4).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_trajectory_survives_bincode() {
    let traj = worker(20).play_episode(short_game(), 2).unwrap();
    let bytes = traj.to_bytes().unwrap();
    let back = Trajectory::from_bytes(&bytes).unwrap();
    assert_eq!(back, traj);
}

#[test]
fn test_samples_serialize_as_json() {
    let traj = worker(20).play_episode(short_game(), 3).unwrap();
    let samples = traj.to_training_samples();
    assert_eq!(samples.len(), traj.len());

    let json = serde_json::to_string(&samples).unwrap();
    let back: Vec<TrainingSample> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), samples.len());
    for sample in &back {
        let total: f32 = sample.policy.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }
}

// =============================================================================
// Experience Buffer
// =============================================================================

#[test]
fn test_buffer_collects_worker_output() {
    let mut worker = worker(12);
    let mut buffer = ExperienceBuffer::new(4);
    let mut recorded = 0;
    for i in 0..3 {
        let traj = worker.play_episode(short_game(), i).unwrap();
        recorded += traj.len();
        buffer.extend_from(&traj);
    }
    assert_eq!(buffer.games(), 3);
    assert_eq!(buffer.len(), recorded.min(4));

    let batch = buffer.sample_batch(3, 0);
    assert_eq!(batch.len(), buffer.len().min(3));
}
