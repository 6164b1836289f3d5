//! Concurrent access to the shared game table.

use miniapp_tictactoe::{Engine, EngineError, GameStore, MemoryStore, Player};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_same_turn_race_admits_exactly_one_move() {
    for _ in 0..50 {
        let engine = Arc::new(Engine::new(MemoryStore::new()));
        let game = engine.create_game().unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [0i64, 8]
            .into_iter()
            .map(|position| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                let key = game.key().clone();
                thread::spawn(move || {
                    barrier.wait();
                    engine.apply_move(&key, position, Player::X)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "results: {:?}", results);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(EngineError::NotYourTurn {
                expected: Player::O,
                actual: Player::X
            })
        )));

        let stored = engine.get_game(game.key()).unwrap();
        assert_eq!(stored.board().count(Player::X), 1);
        assert_eq!(*stored.current_player(), Player::O);
    }
}

#[test]
fn test_parallel_games_progress_independently() {
    let engine = Arc::new(Engine::new(MemoryStore::new()));
    let moves = [
        (0, Player::X),
        (3, Player::O),
        (1, Player::X),
        (4, Player::O),
        (2, Player::X),
    ];

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let game = engine.create_game().unwrap();
                for (position, player) in moves {
                    engine.apply_move(game.key(), position, player).unwrap();
                }
                game.key().clone()
            })
        })
        .collect();

    let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(engine.store().len(), 8);
    for key in keys {
        assert!(*engine.get_game(&key).unwrap().game_over());
    }
}

#[test]
fn test_held_game_lock_does_not_block_other_games() {
    let engine = Engine::new(MemoryStore::new());
    let held = engine.create_game().unwrap();
    let other = engine.create_game().unwrap();

    let moved = engine
        .store()
        .update(held.key(), |_locked| {
            let (tx, rx) = mpsc::channel();
            let worker = engine.clone();
            let key = other.key().clone();
            thread::spawn(move || {
                let _ = tx.send(worker.apply_move(&key, 4, Player::X));
            });
            // The first game stays locked until this closure returns.
            Ok(rx.recv_timeout(Duration::from_secs(5)))
        })
        .unwrap();

    let outcome = moved
        .expect("move on another game should not wait for the held lock")
        .unwrap();
    assert_eq!(outcome.game().board().count(Player::X), 1);
    assert_eq!(*engine.get_game(held.key()).unwrap().current_player(), Player::X);
}
