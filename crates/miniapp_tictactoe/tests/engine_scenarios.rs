//! End-to-end engine scenarios.

use miniapp_tictactoe::{
    Cell, Engine, EngineError, ErrorKind, GameKey, GameStatus, GameStore, MemoryStore, Outcome,
    Player,
};

fn engine() -> Engine {
    Engine::new(MemoryStore::new())
}

fn play_all(engine: &Engine, key: &GameKey, moves: &[(i64, Player)]) {
    for &(position, player) in moves {
        engine
            .apply_move(key, position, player)
            .unwrap_or_else(|e| panic!("move {} by {} failed: {}", position, player, e));
    }
}

#[test]
fn test_new_game_is_empty_with_x_to_move() {
    let engine = engine();
    let game = engine.create_game().unwrap();

    assert!(game.board().cells().iter().all(|c| *c == Cell::Empty));
    assert_eq!(*game.current_player(), Player::X);
    assert_eq!(*game.winner(), None);
    assert!(!*game.game_over());
    assert_eq!(engine.get_game(game.key()).unwrap(), game);
}

#[test]
fn test_created_games_get_distinct_keys() {
    let engine = engine();
    let a = engine.create_game().unwrap();
    let b = engine.create_game().unwrap();
    assert_ne!(a.key(), b.key());
    assert_eq!(engine.store().len(), 2);
}

#[test]
fn test_diagonal_win() {
    let engine = engine();
    let game = engine.create_game().unwrap();
    let moves = [
        (0, Player::X),
        (1, Player::O),
        (4, Player::X),
        (2, Player::O),
    ];
    play_all(&engine, game.key(), &moves);

    let outcome = engine.apply_move(game.key(), 8, Player::X).unwrap();
    let game = outcome.game();

    assert_eq!(
        game.board().symbols(),
        vec!["X", "O", "O", "", "X", "", "", "", "X"]
    );
    assert_eq!(*game.winner(), Some(Outcome::Won(Player::X)));
    assert!(*game.game_over());
    assert_eq!(outcome.message(), "Player X wins!");
}

#[test]
fn test_full_board_without_line_is_a_tie() {
    // Final board:
    // X O X
    // X O O
    // O X X
    let engine = engine();
    let game = engine.create_game().unwrap();
    play_all(
        &engine,
        game.key(),
        &[
            (0, Player::X),
            (1, Player::O),
            (2, Player::X),
            (4, Player::O),
            (3, Player::X),
            (5, Player::O),
            (7, Player::X),
            (6, Player::O),
        ],
    );

    let outcome = engine.apply_move(game.key(), 8, Player::X).unwrap();
    assert_eq!(*outcome.game().winner(), Some(Outcome::Tie));
    assert_eq!(outcome.game().status(), GameStatus::Tied);
    assert!(*outcome.game().game_over());
    assert_eq!(outcome.message(), "It's a tie!");
}

#[test]
fn test_position_out_of_range() {
    let engine = engine();
    let game = engine.create_game().unwrap();

    let err = engine.apply_move(game.key(), 9, Player::X).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.to_string(), "position out of range");

    let err = engine.apply_move(game.key(), -1, Player::X).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_wrong_player() {
    let engine = engine();
    let game = engine.create_game().unwrap();

    let err = engine.apply_move(game.key(), 4, Player::O).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(err.to_string(), "not this player's turn");
    assert_eq!(engine.get_game(game.key()).unwrap(), game);
}

#[test]
fn test_unknown_key() {
    let engine = engine();
    let key = GameKey::from("game_does_not_exist");

    let err = engine.apply_move(&key, 0, Player::X).unwrap_err();
    assert_eq!(err, EngineError::NotFound(key.clone()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(engine.get_game(&key).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_occupied_cell_fails_repeatedly_without_mutation() {
    let engine = engine();
    let game = engine.create_game().unwrap();
    play_all(&engine, game.key(), &[(4, Player::X)]);
    let before = engine.get_game(game.key()).unwrap();

    for _ in 0..2 {
        let err = engine.apply_move(game.key(), 4, Player::O).unwrap_err();
        assert_eq!(err, EngineError::CellOccupied(4));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(engine.get_game(game.key()).unwrap(), before);
    }
}

#[test]
fn test_turns_alternate() {
    let engine = engine();
    let game = engine.create_game().unwrap();

    let after_x = engine.apply_move(game.key(), 0, Player::X).unwrap();
    assert_eq!(*after_x.game().current_player(), Player::O);
    assert_eq!(after_x.message(), "Player O's turn");

    let after_o = engine.apply_move(game.key(), 1, Player::O).unwrap();
    assert_eq!(*after_o.game().current_player(), Player::X);
    assert_eq!(after_o.message(), "Player X's turn");
}

#[test]
fn test_finished_game_rejects_every_move() {
    let engine = engine();
    let game = engine.create_game().unwrap();
    let moves = [
        (0, Player::X),
        (3, Player::O),
        (1, Player::X),
        (4, Player::O),
        (2, Player::X),
    ];
    play_all(&engine, game.key(), &moves);
    let finished = engine.get_game(game.key()).unwrap();
    assert!(*finished.game_over());

    for position in -1..=9 {
        for player in [Player::X, Player::O] {
            let err = engine.apply_move(game.key(), position, player).unwrap_err();
            assert_eq!(err, EngineError::GameFinished);
        }
    }
    assert_eq!(engine.get_game(game.key()).unwrap(), finished);
}

#[test]
fn test_mark_counts_stay_balanced() {
    let engine = engine();
    let game = engine.create_game().unwrap();
    let moves = [
        (4, Player::X),
        (0, Player::O),
        (8, Player::X),
        (2, Player::O),
        (1, Player::X),
    ];

    for (position, player) in moves {
        let outcome = engine.apply_move(game.key(), position, player).unwrap();
        let board = outcome.game().board();
        let diff = board.count(Player::X) as i64 - board.count(Player::O) as i64;
        assert!(diff == 0 || diff == 1, "X-O difference was {}", diff);
    }
}

#[test]
fn test_stale_snapshot_cannot_roll_back_finished_game() {
    let engine = engine();
    let game = engine.create_game().unwrap();
    let snapshot = game.clone();
    let moves = [
        (0, Player::X),
        (3, Player::O),
        (1, Player::X),
        (4, Player::O),
        (2, Player::X),
    ];
    play_all(&engine, game.key(), &moves);

    let err = engine.store().put(snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let stored = engine.get_game(game.key()).unwrap();
    assert!(*stored.game_over());
    assert_eq!(*stored.winner(), Some(Outcome::Won(Player::X)));
    assert_eq!(stored.board().count(Player::X) + stored.board().count(Player::O), 5);
}
