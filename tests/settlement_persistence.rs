//! Settlement ordering and persistence retry behavior under store failures.

mod common;

use chess_wager::{CreateGame, GameError, Outcome, Side};
use common::{Harness, MemoryGameStore, MemoryUserStore, harness, harness_with, user};

async fn started_game(h: &Harness) -> String {
    let created = h
        .registry
        .create(
            user(1, "alice"),
            CreateGame {
                side: Some(Side::White),
                unlisted: false,
                bid_amount: 100,
                timeout: None,
            },
        )
        .await
        .unwrap();
    h.registry.join(&created.code, user(2, "bob")).await.unwrap();
    created.code
}

#[tokio::test]
async fn test_decisive_outcome_updates_both_counters() {
    let h = harness();
    let code = started_game(&h).await;

    h.registry.record_terminal(&code, Outcome::Black).await.unwrap();

    assert_eq!(h.users.stats(2), (1, 0));
    assert_eq!(h.users.stats(1), (0, 1));
    assert_eq!(h.users.update_attempts(), 2);

    let saved = h.games.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].winner, Outcome::Black);
}

#[tokio::test]
async fn test_draw_touches_no_counters() {
    let h = harness();
    let code = started_game(&h).await;

    h.registry.record_terminal(&code, Outcome::Draw).await.unwrap();

    assert_eq!(h.users.update_attempts(), 0);
    assert_eq!(h.users.stats(1), (0, 0));
    assert_eq!(h.users.stats(2), (0, 0));

    // The drawn game is still persisted.
    let saved = h.games.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].winner, Outcome::Draw);
}

#[tokio::test]
async fn test_save_retries_through_transient_outage() {
    // Two failures, then success: within the three-attempt budget.
    let h = harness_with(MemoryGameStore::failing_first(2), MemoryUserStore::new());
    let code = started_game(&h).await;

    h.registry.record_terminal(&code, Outcome::White).await.unwrap();

    assert_eq!(h.games.save_attempts(), 3);
    assert_eq!(h.games.saved().len(), 1);
    // Stats were applied exactly once despite the save retries.
    assert_eq!(h.users.update_attempts(), 2);
    assert_eq!(h.users.stats(1), (1, 0));
}

#[tokio::test]
async fn test_save_retry_exhaustion_escalates() {
    let h = harness_with(MemoryGameStore::failing_first(5), MemoryUserStore::new());
    let code = started_game(&h).await;

    let err = h
        .registry
        .record_terminal(&code, Outcome::White)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::Persistence(_)));

    // Gave up at the attempt budget, nothing stored.
    assert_eq!(h.games.save_attempts(), 3);
    assert!(h.games.saved().is_empty());

    // Settlement had already landed before the save path: the counters
    // are not rolled back and were applied exactly once.
    assert_eq!(h.users.stats(1), (1, 0));
    assert_eq!(h.users.stats(2), (0, 1));

    // The session is still gone; the outcome cannot be re-reported.
    assert!(matches!(
        h.registry.record_terminal(&code, Outcome::White).await,
        Err(GameError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_stat_update_retries_through_transient_outage() {
    let h = harness_with(MemoryGameStore::new(), MemoryUserStore::failing_first(1));
    let code = started_game(&h).await;

    h.registry.record_terminal(&code, Outcome::White).await.unwrap();

    // Winner update failed once then succeeded, loser update went through.
    assert_eq!(h.users.update_attempts(), 3);
    assert_eq!(h.users.stats(1), (1, 0));
    assert_eq!(h.users.stats(2), (0, 1));
    assert_eq!(h.games.saved().len(), 1);
}

#[tokio::test]
async fn test_stat_update_exhaustion_skips_save() {
    let h = harness_with(MemoryGameStore::new(), MemoryUserStore::failing_first(5));
    let code = started_game(&h).await;

    let err = h
        .registry
        .record_terminal(&code, Outcome::White)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::Persistence(_)));

    assert_eq!(h.users.update_attempts(), 3);
    assert_eq!(h.users.stats(1), (0, 0));
    // Settlement failed, so the save path was never reached.
    assert_eq!(h.games.save_attempts(), 0);
}

#[tokio::test]
async fn test_finished_games_for_user_most_recent_first() {
    let h = harness();

    for winner in [Outcome::White, Outcome::Black, Outcome::Draw] {
        let code = started_game(&h).await;
        h.registry.record_terminal(&code, winner).await.unwrap();
    }

    let games = h.registry.finished_games_for(1).await.unwrap();
    assert_eq!(games.len(), 3);
    assert!(games.windows(2).all(|w| w[0].ended_at >= w[1].ended_at));

    // Each stored game is individually retrievable by id.
    for game in &games {
        let id = game.id.unwrap();
        let fetched = h.registry.finished_game(id).await.unwrap();
        assert_eq!(fetched.code, game.code);
    }

    // A user who played nothing has no history.
    assert!(h.registry.finished_games_for(42).await.unwrap().is_empty());
}
