//! Full game-flow tests.
//!
//! These drive the engine through whole turns the way a server would:
//! play resource cards, acquire from the market, end the turn and face
//! a trial, and carry the game across a save/load boundary.

use pillars_engine::catalog::base_catalog;
use pillars_engine::{
    Choice, CustomEffectRegistry, EffectOutcome, GameBuilder, GameEngine, GameRng, GameState,
    GameStore, MemoryStore, RecordingNotifier, SaveOutcome, UniqueIndex,
};

fn new_game(seed: u64) -> GameState {
    GameBuilder::new("flow-1", "Flow Test")
        .player("p1", "Ada", true)
        .player("p2", "Grace", false)
        .seed(seed)
        .build(&base_catalog())
        .unwrap()
}

fn playable_hand(state: &GameState) -> Vec<UniqueIndex> {
    state.players[state.current_player]
        .hand
        .iter()
        .map(|c| c.unique_index)
        .collect()
}

/// Play out every card in hand, then end the turn.
fn run_one_turn(engine: &GameEngine, state: &mut GameState, notifier: &mut RecordingNotifier) {
    for index in playable_hand(state) {
        let outcome = engine.play_card(state, notifier, index).unwrap();
        assert!(outcome.is_completed(), "automated play never suspends");
    }
    let report = engine.end_turn(state, notifier).unwrap();
    assert!(report.outcome.is_completed());
}

#[test]
fn test_full_round_of_automated_play() {
    let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::automated());
    let mut state = new_game(21);
    let mut notifier = RecordingNotifier::new();
    let census = state.census();

    for expected_player in [0, 1, 0, 1] {
        assert_eq!(state.current_player, expected_player);
        run_one_turn(&engine, &mut state, &mut notifier);
    }

    // Every turn refilled the hand and passed the turn.
    assert_eq!(state.current_player, 0);
    for player in &state.players {
        assert_eq!(player.hand.len(), state.hand_size);
        assert!(player.in_play.is_empty());
        assert_eq!(player.credits, 0);
        assert_eq!(player.talents, 0);
    }
    // No card appeared or vanished across two full rounds.
    assert_eq!(state.census(), census);
}

#[test]
fn test_acquired_card_enters_the_deck_cycle() {
    let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::automated());
    let mut state = new_game(22);
    let mut notifier = RecordingNotifier::new();

    // Bankroll the player directly and buy the cheapest visible card.
    state.players[0].credits = 5;
    state.players[0].talents = 5;
    let index = state.current_market[0].unique_index;
    engine.acquire_card(&mut state, &mut notifier, index).unwrap();

    assert_eq!(
        state.players[0].discard.last().map(|c| c.unique_index),
        Some(index)
    );
    assert!(notifier.saw("acquires"));

    // The discard (with the new card) reshuffles in once the deck runs dry.
    let player = &mut state.players[0];
    player.deck.clear();
    let held = player.hand.len() + player.discard.len();
    while state.draw_one(0) {}
    assert_eq!(state.players[0].hand.len(), held);
    assert!(state.players[0]
        .hand
        .iter()
        .any(|c| c.unique_index == index));
}

#[test]
fn test_interactive_game_survives_save_between_choices() {
    let catalog = base_catalog();
    let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::interactive());
    let mut state = new_game(23);
    let mut notifier = RecordingNotifier::new();
    let mut store = MemoryStore::new();

    // Rig an interactive promote into hand and play it.
    let card = pillars_engine::CardInstance::new("Refactoring Sprint", UniqueIndex::new(700));
    state.players[0].hand.push(card);
    let outcome = engine
        .play_card(&mut state, &mut notifier, UniqueIndex::new(700))
        .unwrap();
    let pending = match outcome {
        EffectOutcome::Pending(pending) => pending,
        EffectOutcome::Completed => panic!("interactive promote must suspend"),
    };

    // A save while the choice is outstanding captures the stable state.
    let outcome = store.save(state.to_record()).unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { version: 1 }));

    // The in-memory game resumes; the pending value never left memory.
    let outcome = engine
        .resume(&mut state, &mut notifier, pending, Choice::Pillar(2))
        .unwrap();
    assert!(outcome.is_completed());
    assert_eq!(state.players[0].rank(2), 1);

    // Reloading yields the pre-choice state with the card in play.
    let record = store.load("flow-1").unwrap().unwrap();
    let reloaded = GameState::from_record(&record, &catalog, GameRng::new(0)).unwrap();
    assert_eq!(reloaded.players[0].rank(2), 0);
    assert!(reloaded.players[0]
        .in_play
        .iter()
        .any(|c| c.name == "Refactoring Sprint"));
}

#[test]
fn test_save_load_play_save_version_walk() {
    let catalog = base_catalog();
    let engine = GameEngine::new(base_catalog(), CustomEffectRegistry::automated());
    let mut store = MemoryStore::new();
    let mut notifier = RecordingNotifier::new();

    let state = new_game(24);
    assert!(matches!(
        store.save(state.to_record()).unwrap(),
        SaveOutcome::Saved { version: 1 }
    ));

    // Load, take a turn, save back with the loaded version.
    let record = store.load("flow-1").unwrap().unwrap();
    let mut state = GameState::from_record(&record, &catalog, GameRng::new(99)).unwrap();
    run_one_turn(&engine, &mut state, &mut notifier);
    assert!(matches!(
        store.save(state.to_record()).unwrap(),
        SaveOutcome::Saved { version: 2 }
    ));

    // A writer still holding version 1 gets told to reload.
    let mut stale = record;
    stale.version = 1;
    assert_eq!(
        store.save(stale).unwrap(),
        SaveOutcome::Stale { current: 2 }
    );
}
