// Integration tests (native) for the ephemeral effect scheduler.
// Timestamps are plain f64 milliseconds fed in by hand; nothing here touches
// the browser clock, so lifecycles can be driven deterministically.

use warp_zone::effects::{
    BURST_COUNT, COIN_TTL_MS, CollectOutcome, EffectEvent, EffectScheduler, EffectState,
    REMOVE_GRACE_MS, SPARKLE_TTL_MS, SPAWN_INTERVAL_MS, SpawnClock,
};
use warp_zone::score::{PAGE_COIN_POINTS, SPAWNED_COIN_POINTS, STARTING_SCORE, ScoreCounter};

#[test]
fn uncollected_coin_expires_then_is_removed() {
    let mut sched = EffectScheduler::new(1);
    let id = sched.spawn_coin(800.0, 600.0, 0.0);

    assert!(sched.tick(COIN_TTL_MS - 1.0).is_empty());

    let events = sched.tick(COIN_TTL_MS);
    assert_eq!(events, vec![EffectEvent::Expired(id)]);
    assert_eq!(sched.get(id).map(|e| e.state()), Some(EffectState::Expired));

    let events = sched.tick(COIN_TTL_MS + REMOVE_GRACE_MS);
    assert_eq!(events, vec![EffectEvent::Removed(id)]);
    assert!(sched.get(id).is_none());
}

#[test]
fn collect_awards_once_then_already_gone() {
    let mut sched = EffectScheduler::new(2);
    let id = sched.spawn_coin(800.0, 600.0, 0.0);

    assert_eq!(
        sched.collect(id, 3_000.0),
        CollectOutcome::Collected {
            points: SPAWNED_COIN_POINTS
        }
    );
    assert_eq!(sched.collect(id, 3_001.0), CollectOutcome::AlreadyGone);
    assert_eq!(
        sched.get(id).map(|e| e.state()),
        Some(EffectState::Collected)
    );
}

#[test]
fn collected_coin_is_removed_after_grace_and_ignores_its_ttl() {
    let mut sched = EffectScheduler::new(3);
    let id = sched.spawn_coin(800.0, 600.0, 0.0);
    sched.collect(id, 3_000.0);

    assert!(sched.tick(3_000.0 + REMOVE_GRACE_MS - 1.0).is_empty());
    let events = sched.tick(3_000.0 + REMOVE_GRACE_MS);
    assert_eq!(events, vec![EffectEvent::Removed(id)]);

    // The original TTL deadline passes without any further event.
    assert!(sched.tick(COIN_TTL_MS + 1.0).is_empty());
    assert!(sched.is_empty());
}

#[test]
fn expired_coin_rejects_late_collection() {
    let mut sched = EffectScheduler::new(4);
    let id = sched.spawn_coin(800.0, 600.0, 0.0);
    sched.tick(COIN_TTL_MS);
    assert_eq!(sched.collect(id, COIN_TTL_MS + 10.0), CollectOutcome::AlreadyGone);
    sched.tick(COIN_TTL_MS + REMOVE_GRACE_MS);
    assert_eq!(
        sched.collect(id, COIN_TTL_MS + REMOVE_GRACE_MS),
        CollectOutcome::AlreadyGone
    );
}

#[test]
fn collecting_an_unknown_id_is_a_noop() {
    let mut sched = EffectScheduler::new(5);
    let id = sched.spawn_coin(800.0, 600.0, 0.0);
    sched.tick(COIN_TTL_MS);
    sched.tick(COIN_TTL_MS + REMOVE_GRACE_MS);
    assert!(sched.is_empty());
    // Removed id, and an id that never existed.
    assert_eq!(sched.collect(id, 20_000.0), CollectOutcome::AlreadyGone);
    assert_eq!(
        sched.collect(warp_zone::effects::EffectId::from_raw(9_999), 20_000.0),
        CollectOutcome::AlreadyGone
    );
}

#[test]
fn sparkles_are_never_collectible_and_self_expire() {
    let mut sched = EffectScheduler::new(6);
    let ids = sched.spawn_burst(200.0, 150.0, 0.0);
    assert_eq!(ids.len(), BURST_COUNT);

    for &id in &ids {
        assert_eq!(sched.collect(id, 100.0), CollectOutcome::AlreadyGone);
        assert_eq!(sched.get(id).map(|e| e.state()), Some(EffectState::Alive));
    }

    let expired = sched.tick(SPARKLE_TTL_MS);
    assert_eq!(expired.len(), BURST_COUNT);
    let removed = sched.tick(SPARKLE_TTL_MS + REMOVE_GRACE_MS);
    assert_eq!(removed.len(), BURST_COUNT);
    assert!(sched.is_empty());
}

#[test]
fn every_effect_is_gone_within_ttl_plus_grace() {
    let mut sched = EffectScheduler::new(7);
    let coin_a = sched.spawn_coin(800.0, 600.0, 0.0);
    sched.spawn_burst(50.0, 50.0, 2_000.0);
    let coin_b = sched.spawn_coin(800.0, 600.0, 4_000.0);
    sched.collect(coin_a, 5_000.0);

    // Latest possible removal: coin_b at 4000 + ttl + grace.
    let horizon = 4_000.0 + COIN_TTL_MS + REMOVE_GRACE_MS;
    let mut t = 0.0;
    while t <= horizon {
        sched.tick(t);
        t += 100.0;
    }
    assert!(sched.is_empty());
    assert!(sched.get(coin_b).is_none());
}

#[test]
fn score_awards_commute() {
    let mut forward = ScoreCounter::new();
    forward.add(SPAWNED_COIN_POINTS);
    forward.add(PAGE_COIN_POINTS);

    let mut reverse = ScoreCounter::new();
    reverse.add(PAGE_COIN_POINTS);
    reverse.add(SPAWNED_COIN_POINTS);

    assert_eq!(forward.value(), STARTING_SCORE + 150);
    assert_eq!(forward.value(), reverse.value());
}

#[test]
fn expiry_without_collection_leaves_score_untouched() {
    let mut sched = EffectScheduler::new(8);
    let score = ScoreCounter::new();
    sched.spawn_coin(800.0, 600.0, 0.0);
    sched.tick(COIN_TTL_MS + REMOVE_GRACE_MS);
    // No collect call ever happened, so nothing was awarded anywhere.
    assert_eq!(score.value(), STARTING_SCORE);
    assert!(sched.is_empty());
}

#[test]
fn spawn_clock_drives_one_coin_per_interval() {
    let mut sched = EffectScheduler::new(9);
    let mut clock = SpawnClock::new(SPAWN_INTERVAL_MS, 0.0);

    let mut spawned = 0;
    let mut t = 0.0;
    while t <= SPAWN_INTERVAL_MS * 4.0 {
        for _ in 0..clock.due(t) {
            sched.spawn_coin(800.0, 600.0, t);
            spawned += 1;
        }
        t += 250.0;
    }
    assert_eq!(spawned, 4);
}
