//! Ephemeral visual effects: floating coins and click sparkles.
//!
//! The scheduler owns every short-lived effect from spawn to removal and is
//! the only authority on effect lifecycle: `Alive -> {Collected | Expired} ->
//! removed`, always exactly once. The page glue renders whatever the
//! scheduler reports and nothing else, so a node can never outlive its
//! effect. All timing flows through caller-supplied `performance.now()`
//! millisecond values, which keeps the whole module host-testable.

use crate::score::SPAWNED_COIN_POINTS;

/// One coin spawn per interval, for the whole session.
pub const SPAWN_INTERVAL_MS: f64 = 15_000.0;
/// How long an uncollected coin floats before it expires.
pub const COIN_TTL_MS: f64 = 10_000.0;
/// Sparkles live only as long as their one-shot animation.
pub const SPARKLE_TTL_MS: f64 = 500.0;
/// Delay between leaving `Alive` and final removal, reserved for the exit
/// animation.
pub const REMOVE_GRACE_MS: f64 = 300.0;
/// Sparkles per click burst.
pub const BURST_COUNT: usize = 5;
/// Coins spawn at least this far from the right/bottom viewport edges.
pub const COIN_EDGE_MARGIN_PX: f64 = 50.0;

// --- Randomness --------------------------------------------------------------

/// Simple linear congruential generator (not crypto secure); decorative
/// placement only. Seeded once from the page clock so native tests can pin it.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.state >> 16) as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform in [lo, hi). Returns `lo` when the range is empty.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_f64() * (hi - lo)
    }
}

// --- Spawn cadence ------------------------------------------------------------

/// Free-running interval clock driving periodic coin spawns.
///
/// Tracks the index of the last interval boundary already handled, so a tick
/// that arrives late (throttled tab, long frame) catches up on every missed
/// boundary instead of silently dropping spawns. Runs uncancelled for the
/// whole session.
pub struct SpawnClock {
    interval_ms: f64,
    start_ms: f64,   // clock epoch, performance.now() at construction
    last_idx: i64,   // index of last processed interval boundary
}

impl SpawnClock {
    pub fn new(interval_ms: f64, now: f64) -> Self {
        Self {
            interval_ms,
            start_ms: now,
            last_idx: 0,
        }
    }

    /// Number of interval boundaries crossed since the previous call.
    pub fn due(&mut self, now: f64) -> u32 {
        if self.interval_ms <= 0.0 {
            return 0;
        }
        let idx = ((now - self.start_ms) / self.interval_ms).floor() as i64;
        if idx <= self.last_idx {
            return 0;
        }
        let fired = idx - self.last_idx;
        self.last_idx = idx;
        fired as u32
    }
}

// --- Effect entities ----------------------------------------------------------

/// Opaque effect identity, unique among effects of one scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

impl EffectId {
    /// Round-trip through a DOM data attribute.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Periodically spawned collectible star coin.
    Coin,
    /// Click-burst decoration; never collectible.
    Sparkle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectState {
    Alive,
    Collected,
    Expired,
}

/// A single short-lived visual entity.
pub struct EphemeralEffect {
    id: EffectId,
    kind: EffectKind,
    /// Page position, fixed at creation.
    pub x: f64,
    pub y: f64,
    /// Exit trajectory offset in px (sparkles only; zero for coins).
    pub drift_x: f64,
    pub drift_y: f64,
    /// Glyph font size in px (sparkles only).
    pub glyph_size: f64,
    spawned_ms: f64,
    ttl_ms: f64,
    state: EffectState,
    remove_at_ms: Option<f64>, // set once the effect leaves Alive
}

impl EphemeralEffect {
    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn state(&self) -> EffectState {
        self.state
    }
}

/// Result of a collection attempt. Never an error: collecting something that
/// is gone (or was never collectible) is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectOutcome {
    Collected { points: i64 },
    AlreadyGone,
}

/// Lifecycle notifications produced by [`EffectScheduler::tick`], in the order
/// they should be applied to the presentation surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectEvent {
    /// Effect hit its TTL uncollected; exit animation may start.
    Expired(EffectId),
    /// Grace delay elapsed; the effect no longer exists and its node must go.
    Removed(EffectId),
}

// --- Scheduler ----------------------------------------------------------------

/// Owner of all live ephemeral effects.
///
/// No capacity limit is enforced: effects self-expire, so growth is bounded
/// by spawn cadence times TTL in practice.
pub struct EffectScheduler {
    next_id: u64,
    effects: Vec<EphemeralEffect>,
    rng: Lcg,
}

impl EffectScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            next_id: 0,
            effects: Vec::new(),
            rng: Lcg::new(seed),
        }
    }

    fn push(
        &mut self,
        kind: EffectKind,
        x: f64,
        y: f64,
        drift_x: f64,
        drift_y: f64,
        glyph_size: f64,
        ttl_ms: f64,
        now: f64,
    ) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.push(EphemeralEffect {
            id,
            kind,
            x,
            y,
            drift_x,
            drift_y,
            glyph_size,
            spawned_ms: now,
            ttl_ms,
            state: EffectState::Alive,
            remove_at_ms: None,
        });
        id
    }

    /// Spawn one collectible coin at a random position inside the viewport,
    /// keeping a margin so the glyph never clips the edge. Never fails.
    pub fn spawn_coin(&mut self, viewport_w: f64, viewport_h: f64, now: f64) -> EffectId {
        let x = self.rng.range(0.0, (viewport_w - COIN_EDGE_MARGIN_PX).max(0.0));
        let y = self.rng.range(0.0, (viewport_h - COIN_EDGE_MARGIN_PX).max(0.0));
        self.push(EffectKind::Coin, x, y, 0.0, 0.0, 0.0, COIN_TTL_MS, now)
    }

    /// Spawn a cluster of sparkles at a click point. Each gets a random
    /// departure angle, distance and glyph size used purely for its exit
    /// trajectory.
    pub fn spawn_burst(&mut self, x: f64, y: f64, now: f64) -> Vec<EffectId> {
        (0..BURST_COUNT)
            .map(|_| {
                let angle = self.rng.range(0.0, 360.0).to_radians();
                let distance = self.rng.range(20.0, 50.0);
                let size = self.rng.range(10.0, 20.0);
                self.push(
                    EffectKind::Sparkle,
                    x,
                    y,
                    angle.cos() * distance,
                    angle.sin() * distance,
                    size,
                    SPARKLE_TTL_MS,
                    now,
                )
            })
            .collect()
    }

    /// Attempt to collect an effect. Only an `Alive` coin awards points and
    /// transitions to `Collected`; everything else is `AlreadyGone`, so a
    /// double click can never score twice and an expired coin ignores late
    /// clicks.
    pub fn collect(&mut self, id: EffectId, now: f64) -> CollectOutcome {
        let Some(effect) = self.effects.iter_mut().find(|e| e.id == id) else {
            return CollectOutcome::AlreadyGone;
        };
        if effect.kind != EffectKind::Coin || effect.state != EffectState::Alive {
            return CollectOutcome::AlreadyGone;
        }
        effect.state = EffectState::Collected;
        effect.remove_at_ms = Some(now + REMOVE_GRACE_MS);
        CollectOutcome::Collected {
            points: SPAWNED_COIN_POINTS,
        }
    }

    /// Advance lifecycles: expire every `Alive` effect past its TTL, then drop
    /// every effect whose grace delay has elapsed. Removal happens regardless
    /// of whether the effect was ever collected, so nothing lingers past
    /// `ttl + grace`.
    pub fn tick(&mut self, now: f64) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        for effect in &mut self.effects {
            if effect.state == EffectState::Alive && now - effect.spawned_ms >= effect.ttl_ms {
                effect.state = EffectState::Expired;
                effect.remove_at_ms = Some(now + REMOVE_GRACE_MS);
                events.push(EffectEvent::Expired(effect.id));
            }
        }
        self.effects.retain(|effect| match effect.remove_at_ms {
            Some(at) if now >= at => {
                events.push(EffectEvent::Removed(effect.id));
                false
            }
            _ => true,
        });
        events
    }

    pub fn get(&self, id: EffectId) -> Option<&EphemeralEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Effects currently owned (any state prior to removal).
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
