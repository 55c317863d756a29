use crate::clock::{Clock, SystemClock};
use crate::config::Rules;
use crate::model::{PetIdentity, PetState, Vital, DAILY_LIMIT};
use crate::mood::Mood;
use crate::narrative::{MagicEvent, RngSelector, Selector, Wait};
use crate::policy::{Action, ActionResult};
use crate::scheduler::{Scheduler, Tick};
use chrono::Duration as ChronoDuration;
use std::time::Duration;
use tracing::{debug, info};

const HAPPINESS_DECAY_CHANCE: f64 = 0.7;

/// Receives scheduler ticks that changed or reported something.
pub trait TickObserver {
    fn on_decay(&mut self, _snapshot: &Snapshot) {}
    /// Called on every alert check once a pet is adopted; `alerts` may be empty.
    fn on_alert_check(&mut self, _alerts: &[Vital]) {}
    fn on_random_event(&mut self, _event: MagicEvent) {}
    fn on_day_rollover(&mut self, _day: u32) {}
}

impl TickObserver for () {}

/// Read-only view for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub pet: Option<PetIdentity>,
    pub hunger: i32,
    pub cleanliness: i32,
    pub energy: i32,
    pub happiness: i32,
    pub days_with_pet: u32,
    pub bath_count: u32,
    pub sleep_count: u32,
    pub mood: Mood,
    pub feed_ready_in: Option<ChronoDuration>,
}

impl Snapshot {
    pub fn is_selected(&self) -> bool {
        self.pet.is_some()
    }

    pub fn vital(&self, v: Vital) -> i32 {
        match v {
            Vital::Hunger => self.hunger,
            Vital::Cleanliness => self.cleanliness,
            Vital::Energy => self.energy,
            Vital::Happiness => self.happiness,
        }
    }

    pub fn can(&self, action: Action) -> bool {
        self.is_selected()
            && match action {
                Action::Feed => self.feed_ready_in.is_none(),
                Action::Bathe => self.bath_count < DAILY_LIMIT,
                Action::Sleep => self.sleep_count < DAILY_LIMIT,
                Action::Play => true,
            }
    }

    pub fn feed_wait(&self) -> Option<Wait> {
        self.feed_ready_in.map(Wait::from)
    }
}

/// Owns the pet state and everything that mutates it.
pub struct Engine<C = SystemClock, S = RngSelector> {
    state: PetState,
    rules: Rules,
    clock: C,
    selector: S,
    scheduler: Scheduler,
}

impl Engine {
    /// Wall-clock engine. `seed == 0` draws from entropy.
    pub fn new(rules: Rules, seed: u64) -> Self {
        let selector = if seed == 0 {
            RngSelector::from_entropy()
        } else {
            RngSelector::seeded(seed)
        };
        Self::with_parts(rules, SystemClock, selector)
    }
}

impl<C: Clock, S: Selector> Engine<C, S> {
    pub fn with_parts(rules: Rules, clock: C, selector: S) -> Self {
        let scheduler = Scheduler::new(&rules);
        Self {
            state: PetState::new(),
            rules,
            clock,
            selector,
            scheduler,
        }
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn is_selected(&self) -> bool {
        self.state.is_selected()
    }

    /// Adopts a pet. Only the first call has any effect.
    pub fn select_pet(&mut self, identity: PetIdentity) -> bool {
        let name = identity.name.clone();
        let adopted = self.state.adopt(identity);
        if adopted {
            info!(pet = %name, "pet adopted");
        } else {
            debug!(pet = %name, "pet already adopted, selection ignored");
        }
        adopted
    }

    pub fn snapshot(&self) -> Snapshot {
        let v = self.state.vitals();
        Snapshot {
            pet: self.state.pet().cloned(),
            hunger: v.hunger(),
            cleanliness: v.cleanliness(),
            energy: v.energy(),
            happiness: v.happiness(),
            days_with_pet: self.state.days_with_pet(),
            bath_count: self.state.bath_count(),
            sleep_count: self.state.sleep_count(),
            mood: Mood::classify(v),
            feed_ready_in: self
                .state
                .feed_ready_in(self.clock.now(), self.rules.feed_cooldown),
        }
    }

    pub fn act(&mut self, action: Action) -> ActionResult {
        let now = self.clock.now();
        let result = self
            .state
            .apply(action, now, self.rules.feed_cooldown, &mut self.selector);
        debug!(
            %action,
            outcome = ?result.outcome,
            bucket = result.story.map(|s| s.bucket()).unwrap_or("-"),
            "action"
        );
        result
    }

    pub fn feed(&mut self) -> ActionResult {
        self.act(Action::Feed)
    }

    pub fn bathe(&mut self) -> ActionResult {
        self.act(Action::Bathe)
    }

    pub fn sleep(&mut self) -> ActionResult {
        self.act(Action::Sleep)
    }

    pub fn play(&mut self) -> ActionResult {
        self.act(Action::Play)
    }

    /// Ambient decay. Returns false when no pet is adopted.
    pub fn decay_tick(&mut self) -> bool {
        if !self.state.is_selected() {
            return false;
        }
        let v = self.state.vitals_mut();
        v.clamped_adjust(Vital::Hunger, -1);
        v.clamped_adjust(Vital::Cleanliness, -1);
        v.clamped_adjust(Vital::Energy, -1);
        // happiness is stickier than the rest
        if self.selector.roll(HAPPINESS_DECAY_CHANCE) {
            self.state.vitals_mut().clamped_adjust(Vital::Happiness, -1);
        }
        debug!(vitals = ?self.state.vitals(), "decay");
        true
    }

    /// Vitals currently below the alert threshold.
    pub fn alert_check(&self) -> Vec<Vital> {
        if !self.state.is_selected() {
            return Vec::new();
        }
        self.state.vitals().low()
    }

    pub fn random_event(&mut self) -> Option<MagicEvent> {
        if !self.state.is_selected() {
            return None;
        }
        Some(MagicEvent::choose(&mut self.selector))
    }

    /// Starts a new day and returns its number.
    pub fn day_rollover(&mut self) -> Option<u32> {
        if !self.state.is_selected() {
            return None;
        }
        let day = self.state.start_new_day();
        info!(day, "new day");
        Some(day)
    }

    /// Advances the scheduler by `dt` and runs every tick that falls due.
    pub fn advance(&mut self, dt: Duration, observer: &mut impl TickObserver) {
        for tick in self.scheduler.advance(dt) {
            self.run_tick(tick, observer);
        }
    }

    pub fn run_tick(&mut self, tick: Tick, observer: &mut impl TickObserver) {
        match tick {
            Tick::Decay => {
                if self.decay_tick() {
                    observer.on_decay(&self.snapshot());
                }
            }
            Tick::AlertCheck => {
                if self.state.is_selected() {
                    observer.on_alert_check(&self.alert_check());
                }
            }
            Tick::RandomEvent => {
                if let Some(ev) = self.random_event() {
                    observer.on_random_event(ev);
                }
            }
            Tick::DayRollover => {
                if let Some(day) = self.day_rollover() {
                    observer.on_day_rollover(day);
                }
            }
        }
    }

    /// Stops all periodic triggers. Actions keep working.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        info!(elapsed = ?self.scheduler.elapsed(), "engine stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.scheduler.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{Species, Vitals};
    use crate::narrative::{Need, ScriptedSelector, Story};
    use crate::policy::ActionOutcome;

    type TestEngine = Engine<ManualClock, ScriptedSelector>;

    fn engine(sel: ScriptedSelector) -> (TestEngine, ManualClock) {
        let clock = ManualClock::default();
        (Engine::with_parts(Rules::default(), clock.clone(), sel), clock)
    }

    fn adopted(sel: ScriptedSelector) -> (TestEngine, ManualClock) {
        let (mut e, clock) = engine(sel);
        assert!(e.select_pet(Species::Monkey.into()));
        (e, clock)
    }

    #[derive(Default)]
    struct Recorder {
        decays: usize,
        alerts: Vec<Vec<Vital>>,
        events: Vec<MagicEvent>,
        days: Vec<u32>,
    }

    impl TickObserver for Recorder {
        fn on_decay(&mut self, _snapshot: &Snapshot) {
            self.decays += 1;
        }
        fn on_alert_check(&mut self, alerts: &[Vital]) {
            self.alerts.push(alerts.to_vec());
        }
        fn on_random_event(&mut self, event: MagicEvent) {
            self.events.push(event);
        }
        fn on_day_rollover(&mut self, day: u32) {
            self.days.push(day);
        }
    }

    #[test]
    fn unselected_engine_ignores_everything() {
        let (mut e, _) = engine(ScriptedSelector::always(true));
        let mut rec = Recorder::default();
        e.advance(Duration::from_millis(600_000), &mut rec);
        assert_eq!(rec.decays, 0);
        assert!(rec.alerts.is_empty());
        assert!(rec.events.is_empty());
        assert!(rec.days.is_empty());
        assert_eq!(e.feed().outcome, ActionOutcome::NoPet);
        let snap = e.snapshot();
        assert!(!snap.is_selected());
        assert!(Action::ALL.iter().all(|a| !snap.can(*a)));
        assert_eq!(snap.hunger, 50);
        assert_eq!(snap.days_with_pet, 0);
    }

    #[test]
    fn select_pet_is_one_time() {
        let (mut e, _) = adopted(ScriptedSelector::new());
        assert!(!e.select_pet(Species::Hippo.into()));
        assert_eq!(e.snapshot().pet.map(|p| p.name), Some("Monkey".to_string()));
    }

    #[test]
    fn decay_lowers_three_vitals_and_sometimes_happiness() {
        let (mut e, _) = adopted(ScriptedSelector::new().with_rolls([true, false]));
        assert!(e.decay_tick());
        assert_eq!(*e.state().vitals(), Vitals::new(49, 49, 49, 49));
        assert!(e.decay_tick());
        assert_eq!(*e.state().vitals(), Vitals::new(48, 48, 48, 49));
    }

    /// Answers every draw with a fixed value and keeps the odds it was asked.
    #[derive(Default)]
    struct OddsLog {
        odds: Vec<f64>,
        picks: Vec<usize>,
    }

    impl Selector for OddsLog {
        fn pick(&mut self, n: usize) -> usize {
            self.picks.push(n);
            0
        }
        fn roll(&mut self, p: f64) -> bool {
            self.odds.push(p);
            true
        }
    }

    #[test]
    fn happiness_decay_rolls_at_seventy_percent() {
        let mut e = Engine::with_parts(Rules::default(), ManualClock::default(), OddsLog::default());
        e.select_pet(Species::Hippo.into());
        for _ in 0..3 {
            e.decay_tick();
        }
        assert_eq!(e.selector.odds, vec![0.7; 3]);
    }

    #[test]
    fn seeded_happiness_decay_is_roughly_seventy_percent() {
        let rules = Rules::default();
        let mut decayed = 0;
        for seed in 1..=40 {
            let mut e = Engine::new(rules.clone(), seed);
            e.select_pet(Species::Dinno.into());
            for _ in 0..25 {
                e.decay_tick();
            }
            decayed += 50 - e.snapshot().happiness;
        }
        // 1000 rolls at p = 0.7
        assert!((640..=760).contains(&decayed), "decayed {decayed} of 1000");
    }

    #[test]
    fn random_event_leaves_state_alone() {
        let mut e = Engine::with_parts(Rules::default(), ManualClock::default(), OddsLog::default());
        e.select_pet(Species::Monkey.into());
        e.decay_tick();
        let before = e.snapshot();
        assert_eq!(e.random_event(), Some(MagicEvent::ALL[0]));
        assert_eq!(e.selector.picks, vec![MagicEvent::ALL.len()]);
        assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn random_event_tick_leaves_state_alone() {
        let rules = Rules {
            event_every: Duration::from_millis(10),
            ..Rules::default()
        };
        let mut e = Engine::with_parts(rules, ManualClock::default(), ScriptedSelector::new());
        e.select_pet(Species::Dinno.into());
        let before = e.snapshot();
        let mut rec = Recorder::default();
        e.advance(Duration::from_millis(50), &mut rec);
        assert_eq!(rec.events.len(), 5);
        assert_eq!(rec.decays, 0);
        assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn long_decay_stays_in_bounds() {
        let (mut e, _) = adopted(ScriptedSelector::always(true));
        for _ in 0..500 {
            e.decay_tick();
            let v = e.state().vitals();
            for vital in Vital::ALL {
                assert!((0..=100).contains(&v.get(vital)));
            }
        }
        assert_eq!(*e.state().vitals(), Vitals::new(0, 0, 0, 0));
        assert_eq!(e.snapshot().mood, Mood::Unhappy);
    }

    #[test]
    fn alerts_cover_each_low_vital() {
        let (mut e, _) = adopted(ScriptedSelector::always(false));
        assert!(e.alert_check().is_empty());
        for _ in 0..21 {
            e.decay_tick();
        }
        assert_eq!(
            e.alert_check(),
            vec![Vital::Hunger, Vital::Cleanliness, Vital::Energy]
        );
    }

    #[test]
    fn day_rollover_resets_limits_but_not_feeding() {
        let (mut e, clock) = adopted(ScriptedSelector::new());
        assert!(e.feed().is_applied());
        e.bathe();
        e.bathe();
        e.sleep();
        e.sleep();
        assert_eq!(e.bathe().outcome, ActionOutcome::RejectedDailyLimit);
        assert_eq!(e.sleep().outcome, ActionOutcome::RejectedDailyLimit);
        let fed_at = e.state().last_feed_time();

        clock.advance(ChronoDuration::minutes(5));
        assert_eq!(e.day_rollover(), Some(1));
        let snap = e.snapshot();
        assert_eq!((snap.bath_count, snap.sleep_count), (0, 0));
        assert!(snap.can(Action::Bathe) && snap.can(Action::Sleep));
        assert!(!snap.can(Action::Feed));
        assert_eq!(e.state().last_feed_time(), fed_at);
        assert_eq!(e.feed().outcome, ActionOutcome::RejectedCooldown);
        assert!(e.bathe().is_applied());
    }

    #[test]
    fn feed_scenario_from_hungry_pet() {
        let (mut e, clock) = adopted(ScriptedSelector::new());
        *e.state.vitals_mut() = Vitals::new(20, 50, 50, 50);

        let r = e.feed();
        assert_eq!(r.outcome, ActionOutcome::Applied);
        assert_eq!(r.vitals, Some(Vitals::new(45, 50, 50, 60)));
        assert_eq!(r.story, Some(Story::Feed(Need::Pressing)));
        assert_eq!(e.state().last_feed_time(), Some(clock.now()));

        let r = e.feed();
        assert_eq!(r.outcome, ActionOutcome::RejectedCooldown);
        assert!(r.wait.is_some_and(|w| w > ChronoDuration::zero()));
        assert_eq!(*e.state().vitals(), Vitals::new(45, 50, 50, 60));
    }

    #[test]
    fn snapshot_reports_feed_wait_and_clears_it() {
        let (mut e, clock) = adopted(ScriptedSelector::new());
        assert!(e.snapshot().can(Action::Feed));
        e.feed();
        clock.advance(ChronoDuration::hours(2));
        assert_eq!(e.snapshot().feed_wait(), Some(Wait { hours: 3, minutes: 0 }));
        clock.advance(ChronoDuration::hours(3));
        assert_eq!(e.snapshot().feed_ready_in, None);
        assert!(e.snapshot().can(Action::Feed));
    }

    #[test]
    fn advance_dispatches_ticks_to_observer() {
        let sel = ScriptedSelector::always(true).with_picks([2, 0]);
        let (mut e, _) = adopted(sel);
        let mut rec = Recorder::default();
        e.advance(Duration::from_millis(300_000), &mut rec);
        assert_eq!(rec.decays, 25);
        assert_eq!(rec.alerts.len(), 5);
        assert!(rec.alerts[0].is_empty());
        assert_eq!(
            rec.events,
            vec![MagicEvent::FairyPrank, MagicEvent::WizardCharm]
        );
        assert_eq!(rec.days, vec![1]);
        assert_eq!(e.snapshot().days_with_pet, 1);
        assert_eq!(e.snapshot().hunger, 25);
        // the last check runs after the 25th decay, with every vital at 25
        assert_eq!(rec.alerts.last().map(|a| a.len()), Some(4));
    }

    #[test]
    fn stopped_engine_fires_no_ticks() {
        let (mut e, _) = adopted(ScriptedSelector::always(true));
        e.stop();
        assert!(!e.is_running());
        let mut rec = Recorder::default();
        e.advance(Duration::from_secs(3_600), &mut rec);
        assert_eq!(rec.decays, 0);
        assert_eq!(e.snapshot().hunger, 50);
        assert!(e.play().is_applied());
    }

    #[test]
    fn play_story_comes_from_selector() {
        let (mut e, _) = adopted(ScriptedSelector::new().with_picks([2]));
        let r = e.play();
        assert_eq!(r.story.map(Story::bucket), Some("hide-and-seek"));
        let snap = e.snapshot();
        assert_eq!((snap.happiness, snap.energy), (80, 40));
    }

    #[test]
    fn seeded_engines_agree() {
        let mut a = Engine::new(Rules::default(), 99);
        let mut b = Engine::new(Rules::default(), 99);
        a.select_pet(Species::Dinno.into());
        b.select_pet(Species::Dinno.into());
        for _ in 0..50 {
            a.decay_tick();
            b.decay_tick();
        }
        assert_eq!(a.snapshot().happiness, b.snapshot().happiness);
        assert_eq!(a.play().story, b.play().story);
    }
}
