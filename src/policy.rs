use crate::model::{PetState, Vital, Vitals, DAILY_LIMIT};
use crate::narrative::{Narrative, Need, PlayActivity, Selector, Story, Wait};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

const FEED_HUNGER: i32 = 25;
const FEED_HAPPINESS: i32 = 10;
const BATH_CLEANLINESS: i32 = 25;
const BATH_HAPPINESS: i32 = 5;
const SLEEP_ENERGY: i32 = 25;
const SLEEP_HAPPINESS: i32 = 5;
const PLAY_HAPPINESS: i32 = 30;
const PLAY_ENERGY: i32 = -10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Feed,
    Bathe,
    Sleep,
    Play,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Feed, Action::Bathe, Action::Sleep, Action::Play];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Feed => "feed",
            Action::Bathe => "bathe",
            Action::Sleep => "sleep",
            Action::Play => "play",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    RejectedCooldown,
    RejectedDailyLimit,
    /// No pet adopted yet; nothing happened.
    NoPet,
}

/// Result of one action attempt. Not retained by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResult {
    pub action: Action,
    pub outcome: ActionOutcome,
    /// Vitals after the action, when applied.
    pub vitals: Option<Vitals>,
    /// Time left on the feed cooldown, when rejected by it.
    pub wait: Option<Duration>,
    pub story: Option<Story>,
}

impl ActionResult {
    fn applied(action: Action, vitals: Vitals, story: Story) -> Self {
        Self {
            action,
            outcome: ActionOutcome::Applied,
            vitals: Some(vitals),
            wait: None,
            story: Some(story),
        }
    }

    fn rejected(action: Action, outcome: ActionOutcome) -> Self {
        Self {
            action,
            outcome,
            vitals: None,
            wait: None,
            story: None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == ActionOutcome::Applied
    }

    /// Passage for the story panel; `None` when nothing happened.
    pub fn narrative(&self) -> Option<Narrative> {
        match self.outcome {
            ActionOutcome::Applied => self.story.map(Narrative::Action),
            ActionOutcome::RejectedCooldown => self
                .wait
                .map(|w| Narrative::FeedTooSoon(Wait::from(w))),
            ActionOutcome::RejectedDailyLimit => match self.action {
                Action::Bathe => Some(Narrative::BathLimit),
                Action::Sleep => Some(Narrative::NapLimit),
                _ => None,
            },
            ActionOutcome::NoPet => None,
        }
    }
}

impl PetState {
    /// Time left before the pet may eat again; `None` when it may eat now.
    pub fn feed_ready_in(&self, now: DateTime<Utc>, cooldown: Duration) -> Option<Duration> {
        let last = self.last_feed_time()?;
        let elapsed = now - last;
        if elapsed >= cooldown {
            return None;
        }
        // a clock that stepped backwards never extends the wait past one cooldown
        Some((cooldown - elapsed).min(cooldown))
    }

    pub fn can_bathe(&self) -> bool {
        self.is_selected() && self.bath_count() < DAILY_LIMIT
    }

    pub fn can_sleep(&self) -> bool {
        self.is_selected() && self.sleep_count() < DAILY_LIMIT
    }

    pub(crate) fn apply(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
        cooldown: Duration,
        sel: &mut dyn Selector,
    ) -> ActionResult {
        if !self.is_selected() {
            return ActionResult::rejected(action, ActionOutcome::NoPet);
        }
        match action {
            Action::Feed => self.feed(now, cooldown),
            Action::Bathe => self.bathe(),
            Action::Sleep => self.sleep(),
            Action::Play => self.play(sel),
        }
    }

    fn feed(&mut self, now: DateTime<Utc>, cooldown: Duration) -> ActionResult {
        if let Some(wait) = self.feed_ready_in(now, cooldown) {
            let mut r = ActionResult::rejected(Action::Feed, ActionOutcome::RejectedCooldown);
            r.wait = Some(wait);
            return r;
        }
        let before = self.vitals().hunger();
        let v = self.vitals_mut();
        v.clamped_adjust(Vital::Hunger, FEED_HUNGER);
        v.clamped_adjust(Vital::Happiness, FEED_HAPPINESS);
        self.mark_fed(now);
        ActionResult::applied(
            Action::Feed,
            *self.vitals(),
            Story::Feed(Need::from_value(before)),
        )
    }

    fn bathe(&mut self) -> ActionResult {
        if !self.can_bathe() {
            return ActionResult::rejected(Action::Bathe, ActionOutcome::RejectedDailyLimit);
        }
        let before = self.vitals().cleanliness();
        let v = self.vitals_mut();
        v.clamped_adjust(Vital::Cleanliness, BATH_CLEANLINESS);
        v.clamped_adjust(Vital::Happiness, BATH_HAPPINESS);
        self.count_bath();
        ActionResult::applied(
            Action::Bathe,
            *self.vitals(),
            Story::Bathe(Need::from_value(before)),
        )
    }

    fn sleep(&mut self) -> ActionResult {
        if !self.can_sleep() {
            return ActionResult::rejected(Action::Sleep, ActionOutcome::RejectedDailyLimit);
        }
        let before = self.vitals().energy();
        let v = self.vitals_mut();
        v.clamped_adjust(Vital::Energy, SLEEP_ENERGY);
        v.clamped_adjust(Vital::Happiness, SLEEP_HAPPINESS);
        self.count_sleep();
        ActionResult::applied(
            Action::Sleep,
            *self.vitals(),
            Story::Sleep(Need::from_value(before)),
        )
    }

    fn play(&mut self, sel: &mut dyn Selector) -> ActionResult {
        let v = self.vitals_mut();
        v.clamped_adjust(Vital::Happiness, PLAY_HAPPINESS);
        v.clamped_adjust(Vital::Energy, PLAY_ENERGY);
        let activity = PlayActivity::choose(sel);
        ActionResult::applied(Action::Play, *self.vitals(), Story::Play(activity))
    }
}
