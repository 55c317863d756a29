//! Narrative selection and the story catalog.
//!
//! Which passage accompanies an outcome is decided here: threshold buckets
//! for feeding, bathing and napping, uniform draws for play and magical
//! events. The draws go through a [`Selector`] so callers can swap the
//! random source for a scripted one.

use crate::model::{Vital, LOW_VITAL};
use chrono::Duration;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{collections::VecDeque, fmt};

/// Source of the engine's random choices.
pub trait Selector {
    /// Index in `0..n`. Callers never pass `n == 0`.
    fn pick(&mut self, n: usize) -> usize;
    /// True with probability `p`.
    fn roll(&mut self, p: f64) -> bool;
}

pub struct RngSelector {
    rng: StdRng,
}

impl RngSelector {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Selector for RngSelector {
    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn roll(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays queued answers. Once a queue runs dry, picks return 0 and rolls
/// return `fallback_roll`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSelector {
    picks: VecDeque<usize>,
    rolls: VecDeque<bool>,
    fallback_roll: bool,
}

impl ScriptedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(roll: bool) -> Self {
        Self {
            fallback_roll: roll,
            ..Self::default()
        }
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = bool>) -> Self {
        self.rolls.extend(rolls);
        self
    }
}

impl Selector for ScriptedSelector {
    fn pick(&mut self, n: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % n.max(1)
    }

    fn roll(&mut self, _p: f64) -> bool {
        self.rolls.pop_front().unwrap_or(self.fallback_roll)
    }
}

fn draw<T: Copy>(sel: &mut dyn Selector, catalog: &[T]) -> T {
    catalog[sel.pick(catalog.len()) % catalog.len()]
}

/// Threshold bucket for feed/bathe/sleep, decided on the pre-action value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Need {
    Pressing,
    Mild,
}

impl Need {
    pub fn from_value(before: i32) -> Self {
        if before < LOW_VITAL {
            Need::Pressing
        } else {
            Need::Mild
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayActivity {
    Bubbles,
    Garden,
    HideAndSeek,
}

impl PlayActivity {
    pub const ALL: [PlayActivity; 3] = [
        PlayActivity::Bubbles,
        PlayActivity::Garden,
        PlayActivity::HideAndSeek,
    ];

    pub fn choose(sel: &mut dyn Selector) -> Self {
        draw(sel, &Self::ALL)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MagicEvent {
    WizardCharm,
    ShootingStars,
    FairyPrank,
}

impl MagicEvent {
    pub const ALL: [MagicEvent; 3] = [
        MagicEvent::WizardCharm,
        MagicEvent::ShootingStars,
        MagicEvent::FairyPrank,
    ];

    pub fn choose(sel: &mut dyn Selector) -> Self {
        draw(sel, &Self::ALL)
    }
}

/// Story bucket attached to an applied action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Story {
    Feed(Need),
    Bathe(Need),
    Sleep(Need),
    Play(PlayActivity),
}

impl Story {
    pub fn bucket(self) -> &'static str {
        match self {
            Story::Feed(Need::Pressing) => "eager",
            Story::Feed(Need::Mild) => "dainty",
            Story::Bathe(Need::Pressing) => "grimy",
            Story::Bathe(Need::Mild) => "splashy",
            Story::Sleep(Need::Pressing) => "exhausted",
            Story::Sleep(Need::Mild) => "drowsy",
            Story::Play(PlayActivity::Bubbles) => "bubbles",
            Story::Play(PlayActivity::Garden) => "garden",
            Story::Play(PlayActivity::HideAndSeek) => "hide-and-seek",
        }
    }
}

/// Remaining feed cooldown in whole hours and minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wait {
    pub hours: i64,
    pub minutes: i64,
}

impl From<Duration> for Wait {
    fn from(d: Duration) -> Self {
        let secs = d.num_seconds().max(0);
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
        }
    }
}

impl fmt::Display for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Everything the story panel can show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Narrative {
    Intro,
    Adopted,
    Action(Story),
    FeedTooSoon(Wait),
    BathLimit,
    NapLimit,
    Alerts(Vec<Vital>),
    Event(MagicEvent),
    NewDay(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub title: &'static str,
    pub body: String,
}

impl Narrative {
    pub fn render(&self, pet: &str) -> Passage {
        let (title, body) = match self {
            Narrative::Intro => (
                "The Beginning of a Magical Journey",
                "In the land of Petopia a special creature is waiting for a friend. \
                 The guardian has sensed your kind heart and invites you to choose a \
                 companion who will grow alongside you. Who will you choose?"
                    .to_string(),
            ),
            Narrative::Adopted => (
                "A New Friendship Begins",
                format!(
                    "A warm glow surrounds you and {pet}. The guardian whispers: \
                     \"Feed them when hungry, keep them clean and let them rest.\""
                ),
            ),
            Narrative::Action(story) => action_passage(*story, pet),
            Narrative::FeedTooSoon(wait) => (
                "Too Soon for Another Meal!",
                format!(
                    "{pet} isn't hungry yet. Please wait another {} hours and {} minutes \
                     before feeding again.",
                    wait.hours, wait.minutes
                ),
            ),
            Narrative::BathLimit => (
                "Bath Limit Reached!",
                format!(
                    "{pet} has already had two baths today. Too much bathing dries out a \
                     magical coat, so wait until tomorrow."
                ),
            ),
            Narrative::NapLimit => (
                "Nap Limit Reached!",
                format!(
                    "{pet} has already had two naps today. More sleep now would spoil the \
                     night. Try playing instead!"
                ),
            ),
            Narrative::Alerts(vitals) => (
                "Your Pet Needs You!",
                vitals
                    .iter()
                    .map(|v| alert_line(*v, pet))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Narrative::Event(ev) => ("A Magical Event!", event_line(*ev, pet)),
            Narrative::NewDay(day) => (
                "A New Day Begins!",
                format!(
                    "The sun rises over Petopia. Day {day} is a fresh start for you and \
                     {pet}. What adventures will unfold?"
                ),
            ),
        };
        Passage { title, body }
    }
}

fn action_passage(story: Story, pet: &str) -> (&'static str, String) {
    match story {
        Story::Feed(Need::Pressing) => (
            "Feeding Time!",
            format!("{pet}'s eyes light up at the magical food and the whole meal vanishes in a happy dance."),
        ),
        Story::Feed(Need::Mild) => (
            "Feeding Time!",
            format!("{pet} nibbles delicately on the sparkling treats, then nuzzles your hand in thanks."),
        ),
        Story::Bathe(Need::Pressing) => (
            "Bath Time!",
            format!("Enchanted bubbles pop into tiny stars as the dirt dissolves and {pet}'s coat shines again."),
        ),
        Story::Bathe(Need::Mild) => (
            "Bath Time!",
            format!("{pet} splashes joyfully while the scent of mystic flowers fills the air."),
        ),
        Story::Sleep(Need::Pressing) => (
            "Dreamland Adventures!",
            format!("Worn out from adventures, {pet} curls up in the sleeping nook and snores soft melodies."),
        ),
        Story::Sleep(Need::Mild) => (
            "Dreamland Adventures!",
            format!("{pet} yawns, snuggles into the blanket and drifts off to faint fairy lullabies."),
        ),
        Story::Play(PlayActivity::Bubbles) => (
            "Playtime!",
            format!("{pet} chases floating bubbles that burst into tiny fireworks."),
        ),
        Story::Play(PlayActivity::Garden) => (
            "Playtime!",
            format!("You and {pet} dance through a miniature garden of singing flowers."),
        ),
        Story::Play(PlayActivity::HideAndSeek) => (
            "Playtime!",
            format!("A friendly spirit challenges you and {pet} to hide-and-seek among the clouds."),
        ),
    }
}

fn alert_line(vital: Vital, pet: &str) -> String {
    match vital {
        Vital::Hunger => format!("{pet}'s tummy is rumbling! A feast would be wonderful."),
        Vital::Cleanliness => format!("{pet} could use a bubbly bath."),
        Vital::Energy => format!("{pet}'s eyelids are getting heavy. A nap would be dreamy."),
        Vital::Happiness => format!("{pet} looks a bit bored. Some playtime would help."),
    }
}

fn event_line(ev: MagicEvent, pet: &str) -> String {
    match ev {
        MagicEvent::WizardCharm => format!("A friendly wizard gifts {pet} a shimmering charm!"),
        MagicEvent::ShootingStars => {
            format!("Shooting stars rain across the sky! {pet} watches in awe.")
        }
        MagicEvent::FairyPrank => {
            format!("A mischievous fairy plays a prank on {pet}, who giggles with joy!")
        }
    }
}
