use chrono::{DateTime, Utc};

pub const VITAL_MIN: i32 = 0;
pub const VITAL_MAX: i32 = 100;
pub const VITAL_START: i32 = 50;

/// Below this a vital raises an alert and picks the "pressing" story bucket.
pub const LOW_VITAL: i32 = 30;

/// Baths and naps allowed between two day rollovers.
pub const DAILY_LIMIT: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vital {
    Hunger,
    Cleanliness,
    Energy,
    Happiness,
}

impl Vital {
    pub const ALL: [Vital; 4] = [
        Vital::Hunger,
        Vital::Cleanliness,
        Vital::Energy,
        Vital::Happiness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Vital::Hunger => "Hunger",
            Vital::Cleanliness => "Cleanliness",
            Vital::Energy => "Energy",
            Vital::Happiness => "Happiness",
        }
    }
}

/// Display band for a single vital.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Good,
    Fair,
    Low,
}

impl Level {
    pub fn of(value: i32) -> Self {
        if value > 60 {
            Level::Good
        } else if value > LOW_VITAL {
            Level::Fair
        } else {
            Level::Low
        }
    }
}

/// The four bounded vitals. Fields are private so every write goes through
/// [`Vitals::clamped_adjust`] and stays inside `VITAL_MIN..=VITAL_MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vitals {
    hunger: i32,
    cleanliness: i32,
    energy: i32,
    happiness: i32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hunger: VITAL_START,
            cleanliness: VITAL_START,
            energy: VITAL_START,
            happiness: VITAL_START,
        }
    }
}

impl Vitals {
    pub fn new(hunger: i32, cleanliness: i32, energy: i32, happiness: i32) -> Self {
        Self {
            hunger: clamp_vital(hunger),
            cleanliness: clamp_vital(cleanliness),
            energy: clamp_vital(energy),
            happiness: clamp_vital(happiness),
        }
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn cleanliness(&self) -> i32 {
        self.cleanliness
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn happiness(&self) -> i32 {
        self.happiness
    }

    pub fn get(&self, vital: Vital) -> i32 {
        match vital {
            Vital::Hunger => self.hunger,
            Vital::Cleanliness => self.cleanliness,
            Vital::Energy => self.energy,
            Vital::Happiness => self.happiness,
        }
    }

    /// Adds `delta` to one vital and clamps the result. Returns the new value.
    pub fn clamped_adjust(&mut self, vital: Vital, delta: i32) -> i32 {
        let slot = match vital {
            Vital::Hunger => &mut self.hunger,
            Vital::Cleanliness => &mut self.cleanliness,
            Vital::Energy => &mut self.energy,
            Vital::Happiness => &mut self.happiness,
        };
        *slot = clamp_vital(slot.saturating_add(delta));
        *slot
    }

    /// Integer mean of the four vitals, rounded toward zero.
    pub fn average(&self) -> i32 {
        (self.hunger + self.cleanliness + self.energy + self.happiness) / 4
    }

    /// Vitals under [`LOW_VITAL`], in display order.
    pub fn low(&self) -> Vec<Vital> {
        Vital::ALL
            .into_iter()
            .filter(|v| self.get(*v) < LOW_VITAL)
            .collect()
    }
}

fn clamp_vital(v: i32) -> i32 {
    v.clamp(VITAL_MIN, VITAL_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Dinno,
    Monkey,
    Hippo,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Dinno, Species::Monkey, Species::Hippo];

    pub fn name(self) -> &'static str {
        match self {
            Species::Dinno => "Dinno",
            Species::Monkey => "Monkey",
            Species::Hippo => "Hippo",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            Species::Dinno => {
                "A playful little dinosaur with sparkling eyes who loves adventures and warm cuddles."
            }
            Species::Monkey => {
                "A mischievous monkey with a heart of gold who collects shiny treasures."
            }
            Species::Hippo => {
                "A gentle hippo who blows rainbow bubbles and dances under the moonlight."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

/// Who the player adopted. The engine only reads the name for narrative text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PetIdentity {
    pub name: String,
    pub kind: String,
}

impl PetIdentity {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

impl From<Species> for PetIdentity {
    fn from(s: Species) -> Self {
        Self::new(s.name(), s.name())
    }
}

/// Single source of truth for the simulated pet.
#[derive(Clone, Debug, Default)]
pub struct PetState {
    vitals: Vitals,
    days_with_pet: u32,
    bath_count: u32,
    sleep_count: u32,
    last_feed_time: Option<DateTime<Utc>>,
    pet: Option<PetIdentity>,
}

impl PetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn days_with_pet(&self) -> u32 {
        self.days_with_pet
    }

    pub fn bath_count(&self) -> u32 {
        self.bath_count
    }

    pub fn sleep_count(&self) -> u32 {
        self.sleep_count
    }

    pub fn last_feed_time(&self) -> Option<DateTime<Utc>> {
        self.last_feed_time
    }

    pub fn pet(&self) -> Option<&PetIdentity> {
        self.pet.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.pet.is_some()
    }

    /// Name used in narrative text; empty before adoption.
    pub fn pet_name(&self) -> &str {
        self.pet.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    pub(crate) fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    /// Returns false if a pet was already adopted.
    pub(crate) fn adopt(&mut self, identity: PetIdentity) -> bool {
        if self.pet.is_some() {
            return false;
        }
        self.pet = Some(identity);
        true
    }

    pub(crate) fn mark_fed(&mut self, at: DateTime<Utc>) {
        self.last_feed_time = Some(at);
    }

    pub(crate) fn count_bath(&mut self) {
        self.bath_count = (self.bath_count + 1).min(DAILY_LIMIT);
    }

    pub(crate) fn count_sleep(&mut self) {
        self.sleep_count = (self.sleep_count + 1).min(DAILY_LIMIT);
    }

    pub(crate) fn start_new_day(&mut self) -> u32 {
        self.days_with_pet = self.days_with_pet.saturating_add(1);
        self.bath_count = 0;
        self.sleep_count = 0;
        self.days_with_pet
    }
}
