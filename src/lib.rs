//! Virtual pet state engine.
//!
//! [`Engine`] owns a single [`PetState`]: four bounded vitals, a day counter
//! and the per-day bath/nap counters. Periodic ticks (decay, alert checks,
//! magical events, day rollover) come from a fixed-step [`Scheduler`];
//! player actions go through the policy in [`policy`], which enforces the
//! feed cooldown and daily limits. Mood is always derived from the vitals.

pub mod clock;
pub mod config;
pub mod engine;
pub mod model;
pub mod mood;
pub mod narrative;
pub mod policy;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, Rules, Settings};
pub use engine::{Engine, Snapshot, TickObserver};
pub use model::{Level, PetIdentity, PetState, Species, Vital, Vitals};
pub use mood::Mood;
pub use narrative::{
    MagicEvent, Narrative, Need, Passage, PlayActivity, RngSelector, ScriptedSelector, Selector,
    Story, Wait,
};
pub use policy::{Action, ActionOutcome, ActionResult};
pub use scheduler::{Scheduler, Tick};
