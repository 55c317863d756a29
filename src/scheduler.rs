use crate::config::Rules;
use std::time::Duration;

/// The four periodic triggers, in tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tick {
    Decay,
    AlertCheck,
    RandomEvent,
    DayRollover,
}

#[derive(Clone, Debug)]
struct Timer {
    tick: Tick,
    every: Duration,
    next_due: Duration,
}

/// Fixed-step accumulator for independent periodic timers.
///
/// Time only moves when [`Scheduler::advance`] is called. Each timer fires
/// once per whole interval elapsed; ticks that fall inside one `advance` are
/// returned in chronological order, ties broken by [`Tick`] order.
#[derive(Clone, Debug)]
pub struct Scheduler {
    timers: [Timer; 4],
    elapsed: Duration,
    stopped: bool,
}

impl Scheduler {
    pub fn new(rules: &Rules) -> Self {
        let timer = |tick, every: Duration| {
            let every = every.max(Duration::from_millis(1));
            Timer {
                tick,
                every,
                next_due: every,
            }
        };
        Self {
            timers: [
                timer(Tick::Decay, rules.decay_every),
                timer(Tick::AlertCheck, rules.alert_every),
                timer(Tick::RandomEvent, rules.event_every),
                timer(Tick::DayRollover, rules.day_every),
            ],
            elapsed: Duration::ZERO,
            stopped: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stops every timer. Later calls to `advance` fire nothing.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<Tick> {
        let mut fired = Vec::new();
        if self.stopped {
            return fired;
        }
        let target = self.elapsed.saturating_add(dt);
        loop {
            // min_by_key keeps the first of equal keys, so array order breaks ties
            let next = self
                .timers
                .iter_mut()
                .filter(|t| t.next_due <= target)
                .min_by_key(|t| t.next_due);
            let Some(timer) = next else { break };
            fired.push(timer.tick);
            timer.next_due = timer.next_due.saturating_add(timer.every);
        }
        self.elapsed = target;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(ms: [u64; 4]) -> Rules {
        Rules {
            decay_every: Duration::from_millis(ms[0]),
            alert_every: Duration::from_millis(ms[1]),
            event_every: Duration::from_millis(ms[2]),
            day_every: Duration::from_millis(ms[3]),
            ..Rules::default()
        }
    }

    fn count(ticks: &[Tick], which: Tick) -> usize {
        ticks.iter().filter(|t| **t == which).count()
    }

    #[test]
    fn nothing_fires_before_first_interval() {
        let mut s = Scheduler::new(&Rules::default());
        assert!(s.advance(Duration::from_millis(11_999)).is_empty());
        assert_eq!(s.advance(Duration::from_millis(1)), vec![Tick::Decay]);
    }

    #[test]
    fn reference_pacing_over_one_day() {
        let mut s = Scheduler::new(&Rules::default());
        let fired = s.advance(Duration::from_millis(300_000));
        assert_eq!(count(&fired, Tick::Decay), 25);
        assert_eq!(count(&fired, Tick::AlertCheck), 5);
        assert_eq!(count(&fired, Tick::RandomEvent), 2);
        assert_eq!(count(&fired, Tick::DayRollover), 1);
        assert_eq!(fired.last(), Some(&Tick::DayRollover));
    }

    #[test]
    fn small_steps_match_one_big_step() {
        let mut a = Scheduler::new(&Rules::default());
        let mut b = Scheduler::new(&Rules::default());
        let mut stepped = Vec::new();
        for _ in 0..(600_000 / 250) {
            stepped.extend(a.advance(Duration::from_millis(250)));
        }
        let big = b.advance(Duration::from_millis(600_000));
        assert_eq!(stepped, big);
        assert_eq!(a.elapsed(), b.elapsed());
    }

    #[test]
    fn ticks_come_out_in_time_order_with_stable_ties() {
        let mut s = Scheduler::new(&rules([2, 3, 4, 6]));
        let fired = s.advance(Duration::from_millis(6));
        assert_eq!(
            fired,
            vec![
                Tick::Decay,       // 2
                Tick::AlertCheck,  // 3
                Tick::Decay,       // 4
                Tick::RandomEvent, // 4
                Tick::Decay,       // 6
                Tick::AlertCheck,  // 6
                Tick::DayRollover, // 6
            ]
        );
    }

    #[test]
    fn stop_silences_every_timer() {
        let mut s = Scheduler::new(&Rules::default());
        s.advance(Duration::from_millis(5_000));
        s.stop();
        assert!(s.is_stopped());
        assert!(s.advance(Duration::from_secs(3_600)).is_empty());
    }

    #[test]
    fn zero_interval_does_not_spin_forever() {
        let mut s = Scheduler::new(&rules([0, 1000, 1000, 1000]));
        assert_eq!(count(&s.advance(Duration::from_millis(5)), Tick::Decay), 5);
    }
}
