use crate::input::{collect_input_nonblocking, map_event_to_command, Command};
use crate::render::{draw_scene, Terminal};
use petopia::{
    Engine, MagicEvent, Narrative, Passage, Rules, Settings, Snapshot, Species, TickObserver,
    Vital,
};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Choose { cursor: usize },
    Main,
}

/// Story panel. Ticks and actions replace whatever it shows.
struct StoryBoard {
    pet: String,
    passage: Passage,
}

impl StoryBoard {
    fn new() -> Self {
        Self {
            pet: String::new(),
            passage: Narrative::Intro.render(""),
        }
    }

    fn show(&mut self, n: Narrative) {
        self.passage = n.render(&self.pet);
    }
}

impl TickObserver for StoryBoard {
    fn on_alert_check(&mut self, alerts: &[Vital]) {
        if !alerts.is_empty() {
            self.show(Narrative::Alerts(alerts.to_vec()));
        }
    }

    fn on_random_event(&mut self, event: MagicEvent) {
        self.show(Narrative::Event(event));
    }

    fn on_day_rollover(&mut self, day: u32) {
        self.show(Narrative::NewDay(day));
    }
}

pub(crate) struct App {
    settings: Settings,
    engine: Engine,
    term: Terminal,
    scene: Scene,
    story: StoryBoard,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings, rules: Rules, species: Option<Species>) -> anyhow::Result<Self> {
        let engine = Engine::new(rules, settings.seed);
        let term = Terminal::begin()?;
        let mut app = Self {
            settings,
            engine,
            term,
            scene: Scene::Choose { cursor: 0 },
            story: StoryBoard::new(),
            should_quit: false,
        };
        if let Some(s) = species {
            app.adopt(s);
        }
        Ok(app)
    }

    fn adopt(&mut self, species: Species) {
        if self.engine.select_pet(species.into()) {
            self.story.pet = species.name().to_string();
            self.story.show(Narrative::Adopted);
        }
        self.scene = Scene::Main;
    }

    fn handle(&mut self, cmd: Command) {
        match (cmd, self.scene) {
            (Command::Quit, _) => self.should_quit = true,
            (Command::Move(delta), Scene::Choose { cursor }) => {
                let len = Species::ALL.len() as i32;
                let next = (cursor as i32 + delta).rem_euclid(len);
                self.scene = Scene::Choose {
                    cursor: next as usize,
                };
            }
            (Command::Confirm, Scene::Choose { cursor }) => self.adopt(Species::ALL[cursor]),
            (Command::Pick(i), Scene::Choose { .. }) => {
                if let Some(s) = Species::ALL.get(i) {
                    self.adopt(*s);
                }
            }
            (Command::Act(action), Scene::Main) => {
                if let Some(n) = self.engine.act(action).narrative() {
                    self.story.show(n);
                }
            }
            _ => {}
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(cmd) = map_event_to_command(&self.scene, &ev) {
                    self.handle(cmd);
                }
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            self.engine.advance(real_dt, &mut self.story);

            let snap: Snapshot = self.engine.snapshot();
            draw_scene(
                &mut self.term.cur,
                &self.scene,
                &snap,
                &self.story.passage,
                self.settings.enable_color,
            );
            self.term.present()?;

            std::thread::sleep(frame_dt.saturating_sub(frame_start.elapsed()));
        }

        self.engine.stop();
        info!(days = self.engine.state().days_with_pet(), "goodbye");
        Ok(())
    }
}

pub(crate) fn run(settings: Settings, rules: Rules, species: Option<Species>) -> anyhow::Result<()> {
    let mut app = App::init(settings, rules, species)?;
    let result = app.run();
    app.term.end()?;
    result
}
