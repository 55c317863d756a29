use crate::app::Scene;
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use petopia::{Action, Level, Passage, Snapshot, Species, Vital};
use std::io::{self, Write};

/// One screen cell. The background is left to the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    ch: char,
    fg: Color,
    bold: bool,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
    bold: false,
};

pub(crate) struct CellBuffer {
    w: u16,
    h: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![BLANK; (w as usize) * (h as usize)],
        }
    }

    fn put(&mut self, x: u16, y: u16, c: Cell) -> bool {
        if x >= self.w || y >= self.h {
            return false;
        }
        self.cells[y as usize * self.w as usize + x as usize] = c;
        true
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<()> {
        let (c, r) = terminal::size()?;
        if (c, r) != (self.cur.w, self.cur.h) {
            self.prev = CellBuffer::new(c, r);
            self.cur = CellBuffer::new(c, r);
            queue!(self.out, Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Writes cells that changed since the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let w = self.cur.w as usize;
        let mut style = None;
        for (i, (c, old)) in self.cur.cells.iter().zip(&self.prev.cells).enumerate() {
            if c == old {
                continue;
            }
            queue!(self.out, cursor::MoveTo((i % w) as u16, (i / w) as u16))?;
            if style != Some((c.fg, c.bold)) {
                let weight = if c.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                queue!(self.out, SetAttribute(weight), SetForegroundColor(c.fg))?;
                style = Some((c.fg, c.bold));
            }
            queue!(self.out, Print(c.ch))?;
        }

        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            ResetColor,
            EndSynchronizedUpdate
        )?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text helpers
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bold: bool) {
    for (i, ch) in s.chars().enumerate() {
        if !buf.put(x.saturating_add(i as u16), y, Cell { ch, fg, bold }) {
            break;
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for para in text.lines() {
        let mut line = String::new();
        for word in para.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }
    lines
}

fn bar(value: i32, width: usize) -> String {
    let fill = ((value.clamp(0, 100) as usize) * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn level_color(value: i32, color: bool) -> Color {
    if !color {
        return Color::White;
    }
    match Level::of(value) {
        Level::Good => Color::Green,
        Level::Fair => Color::Yellow,
        Level::Low => Color::Red,
    }
}

fn accent(color: bool) -> Color {
    if color {
        Color::Magenta
    } else {
        Color::White
    }
}

fn draw_passage(buf: &mut CellBuffer, y0: u16, passage: &Passage, color: bool) {
    let width = buf.w.saturating_sub(4) as usize;
    draw_text(buf, 2, y0, passage.title, accent(color), true);
    let bottom = buf.h.saturating_sub(2);
    for (i, line) in wrap(&passage.body, width).iter().enumerate() {
        let y = y0 + 2 + i as u16;
        if y >= bottom {
            break;
        }
        draw_text(buf, 2, y, line, Color::White, false);
    }
}

/* -----------------------------
   Scenes
------------------------------ */

pub(crate) fn draw_scene(
    buf: &mut CellBuffer,
    scene: &Scene,
    snap: &Snapshot,
    story: &Passage,
    color: bool,
) {
    buf.clear();
    match scene {
        Scene::Choose { cursor } => draw_choose(buf, *cursor, story, color),
        Scene::Main => draw_main(buf, snap, story, color),
    }
}

fn draw_choose(buf: &mut CellBuffer, cursor: usize, story: &Passage, color: bool) {
    draw_text(buf, 1, 0, "~ A Magical Pet Journey ~", accent(color), true);

    for (i, species) in Species::ALL.iter().enumerate() {
        let y = 2 + (i as u16) * 2;
        let selected = i == cursor;
        let marker = if selected { ">" } else { " " };
        let fg = if selected && color {
            Color::Yellow
        } else {
            Color::Reset
        };
        draw_text(
            buf,
            1,
            y,
            &format!("{marker} {}. {}", i + 1, species.name()),
            fg,
            selected,
        );
        draw_text(buf, 6, y + 1, species.blurb(), Color::Grey, false);
    }

    draw_passage(buf, 3 + Species::ALL.len() as u16 * 2, story, color);

    let help = "↑↓ choose | enter adopt | 1-3 quick pick | q quit";
    draw_text(buf, 1, buf.h.saturating_sub(1), help, Color::Grey, false);
}

fn draw_main(buf: &mut CellBuffer, snap: &Snapshot, story: &Passage, color: bool) {
    let (name, kind) = snap
        .pet
        .as_ref()
        .map(|p| (p.name.as_str(), p.kind.as_str()))
        .unwrap_or(("", ""));
    let title = format!(
        "Petopia  |  {name} the {kind}  |  Days together: {}",
        snap.days_with_pet
    );
    draw_text(buf, 1, 0, &title, accent(color), true);

    for (i, vital) in Vital::ALL.iter().enumerate() {
        let val = snap.vital(*vital);
        let s = format!("{:<12}{} {:>3}", vital.label(), bar(val, 20), val);
        draw_text(buf, 1, 2 + i as u16, &s, level_color(val, color), false);
    }

    let mood = format!("Current mood: {} {}", snap.mood, snap.mood.face());
    draw_text(buf, 1, 7, &mood, Color::White, true);

    let limits = format!(
        "Daily limits: 2 baths, 2 naps  |  Today's activities: {} baths, {} naps",
        snap.bath_count, snap.sleep_count
    );
    draw_text(buf, 1, 8, &limits, Color::Grey, false);

    let mut x = 1u16;
    for action in Action::ALL {
        let label = match action {
            Action::Feed => match snap.feed_wait() {
                Some(w) => format!("[f] Feed ({w})"),
                None => "[f] Feed".to_string(),
            },
            Action::Bathe => "[b] Bathe".to_string(),
            Action::Sleep => "[s] Sleep".to_string(),
            Action::Play => "[p] Play".to_string(),
        };
        let fg = if snap.can(action) {
            Color::White
        } else {
            Color::DarkGrey
        };
        draw_text(buf, x, 10, &label, fg, false);
        x = x.saturating_add(label.chars().count() as u16 + 3);
    }

    draw_passage(buf, 12, story, color);

    let help = "f feed | b bathe | s sleep | p play | q quit";
    draw_text(buf, 1, buf.h.saturating_sub(1), help, Color::Grey, false);
}
