//! Interactive menu model
//!
//! Screens and entries are plain data rebuilt from fresh snapshots on every
//! frame. [`MenuState`] turns key presses into [`MenuAction`]s; the terminal
//! driver performs them and redraws.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use volumecontrol_core::domain::{Application, Sink};

const MAIN_TITLE: &str = "Volume Control";
const APPLICATIONS_TITLE: &str = "Applications";

/// Keys the menu reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Applications,
    SinkPicker { app_id: u32 },
}

impl Screen {
    /// Whether the frame for this screen needs the application list
    pub fn needs_applications(&self) -> bool {
        !matches!(self, Screen::Main)
    }
}

/// What the driver should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Exit,
    SetDefaultSink(u32),
    VolumeUp(u32),
    VolumeDown(u32),
    ToggleMute(u32),
    MoveApplication { app: u32, sink: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinkEntry {
    pub sink: Sink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationEntry {
    pub app: Application,
    /// `None` when the routed sink no longer exists
    pub sink_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuEntry {
    pub title: String,
    pub target: Screen,
}

/// A sink offered as the new destination of an application
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub app_id: u32,
    pub sink_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Sink(SinkEntry),
    Application(ApplicationEntry),
    Submenu(SubmenuEntry),
    Target(TargetEntry),
    Back(String),
}

impl MenuEntry {
    /// Line shown for the entry at zero-based `index`
    pub fn label(&self, index: usize) -> String {
        let number = index + 1;
        match self {
            MenuEntry::Sink(entry) => {
                let sink = &entry.sink;
                let indicator = if sink.is_active { "[ X ]" } else { "[   ]" };
                let volume = if sink.muted {
                    "Muted".to_string()
                } else {
                    format!("{:4}%", sink.global_percent())
                };
                format!("{number} - {indicator} {:<50} {volume}", sink.name)
            }
            MenuEntry::Application(entry) => {
                let sink = entry.sink_name.as_deref().unwrap_or("unknown sink");
                format!("{number} - {:<30} {sink}", entry.app.name)
            }
            MenuEntry::Submenu(entry) => format!("{number} - {}", entry.title),
            MenuEntry::Target(entry) => format!("{number} - {}", entry.name),
            MenuEntry::Back(label) => format!("{number} - {label}"),
        }
    }
}

/// Everything drawn for one screen
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

impl Frame {
    pub fn build(
        screen: Screen,
        sinks: &BTreeMap<u32, Sink>,
        apps: &BTreeMap<u32, Application>,
    ) -> Self {
        match screen {
            Screen::Main => {
                let mut entries: Vec<MenuEntry> = sinks
                    .values()
                    .map(|sink| MenuEntry::Sink(SinkEntry { sink: sink.clone() }))
                    .collect();
                entries.push(MenuEntry::Submenu(SubmenuEntry {
                    title: APPLICATIONS_TITLE.to_string(),
                    target: Screen::Applications,
                }));
                entries.push(MenuEntry::Back("Exit".to_string()));
                Self {
                    title: MAIN_TITLE.to_string(),
                    entries,
                }
            }
            Screen::Applications => {
                let mut entries: Vec<MenuEntry> = apps
                    .values()
                    .map(|app| {
                        MenuEntry::Application(ApplicationEntry {
                            app: app.clone(),
                            sink_name: sinks.get(&app.sink_id).map(|sink| sink.name.clone()),
                        })
                    })
                    .collect();
                entries.push(MenuEntry::Back(format!("Return to {MAIN_TITLE} menu")));
                Self {
                    title: APPLICATIONS_TITLE.to_string(),
                    entries,
                }
            }
            Screen::SinkPicker { app_id } => {
                let app_name = apps
                    .get(&app_id)
                    .map_or_else(|| format!("#{app_id}"), |app| app.name.clone());
                let mut entries: Vec<MenuEntry> = sinks
                    .values()
                    .map(|sink| {
                        MenuEntry::Target(TargetEntry {
                            app_id,
                            sink_id: sink.id,
                            name: sink.name.clone(),
                        })
                    })
                    .collect();
                entries.push(MenuEntry::Back(format!(
                    "Return to {APPLICATIONS_TITLE} menu"
                )));
                Self {
                    title: format!("Select sink for application {app_name}"),
                    entries,
                }
            }
        }
    }
}

/// Screen stack and cursor positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    stack: Vec<(Screen, usize)>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            stack: vec![(Screen::Main, 0)],
        }
    }

    pub fn screen(&self) -> Screen {
        self.top().0
    }

    pub fn selected(&self) -> usize {
        self.top().1
    }

    fn top(&self) -> (Screen, usize) {
        self.stack.last().copied().unwrap_or((Screen::Main, 0))
    }

    fn cursor(&mut self) -> Option<&mut usize> {
        self.stack.last_mut().map(|(_, selected)| selected)
    }

    /// Keep the cursor inside a list that may have shrunk since the last frame
    pub fn clamp(&mut self, len: usize) {
        if let Some(selected) = self.cursor() {
            *selected = (*selected).min(len.saturating_sub(1));
        }
    }

    fn open(&mut self, screen: Screen) -> MenuAction {
        self.stack.push((screen, 0));
        MenuAction::None
    }

    fn close(&mut self) -> MenuAction {
        if self.stack.len() > 1 {
            self.stack.pop();
            MenuAction::None
        } else {
            MenuAction::Exit
        }
    }

    pub fn handle(&mut self, key: Key, entries: &[MenuEntry]) -> MenuAction {
        if entries.is_empty() {
            return match key {
                Key::Back | Key::Char('q') => self.close(),
                _ => MenuAction::None,
            };
        }

        let len = entries.len();
        let selected = self.selected().min(len - 1);
        match key {
            Key::Up => {
                self.move_to(if selected == 0 { len - 1 } else { selected - 1 });
                MenuAction::None
            }
            Key::Down => {
                self.move_to((selected + 1) % len);
                MenuAction::None
            }
            Key::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < len {
                    self.move_to(index);
                }
                MenuAction::None
            }
            Key::Back | Key::Char('q') => self.close(),
            Key::Enter => self.activate(&entries[selected]),
            Key::Right => match &entries[selected] {
                MenuEntry::Sink(entry) => MenuAction::VolumeUp(entry.sink.id),
                _ => MenuAction::None,
            },
            Key::Left => match &entries[selected] {
                MenuEntry::Sink(entry) => MenuAction::VolumeDown(entry.sink.id),
                _ => MenuAction::None,
            },
            Key::Char('m') => match &entries[selected] {
                MenuEntry::Sink(entry) => MenuAction::ToggleMute(entry.sink.id),
                _ => MenuAction::None,
            },
            Key::Char(_) => MenuAction::None,
        }
    }

    fn move_to(&mut self, index: usize) {
        if let Some(selected) = self.cursor() {
            *selected = index;
        }
    }

    fn activate(&mut self, entry: &MenuEntry) -> MenuAction {
        match entry {
            MenuEntry::Sink(entry) => MenuAction::SetDefaultSink(entry.sink.id),
            MenuEntry::Submenu(entry) => self.open(entry.target),
            MenuEntry::Application(entry) => self.open(Screen::SinkPicker {
                app_id: entry.app.id,
            }),
            MenuEntry::Target(entry) => {
                self.close();
                MenuAction::MoveApplication {
                    app: entry.app_id,
                    sink: entry.sink_id,
                }
            }
            MenuEntry::Back(_) => self.close(),
        }
    }
}

/// Drops an Esc arriving within `delay` of the last accepted one, so a
/// double-tapped or held Esc closes one screen rather than several
#[derive(Debug)]
pub struct EscapeDebounce {
    delay: Duration,
    last: Option<Instant>,
}

impl EscapeDebounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.delay {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}
