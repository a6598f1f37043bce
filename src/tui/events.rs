//! 终端事件来源
//!
//! 主循环和模态对话框都从同一个 `EventSource` 读事件，
//! 测试用 `ScriptedEvents` 代替真实终端。

use crate::tui::terminal_guard::TerminationSignal;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub trait EventSource {
    /// Blocks until the next event. An error ends the current modal
    /// interaction and, in the main loop, the application.
    fn next_event(&mut self) -> io::Result<Event>;
}

pub struct CrosstermEvents {
    signals: Option<Receiver<TerminationSignal>>,
    terminated: Option<TerminationSignal>,
}

impl CrosstermEvents {
    pub fn new(signals: Option<Receiver<TerminationSignal>>) -> Self {
        Self {
            signals,
            terminated: None,
        }
    }

    pub fn terminated(&self) -> Option<TerminationSignal> {
        self.terminated
    }

    fn check_signals(&mut self) -> io::Result<()> {
        if self.terminated.is_none() {
            if let Some(rx) = &self.signals {
                if let Ok(signal) = rx.try_recv() {
                    tracing::info!(?signal, "termination requested");
                    self.terminated = Some(signal);
                }
            }
        }
        match self.terminated {
            Some(signal) => Err(io::Error::new(
                io::ErrorKind::Interrupted,
                format!("terminated by {signal:?}"),
            )),
            None => Ok(()),
        }
    }
}

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        loop {
            self.check_signals()?;
            if crossterm::event::poll(POLL_INTERVAL)? {
                return crossterm::event::read();
            }
        }
    }
}

/// Replays a fixed list of events, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
    }
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn ctrl(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

/// One key event per character.
pub fn typed(text: &str) -> Vec<Event> {
    text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
}
