use std::{io, sync::mpsc, thread, time::Duration};
use termion::{event::Key, input::TermRead};

pub(crate) enum Event<I> {
    Input(I),
    Tick,
}

/// A small event handler that wraps termion key and mouse events plus a
/// periodic tick. Each source runs in its own thread and feeds a common
/// `Receiver`.
pub(crate) struct Events {
    rx: mpsc::Receiver<Event<termion::event::Event>>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    pub(crate) exit_key: Key,
    pub(crate) restart_key: Key,
    pub(crate) tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            exit_key: Key::Char('q'),
            restart_key: Key::Char('r'),
            tick_rate: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Quit on the exit key, `Esc`, or `Ctrl-C` (raw mode swallows SIGINT).
    pub(crate) fn is_exit(&self, key: Key) -> bool {
        key == self.exit_key || matches!(key, Key::Esc | Key::Ctrl('c'))
    }

    /// Letter keys restart regardless of Shift or Caps Lock.
    pub(crate) fn is_restart(&self, key: Key) -> bool {
        match (key, self.restart_key) {
            (Key::Char(pressed), Key::Char(restart)) => pressed.eq_ignore_ascii_case(&restart),
            _ => key == self.restart_key,
        }
    }
}

impl Events {
    pub(crate) fn with_config(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            _input_handle: {
                let tx = tx.clone();
                thread::spawn(move || {
                    let stdin = io::stdin();
                    for event in stdin.events() {
                        match event {
                            Ok(event) => {
                                if let Err(err) = tx.send(Event::Input(event)) {
                                    log::debug!("input channel closed: {err}");
                                    return;
                                }
                            }
                            Err(err) => log::warn!("failed to read input event: {err}"),
                        }
                    }
                })
            },
            _tick_handle: {
                thread::spawn(move || loop {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    thread::sleep(config.tick_rate);
                })
            },
        }
    }

    pub(crate) fn next(&self) -> Result<Event<termion::event::Event>, mpsc::RecvError> {
        self.rx.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_key_ignores_case() {
        let config = Config::default();
        assert!(config.is_restart(Key::Char('r')));
        assert!(config.is_restart(Key::Char('R')));
        assert!(!config.is_restart(Key::Char('q')));
        assert!(!config.is_restart(Key::Ctrl('r')));

        let arrows = Config {
            restart_key: Key::F(5),
            ..Config::default()
        };
        assert!(arrows.is_restart(Key::F(5)));
        assert!(!arrows.is_restart(Key::Char('r')));
    }

    #[test]
    fn exit_keys() {
        let config = Config::default();
        for key in [Key::Char('q'), Key::Esc, Key::Ctrl('c')] {
            assert!(config.is_exit(key), "{key:?}");
        }
        assert!(!config.is_exit(Key::Char('Q')));
        assert!(!config.is_exit(Key::Char('r')));
    }
}
