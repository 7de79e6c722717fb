//! Keyboard shortcuts for the study loop.
//!
//! [`resolve`] maps a key press to an [`Action`] for the current [`Context`].
//! [`SHORTCUTS`] is the same mapping in the shape the help overlay prints.

use serde::Serialize;

use crate::session::Phase;

/// A key the study screen reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Key {
    /// A printable character, matched case-insensitively
    Char(char),
    /// Space bar
    Space,
    /// Enter or Return
    Enter,
    /// Escape
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
}

/// A key together with its Ctrl modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key itself
    pub key: Key,
    /// Whether Ctrl was held
    pub ctrl: bool,
}

impl KeyPress {
    /// The key without modifiers.
    pub const fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    /// The key with Ctrl held.
    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Show the back of the card
    Reveal,
    /// Record the current card as correct or incorrect
    Answer {
        /// Whether the user knew the answer
        correct: bool,
    },
    /// Go back one card without answering
    Previous,
    /// Skip ahead one card without answering
    Next,
    /// Re-shuffle and start over
    Restart,
    /// Leave the study screen
    Exit,
    /// Open or close the shortcut overlay
    ToggleHelp,
}

/// What the key handler needs to know about the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Current session phase
    pub phase: Phase,
    /// Whether the shortcut overlay is showing
    pub help_open: bool,
    /// Whether an answer is being reported
    pub answer_pending: bool,
}

/// Map a key press to an action, or `None` when the key is inert here.
pub fn resolve(press: KeyPress, ctx: Context) -> Option<Action> {
    let key = match press.key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    };

    if ctx.help_open {
        return matches!(key, Key::Char('?') | Key::Escape).then_some(Action::ToggleHelp);
    }
    if key == Key::Char('?') {
        return Some(Action::ToggleHelp);
    }

    if ctx.phase == Phase::Completed {
        return match key {
            Key::Char('r') => Some(Action::Restart),
            Key::Char('b') | Key::Escape => Some(Action::Exit),
            _ => None,
        };
    }

    if ctx.answer_pending {
        return None;
    }

    let back_shown = ctx.phase == Phase::ShowingBack;

    match key {
        Key::Char('r') if press.ctrl => Some(Action::Restart),
        Key::Space | Key::Enter | Key::Up | Key::Down | Key::Char('k' | 'j') => {
            (!back_shown).then_some(Action::Reveal)
        }
        Key::Char('1' | 'x' | 'i') => back_shown.then_some(Action::Answer { correct: false }),
        Key::Char('2' | 'c' | 'o') => back_shown.then_some(Action::Answer { correct: true }),
        Key::Left | Key::Char('h') => Some(if back_shown {
            Action::Answer { correct: false }
        } else {
            Action::Previous
        }),
        Key::Right | Key::Char('l') => Some(if back_shown {
            Action::Answer { correct: true }
        } else {
            Action::Next
        }),
        Key::Char('p') => Some(Action::Previous),
        Key::Char('s') => Some(Action::Next),
        Key::Escape | Key::Char('q') => Some(Action::Exit),
        _ => None,
    }
}

/// Parse one line of terminal input into a key press.
///
/// Accepts a single character, the names `space`, `enter`, `esc`, `left`,
/// `right`, `up`, `down`, and a `ctrl-` or `^` prefix. An empty line is Enter.
pub fn parse_key(input: &str) -> Option<KeyPress> {
    let input = input.trim_end_matches(['\r', '\n']);
    if input.is_empty() {
        return Some(KeyPress::plain(Key::Enter));
    }
    if input == " " {
        return Some(KeyPress::plain(Key::Space));
    }

    let lowered = input.trim().to_ascii_lowercase();
    let (ctrl, name) = if let Some(rest) = lowered.strip_prefix("ctrl-") {
        (true, rest)
    } else if let Some(rest) = lowered.strip_prefix('^').filter(|rest| !rest.is_empty()) {
        (true, rest)
    } else {
        (false, lowered.as_str())
    };

    let key = match name {
        "space" => Key::Space,
        "enter" | "return" => Key::Enter,
        "esc" | "escape" => Key::Escape,
        "left" => Key::Left,
        "right" => Key::Right,
        "up" => Key::Up,
        "down" => Key::Down,
        single => {
            let mut chars = single.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyPress { key, ctrl })
}

/// Screen a shortcut applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum When {
    /// Front of the card is showing
    Front,
    /// Back of the card is showing
    Back,
    /// Either side of a card, before completion
    Studying,
    /// Completion screen
    Completed,
    /// Any screen
    Always,
}

/// One row of the help overlay.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Shortcut {
    /// Key names as accepted by [`parse_key`]
    pub keys: &'static [&'static str],
    /// Screen the keys apply on
    pub when: When,
    /// What the keys do there
    pub action: Action,
    /// Text shown in the overlay
    pub description: &'static str,
}

/// Every shortcut, in the order the help overlay lists them.
pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        keys: &["space", "enter", "up", "down", "k", "j"],
        when: When::Front,
        action: Action::Reveal,
        description: "Show answer",
    },
    Shortcut {
        keys: &["1", "x", "i", "left", "h"],
        when: When::Back,
        action: Action::Answer { correct: false },
        description: "Mark incorrect",
    },
    Shortcut {
        keys: &["2", "c", "o", "right", "l"],
        when: When::Back,
        action: Action::Answer { correct: true },
        description: "Mark correct",
    },
    Shortcut {
        keys: &["left", "h", "p"],
        when: When::Front,
        action: Action::Previous,
        description: "Previous card",
    },
    Shortcut {
        keys: &["right", "l", "s"],
        when: When::Front,
        action: Action::Next,
        description: "Skip to next card",
    },
    Shortcut {
        keys: &["ctrl-r"],
        when: When::Studying,
        action: Action::Restart,
        description: "Restart session",
    },
    Shortcut {
        keys: &["esc", "q"],
        when: When::Studying,
        action: Action::Exit,
        description: "Back to deck",
    },
    Shortcut {
        keys: &["r"],
        when: When::Completed,
        action: Action::Restart,
        description: "Study again",
    },
    Shortcut {
        keys: &["b", "esc"],
        when: When::Completed,
        action: Action::Exit,
        description: "Back to deck",
    },
    Shortcut {
        keys: &["?"],
        when: When::Always,
        action: Action::ToggleHelp,
        description: "Toggle this help",
    },
];
