//! Player input: a fixed action set with held and edge state
//!
//! The host calls `press`/`release` from its event handlers. Each scheduler
//! frame takes one `TickInput` snapshot; rising edges are handed to the first
//! tick of the frame only, so a single key press never triggers twice across
//! substeps.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Every input the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// Jump, flap, climb up or accelerate depending on the game
    Up,
    /// Climb down or brake
    Down,
    /// Shoot; also starts a run or advances a level
    Primary,
    Pause,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Up,
        Action::Down,
        Action::Primary,
        Action::Pause,
    ];

    const fn bit(self) -> u8 {
        match self {
            Action::MoveLeft => ActionSet::LEFT,
            Action::MoveRight => ActionSet::RIGHT,
            Action::Up => ActionSet::UP,
            Action::Down => ActionSet::DOWN,
            Action::Primary => ActionSet::PRIMARY,
            Action::Pause => ActionSet::PAUSE,
        }
    }

    /// Map a browser `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Action> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Action::MoveRight),
            "ArrowUp" | "w" | "W" => Some(Action::Up),
            "ArrowDown" | "s" | "S" => Some(Action::Down),
            " " | "Enter" => Some(Action::Primary),
            "Escape" | "p" | "P" => Some(Action::Pause),
            _ => None,
        }
    }
}

/// Compact set of actions, one bit each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSet {
    pub bits: u8,
}

impl ActionSet {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const UP: u8 = 1 << 2;
    pub const DOWN: u8 = 1 << 3;
    pub const PRIMARY: u8 = 1 << 4;
    pub const PAUSE: u8 = 1 << 5;

    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[inline]
    pub const fn contains(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, action: Action, on: bool) {
        if on {
            self.bits |= action.bit();
        } else {
            self.bits &= !action.bit();
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(ActionSet::empty(), ActionSet::with)
    }
}

/// Held keys plus rising edges not yet seen by a tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: ActionSet,
    pressed: ActionSet,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key down. Auto-repeat while held does not create a new edge.
    pub fn press(&mut self, action: Action) {
        if !self.held.contains(action) {
            self.pressed.set(action, true);
        }
        self.held.set(action, true);
    }

    /// Key up. An edge pressed and released within one frame is kept.
    pub fn release(&mut self, action: Action) {
        self.held.set(action, false);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held = ActionSet::empty();
        self.pressed = ActionSet::empty();
    }

    /// Input for the next tick; consumes pending edges
    pub fn tick_input(&mut self) -> TickInput {
        let input = TickInput {
            held: self.held,
            pressed: self.pressed,
        };
        self.pressed = ActionSet::empty();
        input
    }
}
