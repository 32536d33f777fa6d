use std::str::FromStr;

use crate::InputError;

/// A high-level control a driver can hold down during a step.
///
/// The world consumes [`PlayerIntent`](tileworld_common::PlayerIntent)s,
/// never raw actions; see [`Controls`](crate::Controls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Bound to nothing.
    Noop,
}

impl Action {
    /// Script letter for this action.
    pub fn symbol(self) -> char {
        match self {
            Action::MoveLeft => 'L',
            Action::MoveRight => 'R',
            Action::Jump => 'J',
            Action::Noop => '.',
        }
    }

    pub fn from_symbol(c: char) -> Result<Action, InputError> {
        match c.to_ascii_uppercase() {
            'L' => Ok(Action::MoveLeft),
            'R' => Ok(Action::MoveRight),
            'J' => Ok(Action::Jump),
            '.' => Ok(Action::Noop),
            other => Err(InputError::UnknownSymbol(other)),
        }
    }
}

/// A scripted input sequence: one set of held actions per step.
///
/// Written as comma-separated frames of action letters, e.g. `"R,R,RJ,,L"`.
/// An empty frame holds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    frames: Vec<Vec<Action>>,
}

impl InputScript {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Actions held on `step`, repeating the script from the start once it runs out.
    pub fn frame(&self, step: usize) -> &[Action] {
        if self.frames.is_empty() {
            return &[];
        }
        &self.frames[step % self.frames.len()]
    }
}

impl FromStr for InputScript {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let frames = s
            .split(',')
            .map(|frame| {
                frame
                    .trim()
                    .chars()
                    .map(Action::from_symbol)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }
}
