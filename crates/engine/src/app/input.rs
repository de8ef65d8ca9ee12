#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    RunLeft,
    RunRight,
    Jump,
    Shoot,
    ThrowGrenade,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::RunLeft => 0,
            InputAction::RunRight => 1,
            InputAction::Jump => 2,
            InputAction::Shoot => 3,
            InputAction::ThrowGrenade => 4,
            InputAction::Quit => 5,
        }
    }
}
