use sky_voyager_shared::protocol::{ClientMsg, ControlState};

/// Drag distance (px) before a touch registers as a direction.
const TOUCH_DEADZONE: f64 = 20.0;
/// Device tilt (degrees) before it registers as a direction.
const TILT_DEADZONE: f64 = 10.0;

/// Discrete commands that are not part of the held control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    TogglePause,
}

impl From<InputAction> for ClientMsg {
    fn from(action: InputAction) -> Self {
        match action {
            InputAction::TogglePause => ClientMsg::TogglePause,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Up,
    Down,
    Left,
    Right,
    Boost,
    Pause,
}

fn binding(key: &str) -> Option<Binding> {
    match key.to_ascii_lowercase().as_str() {
        "w" | "arrowup" => Some(Binding::Up),
        "s" | "arrowdown" => Some(Binding::Down),
        "a" | "arrowleft" => Some(Binding::Left),
        "d" | "arrowright" => Some(Binding::Right),
        " " | "space" => Some(Binding::Boost),
        "p" => Some(Binding::Pause),
        _ => None,
    }
}

/// Folds keyboard, touch and tilt input into one held [`ControlState`].
///
/// All sources write the same state; the last event wins.
#[derive(Debug, Default)]
pub struct InputMapper {
    control: ControlState,
    touch_origin: Option<(f64, f64)>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the held state, taken once per tick.
    pub fn snapshot(&self) -> ControlState {
        self.control
    }

    /// Held state as a host command.
    pub fn control_msg(&self) -> ClientMsg {
        ClientMsg::Control(self.control)
    }

    pub fn key_down(&mut self, key: &str) -> Option<InputAction> {
        match binding(key)? {
            Binding::Pause => return Some(InputAction::TogglePause),
            b => self.set(b, true),
        }
        None
    }

    pub fn key_up(&mut self, key: &str) {
        match binding(key) {
            Some(Binding::Pause) | None => {}
            Some(b) => self.set(b, false),
        }
    }

    /// A second finger on touch start requests boost.
    pub fn touch_start(&mut self, x: f64, y: f64, touches: usize) {
        self.touch_origin = Some((x, y));
        if touches >= 2 {
            self.control.boost = true;
        }
    }

    pub fn touch_move(&mut self, x: f64, y: f64) {
        let Some((x0, y0)) = self.touch_origin else {
            return;
        };
        let (dx, dy) = (x - x0, y - y0);
        self.control.left = dx < -TOUCH_DEADZONE;
        self.control.right = dx > TOUCH_DEADZONE;
        // Screen y grows downward
        self.control.up = dy < -TOUCH_DEADZONE;
        self.control.down = dy > TOUCH_DEADZONE;
    }

    pub fn touch_end(&mut self) {
        self.touch_origin = None;
        self.control = ControlState::default();
    }

    /// Device tilt in degrees. Readings with a missing axis are dropped.
    pub fn orientation(&mut self, beta: Option<f64>, gamma: Option<f64>) {
        let (Some(beta), Some(gamma)) = (beta, gamma) else {
            return;
        };
        self.control.up = beta < -TILT_DEADZONE;
        self.control.down = beta > TILT_DEADZONE;
        self.control.left = gamma < -TILT_DEADZONE;
        self.control.right = gamma > TILT_DEADZONE;
    }

    fn set(&mut self, binding: Binding, pressed: bool) {
        match binding {
            Binding::Up => self.control.up = pressed,
            Binding::Down => self.control.down = pressed,
            Binding::Left => self.control.left = pressed,
            Binding::Right => self.control.right = pressed,
            Binding::Boost => self.control.boost = pressed,
            Binding::Pause => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_directions() {
        let mut input = InputMapper::new();
        input.key_down("W");
        input.key_down("ArrowLeft");
        input.key_down(" ");
        let c = input.snapshot();
        assert!(c.up && c.left && c.boost);
        assert!(!c.down && !c.right);

        input.key_up("w");
        input.key_up("arrowleft");
        input.key_up(" ");
        assert_eq!(input.snapshot(), ControlState::default());
    }

    #[test]
    fn p_toggles_pause_without_touching_controls() {
        let mut input = InputMapper::new();
        assert_eq!(input.key_down("p"), Some(InputAction::TogglePause));
        assert_eq!(input.key_down("P"), Some(InputAction::TogglePause));
        assert_eq!(input.snapshot(), ControlState::default());
        input.key_up("p");
    }

    #[test]
    fn actions_and_held_state_become_host_commands() {
        let mut input = InputMapper::new();
        let action = input.key_down("p").map(ClientMsg::from);
        assert!(matches!(action, Some(ClientMsg::TogglePause)));

        input.key_down("d");
        match input.control_msg() {
            ClientMsg::Control(c) => assert!(c.right && !c.left),
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut input = InputMapper::new();
        assert_eq!(input.key_down("Enter"), None);
        input.key_up("q");
        assert_eq!(input.snapshot(), ControlState::default());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut input = InputMapper::new();
        input.key_down("d");
        let snap = input.snapshot();
        input.key_up("d");
        assert!(snap.right);
        assert!(!input.snapshot().right);
    }

    #[test]
    fn touch_drag_beyond_deadzone_sets_direction() {
        let mut input = InputMapper::new();
        input.touch_start(100.0, 100.0, 1);
        input.touch_move(115.0, 85.0);
        assert_eq!(input.snapshot(), ControlState::default());
        input.touch_move(130.0, 70.0);
        let c = input.snapshot();
        assert!(c.right && c.up);
        assert!(!c.left && !c.down);
    }

    #[test]
    fn touch_move_without_start_is_ignored() {
        let mut input = InputMapper::new();
        input.touch_move(500.0, 500.0);
        assert_eq!(input.snapshot(), ControlState::default());
    }

    #[test]
    fn two_finger_touch_boosts_until_release() {
        let mut input = InputMapper::new();
        input.touch_start(10.0, 10.0, 2);
        input.touch_move(10.0, 60.0);
        let c = input.snapshot();
        assert!(c.boost && c.down);
        input.touch_end();
        assert_eq!(input.snapshot(), ControlState::default());
        input.touch_move(10.0, 200.0);
        assert_eq!(input.snapshot(), ControlState::default());
    }

    #[test]
    fn tilt_maps_to_directions() {
        let mut input = InputMapper::new();
        input.orientation(Some(-15.0), Some(12.0));
        let c = input.snapshot();
        assert!(c.up && c.right);
        input.orientation(Some(5.0), Some(-5.0));
        assert_eq!(input.snapshot(), ControlState::default());
    }

    #[test]
    fn tilt_with_missing_axis_keeps_previous_state() {
        let mut input = InputMapper::new();
        input.orientation(Some(20.0), Some(-20.0));
        let before = input.snapshot();
        input.orientation(None, Some(30.0));
        input.orientation(Some(-30.0), None);
        assert_eq!(input.snapshot(), before);
    }

    #[test]
    fn tilt_leaves_boost_alone() {
        let mut input = InputMapper::new();
        input.key_down(" ");
        input.orientation(Some(0.0), Some(0.0));
        assert!(input.snapshot().boost);
    }
}
