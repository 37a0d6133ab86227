//! Control delegate: first-person navigation from mouse, keyboard and gamepad

use std::cell::RefCell;
use std::rc::Rc;

use viewer_engine::input::{GamepadAxis, GamepadButton, KeyIndex, MouseButton};
use viewer_engine::window::SharedView;
use viewer_engine::{ControlDelegate, Window};

use crate::scene::SceneState;
use crate::view::ViewerView;

/// Degrees per second of turn for each pixel of mouse travel in one event
const MOUSE_SPEED: f32 = 0.6;
/// Units per second while a movement key is held
const KEY_SPEED: f32 = 100.0;
/// Degrees per second at full right-stick deflection
const PAD_TURN_SPEED: f32 = 90.0;
/// Stick deflection treated as centred
const PAD_DEADZONE: f32 = 0.15;

#[derive(Debug, Default, Clone, Copy)]
struct MoveKeys {
    left: bool,
    right: bool,
    forward: bool,
    back: bool,
}

impl MoveKeys {
    /// Sideways and forward speed for the held keys
    fn speed(self) -> (f32, f32) {
        let axis = |negative: bool, positive: bool| {
            KEY_SPEED * (f32::from(u8::from(positive)) - f32::from(u8::from(negative)))
        };
        (axis(self.left, self.right), axis(self.back, self.forward))
    }
}

fn deadzone(value: f32) -> f32 {
    if value.abs() < PAD_DEADZONE {
        0.0
    } else {
        value
    }
}

/// Drives the scene camera and owns the view it renders with
pub struct ViewerController {
    scene: Rc<RefCell<SceneState>>,
    view: SharedView,
    title: String,
    turn_mode: bool,
    keys: MoveKeys,
    last_mouse: Option<(i32, i32)>,
    /// Left thumb x/y, right thumb x/y
    thumbs: [f32; 4],
    quit_requested: bool,
}

impl ViewerController {
    /// Controller with a fresh scene and a view onto it
    pub fn new(title: impl Into<String>) -> Self {
        let scene = Rc::new(RefCell::new(SceneState::new()));
        let view: SharedView = Rc::new(RefCell::new(ViewerView::new(Rc::clone(&scene))));
        Self {
            scene,
            view,
            title: title.into(),
            turn_mode: false,
            keys: MoveKeys::default(),
            last_mouse: None,
            thumbs: [0.0; 4],
            quit_requested: false,
        }
    }

    /// Whether the user asked to leave; the main loop closes the window
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn apply_thumbs(&self) {
        let [lx, ly, rx, ry] = self.thumbs.map(deadzone);
        let mut scene = self.scene.borrow_mut();
        // Stick up reports negative y
        scene.set_camera_translation_speed(lx * KEY_SPEED, -ly * KEY_SPEED);
        if !self.turn_mode {
            scene.set_camera_rotation_speed(-rx * PAD_TURN_SPEED, ry * PAD_TURN_SPEED);
        }
    }
}

impl ControlDelegate for ViewerController {
    fn start(&mut self, window: &Window) {
        window.set_view(Some(Rc::clone(&self.view)));
        window.set_title(&self.title);
    }

    fn stop(&mut self, window: &Window) {
        window.set_view(None);
    }

    fn view_will_render(&mut self, _window: &Window) {
        let mut scene = self.scene.borrow_mut();
        scene.update();
        if self.turn_mode {
            scene.set_camera_rotation_speed(0.0, 0.0);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn mouse_moved(&mut self, _window: &Window, x: i32, y: i32) {
        let (prev_x, prev_y) = self.last_mouse.unwrap_or((x, y));
        if self.turn_mode {
            let dx = (x - prev_x) as f32;
            let dy = (y - prev_y) as f32;
            self.scene
                .borrow_mut()
                .set_camera_rotation_speed(-dx * MOUSE_SPEED, -dy * MOUSE_SPEED);
        }
        self.last_mouse = Some((x, y));
    }

    fn mouse_button_changed(&mut self, _window: &Window, button: MouseButton, down: bool) {
        if button == MouseButton::Left {
            self.turn_mode = down;
        }
    }

    fn key_changed(&mut self, _window: &Window, key: KeyIndex, down: bool) {
        match key.as_char() {
            Some('A') => self.keys.left = down,
            Some('D') => self.keys.right = down,
            Some('W') => self.keys.forward = down,
            Some('S') => self.keys.back = down,
            _ => match key {
                KeyIndex::LEFT => self.keys.left = down,
                KeyIndex::RIGHT => self.keys.right = down,
                KeyIndex::UP => self.keys.forward = down,
                KeyIndex::DOWN => self.keys.back = down,
                KeyIndex::ESC if down => {
                    log::info!("Escape pressed, leaving");
                    self.quit_requested = true;
                    return;
                }
                _ => return,
            },
        }

        let (sideward, forward) = self.keys.speed();
        self.scene
            .borrow_mut()
            .set_camera_translation_speed(sideward, forward);
    }

    fn gamepad_axis_moved(&mut self, _window: &Window, gamepad: usize, axis: GamepadAxis, value: f32) {
        if gamepad != 0 {
            return;
        }
        let slot = match axis {
            GamepadAxis::LeftThumbX => 0,
            GamepadAxis::LeftThumbY => 1,
            GamepadAxis::RightThumbX => 2,
            GamepadAxis::RightThumbY => 3,
            _ => return,
        };
        self.thumbs[slot] = value;
        self.apply_thumbs();
    }

    fn gamepad_button_changed(
        &mut self,
        _window: &Window,
        gamepad: usize,
        button: GamepadButton,
        down: bool,
    ) {
        if gamepad == 0 && button == GamepadButton::Back && down {
            log::info!("Back pressed, leaving");
            self.quit_requested = true;
        }
    }
}
