/// Keyboard and mouse handling for the terminal panel
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use shapes_core::{AppContext, ControlValue, ShapeKind, StopSignal};

/// Radians per orbit key press
const ORBIT_STEP: f32 = 0.1;
/// Radians per dragged terminal cell
const DRAG_STEP: f32 = 0.05;
const ZOOM_STEP: f32 = 1.1;

/// Panel selection, prompt line and drag state
#[derive(Debug, Default)]
pub struct InputState {
    selected: usize,
    prompt: Option<String>,
    status: String,
    drag_from: Option<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Jump to the first control of a shape's folder
    pub fn select_shape(&mut self, ctx: &AppContext, kind: ShapeKind) {
        if let Some(index) = ctx.panel.controls().iter().position(|c| c.shape == kind) {
            self.selected = index;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext, stop: &StopSignal) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            stop.stop();
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key, ctx);
            return;
        }

        let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
            10
        } else {
            1
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => stop.stop(),
            KeyCode::Char('w') => ctx.controls.rotate(0.0, ORBIT_STEP),
            KeyCode::Char('s') => ctx.controls.rotate(0.0, -ORBIT_STEP),
            KeyCode::Char('a') => ctx.controls.rotate(-ORBIT_STEP, 0.0),
            KeyCode::Char('d') => ctx.controls.rotate(ORBIT_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => ctx.controls.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => ctx.controls.zoom(ZOOM_STEP),
            KeyCode::Char('p') => ctx.camera.mode = ctx.camera.mode.toggled(),
            KeyCode::Char(':') => self.prompt = Some(String::new()),
            KeyCode::Up => self.move_selection(ctx, -1),
            KeyCode::Down => self.move_selection(ctx, 1),
            KeyCode::Tab => self.next_folder(ctx),
            KeyCode::Left => self.adjust(ctx, -steps),
            KeyCode::Right => self.adjust(ctx, steps),
            KeyCode::Char(' ') | KeyCode::Enter => self.adjust(ctx, 0),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, ctx: &mut AppContext) {
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let line = self.prompt.take().unwrap_or_default();
                self.status = match ctx.run_command(&line) {
                    Ok(message) => message,
                    Err(err) => err.to_string(),
                };
            }
            KeyCode::Backspace => {
                if let Some(line) = self.prompt.as_mut() {
                    line.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(line) = self.prompt.as_mut() {
                    line.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, ctx: &mut AppContext) {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_from = Some(position),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.drag_from.replace(position) {
                    let dx = position.0 as f32 - x as f32;
                    let dy = position.1 as f32 - y as f32;
                    ctx.controls.rotate(dx * DRAG_STEP, dy * DRAG_STEP);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            MouseEventKind::ScrollUp => ctx.controls.zoom(1.0 / ZOOM_STEP),
            MouseEventKind::ScrollDown => ctx.controls.zoom(ZOOM_STEP),
            _ => {}
        }
    }

    fn move_selection(&mut self, ctx: &AppContext, delta: isize) {
        let count = ctx.panel.controls().len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(count) as usize;
    }

    fn next_folder(&mut self, ctx: &AppContext) {
        let controls = ctx.panel.controls();
        let current = controls[self.selected].shape;
        let next = ShapeKind::ALL
            .into_iter()
            .cycle()
            .skip_while(|kind| *kind != current)
            .nth(1)
            .unwrap_or(current);
        self.select_shape(ctx, next);
    }

    /// Nudge a numeric control by `steps`, or flip a toggle
    fn adjust(&mut self, ctx: &mut AppContext, steps: i32) {
        let control = &ctx.panel.controls()[self.selected];
        let path = control.path.clone();
        let is_toggle = control.range.is_none();

        let result = if is_toggle {
            ctx.toggle(&path).map(|state| format!("{path} = {state}"))
        } else if steps == 0 {
            return;
        } else {
            ctx.nudge(&path, steps).map(|value| format!("{path} = {value:.2}"))
        };
        self.status = match result {
            Ok(message) => message,
            Err(err) => err.to_string(),
        };
    }

    /// Panel lines for the folder of the selected control
    pub fn panel_lines(&self, ctx: &AppContext) -> Vec<String> {
        let controls = ctx.panel.controls();
        let current = controls[self.selected].shape;
        controls
            .iter()
            .enumerate()
            .filter(|(_, control)| control.shape == current)
            .map(|(index, control)| {
                let marker = if index == self.selected { '>' } else { ' ' };
                let value = match ctx.panel.value(&ctx.scene, control) {
                    ControlValue::Number(value) => format!("{value:>8.2}"),
                    ControlValue::Toggle(state) => format!("{state:>8}"),
                };
                format!(
                    "{marker} {:<22} {:<15} {value}",
                    control.folder, control.label
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapes_core::ProjectionMode;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn selected_path(input: &InputState, ctx: &AppContext) -> String {
        ctx.panel.controls()[input.selected()].path.clone()
    }

    #[test]
    fn test_quit_keys_raise_the_stop_signal() {
        let mut ctx = AppContext::new(80, 48);
        for key in [
            press(KeyCode::Char('q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let stop = StopSignal::new();
            InputState::new().handle_key(key, &mut ctx, &stop);
            assert!(stop.is_stopped());
        }
    }

    #[test]
    fn test_arrow_keys_select_and_nudge() {
        let mut ctx = AppContext::new(80, 48);
        let stop = StopSignal::new();
        let mut input = InputState::new();

        let width = ctx.panel.find("cube.width").unwrap().path.clone();
        while selected_path(&input, &ctx) != width {
            input.handle_key(press(KeyCode::Down), &mut ctx, &stop);
        }
        input.handle_key(press(KeyCode::Right), &mut ctx, &stop);
        input.handle_key(press(KeyCode::Right), &mut ctx, &stop);

        assert_eq!(ctx.scene.shape(ShapeKind::Cube).params().get("width"), Some(2.0));
        assert_eq!(input.status(), "cube.width = 2.00");
        assert!(!stop.is_stopped());
    }

    #[test]
    fn test_up_wraps_around() {
        let mut ctx = AppContext::new(80, 48);
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Up), &mut ctx, &StopSignal::new());
        assert_eq!(input.selected(), ctx.panel.controls().len() - 1);
    }

    #[test]
    fn test_tab_cycles_folders() {
        let mut ctx = AppContext::new(80, 48);
        let stop = StopSignal::new();
        let mut input = InputState::new();
        let shape = |input: &InputState, ctx: &AppContext| ctx.panel.controls()[input.selected()].shape;

        input.handle_key(press(KeyCode::Tab), &mut ctx, &stop);
        assert_eq!(shape(&input, &ctx), ShapeKind::Sphere);
        input.handle_key(press(KeyCode::Tab), &mut ctx, &stop);
        assert_eq!(shape(&input, &ctx), ShapeKind::Icosahedron);
        input.handle_key(press(KeyCode::Tab), &mut ctx, &stop);
        assert_eq!(shape(&input, &ctx), ShapeKind::Cube);
    }

    #[test]
    fn test_space_toggles_visibility() {
        let mut ctx = AppContext::new(80, 48);
        let stop = StopSignal::new();
        let mut input = InputState::new();
        while selected_path(&input, &ctx) != "cube.visible" {
            input.handle_key(press(KeyCode::Down), &mut ctx, &stop);
        }
        input.handle_key(press(KeyCode::Char(' ')), &mut ctx, &stop);
        assert!(!ctx.scene.shape(ShapeKind::Cube).visible);
    }

    #[test]
    fn test_p_switches_projection_mode() {
        let mut ctx = AppContext::new(80, 48);
        let stop = StopSignal::new();
        let mut input = InputState::new();

        input.handle_key(press(KeyCode::Char('p')), &mut ctx, &stop);
        assert_eq!(ctx.camera.mode, ProjectionMode::Orthographic);
        input.handle_key(press(KeyCode::Char('p')), &mut ctx, &stop);
        assert_eq!(ctx.camera.mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_prompt_runs_commands() {
        let mut ctx = AppContext::new(80, 48);
        let stop = StopSignal::new();
        let mut input = InputState::new();

        input.handle_key(press(KeyCode::Char(':')), &mut ctx, &stop);
        for c in "set sphere.radiux 3".chars() {
            input.handle_key(press(KeyCode::Char(c)), &mut ctx, &stop);
        }
        // Fix the typo
        for _ in 0.."x 3".len() {
            input.handle_key(press(KeyCode::Backspace), &mut ctx, &stop);
        }
        for c in "s 3".chars() {
            input.handle_key(press(KeyCode::Char(c)), &mut ctx, &stop);
        }
        assert_eq!(input.prompt(), Some("set sphere.radius 3"));
        input.handle_key(press(KeyCode::Enter), &mut ctx, &stop);

        assert_eq!(input.prompt(), None);
        assert_eq!(input.status(), "sphere.radius = 3");
        assert_eq!(ctx.scene.shape(ShapeKind::Sphere).params().get("radius"), Some(3.0));

        // Keys typed into the prompt are text, not shortcuts
        input.handle_key(press(KeyCode::Char(':')), &mut ctx, &stop);
        input.handle_key(press(KeyCode::Char('q')), &mut ctx, &stop);
        assert!(!stop.is_stopped());
        input.handle_key(press(KeyCode::Enter), &mut ctx, &stop);
        assert!(input.status().starts_with("could not parse `q`"));
    }

    #[test]
    fn test_mouse_drag_queues_orbit() {
        let mut ctx = AppContext::new(80, 48);
        let mut input = InputState::new();
        let mouse = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        input.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10), &mut ctx);
        input.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 10), &mut ctx);
        assert!(ctx.controls.has_pending_input());
        input.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 14, 10), &mut ctx);

        let before = ctx.camera.position;
        ctx.controls.update(&mut ctx.camera);
        assert_ne!(ctx.camera.position, before);
    }

    #[test]
    fn test_panel_lines_show_the_selected_folder() {
        let ctx = AppContext::new(80, 48);
        let input = InputState::new();
        let lines = input.panel_lines(&ctx);
        assert_eq!(lines.len(), 16);
        assert!(lines[0].starts_with("> Cube/Rotation"));
    }
}
