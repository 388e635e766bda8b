use crate::core::Vec2;

/// Everything the input collaborator supplies for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub mouse_down: bool,
    /// Player cluster becomes a paint brush around the mouse
    pub brush_mode: bool,
    /// Brush held down (only meaningful in brush mode)
    pub painting: bool,
    /// 1 = paint, 2 = rainbow, 3 = explosive
    pub brush_effect: u8,
    /// Freezes the meteor spawner
    pub silent: bool,
}

impl FrameInput {
    pub fn mouse(&self) -> Vec2 {
        Vec2::new(self.mouse_x, self.mouse_y)
    }

    /// Mouse held at (x, y)
    pub fn dragging(x: f32, y: f32) -> Self {
        Self {
            mouse_x: x,
            mouse_y: y,
            mouse_down: true,
            brush_effect: 1,
            ..Self::default()
        }
    }

    /// Painting with `effect` at (x, y)
    pub fn painting(x: f32, y: f32, effect: u8) -> Self {
        Self {
            mouse_x: x,
            mouse_y: y,
            brush_mode: true,
            painting: true,
            brush_effect: effect,
            ..Self::default()
        }
    }
}
