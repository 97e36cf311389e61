use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates frame content so tests catch invalid geometry, and
/// records what the last frame contained.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_backing_size: Option<(u32, u32)>,
    pub last_primitive_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_backing_size = Some(frame.surface.backing_size());
        self.last_primitive_count = frame.primitive_count();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
