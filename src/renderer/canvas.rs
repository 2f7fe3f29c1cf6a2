//! Canvas 2D renderer (browser only)

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::shapes::{AGENT_FALLBACK_COLOR, DrawCommand, build_frame};
use super::{FrameView, Renderer};

/// Replays draw commands on a `CanvasRenderingContext2d`
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    sprite: HtmlImageElement,
}

impl CanvasRenderer {
    /// Bind to a canvas and start loading the agent sprite
    pub fn new(canvas: &HtmlCanvasElement, sprite_src: &str) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let sprite = HtmlImageElement::new()?;
        sprite.set_src(sprite_src);
        Ok(Self { ctx, sprite })
    }

    fn execute(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, f64::from(*width), f64::from(*height));
            }
            DrawCommand::Rect { x, y, w, h, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(f64::from(*x), f64::from(*y), f64::from(*w), f64::from(*h));
            }
            DrawCommand::Agent { x, y, w, h } => {
                let (x, y, w, h) = (f64::from(*x), f64::from(*y), f64::from(*w), f64::from(*h));
                if self.sprite.complete() && self.sprite.natural_width() > 0 {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(&self.sprite, x, y, w, h)?;
                } else {
                    ctx.set_fill_style_str(AGENT_FALLBACK_COLOR);
                    ctx.fill_rect(x, y, w, h);
                }
            }
            DrawCommand::Text {
                text,
                x,
                y,
                font,
                color,
            } => {
                ctx.set_font(font);
                ctx.set_fill_style_str(color);
                ctx.fill_text(text, f64::from(*x), f64::from(*y))?;
            }
        }
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, view: &FrameView<'_>) {
        for command in build_frame(view) {
            if let Err(e) = self.execute(&command) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }
}
