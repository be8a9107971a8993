use std::cell::RefCell;
use std::f64::consts::TAU;

use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use pendula::render::PendulaRenderer;
use pendula::Rgba;

#[derive(Debug, thiserror::Error)]
pub enum CanvasRendererError {
	#[error("Could not initialize canvas renderer: canvas has no 2d context")]
	NoContext,
	#[error("Could not initialize canvas renderer: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasRendererError {
	fn from(value: JsValue) -> Self {
		Self::Js(format!("{value:?}"))
	}
}

/// Last styles handed to the context, so unchanged ones aren't re-parsed by the browser.
#[derive(Default)]
struct StyleCache {
	fill: Option<String>,
	stroke: Option<String>,
	line_width: Option<f64>,
}

impl StyleCache {
	fn update_fill(&mut self, style: &str) -> bool {
		update(&mut self.fill, style)
	}

	fn update_stroke(&mut self, style: &str) -> bool {
		update(&mut self.stroke, style)
	}

	fn update_line_width(&mut self, width: f64) -> bool {
		if self.line_width == Some(width) {
			false
		} else {
			self.line_width = Some(width);
			true
		}
	}
}

fn update(slot: &mut Option<String>, style: &str) -> bool {
	if slot.as_deref() == Some(style) {
		false
	} else {
		*slot = Some(style.to_owned());
		true
	}
}

pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	cache: RefCell<StyleCache>,
	width: f64,
	height: f64,
}

impl CanvasRenderer {
	pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, CanvasRendererError> {
		let ctx = canvas
			.get_context("2d")?
			.ok_or(CanvasRendererError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| CanvasRendererError::NoContext)?;

		tracing::debug!("Canvas renderer on a {}x{} canvas", canvas.width(), canvas.height());
		Ok(Self {
			ctx,
			cache: RefCell::new(StyleCache::default()),
			width: canvas.width() as f64,
			height: canvas.height() as f64,
		})
	}

	fn set_fill(&self, color: Rgba) {
		let style = color.to_string();
		if self.cache.borrow_mut().update_fill(&style) {
			self.ctx.set_fill_style_str(&style);
		}
	}

	fn set_stroke(&self, width: f64, color: Rgba) {
		let mut cache = self.cache.borrow_mut();
		let style = color.to_string();
		if cache.update_stroke(&style) {
			self.ctx.set_stroke_style_str(&style);
		}
		if cache.update_line_width(width) {
			self.ctx.set_line_width(width);
		}
	}

	fn circle_path(&self, center: DVec2, radius: f64) {
		self.ctx.begin_path();
		// only fails on a negative radius
		if let Err(e) = self.ctx.arc(center.x, center.y, radius.max(0.), 0., TAU) {
			tracing::warn!("arc failed: {e:?}");
		}
	}
}

impl PendulaRenderer for CanvasRenderer {
	fn clear(&self) {
		self.ctx.clear_rect(0., 0., self.width, self.height);
	}

	fn stroke_segments(&self, segments: &[[DVec2; 2]], width: f64, color: Rgba) {
		self.set_stroke(width, color);
		self.ctx.begin_path();
		for [from, to] in segments {
			self.ctx.move_to(from.x, from.y);
			self.ctx.line_to(to.x, to.y);
		}
		self.ctx.stroke();
	}

	fn stroke_circle(&self, center: DVec2, radius: f64, width: f64, color: Rgba) {
		self.set_stroke(width, color);
		self.circle_path(center, radius);
		self.ctx.stroke();
	}

	fn fill_circle(&self, center: DVec2, radius: f64, color: Rgba) {
		self.set_fill(color);
		self.circle_path(center, radius);
		self.ctx.fill();
	}

	fn fill_polygon(&self, points: &[DVec2], color: Rgba) {
		let Some((first, rest)) = points.split_first() else {
			return;
		};

		self.set_fill(color);
		self.ctx.begin_path();
		self.ctx.move_to(first.x, first.y);
		for p in rest {
			self.ctx.line_to(p.x, p.y);
		}
		self.ctx.close_path();
		self.ctx.fill();
	}
}
