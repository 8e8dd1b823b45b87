//! Iterative font-size fitting of a title block, an optional subtitle and a provider line into a
//! box.
//!
//! Sizes are ratios of canvas height. Each pass measures every block; an overflow in width or
//! height shrinks the ratios by `(available / measured) * damping`, then clamps them to their
//! floors. A ratio that starts below its floor is never grown. The loop is capped, so the result
//! is best effort when floors are reached.

use image::{Rgba, RgbaImage};
use smallvec::SmallVec;

use crate::foundation::core::{CanvasSize, PixelOffset};
use crate::foundation::error::CardResult;
use crate::scene::assets::FontData;
use crate::scene::style::{FitStyle, TextAnchorStyle, TextBoxStyle};
use crate::text::engine::{TextEngine, TextExtent};

/// What occupies the title slot.
#[derive(Clone, Copy, Debug)]
pub enum TitleContent<'a> {
    /// No title.
    None,
    /// Text lines set top to bottom, each centered.
    Lines {
        /// Non-empty lines in order.
        lines: &'a [&'a str],
        /// Title font.
        font: &'a FontData,
    },
    /// A pre-scaled title image; only its size takes part in fitting.
    Image {
        /// Scaled width in pixels.
        width: u32,
        /// Scaled height in pixels.
        height: u32,
    },
}

/// One line of text in its font: the subtitle or the provider label.
#[derive(Clone, Copy, Debug)]
pub struct TextLine<'a> {
    /// Line content.
    pub text: &'a str,
    /// Font the line is set in.
    pub font: &'a FontData,
}

/// Target rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl TextBox {
    /// Box described by `style`, horizontally centered and moved down by `offset_ratio * H`.
    pub fn from_style(canvas: CanvasSize, style: &TextBoxStyle, offset_ratio: f64) -> Self {
        let top = canvas.frac_h(style.top_ratio);
        let bottom = canvas.frac_h(style.bottom_ratio);
        let width = canvas.frac_w(style.width_ratio);
        let shift = canvas.frac_h(offset_ratio);
        Self {
            x: ((i64::from(canvas.width) - width) / 2) as f64,
            y: (top + shift) as f64,
            width: width as f64,
            height: (bottom - top) as f64,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Everything the fitter needs for one card.
#[derive(Clone, Debug)]
pub struct FitRequest<'a> {
    /// Title slot.
    pub title: TitleContent<'a>,
    /// Optional subtitle, stacked below the title.
    pub subtitle: Option<TextLine<'a>>,
    /// Optional provider line, stacked last.
    pub provider: Option<TextLine<'a>>,
    /// Target box.
    pub bounds: TextBox,
    /// Canvas the ratios refer to.
    pub canvas: CanvasSize,
    /// Starting title ratio.
    pub title_ratio: f64,
    /// Starting subtitle ratio.
    pub subtitle_ratio: f64,
    /// Starting provider ratio.
    pub provider_ratio: f64,
    /// Gap between stacked blocks in pixels.
    pub min_gap: f64,
    /// Gap between title lines in pixels.
    pub line_gap: f64,
    /// Group placement.
    pub anchor: TextAnchorStyle,
}

impl<'a> FitRequest<'a> {
    /// Request with box, ratios and gaps taken from `style`; ratios are multiplied by
    /// `text_scale`. No subtitle is set; see [`FitRequest::with_subtitle`].
    pub fn from_style(
        title: TitleContent<'a>,
        provider: Option<TextLine<'a>>,
        canvas: CanvasSize,
        style: &TextBoxStyle,
        text_scale: f64,
        offset_ratio: f64,
    ) -> Self {
        Self {
            title,
            subtitle: None,
            provider,
            bounds: TextBox::from_style(canvas, style, offset_ratio),
            canvas,
            title_ratio: style.title_ratio * text_scale,
            subtitle_ratio: style.subtitle_ratio * text_scale,
            provider_ratio: style.provider_ratio * text_scale,
            min_gap: canvas.frac_h(style.min_gap_ratio) as f64,
            line_gap: canvas.frac_h(style.line_gap_ratio) as f64,
            anchor: style.anchor,
        }
    }

    /// Stack `subtitle` between the title and the provider line.
    pub fn with_subtitle(mut self, subtitle: Option<TextLine<'a>>) -> Self {
        self.subtitle = subtitle;
        self
    }

    fn bottom_padding(&self) -> f64 {
        match self.anchor {
            TextAnchorStyle::Centered => 0.0,
            TextAnchorStyle::Bottom { padding_ratio } => self.canvas.frac_h(padding_ratio) as f64,
        }
    }

    /// Height available to the stacked group.
    pub fn available_height(&self) -> f64 {
        (self.bounds.height - self.bottom_padding()).max(0.0)
    }
}

/// Measured block: per-line extents at one pixel size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockMetrics {
    /// Pixel size the block was measured at (0 for images).
    pub size_px: f32,
    /// Extent of each line in order.
    pub lines: SmallVec<[TextExtent; 4]>,
    /// Widest line.
    pub width: f64,
    /// Stacked height including line gaps.
    pub height: f64,
}

/// Result of a fit: final ratios, measurements and where each block goes.
#[derive(Clone, Debug, PartialEq)]
pub struct FitOutcome {
    /// Final title ratio.
    pub title_ratio: f64,
    /// Final subtitle ratio.
    pub subtitle_ratio: f64,
    /// Final provider ratio.
    pub provider_ratio: f64,
    /// Measure passes performed inside the loop.
    pub iterations: u32,
    /// Whether the final measurement fits the box.
    pub fits: bool,
    /// Whether a floor stopped further shrinking.
    pub floor_hit: bool,
    /// Title metrics (empty when there is no title).
    pub title: BlockMetrics,
    /// Subtitle metrics.
    pub subtitle: Option<BlockMetrics>,
    /// Provider metrics.
    pub provider: Option<BlockMetrics>,
    /// Top edge of the title block.
    pub title_top: i64,
    /// Top edge of the subtitle line.
    pub subtitle_top: i64,
    /// Top edge of the provider line.
    pub provider_top: i64,
}

/// Pixel font size for `ratio` of the canvas height, truncated, at least 1.
pub fn size_for_ratio(canvas: CanvasSize, ratio: f64) -> f32 {
    (canvas.frac_h(ratio).max(1)) as f32
}

/// Shrinks text to fit a box and paints it.
pub struct TextFitter<'a> {
    engine: &'a mut dyn TextEngine,
    style: &'a FitStyle,
}

impl<'a> TextFitter<'a> {
    /// Fitter measuring with `engine` under the loop limits of `style`.
    pub fn new(engine: &'a mut dyn TextEngine, style: &'a FitStyle) -> Self {
        Self { engine, style }
    }

    /// Run the fit loop and anchor the result.
    pub fn fit(&mut self, req: &FitRequest<'_>) -> CardResult<FitOutcome> {
        let title_scales = matches!(req.title, TitleContent::Lines { .. });
        let available_w = req.bounds.width;
        let available_h = req.available_height();
        let damping = self.style.damping;
        let floors = Ratios {
            title: self.style.title_floor.min(req.title_ratio),
            subtitle: self.style.subtitle_floor.min(req.subtitle_ratio),
            provider: self.style.provider_floor.min(req.provider_ratio),
        };

        let mut ratios = Ratios {
            title: req.title_ratio,
            subtitle: req.subtitle_ratio,
            provider: req.provider_ratio,
        };
        let mut iterations = 0;
        let mut fitted = None;

        for _ in 0..self.style.max_iterations {
            iterations += 1;
            let m = self.measure(req, ratios)?;
            let width = m.width(req);
            let height = m.height(req);
            let fits_w = width <= available_w;
            let fits_h = height <= available_h;
            if fits_w && fits_h {
                fitted = Some(m);
                break;
            }

            if !fits_w && width > 0.0 {
                let s = available_w / width * damping;
                if title_scales {
                    ratios.title *= s;
                }
                ratios.subtitle *= s;
                ratios.provider *= s;
            }
            if !fits_h && height > 0.0 {
                if title_scales {
                    let s = available_h / height * damping;
                    ratios.title *= s;
                    ratios.subtitle *= s;
                    ratios.provider *= s;
                } else {
                    // Fixed title height: only the lines below it can give way.
                    let flexible = m.subtitle.as_ref().map_or(0.0, |b| b.height)
                        + m.provider.as_ref().map_or(0.0, |b| b.height);
                    if flexible > 0.0 {
                        let room = available_h - (height - flexible);
                        let s = (room / flexible).max(0.0) * damping;
                        ratios.subtitle *= s;
                        ratios.provider *= s;
                    }
                }
            }
            if title_scales {
                ratios.title = ratios.title.max(floors.title);
            }
            ratios.subtitle = ratios.subtitle.max(floors.subtitle);
            ratios.provider = ratios.provider.max(floors.provider);
        }

        let m = match fitted {
            Some(m) => m,
            None => self.measure(req, ratios)?,
        };
        let fits = m.width(req) <= available_w && m.height(req) <= available_h;
        let at_floor = (title_scales && ratios.title <= floors.title)
            || (req.subtitle.is_some() && ratios.subtitle <= floors.subtitle)
            || (req.provider.is_some() && ratios.provider <= floors.provider);

        let tops = m.anchor(req);
        Ok(FitOutcome {
            title_ratio: ratios.title,
            subtitle_ratio: ratios.subtitle,
            provider_ratio: ratios.provider,
            iterations,
            fits,
            floor_hit: !fits && at_floor,
            title: m.title,
            subtitle: m.subtitle,
            provider: m.provider,
            title_top: tops.title,
            subtitle_top: tops.subtitle,
            provider_top: tops.provider,
        })
    }

    /// Paint the title lines, subtitle and provider line of `outcome`, each centered in the box.
    ///
    /// The subtitle takes the title paint. A title image is not painted here; the caller
    /// composites it at `outcome.title_top`.
    pub fn draw(
        &mut self,
        canvas: &mut RgbaImage,
        req: &FitRequest<'_>,
        outcome: &FitOutcome,
        paint: &TextBoxStyle,
    ) -> CardResult<()> {
        let title_color = paint.title_color.with_alpha(paint.title_alpha);
        if let TitleContent::Lines { lines, font } = req.title {
            let mut y = outcome.title_top;
            for (text, extent) in lines.iter().zip(&outcome.title.lines) {
                let x = centered_x(req, extent.width);
                let size = outcome.title.size_px;
                self.draw_line(canvas, text, font, size, (x, y), title_color, paint)?;
                y += extent.height as i64 + req.line_gap as i64;
            }
        }
        if let (Some(line), Some(m)) = (&req.subtitle, &outcome.subtitle) {
            let origin = (centered_x(req, m.width as f32), outcome.subtitle_top);
            self.draw_line(canvas, line.text, line.font, m.size_px, origin, title_color, paint)?;
        }
        if let (Some(line), Some(m)) = (&req.provider, &outcome.provider) {
            let color = paint.provider_color.with_alpha(paint.provider_alpha);
            let origin = (centered_x(req, m.width as f32), outcome.provider_top);
            self.draw_line(canvas, line.text, line.font, m.size_px, origin, color, paint)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        font: &FontData,
        size_px: f32,
        (x, y): (i64, i64),
        color: Rgba<u8>,
        paint: &TextBoxStyle,
    ) -> CardResult<()> {
        let origin = PixelOffset::new(x, y);
        if let Some(shadow) = paint.shadow {
            let shadow_color = Rgba([0, 0, 0, shadow.alpha]);
            let at = origin.shifted(shadow.dx, shadow.dy);
            self.engine.draw(canvas, text, font, size_px, at, shadow_color)?;
        }
        self.engine.draw(canvas, text, font, size_px, origin, color)
    }

    fn measure(&mut self, req: &FitRequest<'_>, ratios: Ratios) -> CardResult<Measured> {
        let title = match req.title {
            TitleContent::None => BlockMetrics::default(),
            TitleContent::Image { width, height } => BlockMetrics {
                size_px: 0.0,
                lines: SmallVec::new(),
                width: f64::from(width),
                height: f64::from(height),
            },
            TitleContent::Lines { lines, font } => {
                let size = size_for_ratio(req.canvas, ratios.title);
                self.measure_block(lines, font, size, req.line_gap)?
            }
        };
        let subtitle = self.measure_line(req, req.subtitle.as_ref(), ratios.subtitle)?;
        let provider = self.measure_line(req, req.provider.as_ref(), ratios.provider)?;
        Ok(Measured {
            title,
            subtitle,
            provider,
        })
    }

    fn measure_line(
        &mut self,
        req: &FitRequest<'_>,
        line: Option<&TextLine<'_>>,
        ratio: f64,
    ) -> CardResult<Option<BlockMetrics>> {
        match line {
            Some(l) => {
                let size = size_for_ratio(req.canvas, ratio);
                Ok(Some(self.measure_block(&[l.text], l.font, size, req.line_gap)?))
            }
            None => Ok(None),
        }
    }

    fn measure_block(
        &mut self,
        lines: &[&str],
        font: &FontData,
        size_px: f32,
        line_gap: f64,
    ) -> CardResult<BlockMetrics> {
        let mut block = BlockMetrics {
            size_px,
            ..BlockMetrics::default()
        };
        for line in lines {
            let extent = self.engine.measure(line, font, size_px)?;
            block.width = block.width.max(f64::from(extent.width));
            block.height += f64::from(extent.height);
            block.lines.push(extent);
        }
        if block.lines.len() > 1 {
            block.height += line_gap * (block.lines.len() - 1) as f64;
        }
        Ok(block)
    }
}

#[derive(Clone, Copy, Debug)]
struct Ratios {
    title: f64,
    subtitle: f64,
    provider: f64,
}

struct Tops {
    title: i64,
    subtitle: i64,
    provider: i64,
}

/// One measure pass over every block.
struct Measured {
    title: BlockMetrics,
    subtitle: Option<BlockMetrics>,
    provider: Option<BlockMetrics>,
}

impl Measured {
    fn width(&self, req: &FitRequest<'_>) -> f64 {
        let title_w = match req.title {
            TitleContent::Lines { .. } => self.title.width,
            _ => 0.0,
        };
        [&self.subtitle, &self.provider]
            .into_iter()
            .flatten()
            .fold(title_w, |w, b| w.max(b.width))
    }

    /// Title and subtitle stacked with a gap between them.
    fn upper_height(&self, req: &FitRequest<'_>) -> f64 {
        match &self.subtitle {
            Some(s) if self.title.height > 0.0 => self.title.height + req.min_gap + s.height,
            Some(s) => s.height,
            None => self.title.height,
        }
    }

    fn height(&self, req: &FitRequest<'_>) -> f64 {
        let upper = self.upper_height(req);
        match &self.provider {
            Some(p) if upper > 0.0 => upper + req.min_gap + p.height,
            Some(p) => p.height,
            None => upper,
        }
    }

    fn anchor(&self, req: &FitRequest<'_>) -> Tops {
        let upper = self.upper_height(req);
        let provider_h = self.provider.as_ref().map_or(0.0, |p| p.height);
        let below_gap = if upper > 0.0 && self.provider.is_some() {
            req.min_gap
        } else {
            0.0
        };
        let (title_top, provider_top) = match req.anchor {
            TextAnchorStyle::Centered => {
                let title_top =
                    req.bounds.y + ((req.bounds.height - self.height(req)) / 2.0).floor();
                (title_top, title_top + upper + below_gap)
            }
            TextAnchorStyle::Bottom { .. } => {
                let provider_top = req.bounds.bottom() - req.bottom_padding() - provider_h;
                let space = provider_top - below_gap - req.bounds.y;
                let title_top = req.bounds.y + ((space - upper) / 2.0).floor();
                (title_top, provider_top)
            }
        };
        let subtitle_top = if self.title.height > 0.0 {
            title_top + self.title.height + req.min_gap
        } else {
            title_top
        };
        Tops {
            title: title_top as i64,
            subtitle: subtitle_top as i64,
            provider: provider_top as i64,
        }
    }
}

fn centered_x(req: &FitRequest<'_>, width: f32) -> i64 {
    (req.bounds.x + ((req.bounds.width - f64::from(width)) / 2.0).round()) as i64
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
