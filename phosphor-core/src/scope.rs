//! Producer facade
//!
//! [`Scope`] is what application code draws with. It owns the producer
//! half of the frame exchange plus every drawing setting (intensities,
//! coordinate policy, font and text cursor), and forwards refresh and
//! screen saver settings to the shared [`RefreshLink`].
//!
//! A frame is built between [`frame_start`](Scope::frame_start) and
//! [`frame_end`](Scope::frame_end); the refresh consumer keeps showing
//! the previous frame until `frame_end` publishes the new one.

use crate::buffer::FrameProducer;
use crate::config::ScopeConfig;
use crate::error::BufferError;
use crate::font::text::{format_float, format_int, GlyphPolicy, Justify, Spacing, Typesetter};
use crate::font::{FontKind, FontSource};
use crate::intensity::Intensity;
use crate::raster::{Angular, ArcMask, Canvas, CoordinatePolicy, Midpoint};
use crate::refresh::{RefreshLink, RefreshStats};
use crate::COORD_MAX;

/// Start-up text cell height in codes
pub const DEFAULT_TEXT_SIZE: u16 = 50;

/// Text placement for subsequent `print` calls
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrintSetup {
    pub x: i32,
    pub y: i32,
    pub size: Option<u16>,
    pub intensity: Option<u16>,
    pub justify: Option<Justify>,
}

impl PrintSetup {
    /// Cursor at `(x, y)` (top-left of the first cell)
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            size: None,
            intensity: None,
            justify: None,
        }
    }

    pub const fn size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    pub const fn intensity(mut self, percent: u16) -> Self {
        self.intensity = Some(percent);
        self
    }

    pub const fn justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }
}

/// What the last `frame_end` published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSummary {
    pub points: u32,
    pub overflowed: bool,
    pub skipped: u32,
}

pub struct Scope<'a, const N: usize> {
    producer: FrameProducer<'a, N>,
    link: &'a RefreshLink,
    limit: usize,
    policy: CoordinatePolicy,
    graphics: Intensity,
    text: Intensity,
    font: &'static dyn FontSource,
    spacing: Spacing,
    glyph_policy: GlyphPolicy,
    cursor_x: i32,
    cursor_y: i32,
    size: u16,
    justify: Justify,
    skipped: u32,
    last_frame: FrameSummary,
}

impl<'a, const N: usize> Scope<'a, N> {
    /// Create the facade and push the configured refresh settings to the link
    pub fn new(producer: FrameProducer<'a, N>, link: &'a RefreshLink, config: &ScopeConfig) -> Self {
        link.set_floor_us(config.refresh_floor_us);
        link.set_saver_timeout_ms(config.screen_saver_ms());

        let mut scope = Self {
            producer,
            link,
            limit: config.buffer_limit.min(N),
            policy: config.coordinate_policy,
            graphics: Intensity::new(config.graphics_intensity),
            text: Intensity::new(config.text_intensity),
            font: config.font.source(),
            spacing: config.spacing,
            glyph_policy: config.glyph_policy,
            cursor_x: 0,
            cursor_y: COORD_MAX as i32,
            size: DEFAULT_TEXT_SIZE,
            justify: Justify::Left,
            skipped: 0,
            last_frame: FrameSummary::default(),
        };
        let limit = scope.limit;
        scope.producer.buffer().set_limit(limit);
        scope
    }

    // --- Intensity ---

    pub fn graphics_intensity(&self) -> u16 {
        self.graphics.percent()
    }

    /// Set graphics intensity (clamped to 50-200%)
    pub fn set_graphics_intensity(&mut self, percent: u16) {
        self.graphics.set(percent);
    }

    /// Point spacing used by graphics primitives
    pub fn graphics_density(&self) -> u16 {
        self.graphics.density()
    }

    pub fn text_intensity(&self) -> u16 {
        self.text.percent()
    }

    /// Set text intensity (clamped to 50-200%)
    pub fn set_text_intensity(&mut self, percent: u16) {
        self.text.set(percent);
    }

    pub fn text_density(&self) -> u16 {
        self.text.density()
    }

    // --- Refresh and screen saver ---

    pub fn refresh_period_us(&self) -> u32 {
        self.link.period_us()
    }

    /// Pin the refresh period (never below the floor); disables auto tuning
    pub fn set_refresh_period_us(&mut self, period_us: u32) {
        self.link.pin_period_us(period_us);
    }

    /// Return to an auto-tuned refresh period
    pub fn auto_refresh(&mut self) {
        self.link.set_auto();
    }

    pub fn is_auto_refresh(&self) -> bool {
        self.link.is_auto()
    }

    pub fn refresh_floor_us(&self) -> u32 {
        self.link.floor_us()
    }

    pub fn set_refresh_floor_us(&mut self, floor_us: u32) {
        self.link.set_floor_us(floor_us);
    }

    /// Screen saver timeout in seconds; 0 means disabled
    pub fn screen_saver_s(&self) -> u32 {
        self.link.saver_timeout_ms() / 1000
    }

    pub fn set_screen_saver_s(&mut self, seconds: u32) {
        self.link.set_saver_timeout_ms(seconds.saturating_mul(1000));
        self.link.note_activity();
    }

    /// Ask the output backend for a new clock rate at its next cycle
    pub fn set_clock_rate(&mut self, hz: u32) {
        self.link.request_clock_rate(hz);
    }

    /// Consumer performance counters
    pub fn stats(&self) -> RefreshStats {
        self.link.stats()
    }

    // --- Frame lifecycle ---

    fn erase(&mut self) {
        let limit = self.limit;
        let buffer = self.producer.buffer();
        buffer.reset();
        buffer.set_limit(limit);
        self.skipped = 0;
        self.link.note_activity();
    }

    /// Erase the frame being built; output stays on
    pub fn frame_start(&mut self) {
        self.erase();
        self.link.set_filling(true);
        self.link.set_output_enabled(true);
    }

    /// Replace the displayed frame with an empty one and turn the output
    /// off after the current refresh
    ///
    /// The empty frame is published, so a later `frame_start` cannot
    /// bring the cleared picture back.
    pub fn frame_clear(&mut self) {
        self.erase();
        self.frame_end();
        self.link.set_output_enabled(false);
    }

    /// Publish the frame being built and start a fresh one
    pub fn frame_end(&mut self) {
        let buffer = self.producer.peek();
        self.last_frame = FrameSummary {
            points: buffer.len() as u32,
            overflowed: buffer.overflowed(),
            skipped: self.skipped,
        };
        self.link.arm(self.last_frame.points);
        self.producer.publish();
        self.erase();
    }

    /// Points in the most recently published frame
    pub fn armed_len(&self) -> u32 {
        self.link.armed_points()
    }

    /// Summary of the most recently published frame
    pub fn last_frame(&self) -> FrameSummary {
        self.last_frame
    }

    /// Points written to the frame being built
    pub fn point_count(&self) -> usize {
        self.producer.peek().len()
    }

    /// Whether the frame being built ran out of room
    pub fn overflowed(&self) -> bool {
        self.producer.peek().overflowed()
    }

    /// Off-screen points dropped from the frame being built
    pub fn skipped_points(&self) -> u32 {
        self.skipped
    }

    /// Usable capacity, at most the compiled buffer size
    pub fn buffer_limit(&self) -> usize {
        self.limit
    }

    /// Change the usable capacity; applies to the frame being built
    pub fn set_buffer_limit(&mut self, limit: usize) {
        self.limit = limit.min(N);
        let limit = self.limit;
        self.producer.buffer().set_limit(limit);
    }

    // --- Drawing ---

    pub fn coordinate_policy(&self) -> CoordinatePolicy {
        self.policy
    }

    pub fn set_coordinate_policy(&mut self, policy: CoordinatePolicy) {
        self.policy = policy;
    }

    fn draw<T>(
        &mut self,
        f: impl FnOnce(&mut Canvas<'_, N>) -> Result<T, BufferError>,
    ) -> Result<T, BufferError> {
        self.link.note_activity();
        let mut canvas = Canvas::new(self.producer.buffer(), self.policy);
        let result = f(&mut canvas);
        self.skipped = self.skipped.saturating_add(canvas.skipped());
        result
    }

    pub fn point(&mut self, x: i32, y: i32) -> Result<(), BufferError> {
        self.draw(|c| c.point(x, y))
    }

    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), BufferError> {
        let density = self.graphics.density();
        self.draw(|c| c.line(x0, y0, x1, y1, density))
    }

    pub fn rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), BufferError> {
        let density = self.graphics.density();
        self.draw(|c| c.rectangle(x0, y0, x1, y1, density))
    }

    /// Full circle, sampled by angle at the graphics density
    pub fn circle(&mut self, xc: i32, yc: i32, r: i32) -> Result<(), BufferError> {
        self.circle_arc(xc, yc, r, ArcMask::ALL)
    }

    pub fn circle_arc(&mut self, xc: i32, yc: i32, r: i32, arcs: ArcMask) -> Result<(), BufferError> {
        let density = self.graphics.density();
        self.draw(|c| c.circle(&Angular, xc, yc, r, arcs, density))
    }

    /// Full circle from the integer midpoint generator
    pub fn circle_midpoint(&mut self, xc: i32, yc: i32, r: i32) -> Result<(), BufferError> {
        self.circle_midpoint_arc(xc, yc, r, ArcMask::ALL)
    }

    pub fn circle_midpoint_arc(&mut self, xc: i32, yc: i32, r: i32, arcs: ArcMask) -> Result<(), BufferError> {
        self.draw(|c| c.circle(&Midpoint, xc, yc, r, arcs, 1))
    }

    /// Full axis-aligned ellipse, sampled by angle
    pub fn ellipse(&mut self, xc: i32, yc: i32, rx: i32, ry: i32) -> Result<(), BufferError> {
        self.ellipse_arc(xc, yc, rx, ry, ArcMask::ALL)
    }

    pub fn ellipse_arc(&mut self, xc: i32, yc: i32, rx: i32, ry: i32, arcs: ArcMask) -> Result<(), BufferError> {
        let density = self.graphics.density();
        self.draw(|c| c.ellipse(&Angular, xc, yc, rx, ry, arcs, density))
    }

    /// Full axis-aligned ellipse from the integer midpoint generator
    pub fn ellipse_midpoint(&mut self, xc: i32, yc: i32, rx: i32, ry: i32) -> Result<(), BufferError> {
        self.ellipse_midpoint_arc(xc, yc, rx, ry, ArcMask::ALL)
    }

    pub fn ellipse_midpoint_arc(
        &mut self,
        xc: i32,
        yc: i32,
        rx: i32,
        ry: i32,
        arcs: ArcMask,
    ) -> Result<(), BufferError> {
        self.draw(|c| c.ellipse(&Midpoint, xc, yc, rx, ry, arcs, 1))
    }

    // --- Text ---

    /// Switch to one of the built-in fonts
    pub fn set_font(&mut self, kind: FontKind) {
        self.font = kind.source();
    }

    /// Switch to any font source
    pub fn set_font_source(&mut self, font: &'static dyn FontSource) {
        self.font = font;
    }

    pub fn font_name(&self) -> &'static str {
        self.font.name()
    }

    pub fn font_spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn set_font_spacing(&mut self, spacing: Spacing) {
        self.spacing = spacing;
    }

    pub fn set_glyph_policy(&mut self, policy: GlyphPolicy) {
        self.glyph_policy = policy;
    }

    /// Move the cursor and optionally change size, text intensity and
    /// justification
    pub fn print_setup(&mut self, setup: PrintSetup) {
        self.cursor_x = setup.x;
        self.cursor_y = setup.y;
        if let Some(size) = setup.size {
            self.size = size;
        }
        if let Some(percent) = setup.intensity {
            self.text.set(percent);
        }
        if let Some(justify) = setup.justify {
            self.justify = justify;
        }
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn text_size(&self) -> u16 {
        self.size
    }

    pub fn justify(&self) -> Justify {
        self.justify
    }

    fn typesetter(&self) -> Typesetter<'static> {
        Typesetter {
            font: self.font,
            spacing: self.spacing,
            policy: self.glyph_policy,
            size: self.size,
        }
    }

    /// Lay out `text` at the cursor and leave the cursor after it
    fn render(&mut self, text: &str, underline: bool) -> Result<(), BufferError> {
        let ts = self.typesetter();
        let start = ts.start_x(text, self.cursor_x, self.justify);
        let top = self.cursor_y;
        let density = self.text.density();
        self.cursor_x = start.saturating_add(ts.measure(text));
        self.draw(|c| ts.draw_str(c, text, start, top, density, underline).map(|_| ()))
    }

    pub fn print(&mut self, text: &str) -> Result<(), BufferError> {
        self.render(text, false)
    }

    pub fn print_underlined(&mut self, text: &str) -> Result<(), BufferError> {
        self.render(text, true)
    }

    pub fn print_char(&mut self, c: char) -> Result<(), BufferError> {
        let mut utf8 = [0u8; 4];
        self.render(c.encode_utf8(&mut utf8), false)
    }

    pub fn print_char_underlined(&mut self, c: char) -> Result<(), BufferError> {
        let mut utf8 = [0u8; 4];
        self.render(c.encode_utf8(&mut utf8), true)
    }

    pub fn print_int(&mut self, value: i32) -> Result<(), BufferError> {
        self.render(&format_int(value), false)
    }

    pub fn print_int_underlined(&mut self, value: i32) -> Result<(), BufferError> {
        self.render(&format_int(value), true)
    }

    /// Print `value` rounded to `places` decimals
    pub fn print_float(&mut self, value: f32, places: u8) -> Result<(), BufferError> {
        self.render(&format_float(value, places), false)
    }

    pub fn print_float_underlined(&mut self, value: f32, places: u8) -> Result<(), BufferError> {
        self.render(&format_float(value, places), true)
    }

    /// Underline `cells` blank cells (a fill-in field)
    pub fn print_underline(&mut self, cells: u16) -> Result<(), BufferError> {
        let ts = self.typesetter();
        let width = ts.cell_advance();
        let span = width.saturating_mul(cells as i32);
        let start = match self.justify {
            Justify::Left => self.cursor_x,
            Justify::Right => self.cursor_x.saturating_sub(span),
            Justify::Center => self.cursor_x.saturating_sub(span / 2),
        };
        let top = self.cursor_y;
        let density = self.text.density();
        self.cursor_x = start.saturating_add(span);
        self.draw(|c| {
            (0..cells as i32).try_for_each(|i| {
                ts.draw_underline(c, start.saturating_add(i.saturating_mul(width)), top, width, density)
            })
        })
    }
}
