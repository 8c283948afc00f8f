// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the camera preview, scaled to fill the client area.
// 2) A status strip along the bottom with the four status fields.
// 3) A tiny 5x7 bitmap font for the status strip and the about box.

use crate::app::{Action, Screen};
use crate::error::Error;
use crate::geometry::{FrameDimensions, PixelDimensions};
use crate::types::FrameBuffer;
use image::RgbImage;
use image::imageops::{self, FilterType};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

/// Height of the status strip under the preview.
pub const STATUS_HEIGHT: usize = 12;
/// Largest initial preview height before halving.
const MAX_INITIAL_HEIGHT: u32 = 720;

const STATUS_BG: u32 = 0x00_20_20_20;
const STATUS_FG: u32 = 0x00_E0_E0_E0;
const ABOUT_BG: u32 = 0x00_30_30_48;

const ABOUT_TEXT: [&str; 6] = [
    "ABOUT SX FOCUS",
    "",
    "STARLIGHT XPRESS FOCUSSING APP",
    "COPYRIGHT (C) 2020, DAVID SCHMENK",
    "",
    "R: RED FILTER  =: ZOOM  -: BIN  F1: ABOUT  ESC: EXIT",
];

/// Poll rate of the main loop. A due tick runs on the next poll, so the
/// frame period is the tick interval plus up to one poll period.
pub const POLL_FPS: usize = 60;

/// Client size for a new window: one preview pixel per sensor pixel, height
/// corrected for non-square pixels, halved until it fits on a screen.
pub fn initial_client_size(frame: FrameDimensions, pixels: PixelDimensions) -> (usize, usize) {
    let mut width = frame.width;
    let mut height = (frame.height as u64 * pixels.height as u64 / pixels.width.max(1) as u64) as u32;
    while height > MAX_INITIAL_HEIGHT {
        width >>= 1;
        height >>= 1;
    }
    (width as usize, height as usize + STATUS_HEIGHT)
}

pub struct Drawer {
    window: Window,            // the on-screen window you see
    preview: FrameBuffer,      // last painted preview, whole client area
    composed: FrameBuffer,     // preview + status strip + overlays, what gets pushed
}

impl Drawer {
    /// Create a resizable window with the given client size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(POLL_FPS);
        Ok(Self {
            window,
            preview: FrameBuffer::new(width, height),
            composed: FrameBuffer::new(width, height),
        })
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Keys pressed since the last update, as user actions.
    pub fn actions(&self) -> Vec<Action> {
        const BINDINGS: [(Key, Action); 7] = [
            (Key::R, Action::ToggleFilter),
            (Key::Equal, Action::ZoomIn),
            (Key::NumPadPlus, Action::ZoomIn),
            (Key::Minus, Action::ZoomOut),
            (Key::NumPadMinus, Action::ZoomOut),
            (Key::F1, Action::About),
            (Key::Escape, Action::Exit),
        ];
        BINDINGS
            .iter()
            .filter(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
            .map(|(_, action)| *action)
            .collect()
    }

    /// Compose preview, status strip and overlay, then push to the screen.
    /// This also pumps the window's input events.
    pub fn present(&mut self, status: &[String; 4], about: bool) -> Result<(), Error> {
        let (w, h) = self.window.get_size();
        self.preview.resize(w, h);
        self.composed.resize(w, h);
        self.composed.pixels.copy_from_slice(&self.preview.pixels);

        draw_status_strip(&mut self.composed, status);
        if about {
            draw_about_box(&mut self.composed);
        }

        self.window
            .update_with_buffer(&self.composed.pixels, w, h)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }
}

impl Screen for Drawer {
    fn viewport(&self) -> (usize, usize) {
        let (w, h) = self.window.get_size();
        (w, h.saturating_sub(STATUS_HEIGHT))
    }

    fn paint(&mut self, image: &RgbImage) {
        let (w, h) = self.window.get_size();
        self.preview.resize(w, h);
        let (vw, vh) = self.viewport();
        blit_scaled(&mut self.preview, image, vw, vh);
    }
}

/* ---------- Scaling ---------- */

/// Bilinear scale of `image` to exactly `width x height`.
pub fn scale_to_fit(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return RgbImage::new(width, height);
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Scale `image` into the top-left `vw x vh` area of `fb`.
/// Visual: the preview fills the window above the status strip.
pub fn blit_scaled(fb: &mut FrameBuffer, image: &RgbImage, vw: usize, vh: usize) {
    let vw = vw.min(fb.width);
    let vh = vh.min(fb.height);
    if vw == 0 || vh == 0 {
        return;
    }
    let scaled = scale_to_fit(image, vw as u32, vh as u32);
    for (y, row) in scaled.rows().enumerate() {
        let line = &mut fb.pixels[y * fb.width..y * fb.width + vw];
        for (dst, p) in line.iter_mut().zip(row) {
            let [r, g, b] = p.0;
            *dst = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        }
    }
}

/* ---------- Status strip and about box ---------- */

/// Four equal columns along the bottom edge.
fn draw_status_strip(fb: &mut FrameBuffer, status: &[String; 4]) {
    if fb.height < STATUS_HEIGHT {
        return;
    }
    let top = fb.height - STATUS_HEIGHT;
    fill_rect(fb, 0, top as i32, fb.width as i32, STATUS_HEIGHT as i32, STATUS_BG);
    let column = (fb.width / 4) as i32;
    for (i, field) in status.iter().enumerate() {
        draw_text_5x7(fb, i as i32 * column + 4, top as i32 + 3, field, STATUS_FG);
    }
}

fn draw_about_box(fb: &mut FrameBuffer) {
    let text_w = ABOUT_TEXT.iter().map(|l| l.len()).max().unwrap_or(0) as i32 * 6;
    let box_w = text_w + 16;
    let box_h = ABOUT_TEXT.len() as i32 * 10 + 12;
    let x = (fb.width as i32 - box_w) / 2;
    let y = (fb.height as i32 - STATUS_HEIGHT as i32 - box_h) / 2;
    fill_rect(fb, x, y, box_w, box_h, ABOUT_BG);
    for (i, line) in ABOUT_TEXT.iter().enumerate() {
        draw_text_5x7(fb, x + 8, y + 8 + i as i32 * 10, line, STATUS_FG);
    }
}

/* ---------- Software drawing: pixels, rectangles, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y..y + h {
        for xx in x..x + w {
            put_pixel(fb, xx, yy, color);
        }
    }
}

/// Return a 5x7 glyph bitmap. Lowercase is folded to uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 6 pixels per character.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
