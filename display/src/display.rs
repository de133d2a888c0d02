use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{TextureValueError, WindowCanvas};
use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;
use thiserror::Error;

use emu8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8_core::FrameBuffer;

/// Bytes per pixel of an RGB24 texture
const CHANNELS: usize = 3;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("failed to open window: {0}")]
    Window(#[from] WindowBuildError),

    #[error("failed to create canvas: {0}")]
    Canvas(#[from] IntegerOrSdlError),

    #[error("failed to create texture: {0}")]
    Texture(#[from] TextureValueError),
}

/// Colours for lit and unlit pixels
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            foreground: Color::RGB(0xFF, 0xFF, 0xFF),
            background: Color::RGB(0x00, 0x00, 0x00),
        }
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 monochrome pixels.
/// The on/off state of these pixels is encoded as 1/0 respectively in a 2d array of 64x32 bytes.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: WindowCanvas,
    palette: Palette,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    /// * `palette` the colours of lit and unlit pixels
    pub fn new(sdl: &sdl2::Sdl, scale: u32, palette: Palette) -> Result<Self, DisplayError> {
        let video_subsystem = sdl.video().map_err(DisplayError::Sdl)?;
        let window = video_subsystem
            .window(
                "Emu-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()?;
        let mut canvas = window.into_canvas().build()?;
        canvas.set_draw_color(palette.background);
        canvas.clear();
        canvas.present();
        log::debug!(
            "opened {}x{} window",
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale
        );

        Ok(Display { canvas, palette })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    /// Lit pixels take the palette's foreground colour and unlit pixels its background.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `palette` the colours to paint with
    fn frame_to_sdl_texture(frame: &FrameBuffer, palette: &Palette) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|&pixel| {
                let Color { r, g, b, .. } = if pixel == 1 {
                    palette.foreground
                } else {
                    palette.background
                };
                [r, g, b]
            })
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let pixels = Display::frame_to_sdl_texture(frame, &self.palette);
        texture
            .update(None, &pixels, DISPLAY_WIDTH * CHANNELS)
            .map_err(|e| DisplayError::Sdl(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(DisplayError::Sdl)?;
        self.canvas.present();
        Ok(())
    }
}
