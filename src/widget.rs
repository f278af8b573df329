//! Paint/measure contract between a host and a drawable component.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Size a widget asks for along one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRequest {
    pub minimum: u32,
    pub natural: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Width or height is zero; the host has not sized the widget yet.
    Unsized,
    /// The frame buffer does not hold `width * height` RGBA pixels.
    FrameMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted { rebuilt_static_layer: bool },
    Skipped(SkipReason),
}

pub trait Widget {
    /// `for_size` is the extent along the other orientation, if known.
    fn measure(&self, orientation: Orientation, for_size: Option<u32>) -> SizeRequest;

    /// Draw into an RGBA8 `frame` of `width * height` pixels.
    fn paint(&mut self, frame: &mut [u8], width: u32, height: u32) -> PaintOutcome;
}
