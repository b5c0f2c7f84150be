/// ImageState
///
/// Per-tile image lifecycle. Every tile tracks its own state, so one failed
/// image never blocks its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// TileImage
///
/// The out-of-band image load tracked alongside a laid-out tile. Layout never
/// waits on this: tiles are positioned from the intrinsic height hint while
/// the image is still in flight.
#[derive(Debug, Clone, Default)]
pub struct TileImage {
    state: ImageState,
}

impl TileImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    pub fn on_load(&mut self) {
        self.state = ImageState::Loaded;
    }

    pub fn on_error(&mut self) {
        self.state = ImageState::Failed;
    }

    /// A pulsing placeholder fills the tile until the image resolves.
    pub fn shows_placeholder_pulse(&self) -> bool {
        self.state == ImageState::Loading
    }

    /// A failed load shows a static fallback in place of the image.
    pub fn shows_fallback(&self) -> bool {
        self.state == ImageState::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading_with_placeholder() {
        let image = TileImage::new();
        assert_eq!(image.state(), ImageState::Loading);
        assert!(image.shows_placeholder_pulse());
        assert!(!image.shows_fallback());
    }

    #[test]
    fn successful_load_clears_placeholder() {
        let mut image = TileImage::new();
        image.on_load();
        assert_eq!(image.state(), ImageState::Loaded);
        assert!(!image.shows_placeholder_pulse());
        assert!(!image.shows_fallback());
    }

    #[test]
    fn failed_load_shows_fallback() {
        let mut image = TileImage::new();
        image.on_error();
        assert_eq!(image.state(), ImageState::Failed);
        assert!(!image.shows_placeholder_pulse());
        assert!(image.shows_fallback());
    }
}
