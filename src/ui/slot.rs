//! Screen slots

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

use super::layout::{SlotId, LCD_BACKGROUND};
use super::resources::{BitmapHandle, ResourceId};

/// Fixed screen position holding at most one glyph.
pub struct DisplaySlot<'c> {
    id: SlotId,
    bitmap: Option<BitmapHandle<'c>>,
    /// Needs drawing
    dirty: bool,
    /// Area covered on screen by the last draw
    drawn: Option<Rectangle>,
}

impl<'c> DisplaySlot<'c> {
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            bitmap: None,
            dirty: false,
            drawn: None,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn origin(&self) -> Point {
        self.id.origin()
    }

    /// Glyph currently bound
    pub fn bound(&self) -> Option<ResourceId> {
        self.bitmap.as_ref().map(BitmapHandle::id)
    }

    /// Screen area of the bound glyph
    pub fn bounds(&self) -> Option<Rectangle> {
        self.bitmap
            .as_ref()
            .map(|bitmap| Rectangle::new(self.origin(), bitmap.size()))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Swap in `bitmap`, releasing the previous glyph.
    pub fn bind(&mut self, bitmap: BitmapHandle<'c>) {
        let changed = self.bound() != Some(bitmap.id());
        let previous = self.bitmap.replace(bitmap);
        drop(previous);
        self.dirty |= changed;
    }

    /// Release the bound glyph, if any.
    pub fn unbind(&mut self) {
        if self.bitmap.take().is_some() {
            self.dirty = true;
        }
    }

    /// Forget what was drawn; the next full redraw repaints everything.
    pub(super) fn invalidate(&mut self) {
        self.drawn = None;
    }

    /// Paint the LCD background over whatever the slot drew last.
    pub(super) fn erase<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(area) = self.drawn.take() {
            area.into_styled(PrimitiveStyle::with_fill(LCD_BACKGROUND))
                .draw(target)?;
        }
        Ok(())
    }

    /// Draw the bound glyph and clear the dirty flag.
    pub(super) fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(bitmap) = &self.bitmap {
            bitmap.resource().draw(self.origin(), target)?;
            self.drawn = self.bounds();
        }
        self.dirty = false;
        Ok(())
    }

    /// Clear the dirty flag without drawing; used for hidden slots.
    pub(super) fn skip(&mut self) {
        self.dirty = false;
    }
}
