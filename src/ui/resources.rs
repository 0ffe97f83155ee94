//! Glyph catalogue and handle bookkeeping
//!
//! Every glyph the face can show is a [`Resource`] in a static catalogue.
//! Slots never hold a resource directly; they hold a [`BitmapHandle`] obtained
//! from the [`ResourceCache`], and dropping the handle releases it. Handles
//! borrow the cache, so the cache outlives every slot that shows one of its
//! glyphs.

use core::cell::Cell;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    text::{Baseline, Text},
};
use profont::{PROFONT_12_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use super::icons::{self, Icon};
use super::layout::SEGMENT_COLOR;

/// Identifier of a catalogue entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    Background,
    Digit(u8),
    Colon,
    Dash,
    Am,
    Pm,
    /// Days since Sunday
    Weekday(u8),
    BluetoothConnected,
    BluetoothDisconnected,
    BatteryCharging,
    BatteryEmpty,
    BatteryLow,
    BatteryHalf,
    BatteryFull,
}

impl ResourceId {
    /// Digit glyph for `value % 10`.
    pub fn digit(value: u8) -> Self {
        Self::Digit(value % 10)
    }
}

/// Font sizes used by text glyphs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    /// Time and date digits
    Large,
    /// Weekday
    Medium,
    /// AM/PM
    Small,
}

impl FontSize {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Large => &PROFONT_24_POINT,
            FontSize::Medium => &PROFONT_18_POINT,
            FontSize::Small => &PROFONT_12_POINT,
        }
    }
}

/// What a resource looks like
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Art {
    Text { text: &'static str, font: FontSize },
    Icon(Icon),
}

/// One catalogue entry
#[derive(Debug)]
pub struct Resource {
    pub id: ResourceId,
    pub art: Art,
}

impl Resource {
    const fn text(id: ResourceId, text: &'static str, font: FontSize) -> Self {
        Self {
            id,
            art: Art::Text { text, font },
        }
    }

    const fn icon(id: ResourceId, icon: Icon) -> Self {
        Self {
            id,
            art: Art::Icon(icon),
        }
    }

    /// Natural size of the glyph
    pub fn size(&self) -> Size {
        match self.art {
            Art::Text { text, font } => {
                let font = font.font();
                let chars = text.chars().count() as u32;
                let width = font.character_size.width * chars
                    + font.character_spacing * chars.saturating_sub(1);
                Size::new(width, font.character_size.height)
            }
            Art::Icon(icon) => icon.size(),
        }
    }

    /// Draw the glyph with its top-left corner at `origin`.
    pub fn draw<D>(&self, origin: Point, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self.art {
            Art::Text { text, font } => {
                let style = MonoTextStyle::new(font.font(), SEGMENT_COLOR);
                Text::with_baseline(text, origin, style, Baseline::Top).draw(target)?;
                Ok(())
            }
            Art::Icon(icon) => icons::draw(icon, origin, target),
        }
    }
}

/// Everything the face ships with
pub static CATALOGUE: &[Resource] = &[
    Resource::icon(ResourceId::Background, Icon::Panel),
    Resource::text(ResourceId::Digit(0), "0", FontSize::Large),
    Resource::text(ResourceId::Digit(1), "1", FontSize::Large),
    Resource::text(ResourceId::Digit(2), "2", FontSize::Large),
    Resource::text(ResourceId::Digit(3), "3", FontSize::Large),
    Resource::text(ResourceId::Digit(4), "4", FontSize::Large),
    Resource::text(ResourceId::Digit(5), "5", FontSize::Large),
    Resource::text(ResourceId::Digit(6), "6", FontSize::Large),
    Resource::text(ResourceId::Digit(7), "7", FontSize::Large),
    Resource::text(ResourceId::Digit(8), "8", FontSize::Large),
    Resource::text(ResourceId::Digit(9), "9", FontSize::Large),
    Resource::text(ResourceId::Colon, ":", FontSize::Large),
    Resource::text(ResourceId::Dash, "-", FontSize::Large),
    // PM sits two columns to the right of AM, as on the CA-53W
    Resource::text(ResourceId::Am, "AM", FontSize::Small),
    Resource::text(ResourceId::Pm, "  PM", FontSize::Small),
    Resource::text(ResourceId::Weekday(0), "SU", FontSize::Medium),
    Resource::text(ResourceId::Weekday(1), "MO", FontSize::Medium),
    Resource::text(ResourceId::Weekday(2), "TU", FontSize::Medium),
    Resource::text(ResourceId::Weekday(3), "WE", FontSize::Medium),
    Resource::text(ResourceId::Weekday(4), "TH", FontSize::Medium),
    Resource::text(ResourceId::Weekday(5), "FR", FontSize::Medium),
    Resource::text(ResourceId::Weekday(6), "SA", FontSize::Medium),
    Resource::icon(ResourceId::BluetoothConnected, Icon::Bluetooth),
    Resource::icon(ResourceId::BluetoothDisconnected, Icon::BluetoothOff),
    Resource::icon(ResourceId::BatteryCharging, Icon::BatteryCharging),
    Resource::icon(ResourceId::BatteryEmpty, Icon::Battery { bars: 0 }),
    Resource::icon(ResourceId::BatteryLow, Icon::Battery { bars: 1 }),
    Resource::icon(ResourceId::BatteryHalf, Icon::Battery { bars: 2 }),
    Resource::icon(ResourceId::BatteryFull, Icon::Battery { bars: 3 }),
];

/// Hands out handles to catalogue entries and counts the live ones.
pub struct ResourceCache {
    catalogue: &'static [Resource],
    live: Cell<u16>,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(CATALOGUE)
    }
}

impl ResourceCache {
    pub const fn new(catalogue: &'static [Resource]) -> Self {
        Self {
            catalogue,
            live: Cell::new(0),
        }
    }

    /// Look up a resource, returning `None` when the catalogue lacks it.
    pub fn try_load(&self, id: ResourceId) -> Option<BitmapHandle<'_>> {
        let resource = self.catalogue.iter().find(|resource| resource.id == id)?;
        self.live.set(self.live.get() + 1);
        Some(BitmapHandle {
            cache: self,
            resource,
        })
    }

    /// Look up a resource that must be present.
    ///
    /// # Panics
    ///
    /// Panics when the catalogue does not contain `id`: the firmware was
    /// packaged without one of its glyphs.
    pub fn load(&self, id: ResourceId) -> BitmapHandle<'_> {
        match self.try_load(id) {
            Some(handle) => handle,
            None => panic!("glyph {:?} missing from catalogue", id),
        }
    }

    /// Number of handles not yet released
    pub fn live_handles(&self) -> u16 {
        self.live.get()
    }
}

/// Exclusive reference to a loaded glyph. Dropping it releases the glyph.
pub struct BitmapHandle<'c> {
    cache: &'c ResourceCache,
    resource: &'static Resource,
}

impl BitmapHandle<'_> {
    pub fn id(&self) -> ResourceId {
        self.resource.id
    }

    pub fn size(&self) -> Size {
        self.resource.size()
    }

    pub fn resource(&self) -> &'static Resource {
        self.resource
    }
}

impl Drop for BitmapHandle<'_> {
    fn drop(&mut self) {
        self.cache.live.set(self.cache.live.get() - 1);
    }
}

impl core::fmt::Debug for BitmapHandle<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BitmapHandle").field(&self.resource.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARTIAL: &[Resource] = &[Resource::text(ResourceId::Colon, ":", FontSize::Large)];

    #[test]
    fn handles_are_counted_until_dropped() {
        let cache = ResourceCache::default();
        let colon = cache.load(ResourceId::Colon);
        let dash = cache.load(ResourceId::Dash);
        assert_eq!(cache.live_handles(), 2);
        drop(colon);
        assert_eq!(cache.live_handles(), 1);
        drop(dash);
        assert_eq!(cache.live_handles(), 0);
    }

    #[test]
    fn every_digit_and_weekday_is_packaged() {
        let cache = ResourceCache::default();
        for n in 0..10 {
            assert_eq!(cache.load(ResourceId::digit(n)).id(), ResourceId::Digit(n));
        }
        for day in 0..7 {
            assert!(cache.try_load(ResourceId::Weekday(day)).is_some());
        }
        assert_eq!(cache.live_handles(), 0);
    }

    #[test]
    fn missing_glyph_is_none() {
        let cache = ResourceCache::new(PARTIAL);
        assert!(cache.try_load(ResourceId::Dash).is_none());
        assert_eq!(cache.live_handles(), 0);
    }

    #[test]
    #[should_panic(expected = "missing from catalogue")]
    fn loading_missing_glyph_panics() {
        let cache = ResourceCache::new(PARTIAL);
        let _ = cache.load(ResourceId::Weekday(3));
    }

    #[test]
    fn pm_glyph_is_wider_than_am() {
        let cache = ResourceCache::default();
        let am = cache.load(ResourceId::Am).size();
        let pm = cache.load(ResourceId::Pm).size();
        assert!(pm.width > am.width);
        assert_eq!(pm.height, am.height);
    }

    #[test]
    fn digits_share_one_size() {
        let cache = ResourceCache::default();
        let first = cache.load(ResourceId::Digit(0)).size();
        for n in 1..10 {
            assert_eq!(cache.load(ResourceId::Digit(n)).size(), first);
        }
        assert_eq!(first, PROFONT_24_POINT.character_size);
    }
}
