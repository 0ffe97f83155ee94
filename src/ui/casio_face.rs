//! CA-53W watchface

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use super::layout::{Group, SlotId};
use super::mode::ViewMode;
use super::resources::{ResourceCache, ResourceId};
use super::slot::DisplaySlot;
use crate::clock::{ChangeMask, ClockSnapshot, Period};

/// Slot set of the retro calculator watch.
///
/// Time and date digits share one row; only the group matching the current
/// [`ViewMode`] is drawn, but both are kept current.
pub struct CasioFace<'c> {
    cache: &'c ResourceCache,
    slots: [DisplaySlot<'c>; SlotId::COUNT],
    view: ViewMode,
    /// Repaint background and every visible slot on the next draw
    full_redraw: bool,
}

impl<'c> CasioFace<'c> {
    /// Create the face and bind its static glyphs.
    pub fn new(cache: &'c ResourceCache) -> Self {
        let mut face = Self {
            cache,
            slots: SlotId::ALL.map(DisplaySlot::new),
            view: ViewMode::Time,
            full_redraw: true,
        };
        face.rebind(SlotId::Background, ResourceId::Background);
        face.rebind(SlotId::Colon, ResourceId::Colon);
        face.rebind(SlotId::Dash, ResourceId::Dash);
        face
    }

    pub fn slot(&self, id: SlotId) -> &DisplaySlot<'c> {
        &self.slots[id.index()]
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn is_visible(&self, id: SlotId) -> bool {
        match id.group() {
            Group::Always => true,
            Group::Time => self.view == ViewMode::Time,
            Group::Date => self.view == ViewMode::Date,
        }
    }

    /// Rebind the slots depending on each granularity set in `mask`.
    pub fn apply_changes(&mut self, mask: ChangeMask, snapshot: &ClockSnapshot) {
        if mask.contains(ChangeMask::SECOND) {
            self.set_pair(SlotId::SecondTens, SlotId::SecondUnits, snapshot.second);
        }
        if mask.contains(ChangeMask::MINUTE) {
            self.set_pair(SlotId::MinuteTens, SlotId::MinuteUnits, snapshot.minute);
        }
        if mask.contains(ChangeMask::HOUR) {
            self.set_pair(SlotId::HourTens, SlotId::HourUnits, snapshot.display_hour());
            let period = match snapshot.period() {
                Period::Am => ResourceId::Am,
                Period::Pm => ResourceId::Pm,
            };
            self.rebind(SlotId::Period, period);
        }
        if mask.contains(ChangeMask::DAY) {
            self.set_pair(SlotId::YearTens, SlotId::YearUnits, snapshot.year_of_century());
            self.set_pair(SlotId::MonthTens, SlotId::MonthUnits, snapshot.month);
            self.set_pair(SlotId::DayTens, SlotId::DayUnits, snapshot.day);
            self.rebind(SlotId::Weekday, ResourceId::Weekday(snapshot.weekday % 7));
        }
    }

    /// Show the slot group of `view` and hide the other one.
    pub fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            debug!("View {} -> {}", self.view, view);
            self.view = view;
            self.full_redraw = true;
        }
    }

    /// Bind the glyph `id` into `slot`. Does nothing when it is already there.
    pub fn rebind(&mut self, slot: SlotId, id: ResourceId) {
        let slot = &mut self.slots[slot.index()];
        if slot.bound() != Some(id) {
            slot.bind(self.cache.load(id));
        }
    }

    fn set_pair(&mut self, tens: SlotId, units: SlotId, value: u8) {
        self.rebind(tens, ResourceId::digit(value / 10));
        self.rebind(units, ResourceId::digit(value));
    }

    /// Whether the next draw has anything to paint
    pub fn needs_draw(&self) -> bool {
        self.full_redraw
            || self
                .slots
                .iter()
                .any(|slot| slot.is_dirty() && self.is_visible(slot.id()))
    }

    /// Paint the face onto `target`.
    ///
    /// After a view switch, or the first time, the background and every
    /// visible slot are painted. Otherwise only slots whose glyph changed are
    /// erased and redrawn.
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.full_redraw {
            for i in 0..self.slots.len() {
                let visible = self.is_visible(self.slots[i].id());
                let slot = &mut self.slots[i];
                slot.invalidate();
                if visible {
                    slot.draw(target)?;
                } else {
                    slot.skip();
                }
            }
            self.full_redraw = false;
            return Ok(());
        }

        for i in 0..self.slots.len() {
            if !self.slots[i].is_dirty() {
                continue;
            }
            let visible = self.is_visible(self.slots[i].id());
            let slot = &mut self.slots[i];
            if visible {
                slot.erase(target)?;
                slot.draw(target)?;
            } else {
                slot.skip();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{snapshot, ClockStyle};
    use crate::ui::layout::{LCD_H, LCD_W};
    use chrono::NaiveDate;
    use core::convert::Infallible;
    use embedded_graphics::Pixel;

    /// In-memory frame buffer counting written pixels
    struct Frame {
        pixels: Vec<Rgb565>,
        writes: usize,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                pixels: vec![Rgb565::WHITE; (LCD_W * LCD_H) as usize],
                writes: 0,
            }
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new(LCD_W, LCD_H)
        }
    }

    impl DrawTarget for Frame {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x >= 0 && point.y >= 0 && (point.x as u32) < LCD_W && (point.y as u32) < LCD_H {
                    self.pixels[point.y as usize * LCD_W as usize + point.x as usize] = color;
                    self.writes += 1;
                }
            }
            Ok(())
        }
    }

    fn snap(h: u32, mi: u32, s: u32, style: ClockStyle) -> ClockSnapshot {
        let now = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap();
        snapshot(&now, style)
    }

    fn bound(face: &CasioFace, id: SlotId) -> Option<ResourceId> {
        face.slot(id).bound()
    }

    #[test]
    fn full_mask_binds_every_slot() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        face.apply_changes(ChangeMask::ALL, &snap(21, 7, 59, ClockStyle::TwelveHour));

        assert_eq!(bound(&face, SlotId::HourTens), Some(ResourceId::Digit(0)));
        assert_eq!(bound(&face, SlotId::HourUnits), Some(ResourceId::Digit(9)));
        assert_eq!(bound(&face, SlotId::MinuteTens), Some(ResourceId::Digit(0)));
        assert_eq!(bound(&face, SlotId::MinuteUnits), Some(ResourceId::Digit(7)));
        assert_eq!(bound(&face, SlotId::SecondTens), Some(ResourceId::Digit(5)));
        assert_eq!(bound(&face, SlotId::SecondUnits), Some(ResourceId::Digit(9)));
        assert_eq!(bound(&face, SlotId::Period), Some(ResourceId::Pm));
        assert_eq!(bound(&face, SlotId::YearTens), Some(ResourceId::Digit(2)));
        assert_eq!(bound(&face, SlotId::YearUnits), Some(ResourceId::Digit(4)));
        assert_eq!(bound(&face, SlotId::MonthTens), Some(ResourceId::Digit(0)));
        assert_eq!(bound(&face, SlotId::MonthUnits), Some(ResourceId::Digit(3)));
        assert_eq!(bound(&face, SlotId::DayTens), Some(ResourceId::Digit(0)));
        assert_eq!(bound(&face, SlotId::DayUnits), Some(ResourceId::Digit(5)));
        // 5 March 2024 was a Tuesday
        assert_eq!(bound(&face, SlotId::Weekday), Some(ResourceId::Weekday(2)));
    }

    #[test]
    fn twenty_four_hour_digits() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        face.apply_changes(ChangeMask::ALL, &snap(21, 7, 59, ClockStyle::TwentyFourHour));
        assert_eq!(bound(&face, SlotId::HourTens), Some(ResourceId::Digit(2)));
        assert_eq!(bound(&face, SlotId::HourUnits), Some(ResourceId::Digit(1)));
    }

    #[test]
    fn empty_mask_changes_nothing() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        face.apply_changes(ChangeMask::ALL, &snap(10, 20, 30, ClockStyle::TwelveHour));
        let before: Vec<_> = SlotId::ALL.iter().map(|id| bound(&face, *id)).collect();
        let live = cache.live_handles();

        face.apply_changes(ChangeMask::EMPTY, &snap(11, 21, 31, ClockStyle::TwelveHour));

        let after: Vec<_> = SlotId::ALL.iter().map(|id| bound(&face, *id)).collect();
        assert_eq!(before, after);
        assert_eq!(cache.live_handles(), live);
    }

    #[test]
    fn second_mask_only_touches_seconds() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        face.apply_changes(ChangeMask::ALL, &snap(10, 20, 30, ClockStyle::TwelveHour));
        face.apply_changes(ChangeMask::SECOND, &snap(11, 21, 31, ClockStyle::TwelveHour));
        assert_eq!(bound(&face, SlotId::SecondUnits), Some(ResourceId::Digit(1)));
        assert_eq!(bound(&face, SlotId::MinuteUnits), Some(ResourceId::Digit(0)));
        assert_eq!(bound(&face, SlotId::HourUnits), Some(ResourceId::Digit(0)));
    }

    #[test]
    fn one_handle_per_slot_and_all_released_on_drop() {
        let cache = ResourceCache::default();
        {
            let mut face = CasioFace::new(&cache);
            face.apply_changes(ChangeMask::ALL, &snap(1, 2, 3, ClockStyle::TwelveHour));
            face.apply_changes(ChangeMask::ALL, &snap(4, 5, 6, ClockStyle::TwelveHour));
            let bound_slots = SlotId::ALL
                .iter()
                .filter(|id| face.slot(**id).bound().is_some())
                .count();
            assert_eq!(cache.live_handles() as usize, bound_slots);
        }
        assert_eq!(cache.live_handles(), 0);
    }

    #[test]
    fn hidden_date_slots_stay_current() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        let mut frame = Frame::new();
        face.apply_changes(ChangeMask::ALL, &snap(23, 59, 59, ClockStyle::TwelveHour));
        face.draw(&mut frame).unwrap();

        let next_day = snapshot(
            &NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            ClockStyle::TwelveHour,
        );
        face.apply_changes(ChangeMask::ALL, &next_day);
        face.draw(&mut frame).unwrap();
        assert!(!face.is_visible(SlotId::DayUnits));

        face.set_view(ViewMode::Date);
        assert!(face.is_visible(SlotId::DayUnits));
        assert!(!face.is_visible(SlotId::HourUnits));
        assert_eq!(bound(&face, SlotId::DayUnits), Some(ResourceId::Digit(6)));
        assert_eq!(bound(&face, SlotId::Weekday), Some(ResourceId::Weekday(3)));
    }

    #[test]
    fn first_frame_paints_then_idle_frame_paints_nothing() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        let mut frame = Frame::new();
        face.apply_changes(ChangeMask::ALL, &snap(10, 20, 30, ClockStyle::TwelveHour));

        assert!(face.needs_draw());
        face.draw(&mut frame).unwrap();
        assert!(frame.writes >= (LCD_W * LCD_H) as usize);
        assert_eq!(frame.pixels[0], crate::ui::layout::CASE_COLOR);

        frame.writes = 0;
        assert!(!face.needs_draw());
        face.draw(&mut frame).unwrap();
        assert_eq!(frame.writes, 0);
    }

    #[test]
    fn partial_frame_only_touches_changed_slots() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        let mut frame = Frame::new();
        face.apply_changes(ChangeMask::ALL, &snap(10, 20, 30, ClockStyle::TwelveHour));
        face.draw(&mut frame).unwrap();

        frame.writes = 0;
        face.apply_changes(ChangeMask::SECOND, &snap(10, 20, 31, ClockStyle::TwelveHour));
        face.draw(&mut frame).unwrap();

        let units = face.slot(SlotId::SecondUnits).bounds().unwrap();
        assert!(frame.writes > 0);
        // erase plus glyph never exceeds twice the slot area
        assert!(frame.writes <= 2 * units.size.width as usize * units.size.height as usize);
    }

    #[test]
    fn narrower_period_leaves_no_trace_of_the_wider_one() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        let mut frame = Frame::new();
        face.apply_changes(ChangeMask::ALL, &snap(13, 0, 0, ClockStyle::TwelveHour));
        face.draw(&mut frame).unwrap();

        // 13:00 and 01:00 share every digit, only the period glyph shrinks
        face.apply_changes(ChangeMask::HOUR, &snap(1, 0, 0, ClockStyle::TwelveHour));
        assert_eq!(bound(&face, SlotId::Period), Some(ResourceId::Am));
        face.draw(&mut frame).unwrap();

        let fresh_cache = ResourceCache::default();
        let mut fresh = CasioFace::new(&fresh_cache);
        let mut expected = Frame::new();
        fresh.apply_changes(ChangeMask::ALL, &snap(1, 0, 0, ClockStyle::TwelveHour));
        fresh.draw(&mut expected).unwrap();

        assert!(frame.pixels == expected.pixels);
    }

    #[test]
    fn hidden_slot_changes_do_not_paint() {
        let cache = ResourceCache::default();
        let mut face = CasioFace::new(&cache);
        let mut frame = Frame::new();
        face.apply_changes(ChangeMask::ALL, &snap(10, 20, 30, ClockStyle::TwelveHour));
        face.draw(&mut frame).unwrap();

        frame.writes = 0;
        face.rebind(SlotId::DayUnits, ResourceId::Digit(9));
        face.draw(&mut frame).unwrap();
        assert_eq!(frame.writes, 0);
    }
}
