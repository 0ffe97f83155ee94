//! Fixed screen layout for the 240x240 panel

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

/// Area of the simulated LCD inside the watch case
pub const LCD_WINDOW: Rectangle = Rectangle::new(Point::new(10, 40), Size::new(220, 160));

pub const CASE_COLOR: Rgb565 = Rgb565::BLACK;
pub const FRAME_COLOR: Rgb565 = Rgb565::new(12, 24, 12);
pub const LABEL_COLOR: Rgb565 = Rgb565::new(26, 52, 26);
pub const LCD_BACKGROUND: Rgb565 = Rgb565::new(19, 43, 17);
pub const SEGMENT_COLOR: Rgb565 = Rgb565::BLACK;

/// Baseline rows
const STATUS_Y: i32 = 54;
const DIGITS_Y: i32 = 104;

/// Columns of the eight-character digit row ("12:34 56" / "24 03-16")
const COLUMNS: [i32; 8] = [44, 66, 86, 102, 124, 140, 156, 178];

/// Group a slot belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Group {
    /// Shown in both views
    Always,
    Time,
    Date,
}

/// Every slot on the face, in drawing order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotId {
    Background,
    Battery,
    Bluetooth,
    Period,
    Weekday,
    HourTens,
    HourUnits,
    Colon,
    MinuteTens,
    MinuteUnits,
    SecondTens,
    SecondUnits,
    YearTens,
    YearUnits,
    MonthTens,
    MonthUnits,
    Dash,
    DayTens,
    DayUnits,
}

impl SlotId {
    pub const COUNT: usize = 19;

    pub const ALL: [SlotId; Self::COUNT] = [
        SlotId::Background,
        SlotId::Battery,
        SlotId::Bluetooth,
        SlotId::Period,
        SlotId::Weekday,
        SlotId::HourTens,
        SlotId::HourUnits,
        SlotId::Colon,
        SlotId::MinuteTens,
        SlotId::MinuteUnits,
        SlotId::SecondTens,
        SlotId::SecondUnits,
        SlotId::YearTens,
        SlotId::YearUnits,
        SlotId::MonthTens,
        SlotId::MonthUnits,
        SlotId::Dash,
        SlotId::DayTens,
        SlotId::DayUnits,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn group(self) -> Group {
        use SlotId::*;
        match self {
            Background | Battery | Bluetooth | Period | Weekday => Group::Always,
            HourTens | HourUnits | Colon | MinuteTens | MinuteUnits | SecondTens | SecondUnits => {
                Group::Time
            }
            YearTens | YearUnits | MonthTens | MonthUnits | Dash | DayTens | DayUnits => {
                Group::Date
            }
        }
    }

    /// Top-left corner of the slot
    pub const fn origin(self) -> Point {
        use SlotId::*;
        match self {
            Background => Point::zero(),
            Battery => Point::new(24, STATUS_Y + 2),
            Bluetooth => Point::new(56, STATUS_Y - 2),
            Period => Point::new(80, STATUS_Y),
            Weekday => Point::new(172, STATUS_Y - 4),
            HourTens => digit(0),
            HourUnits => digit(1),
            Colon => digit(2),
            MinuteTens => digit(3),
            MinuteUnits => digit(4),
            SecondTens => digit(6),
            SecondUnits => digit(7),
            YearTens => digit(0),
            YearUnits => digit(1),
            MonthTens => digit(3),
            MonthUnits => digit(4),
            Dash => digit(5),
            DayTens => digit(6),
            DayUnits => digit(7),
        }
    }
}

const fn digit(column: usize) -> Point {
    Point::new(COLUMNS[column], DIGITS_Y)
}
