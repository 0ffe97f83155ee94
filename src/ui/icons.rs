//! Vector art for the icon glyphs and the background panel

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use profont::{PROFONT_10_POINT, PROFONT_18_POINT};

use super::layout::{
    CASE_COLOR, FRAME_COLOR, LABEL_COLOR, LCD_BACKGROUND, LCD_H, LCD_W, LCD_WINDOW, SEGMENT_COLOR,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    /// Watch case with the LCD window
    Panel,
    Bluetooth,
    BluetoothOff,
    BatteryCharging,
    /// Battery outline with 0-3 charge bars
    Battery { bars: u8 },
}

const RUNE_SIZE: Size = Size::new(11, 19);
const BATTERY_SIZE: Size = Size::new(25, 12);

/// Bluetooth rune, relative to the icon origin
const RUNE: [Point; 6] = [
    Point::new(1, 5),
    Point::new(9, 13),
    Point::new(5, 17),
    Point::new(5, 1),
    Point::new(9, 5),
    Point::new(1, 13),
];

/// Lightning bolt inside the battery outline
const BOLT: [Point; 4] = [
    Point::new(12, 1),
    Point::new(8, 6),
    Point::new(14, 6),
    Point::new(10, 11),
];

impl Icon {
    pub fn size(self) -> Size {
        match self {
            Icon::Panel => Size::new(LCD_W, LCD_H),
            Icon::Bluetooth | Icon::BluetoothOff => RUNE_SIZE,
            Icon::BatteryCharging | Icon::Battery { .. } => BATTERY_SIZE,
        }
    }
}

/// Draw `icon` with its top-left corner at `origin`.
pub fn draw<D>(icon: Icon, origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match icon {
        Icon::Panel => draw_panel(origin, target),
        Icon::Bluetooth => draw_rune(origin, 2, target),
        Icon::BluetoothOff => {
            draw_rune(origin, 1, target)?;
            Line::new(origin, origin + RUNE_SIZE - Point::new(1, 1))
                .into_styled(PrimitiveStyle::with_stroke(SEGMENT_COLOR, 2))
                .draw(target)
        }
        Icon::Battery { bars } => {
            draw_battery_outline(origin, target)?;
            for bar in 0..bars.min(3) as i32 {
                Rectangle::new(origin + Point::new(2 + bar * 7, 2), Size::new(5, 8))
                    .into_styled(PrimitiveStyle::with_fill(SEGMENT_COLOR))
                    .draw(target)?;
            }
            Ok(())
        }
        Icon::BatteryCharging => {
            draw_battery_outline(origin, target)?;
            let bolt = BOLT.map(|p| p + origin);
            Polyline::new(&bolt)
                .into_styled(PrimitiveStyle::with_stroke(SEGMENT_COLOR, 2))
                .draw(target)
        }
    }
}

fn draw_rune<D>(origin: Point, stroke: u32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let rune = RUNE.map(|p| p + origin);
    Polyline::new(&rune)
        .into_styled(PrimitiveStyle::with_stroke(SEGMENT_COLOR, stroke))
        .draw(target)
}

fn draw_battery_outline<D>(origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(origin, Size::new(23, 12))
        .into_styled(PrimitiveStyle::with_stroke(SEGMENT_COLOR, 1))
        .draw(target)?;
    Rectangle::new(origin + Point::new(23, 3), Size::new(2, 6))
        .into_styled(PrimitiveStyle::with_fill(SEGMENT_COLOR))
        .draw(target)
}

fn draw_panel<D>(origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(origin, Size::new(LCD_W, LCD_H))
        .into_styled(PrimitiveStyle::with_fill(CASE_COLOR))
        .draw(target)?;

    // LCD window
    let window_style = PrimitiveStyleBuilder::new()
        .fill_color(LCD_BACKGROUND)
        .stroke_color(FRAME_COLOR)
        .stroke_width(3)
        .build();
    RoundedRectangle::with_equal_corners(
        Rectangle::new(LCD_WINDOW.top_left + origin, LCD_WINDOW.size),
        Size::new(8, 8),
    )
    .into_styled(window_style)
    .draw(target)?;

    // Brand marks above and below the window
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let center_x = origin.x + LCD_W as i32 / 2;
    Text::with_text_style(
        "CASIO",
        Point::new(center_x, origin.y + 14),
        MonoTextStyle::new(&PROFONT_18_POINT, LABEL_COLOR),
        centered,
    )
    .draw(target)?;
    Text::with_text_style(
        "CALCULATOR  ALARM CHRONOGRAPH",
        Point::new(center_x, origin.y + LCD_WINDOW.bottom_right().map_or(200, |p| p.y) + 10),
        MonoTextStyle::new(&PROFONT_10_POINT, LABEL_COLOR),
        centered,
    )
    .draw(target)?;

    Ok(())
}
