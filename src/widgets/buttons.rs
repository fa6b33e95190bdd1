//! Corner control buttons.
//!
//! A button renders as a rounded square with its icon label centered in it.
//! Active entities get a filled accent background; inactive ones a thin
//! outline; unavailable ones render dimmed and, like inert domains, simply
//! do nothing when pressed.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{CornerRadii, PrimitiveStyle, RoundedRectangle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{self, SEVERITY_GREEN, UNLIT};
use crate::config::Theme;
use crate::controls::Button;
use crate::layout::{ButtonRect, GaugeLayout};
use crate::styles::{CENTERED, UNIT_FONT};

/// Draw one realized button inside its layout rectangle.
pub fn draw_button<D>(display: &mut D, layout: &GaugeLayout, theme: Theme, button: &Button)
where
    D: DrawTarget<Color = Rgb565>,
{
    let rect = layout.button_rect(button.config.position, button.config.icon_size);
    let shape = rounded(rect);

    if button.active {
        shape
            .into_styled(PrimitiveStyle::with_fill(SEVERITY_GREEN))
            .draw(display)
            .ok();
    } else {
        let outline = if button.available { theme.secondary_text } else { UNLIT };
        shape
            .into_styled(PrimitiveStyle::with_stroke(outline, 1))
            .draw(display)
            .ok();
    }

    let icon_color = if button.active {
        theme.background
    } else if button.available {
        theme.text
    } else {
        colors::scale(theme.text, 0.4)
    };
    let style = MonoTextStyle::new(UNIT_FONT, icon_color);
    // Baseline sits a few pixels under the rect center for optical centering.
    let pos = rect.center() + Point::new(0, 4);
    Text::with_text_style(button.icon(), pos, style, CENTERED)
        .draw(display)
        .ok();
}

fn rounded(rect: ButtonRect) -> RoundedRectangle {
    RoundedRectangle::new(
        Rectangle::new(rect.top_left, Size::new(rect.size, rect.size)),
        CornerRadii::new(Size::new(4, 4)),
    )
}
