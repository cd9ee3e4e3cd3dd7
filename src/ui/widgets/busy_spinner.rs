// SPDX-License-Identifier: MPL-2.0
//! Animated spinner widget using Canvas for smooth rotation.

use crate::ui::design_tokens::sizing;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke};
use iced::{mouse, Color, Length, Point, Radians, Rectangle, Renderer, Theme};
use std::f32::consts::PI;

const STROKE_WIDTH: f32 = 3.0;

/// Spinner with a half-circle arc that rotates smoothly. The caller owns
/// the rotation angle and advances it on animation ticks.
pub struct BusySpinner {
    cache: Cache,
    rotation: f32,
    color: Color,
    size: f32,
}

impl BusySpinner {
    /// Creates a new spinner with the given color and rotation angle
    /// in radians.
    #[must_use]
    pub fn new(color: Color, rotation: f32) -> Self {
        Self {
            cache: Cache::default(),
            rotation,
            color,
            size: sizing::SPINNER_SIZE,
        }
    }

    /// Creates a Canvas widget from this spinner.
    pub fn into_element<Message: 'static>(self) -> iced::Element<'static, Message> {
        let size = self.size;
        Canvas::new(self)
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into()
    }
}

impl<Message> canvas::Program<Message> for BusySpinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self
            .cache
            .draw(renderer, bounds.size(), |frame: &mut Frame| {
                let center = frame.center();
                let radius = frame.width().min(frame.height()) / 2.0 - 4.0;

                // Faint full circle as the track
                let track = Path::circle(center, radius);
                frame.stroke(
                    &track,
                    Stroke::default().with_width(STROKE_WIDTH).with_color(Color {
                        a: 0.25,
                        ..self.color
                    }),
                );

                // Rotating half-circle arc, starting at the top
                let start_angle = self.rotation - PI / 2.0;
                let arc = arc_path(center, radius, start_angle, start_angle + PI);
                frame.stroke(
                    &arc,
                    Stroke::default()
                        .with_width(STROKE_WIDTH)
                        .with_color(self.color)
                        .with_line_cap(canvas::LineCap::Round),
                );
            });

        vec![geometry]
    }
}

fn arc_path(center: Point, radius: f32, start_angle: f32, end_angle: f32) -> Path {
    let mut builder = canvas::path::Builder::new();
    builder.arc(canvas::path::Arc {
        center,
        radius,
        start_angle: Radians(start_angle),
        end_angle: Radians(end_angle),
    });
    builder.build()
}
