//! SVG snapshot canvas.
//!
//! Renders one frame of draw commands into a standalone SVG document, used by
//! the CLI and by hosts that want a static preview.

use crate::model::palette::Rgba;
use crate::render::canvas::{Canvas, ColorStop, DrawCommand, Fill, Shadow};
use crate::render::layout::Point;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Accumulates SVG elements; `finish` wraps them in a document.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    next_gradient_id: usize,
    shadows: BTreeSet<ShadowKey>,
}

/// One `<filter>` per distinct blur radius and shadow color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ShadowKey {
    blur: u32,
    rgb: [u8; 3],
    alpha: u8,
}

impl ShadowKey {
    fn new(blur: f64, color: Rgba) -> Self {
        Self {
            blur: blur.round() as u32,
            rgb: [color.r, color.g, color.b],
            alpha: (color.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    fn id(&self) -> String {
        let [r, g, b] = self.rgb;
        format!("shadow-{}-{r:02x}{g:02x}{b:02x}{:02x}", self.blur, self.alpha)
    }
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn finish(self) -> String {
        let mut defs = self.defs;
        for key in &self.shadows {
            let [r, g, b] = key.rgb;
            // Canvas shadowBlur is roughly twice the gaussian deviation.
            let _ = write!(
                defs,
                r##"<filter id="{id}" x="-100%" y="-100%" width="300%" height="300%"><feGaussianBlur in="SourceAlpha" stdDeviation="{deviation}" result="blur"/><feFlood flood-color="#{r:02x}{g:02x}{b:02x}" flood-opacity="{opacity}"/><feComposite in2="blur" operator="in" result="glow"/><feMerge><feMergeNode in="glow"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"##,
                id = key.id(),
                deviation = f64::from(key.blur) / 2.0,
                opacity = fmt_num(f64::from(key.alpha) / 255.0)
            );
        }
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height),
            body = self.body
        )
    }

    fn gradient_id(&mut self) -> String {
        let id = format!("g{}", self.next_gradient_id);
        self.next_gradient_id += 1;
        id
    }

    fn push_stops(&mut self, stops: &[ColorStop]) {
        for stop in stops {
            let _ = write!(
                self.defs,
                r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                fmt_num(stop.offset),
                stop.color.hex(),
                fmt_num(f64::from(stop.color.a))
            );
        }
    }

    fn paint_ref(&mut self, fill: &Fill) -> (String, f32) {
        match fill {
            Fill::Solid { color } => (color.hex(), color.a),
            Fill::Radial {
                focus,
                center,
                radius,
                stops,
            } => {
                let id = self.gradient_id();
                let _ = write!(
                    self.defs,
                    r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}" fx="{}" fy="{}">"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius),
                    fmt_num(focus.x),
                    fmt_num(focus.y)
                );
                self.push_stops(stops);
                self.defs.push_str("</radialGradient>");
                (format!("url(#{id})"), 1.0)
            }
        }
    }

    fn filter_attr(&mut self, shadow: Option<Shadow>) -> String {
        match shadow {
            Some(shadow) if shadow.blur > 0.0 => {
                let key = ShadowKey::new(shadow.blur, shadow.color);
                self.shadows.insert(key);
                format!(r#" filter="url(#{})""#, key.id())
            }
            _ => String::new(),
        }
    }
}

impl Canvas for SvgCanvas {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Background {
                width,
                height,
                stops,
            } => {
                let id = self.gradient_id();
                let _ = write!(
                    self.defs,
                    r#"<linearGradient id="{id}" x1="0" y1="0" x2="0" y2="1">"#
                );
                self.push_stops(&stops);
                self.defs.push_str("</linearGradient>");
                let _ = write!(
                    self.body,
                    r#"<rect x="0" y="0" width="{}" height="{}" fill="url(#{id})"/>"#,
                    fmt_num(width),
                    fmt_num(height)
                );
            }
            DrawCommand::Polyline {
                points,
                color,
                width,
                dash,
            } => {
                let dash_attr = if dash.is_empty() {
                    String::new()
                } else {
                    let pattern: Vec<String> = dash.iter().map(|value| fmt_num(*value)).collect();
                    format!(r#" stroke-dasharray="{}""#, pattern.join(" "))
                };
                let _ = write!(
                    self.body,
                    r#"<polyline points="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}"{dash_attr}/>"#,
                    points_attr(&points),
                    color.hex(),
                    fmt_num(f64::from(color.a)),
                    fmt_num(width)
                );
            }
            DrawCommand::FillCircle {
                center,
                radius,
                fill,
                shadow,
            } => {
                let (paint, opacity) = self.paint_ref(&fill);
                let filter = self.filter_attr(shadow);
                let _ = write!(
                    self.body,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{paint}" fill-opacity="{}"{filter}/>"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(radius),
                    fmt_num(f64::from(opacity))
                );
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                color,
                width,
                shadow,
            } => {
                let filter = self.filter_attr(shadow);
                let _ = write!(
                    self.body,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}"{filter}/>"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(radius),
                    color.hex(),
                    fmt_num(f64::from(color.a)),
                    fmt_num(width)
                );
            }
        }
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", fmt_num(point.x), fmt_num(point.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{fmt_num, SvgCanvas};
    use crate::model::palette::Rgba;
    use crate::render::canvas::{Canvas, ColorStop, DrawCommand, Fill, Shadow};
    use crate::render::layout::Point;

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(fmt_num(400.0), "400");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.33");
    }

    #[test]
    fn renders_document_with_gradients_and_filters() {
        let mut canvas = SvgCanvas::new(300.0, 400.0);
        canvas.draw(DrawCommand::Background {
            width: 300.0,
            height: 400.0,
            stops: vec![ColorStop::new(0.0, Rgba::WHITE)],
        });
        canvas.draw(DrawCommand::Polyline {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
            color: Rgba::WHITE.with_alpha(0.2),
            width: 2.0,
            dash: vec![5.0, 5.0],
        });
        canvas.draw(DrawCommand::FillCircle {
            center: Point::new(5.0, 5.0),
            radius: 4.0,
            fill: Fill::Solid {
                color: Rgba::WHITE,
            },
            shadow: Some(Shadow {
                blur: 10.0,
                color: Rgba::WHITE,
            }),
        });
        let svg = canvas.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<linearGradient id="g0""#));
        assert!(svg.contains(r#"stroke-dasharray="5 5""#));
        assert!(svg.contains(r#"filter="url(#shadow-10-ffffffff)""#));
        assert!(svg.contains(r#"<filter id="shadow-10-ffffffff""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn shadows_take_their_own_color() {
        let ring = |color: Rgba| DrawCommand::StrokeCircle {
            center: Point::new(20.0, 20.0),
            radius: 6.0,
            color: Rgba::WHITE,
            width: 1.5,
            shadow: Some(Shadow { blur: 15.0, color }),
        };
        let mut canvas = SvgCanvas::new(40.0, 40.0);
        canvas.draw(ring(Rgba::rgb(0x52, 0xc4, 0x1a)));
        canvas.draw(ring(Rgba::rgb(0xf5, 0x22, 0x2d)));
        canvas.draw(ring(Rgba::rgb(0x52, 0xc4, 0x1a)));
        let svg = canvas.finish();

        assert_eq!(svg.matches("<filter ").count(), 2);
        assert!(svg.contains(r##"flood-color="#52c41a""##));
        assert!(svg.contains(r##"flood-color="#f5222d""##));
        assert!(svg.contains(r#"filter="url(#shadow-15-f5222dff)""#));
        assert!(!svg.contains(r#"in="SourceGraphic" stdDeviation"#));
    }
}
