//! Proximity links between entities.
//!
//! Every unordered pair closer than the link distance gets a line whose
//! strength falls off linearly with distance: `1 - d / max`. The pass is
//! quadratic in the entity count, which is fine for the tens to low hundreds
//! of entities a page holds.

use crate::entity::Entity;
use constellation_core::color::Rgba;
use constellation_core::surface::Surface;
use glam::DVec2;

/// Which stroke attribute carries the link strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFalloff {
    /// Stroke alpha is replaced by the strength; width stays at the base.
    Opacity,
    /// Stroke width is `base width * strength`; color is used as is.
    Width,
}

impl LinkFalloff {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkFalloff::Opacity => "opacity",
            LinkFalloff::Width => "width",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub color: Rgba,
    pub width: f64,
    pub falloff: LinkFalloff,
}

impl LinkStyle {
    /// Stroke width and color for a link of the given strength.
    pub fn stroke(&self, strength: f64) -> (f64, Rgba) {
        match self.falloff {
            LinkFalloff::Opacity => (self.width, self.color.with_alpha(strength)),
            LinkFalloff::Width => (self.width * strength, self.color),
        }
    }
}

/// `1 - distance / max_distance` below the threshold, zero at or above it.
pub fn link_strength(distance: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 || distance >= max_distance {
        0.0
    } else {
        1.0 - distance / max_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: DVec2,
    pub to: DVec2,
    pub strength: f64,
}

/// Pairs `(i, j)` with `i < j` closer than `max_distance`, in index order.
///
/// Distances are compared squared; the square root is taken only for pairs
/// that produce a link.
pub fn links(entities: &[Entity], max_distance: f64) -> impl Iterator<Item = Link> + '_ {
    let max_sq = max_distance * max_distance;
    (0..entities.len()).flat_map(move |i| {
        let a = entities[i].position;
        entities[i + 1..].iter().filter_map(move |other| {
            let b = other.position;
            let d_sq = a.distance_squared(b);
            (d_sq < max_sq).then(|| Link {
                from: a,
                to: b,
                strength: link_strength(d_sq.sqrt(), max_distance),
            })
        })
    })
}

/// Strokes every link of `entities` onto `surface`.
pub fn draw_links(
    entities: &[Entity],
    surface: &mut dyn Surface,
    max_distance: f64,
    style: &LinkStyle,
) -> usize {
    let mut drawn = 0;
    for link in links(entities, max_distance) {
        let (width, color) = style.stroke(link.strength);
        surface.stroke_line(link.from, link.to, width, color);
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_core::surface::{DrawCommand, Recording};

    fn at(x: f64, y: f64) -> Entity {
        Entity::new(DVec2::new(x, y), DVec2::ZERO, 1.0, Rgba::WHITE)
    }

    #[test]
    fn strength_is_one_at_zero_and_zero_at_max() {
        assert_eq!(link_strength(0.0, 120.0), 1.0);
        assert_eq!(link_strength(120.0, 120.0), 0.0);
        assert_eq!(link_strength(500.0, 120.0), 0.0);
        assert!((link_strength(60.0, 120.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_positive_max_never_links() {
        assert_eq!(link_strength(0.0, 0.0), 0.0);
        let es = [at(0.0, 0.0), at(0.0, 0.0)];
        assert_eq!(links(&es, 0.0).count(), 0);
    }

    #[test]
    fn only_close_pairs_link_once() {
        let es = [at(0.0, 0.0), at(30.0, 40.0), at(300.0, 0.0)];
        let found: Vec<Link> = links(&es, 120.0).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].from, DVec2::ZERO);
        assert_eq!(found[0].to, DVec2::new(30.0, 40.0));
        // d = 50
        assert!((found[0].strength - (1.0 - 50.0 / 120.0)).abs() < 1e-12);
    }

    #[test]
    fn pair_exactly_at_threshold_is_not_linked() {
        let es = [at(0.0, 0.0), at(120.0, 0.0)];
        assert_eq!(links(&es, 120.0).count(), 0);
    }

    #[test]
    fn all_pairs_of_a_tight_cluster_link() {
        let es: Vec<Entity> = (0..6).map(|i| at(i as f64, 0.0)).collect();
        assert_eq!(links(&es, 120.0).count(), 15);
    }

    #[test]
    fn opacity_falloff_replaces_alpha() {
        let style = LinkStyle {
            color: Rgba::parse("rgba(25, 118, 210, 0.3)").unwrap(),
            width: 1.0,
            falloff: LinkFalloff::Opacity,
        };
        let (w, c) = style.stroke(0.75);
        assert_eq!(w, 1.0);
        assert!((c.a - 0.75).abs() < 1e-12);
    }

    #[test]
    fn width_falloff_scales_width() {
        let style = LinkStyle {
            color: Rgba::WHITE,
            width: 0.5,
            falloff: LinkFalloff::Width,
        };
        let (w, c) = style.stroke(0.5);
        assert!((w - 0.25).abs() < 1e-12);
        assert_eq!(c, Rgba::WHITE);
    }

    #[test]
    fn draw_links_strokes_each_link() {
        let es = [at(0.0, 0.0), at(10.0, 0.0), at(20.0, 0.0)];
        let style = LinkStyle {
            color: Rgba::WHITE,
            width: 1.0,
            falloff: LinkFalloff::Width,
        };
        let mut rec = Recording::new();
        assert_eq!(draw_links(&es, &mut rec, 15.0, &style), 2);
        assert!(rec
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::Line { .. })));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strength_is_linear_and_strictly_decreasing(
                max in 1.0_f64..500.0,
                a in 0.0_f64..1.0,
                b in 0.0_f64..1.0,
            ) {
                prop_assume!((a - b).abs() > 1e-9);
                let (near, far) = if a < b { (a * max, b * max) } else { (b * max, a * max) };
                let s_near = link_strength(near, max);
                let s_far = link_strength(far, max);
                prop_assert!(s_near > s_far);
                prop_assert!((s_near - (1.0 - near / max)).abs() < 1e-12);
            }

            #[test]
            fn nothing_at_or_beyond_max(max in 1.0_f64..500.0, extra in 0.0_f64..1000.0) {
                prop_assert_eq!(link_strength(max + extra, max), 0.0);
            }
        }
    }
}
