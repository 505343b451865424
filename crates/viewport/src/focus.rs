use foundation::Aabb2;
use foundation::math::{Vec2, positive_finite};
use tracing::debug;

use crate::{TransformParams, ViewportError, ViewportState};

/// Programmatic viewport positioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    /// Zoom to `scale` times the fit, centered on the design-space point at
    /// fractions (`x`, `y`) of the map width and height.
    Point { scale: f64, x: f64, y: f64 },
    /// Fit a design-space rectangle into the container.
    Area(Aabb2),
}

impl ViewportState {
    /// Centers the focus target in the container.
    ///
    /// The requested scale snaps down to the highest zoom ladder level that
    /// does not exceed it, so `scale == base_scale * factor_at(zoom_cur_step)`
    /// holds afterwards.
    pub fn set_focus(&mut self, focus: Focus) -> Result<TransformParams, ViewportError> {
        let (map_w, map_h) = self.map_size();
        let (width, height) = self.container_size();
        let base = self.base_scale();

        let (target, anchor) = match focus {
            Focus::Point { scale, x, y } => {
                let scale = positive_finite(scale).ok_or(ViewportError::InvalidScale(scale))?;
                if !(x.is_finite() && y.is_finite()) {
                    return Err(ViewportError::InvalidFocus("center must be finite"));
                }
                (scale * base, Vec2::new(x * map_w, y * map_h))
            }
            Focus::Area(area) => {
                if !area.is_valid() {
                    return Err(ViewportError::InvalidFocus("area must have a positive size"));
                }
                let scale = (width / area.width()).min(height / area.height());
                (scale, area.center())
            }
        };

        let zoom = self.zoom();
        let step = zoom.step_below(target / base);
        let scale = base * zoom.factor_at(step);
        self.place(
            scale,
            width / (2.0 * scale) - anchor.x,
            height / (2.0 * scale) - anchor.y,
            step,
        );
        debug!(scale, step, x = anchor.x, y = anchor.y, "viewport focused");
        Ok(self.apply_transform())
    }
}

#[cfg(test)]
mod tests {
    use super::Focus;
    use crate::{ViewportError, ViewportState, ZoomConfig};
    use foundation::Aabb2;
    use foundation::math::Vec2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn view() -> ViewportState {
        ViewportState::new(1000.0, 500.0, 800.0, 400.0, ZoomConfig::default()).unwrap()
    }

    #[test]
    fn point_focus_centers_target() {
        let mut v = view();
        let p = v.set_focus(Focus::Point { scale: 1.96, x: 0.5, y: 0.5 }).unwrap();
        assert_close(p.scale, 0.8 * 1.96, 1e-12);
        assert_eq!(v.zoom_cur_step(), 3);
        // Map center lands on the container center.
        assert_close((500.0 + p.trans_x) * p.scale, 400.0, 1e-9);
        assert_close((250.0 + p.trans_y) * p.scale, 200.0, 1e-9);
    }

    #[test]
    fn point_focus_near_edge_is_clamped() {
        let mut v = view();
        let p = v.set_focus(Focus::Point { scale: 2.0, x: 0.0, y: 0.0 }).unwrap();
        let b = v.translation_bounds();
        assert_eq!(p.trans_x, b.max_x);
        assert_eq!(p.trans_y, b.max_y);
    }

    #[test]
    fn scale_is_limited_to_zoom_ladder() {
        let mut v = view();
        let p = v.set_focus(Focus::Point { scale: 50.0, x: 0.5, y: 0.5 }).unwrap();
        assert_close(p.scale, 0.8 * 1.4f64.powi(3), 1e-12);
        assert_eq!(v.zoom_cur_step(), 4);

        let p = v.set_focus(Focus::Point { scale: 0.2, x: 0.5, y: 0.5 }).unwrap();
        assert_close(p.scale, 0.8, 1e-12);
        assert_eq!(v.zoom_cur_step(), 1);
    }

    #[test]
    fn off_ladder_scale_snaps_down() {
        let mut v = view();
        let p = v.set_focus(Focus::Point { scale: 1.2, x: 0.5, y: 0.5 }).unwrap();
        assert_eq!(v.zoom_cur_step(), 1);
        assert_close(p.scale, v.base_scale(), 1e-12);
        assert!(v.zoom_out().is_none());

        v.set_focus(Focus::Point { scale: 1.7, x: 0.3, y: 0.6 }).unwrap();
        assert_eq!(v.zoom_cur_step(), 2);
        assert_close(v.scale(), 0.8 * 1.4, 1e-12);
        v.zoom_out().expect("one level above the fit");
        assert_eq!(v.zoom_cur_step(), 1);
        assert_close(v.scale(), v.base_scale(), 1e-12);
    }

    #[test]
    fn area_focus_fits_rectangle() {
        let mut v = view();
        let area = Aabb2::new(Vec2::new(400.0, 200.0), Vec2::new(700.0, 350.0));
        let p = v.set_focus(Focus::Area(area)).unwrap();
        // 800/300 = 2.67 and 400/150 = 2.67, above the ladder top.
        assert_close(p.scale, 0.8 * 1.4f64.powi(3), 1e-12);
        assert_close((550.0 + p.trans_x) * p.scale, 400.0, 1e-9);
    }

    #[test]
    fn invalid_focus_is_rejected() {
        let mut v = view();
        let before = v.clone();
        assert!(matches!(
            v.set_focus(Focus::Point { scale: 0.0, x: 0.5, y: 0.5 }),
            Err(ViewportError::InvalidScale(_))
        ));
        let empty = Aabb2::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        assert!(matches!(
            v.set_focus(Focus::Area(empty)),
            Err(ViewportError::InvalidFocus(_))
        ));
        assert_eq!(v, before);
    }
}
