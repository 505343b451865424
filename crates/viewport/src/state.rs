use foundation::math::positive_finite;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{ViewportError, ZoomConfig};

/// Parameters pushed to the rendering backend after every clamp.
///
/// A design-space point `p` lands on pixel `(p + trans) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformParams {
    pub scale: f64,
    pub trans_x: f64,
    pub trans_y: f64,
}

/// Letterbox fit of the map into a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFit {
    pub scale: f64,
    pub trans_x: f64,
    pub trans_y: f64,
}

/// Legal translation range for the current scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Computes the aspect-preserving fit of a `map_w`x`map_h` design into a
/// `container_w`x`container_h` container.
///
/// A relatively wider container fits to height and centers horizontally;
/// otherwise the map fits to width and centers vertically. Translations are
/// in pre-scale units.
pub fn compute_base_fit(
    container_w: f64,
    container_h: f64,
    map_w: f64,
    map_h: f64,
) -> Result<BaseFit, ViewportError> {
    let (Some(cw), Some(ch)) = (positive_finite(container_w), positive_finite(container_h)) else {
        return Err(ViewportError::DegenerateContainer {
            width: container_w,
            height: container_h,
        });
    };
    let (Some(mw), Some(mh)) = (positive_finite(map_w), positive_finite(map_h)) else {
        return Err(ViewportError::DegenerateMap {
            width: map_w,
            height: map_h,
        });
    };

    if cw / ch > mw / mh {
        let scale = ch / mh;
        Ok(BaseFit {
            scale,
            trans_x: (cw - mw * scale).abs() / (2.0 * scale),
            trans_y: 0.0,
        })
    } else {
        let scale = cw / mw;
        Ok(BaseFit {
            scale,
            trans_x: 0.0,
            trans_y: (ch - mh * scale).abs() / (2.0 * scale),
        })
    }
}

/// Pan/zoom state of one rendered map.
///
/// Invariants held between calls:
/// - `1 <= zoom_cur_step <= zoom.max_step`
/// - after any mutating call the translation lies inside
///   [`ViewportState::translation_bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    scale: f64,
    trans_x: f64,
    trans_y: f64,
    base_scale: f64,
    base_trans_x: f64,
    base_trans_y: f64,
    zoom_cur_step: u32,
    width: f64,
    height: f64,
    map_width: f64,
    map_height: f64,
    zoom: ZoomConfig,
}

impl ViewportState {
    /// Fits a `map_width`x`map_height` design into the container and clamps.
    pub fn new(
        map_width: f64,
        map_height: f64,
        container_width: f64,
        container_height: f64,
        zoom: ZoomConfig,
    ) -> Result<Self, ViewportError> {
        zoom.validate()?;
        if positive_finite(map_width).is_none() || positive_finite(map_height).is_none() {
            return Err(ViewportError::DegenerateMap {
                width: map_width,
                height: map_height,
            });
        }
        let mut state = Self {
            scale: 1.0,
            trans_x: 0.0,
            trans_y: 0.0,
            base_scale: 1.0,
            base_trans_x: 0.0,
            base_trans_y: 0.0,
            zoom_cur_step: 1,
            width: 0.0,
            height: 0.0,
            map_width,
            map_height,
            zoom,
        };
        state.resize(container_width, container_height)?;
        Ok(state)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn trans_x(&self) -> f64 {
        self.trans_x
    }

    pub fn trans_y(&self) -> f64 {
        self.trans_y
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn base_trans_x(&self) -> f64 {
        self.base_trans_x
    }

    pub fn base_trans_y(&self) -> f64 {
        self.base_trans_y
    }

    pub fn zoom_cur_step(&self) -> u32 {
        self.zoom_cur_step
    }

    pub fn zoom(&self) -> ZoomConfig {
        self.zoom
    }

    pub fn container_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn map_size(&self) -> (f64, f64) {
        (self.map_width, self.map_height)
    }

    /// Current scale relative to the fit.
    pub fn zoom_factor(&self) -> f64 {
        self.scale / self.base_scale
    }

    pub fn params(&self) -> TransformParams {
        TransformParams {
            scale: self.scale,
            trans_x: self.trans_x,
            trans_y: self.trans_y,
        }
    }

    /// Recomputes the fit for a new container size.
    ///
    /// The current scale and translation are rescaled by the change in base
    /// scale so the zoom level relative to the fit survives the resize.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<TransformParams, ViewportError> {
        let fit = compute_base_fit(width, height, self.map_width, self.map_height)?;
        let ratio = fit.scale / self.base_scale;

        self.width = width;
        self.height = height;
        self.base_scale = fit.scale;
        self.base_trans_x = fit.trans_x;
        self.base_trans_y = fit.trans_y;
        self.scale *= ratio;
        self.trans_x *= ratio;
        self.trans_y *= ratio;

        debug!(
            width,
            height,
            base_scale = self.base_scale,
            scale = self.scale,
            "viewport resized"
        );
        Ok(self.apply_transform())
    }

    pub fn translation_bounds(&self) -> TranslationBounds {
        let (min_x, max_x) = axis_bounds(self.map_width, self.scale, self.width);
        let (min_y, max_y) = axis_bounds(self.map_height, self.scale, self.height);
        TranslationBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Clamps the translation so no empty space shows past the map edges.
    ///
    /// On an axis where the scaled map fits inside the container the
    /// translation is pinned to the centered value.
    pub fn apply_transform(&mut self) -> TransformParams {
        let b = self.translation_bounds();
        self.trans_x = clamp_axis(self.trans_x, b.min_x, b.max_x);
        self.trans_y = clamp_axis(self.trans_y, b.min_y, b.max_y);
        trace!(
            scale = self.scale,
            trans_x = self.trans_x,
            trans_y = self.trans_y,
            "transform applied"
        );
        self.params()
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<TransformParams, ViewportError> {
        let scale = positive_finite(scale).ok_or(ViewportError::InvalidScale(scale))?;
        self.scale = scale;
        Ok(self.apply_transform())
    }

    /// One step in, keeping the container center fixed. `None` at the top of
    /// the ladder.
    pub fn zoom_in(&mut self) -> Option<TransformParams> {
        if self.zoom_cur_step >= self.zoom.max_step {
            return None;
        }
        let step = self.zoom.step;
        self.trans_x -= (self.width / self.scale - self.width / (self.scale * step)) / 2.0;
        self.trans_y -= (self.height / self.scale - self.height / (self.scale * step)) / 2.0;
        self.scale *= step;
        self.zoom_cur_step += 1;
        Some(self.apply_transform())
    }

    /// One step out, keeping the container center fixed. `None` at step 1.
    pub fn zoom_out(&mut self) -> Option<TransformParams> {
        if self.zoom_cur_step <= 1 {
            return None;
        }
        let step = self.zoom.step;
        self.trans_x += (self.width / (self.scale / step) - self.width / self.scale) / 2.0;
        self.trans_y += (self.height / (self.scale / step) - self.height / self.scale) / 2.0;
        self.scale /= step;
        self.zoom_cur_step -= 1;
        Some(self.apply_transform())
    }

    /// Drag by a pixel delta.
    pub fn pan_by(&mut self, dx_px: f64, dy_px: f64) -> TransformParams {
        if dx_px.is_finite() && dy_px.is_finite() {
            self.trans_x += dx_px / self.scale;
            self.trans_y += dy_px / self.scale;
        }
        self.apply_transform()
    }

    /// Moves to an absolute translation (pre-scale units), then clamps.
    pub fn translate_to(&mut self, trans_x: f64, trans_y: f64) -> TransformParams {
        if trans_x.is_finite() && trans_y.is_finite() {
            self.trans_x = trans_x;
            self.trans_y = trans_y;
        }
        self.apply_transform()
    }

    /// Back to the fit: base scale, base translation, zoom step 1.
    pub fn reset(&mut self) -> TransformParams {
        self.scale = self.base_scale;
        self.trans_x = self.base_trans_x;
        self.trans_y = self.base_trans_y;
        self.zoom_cur_step = 1;
        debug!(scale = self.scale, "viewport reset");
        self.apply_transform()
    }

    pub(crate) fn place(&mut self, scale: f64, trans_x: f64, trans_y: f64, step: u32) {
        self.scale = scale;
        self.trans_x = trans_x;
        self.trans_y = trans_y;
        self.zoom_cur_step = step.clamp(1, self.zoom.max_step.max(1));
    }
}

fn axis_bounds(design: f64, scale: f64, container: f64) -> (f64, f64) {
    let slack = container - design * scale;
    if slack >= 0.0 {
        let centered = slack / (2.0 * scale);
        (centered, centered)
    } else {
        (slack / scale, 0.0)
    }
}

fn clamp_axis(v: f64, min: f64, max: f64) -> f64 {
    if v > max {
        max
    } else if v < min {
        min
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewportState, compute_base_fit};
    use crate::{ViewportError, ZoomConfig};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_within_bounds(v: &ViewportState) {
        let b = v.translation_bounds();
        assert!(v.trans_x() >= b.min_x - 1e-9 && v.trans_x() <= b.max_x + 1e-9);
        assert!(v.trans_y() >= b.min_y - 1e-9 && v.trans_y() <= b.max_y + 1e-9);
    }

    fn view(cw: f64, ch: f64) -> ViewportState {
        ViewportState::new(1000.0, 500.0, cw, ch, ZoomConfig::default()).expect("viewport")
    }

    #[test]
    fn matching_aspect_fits_exactly() {
        let fit = compute_base_fit(800.0, 400.0, 1000.0, 500.0).unwrap();
        assert_close(fit.scale, 0.8, 1e-12);
        assert_eq!(fit.trans_x, 0.0);
        assert_eq!(fit.trans_y, 0.0);

        let v = view(800.0, 400.0);
        assert_close(v.scale(), 0.8, 1e-12);
        assert_eq!(v.trans_x(), 0.0);
        assert_eq!(v.trans_y(), 0.0);
        assert_eq!(v.zoom_cur_step(), 1);
    }

    #[test]
    fn wide_container_centers_horizontally() {
        let fit = compute_base_fit(1200.0, 400.0, 1000.0, 500.0).unwrap();
        assert_close(fit.scale, 0.8, 1e-12);
        // 1200 - 800 = 400 px of slack, 200 px each side, / 0.8.
        assert_close(fit.trans_x, 250.0, 1e-9);
        assert_eq!(fit.trans_y, 0.0);

        let v = view(1200.0, 400.0);
        assert_close(v.trans_x(), 250.0, 1e-9);
    }

    #[test]
    fn tall_container_centers_vertically() {
        let fit = compute_base_fit(500.0, 500.0, 1000.0, 500.0).unwrap();
        assert_close(fit.scale, 0.5, 1e-12);
        assert_eq!(fit.trans_x, 0.0);
        assert_close(fit.trans_y, 250.0, 1e-9);
    }

    #[test]
    fn degenerate_sizes_are_reported() {
        assert!(matches!(
            compute_base_fit(0.0, 400.0, 1000.0, 500.0),
            Err(ViewportError::DegenerateContainer { .. })
        ));
        assert!(matches!(
            compute_base_fit(10.0, f64::NAN, 1000.0, 500.0),
            Err(ViewportError::DegenerateContainer { .. })
        ));
        assert!(matches!(
            ViewportState::new(0.0, 500.0, 800.0, 400.0, ZoomConfig::default()),
            Err(ViewportError::DegenerateMap { .. })
        ));

        let mut v = view(800.0, 400.0);
        let before = v.clone();
        assert!(v.resize(0.0, 0.0).is_err());
        assert_eq!(v, before);
    }

    #[test]
    fn apply_transform_is_idempotent() {
        let mut v = view(800.0, 400.0);
        v.zoom_in();
        v.pan_by(-137.0, 51.0);
        let a = v.apply_transform();
        let b = v.apply_transform();
        assert_eq!(a, b);
    }

    #[test]
    fn zoom_round_trip_restores_scale_and_step() {
        let mut v = view(800.0, 400.0);
        v.zoom_in();
        let scale = v.scale();
        let step = v.zoom_cur_step();
        v.zoom_in().expect("zoom in");
        v.zoom_out().expect("zoom out");
        assert_eq!(v.zoom_cur_step(), step);
        assert_close(v.scale(), scale, 1e-12);
    }

    #[test]
    fn zoom_is_a_no_op_at_the_bounds() {
        let mut v = view(800.0, 400.0);
        let before = v.clone();
        assert!(v.zoom_out().is_none());
        assert_eq!(v, before);

        for _ in 0..3 {
            v.zoom_in().expect("below max");
        }
        assert_eq!(v.zoom_cur_step(), 4);
        let top = v.clone();
        assert!(v.zoom_in().is_none());
        assert_eq!(v, top);
        assert_close(v.scale(), 0.8 * 1.4f64.powi(3), 1e-12);
    }

    #[test]
    fn zoom_keeps_center_fixed() {
        let mut v = view(800.0, 400.0);
        v.zoom_in();
        // Design point under the container center before and after a step.
        let center_before = 400.0 / v.scale() - v.trans_x();
        v.zoom_in();
        let center_after = 400.0 / v.scale() - v.trans_x();
        assert_close(center_before, center_after, 1e-9);
    }

    #[test]
    fn pan_clamps_to_map_edges() {
        let mut v = view(800.0, 400.0);
        // At the fit the map exactly covers the container: panning is pinned.
        let p = v.pan_by(500.0, -500.0);
        assert_eq!((p.trans_x, p.trans_y), (0.0, 0.0));

        v.zoom_in();
        v.translate_to(1.0e6, 1.0e6);
        assert_within_bounds(&v);
        assert_eq!(v.trans_x(), 0.0);
        assert_eq!(v.trans_y(), 0.0);

        v.translate_to(-1.0e6, -1.0e6);
        assert_within_bounds(&v);
        let b = v.translation_bounds();
        assert_close(v.trans_x(), (800.0 - 1000.0 * v.scale()) / v.scale(), 1e-9);
        assert_eq!(v.trans_x(), b.min_x);
        assert_eq!(v.trans_y(), b.min_y);
    }

    #[test]
    fn small_map_is_pinned_to_center() {
        let mut v = view(1200.0, 400.0);
        let centered = v.trans_x();
        v.pan_by(300.0, 0.0);
        assert_eq!(v.trans_x(), centered);
    }

    #[test]
    fn resize_preserves_relative_zoom() {
        let mut v = view(800.0, 400.0);
        v.zoom_in();
        v.zoom_in();
        let factor = v.zoom_factor();
        v.resize(400.0, 200.0).unwrap();
        assert_close(v.base_scale(), 0.4, 1e-12);
        assert_close(v.zoom_factor(), factor, 1e-12);
        assert_eq!(v.zoom_cur_step(), 3);
        assert_within_bounds(&v);
    }

    #[test]
    fn reset_returns_to_fit() {
        let mut v = view(800.0, 400.0);
        v.zoom_in();
        v.pan_by(-40.0, -40.0);
        let p = v.reset();
        assert_close(p.scale, v.base_scale(), 1e-12);
        assert_eq!(p.trans_x, v.base_trans_x());
        assert_eq!(p.trans_y, v.base_trans_y());
        assert_eq!(v.zoom_cur_step(), 1);
    }

    #[test]
    fn set_scale_rejects_non_positive() {
        let mut v = view(800.0, 400.0);
        assert_eq!(v.set_scale(0.0), Err(ViewportError::InvalidScale(0.0)));
        assert!(v.set_scale(-2.0).is_err());
        let p = v.set_scale(2.0).unwrap();
        assert_eq!(p.scale, 2.0);
    }
}
