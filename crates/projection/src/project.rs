use catalog::{Inset, MapDataset};
use foundation::math::Vec2;
use viewport::TransformParams;

use crate::miller;

/// First inset (declaration order) whose open bbox contains the projected
/// point.
pub fn inset_for_point(dataset: &MapDataset, p: Vec2) -> Option<(usize, &Inset)> {
    dataset
        .insets
        .iter()
        .enumerate()
        .find(|(_, inset)| inset.bbox().contains_open(p))
}

/// Design-space position of a geographic point, before any viewport
/// transform. `None` when the point falls outside every inset.
pub fn design_point(dataset: &MapDataset, lat: f64, lng: f64) -> Option<Vec2> {
    let p = miller::forward(lat, lng, dataset.central_meridian());
    let (_, inset) = inset_for_point(dataset, p)?;
    let bbox = inset.bbox();
    Some(Vec2::new(
        (p.x - bbox.min.x) / bbox.width() * inset.width + inset.left,
        (p.y - bbox.min.y) / bbox.height() * inset.height + inset.top,
    ))
}

pub fn to_pixel(design: Vec2, params: &TransformParams) -> Vec2 {
    Vec2::new(
        (design.x + params.trans_x) * params.scale,
        (design.y + params.trans_y) * params.scale,
    )
}

pub fn from_pixel(pixel: Vec2, params: &TransformParams) -> Vec2 {
    Vec2::new(
        pixel.x / params.scale - params.trans_x,
        pixel.y / params.scale - params.trans_y,
    )
}

/// Geographic point to container pixel under the given viewport transform.
///
/// `None` means "off map": the point is in none of the dataset's insets.
pub fn project(
    dataset: &MapDataset,
    params: &TransformParams,
    lat: f64,
    lng: f64,
) -> Option<Vec2> {
    design_point(dataset, lat, lng).map(|d| to_pixel(d, params))
}

/// Container pixel back to `(lat, lng)`.
///
/// The inset is chosen by its placement rectangle in design space, first
/// match wins.
pub fn unproject(
    dataset: &MapDataset,
    params: &TransformParams,
    pixel: Vec2,
) -> Option<(f64, f64)> {
    let design = from_pixel(pixel, params);
    let inset = dataset
        .insets
        .iter()
        .find(|inset| inset.placement().contains_closed(design))?;
    let bbox = inset.bbox();
    let p = Vec2::new(
        (design.x - inset.left) / inset.width * bbox.width() + bbox.min.x,
        (design.y - inset.top) / inset.height * bbox.height() + bbox.min.y,
    );
    Some(miller::inverse(p, dataset.central_meridian()))
}

/// Dataset-bound convenience wrapper for repeated projection calls.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    dataset: &'a MapDataset,
}

impl<'a> Projector<'a> {
    pub fn new(dataset: &'a MapDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a MapDataset {
        self.dataset
    }

    pub fn project(&self, params: &TransformParams, lat: f64, lng: f64) -> Option<Vec2> {
        project(self.dataset, params, lat, lng)
    }

    pub fn unproject(&self, params: &TransformParams, pixel: Vec2) -> Option<(f64, f64)> {
        unproject(self.dataset, params, pixel)
    }

    pub fn inset_index(&self, lat: f64, lng: f64) -> Option<usize> {
        let p = miller::forward(lat, lng, self.dataset.central_meridian());
        inset_for_point(self.dataset, p).map(|(i, _)| i)
    }
}
