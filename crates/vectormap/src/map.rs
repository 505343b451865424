use std::collections::BTreeMap;
use std::sync::Arc;

use catalog::{CatalogError, DatasetProvider, MapDataset};
use foundation::handles::Handle;
use foundation::math::Vec2;
use foundation::{Aabb2, Rgb};
use layers::{ColorScale, DataValue, Fill, NormalizeFunction, compute_fills_pinned};
use projection::Projector;
use render::{CircleAttrs, RenderBackend};
use runtime::EventBus;
use scene::components::{StateStyles, Style, StyleValue};
use scene::{EntityKind, EntityRef, Interactive, MarkerEntity, RegionEntity};
use tracing::{debug, info, warn};
use viewport::{Focus, TransformParams, ViewportError, ViewportState};

use crate::interaction::{InteractionState, Label, MapEvent};
use crate::{FocusOption, MapError, MapOptions, MarkerSpec};

/// Outcome of a bulk update keyed by region code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Codes with no matching region. They were skipped.
    pub unknown_regions: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_regions.is_empty()
    }

    fn log(&self, what: &str) {
        if !self.is_clean() {
            warn!(what, unknown = ?self.unknown_regions, "unknown region codes ignored");
        }
    }
}

/// One interactive map drawn through a [`RenderBackend`].
pub struct VectorMap<B: RenderBackend> {
    pub(crate) map_id: String,
    pub(crate) dataset: Arc<MapDataset>,
    pub(crate) backend: B,
    pub(crate) viewport: ViewportState,
    pub(crate) color_scale: ColorScale,
    pub(crate) value_min: Option<f64>,
    pub(crate) value_max: Option<f64>,
    pub(crate) values: Option<BTreeMap<String, DataValue>>,
    pub(crate) region_styles: StateStyles,
    pub(crate) regions: BTreeMap<String, RegionEntity>,
    pub(crate) markers: Vec<MarkerEntity>,
    pub(crate) marker_group: Option<Handle>,
    pub(crate) regions_selectable: bool,
    pub(crate) markers_selectable: bool,
    pub(crate) background_color: String,
    pub(crate) events: EventBus<MapEvent>,
    pub(crate) interaction: InteractionState,
    pub(crate) label: Label,
}

impl<B: RenderBackend> VectorMap<B> {
    /// Builds the map for `options.map` inside a `width`x`height` container.
    ///
    /// Regions are created in code order, then markers, then the initial
    /// colors, values and focus are applied and the transform is pushed.
    pub fn new(
        provider: &dyn DatasetProvider,
        backend: B,
        options: MapOptions,
        width: f64,
        height: f64,
    ) -> Result<Self, MapError> {
        let dataset = provider
            .dataset(&options.map)
            .ok_or_else(|| MapError::UnknownMap(options.map.clone()))?;
        dataset.validate().map_err(|reason| CatalogError::Invalid {
            id: options.map.clone(),
            reason,
        })?;
        let viewport = ViewportState::new(
            dataset.width,
            dataset.height,
            width,
            height,
            options.zoom()?,
        )?;
        let color_scale = ColorScale::new(options.scale_colors.clone())?
            .with_normalize(options.normalize_function.into())
            .with_domain(
                options.value_min.unwrap_or(0.0),
                options.value_max.unwrap_or(1.0),
            );

        let mut map = Self {
            map_id: options.map.clone(),
            dataset,
            backend,
            viewport,
            color_scale,
            value_min: options.value_min,
            value_max: options.value_max,
            values: None,
            region_styles: options.region_styles(),
            regions: BTreeMap::new(),
            markers: Vec::new(),
            marker_group: None,
            regions_selectable: options.regions_selectable,
            markers_selectable: options.markers_selectable,
            background_color: options.background_color.clone(),
            events: EventBus::new(),
            interaction: InteractionState::default(),
            label: Label::default(),
        };

        map.backend.set_size(width, height);
        map.backend.set_background_color(&options.background_color);
        map.create_regions();
        map.create_markers(&options.markers, &options.marker_styles());
        map.set_colors(&options.colors);
        if !options.values.is_empty() {
            map.set_values(options.values);
        }
        match &options.focus {
            Some(focus) => {
                map.set_focus(focus)?;
            }
            None => {
                map.apply_transform();
            }
        }

        info!(
            map = %map.map_id,
            regions = map.regions.len(),
            markers = map.markers.len(),
            "vector map created"
        );
        Ok(map)
    }

    fn create_regions(&mut self) {
        let dataset = Arc::clone(&self.dataset);
        for (code, path) in &dataset.paths {
            let handle = self.backend.add_path(&path.path, &self.region_styles.initial);
            self.regions.insert(
                code.clone(),
                RegionEntity::new(code, &path.name, handle, self.region_styles.clone()),
            );
        }
    }

    fn create_markers(&mut self, specs: &[MarkerSpec], base: &StateStyles) {
        if specs.is_empty() {
            return;
        }
        let group = self.backend.add_group();
        self.marker_group = Some(group);

        for (index, spec) in specs.iter().enumerate() {
            let mut styles = base.clone();
            if let Some(overrides) = spec.style() {
                styles.initial.merge(overrides);
            }
            let [lat, lng] = spec.lat_lng();
            let point = self.lat_lng_to_point(lat, lng);
            if point.is_none() {
                warn!(index, lat, lng, "marker falls outside every inset, hidden");
            }
            let center = place_marker(&mut styles.initial, point);
            let handle = self
                .backend
                .add_circle(CircleAttrs { center }, &styles.initial, Some(group));
            self.markers.push(MarkerEntity::new(
                index,
                [lat, lng],
                spec.name().map(str::to_string),
                handle,
                styles,
            ));
        }
    }

    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    pub fn dataset(&self) -> &Arc<MapDataset> {
        &self.dataset
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn color_scale(&self) -> &ColorScale {
        &self.color_scale
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// The values last passed to [`Self::set_values`], if not reset since.
    pub fn values(&self) -> Option<&BTreeMap<String, DataValue>> {
        self.values.as_ref()
    }

    pub fn region(&self, code: &str) -> Option<&RegionEntity> {
        self.regions.get(code)
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionEntity> + '_ {
        self.regions.values()
    }

    pub fn markers(&self) -> &[MarkerEntity] {
        &self.markers
    }

    pub fn marker_group(&self) -> Option<Handle> {
        self.marker_group
    }

    pub fn region_name(&self, code: &str) -> Option<&str> {
        self.dataset.region_name(code)
    }

    pub fn is_selectable(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Region => self.regions_selectable,
            EntityKind::Marker => self.markers_selectable,
        }
    }

    /// Sorted codes of the selected regions.
    pub fn selected_regions(&self) -> Vec<String> {
        self.regions
            .values()
            .filter(|r| r.is_selected())
            .map(|r| r.code.clone())
            .collect()
    }

    pub fn selected_markers(&self) -> Vec<usize> {
        self.markers
            .iter()
            .filter(|m| m.is_selected())
            .map(|m| m.index)
            .collect()
    }

    pub fn set_colors(&mut self, colors: &BTreeMap<String, String>) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (code, color) in colors {
            if !self.apply_fill(code, StyleValue::from(color.as_str())) {
                report.unknown_regions.push(code.clone());
            }
        }
        report.log("colors");
        report
    }

    pub fn set_color(&mut self, code: &str, color: &str) -> Result<(), MapError> {
        if self.apply_fill(code, StyleValue::from(color)) {
            Ok(())
        } else {
            Err(MapError::UnknownRegion(code.to_string()))
        }
    }

    fn apply_fill(&mut self, code: &str, fill: StyleValue) -> bool {
        let Some(region) = self.regions.get_mut(code) else {
            return false;
        };
        region.set_style("fill", fill);
        self.backend
            .set_style(region.handle(), &region.computed_style());
        true
    }

    /// Fill configured for regions in their initial state.
    pub fn default_fill(&self) -> StyleValue {
        self.region_styles
            .initial
            .get("fill")
            .cloned()
            .unwrap_or_else(|| StyleValue::from("white"))
    }

    /// Recomputes the color domain from `values` and recolors those regions.
    ///
    /// Zero or unparseable values get the default fill.
    pub fn set_values(&mut self, values: BTreeMap<String, DataValue>) -> ValidationReport {
        let choropleth = compute_fills_pinned(
            &mut self.color_scale,
            &values,
            self.value_min,
            self.value_max,
        );
        debug!(domain = ?choropleth.domain, count = values.len(), "values applied");

        let default_fill = self.default_fill();
        let mut report = ValidationReport::default();
        for (code, fill) in &choropleth.fills {
            let style = match fill {
                Fill::Scaled(rgb) => StyleValue::from(rgb.to_hex()),
                Fill::Default => default_fill.clone(),
            };
            if !self.apply_fill(code, style) {
                report.unknown_regions.push(code.clone());
            }
        }
        report.log("values");
        self.values = Some(values);
        report
    }

    fn reapply_values(&mut self) {
        if let Some(values) = self.values.take() {
            self.set_values(values);
        }
    }

    pub fn set_scale_colors<S: AsRef<str>>(&mut self, colors: &[S]) -> Result<(), MapError> {
        let parsed = colors
            .iter()
            .map(|c| Rgb::parse_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.color_scale.set_colors(parsed)?;
        self.reapply_values();
        Ok(())
    }

    pub fn set_normalize_function(&mut self, normalize: impl Into<NormalizeFunction>) {
        self.color_scale.set_normalize_function(normalize.into());
        self.reapply_values();
    }

    pub fn set_background_color(&mut self, color: &str) {
        self.background_color = color.to_string();
        self.backend.set_background_color(color);
    }

    /// New container size; the zoom level relative to the fit is kept.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<TransformParams, MapError> {
        let params = self.viewport.resize(width, height)?;
        self.backend.set_size(width, height);
        Ok(self.push_transform(params))
    }

    /// Clamps the current transform and pushes it to the backend.
    pub fn apply_transform(&mut self) -> TransformParams {
        let params = self.viewport.apply_transform();
        self.push_transform(params)
    }

    fn push_transform(&mut self, params: TransformParams) -> TransformParams {
        self.backend.apply_transform_params(params);
        self.reposition_markers();
        params
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<TransformParams, MapError> {
        let params = self.viewport.set_scale(scale)?;
        Ok(self.push_transform(params))
    }

    pub fn zoom_in(&mut self) -> Option<TransformParams> {
        let params = self.viewport.zoom_in()?;
        Some(self.push_transform(params))
    }

    pub fn zoom_out(&mut self) -> Option<TransformParams> {
        let params = self.viewport.zoom_out()?;
        Some(self.push_transform(params))
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> TransformParams {
        let params = self.viewport.pan_by(dx, dy);
        self.push_transform(params)
    }

    /// Restores the default fill on every region and returns the viewport to
    /// the fit.
    ///
    /// Stored values are kept, so a later `set_scale_colors` or
    /// `set_normalize_function` recolors the regions from them.
    pub fn reset(&mut self) -> TransformParams {
        let default_fill = self.default_fill();
        for region in self.regions.values_mut() {
            region.set_style("fill", default_fill.clone());
            self.backend
                .set_style(region.handle(), &region.computed_style());
        }
        let params = self.viewport.reset();
        self.push_transform(params)
    }

    pub fn set_focus(&mut self, focus: &FocusOption) -> Result<TransformParams, MapError> {
        let target = match focus {
            FocusOption::Point { scale, x, y } => Focus::Point {
                scale: *scale,
                x: *x,
                y: *y,
            },
            FocusOption::Regions { regions } => Focus::Area(self.regions_bbox(regions)?),
        };
        let params = self.viewport.set_focus(target)?;
        Ok(self.push_transform(params))
    }

    /// Union of the design-space bounding boxes of `codes`.
    pub fn regions_bbox(&self, codes: &[String]) -> Result<Aabb2, MapError> {
        let mut bbox: Option<Aabb2> = None;
        for code in codes {
            let path = self
                .dataset
                .region(code)
                .ok_or_else(|| MapError::UnknownRegion(code.clone()))?;
            let b = path
                .bbox
                .ok_or_else(|| MapError::MissingRegionBounds(code.clone()))?;
            bbox = Some(match bbox {
                None => b,
                Some(acc) => acc.union(&b),
            });
        }
        bbox.ok_or(MapError::Viewport(ViewportError::InvalidFocus(
            "no regions to focus on",
        )))
    }

    /// Container pixel for a geographic point, or `None` when the point lies
    /// in no inset.
    pub fn lat_lng_to_point(&self, lat: f64, lng: f64) -> Option<Vec2> {
        Projector::new(&self.dataset).project(&self.viewport.params(), lat, lng)
    }

    pub fn point_to_lat_lng(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Projector::new(&self.dataset).unproject(&self.viewport.params(), Vec2::new(x, y))
    }

    /// Moves every marker to its projected position under the current
    /// transform. Markers off the map are hidden.
    pub fn reposition_markers(&mut self) {
        let projector = Projector::new(&self.dataset);
        let params = self.viewport.params();
        for marker in &mut self.markers {
            let [lat, lng] = marker.lat_lng;
            let point = projector.project(&params, lat, lng);
            place_marker(&mut marker.state_mut().styles.initial, point);
            self.backend
                .set_style(marker.handle(), &marker.computed_style());
        }
    }

    /// Runs `f` on the entity behind `target` and pushes its resulting style.
    pub(crate) fn with_entity<R>(
        &mut self,
        target: &EntityRef,
        f: impl FnOnce(&mut dyn Interactive) -> R,
    ) -> Option<R> {
        let entity: &mut dyn Interactive = match target {
            EntityRef::Region(code) => self.regions.get_mut(code)?,
            EntityRef::Marker(index) => self.markers.get_mut(*index)?,
        };
        let out = f(entity);
        self.backend
            .set_style(entity.handle(), &entity.computed_style());
        Some(out)
    }

    pub fn contains_entity(&self, target: &EntityRef) -> bool {
        match target {
            EntityRef::Region(code) => self.regions.contains_key(code),
            EntityRef::Marker(index) => *index < self.markers.len(),
        }
    }
}

/// Writes the circle position into `style`, or hides it when off the map.
fn place_marker(style: &mut Style, point: Option<Vec2>) -> Vec2 {
    match point {
        Some(p) => {
            style.set("cx", p.x);
            style.set("cy", p.y);
            style.set("visibility", "visible");
            p
        }
        None => {
            style.set("visibility", "hidden");
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VectorMap;
    use crate::{FocusOption, MapError, MapOptions};
    use catalog::{
        CatalogError, DatasetProvider, Inset, MapDataset, MapRegistry, ProjectionParams,
        RegionPath,
    };
    use foundation::math::Vec2;
    use foundation::{Aabb2, Rgb};
    use layers::{DataValue, NormalizeKind};
    use pretty_assertions::assert_eq;
    use render::{RecordingBackend, RenderCommand};
    use scene::Interactive;
    use scene::components::StyleValue;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn region(name: &str, bbox: Option<Aabb2>) -> RegionPath {
        RegionPath {
            path: format!("M0 0 L1 1 Z {name}"),
            name: name.to_string(),
            bbox,
        }
    }

    /// 1000x500 design space, one inset covering the whole world.
    fn registry() -> MapRegistry {
        let world = Inset {
            bbox: [
                Vec2::new(-20_037_508.34, -10_000_000.0),
                Vec2::new(20_037_508.34, 10_000_000.0),
            ],
            width: 1000.0,
            height: 500.0,
            left: 0.0,
            top: 0.0,
        };
        let mut paths = BTreeMap::new();
        paths.insert(
            "US".to_string(),
            region(
                "United States",
                Some(Aabb2::new(Vec2::new(100.0, 100.0), Vec2::new(300.0, 200.0))),
            ),
        );
        paths.insert("CA".to_string(), region("Canada", None));
        let dataset = MapDataset {
            width: 1000.0,
            height: 500.0,
            projection: ProjectionParams::default(),
            insets: vec![world],
            paths,
        };
        let mut reg = MapRegistry::new();
        reg.register("world", dataset).unwrap();
        reg
    }

    fn build(options: MapOptions) -> VectorMap<RecordingBackend> {
        VectorMap::new(&registry(), RecordingBackend::new(), options, 800.0, 400.0).unwrap()
    }

    fn fill_of(map: &VectorMap<RecordingBackend>, code: &str) -> StyleValue {
        let handle = map.region(code).unwrap().handle();
        map.backend()
            .last_style(handle)
            .and_then(|s| s.get("fill"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn construction_fits_and_pushes_transform() {
        let map = build(MapOptions::for_map("world"));
        let v = map.viewport();
        assert_close(v.base_scale(), 0.8, 1e-12);
        assert_eq!(v.base_trans_x(), 0.0);
        assert_eq!(v.base_trans_y(), 0.0);

        let cmds = &map.backend().commands;
        assert_eq!(cmds[0], RenderCommand::SetSize { width: 800.0, height: 400.0 });
        assert_eq!(
            cmds[1],
            RenderCommand::SetBackground { color: "#505050".into() }
        );
        // Paths in code order.
        let geometry = |i: usize| match &cmds[i] {
            RenderCommand::AddPath { geometry, .. } => geometry.clone(),
            other => panic!("expected a path, got {other:?}"),
        };
        assert!(geometry(2).ends_with("Canada"));
        assert!(geometry(3).ends_with("United States"));
        assert_eq!(map.backend().last_transform(), Some(map.viewport().params()));
    }

    #[test]
    fn unknown_map_is_an_error() {
        let err = VectorMap::new(
            &registry(),
            RecordingBackend::new(),
            MapOptions::for_map("mars"),
            800.0,
            400.0,
        )
        .err();
        assert_eq!(err, Some(MapError::UnknownMap("mars".into())));
    }

    struct Fixed(Arc<MapDataset>);

    impl DatasetProvider for Fixed {
        fn dataset(&self, _id: &str) -> Option<Arc<MapDataset>> {
            Some(Arc::clone(&self.0))
        }
    }

    #[test]
    fn datasets_from_any_provider_are_validated() {
        let mut dataset = registry().get("world").unwrap().as_ref().clone();
        dataset.insets[0].width = 0.0;
        let err = VectorMap::new(
            &Fixed(Arc::new(dataset)),
            RecordingBackend::new(),
            MapOptions::for_map("custom"),
            800.0,
            400.0,
        )
        .err();
        assert!(matches!(
            err,
            Some(MapError::Catalog(CatalogError::Invalid { ref id, .. })) if id == "custom"
        ));
    }

    #[test]
    fn focus_snaps_to_ladder_so_zoom_out_stops_at_fit() {
        let mut map = build(MapOptions::for_map("world"));
        map.set_focus(&FocusOption::Point { scale: 1.7, x: 0.5, y: 0.5 })
            .unwrap();
        assert_eq!(map.viewport().zoom_cur_step(), 2);
        map.zoom_out().unwrap();
        assert_close(map.viewport().scale(), map.viewport().base_scale(), 1e-12);
        assert!(map.zoom_out().is_none());
    }

    #[test]
    fn colors_report_unknown_codes() {
        let mut map = build(MapOptions::for_map("world"));
        let mut colors = BTreeMap::new();
        colors.insert("US".to_string(), "#ff0000".to_string());
        colors.insert("XX".to_string(), "#00ff00".to_string());
        let report = map.set_colors(&colors);
        assert_eq!(report.unknown_regions, vec!["XX".to_string()]);
        assert_eq!(fill_of(&map, "US"), StyleValue::from("#ff0000"));

        assert_eq!(
            map.set_color("ZZ", "#000000"),
            Err(MapError::UnknownRegion("ZZ".into()))
        );
        map.set_color("CA", "#0000ff").unwrap();
        assert_eq!(fill_of(&map, "CA"), StyleValue::from("#0000ff"));
    }

    #[test]
    fn zero_value_gets_default_fill_and_top_goes_to_last_stop() {
        let mut options = MapOptions::for_map("world");
        options.values.insert("US".into(), DataValue::Number(0.0));
        options.values.insert("CA".into(), DataValue::Number(10.0));
        let map = build(options);

        assert_eq!(fill_of(&map, "US"), StyleValue::from("white"));
        assert_eq!(fill_of(&map, "CA"), StyleValue::from("#005ace"));
        assert_eq!(map.color_scale().min(), 10.0);
        assert_eq!(map.color_scale().max(), 10.0);
    }

    #[test]
    fn scale_colors_and_normalize_reapply_values() {
        let mut options = MapOptions::for_map("world");
        options.values.insert("US".into(), DataValue::Number(5.0));
        options.values.insert("CA".into(), DataValue::Number(10.0));
        options.value_min = Some(0.0);
        let mut map = build(options);
        map.set_scale_colors(&["#fff", "#000"]).unwrap();
        assert_eq!(fill_of(&map, "US"), StyleValue::from("#808080"));
        assert_eq!(fill_of(&map, "CA"), StyleValue::from("#000000"));

        map.set_normalize_function(NormalizeKind::Polynomial);
        assert_ne!(fill_of(&map, "US"), StyleValue::from("#808080"));

        assert!(matches!(
            map.set_scale_colors(&["red"]),
            Err(MapError::Color(_))
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            map.set_scale_colors(&empty),
            Err(MapError::ColorScale(_))
        ));
        assert_eq!(map.color_scale().colors(), &[Rgb::WHITE, Rgb::BLACK]);
    }

    #[test]
    fn reset_restores_fit_and_default_fill() {
        let mut options = MapOptions::for_map("world");
        options.values.insert("CA".into(), DataValue::Number(3.0));
        let mut map = build(options);
        map.zoom_in().unwrap();
        map.zoom_in().unwrap();
        assert_eq!(map.viewport().zoom_cur_step(), 3);

        let params = map.reset();
        assert_eq!(map.viewport().zoom_cur_step(), 1);
        assert_close(params.scale, 0.8, 1e-12);
        assert_eq!(fill_of(&map, "CA"), StyleValue::from("white"));
        assert!(map.values().is_some());

        map.set_scale_colors(&["#fff", "#000"]).unwrap();
        assert_eq!(fill_of(&map, "CA"), StyleValue::from("#000000"));
    }

    #[test]
    fn zoom_boundaries_are_noops() {
        let mut map = build(MapOptions::for_map("world"));
        assert!(map.zoom_out().is_none());
        for _ in 0..3 {
            assert!(map.zoom_in().is_some());
        }
        assert!(map.zoom_in().is_none());
    }

    #[test]
    fn markers_follow_transform_and_hide_off_map() {
        let mut options = MapOptions::for_map("world");
        options.markers = vec![[0.0, 0.0].into(), [89.9, 0.0].into()];
        let mut map = build(options);
        assert!(map.marker_group().is_some());

        let first = map.markers()[0].handle();
        let style = map.backend().last_style(first).unwrap().clone();
        let p = map.lat_lng_to_point(0.0, 0.0).unwrap();
        assert_eq!(style.get("cx"), Some(&StyleValue::Number(p.x)));
        assert_eq!(style.get("visibility"), Some(&StyleValue::from("visible")));

        let hidden = map.markers()[1].handle();
        assert_eq!(
            map.backend().last_style(hidden).and_then(|s| s.get("visibility")),
            Some(&StyleValue::from("hidden"))
        );

        map.zoom_in().unwrap();
        let moved = map.lat_lng_to_point(0.0, 0.0).unwrap();
        assert_eq!(
            map.backend().last_style(first).and_then(|s| s.get("cx")),
            Some(&StyleValue::Number(moved.x))
        );
    }

    #[test]
    fn point_round_trips_through_pixels() {
        let map = build(MapOptions::for_map("world"));
        let p = map.lat_lng_to_point(40.0, -100.0).unwrap();
        let (lat, lng) = map.point_to_lat_lng(p.x, p.y).unwrap();
        assert_close(lat, 40.0, 1e-6);
        assert_close(lng, -100.0, 1e-6);
    }

    #[test]
    fn focus_on_regions_needs_bounds() {
        let mut map = build(MapOptions::for_map("world"));
        let params = map
            .set_focus(&FocusOption::Regions {
                regions: vec!["US".into()],
            })
            .unwrap();
        // 200x100 box fitted into 800x400 is a 4x scale, capped at the ladder top.
        assert_close(params.scale, 0.8 * 1.4f64.powi(3), 1e-9);
        assert_eq!(map.viewport().zoom_cur_step(), 4);

        assert_eq!(
            map.set_focus(&FocusOption::Regions {
                regions: vec!["CA".into()]
            }),
            Err(MapError::MissingRegionBounds("CA".into()))
        );
        assert_eq!(
            map.set_focus(&FocusOption::Regions {
                regions: vec!["XX".into()]
            }),
            Err(MapError::UnknownRegion("XX".into()))
        );
    }
}
