use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Vector3;

use super::config::WarehouseConfig;
use super::source::WarehouseSource;
use crate::camera::CameraMode;
use crate::error::{DataUnavailableError, LayoutError};
use crate::grid_index::{GridIndex, RecordList};
use crate::layout::{
    pallet_size, rack_pillars, Footprint, GridCoordinate, LayoutGeometry, LayoutParameters,
    LoadingAreaConfig,
};
use crate::location::{ingest, RawRecord, WarehouseId, WarehouseRecords};
use crate::picking::{Aabb, RackOcclusion};
use crate::records::{AreaScope, BoxRef, PalletRecord};

/// Width and depth of the box standing in for one rack upright.
pub const PILLAR_WIDTH: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet, or torn down.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last fetch failed; calling `load` again retries.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub selected: Option<BoxRef>,
    pub focused: Option<BoxRef>,
}

/// A present pallet with its world bounds.
#[derive(Debug, Clone, Copy)]
pub struct PlacedPallet<'a> {
    pub target: BoxRef,
    pub bounds: Aabb,
    pub record: &'a PalletRecord,
}

/// One loading area with its regenerated records.
#[derive(Debug)]
pub struct LoadingArea {
    config: LoadingAreaConfig,
    supplied: Vec<PalletRecord>,
    records: RecordList,
    index: GridIndex,
}

impl LoadingArea {
    fn new(config: LoadingAreaConfig) -> Self {
        let mut area = Self {
            config,
            supplied: Vec::new(),
            records: RecordList::default(),
            index: GridIndex::new(),
        };
        area.regenerate();
        area
    }

    fn regenerate(&mut self) {
        let config = &self.config;
        let (records, dropped) = overlay(
            config.slots().map(|slot| slot.coord),
            &self.supplied,
            |coord| config.contains(coord),
        );
        if dropped > 0 {
            log::warn!(
                "dropped {dropped} records outside the {:?} loading area",
                config.position
            );
        }
        self.records = Arc::new(records);
        self.index.sync(&self.records);
    }

    pub fn config(&self) -> &LoadingAreaConfig {
        &self.config
    }

    pub fn records(&self) -> &RecordList {
        &self.records
    }

    pub fn record(&self, coord: GridCoordinate) -> Option<&PalletRecord> {
        self.index.get(coord)
    }
}

/// Lays `supplied` over one placeholder per cell. Records for cells outside
/// the grid are counted and left out.
fn overlay(
    cells: impl Iterator<Item = GridCoordinate>,
    supplied: &[PalletRecord],
    contains: impl Fn(GridCoordinate) -> bool,
) -> (Vec<PalletRecord>, usize) {
    let mut by_coord = HashMap::with_capacity(supplied.len());
    let mut dropped = 0;
    for record in supplied {
        if contains(record.grid_coordinate) {
            by_coord.insert(record.grid_coordinate, record);
        } else {
            dropped += 1;
        }
    }

    let records = cells
        .map(|coord| {
            by_coord
                .get(&coord)
                .map(|record| (*record).clone())
                .unwrap_or_else(|| PalletRecord::empty(coord))
        })
        .collect();
    (records, dropped)
}

fn remember(supplied: &mut Vec<PalletRecord>, record: PalletRecord) {
    supplied.retain(|r| r.grid_coordinate != record.grid_coordinate);
    supplied.push(record);
}

/// The warehouse context: parameters, records, loading areas, selection and
/// camera mode for one session.
///
/// Every setter replaces whole sub-objects, so a frame never sees parameters
/// and records from different generations.
#[derive(Debug)]
pub struct WarehouseStore {
    geometry: LayoutGeometry,
    loading_areas: Vec<LoadingArea>,
    ingested: WarehouseRecords,
    active: WarehouseId,
    records: RecordList,
    index: GridIndex,
    selection: Selection,
    camera_mode: CameraMode,
    load_state: LoadState,
    revision: u64,
}

impl Default for WarehouseStore {
    fn default() -> Self {
        Self::from_config(WarehouseConfig::default())
    }
}

impl WarehouseStore {
    pub fn init(config: WarehouseConfig) -> Result<Self, LayoutError> {
        config.layout.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: WarehouseConfig) -> Self {
        let mut store = Self {
            geometry: LayoutGeometry::new(config.layout),
            loading_areas: config.loading_areas.into_iter().map(LoadingArea::new).collect(),
            ingested: WarehouseRecords::new(),
            active: WarehouseId::A,
            records: RecordList::default(),
            index: GridIndex::new(),
            selection: Selection::default(),
            camera_mode: CameraMode::default(),
            load_state: LoadState::Idle,
            revision: 0,
        };
        store.regenerate();
        store
    }

    /// Drops all loaded data and selection. Parameters and area configs stay.
    pub fn teardown(&mut self) {
        log::info!("tearing down warehouse {}", self.active);
        self.ingested.clear();
        self.load_state = LoadState::Idle;
        self.selection = Selection::default();
        self.camera_mode = CameraMode::default();
        for area in &mut self.loading_areas {
            area.supplied.clear();
            area.regenerate();
        }
        self.regenerate();
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn params(&self) -> &LayoutParameters {
        self.geometry.params()
    }

    pub fn footprint(&self) -> Footprint {
        self.geometry.footprint()
    }

    /// Increases on every change to parameters, records or areas.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn active_warehouse(&self) -> WarehouseId {
        self.active
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        self.camera_mode = mode;
    }

    /// Main-grid records of the active warehouse. Empty unless ready.
    pub fn records(&self) -> &RecordList {
        &self.records
    }

    pub fn loading_areas(&self) -> &[LoadingArea] {
        &self.loading_areas
    }

    pub fn record(&self, target: BoxRef) -> Option<&PalletRecord> {
        match target.scope {
            AreaScope::Main => self.index.get(target.coord),
            AreaScope::LoadingArea(i) => self.loading_areas.get(i)?.record(target.coord),
        }
    }

    /// Replaces the layout and regenerates everything derived from it.
    pub fn set_parameters(&mut self, params: LayoutParameters) -> Result<(), LayoutError> {
        params.validate()?;
        log::info!(
            "layout changed: {:?}, {} rows x {} levels",
            params.archetype,
            params.shelves_z,
            params.shelves_y
        );
        self.geometry = LayoutGeometry::new(params);
        self.regenerate();
        Ok(())
    }

    pub fn set_loading_areas(&mut self, configs: Vec<LoadingAreaConfig>) {
        self.loading_areas = configs.into_iter().map(LoadingArea::new).collect();
        self.revision += 1;
        self.retain_valid_selection();
    }

    /// Supplies the records of one loading area. Records outside the area
    /// grid are dropped.
    pub fn set_loading_area_records(
        &mut self,
        area: usize,
        records: Vec<PalletRecord>,
    ) -> Result<(), LayoutError> {
        let loading_area = self
            .loading_areas
            .get_mut(area)
            .ok_or(LayoutError::UnknownArea(area))?;
        loading_area.supplied = records;
        loading_area.regenerate();
        self.revision += 1;
        self.retain_valid_selection();
        Ok(())
    }

    pub fn switch_warehouse(&mut self, id: WarehouseId) {
        if id == self.active {
            return;
        }
        log::info!("switching warehouse {} -> {}", self.active, id);
        self.active = id;
        self.selection = Selection::default();
        self.regenerate();
    }

    /// Fetches records from `source`. A failure leaves the store in
    /// [`LoadState::Failed`] with empty records.
    pub async fn load(&mut self, source: &dyn WarehouseSource) -> &LoadState {
        self.begin_load();
        log::info!("loading records from {}", source.describe());
        let result = source.fetch().await;
        self.finish_load(result);
        &self.load_state
    }

    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
        self.ingested.clear();
        self.selection = Selection::default();
        self.regenerate();
    }

    pub fn finish_load(&mut self, result: Result<Vec<RawRecord>, DataUnavailableError>) {
        let outcome = result.and_then(|raw| {
            if raw.is_empty() {
                Err(DataUnavailableError::Empty)
            } else {
                Ok(ingest(raw))
            }
        });

        match outcome {
            Ok(ingested) => {
                self.ingested = ingested;
                self.load_state = LoadState::Ready;
                log::info!("warehouse data ready");
            }
            Err(error) => {
                log::warn!("warehouse data unavailable: {error}");
                self.load_state = LoadState::Failed(error.to_string());
            }
        }
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let records = if self.is_ready() {
            let params = self.geometry.params();
            let supplied = self
                .ingested
                .get(&self.active)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let (records, dropped) =
                overlay(params.cells(), supplied, |coord| params.contains(coord));
            if dropped > 0 {
                log::warn!(
                    "dropped {dropped} records outside the layout of warehouse {}",
                    self.active
                );
            }
            records
        } else {
            Vec::new()
        };

        self.records = Arc::new(records);
        self.index.sync(&self.records);
        self.revision += 1;
        self.retain_valid_selection();
    }

    pub fn contains(&self, target: BoxRef) -> bool {
        self.check(target).is_ok()
    }

    fn check(&self, target: BoxRef) -> Result<(), LayoutError> {
        let inside = match target.scope {
            AreaScope::Main => self.params().contains(target.coord),
            AreaScope::LoadingArea(i) => self
                .loading_areas
                .get(i)
                .ok_or(LayoutError::UnknownArea(i))?
                .config
                .contains(target.coord),
        };
        if inside {
            Ok(())
        } else {
            Err(LayoutError::OutOfBounds {
                coord: target.coord,
            })
        }
    }

    fn retain_valid_selection(&mut self) {
        if self.selection.selected.is_some_and(|b| !self.contains(b)) {
            self.selection.selected = None;
        }
        if self.selection.focused.is_some_and(|b| !self.contains(b)) {
            self.selection.focused = None;
        }
    }

    /// World position of the cell bottom center.
    pub fn world_position(&self, target: BoxRef) -> Result<Vector3<f32>, LayoutError> {
        self.check(target)?;
        Ok(match target.scope {
            AreaScope::Main => self.geometry.cell_position(target.coord),
            AreaScope::LoadingArea(i) => self.loading_areas[i]
                .config
                .slot_position(target.coord, &self.footprint()),
        })
    }

    /// Bounds of the pallet box drawn at `target`, whether or not it is
    /// present.
    pub fn pallet_bounds(&self, target: BoxRef) -> Result<Aabb, LayoutError> {
        let base = self.world_position(target)?;
        let size = match target.scope {
            AreaScope::Main => pallet_size(self.params()),
            AreaScope::LoadingArea(i) => self.loading_areas[i].config.pallet_size(),
        };
        Ok(Aabb::from_center_size(
            base + Vector3::new(0.0, size.y / 2.0, 0.0),
            size,
        ))
    }

    /// Every present pallet of the main grid and the loading areas.
    pub fn placed_pallets(&self) -> impl Iterator<Item = PlacedPallet<'_>> + '_ {
        let ready = self.is_ready();
        let main = self
            .records
            .iter()
            .map(|record| (BoxRef::main(record.grid_coordinate), record));
        let areas = self
            .loading_areas
            .iter()
            .enumerate()
            .filter(move |_| ready)
            .flat_map(|(i, area)| {
                area.records
                    .iter()
                    .map(move |record| (BoxRef::in_area(record.grid_coordinate, i), record))
            });

        main.chain(areas)
            .filter(|(_, record)| record.present)
            .filter_map(move |(target, record)| {
                let bounds = self.pallet_bounds(target).ok()?;
                Some(PlacedPallet {
                    target,
                    bounds,
                    record,
                })
            })
    }

    /// Pickable pallets plus the rack uprights as obstacles. Empty until the
    /// data is ready.
    pub fn occlusion_scene(&self) -> RackOcclusion {
        let mut scene = RackOcclusion::new();
        if !self.is_ready() {
            return scene;
        }
        for pallet in self.placed_pallets() {
            scene.push_pallet(pallet.bounds, pallet.target);
        }

        let half = Vector3::new(PILLAR_WIDTH / 2.0, 0.0, PILLAR_WIDTH / 2.0);
        for pillar in rack_pillars(self.params()) {
            scene.push_obstacle(Aabb::new(
                pillar.base - half,
                pillar.base + half + Vector3::new(0.0, pillar.height, 0.0),
            ));
        }
        scene
    }

    pub fn select_cell(&mut self, target: BoxRef) -> Result<(), LayoutError> {
        self.check(target)?;
        log::debug!("selected {:?} {}", target.scope, target.coord);
        self.selection.selected = Some(target);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection.selected = None;
    }

    /// Marks `target` focused and selected. Returns the point the camera
    /// should frame.
    pub fn focus(&mut self, target: BoxRef) -> Result<Vector3<f32>, LayoutError> {
        let center = self.pallet_bounds(target)?.center();
        self.selection = Selection {
            selected: Some(target),
            focused: Some(target),
        };
        Ok(center)
    }

    pub fn clear_focus(&mut self) {
        self.selection.focused = None;
    }

    /// Manual camera control ends any focus.
    pub fn on_manual_camera_input(&mut self) {
        if let Some(focused) = self.selection.focused.take() {
            log::debug!("focus on {} released by manual input", focused.coord);
        }
    }

    /// Flips `present` on one record. Returns the new value.
    pub fn toggle_present(&mut self, target: BoxRef) -> Result<bool, LayoutError> {
        self.check(target)?;
        let (list, index, supplied) = match target.scope {
            AreaScope::Main => (
                &mut self.records,
                &mut self.index,
                self.ingested.entry(self.active).or_default(),
            ),
            AreaScope::LoadingArea(i) => {
                let area = &mut self.loading_areas[i];
                (&mut area.records, &mut area.index, &mut area.supplied)
            }
        };

        let mut records = (**list).clone();
        let record = records
            .iter_mut()
            .find(|r| r.grid_coordinate == target.coord)
            .ok_or(LayoutError::OutOfBounds {
                coord: target.coord,
            })?;
        record.present = !record.present;
        let present = record.present;
        remember(supplied, record.clone());

        *list = Arc::new(records);
        index.sync(list);
        self.revision += 1;
        Ok(present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Archetype, Corner};
    use crate::store::source::{FailingSource, StaticSource};

    fn small_config() -> WarehouseConfig {
        WarehouseConfig {
            layout: LayoutParameters {
                archetype: Archetype::Drive,
                shelves_y: 2,
                shelves_z: 3,
                shelves_x_per_row: vec![4, 5, 3],
                gap_x: 1.5,
                gap_y: 1.2,
                gap_z: 4.0,
                back_gap: 0.0,
                width_offset_start: 4.0,
                width_offset_end: 4.0,
                depth_offset_start: 6.0,
                depth_offset_end: 6.0,
            },
            loading_areas: vec![LoadingAreaConfig::receiving(Corner::FrontLeft)],
        }
    }

    fn raw(code: &str) -> RawRecord {
        RawRecord {
            location_code: code.to_string(),
            content: Some(format!("stock at {code}")),
            ..Default::default()
        }
    }

    fn sample_source() -> StaticSource {
        StaticSource::new(vec![
            raw("I-1-1"),
            raw("J-5-2"),
            // Position 40 does not exist in any row.
            raw("K-40-1"),
            raw("A-2-1"),
        ])
    }

    fn loaded_store() -> WarehouseStore {
        let mut store = WarehouseStore::init(small_config()).unwrap();
        pollster::block_on(store.load(&sample_source()));
        store
    }

    fn present_count(store: &WarehouseStore) -> usize {
        store.records().iter().filter(|r| r.present).count()
    }

    #[test]
    fn test_init_rejects_invalid_layout() {
        let mut config = small_config();
        config.layout.shelves_z = 4;
        assert!(matches!(
            WarehouseStore::init(config),
            Err(LayoutError::RowCountMismatch { .. })
        ));
    }

    #[test]
    fn test_records_are_empty_until_ready() {
        let store = WarehouseStore::init(small_config()).unwrap();
        assert_eq!(store.load_state(), &LoadState::Idle);
        assert!(store.records().is_empty());
        assert!(store.occlusion_scene().is_empty());
        assert_eq!(store.placed_pallets().count(), 0);
    }

    #[test]
    fn test_load_regenerates_full_grid() {
        let store = loaded_store();
        assert!(store.is_ready());
        assert_eq!(store.records().len(), store.params().cell_count());
        // The out-of-grid record is dropped, warehouse B is not active.
        assert_eq!(present_count(&store), 2);

        let record = store
            .record(BoxRef::main(GridCoordinate::new(4, 1, 1)))
            .unwrap();
        assert!(record.present);
        assert_eq!(record.content, "stock at J-5-2");
        assert!(record.provenance.is_some());

        let empty = store
            .record(BoxRef::main(GridCoordinate::new(2, 0, 0)))
            .unwrap();
        assert!(!empty.present);
        assert!(empty.provenance.is_none());
    }

    #[test]
    fn test_failed_load_is_retryable() {
        let mut store = WarehouseStore::init(small_config()).unwrap();
        let state = pollster::block_on(store.load(&FailingSource::new("timeout"))).clone();
        assert!(matches!(state, LoadState::Failed(reason) if reason.contains("timeout")));
        assert!(store.records().is_empty());

        pollster::block_on(store.load(&StaticSource::default()));
        assert!(matches!(store.load_state(), LoadState::Failed(_)));

        pollster::block_on(store.load(&sample_source()));
        assert!(store.is_ready());
        assert_eq!(present_count(&store), 2);
    }

    #[test]
    fn test_switch_warehouse_replaces_records() {
        let mut store = loaded_store();
        store.select_cell(BoxRef::main(GridCoordinate::new(0, 0, 0))).unwrap();
        let before = Arc::clone(store.records());

        store.switch_warehouse(WarehouseId::B);
        assert!(!Arc::ptr_eq(&before, store.records()));
        assert_eq!(store.selection(), Selection::default());
        assert_eq!(present_count(&store), 1);
        assert!(store.record(BoxRef::main(GridCoordinate::new(1, 0, 0))).unwrap().present);
    }

    #[test]
    fn test_parameter_change_regenerates_records() {
        let mut store = loaded_store();
        let revision = store.revision();
        let mut params = store.params().clone();
        params.shelves_z = 2;
        params.shelves_x_per_row = vec![4, 5];
        store.set_parameters(params).unwrap();

        assert!(store.revision() > revision);
        assert_eq!(store.records().len(), 2 * 4 + 2 * 5);
        assert!(store
            .records()
            .iter()
            .all(|r| store.params().contains(r.grid_coordinate)));
    }

    #[test]
    fn test_invalid_parameters_leave_store_untouched() {
        let mut store = loaded_store();
        let before = store.params().clone();
        let mut params = before.clone();
        params.gap_x = -1.0;
        assert!(store.set_parameters(params).is_err());
        assert_eq!(store.params(), &before);
    }

    #[test]
    fn test_selection_outside_grid_is_rejected() {
        let mut store = loaded_store();
        let outside = BoxRef::main(GridCoordinate::new(4, 0, 2));
        assert_eq!(
            store.select_cell(outside),
            Err(LayoutError::OutOfBounds {
                coord: GridCoordinate::new(4, 0, 2)
            })
        );
        assert_eq!(
            store.focus(BoxRef::in_area(GridCoordinate::ORIGIN, 7)),
            Err(LayoutError::UnknownArea(7))
        );
        assert_eq!(store.selection(), Selection::default());
    }

    #[test]
    fn test_focus_and_manual_release() {
        let mut store = loaded_store();
        let target = BoxRef::main(GridCoordinate::new(0, 1, 0));
        let center = store.focus(target).unwrap();
        let base = store.world_position(target).unwrap();
        assert!(center.y > base.y);
        assert_eq!(store.selection().focused, Some(target));

        store.on_manual_camera_input();
        assert_eq!(store.selection().focused, None);
        assert_eq!(store.selection().selected, Some(target));
    }

    #[test]
    fn test_selection_dropped_when_cell_disappears() {
        let mut store = loaded_store();
        let target = BoxRef::main(GridCoordinate::new(4, 0, 1));
        store.select_cell(target).unwrap();

        let mut params = store.params().clone();
        params.shelves_x_per_row = vec![4, 4, 3];
        store.set_parameters(params).unwrap();
        assert_eq!(store.selection().selected, None);
    }

    #[test]
    fn test_toggle_present_replaces_list_and_survives_regeneration() {
        let mut store = loaded_store();
        let target = BoxRef::main(GridCoordinate::new(2, 0, 0));
        let before = Arc::clone(store.records());

        assert_eq!(store.toggle_present(target), Ok(true));
        assert!(!Arc::ptr_eq(&before, store.records()));
        assert!(store.record(target).unwrap().present);

        let params = store.params().clone();
        store.set_parameters(params).unwrap();
        assert!(store.record(target).unwrap().present);
        assert_eq!(present_count(&store), 3);
    }

    #[test]
    fn test_loading_area_records() {
        let mut store = loaded_store();
        let capacity = store.loading_areas()[0].config().capacity();
        assert_eq!(store.loading_areas()[0].records().len(), capacity);

        let mut stored = PalletRecord::empty(GridCoordinate::new(1, 0, 2));
        stored.present = true;
        let mut outside = PalletRecord::empty(GridCoordinate::new(9, 0, 0));
        outside.present = true;
        store
            .set_loading_area_records(0, vec![stored, outside])
            .unwrap();

        let area = &store.loading_areas()[0];
        assert_eq!(area.records().len(), capacity);
        assert_eq!(area.records().iter().filter(|r| r.present).count(), 1);
        assert!(store
            .record(BoxRef::in_area(GridCoordinate::new(1, 0, 2), 0))
            .unwrap()
            .present);

        assert_eq!(
            store.set_loading_area_records(3, Vec::new()),
            Err(LayoutError::UnknownArea(3))
        );
    }

    #[test]
    fn test_occlusion_scene_holds_pallets_and_pillars() {
        let store = loaded_store();
        let pillars = rack_pillars(store.params()).len();
        let scene = store.occlusion_scene();
        assert_eq!(scene.len(), present_count(&store) + pillars);
    }

    #[test]
    fn test_teardown_resets_lifecycle() {
        let mut store = loaded_store();
        store.set_camera_mode(CameraMode::FirstPerson);
        store.teardown();
        assert_eq!(store.load_state(), &LoadState::Idle);
        assert!(store.records().is_empty());
        assert_eq!(store.camera_mode(), CameraMode::Orbit);
        assert_eq!(store.params(), &small_config().layout);
    }
}
