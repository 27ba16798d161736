//! Grid builder: footprint enumeration on the caller thread, a bounded
//! queue, and a pool of workers that turn footprints into finished cells.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use geo::{BoundingRect, Intersects};
use geo_types::{Coord, Polygon, Rect};
use log::{debug, info};

use crate::error::{GridError, PlanError};
use crate::grid::cell::{CellShape, GridCell};
use crate::grid::planner::GridPlan;
use crate::grid::queue::{cell_queue, CellQueue, CellStream};
use crate::grid::shapes::{candidate_rings, crosses_seam, densify, reproject, swap_axes, CellFootprint};
use crate::grid::CellSink;
use crate::proj::resolver::GridTransform;

/// Shared cancellation flag. Cloning yields a handle to the same flag;
/// cancelling stops enumeration at the next row boundary and lets the
/// workers drain what is already queued.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Build options: shape, level, vertex density, worker count, queue
/// capacity and an optional geographic filter in (lon, lat) degrees.
pub struct GridConfig {
    shape: CellShape,
    level: u8,
    density: f64,
    threads: usize,
    queue_capacity: usize,
    filter: Option<Polygon<f64>>,
    cancel: CancelFlag,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            shape: CellShape::Square,
            level: 1,
            density: 1.0,
            threads: 4,
            queue_capacity: 50_000,
            filter: None,
            cancel: CancelFlag::new(),
        }
    }
}

impl GridConfig {
    pub fn with_shape(mut self, shape: CellShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Target vertex count per ring; values of 1 or less leave rings at
    /// their construction vertices.
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Only emit cells intersecting this polygon, given in geographic
    /// (lon, lat) degrees.
    pub fn with_filter(mut self, filter: Polygon<f64>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Handle for cancelling a build in progress from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }
}

/// Builds grids on one projection.
pub struct GridBuilder {
    transform: GridTransform,
}

impl GridBuilder {
    pub fn new(transform: GridTransform) -> Self {
        Self { transform }
    }

    /// Resolve a projection by preset name, "EPSG:n" string or bare code.
    pub fn resolve(name: &str) -> Result<Self, GridError> {
        Ok(Self::new(GridTransform::resolve(name)?))
    }

    pub fn from_epsg(code: u32) -> Result<Self, GridError> {
        Ok(Self::new(GridTransform::from_epsg(code)?))
    }

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Build the grid, streaming finished cells into `sink` from the
    /// worker threads. `sink.done()` is called exactly once after the
    /// last cell, including after a cancelled run.
    pub fn build_grid<S: CellSink>(&self, config: &GridConfig, sink: &S) -> Result<(), GridError> {
        let plan = GridPlan::new(&self.transform, config.shape, config.level)?;
        info!(
            "building {:?} grid at level {} on EPSG:{}",
            config.shape,
            plan.level(),
            self.transform.id()
        );

        let prefilter = match &config.filter {
            Some(filter) => Some(projected_bounds(filter, &self.transform)?),
            None => None,
        };

        let (queue, stream) = cell_queue(config.queue_capacity);

        thread::scope(|scope| -> Result<(), GridError> {
            let mut handles = Vec::new();
            for i in 0..config.threads.max(1) {
                let stream = stream.clone();
                let worker = CellWorker {
                    transform: &self.transform,
                    shape: config.shape,
                    level: plan.level(),
                    density: config.density,
                    filter: config.filter.as_ref(),
                    cancel: &config.cancel,
                    sink,
                };
                let handle = thread::Builder::new()
                    .name(format!("grid-worker-{i}"))
                    .spawn_scoped(scope, move || worker.run(stream))?;
                handles.push(handle);
            }
            drop(stream);

            let pushed = enumerate_footprints(
                &plan,
                config.shape,
                prefilter.as_ref(),
                &config.cancel,
                &queue,
            );
            drop(queue);
            debug!("enumerated {pushed} footprints");

            for handle in handles {
                if let Err(panic) = handle.join() {
                    std::panic::resume_unwind(panic);
                }
            }
            Ok(())
        })?;

        sink.done();
        Ok(())
    }
}

/// Walk the lattice column by column, each column running from the
/// equator to the top row and then down through the southern band,
/// pushing footprints onto the queue. Returns the number pushed.
///
/// Row and column positions are index multiples of the step, never an
/// accumulating sum, so the loop bounds are immune to float drift.
fn enumerate_footprints(
    plan: &GridPlan,
    shape: CellShape,
    prefilter: Option<&Rect<f64>>,
    cancel: &CancelFlag,
    queue: &CellQueue,
) -> usize {
    let g = plan.grid_size();
    let eps = g * 1e-6;
    let start_x = plan.west_x() - plan.left_offset();
    // Hex rows interlock through their offset cells, so they advance by
    // one and a half cells
    let row_step = match shape {
        CellShape::Hex => 1.5 * g,
        _ => g,
    };

    let mut pushed = 0usize;
    let mut emit = |x: f64, y: f64| -> bool {
        if let Some(rect) = prefilter {
            if outside_bounds(rect, x, y, g) {
                return true;
            }
        }
        if !queue.push(CellFootprint::new(x, y, g)) {
            return false;
        }
        pushed += 1;
        true
    };

    for col in 0u64.. {
        let x = start_x + col as f64 * g;
        if x >= plan.east_x() - eps {
            break;
        }
        if cancel.is_cancelled() {
            return pushed;
        }
        // northern band, equator row included
        for row in 0u64.. {
            let y = row as f64 * row_step;
            if y > plan.top_y() {
                break;
            }
            if !emit(x, y) {
                return pushed;
            }
        }
        // southern band
        for row in 1u64.. {
            let y = -(row as f64 * row_step);
            if y <= plan.bottom_y() - g {
                break;
            }
            if !emit(x, y) {
                return pushed;
            }
        }
    }
    pushed
}

/// Footprint entirely outside the projected filter bounds, with one cell
/// of slack on every side so offset cells at the boundary survive the
/// prefilter.
fn outside_bounds(rect: &Rect<f64>, x: f64, y: f64, g: f64) -> bool {
    x - g > rect.max().x
        || x + 2.0 * g < rect.min().x
        || y - g > rect.max().y
        || y + 2.0 * g < rect.min().y
}

/// Project the filter's bounding rectangle into grid coordinates. A
/// filter whose envelope cannot be projected is a planning failure.
fn projected_bounds(filter: &Polygon<f64>, transform: &GridTransform) -> Result<Rect<f64>, PlanError> {
    let rect = filter
        .bounding_rect()
        .ok_or_else(|| PlanError::General("spatial filter has no extent".to_string()))?;
    let (x0, y0) = transform.to_projected(rect.min().x, rect.min().y)?;
    let (x1, y1) = transform.to_projected(rect.max().x, rect.max().y)?;
    Ok(Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }))
}

/// One worker: pops footprints until the stream ends, expands each into
/// its candidate polygons and emits the survivors.
struct CellWorker<'a, S: CellSink> {
    transform: &'a GridTransform,
    shape: CellShape,
    level: u8,
    density: f64,
    filter: Option<&'a Polygon<f64>>,
    cancel: &'a CancelFlag,
    sink: &'a S,
}

impl<S: CellSink> CellWorker<'_, S> {
    fn run(&self, stream: CellStream) {
        let mut emitted = 0usize;
        while let Some(footprint) = stream.pop() {
            if self.cancel.is_cancelled() {
                break;
            }
            emitted += self.process(&footprint);
        }
        debug!("worker finished, {emitted} cells emitted");
    }

    fn process(&self, footprint: &CellFootprint) -> usize {
        let mut emitted = 0;
        for candidate in candidate_rings(footprint, self.shape) {
            let dense = densify(&candidate, self.density);
            let Some(geographic) = reproject(&dense, self.transform) else {
                continue;
            };
            if crosses_seam(&geographic) {
                continue;
            }
            if let Some(filter) = self.filter {
                if !filter.intersects(&geographic) {
                    continue;
                }
            }
            let stored = swap_axes(&geographic);
            if let Some(cell) =
                GridCell::from_geometry(self.shape, self.level, self.transform.id(), stored)
            {
                self.sink.cell(cell);
                emitted += 1;
            }
        }
        emitted
    }
}
