use cagewarp_cage::{CageMode, CageModel, Rect};
use glam::DVec2;
use num_traits::{AsPrimitive, Float};

use crate::coords::CoordinateBuffer;
use crate::error::WarpError;
use crate::probe::WarpProbe;
use crate::raster::{rasterize_triangle, TriangleVertex};
use crate::weights::WeightBuffer;

/// Options of a warp pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarpOptions {
    /// Map the pixels inside the source cage to the first cage vertex before warping, so that
    /// the area the cage leaves behind is filled with a plain color.
    pub fill_plain_color: bool,
}

/// Cage warp over a cage and its precomputed weights.
///
/// The engine borrows both inputs and checks once that they agree; every warp call then
/// builds a fresh [`CoordinateBuffer`].
///
/// # Examples
///
/// ```
/// use cagewarp_cage::{CageModel, Rect};
/// use cagewarp_transform::{CageWarpEngine, WeightBuffer};
/// use glam::DVec2;
///
/// let cage = CageModel::from_points([
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(0.0, 4.0),
/// ]);
/// let weights = WeightBuffer::<f32>::new(Rect::from_size(5, 5), 6, vec![0.0; 5 * 5 * 6]).unwrap();
///
/// let engine = CageWarpEngine::new(&cage, &weights).unwrap();
/// let coords = engine.warp(Rect::from_size(5, 5), false);
///
/// assert_eq!(coords.rect(), Rect::from_size(5, 5));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CageWarpEngine<'a, T = f32> {
    cage: &'a CageModel,
    weights: &'a WeightBuffer<T>,
}

impl<'a, T> CageWarpEngine<'a, T>
where
    T: Float + AsPrimitive<f64>,
{
    /// Create an engine for `cage` and its weights.
    ///
    /// # Errors
    ///
    /// If the cage has at least three vertices and the weight samples carry fewer than two
    /// coefficients per vertex. Coefficients past the first `2 * n` are ignored. Smaller cages
    /// are accepted without looking at the weights.
    pub fn new(cage: &'a CageModel, weights: &'a WeightBuffer<T>) -> Result<Self, WarpError> {
        let n = cage.point_count();
        if n >= 3 && weights.channels() < 2 * n {
            return Err(WarpError::InvalidWeightBufferShape {
                expected: 2 * n,
                found: weights.channels(),
            });
        }
        Ok(Self { cage, weights })
    }

    /// Get as reference the cage.
    pub fn cage(&self) -> &'a CageModel {
        self.cage
    }

    /// Get as reference the weights.
    pub fn weights(&self) -> &'a WeightBuffer<T> {
        self.weights
    }

    /// Destination of the source point `p`.
    ///
    /// Blends the vertex destinations with the first `n` coefficients sampled at `p` and the
    /// scaled edge normals with the next `n`, for a cage of `n` vertices. Points off the weight
    /// buffer map to the origin; the warp never samples there.
    pub fn destination(&self, p: DVec2) -> DVec2 {
        let n = self.cage.point_count();
        let Some(coefficients) = self.weights.sample(p.x.floor() as i32, p.y.floor() as i32)
        else {
            return DVec2::ZERO;
        };
        let (vertex_weights, edge_weights) = coefficients.split_at(n.min(coefficients.len()));

        let mut pos = DVec2::ZERO;
        for (vertex, w) in self.cage.vertices().iter().zip(vertex_weights) {
            let w: f64 = w.as_();
            pos += vertex.destination * w;
        }
        for (vertex, w) in self.cage.vertices().iter().zip(edge_weights) {
            let w: f64 = w.as_();
            pos += vertex.edge_normal * (vertex.edge_scale * w);
        }
        pos
    }

    /// Compute the source coordinates of every pixel of `region`.
    pub fn warp(&self, region: Rect, fill_plain_color: bool) -> CoordinateBuffer {
        self.warp_with_options(region, &WarpOptions { fill_plain_color })
    }

    /// Compute the source coordinates of every pixel of `region` with the given options.
    pub fn warp_with_options(&self, region: Rect, options: &WarpOptions) -> CoordinateBuffer {
        self.warp_with_probe(region, options, &mut ())
    }

    /// Compute the source coordinates of every pixel of `region`, reporting to `probe`.
    ///
    /// Pixels start mapped to their own center. The unit cells of the cage bounding box whose
    /// center lies in the source cage are then mapped to the output through
    /// [`CageWarpEngine::destination`], split in two triangles each and rasterized, which
    /// overwrites the pixels they cover with the matching source position. Only cells whose
    /// four corners have a weight sample are walked.
    ///
    /// A cage with fewer than three vertices leaves the identity mapping untouched.
    pub fn warp_with_probe<P: WarpProbe>(
        &self,
        region: Rect,
        options: &WarpOptions,
        probe: &mut P,
    ) -> CoordinateBuffer {
        let mut output = CoordinateBuffer::identity(region);

        if self.cage.point_count() < 3 {
            log::debug!(
                "cage has {} vertices, returning identity for {}",
                self.cage.point_count(),
                region
            );
            return output;
        }

        let now = std::time::Instant::now();

        // the walk is in source space but must also reach every destination vertex
        let cage_bb = self
            .cage
            .bounding_box()
            .union(&self.cage.bounding_box_for(CageMode::EditingCage));

        if options.fill_plain_color {
            self.fill_plain_color(&mut output, cage_bb);
        }

        // the far corners of a cell are sampled one pixel right and below it
        let extent = self.weights.extent();
        let cells_bb = cage_bb.intersect(&Rect::new(
            extent.x,
            extent.y,
            extent.width - 1,
            extent.height - 1,
        ));

        let cells = self.walk_cells(&mut output, region, cells_bb, probe);

        log::debug!(
            "cage warp of {} over {}: {} cells rasterized in {:?}",
            region,
            cells_bb,
            cells,
            now.elapsed()
        );

        output
    }

    fn fill_plain_color(&self, output: &mut CoordinateBuffer, cage_bb: Rect) {
        let Some(first) = self.cage.vertex(0) else {
            return;
        };
        let area = output.rect().intersect(&cage_bb);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if self.cage.point_inside(CageMode::EditingCage, center) {
                    output.set(x, y, first.source);
                }
            }
        }
    }

    // returns the number of cells handed to the rasterizer
    fn walk_cells<P: WarpProbe>(
        &self,
        output: &mut CoordinateBuffer,
        region: Rect,
        cells_bb: Rect,
        probe: &mut P,
    ) -> usize {
        if cells_bb.is_empty() {
            return 0;
        }

        // destinations of the cell corners on the upper and lower edge of the current row
        let columns = cells_bb.width as usize + 1;
        let mut upper = self.corner_row(cells_bb.x, cells_bb.y, columns, probe);
        let mut cells = 0;

        for y in cells_bb.y..cells_bb.bottom() {
            let lower = self.corner_row(cells_bb.x, y + 1, columns, probe);

            for x in cells_bb.x..cells_bb.right() {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if !self.cage.point_inside(CageMode::EditingCage, center) {
                    continue;
                }

                let i = (x - cells_bb.x) as usize;
                let (x0, y0) = (x as f64, y as f64);
                let p1 = TriangleVertex::new(DVec2::new(x0, y0), upper[i]);
                let p2 = TriangleVertex::new(DVec2::new(x0 + 1.0, y0), upper[i + 1]);
                let p3 = TriangleVertex::new(DVec2::new(x0 + 1.0, y0 + 1.0), lower[i + 1]);
                let p4 = TriangleVertex::new(DVec2::new(x0, y0 + 1.0), lower[i]);

                rasterize_triangle([p1, p2, p3], region, output, probe);
                rasterize_triangle([p1, p3, p4], region, output, probe);
                cells += 1;
            }

            upper = lower;
            probe.row_completed((y - cells_bb.y + 1) as f64 / cells_bb.height as f64);
        }

        cells
    }

    fn corner_row<P: WarpProbe>(
        &self,
        x: i32,
        y: i32,
        columns: usize,
        probe: &mut P,
    ) -> Vec<DVec2> {
        (0..columns)
            .map(|i| {
                probe.destination_evaluated();
                self.destination(DVec2::new(x as f64 + i as f64, y as f64))
            })
            .collect()
    }
}

/// Compute the source coordinates of every pixel of `region` for a cage and its weights.
///
/// # Arguments
///
/// * `cage` - The cage, with its source and destination vertices.
/// * `weights` - The per-pixel coefficients, at least `2 * cage.point_count()` per pixel.
/// * `region` - The output region.
/// * `fill_plain_color` - Map the inside of the source cage to the first cage vertex first.
///
/// # Errors
///
/// If the weights carry fewer than two coefficients per cage vertex.
pub fn warp<T>(
    cage: &CageModel,
    weights: &WeightBuffer<T>,
    region: Rect,
    fill_plain_color: bool,
) -> Result<CoordinateBuffer, WarpError>
where
    T: Float + AsPrimitive<f64>,
{
    Ok(CageWarpEngine::new(cage, weights)?.warp(region, fill_plain_color))
}

/// Same as [`warp`], reporting the pass to `probe`.
pub fn warp_with_probe<T, P>(
    cage: &CageModel,
    weights: &WeightBuffer<T>,
    region: Rect,
    options: &WarpOptions,
    probe: &mut P,
) -> Result<CoordinateBuffer, WarpError>
where
    T: Float + AsPrimitive<f64>,
    P: WarpProbe,
{
    Ok(CageWarpEngine::new(cage, weights)?.warp_with_probe(region, options, probe))
}
