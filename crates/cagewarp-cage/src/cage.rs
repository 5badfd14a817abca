use glam::DVec2;

use crate::error::CageError;
use crate::polygon::{outward_normal, point_in_polygon_by, signed_area2_by};
use crate::rect::Rect;

/// Which position set of the cage an operation works on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CageMode {
    /// The cage itself is being drawn or edited: the `source` positions.
    #[default]
    EditingCage,
    /// The cage is being deformed: the `destination` positions.
    Deforming,
}

/// A control vertex of the cage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CageVertex {
    /// Position of the vertex in the original image.
    pub source: DVec2,
    /// Position of the vertex after the deformation.
    pub destination: DVec2,
    /// Outward unit normal of the destination edge from this vertex to the next one.
    pub edge_normal: DVec2,
    /// Length ratio between the destination and the source edge starting at this vertex.
    pub edge_scale: f64,
    /// Whether the vertex is part of the current selection.
    pub selected: bool,
}

impl CageVertex {
    /// Create an unselected vertex whose source and destination are both `pos`.
    pub fn new(pos: DVec2) -> Self {
        Self {
            source: pos,
            destination: pos,
            edge_normal: DVec2::ZERO,
            edge_scale: 1.0,
            selected: false,
        }
    }

    /// Position of the vertex in the given mode.
    #[inline]
    pub fn position(&self, mode: CageMode) -> DVec2 {
        match mode {
            CageMode::EditingCage => self.source,
            CageMode::Deforming => self.destination,
        }
    }
}

/// Closed polygonal cage driving a warp.
///
/// The order of the vertices defines the polygon winding and the edges: vertex `i` is joined
/// to vertex `(i + 1) % n`. A cage with fewer than three vertices is a valid but not yet usable
/// state.
///
/// Edge normals and edge scales are kept up to date after every mutation that moves or
/// reorders vertices.
///
/// # Examples
///
/// ```
/// use cagewarp_cage::{CageModel, CageMode};
/// use glam::DVec2;
///
/// let mut cage = CageModel::new();
/// cage.add_point(DVec2::new(0.0, 0.0));
/// cage.add_point(DVec2::new(10.0, 0.0));
/// cage.add_point(DVec2::new(10.0, 10.0));
/// cage.add_point(DVec2::new(0.0, 10.0));
///
/// assert_eq!(cage.point_count(), 4);
/// assert!(cage.point_inside(CageMode::EditingCage, DVec2::new(5.0, 5.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CageModel {
    vertices: Vec<CageVertex>,
    displacement: DVec2,
    mode: CageMode,
}

impl CageModel {
    /// Create an empty cage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cage from a list of positions, used both as source and destination.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut cage = Self {
            vertices: points.into_iter().map(CageVertex::new).collect(),
            ..Self::default()
        };
        cage.update_edges();
        cage
    }

    /// Number of vertices in the cage.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the cage has no vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get as reference the vertices of the cage.
    pub fn vertices(&self) -> &[CageVertex] {
        &self.vertices
    }

    /// Get as reference the vertex at `index`, if any.
    pub fn vertex(&self, index: usize) -> Option<&CageVertex> {
        self.vertices.get(index)
    }

    /// Mode of the last displacement.
    pub fn mode(&self) -> CageMode {
        self.mode
    }

    /// Displacement accumulated since the last commit or reset.
    pub fn displacement(&self) -> DVec2 {
        self.displacement
    }

    /// Append a vertex at `pos` after the last one.
    pub fn add_point(&mut self, pos: DVec2) {
        self.vertices.push(CageVertex::new(pos));
        self.update_edges();
    }

    /// Insert a vertex at `pos` so that it ends up at `index`.
    ///
    /// `index` may be equal to [`CageModel::point_count`], which appends the vertex.
    pub fn insert_point(&mut self, index: usize, pos: DVec2) -> Result<(), CageError> {
        if index > self.vertices.len() {
            return Err(self.out_of_range(index));
        }
        self.vertices.insert(index, CageVertex::new(pos));
        self.update_edges();
        Ok(())
    }

    /// Remove the vertex at `index` and return it.
    pub fn remove_point(&mut self, index: usize) -> Result<CageVertex, CageError> {
        if index >= self.vertices.len() {
            return Err(self.out_of_range(index));
        }
        let vertex = self.vertices.remove(index);
        self.update_edges();
        Ok(vertex)
    }

    /// Remove the last vertex, if any.
    pub fn remove_last_point(&mut self) -> Option<CageVertex> {
        let vertex = self.vertices.pop();
        if vertex.is_some() {
            self.update_edges();
        }
        vertex
    }

    /// Remove every selected vertex and return how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.vertices.len();
        self.vertices.retain(|v| !v.selected);
        let removed = before - self.vertices.len();
        if removed > 0 {
            self.update_edges();
        }
        removed
    }

    /// Position of the vertex at `index` in the given mode.
    pub fn point_coordinate(&self, mode: CageMode, index: usize) -> Result<DVec2, CageError> {
        self.vertices
            .get(index)
            .map(|v| v.position(mode))
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Position of the vertex at `index` with the pending displacement applied if the vertex
    /// is selected and the displacement targets `mode`.
    pub fn displaced_point_coordinate(
        &self,
        mode: CageMode,
        index: usize,
    ) -> Result<DVec2, CageError> {
        let vertex = self
            .vertices
            .get(index)
            .ok_or_else(|| self.out_of_range(index))?;

        let pos = vertex.position(mode);
        if vertex.selected && self.moves(mode) {
            return Ok(pos + self.displacement);
        }
        Ok(pos)
    }

    /// Bounding box of the destination positions.
    ///
    /// Empty when the cage has fewer than three vertices.
    pub fn bounding_box(&self) -> Rect {
        self.bounding_box_for(CageMode::Deforming)
    }

    /// Bounding box of the positions of the given mode.
    ///
    /// Empty when the cage has fewer than three vertices.
    pub fn bounding_box_for(&self, mode: CageMode) -> Rect {
        if self.vertices.len() < 3 {
            return Rect::default();
        }
        Rect::enclosing(self.vertices.iter().map(|v| v.position(mode)))
    }

    /// Check if `p` lies inside the polygon formed by the positions of the given mode.
    ///
    /// Uses the even-odd rule, so the answer does not depend on the vertex order direction.
    pub fn point_inside(&self, mode: CageMode, p: DVec2) -> bool {
        point_in_polygon_by(self.vertices.len(), |i| self.vertices[i].position(mode), p)
    }

    /// Signed area of the polygon formed by the positions of the given mode.
    ///
    /// Positive when the vertices run clockwise on a y-down image.
    pub fn signed_area(&self, mode: CageMode) -> f64 {
        0.5 * signed_area2_by(self.vertices.len(), |i| self.vertices[i].position(mode))
    }

    /// Accumulate `delta` into the pending displacement of the selected vertices.
    ///
    /// Switching `mode` keeps the displacement accumulated so far.
    pub fn add_displacement(&mut self, mode: CageMode, delta: DVec2) {
        self.mode = mode;
        self.displacement += delta;
    }

    /// Apply the pending displacement to every selected vertex and clear it.
    ///
    /// In [`CageMode::EditingCage`] the whole vertex moves (source and destination); in
    /// [`CageMode::Deforming`] only the destination does. Returns `true` if a vertex moved.
    pub fn commit_displacement(&mut self) -> bool {
        let delta = self.displacement;
        let mode = self.mode;
        self.displacement = DVec2::ZERO;

        if delta == DVec2::ZERO {
            return false;
        }

        let mut moved = false;
        for vertex in self.vertices.iter_mut().filter(|v| v.selected) {
            if mode == CageMode::EditingCage {
                vertex.source += delta;
            }
            vertex.destination += delta;
            moved = true;
        }

        if moved {
            self.update_edges();
        }
        moved
    }

    /// Discard the pending displacement. Returns `true` if there was one.
    pub fn reset_displacement(&mut self) -> bool {
        let pending = self.displacement != DVec2::ZERO;
        self.displacement = DVec2::ZERO;
        pending
    }

    /// Reverse the vertex order if the destination polygon has a negative signed area.
    ///
    /// Returns `true` if the cage was reversed.
    pub fn reverse_cage_if_needed(&mut self) -> bool {
        let area = self.signed_area(CageMode::Deforming);
        if area < 0.0 {
            log::trace!("reversing cage with signed area {}", area);
            self.reverse_cage();
            return true;
        }
        false
    }

    /// Reverse the vertex order.
    pub fn reverse_cage(&mut self) {
        self.vertices.reverse();
        self.update_edges();
    }

    /// Make the vertex at `index` the only selected one.
    pub fn select_point(&mut self, index: usize) -> Result<(), CageError> {
        if index >= self.vertices.len() {
            return Err(self.out_of_range(index));
        }
        self.deselect_points();
        self.vertices[index].selected = true;
        Ok(())
    }

    /// Flip the selection state of the vertex at `index`.
    pub fn toggle_point_selection(&mut self, index: usize) -> Result<(), CageError> {
        let len = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(index)
            .ok_or(CageError::IndexOutOfRange { index, len })?;
        vertex.selected = !vertex.selected;
        Ok(())
    }

    /// Clear the selection. Returns `true` if a vertex was selected.
    pub fn deselect_points(&mut self) -> bool {
        let mut changed = false;
        for vertex in self.vertices.iter_mut() {
            changed |= vertex.selected;
            vertex.selected = false;
        }
        changed
    }

    /// Replace the selection with the vertices whose position in `mode` lies in `area`.
    ///
    /// Returns `true` if the selection changed.
    pub fn select_area(&mut self, mode: CageMode, area: Rect) -> bool {
        let before: Vec<bool> = self.vertices.iter().map(|v| v.selected).collect();
        self.deselect_points();
        self.select_add_area(mode, area);
        self.vertices
            .iter()
            .zip(before)
            .any(|(v, was)| v.selected != was)
    }

    /// Add the vertices whose position in `mode` lies in `area` to the selection.
    ///
    /// Returns `true` if the selection changed.
    pub fn select_add_area(&mut self, mode: CageMode, area: Rect) -> bool {
        let mut changed = false;
        for vertex in self.vertices.iter_mut() {
            if !vertex.selected && area.contains_point(vertex.position(mode)) {
                vertex.selected = true;
                changed = true;
            }
        }
        changed
    }

    /// Check if the vertex at `index` is selected. Out of range indices are never selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.vertices.get(index).is_some_and(|v| v.selected)
    }

    /// Number of selected vertices.
    pub fn selected_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.selected).count()
    }

    // whether a pending displacement in the current mode shows up in `mode` positions
    fn moves(&self, mode: CageMode) -> bool {
        self.mode == CageMode::EditingCage || mode == CageMode::Deforming
    }

    fn out_of_range(&self, index: usize) -> CageError {
        CageError::IndexOutOfRange {
            index,
            len: self.vertices.len(),
        }
    }

    fn update_edges(&mut self) {
        let n = self.vertices.len();
        let area2 = signed_area2_by(n, |i| self.vertices[i].destination);

        for i in 0..n {
            let next = self.vertices[(i + 1) % n];
            let current = &mut self.vertices[i];

            current.edge_normal = outward_normal(current.destination, next.destination, area2);

            let source_len = (next.source - current.source).length();
            let destination_len = (next.destination - current.destination).length();
            current.edge_scale = if source_len > f64::EPSILON {
                destination_len / source_len
            } else {
                1.0
            };
        }
    }
}
