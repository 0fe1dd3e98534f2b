/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for cell totals and revealed-cell counters.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Value assigned to a cell, which is also the number of points it is worth.
/// Wide enough for any non-negative value a stored seed may carry.
pub type TileValue = u32;

/// Accumulated points for a play-through and the persisted high score.
pub type Score = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Iterates every coordinate of a `size`×`size` board in row-major order.
pub fn iter_coords(size: Coord) -> impl Iterator<Item = Coord2> {
    (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
}
