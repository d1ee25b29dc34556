//! World position to map grid label, matching the in-game map overlay.
//!
//! The map is cut into 150 unit squares. Columns are lettered from the west
//! edge (`A`, `B`, ... `Z`, `AA`, `AB`, ...) and rows are numbered from the
//! north edge starting at `0`, so a label reads like `D12`.

use host_event_system::Position;

/// Edge length of one map grid cell in world units.
pub const CELL_SIZE: f64 = 150.0;

pub fn grid_label(position: Position, world_size: u32) -> String {
    let size = f64::from(world_size);
    let x = position.x + size / 2.0;
    let z = position.z + size / 2.0;

    let column = (x / CELL_SIZE).floor() as i64;
    let row = (size / CELL_SIZE - z / CELL_SIZE).floor() as i64;

    format!("{}{}", column_letters(column), row)
}

/// Spreadsheet style column letters; positions west of the map clamp to `A`.
fn column_letters(column: i64) -> String {
    let mut n = column.max(0) as u64;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: u32 = 3000;

    fn at(x: f64, z: f64) -> String {
        grid_label(Position::new(x, 0.0, z), WORLD)
    }

    #[test]
    fn north_west_corner_is_a0() {
        assert_eq!(at(-1500.0, 1500.0), "A0");
    }

    #[test]
    fn map_centre() {
        // 1500 / 150 = 10 columns in -> K, 20 - 10 = 10 rows down.
        assert_eq!(at(0.0, 0.0), "K10");
    }

    #[test]
    fn known_cell() {
        assert_eq!(at(-1125.0, 375.0), "C7");
    }

    #[test]
    fn stepping_east_advances_one_letter() {
        let west = at(-1000.0, 75.0);
        let east = at(-1000.0 + CELL_SIZE, 75.0);
        assert_eq!(west, "D9");
        assert_eq!(east, "E9");
    }

    #[test]
    fn stepping_north_decreases_the_row() {
        let south = at(75.0, -425.0);
        let north = at(75.0, -425.0 + CELL_SIZE);
        assert_eq!(south, "K12");
        assert_eq!(north, "K11");
    }

    #[test]
    fn same_position_same_label() {
        assert_eq!(at(321.5, -87.25), at(321.5, -87.25));
    }

    #[test]
    fn wide_maps_continue_with_double_letters() {
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(52), "BA");
        assert_eq!(grid_label(Position::new(2000.0, 0.0, 0.0), 6000), "AH20");
    }

    #[test]
    fn off_map_west_clamps_to_a() {
        assert_eq!(column_letters(-3), "A");
    }
}
