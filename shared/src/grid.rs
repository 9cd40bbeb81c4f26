//! Word-search grid generation and lookup
//!
//! Words are placed one at a time in list order. For each word every grid
//! position and every allowed direction are shuffled independently, and the
//! first (position, direction) pair whose cells are in bounds and either empty
//! or already holding the matching letter wins. Remaining blanks are filled
//! with random letters once all words have been tried.
//!
//! A layout that leaves words out is retried from scratch with a reshuffled
//! word order, up to [`MAX_ATTEMPTS`] times. Whatever is still missing after
//! that is reported in [`GeneratedGrid::unplaced`].

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Layout attempts before the generator settles for a partial placement.
pub const MAX_ATTEMPTS: usize = 16;

/// One of the eight unit steps a word can be written along. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    South,
    SouthEast,
    NorthEast,
    West,
    North,
    NorthWest,
    SouthWest,
}

impl Direction {
    pub const FORWARD: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::SouthEast,
        Direction::NorthEast,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::South,
        Direction::SouthEast,
        Direction::NorthEast,
        Direction::West,
        Direction::North,
        Direction::NorthWest,
        Direction::SouthWest,
    ];

    pub fn allowed(allow_reverse: bool) -> &'static [Direction] {
        if allow_reverse {
            &Self::ALL
        } else {
            &Self::FORWARD
        }
    }

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn is_forward(self) -> bool {
        Self::FORWARD.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub grid_size: usize,
    pub word_count: usize,
    pub allow_reverse: bool,
}

impl LayoutConfig {
    pub const fn new(grid_size: usize, word_count: usize, allow_reverse: bool) -> Self {
        Self {
            grid_size,
            word_count,
            allow_reverse,
        }
    }
}

/// Where a word was written: start cell and direction of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub word: String,
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
}

impl Placement {
    /// Cells covered by the word, first letter first.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let len = self.word.chars().count();
        (0..len)
            .filter_map(|i| step(self.x, self.y, self.direction, i, usize::MAX))
            .collect()
    }
}

/// Advances `i` steps from (x, y), or None when that leaves a `size`-wide grid.
fn step(x: usize, y: usize, direction: Direction, i: usize, size: usize) -> Option<(usize, usize)> {
    let (dx, dy) = direction.delta();
    let i = isize::try_from(i).ok()?;
    let nx = isize::try_from(x).ok()?.checked_add(dx.checked_mul(i)?)?;
    let ny = isize::try_from(y).ok()?.checked_add(dy.checked_mul(i)?)?;
    let nx = usize::try_from(nx).ok()?;
    let ny = usize::try_from(ny).ok()?;
    if nx < size && ny < size {
        Some((nx, ny))
    } else {
        None
    }
}

/// Square letter matrix, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Builds a grid from rows; None unless the rows form a square.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            let before = cells.len();
            cells.extend(row.chars());
            if cells.len() - before != size {
                return None;
            }
        }
        Some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells.get(y * self.size + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Reads `len` letters starting at (x, y) along `direction`.
    pub fn read(&self, x: usize, y: usize, direction: Direction, len: usize) -> Option<String> {
        (0..len)
            .map(|i| {
                let (cx, cy) = step(x, y, direction, i, self.size)?;
                self.get(cx, cy)
            })
            .collect()
    }

    /// Finds `word` anywhere in the grid, trying the reverse directions only
    /// when `allow_reverse` is set.
    pub fn locate(&self, word: &str, allow_reverse: bool) -> Option<Placement> {
        let letters: Vec<char> = word.chars().collect();
        if letters.is_empty() {
            return None;
        }
        for y in 0..self.size {
            for x in 0..self.size {
                if self.get(x, y) != Some(letters[0]) {
                    continue;
                }
                for &direction in Direction::allowed(allow_reverse) {
                    let matches = letters.iter().enumerate().all(|(i, letter)| {
                        step(x, y, direction, i, self.size)
                            .and_then(|(cx, cy)| self.get(cx, cy))
                            == Some(*letter)
                    });
                    if matches {
                        return Some(Placement {
                            word: word.to_string(),
                            x,
                            y,
                            direction,
                        });
                    }
                }
            }
        }
        None
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedGrid {
    pub grid: Grid,
    /// Placed words, in the order of the input list.
    pub placements: Vec<Placement>,
    /// Words that fit in none of the attempts, in the order of the input list.
    pub unplaced: Vec<String>,
}

impl GeneratedGrid {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn placed_words(&self) -> Vec<String> {
        self.placements.iter().map(|p| p.word.clone()).collect()
    }
}

struct Layout {
    cells: Vec<Option<char>>,
    placements: Vec<(usize, Placement)>,
    unplaced: Vec<usize>,
}

/// Places `words` into a `config.grid_size` square grid.
pub fn generate<W, R>(words: &[W], config: &LayoutConfig, rng: &mut R) -> GeneratedGrid
where
    W: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..words.len()).collect();
    let mut best = place_words(words, &order, config, rng);

    for _ in 1..MAX_ATTEMPTS {
        if best.unplaced.is_empty() {
            break;
        }
        order.shuffle(rng);
        let candidate = place_words(words, &order, config, rng);
        if candidate.unplaced.len() < best.unplaced.len() {
            best = candidate;
        }
    }

    let Layout {
        cells,
        mut placements,
        mut unplaced,
    } = best;

    let cells = cells
        .into_iter()
        .map(|cell| cell.unwrap_or_else(|| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char))
        .collect();

    placements.sort_by_key(|(index, _)| *index);
    unplaced.sort_unstable();

    GeneratedGrid {
        grid: Grid {
            size: config.grid_size,
            cells,
        },
        placements: placements.into_iter().map(|(_, p)| p).collect(),
        unplaced: unplaced
            .into_iter()
            .map(|i| words[i].as_ref().to_string())
            .collect(),
    }
}

/// One layout attempt over an empty grid, trying words in `order`.
fn place_words<W, R>(words: &[W], order: &[usize], config: &LayoutConfig, rng: &mut R) -> Layout
where
    W: AsRef<str>,
    R: Rng + ?Sized,
{
    let size = config.grid_size;
    let mut layout = Layout {
        cells: vec![None; size * size],
        placements: Vec::with_capacity(order.len()),
        unplaced: Vec::new(),
    };

    let mut positions: Vec<(usize, usize)> = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .collect();
    let mut directions = Direction::allowed(config.allow_reverse).to_vec();

    for &index in order {
        let word = words[index].as_ref();
        let letters: Vec<char> = word.chars().collect();

        positions.shuffle(rng);
        directions.shuffle(rng);

        let found = positions.iter().find_map(|&(x, y)| {
            directions
                .iter()
                .find(|&&direction| fits(&layout.cells, size, &letters, x, y, direction))
                .map(|&direction| (x, y, direction))
        });

        match found {
            Some((x, y, direction)) => {
                for (i, letter) in letters.iter().enumerate() {
                    if let Some((cx, cy)) = step(x, y, direction, i, size) {
                        layout.cells[cy * size + cx] = Some(*letter);
                    }
                }
                layout.placements.push((
                    index,
                    Placement {
                        word: word.to_string(),
                        x,
                        y,
                        direction,
                    },
                ));
            }
            None => layout.unplaced.push(index),
        }
    }

    layout
}

fn fits(
    cells: &[Option<char>],
    size: usize,
    letters: &[char],
    x: usize,
    y: usize,
    direction: Direction,
) -> bool {
    letters.iter().enumerate().all(|(i, letter)| {
        match step(x, y, direction, i, size) {
            Some((cx, cy)) => match cells[cy * size + cx] {
                None => true,
                Some(existing) => existing == *letter,
            },
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    const ANIMALES: [&str; 8] = [
        "TIGRILLO",
        "CONDOR",
        "JAGUAR",
        "BALLENA",
        "TUCAN",
        "IGUANA",
        "DELFIN",
        "ARMADILLO",
    ];

    fn assert_placements_valid(generated: &GeneratedGrid, allow_reverse: bool) {
        for placement in &generated.placements {
            if !allow_reverse {
                assert!(placement.direction.is_forward());
            }
            let len = placement.word.chars().count();
            let read = generated
                .grid
                .read(placement.x, placement.y, placement.direction, len)
                .expect("placement runs off the grid");
            assert_eq!(read, placement.word);
        }
    }

    #[test]
    fn test_direction_sets() {
        assert_eq!(Direction::allowed(false).len(), 4);
        assert_eq!(Direction::allowed(true).len(), 8);
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let opposite: Vec<&Direction> = Direction::ALL
                .iter()
                .filter(|d| d.delta() == (-dx, -dy))
                .collect();
            assert_eq!(opposite.len(), 1);
            assert_ne!(direction.is_forward(), opposite[0].is_forward());
        }
    }

    #[test]
    fn test_generate_shape_and_full_coverage() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = LayoutConfig::new(12, 8, true);
        let generated = generate(&ANIMALES, &config, &mut rng);

        assert_eq!(generated.grid.size(), 12);
        assert_eq!(generated.grid.cells().len(), 144);
        assert_eq!(generated.grid.rows().count(), 12);
        assert!(generated.grid.rows().all(|row| row.len() == 12));
        assert!(generated
            .grid
            .cells()
            .iter()
            .all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_placements_spell_words_forward_only() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let config = LayoutConfig::new(10, 6, false);
            let generated = generate(&ANIMALES[..6], &config, &mut rng);
            assert_placements_valid(&generated, false);
        }
    }

    #[test]
    fn test_placements_spell_words_with_reverse() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let config = LayoutConfig::new(12, 8, true);
            let generated = generate(&ANIMALES, &config, &mut rng);
            assert!(generated.is_complete());
            assert_eq!(generated.placements.len(), 8);
            assert_placements_valid(&generated, true);
        }
    }

    #[test]
    fn test_shared_cells_agree() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let config = LayoutConfig::new(10, 8, true);
            let generated = generate(&ANIMALES, &config, &mut rng);

            let mut claimed: HashMap<(usize, usize), char> = HashMap::new();
            for placement in &generated.placements {
                for (cell, letter) in placement.cells().into_iter().zip(placement.word.chars()) {
                    if let Some(previous) = claimed.insert(cell, letter) {
                        assert_eq!(previous, letter, "conflicting overlap at {:?}", cell);
                    }
                }
            }
        }
    }

    #[test]
    fn test_identical_words_share_a_single_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = LayoutConfig::new(1, 2, false);
        let generated = generate(&["A", "A"], &config, &mut rng);

        assert!(generated.is_complete());
        assert_eq!(generated.grid.get(0, 0), Some('A'));
        assert_eq!(generated.placements.len(), 2);
    }

    #[test]
    fn test_word_longer_than_grid_is_reported() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = LayoutConfig::new(5, 3, true);
        let generated = generate(&["CAT", "ARMADILLO", "DOG"], &config, &mut rng);

        assert_eq!(generated.unplaced, vec!["ARMADILLO".to_string()]);
        assert_eq!(
            generated.placed_words(),
            vec!["CAT".to_string(), "DOG".to_string()]
        );
        assert!(generated.grid.cells().iter().all(|c| c.is_ascii_uppercase()));
        assert_placements_valid(&generated, true);
    }

    #[test]
    fn test_retry_recovers_from_incomplete_first_pass() {
        let config = LayoutConfig::new(9, 8, false);
        let order: Vec<usize> = (0..ANIMALES.len()).collect();
        let mut recovered = 0;

        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let first_pass = place_words(&ANIMALES, &order, &config, &mut rng);
            if first_pass.unplaced.is_empty() {
                continue;
            }
            let generated = generate(&ANIMALES, &config, &mut StdRng::seed_from_u64(seed));
            assert!(generated.is_complete(), "seed {} left {:?}", seed, generated.unplaced);
            assert_eq!(generated.placed_words(), ANIMALES.map(String::from).to_vec());
            assert_placements_valid(&generated, false);
            recovered += 1;
        }

        assert!(recovered > 0);
    }

    #[test]
    fn test_placements_keep_input_order() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = LayoutConfig::new(12, 8, true);
        let generated = generate(&ANIMALES, &config, &mut rng);
        assert_eq!(generated.placed_words(), ANIMALES.map(String::from).to_vec());
    }

    #[test]
    fn test_same_seed_same_grid() {
        let config = LayoutConfig::new(12, 8, true);
        let a = generate(&ANIMALES, &config, &mut StdRng::seed_from_u64(77));
        let b = generate(&ANIMALES, &config, &mut StdRng::seed_from_u64(77));
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn test_fill_letters_uniform() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = LayoutConfig::new(200, 0, false);
        let empty: [&str; 0] = [];
        let generated = generate(&empty, &config, &mut rng);

        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in generated.grid.cells() {
            *counts.entry(*c).or_default() += 1;
        }
        assert_eq!(counts.len(), 26);
        let total = generated.grid.cells().len() as f64;
        for count in counts.values() {
            assert_approx_eq!(*count as f64 / total, 1.0 / 26.0, 0.005);
        }
    }

    #[test]
    fn test_locate_finds_forward_and_reverse() {
        let grid = Grid::from_rows(&["CATX", "XOXX", "XXWX", "GODX"]).unwrap();

        let cat = grid.locate("CAT", false).unwrap();
        assert_eq!((cat.x, cat.y, cat.direction), (0, 0, Direction::East));

        let cow = grid.locate("COW", false).unwrap();
        assert_eq!((cow.x, cow.y, cow.direction), (0, 0, Direction::SouthEast));

        assert!(grid.locate("DOG", false).is_none());
        let dog = grid.locate("DOG", true).unwrap();
        assert_eq!((dog.x, dog.y, dog.direction), (2, 3, Direction::West));

        assert!(grid.locate("BIRD", true).is_none());
        assert!(grid.locate("", true).is_none());
    }

    #[test]
    fn test_locate_agrees_with_generated_placements() {
        let mut rng = StdRng::seed_from_u64(12);
        let config = LayoutConfig::new(14, 8, true);
        let generated = generate(&ANIMALES, &config, &mut rng);
        for word in ANIMALES {
            assert!(generated.grid.locate(word, true).is_some(), "{} missing", word);
        }
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(Grid::from_rows(&["AB", "C"]).is_none());
        assert!(Grid::from_rows(&["ABC", "DEF"]).is_none());
        assert_eq!(Grid::from_rows(&["AB", "CD"]).unwrap().get(1, 1), Some('D'));
    }
}
