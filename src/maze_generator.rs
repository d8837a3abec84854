//! Maze generation with randomized Prim's algorithm

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{Cell, Maze, MazeError, Point};

/// Where the finish is placed once carving is done
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FinishPlacement {
    /// The last square carved before the frontier ran out
    #[default]
    LastCarved,
    /// The open square furthest from start by walking distance. Ties go to
    /// the first square in row-major order.
    Farthest,
}

/// Maze generator owning its random source
pub struct MazeGenerator {
    random: StdRng,
    finish: FinishPlacement,
}

impl MazeGenerator {
    /// Create generator, seeded from `seed` or from system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
            finish: FinishPlacement::default(),
        }
    }

    #[must_use]
    pub fn with_finish(mut self, placement: FinishPlacement) -> Self {
        self.finish = placement;
        self
    }

    /// Generate a `width` x `height` maze, border included.
    pub fn generate_maze(&mut self, width: usize, height: usize) -> Result<Maze, MazeError> {
        generate_with(width, height, self.finish, &mut self.random)
    }
}

/// Generate a `width` x `height` maze with the finish on the last carved
/// square.
///
/// Both sides must be at least [Maze::MIN_SIDE], otherwise
/// [MazeError::InvalidDimensions] is returned. The same random sequence and
/// dimensions always give the same maze.
///
/// # Examples
/// ```
/// use prim_maze::{generate, MazeError};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let maze = generate(5, 5, &mut rng).unwrap();
/// assert_eq!(maze.render().lines().count(), 5);
///
/// assert_eq!(
///     generate(3, 10, &mut rng),
///     Err(MazeError::InvalidDimensions { width: 3, height: 10 })
/// );
/// ```
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<Maze, MazeError> {
    generate_with(width, height, FinishPlacement::LastCarved, rng)
}

/// [generate] with a choice of finish placement
pub fn generate_with<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    finish: FinishPlacement,
    rng: &mut R,
) -> Result<Maze, MazeError> {
    if width < Maze::MIN_SIDE || height < Maze::MIN_SIDE {
        return Err(MazeError::InvalidDimensions { width, height });
    }

    let mut interior = Interior::new(width - 2, height - 2);
    let start = (
        rng.gen_range(0..interior.width),
        rng.gen_range(0..interior.height),
    );
    interior.set(start, Cell::Start);

    let last_carved = interior.carve_from(start, rng);

    // Nothing could be carved from this start, open one neighbour instead
    let end = if last_carved == start {
        match interior.wall_neighbours(start).choose(rng) {
            Some(frontier) => frontier.wall,
            None => unreachable!("interior of at least 2x2 has a wall next to start"),
        }
    } else {
        last_carved
    };
    interior.set(end, Cell::Finish);

    let mut maze = Maze::framed(interior.cells, start, end);
    if finish == FinishPlacement::Farthest {
        if let Some(farthest) = farthest_from_start(&maze) {
            maze.move_finish(farthest);
        }
    }
    Ok(maze)
}

/// Open square with the largest walking distance from start
fn farthest_from_start(maze: &Maze) -> Option<Point> {
    let mut best: Option<(usize, Point)> = None;
    for (y, row) in maze.distances().iter().enumerate() {
        for (x, dist) in row.iter().enumerate() {
            if let Some(dist) = *dist {
                if best.map_or(true, |(best_dist, _)| dist > best_dist) {
                    best = Some((dist, Point::new(x as isize, y as isize)));
                }
            }
        }
    }
    best.filter(|(dist, _)| *dist > 0).map(|(_, point)| point)
}

/// Wall square waiting to be carved, with the square that found it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierPoint {
    wall: (usize, usize),
    proposer: (usize, usize),
}

impl FrontierPoint {
    /// Square on the other side of the wall, seen from the proposer
    ///
    /// `None` if the wall and proposer are the same square.
    fn opposite(&self) -> Option<(isize, isize)> {
        let (wx, wy) = (self.wall.0 as isize, self.wall.1 as isize);
        let (px, py) = (self.proposer.0 as isize, self.proposer.1 as isize);

        if wx != px {
            Some((wx + (wx - px), wy))
        } else if wy != py {
            Some((wx, wy + (wy - py)))
        } else {
            None
        }
    }
}

/// Maze without its border, indexed `cells[y][x]`
struct Interior {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
}

impl Interior {
    const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

    fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![vec![Cell::Wall; width]; height],
            width,
            height,
        }
    }

    fn set(&mut self, (x, y): (usize, usize), cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Index of `(x, y)` if it is inside and still a wall
    fn wall_at(&self, (x, y): (isize, isize)) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        (self.cells[y][x] == Cell::Wall).then_some((x, y))
    }

    fn wall_neighbours(&self, proposer: (usize, usize)) -> Vec<FrontierPoint> {
        let (px, py) = (proposer.0 as isize, proposer.1 as isize);
        Self::DIRECTIONS
            .iter()
            .filter_map(|(dx, dy)| self.wall_at((px + dx, py + dy)))
            .map(|wall| FrontierPoint { wall, proposer })
            .collect()
    }

    /// Grow passages from `start` until the frontier is empty.
    ///
    /// Returns the last square opened, or `start` if none was.
    fn carve_from<R: Rng + ?Sized>(
        &mut self,
        start: (usize, usize),
        rng: &mut R,
    ) -> (usize, usize) {
        let mut last_carved = start;
        let mut frontier = self.wall_neighbours(start);

        while !frontier.is_empty() {
            let picked = frontier.swap_remove(rng.gen_range(0..frontier.len()));
            let Some(opposite) = picked.opposite() else {
                unreachable!("frontier point {:?} is its own proposer", picked.wall)
            };

            // The wall itself may already be open from another side; the
            // opposite square decides.
            if let Some(opposite) = self.wall_at(opposite) {
                self.set(picked.wall, Cell::Empty);
                self.set(opposite, Cell::Empty);
                frontier.extend(self.wall_neighbours(opposite));
                last_carved = opposite;
            }
        }
        last_carved
    }
}
