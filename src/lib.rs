//! Random perfect mazes carved with randomized Prim's algorithm
//!
//! A [Maze] is a rectangular grid of [Cell]s framed by a solid wall, with
//! exactly one start and one finish. Every open cell can be reached from the
//! start.
//!
//! # Examples
//! ## Generate and print a maze
//! ```
//! use prim_maze::{generate, Cell};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let maze = generate(17, 8, &mut rng).unwrap();
//!
//! assert_eq!(maze.width(), 17);
//! assert_eq!(maze.height(), 8);
//! assert_eq!(maze.cell_at(0, 0).unwrap(), Cell::Wall);
//! print!("{}", maze.render());
//! ```
//!
//! ## Solve a rendered maze
//! ```
//! use prim_maze::Maze;
//!
//! let text = "
//! **********
//! *  S    **
//! * * *** **
//! * *   *F**
//! **********";
//! let maze: Maze = text.trim().parse().unwrap();
//! let path = maze.solve().unwrap();
//! assert_eq!(path.len() - 1, 6);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

pub mod maze_generator;

pub use maze_generator::{generate, generate_with, FinishPlacement, MazeGenerator};

/// State of a single maze square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Empty,
    Start,
    Finish,
}

impl Cell {
    const S_WALL: char = '*';
    const S_EMPTY: char = ' ';
    const S_START: char = 'S';
    const S_FINISH: char = 'F';

    /// Character used for this cell in [Maze::render]
    pub const fn symbol(self) -> char {
        match self {
            Cell::Wall => Self::S_WALL,
            Cell::Empty => Self::S_EMPTY,
            Cell::Start => Self::S_START,
            Cell::Finish => Self::S_FINISH,
        }
    }

    /// Inverse of [Cell::symbol]
    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            Self::S_WALL => Some(Cell::Wall),
            Self::S_EMPTY => Some(Cell::Empty),
            Self::S_START => Some(Cell::Start),
            Self::S_FINISH => Some(Cell::Finish),
            _ => None,
        }
    }

    /// Whether the cell can be walked on
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

/// Location in the maze
///
/// Coordinates are signed, so that neighbours of border cells can be
/// addressed and rejected with [MazeError::OutOfBounds].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// Neighbouring point one step towards `direction`
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Movement direction on the grid. `Up` is towards row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)`
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Errors from generating, querying and parsing mazes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height below [Maze::MIN_SIDE]
    InvalidDimensions { width: usize, height: usize },
    /// Query outside `[0, width) x [0, height)`
    OutOfBounds { x: isize, y: isize },
    /// Parsed text contains a character that is not a cell symbol
    UnknownCharacter { ch: char, x: usize, y: usize },
    /// Parsed row length differs from the first row
    RaggedRow { y: usize },
    /// Parsed text has a non-wall cell on the outer ring
    OpenBorder { x: usize, y: usize },
    MissingStart,
    MissingFinish,
    DuplicateStart,
    DuplicateFinish,
    /// Finish cannot be reached from start
    Unreachable,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { width, height } => write!(
                f,
                "Invalid maze dimensions {}x{}, both sides must be at least {}",
                width,
                height,
                Maze::MIN_SIDE
            ),
            MazeError::OutOfBounds { x, y } => {
                write!(f, "Position x={}, y={} is outside the maze", x, y)
            }
            MazeError::UnknownCharacter { ch, x, y } => {
                write!(f, "Unexpected character `{}` at x={}, y={}", ch, x, y)
            }
            MazeError::RaggedRow { y } => {
                write!(f, "Row {} length differs from the first row", y)
            }
            MazeError::OpenBorder { x, y } => {
                write!(f, "Border is not a wall at x={}, y={}", x, y)
            }
            MazeError::MissingStart => f.write_str("Start is not found in maze"),
            MazeError::MissingFinish => f.write_str("Finish is not found in maze"),
            MazeError::DuplicateStart => f.write_str("Maze has more than one start"),
            MazeError::DuplicateFinish => f.write_str("Maze has more than one finish"),
            MazeError::Unreachable => f.write_str("Finish cannot be reached from start"),
        }
    }
}

impl std::error::Error for MazeError {}

/// Walled grid with one start and one finish
///
/// Squares are stored row-major, `squares[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    squares: Vec<Vec<Cell>>,
    start: Point,
    finish: Point,
}

impl Maze {
    /// Smallest accepted width and height: the border plus a 2x2 interior
    pub const MIN_SIDE: usize = 4;

    /// Wrap a carved interior into a one square thick wall.
    ///
    /// `start` and `finish` are interior coordinates `(x, y)`.
    pub(crate) fn framed(
        interior: Vec<Vec<Cell>>,
        start: (usize, usize),
        finish: (usize, usize),
    ) -> Self {
        let inner_width = interior.first().map_or(0, Vec::len);
        let wall_row = vec![Cell::Wall; inner_width + 2];

        let mut squares = Vec::with_capacity(interior.len() + 2);
        squares.push(wall_row.clone());
        for row in interior {
            let mut framed_row = Vec::with_capacity(inner_width + 2);
            framed_row.push(Cell::Wall);
            framed_row.extend(row);
            framed_row.push(Cell::Wall);
            squares.push(framed_row);
        }
        squares.push(wall_row);

        let to_point = |(x, y): (usize, usize)| Point::new(x as isize + 1, y as isize + 1);
        Maze {
            squares,
            start: to_point(start),
            finish: to_point(finish),
        }
    }

    pub fn width(&self) -> usize {
        self.squares.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.squares.len()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    /// Cell at `(x, y)`
    ///
    /// Returns [MazeError::OutOfBounds] outside the grid; coordinates are
    /// never clamped.
    pub fn cell_at(&self, x: isize, y: isize) -> Result<Cell, MazeError> {
        self.index(Point::new(x, y))
            .map(|(x, y)| self.squares[y][x])
            .ok_or(MazeError::OutOfBounds { x, y })
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.squares.iter().map(Vec::as_slice)
    }

    /// Text picture of the maze, one line per row, each line terminated by
    /// a newline.
    pub fn render(&self) -> String {
        self.render_with(|_, cell| cell.symbol())
    }

    /// Render with `.` marking the empty squares on `path`
    pub fn render_path(&self, path: &[Point]) -> String {
        self.render_with(|point, cell| {
            if cell == Cell::Empty && path.contains(&point) {
                '.'
            } else {
                cell.symbol()
            }
        })
    }

    fn render_with(&self, symbol: impl Fn(Point, Cell) -> char) -> String {
        let body = self
            .squares
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, cell)| symbol(Point::new(x as isize, y as isize), *cell))
                    .join("")
            })
            .join("\n");
        body + "\n"
    }

    /// Can a walker at `from` step towards `direction`?
    ///
    /// Stepping off the grid or into a wall is not allowed. `from` itself
    /// must be inside the grid.
    pub fn can_move(&self, from: Point, direction: Direction) -> Result<bool, MazeError> {
        self.cell_at(from.x, from.y)?;
        let to = from.step(direction);
        Ok(self
            .cell_at(to.x, to.y)
            .map_or(false, |cell| cell.is_open()))
    }

    /// Breadth-first step counts from start, indexed `[y][x]`
    ///
    /// Walls and squares that cannot be reached are `None`.
    pub fn distances(&self) -> Vec<Vec<Option<usize>>> {
        let mut dist: Vec<Vec<Option<usize>>> = self
            .squares
            .iter()
            .map(|row| vec![None; row.len()])
            .collect();

        let mut queue = VecDeque::new();
        if let Some((x, y)) = self.index(self.start) {
            dist[y][x] = Some(0);
            queue.push_back(self.start);
        }

        while let Some(current) = queue.pop_front() {
            let Some((cx, cy)) = self.index(current) else {
                continue;
            };
            let steps = dist[cy][cx].unwrap_or_default();
            for next in self.open_neighbours(current) {
                if let Some((nx, ny)) = self.index(next) {
                    if dist[ny][nx].is_none() {
                        dist[ny][nx] = Some(steps + 1);
                        queue.push_back(next);
                    }
                }
            }
        }
        dist
    }

    /// Shortest path from start to finish, both ends included
    pub fn solve(&self) -> Result<Vec<Point>, MazeError> {
        let dist = self.distances();
        let distance_at = |p: Point| self.index(p).and_then(|(x, y)| dist[y][x]);

        let mut current = self.finish;
        let mut remaining = distance_at(current).ok_or(MazeError::Unreachable)?;
        let mut path = vec![current];
        while remaining > 0 {
            current = self
                .open_neighbours(current)
                .find(|&p| distance_at(p) == Some(remaining - 1))
                .ok_or(MazeError::Unreachable)?;
            path.push(current);
            remaining -= 1;
        }
        path.reverse();
        Ok(path)
    }

    /// Move the finish marker. The old finish square becomes empty.
    pub(crate) fn move_finish(&mut self, to: Point) {
        if let (Some((ox, oy)), Some((nx, ny))) = (self.index(self.finish), self.index(to)) {
            self.squares[oy][ox] = Cell::Empty;
            self.squares[ny][nx] = Cell::Finish;
            self.finish = to;
        }
    }

    fn open_neighbours(&self, from: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| from.step(direction))
            .filter(move |p| self.cell_at(p.x, p.y).map_or(false, Cell::is_open))
    }

    /// Grid index `(x, y)` of a point, if it is inside the maze
    fn index(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok().filter(|&x| x < self.width())?;
        let y = usize::try_from(point.y).ok().filter(|&y| y < self.height())?;
        Some((x, y))
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    /// Parse the text produced by [Maze::render]
    ///
    /// The trailing newline is optional. Connectivity is not checked here,
    /// see [Maze::solve].
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let squares: Vec<Vec<Cell>> = text
            .lines()
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, ch)| {
                        Cell::from_symbol(ch).ok_or(MazeError::UnknownCharacter { ch, x, y })
                    })
                    .collect::<Result<Vec<Cell>, MazeError>>()
            })
            .collect::<Result<_, MazeError>>()?;

        let height = squares.len();
        let width = squares.first().map_or(0, Vec::len);
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        let mut start = None;
        let mut finish = None;
        for (y, row) in squares.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow { y });
            }
            for (x, cell) in row.iter().enumerate() {
                let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if on_border && cell.is_open() {
                    return Err(MazeError::OpenBorder { x, y });
                }

                let point = Point::new(x as isize, y as isize);
                match cell {
                    Cell::Start => {
                        if start.replace(point).is_some() {
                            return Err(MazeError::DuplicateStart);
                        }
                    }
                    Cell::Finish => {
                        if finish.replace(point).is_some() {
                            return Err(MazeError::DuplicateFinish);
                        }
                    }
                    Cell::Wall | Cell::Empty => (),
                }
            }
        }

        Ok(Maze {
            squares,
            start: start.ok_or(MazeError::MissingStart)?,
            finish: finish.ok_or(MazeError::MissingFinish)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cell, Direction, Maze, MazeError, Point};

    const SMALL: &str = "\
*****
*F S*
*** *
*   *
*****
";

    const WIDE: &str = "\
**********
*  S    **
* * *** **
* *   *F**
**********
";

    #[test]
    fn parse_and_render_reference_mazes() {
        for text in [SMALL, WIDE] {
            let maze: Maze = text.parse().unwrap();
            assert_eq!(maze.render(), text);
            assert_eq!(maze.to_string(), text);
        }

        let maze: Maze = SMALL.parse().unwrap();
        assert_eq!((maze.width(), maze.height()), (5, 5));
        assert_eq!(maze.start(), Point::new(3, 1));
        assert_eq!(maze.finish(), Point::new(1, 1));
    }

    #[test]
    fn trailing_newline_is_optional() {
        let maze: Maze = WIDE.trim_end().parse().unwrap();
        assert_eq!(maze.render(), WIDE);
    }

    #[test]
    fn cell_lookup() {
        let maze: Maze = WIDE.parse().unwrap();
        assert_eq!(maze.cell_at(3, 1), Ok(Cell::Start));
        assert_eq!(maze.cell_at(7, 3), Ok(Cell::Finish));
        assert_eq!(maze.cell_at(1, 1), Ok(Cell::Empty));
        assert_eq!(maze.cell_at(2, 2), Ok(Cell::Wall));
    }

    #[test]
    fn out_of_bounds_queries_fail() {
        let maze: Maze = WIDE.parse().unwrap();
        assert_eq!(
            maze.cell_at(-1, 0),
            Err(MazeError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            maze.cell_at(10, 0),
            Err(MazeError::OutOfBounds { x: 10, y: 0 })
        );
        assert_eq!(
            maze.cell_at(0, 5),
            Err(MazeError::OutOfBounds { x: 0, y: 5 })
        );
    }

    #[test]
    fn movement_is_blocked_by_walls_and_edges() {
        let maze: Maze = WIDE.parse().unwrap();
        let start = maze.start();
        assert_eq!(maze.can_move(start, Direction::Left), Ok(true));
        assert_eq!(maze.can_move(start, Direction::Down), Ok(true));
        assert_eq!(maze.can_move(start, Direction::Up), Ok(false));

        // Border squares may look outwards, the answer is just no
        assert_eq!(maze.can_move(Point::new(0, 0), Direction::Left), Ok(false));
        assert_eq!(
            maze.can_move(Point::new(-1, 2), Direction::Right),
            Err(MazeError::OutOfBounds { x: -1, y: 2 })
        );
    }

    #[test]
    fn shortest_paths() {
        let maze: Maze = SMALL.parse().unwrap();
        let path = maze.solve().unwrap();
        assert_eq!(
            path,
            vec![Point::new(3, 1), Point::new(2, 1), Point::new(1, 1)]
        );

        let maze: Maze = WIDE.parse().unwrap();
        let path = maze.solve().unwrap();
        assert_eq!(path.len() - 1, 6);
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.finish()));
    }

    #[test]
    fn distances_cover_open_squares() {
        let maze: Maze = WIDE.parse().unwrap();
        let dist = maze.distances();
        assert_eq!(dist[1][3], Some(0));
        assert_eq!(dist[3][1], Some(4));
        assert_eq!(dist[3][5], Some(4));
        assert_eq!(dist[3][7], Some(6));
        assert_eq!(dist[0][0], None);
    }

    #[test]
    fn path_overlay() {
        let maze: Maze = WIDE.parse().unwrap();
        let path = maze.solve().unwrap();
        let expected = "\
**********
*  S....**
* * ***.**
* *   *F**
**********
";
        assert_eq!(maze.render_path(&path), expected);
    }

    #[test]
    fn unreachable_finish() {
        let text = "\
*****
*S* *
* *F*
*****
";
        let maze: Maze = text.parse().unwrap();
        assert_eq!(maze.solve(), Err(MazeError::Unreachable));
    }

    #[test]
    fn parse_errors() {
        let cases = [
            ("****\n*SF*\n*  *\n*x**\n", MazeError::UnknownCharacter { ch: 'x', x: 1, y: 3 }),
            ("****\n*SF*\n****\n", MazeError::InvalidDimensions { width: 4, height: 3 }),
            ("****\n*SF*\n* *\n****\n", MazeError::RaggedRow { y: 2 }),
            ("****\n*SF \n*  *\n****\n", MazeError::OpenBorder { x: 3, y: 1 }),
            ("****\n* F*\n*  *\n****\n", MazeError::MissingStart),
            ("****\n*S *\n*  *\n****\n", MazeError::MissingFinish),
            ("****\n*SS*\n*F *\n****\n", MazeError::DuplicateStart),
            ("****\n*SF*\n*F *\n****\n", MazeError::DuplicateFinish),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<Maze>(), Err(expected), "{:?}", text);
        }
    }

    #[test]
    fn framing_adds_wall_border() {
        let interior = vec![
            vec![Cell::Start, Cell::Empty],
            vec![Cell::Wall, Cell::Finish],
        ];
        let maze = Maze::framed(interior, (0, 0), (1, 1));
        assert_eq!(maze.render(), "****\n*S *\n**F*\n****\n");
        assert_eq!(maze.start(), Point::new(1, 1));
        assert_eq!(maze.finish(), Point::new(2, 2));
    }

    #[test]
    fn symbols_round_trip() {
        for cell in [Cell::Wall, Cell::Empty, Cell::Start, Cell::Finish] {
            assert_eq!(Cell::from_symbol(cell.symbol()), Some(cell));
        }
        assert_eq!(Cell::from_symbol('#'), None);
    }
}
