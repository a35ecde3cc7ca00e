//! World model: cells, entities and the query interface used by the encoder

pub mod cell;
pub mod grid;
pub mod io;
pub mod view;

pub use cell::{AgentSpec, Cell, Color, Direction, LaserSpec, Position};
pub use grid::World;
pub use io::{create_example_levels, load_world_from_file, parse_world_from_string, save_world_to_file, world_to_string};
pub use view::WorldView;
