pub mod common;

mod genetic;
mod rl;
mod swarm;
