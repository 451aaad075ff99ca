pub mod config;
pub mod core;
pub mod ecs;
pub mod engine;
pub mod game;
pub mod input;
pub mod mesh;
pub mod scene;
pub mod systems;
