// Engine modules: assets, scene graph, renderer, input and frame timing

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod scene;
