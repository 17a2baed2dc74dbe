pub mod page;
pub mod scene;
pub mod texture_loader;
