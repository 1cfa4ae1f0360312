mod draw;
mod overlay;
mod panels;
mod style;

pub use draw::draw;
