mod commands;
mod history;

pub use commands::CanvasCommand;
pub use history::History;
