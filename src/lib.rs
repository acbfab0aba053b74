#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod settings;
pub mod stroke;
pub mod tools;

pub use app::PaintApp;
pub use canvas::DrawingCanvas;
pub use command::{CanvasCommand, History};
pub use config::CanvasConfig;
pub use error::{CanvasError, CanvasResult, RenderError};
pub use export::{ExportFormat, ExportedImage, Exporter};
pub use input::{InputEvent, InputHandler, InputLocation, route_event};
pub use renderer::{RasterRenderer, Renderer};
pub use settings::{CanvasSettings, PointStyle};
pub use stroke::{Path, PathRef, Point};
pub use tools::StrokeRecorder;
