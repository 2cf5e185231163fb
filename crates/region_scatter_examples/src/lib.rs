#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_result_to_png, Canvas, MarkerStyle, RenderConfig,
};
