//! # Result Rendering
//!
//! UI-independent presentation of an analysis result:
//!
//! - [`view`]: `ResultView::project`, the payload → cards/tags/bars projection
//! - [`markup`]: narrative markup → HTML
//! - [`reveal`]: delayed bar-fill animation timing
//! - [`report`]: standalone HTML report export
//!
//! The TUI draws a `ResultView`; the report writer serializes one.

pub mod markup;
pub mod report;
pub mod reveal;
pub mod view;

pub use view::ResultView;
