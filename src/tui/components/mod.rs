//! # TUI Components
//!
//! One component per screen region. Components receive everything they
//! draw as props and never touch `App` directly:
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! TitleBar::new(&app.status_message, hints).render(frame, area);
//!
//! // Bad: hidden dependency on global state
//! title_bar.render(frame, area); // reads from App
//! ```
//!
//! ```text
//! components/
//! ├── title_bar.rs     (status + key hints)
//! ├── input_box.rs     (symptom text field)
//! ├── loading.rs       (spinner + staged progress)
//! ├── results.rs       (scrollable result view)
//! ├── error_view.rs    (classified error)
//! └── disease_list.rs  (catalogue overlay)
//! ```

pub mod disease_list;
pub mod error_view;
pub mod input_box;
pub mod loading;
pub mod results;
pub mod title_bar;

pub use disease_list::DiseaseList;
pub use error_view::ErrorPanel;
pub use input_box::InputBox;
pub use loading::LoadingView;
pub use results::ResultsPanel;
pub use title_bar::TitleBar;
