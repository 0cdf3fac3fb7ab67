//! Interactive task list.

mod app;
mod prompt;
mod view;

pub use app::run;
