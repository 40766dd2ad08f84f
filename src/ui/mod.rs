/// Dashboard widgets. Every function renders from [`crate::state::AppState`]
/// and never touches the network directly.
pub mod charts;
pub mod panels;
pub mod sections;
