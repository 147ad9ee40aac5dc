/// Scraper Admin - terminal console for a Sinta/Garuda scraping backend.
///
/// Core library providing the typed API gateway, collection classification,
/// record models, and the state machines behind the collection explorer,
/// deletion gate, and job submission forms.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
