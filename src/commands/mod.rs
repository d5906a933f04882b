// ABOUTME: Command module aggregator for the d2ship CLI.
// ABOUTME: Re-exports listing, batch, link and create command handlers.

mod batch;
mod create;
mod links;
mod list;

pub use batch::{BatchAction, batch};
pub use create::create;
pub use links::{database, logs};
pub use list::{images, list, projects};
