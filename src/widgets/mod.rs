//! Client-side behaviours whose parameters are decided on the server.
//!
//! - `image`: placeholder fallback with bounded retries for expiring URLs
//! - `progress`: reading progress bar
//! - `view_mode`: grid/list preference persisted in a cookie
//!
//! The renderer emits each decision into the markup as attributes; the
//! inline scripts only replay what those attributes say.

pub mod image;
pub mod progress;
pub mod view_mode;

pub use image::{ImageFallback, RetryAttempt, RetryPolicy, PLACEHOLDER_IMAGE};
pub use progress::progress_bar;
pub use view_mode::{ResolvedViewMode, ViewMode};
