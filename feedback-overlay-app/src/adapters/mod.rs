//! Platform adapters bundled with the runtime.
//!
//! A browser binding lives outside this workspace; the headless page is the
//! reference implementation of the core ports.

#[cfg(feature = "headless")]
mod headless;

#[cfg(feature = "headless")]
pub use headless::{HeadlessFrame, HeadlessPage, PageState};
