//! Browser helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything that touches `window` lives here, behind the `csr` feature, so
//! pages and components stay buildable and testable off the browser.

pub mod diagnostics;
pub mod location;
pub mod timer;
