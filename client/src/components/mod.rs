//! Reusable UI components.

pub mod nav;
