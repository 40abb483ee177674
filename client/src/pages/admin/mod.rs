//! Admin section: a dashboard layout and the screens nested inside it.

pub mod coaches;
pub mod dashboard;
pub mod home;
pub mod players;
pub mod teams;
