pub mod capture;
pub mod emotion;
pub mod render;
pub mod report;
pub mod sampling;
pub mod session;
