pub mod camera;
pub mod capture;
pub mod overlay;
pub mod recognition;
pub mod shared;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;
