pub mod calibration;
pub mod model;
