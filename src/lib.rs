pub mod brun;
pub mod cps;
pub mod diamond;
pub mod math;
pub mod microtone;
pub mod pipeline;
pub mod ratio;
pub mod scala;
pub mod tuning;
