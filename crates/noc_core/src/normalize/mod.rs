pub mod interval;
pub mod timestamps;
