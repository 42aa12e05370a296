pub mod collision;
pub mod color_convert;
pub mod color_spec;
pub mod particles;
pub mod refiner;
pub mod regions;
pub mod segmenter;
pub mod targets;
pub mod tracked_point;
pub mod trail;
