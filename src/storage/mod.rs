pub mod region;

pub use region::MmapRegion;
