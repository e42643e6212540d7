pub mod hamt;
pub mod list;
pub mod pvec;

pub use hamt::PMap;
pub use list::PList;
pub use pvec::PVec;
