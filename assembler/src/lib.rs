pub mod anchors;
pub mod links;
pub mod notice;
pub mod pipeline;
pub mod references;
pub mod sections;
pub mod verify;

pub use notice::Notice;
pub use pipeline::{Assembler, Assembly, Cover, SourceUnit, replace_all, transform};
pub use sections::SectionMap;
pub use verify::check_anchors;
