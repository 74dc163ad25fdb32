pub mod stage0_segment;
pub mod stage1_candidates;
pub mod stage2_score;
pub mod stage3_dedup;
pub mod stage4_enrich;

pub use stage0_segment::*;
pub use stage1_candidates::*;
pub use stage2_score::*;
pub use stage3_dedup::*;
pub use stage4_enrich::*;
