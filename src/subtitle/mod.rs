/*!
 * Subtitle generation: heading alignment, caption line breaking and the
 * Advanced SubStation Alpha document they are written to.
 */

pub mod ass;
pub mod builder;
pub mod heading_aligner;

pub use ass::{format_ass_time, AssHeader, CueStyle, StyleSpec, SubtitleCue, SubtitleDocument};
pub use builder::{LineRules, SubtitleBuilder, SubtitleOptions};
pub use heading_aligner::{HeadingAligner, HeadingAlignment, HeadingMatch};
