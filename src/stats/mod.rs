//! Non-parametric repeated-measures comparison of growth models.
//!
//! Responsibilities:
//!
//! - arrange one organism's growth records as a complete block design (`design`)
//! - within-block ranking with averaged ties (`rank`)
//! - Friedman test and Kendall's W (`friedman`)
//! - paired Wilcoxon signed-rank tests (`wilcoxon`)
//! - Bonferroni-corrected pairwise post-hoc comparisons (`posthoc`)
//! - the per-organism driver tying these together (`compare`)

pub mod compare;
pub mod design;
pub mod friedman;
pub mod posthoc;
pub mod rank;
pub mod wilcoxon;

pub use compare::*;
pub use design::*;
pub use friedman::*;
pub use posthoc::*;
pub use rank::*;
pub use wilcoxon::*;
