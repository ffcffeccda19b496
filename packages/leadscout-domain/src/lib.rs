pub mod candidate;
pub mod dedupe;
pub mod expansion;
pub mod filters;
pub mod icp;
pub mod options;
pub mod relaxation;
pub mod specificity;
