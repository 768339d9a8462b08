use crate::policy::EffectiveConfig;
use crate::report::MuzzleReport;
use muzzle_types::Finding;

mod fail_directive;
mod inverse;
mod range;
mod references;
mod resolution;
mod utils;


pub fn run_all(reports: &[MuzzleReport], cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    references::run(reports, cfg, out);
    range::run(reports, cfg, out);
    resolution::run(reports, cfg, out);
    inverse::run(reports, cfg, out);
    fail_directive::run(reports, cfg, out);
}
