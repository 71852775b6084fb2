pub mod dedupe;
pub mod driver;
pub mod normalize;
pub mod sources;
#[cfg(test)]
mod tests;

pub use dedupe::{SeenSet, filter_new};
pub use driver::{PipelineRun, ReadOptions, Stage, normalize_batch, read_sources};
pub use normalize::strip_decoration;
pub use sources::DEFAULT_COLUMN_ALIASES;
