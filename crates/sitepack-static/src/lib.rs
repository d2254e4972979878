//! Static deployment asset builder for sitepack.
//!
//! Prepares the files published to static hosting: the Android package (or a
//! placeholder when it cannot be downloaded), a credentials stub for the
//! hosting SDK, and an HTML download page linking the package.

pub mod builder;
pub mod fetch;
pub mod templates;

pub use builder::{deploy_instructions, BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use fetch::{ArtifactFetcher, FetchOutcome, PlaceholderReason};
pub use templates::{PageContext, TemplateEngine, TemplateSet};
