pub use presetkit_base::*;

mod pipeline_error;
pub use pipeline_error::*;

mod host;
pub use host::*;

mod project;
pub use project::*;

mod resolve;
pub use resolve::*;

mod reapply;
pub use reapply::*;

mod preprocess;
pub use preprocess::*;

mod file_system;
pub use file_system::*;
