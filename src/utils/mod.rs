// shared formatting and path helpers

pub mod format;
pub mod paths;
