pub(crate) mod progression;
pub(crate) mod sampling;
pub(crate) mod scoring;
pub(crate) mod tutoring_policy;
