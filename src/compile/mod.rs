pub(crate) mod compose;
pub(crate) mod plan;
