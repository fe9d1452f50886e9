pub(crate) mod face;
pub(crate) mod measure;
pub(crate) mod normalize;
