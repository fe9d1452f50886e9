pub(crate) mod fitter;
