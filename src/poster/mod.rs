pub(crate) mod catalog;
pub(crate) mod layout;
pub(crate) mod rank;
pub(crate) mod spec;
