pub(crate) mod details;
pub(crate) mod index;
pub(crate) mod search;
pub(crate) mod status;
