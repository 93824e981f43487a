pub(crate) mod health;
pub(crate) mod pages;
pub(crate) mod upload;
pub(crate) mod visualization;
