mod common;
mod factory;
