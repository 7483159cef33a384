use super::*;

mod publications;
mod search;
mod upload;
