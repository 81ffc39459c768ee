mod common;
mod known_ids;
mod push;
