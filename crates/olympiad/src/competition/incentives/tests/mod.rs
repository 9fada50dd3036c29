mod common;
mod schedule;
